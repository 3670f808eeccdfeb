//! Wire and data model for the catalog services.
//!
//! All response shapes follow the services' camelCase JSON. Partition
//! metadata is immutable once fetched and is identified by
//! `(catalog, layer, version, partition id)`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata describing one spatial partition of a layer.
///
/// The `data_handle` locates the partition's blob in the blob store;
/// this client never decodes or decompresses the blob itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionMetadata {
    /// Partition id within the layer.
    pub partition: String,

    /// Opaque handle locating the partition's blob.
    pub data_handle: String,

    /// Catalog version the partition belongs to, when the layer is versioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,

    /// Uncompressed size in bytes, present when requested as an
    /// additional field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_size: Option<u64>,

    /// Compressed size in bytes, present when requested as an
    /// additional field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressed_data_size: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crc: Option<String>,
}

/// A page of partition metadata from a flat listing or an id query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partitions {
    pub partitions: Vec<PartitionMetadata>,

    /// Link to the next page, if the backend paginated the listing.
    /// This client does not follow it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Result of a quad-tree query: descendants of the requested quad plus
/// the ancestors covering the same area at lower resolution. Callers must
/// check both halves.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuadTreeIndex {
    #[serde(default)]
    pub sub_quads: Vec<SubQuad>,

    #[serde(default)]
    pub parent_quads: Vec<ParentQuad>,
}

/// A descendant quad, addressed relative to the requested quad.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubQuad {
    /// Morton code of the sub-quad relative to the requested quad.
    pub sub_quad_key: String,

    pub data_handle: String,

    #[serde(default)]
    pub version: Option<u64>,

    #[serde(default)]
    pub data_size: Option<u64>,

    #[serde(default)]
    pub compressed_data_size: Option<u64>,

    #[serde(default)]
    pub checksum: Option<String>,

    #[serde(default)]
    pub additional_metadata: Option<String>,
}

/// An ancestor quad covering the requested area at a lower level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentQuad {
    /// Absolute partition id (Morton code) of the ancestor quad.
    pub partition: String,

    pub data_handle: String,

    #[serde(default)]
    pub version: Option<u64>,

    #[serde(default)]
    pub data_size: Option<u64>,

    #[serde(default)]
    pub compressed_data_size: Option<u64>,

    #[serde(default)]
    pub checksum: Option<String>,

    #[serde(default)]
    pub additional_metadata: Option<String>,
}

/// Summary of a versioned layer's contents from the statistics API,
/// broken down by quad-tree level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSummary {
    #[serde(rename = "catalogHRN")]
    pub catalog_hrn: String,

    pub layer: String,

    /// Accounting per quad-tree level, keyed by level number.
    #[serde(default)]
    pub level_summary: HashMap<u32, LevelSummary>,
}

/// Accounting for one quad-tree level of a layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSummary {
    /// Total stored bytes at this level.
    #[serde(default)]
    pub size: u64,

    #[serde(default)]
    pub total_partitions: Option<u64>,

    #[serde(default)]
    pub min_partition_size: Option<u64>,

    #[serde(default)]
    pub max_partition_size: Option<u64>,

    /// Morton code of the partition closest to the data's centroid.
    #[serde(default)]
    pub centroid: Option<u64>,

    #[serde(default)]
    pub version: Option<u64>,

    #[serde(default)]
    pub processed_timestamp: Option<u64>,

    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
}

/// Geographic extent of a level's data, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundingBox {
    pub east: f64,
    pub north: f64,
    pub south: f64,
    pub west: f64,
}

/// One entry of a lookup response: a named API exposed by the catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiEndpoint {
    /// Wire name of the API, e.g. `"query"` or `"metadata"`.
    pub api: String,

    /// API version tag, e.g. `"v1"`.
    pub version: String,

    #[serde(rename = "baseURL")]
    pub base_url: String,
}

/// Response of the latest-version endpoint.
///
/// An absent or negative version is a sentinel "unknown" state and must
/// surface as a resolution error, never as version 0.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VersionResponse {
    #[serde(default)]
    pub version: Option<i64>,
}
