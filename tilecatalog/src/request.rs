//! Read-request builders.
//!
//! Requests are assembled with chained `with_*` calls and validated by the
//! orchestrator before any cache or network access. A request without
//! partition ids means "all partitions".

use crate::quadkey::QuadKey;
use crate::statistics::CoverageDataType;

/// Request for partition metadata, either by explicit ids or as a flat
/// listing of the whole layer.
#[derive(Debug, Clone, Default)]
pub struct PartitionsRequest {
    version: Option<u64>,
    partition_ids: Option<Vec<String>>,
    additional_fields: Option<Vec<String>>,
    billing_tag: Option<String>,
}

impl PartitionsRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the catalog version. A pinned version is used as-is and never
    /// triggers a latest-version lookup.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    /// Restricts the request to explicit partition ids.
    pub fn with_partition_ids(mut self, partition_ids: Vec<String>) -> Self {
        self.partition_ids = Some(partition_ids);
        self
    }

    /// Requests extra metadata fields, e.g. `dataSize` or `checksum`.
    pub fn with_additional_fields(mut self, fields: Vec<String>) -> Self {
        self.additional_fields = Some(fields);
        self
    }

    /// Attaches a billing tag to the outbound calls.
    pub fn with_billing_tag(mut self, tag: impl Into<String>) -> Self {
        self.billing_tag = Some(tag.into());
        self
    }

    pub fn version(&self) -> Option<u64> {
        self.version
    }

    pub fn partition_ids(&self) -> Option<&[String]> {
        self.partition_ids.as_deref()
    }

    pub fn additional_fields(&self) -> Option<&[String]> {
        self.additional_fields.as_deref()
    }

    pub fn billing_tag(&self) -> Option<&str> {
        self.billing_tag.as_deref()
    }
}

/// Request for partition metadata addressed by a quad key, walking the
/// quad tree `depth` levels below the requested quad.
#[derive(Debug, Clone, Default)]
pub struct QuadKeyPartitionsRequest {
    quad_key: Option<QuadKey>,
    depth: Option<u8>,
    version: Option<u64>,
    additional_fields: Option<Vec<String>>,
    billing_tag: Option<String>,
}

impl QuadKeyPartitionsRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quad_key(mut self, quad_key: QuadKey) -> Self {
        self.quad_key = Some(quad_key);
        self
    }

    /// Sets how many levels below the quad key to include. Defaults to 0.
    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Pins the catalog version for versioned layers.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_additional_fields(mut self, fields: Vec<String>) -> Self {
        self.additional_fields = Some(fields);
        self
    }

    pub fn with_billing_tag(mut self, tag: impl Into<String>) -> Self {
        self.billing_tag = Some(tag.into());
        self
    }

    pub fn quad_key(&self) -> Option<&QuadKey> {
        self.quad_key.as_ref()
    }

    pub fn depth(&self) -> Option<u8> {
        self.depth
    }

    pub fn version(&self) -> Option<u64> {
        self.version
    }

    pub fn additional_fields(&self) -> Option<&[String]> {
        self.additional_fields.as_deref()
    }

    pub fn billing_tag(&self) -> Option<&str> {
        self.billing_tag.as_deref()
    }
}

/// Request for a partition's blob, addressed by data handle, partition id
/// or quad key.
///
/// When a data handle is given it is used directly; otherwise the handle
/// is resolved through the query API first.
#[derive(Debug, Clone, Default)]
pub struct DataRequest {
    data_handle: Option<String>,
    partition_id: Option<String>,
    quad_key: Option<QuadKey>,
    version: Option<u64>,
    billing_tag: Option<String>,
}

impl DataRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_handle(mut self, data_handle: impl Into<String>) -> Self {
        self.data_handle = Some(data_handle.into());
        self
    }

    pub fn with_partition_id(mut self, partition_id: impl Into<String>) -> Self {
        self.partition_id = Some(partition_id.into());
        self
    }

    pub fn with_quad_key(mut self, quad_key: QuadKey) -> Self {
        self.quad_key = Some(quad_key);
        self
    }

    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_billing_tag(mut self, tag: impl Into<String>) -> Self {
        self.billing_tag = Some(tag.into());
        self
    }

    pub fn data_handle(&self) -> Option<&str> {
        self.data_handle.as_deref()
    }

    pub fn partition_id(&self) -> Option<&str> {
        self.partition_id.as_deref()
    }

    pub fn quad_key(&self) -> Option<&QuadKey> {
        self.quad_key.as_ref()
    }

    pub fn version(&self) -> Option<u64> {
        self.version
    }

    pub fn billing_tag(&self) -> Option<&str> {
        self.billing_tag.as_deref()
    }
}

/// Request for a layer coverage map from the statistics API.
///
/// `data_type` selects which map the service renders; `data_level` is the
/// quad-tree level the map is computed at. Both are required.
#[derive(Debug, Clone, Default)]
pub struct StatisticsRequest {
    data_type: Option<CoverageDataType>,
    data_level: Option<u8>,
    billing_tag: Option<String>,
}

impl StatisticsRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_type(mut self, data_type: CoverageDataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    pub fn with_data_level(mut self, data_level: u8) -> Self {
        self.data_level = Some(data_level);
        self
    }

    pub fn with_billing_tag(mut self, tag: impl Into<String>) -> Self {
        self.billing_tag = Some(tag.into());
        self
    }

    pub fn data_type(&self) -> Option<CoverageDataType> {
        self.data_type
    }

    pub fn data_level(&self) -> Option<u8> {
        self.data_level
    }

    pub fn billing_tag(&self) -> Option<&str> {
        self.billing_tag.as_deref()
    }
}
