//! Client-side resolver for tiled geospatial data catalogs.
//!
//! A catalog is addressed by an HRN and exposes named APIs whose base URLs
//! are discovered through a lookup service. Layers inside a catalog hold
//! partitioned metadata and blob payloads, addressed by partition id or by
//! quad key on a quad-tree tiling of the globe.
//!
//! The crate layers its concerns bottom-up: the quad-key codec and HRN
//! parsing are pure, the transport wraps reqwest behind an [`HttpClient`]
//! trait, the cache repository keeps partition metadata out of repeat
//! fetches, and [`LayerClient`] composes endpoint resolution, version
//! resolution and the query orchestration into three read operations.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use tilecatalog::{
//!     CatalogHrn, ClientSettings, LayerClient, LayerType, PartitionsRequest,
//!     StaticTokenProvider,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ClientSettings::new(
//!     "https://lookup.example.com/lookup/v1",
//!     Arc::new(StaticTokenProvider::new("token")),
//! )?;
//! let hrn = CatalogHrn::from_string("hrn:geo:data:::test-catalog")?;
//! let client = LayerClient::new(&settings, hrn, "layer-1", LayerType::Versioned)?;
//!
//! let request = PartitionsRequest::new()
//!     .with_partition_ids(vec!["100".to_string(), "1000".to_string()]);
//! let partitions = client.get_partitions(&request).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod hrn;
pub mod layer;
pub mod lookup;
pub mod model;
pub mod quadkey;
pub mod request;
pub mod settings;
pub mod statistics;
pub mod transport;

mod query;
mod version;

pub use cache::{KeyValueCache, MemoryKeyValueCache, MetadataCacheRepository};
pub use error::{ClientError, ClientResult};
pub use hrn::{CatalogHrn, HrnError};
pub use layer::{LayerClient, LayerType};
pub use lookup::ApiName;
pub use model::{
    ApiEndpoint, BoundingBox, LayerSummary, LevelSummary, ParentQuad, PartitionMetadata,
    Partitions, QuadTreeIndex, SubQuad, VersionResponse,
};
pub use quadkey::{
    children, morton_code_from_quad_key, parent, quad_key_from_morton_code, MortonCode,
    MortonCodeError, QuadKey, QuadKeyError,
};
pub use request::{DataRequest, PartitionsRequest, QuadKeyPartitionsRequest, StatisticsRequest};
pub use settings::ClientSettings;
pub use statistics::{CoverageDataType, StatisticsClient};
pub use transport::{BoxFuture, HttpClient, StaticTokenProvider, TokenProvider, TransportError};
