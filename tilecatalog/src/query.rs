//! Partition and quad-tree query orchestration.
//!
//! Each read request walks a fixed sequence of stages:
//! validate, resolve version (versioned layers, unpinned requests only),
//! cache lookup, resolve endpoint, network fetch, cache write-back. A full
//! cache hit is terminal and skips endpoint resolution entirely; every
//! resolution-stage error short-circuits the whole operation. Cache writes
//! are best-effort and never escalate.
//!
//! Routing is a fixed rule, not configuration: id- and quadkey-addressed
//! lookups go to the `query` API, flat "all partitions" listings go to the
//! `metadata` API.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::MetadataCacheRepository;
use crate::error::{ClientError, ClientResult};
use crate::hrn::CatalogHrn;
use crate::layer::LayerType;
use crate::lookup::{ApiLookupClient, ApiName};
use crate::model::{Partitions, QuadTreeIndex};
use crate::quadkey::morton_code_from_quad_key;
use crate::request::{PartitionsRequest, QuadKeyPartitionsRequest};
use crate::settings::ClientSettings;
use crate::transport::query_string;
use crate::version::VersionResolver;

/// The closed set of partition-query shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryKind {
    ById,
    All,
}

impl QueryKind {
    /// The fixed API routing for each query shape.
    fn api(self) -> ApiName {
        match self {
            QueryKind::ById => ApiName::Query,
            QueryKind::All => ApiName::Metadata,
        }
    }
}

/// Orchestrates partition metadata reads for one settings instance.
pub struct QueryClient {
    lookup: Arc<ApiLookupClient>,
    versions: VersionResolver,
    repository: MetadataCacheRepository,
}

impl QueryClient {
    pub fn new(settings: &ClientSettings) -> Self {
        let lookup = Arc::new(ApiLookupClient::new(settings));
        Self {
            versions: VersionResolver::new(Arc::clone(&lookup)),
            repository: MetadataCacheRepository::new(settings.cache()),
            lookup,
        }
    }

    /// The endpoint resolver, shared with the data-read path.
    pub(crate) fn lookup(&self) -> &ApiLookupClient {
        &self.lookup
    }

    /// Fetches partition metadata by explicit ids or as a flat listing.
    ///
    /// Flat listings return only the first page; a `next` link in the
    /// response is surfaced but not followed.
    pub async fn get_partitions(
        &self,
        request: &PartitionsRequest,
        hrn: &CatalogHrn,
        layer_id: &str,
        layer_type: LayerType,
    ) -> ClientResult<Partitions> {
        let kind = Self::validate(request, layer_id)?;

        let version = match layer_type {
            LayerType::Versioned => Some(self.versions.resolve(hrn, request.version()).await?),
            LayerType::Volatile => request.version(),
        };
        let effective = match version {
            Some(version) => request.clone().with_version(version),
            None => request.clone(),
        };

        if let Some(partitions) = self.repository.get(&effective, hrn, layer_id) {
            debug!(catalog = %hrn, layer = layer_id, "Partition metadata served from cache");
            return Ok(Partitions {
                partitions,
                next: None,
            });
        }

        let builder = self.lookup.request_builder(hrn, kind.api()).await?;
        let path = Self::partitions_path(&effective, layer_id, kind);
        let response: Partitions = builder
            .get_json(&path)
            .await
            .map_err(|e| ClientError::NetworkFetch(e.to_string()))?;

        if !self
            .repository
            .put(&effective, hrn, layer_id, &response.partitions)
        {
            warn!(catalog = %hrn, layer = layer_id, "Failed to cache partition metadata");
        }

        Ok(response)
    }

    /// Fetches the quad-tree index for a quad key at the requested depth.
    ///
    /// The result separates descendants (`sub_quads`) from the ancestors
    /// covering the same area (`parent_quads`); callers must check both.
    pub async fn fetch_quad_tree_index(
        &self,
        request: &QuadKeyPartitionsRequest,
        hrn: &CatalogHrn,
        layer_id: &str,
        layer_type: LayerType,
    ) -> ClientResult<QuadTreeIndex> {
        if layer_id.is_empty() {
            return Err(ClientError::Validation(
                "Please provide correct Id of the Layer".to_string(),
            ));
        }
        let quad_key = request.quad_key().ok_or_else(|| {
            ClientError::Validation("Please provide correct QuadKey".to_string())
        })?;

        let version = match layer_type {
            LayerType::Versioned => Some(self.versions.resolve(hrn, request.version()).await?),
            LayerType::Volatile => None,
        };

        let morton = morton_code_from_quad_key(quad_key)?;
        let depth = request.depth().unwrap_or(0);

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(fields) = request.additional_fields() {
            params.push(("additionalFields", fields.join(",")));
        }
        if let Some(tag) = request.billing_tag() {
            params.push(("billingTag", tag.to_string()));
        }

        let path = match version {
            Some(version) => format!(
                "layers/{}/versions/{}/quadkeys/{}/depths/{}{}",
                layer_id,
                version,
                morton,
                depth,
                query_string(&params)
            ),
            None => format!(
                "layers/{}/quadkeys/{}/depths/{}{}",
                layer_id,
                morton,
                depth,
                query_string(&params)
            ),
        };

        let builder = self.lookup.request_builder(hrn, ApiName::Query).await?;
        builder
            .get_json(&path)
            .await
            .map_err(|e| ClientError::NetworkFetch(e.to_string()))
    }

    /// Rejects malformed requests before any cache or network access and
    /// classifies the query shape.
    fn validate(request: &PartitionsRequest, layer_id: &str) -> ClientResult<QueryKind> {
        if layer_id.is_empty() {
            return Err(ClientError::Validation(
                "Please provide correct Id of the Layer".to_string(),
            ));
        }
        match request.partition_ids() {
            Some([]) => Err(ClientError::Validation(
                "Please provide correct partitionIds list".to_string(),
            )),
            Some(_) => Ok(QueryKind::ById),
            None => Ok(QueryKind::All),
        }
    }

    fn partitions_path(request: &PartitionsRequest, layer_id: &str, kind: QueryKind) -> String {
        let mut params: Vec<(&str, String)> = Vec::new();
        if kind == QueryKind::ById {
            for id in request.partition_ids().unwrap_or_default() {
                params.push(("partition", id.clone()));
            }
            if let Some(version) = request.version() {
                params.push(("version", version.to_string()));
            }
        }
        if let Some(fields) = request.additional_fields() {
            params.push(("additionalFields", fields.join(",")));
        }
        if let Some(tag) = request.billing_tag() {
            params.push(("billingTag", tag.to_string()));
        }
        format!("layers/{}/partitions{}", layer_id, query_string(&params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::quadkey::QuadKey;

    #[test]
    fn test_validate_empty_layer() {
        let result = QueryClient::validate(&PartitionsRequest::new(), "");
        match result.unwrap_err() {
            ClientError::Validation(message) => {
                assert_eq!(message, "Please provide correct Id of the Layer");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_empty_id_list() {
        let request = PartitionsRequest::new().with_partition_ids(Vec::new());
        let result = QueryClient::validate(&request, "layer-1");
        match result.unwrap_err() {
            ClientError::Validation(message) => {
                assert_eq!(message, "Please provide correct partitionIds list");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_classifies_kind() {
        let by_id = PartitionsRequest::new().with_partition_ids(vec!["100".to_string()]);
        assert_eq!(
            QueryClient::validate(&by_id, "layer-1").unwrap(),
            QueryKind::ById
        );
        assert_eq!(
            QueryClient::validate(&PartitionsRequest::new(), "layer-1").unwrap(),
            QueryKind::All
        );
    }

    #[test]
    fn test_routing_rule_is_fixed() {
        assert_eq!(QueryKind::ById.api(), ApiName::Query);
        assert_eq!(QueryKind::All.api(), ApiName::Metadata);
    }

    #[test]
    fn test_partitions_path_by_id() {
        let request = PartitionsRequest::new()
            .with_partition_ids(vec!["100".to_string(), "1000".to_string()])
            .with_version(42);
        let path = QueryClient::partitions_path(&request, "layer-1", QueryKind::ById);
        assert_eq!(
            path,
            "layers/layer-1/partitions?partition=100&partition=1000&version=42"
        );
    }

    #[test]
    fn test_partitions_path_flat_listing() {
        let path =
            QueryClient::partitions_path(&PartitionsRequest::new(), "layer-1", QueryKind::All);
        assert_eq!(path, "layers/layer-1/partitions");
    }

    #[test]
    fn test_partitions_path_additional_fields() {
        let request = PartitionsRequest::new().with_additional_fields(vec![
            "dataSize".to_string(),
            "checksum".to_string(),
            "compressedDataSize".to_string(),
        ]);
        let path = QueryClient::partitions_path(&request, "layer-1", QueryKind::All);
        assert_eq!(
            path,
            "layers/layer-1/partitions?additionalFields=dataSize,checksum,compressedDataSize"
        );
    }

    #[tokio::test]
    async fn test_quad_key_request_requires_quad_key() {
        let settings = crate::settings::ClientSettings::new(
            "https://lookup.example.com/lookup/v1",
            Arc::new(crate::transport::StaticTokenProvider::new("t")),
        )
        .unwrap()
        .with_http_client(Arc::new(crate::transport::tests::MockHttpClient::new()));
        let client = QueryClient::new(&settings);
        let hrn = CatalogHrn::from_string("hrn:geo:data:::test-catalog").unwrap();

        let result = client
            .fetch_quad_tree_index(
                &QuadKeyPartitionsRequest::new(),
                &hrn,
                "layer-1",
                LayerType::Volatile,
            )
            .await;

        match result.unwrap_err() {
            ClientError::Validation(message) => {
                assert_eq!(message, "Please provide correct QuadKey");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_quad_key_request_validates_before_network() {
        // No mocked responses: any network access would error, but
        // validation must reject the request first.
        let http = Arc::new(crate::transport::tests::MockHttpClient::new());
        let settings = crate::settings::ClientSettings::new(
            "https://lookup.example.com/lookup/v1",
            Arc::new(crate::transport::StaticTokenProvider::new("t")),
        )
        .unwrap()
        .with_http_client(Arc::clone(&http) as Arc<dyn crate::transport::HttpClient>);
        let client = QueryClient::new(&settings);
        let hrn = CatalogHrn::from_string("hrn:geo:data:::test-catalog").unwrap();

        let request =
            QuadKeyPartitionsRequest::new().with_quad_key(QuadKey::new(1, 2, 3).unwrap());
        let result = client
            .fetch_quad_tree_index(&request, &hrn, "", LayerType::Volatile)
            .await;

        assert!(matches!(result.unwrap_err(), ClientError::Validation(_)));
        assert_eq!(http.call_count(), 0);
    }
}
