//! Endpoint resolution through the lookup service.
//!
//! A catalog handle maps to a set of named APIs, each with its own base
//! URL. Resolution issues one lookup call per catalog and caches every
//! returned entry for the lifetime of the resolver instance; endpoints are
//! assumed stable for the session and never expire. The cache is plain
//! per-instance state, so discarding the resolver resets it.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::hrn::CatalogHrn;
use crate::model::ApiEndpoint;
use crate::settings::ClientSettings;
use crate::transport::{HttpClient, RequestBuilder, TokenProvider};

/// The closed set of catalog APIs this client resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiName {
    /// Partition and quad-tree queries.
    Query,
    /// Flat partition listings and version metadata.
    Metadata,
    /// Blob store of versioned layers.
    Blob,
    /// Blob store of volatile layers.
    VolatileBlob,
    /// Layer summaries and coverage maps.
    Statistics,
}

impl ApiName {
    /// The wire name used in lookup responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiName::Query => "query",
            ApiName::Metadata => "metadata",
            ApiName::Blob => "blob",
            ApiName::VolatileBlob => "volatile-blob",
            ApiName::Statistics => "statistics",
        }
    }
}

impl fmt::Display for ApiName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves API base URLs for catalogs, with a per-instance cache.
///
/// Concurrent requests for the same catalog may race on cache population;
/// last-write-wins is fine because all writers would store identical data.
pub struct ApiLookupClient {
    lookup: RequestBuilder,
    http: Arc<dyn HttpClient>,
    tokens: Arc<dyn TokenProvider>,
    /// `"<hrn>::<api>"` to base URL, filled from whole lookup responses.
    resolved: DashMap<String, String>,
}

impl ApiLookupClient {
    pub fn new(settings: &ClientSettings) -> Self {
        let http = settings.http();
        let tokens = settings.tokens();
        Self {
            lookup: RequestBuilder::new(
                settings.lookup_base_url(),
                Arc::clone(&http),
                Arc::clone(&tokens),
            ),
            http,
            tokens,
            resolved: DashMap::new(),
        }
    }

    /// Resolves the base URL of `api` for `hrn`.
    ///
    /// On a cache miss this issues one lookup call and stores every entry
    /// of the response, so a later request for a sibling API of the same
    /// catalog is served without another call.
    pub async fn resolve_base_url(&self, hrn: &CatalogHrn, api: ApiName) -> ClientResult<String> {
        let cache_key = Self::cache_key(hrn, api.as_str());
        if let Some(base_url) = self.resolved.get(&cache_key) {
            return Ok(base_url.clone());
        }

        let path = format!("resources/{}/apis", hrn);
        let endpoints: Vec<ApiEndpoint> = self
            .lookup
            .get_json(&path)
            .await
            .map_err(|e| ClientError::LookupService(e.to_string()))?;

        debug!(catalog = %hrn, count = endpoints.len(), "Resolved catalog APIs");

        let mut requested = None;
        for endpoint in &endpoints {
            // First returned entry wins on duplicate api names.
            self.resolved
                .entry(Self::cache_key(hrn, &endpoint.api))
                .or_insert_with(|| endpoint.base_url.clone());
            if requested.is_none() && endpoint.api == api.as_str() {
                requested = Some(endpoint.base_url.clone());
            }
        }

        requested.ok_or_else(|| ClientError::EndpointNotFound {
            api: api.as_str().to_string(),
            catalog: hrn.to_string(),
        })
    }

    /// Resolves `api` for `hrn` and returns a request builder bound to it.
    pub async fn request_builder(
        &self,
        hrn: &CatalogHrn,
        api: ApiName,
    ) -> ClientResult<RequestBuilder> {
        let base_url = self.resolve_base_url(hrn, api).await?;
        Ok(RequestBuilder::new(
            base_url,
            Arc::clone(&self.http),
            Arc::clone(&self.tokens),
        ))
    }

    fn cache_key(hrn: &CatalogHrn, api: &str) -> String {
        format!("{}::{}", hrn, api)
    }
}
