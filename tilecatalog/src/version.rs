//! Catalog version resolution.
//!
//! Versioned layers address partition metadata by catalog version. A
//! pinned version on the request is used as-is; otherwise the latest
//! version is fetched once from the metadata API and cached for the
//! resolver's lifetime (a caller discards the resolver to reset).

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::hrn::CatalogHrn;
use crate::lookup::{ApiLookupClient, ApiName};
use crate::model::VersionResponse;

/// Resolves the latest (or a pinned) catalog version.
pub struct VersionResolver {
    lookup: Arc<ApiLookupClient>,
    /// Latest resolved version per catalog string form.
    latest: DashMap<String, u64>,
}

impl VersionResolver {
    pub fn new(lookup: Arc<ApiLookupClient>) -> Self {
        Self {
            lookup,
            latest: DashMap::new(),
        }
    }

    /// Returns `requested` unchanged when pinned, otherwise resolves the
    /// latest catalog version.
    ///
    /// A missing or negative version in the response is a sentinel
    /// "unknown" state and surfaces as
    /// [`ClientError::VersionUnavailable`], never as version 0.
    pub async fn resolve(&self, hrn: &CatalogHrn, requested: Option<u64>) -> ClientResult<u64> {
        if let Some(version) = requested {
            return Ok(version);
        }
        if let Some(version) = self.latest.get(hrn.as_str()) {
            return Ok(*version);
        }

        let builder = self.lookup.request_builder(hrn, ApiName::Metadata).await?;
        let response: VersionResponse = builder
            .get_json("versions/latest?startVersion=-1")
            .await
            .map_err(|e| ClientError::VersionLookup(e.to_string()))?;

        match response.version {
            Some(version) if version >= 0 => {
                let version = version as u64;
                debug!(catalog = %hrn, version, "Resolved latest catalog version");
                self.latest.insert(hrn.as_str().to_string(), version);
                Ok(version)
            }
            _ => Err(ClientError::VersionUnavailable),
        }
    }
}
