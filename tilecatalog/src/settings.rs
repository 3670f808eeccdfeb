//! Client configuration.
//!
//! [`ClientSettings`] bundles the collaborators every resolver needs: the
//! lookup service base URL, a bearer-token provider, the HTTP transport
//! and the key-value cache store. The transport and cache default to the
//! built-in reqwest client and the moka-backed in-memory cache; both can
//! be swapped, which is how tests inject mocks.

use std::sync::Arc;

use crate::cache::{KeyValueCache, MemoryKeyValueCache};
use crate::transport::{AsyncReqwestClient, HttpClient, TokenProvider, TransportError};

/// Shared configuration for catalog clients.
#[derive(Clone)]
pub struct ClientSettings {
    lookup_base_url: String,
    tokens: Arc<dyn TokenProvider>,
    http: Arc<dyn HttpClient>,
    cache: Arc<dyn KeyValueCache>,
}

impl ClientSettings {
    /// Creates settings with the default transport and cache.
    ///
    /// `lookup_base_url` is the base URL of the lookup service, e.g.
    /// `https://lookup.example.com/lookup/v1`.
    pub fn new(
        lookup_base_url: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            lookup_base_url: lookup_base_url.into(),
            tokens,
            http: Arc::new(AsyncReqwestClient::new()?),
            cache: Arc::new(MemoryKeyValueCache::default()),
        })
    }

    /// Replaces the HTTP transport.
    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = http;
        self
    }

    /// Replaces the key-value cache store.
    pub fn with_cache(mut self, cache: Arc<dyn KeyValueCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn lookup_base_url(&self) -> &str {
        &self.lookup_base_url
    }

    pub fn tokens(&self) -> Arc<dyn TokenProvider> {
        Arc::clone(&self.tokens)
    }

    pub fn http(&self) -> Arc<dyn HttpClient> {
        Arc::clone(&self.http)
    }

    pub fn cache(&self) -> Arc<dyn KeyValueCache> {
        Arc::clone(&self.cache)
    }
}
