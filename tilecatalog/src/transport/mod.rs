//! Transport collaborator: HTTP client abstraction, bearer-token provider
//! and the versioned request builder.
//!
//! The client never talks to `reqwest` directly; everything goes through
//! the [`HttpClient`] trait so tests can substitute a mock transport.
//! Timeouts, retries and cancellation all live here or below, never in the
//! resolution layers above.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Boxed future type for dyn-compatible async methods.
pub use futures::future::BoxFuture;

/// Default timeout for outbound requests (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User-Agent sent with every outbound request.
const USER_AGENT: &str = concat!("tilecatalog/", env!("CARGO_PKG_VERSION"));

/// Errors produced by the transport collaborator.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Failed to construct the underlying HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    /// The request could not be sent or the connection failed.
    #[error("Request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The bearer-token provider failed.
    #[error("Failed to acquire bearer token: {0}")]
    Token(String),
}

/// Trait for HTTP GET operations.
///
/// The abstraction keeps the resolution layers independent of the actual
/// transport and enables mock clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request with a bearer token, returning the raw
    /// response body.
    fn get(&self, url: &str, token: &str) -> BoxFuture<'_, Result<Vec<u8>, TransportError>>;
}

/// Produces a valid bearer token for each outbound request.
///
/// How the token is obtained or refreshed is outside this client; OAuth
/// flows belong to the implementor.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> BoxFuture<'_, Result<String, TransportError>>;
}

/// Token provider returning a fixed string. Useful for tests and for
/// deployments with long-lived tokens.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn token(&self) -> BoxFuture<'_, Result<String, TransportError>> {
        Box::pin(async move { Ok(self.token.clone()) })
    }
}

/// Real HTTP client implementation using reqwest.
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

impl HttpClient for AsyncReqwestClient {
    fn get(&self, url: &str, token: &str) -> BoxFuture<'_, Result<Vec<u8>, TransportError>> {
        let url = url.to_string();
        let token = token.to_string();
        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .bearer_auth(&token)
                .send()
                .await
                .map_err(|e| TransportError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    url,
                });
            }

            response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|e| TransportError::Request(e.to_string()))
        })
    }
}

/// Request builder bound to one resolved base URL.
///
/// Joins paths, acquires a token per request and decodes JSON responses.
/// Constructed by the endpoint resolver once the base URL for a catalog
/// API is known.
#[derive(Clone)]
pub struct RequestBuilder {
    base_url: String,
    http: Arc<dyn HttpClient>,
    tokens: Arc<dyn TokenProvider>,
}

impl RequestBuilder {
    pub fn new(
        base_url: impl Into<String>,
        http: Arc<dyn HttpClient>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http,
            tokens,
        }
    }

    /// The base URL this builder is bound to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins a path-and-query fragment onto the base URL.
    pub fn url(&self, path_and_query: &str) -> String {
        format!(
            "{}/{}",
            self.base_url,
            path_and_query.trim_start_matches('/')
        )
    }

    /// GETs a JSON resource and decodes it.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
    ) -> Result<T, TransportError> {
        let body = self.get_bytes(path_and_query).await?;
        serde_json::from_slice(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }

    /// GETs a raw resource body.
    pub async fn get_bytes(&self, path_and_query: &str) -> Result<Vec<u8>, TransportError> {
        let url = self.url(path_and_query);
        let token = self
            .tokens
            .token()
            .await
            .map_err(|e| TransportError::Token(e.to_string()))?;
        self.http.get(&url, &token).await
    }
}

/// Assembles a query string from `(name, value)` pairs, skipping empty
/// sets. Values are percent-encoded; names are fixed identifiers and
/// pass through as-is.
pub fn query_string(params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let joined = params
        .iter()
        .map(|(name, value)| format!("{}={}", name, encode_query_value(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("?{}", joined)
}

/// Bytes that travel unescaped in a query value. Commas separate
/// `additionalFields` entries and colons appear in catalog HRNs; both are
/// legal in a query component per RFC 3986.
fn is_query_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~' | b',' | b':')
}

fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        if is_query_safe(byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}
