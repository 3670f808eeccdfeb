//! Crate-wide error taxonomy.
//!
//! Every resolution stage surfaces exactly one error kind; the orchestrator
//! short-circuits on the first failing stage and never returns partial
//! results. Cache-write failures are deliberately absent here: the cache is
//! best-effort and write failures are logged, never escalated.

use thiserror::Error;

use crate::hrn::HrnError;
use crate::quadkey::{MortonCodeError, QuadKeyError};

/// Convenience alias used throughout the client.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by catalog read operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Malformed request, rejected before any cache or network access.
    #[error("{0}")]
    Validation(String),

    /// The metadata service reported no usable catalog version.
    #[error("Please provide correct catalog version")]
    VersionUnavailable,

    /// Transport failure while resolving the latest catalog version.
    #[error("Error getting the last catalog version: {0}")]
    VersionLookup(String),

    /// The lookup response carried no entry for the requested API.
    #[error("No base URL found for api {api:?} in catalog {catalog}")]
    EndpointNotFound { api: String, catalog: String },

    /// The lookup service call itself failed.
    #[error("Lookup service error: {0}")]
    LookupService(String),

    /// A resolved endpoint rejected or failed the request. Surfaced
    /// verbatim from the transport; no retry happens at this layer.
    #[error("Network fetch failed: {0}")]
    NetworkFetch(String),

    /// The statistics API rejected or failed a summary or coverage read.
    #[error("Statistic Service error: {0}")]
    StatisticsService(String),

    /// A partition or quad lookup succeeded but yielded no data handle.
    #[error("No data handle found for partition {0:?}")]
    DataHandleNotFound(String),

    #[error(transparent)]
    Hrn(#[from] HrnError),

    #[error(transparent)]
    QuadKey(#[from] QuadKeyError),

    #[error(transparent)]
    MortonCode(#[from] MortonCodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_lookup_message() {
        let err = ClientError::VersionLookup("Unknown error".to_string());
        assert_eq!(
            err.to_string(),
            "Error getting the last catalog version: Unknown error"
        );
    }

    #[test]
    fn test_version_unavailable_message() {
        let err = ClientError::VersionUnavailable;
        assert_eq!(err.to_string(), "Please provide correct catalog version");
    }

    #[test]
    fn test_validation_passes_message_through() {
        let err = ClientError::Validation("Please provide correct QuadKey".to_string());
        assert_eq!(err.to_string(), "Please provide correct QuadKey");
    }

    #[test]
    fn test_statistics_service_message() {
        let err = ClientError::StatisticsService("HTTP 500 from https://s.example.com".to_string());
        assert_eq!(
            err.to_string(),
            "Statistic Service error: HTTP 500 from https://s.example.com"
        );
    }

    #[test]
    fn test_quad_key_error_converts() {
        let err: ClientError = QuadKeyError::InvalidLevel(40).into();
        assert!(matches!(err, ClientError::QuadKey(_)));
    }
}
