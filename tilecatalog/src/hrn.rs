//! Catalog handle (HRN) parsing.
//!
//! An HRN is a structured resource name of the form
//! `hrn:<partition>:<service>:<region>:<account>:<resource>`, e.g.
//! `hrn:geo:data:::test-catalog`. Two handles are equal iff their string
//! forms are equal; the string form is also a cache-key component, so
//! `Display` must round-trip exactly.

use std::fmt;

use thiserror::Error;

/// Errors for malformed catalog HRNs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HrnError {
    /// The string does not start with the `hrn:` scheme.
    #[error("Invalid HRN {0:?}: must start with \"hrn:\"")]
    MissingScheme(String),

    /// The string has fewer than six colon-separated segments.
    #[error("Invalid HRN {0:?}: expected hrn:<partition>:<service>:<region>:<account>:<resource>")]
    TooFewSegments(String),

    /// The resource segment is empty.
    #[error("Invalid HRN {0:?}: resource segment is empty")]
    EmptyResource(String),
}

/// An immutable, opaque identifier for a catalog.
///
/// Equality and hashing use the canonical string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogHrn {
    raw: String,
}

impl CatalogHrn {
    /// Parses a catalog HRN from its string form.
    pub fn from_string(raw: &str) -> Result<Self, HrnError> {
        let rest = raw
            .strip_prefix("hrn:")
            .ok_or_else(|| HrnError::MissingScheme(raw.to_string()))?;

        // partition:service:region:account:resource, resource may itself
        // contain colons.
        let segments: Vec<&str> = rest.splitn(5, ':').collect();
        if segments.len() < 5 {
            return Err(HrnError::TooFewSegments(raw.to_string()));
        }
        if segments[4].is_empty() {
            return Err(HrnError::EmptyResource(raw.to_string()));
        }

        Ok(CatalogHrn {
            raw: raw.to_string(),
        })
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The trailing resource segment (the catalog id).
    pub fn resource(&self) -> &str {
        // from_string guarantees five segments after the scheme.
        self.raw
            .strip_prefix("hrn:")
            .and_then(|rest| rest.splitn(5, ':').nth(4))
            .unwrap_or(&self.raw)
    }
}

impl fmt::Display for CatalogHrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
