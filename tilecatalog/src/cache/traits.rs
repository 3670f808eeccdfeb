//! Generic key-value cache interface.
//!
//! The cache store is an external collaborator: the client assumes nothing
//! beyond string get/put. Entries may be evicted at any time at the
//! store's discretion; absence is always a miss, never an error.
//!
//! # String keys and values
//!
//! Keys are structured, human-readable strings (see
//! [`repository`](crate::cache::repository) for the format) so cache
//! contents stay debuggable and can be shared across processes. Values are
//! JSON-serialized metadata.

/// Generic get/put over string keys and string values.
///
/// All implementations must be `Send + Sync`; calls are synchronous and
/// must not block on I/O for long (the read path treats the cache as a
/// fast local store).
pub trait KeyValueCache: Send + Sync {
    /// Retrieves a value by key. `None` means a cache miss, whether the
    /// key was never stored or has since been evicted.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a key-value pair.
    ///
    /// Returns `false` on a non-fatal write failure. Callers must not
    /// depend on writes succeeding.
    fn put(&self, key: &str, value: String) -> bool;
}
