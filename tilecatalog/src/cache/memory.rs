//! In-memory cache provider using moka.
//!
//! Default [`KeyValueCache`] implementation: a size-bounded, lock-free
//! in-memory cache with automatic LRU eviction. Entries are weighed by
//! their key plus value length, so the configured limit approximates
//! actual memory use.

use std::time::Duration;

use moka::sync::Cache as MokaCache;

use crate::cache::traits::KeyValueCache;

/// Default maximum size for the in-memory cache (32 MiB of metadata).
const DEFAULT_MAX_SIZE_BYTES: u64 = 32 * 1024 * 1024;

/// Size-bounded in-memory key-value cache.
pub struct MemoryKeyValueCache {
    cache: MokaCache<String, String>,
}

impl MemoryKeyValueCache {
    /// Creates a cache bounded to `max_size_bytes`, with an optional
    /// time-to-live for entries.
    pub fn new(max_size_bytes: u64, ttl: Option<Duration>) -> Self {
        let mut builder = MokaCache::builder()
            .weigher(|key: &String, value: &String| -> u32 {
                (key.len() + value.len()).min(u32::MAX as usize) as u32
            })
            .max_capacity(max_size_bytes);

        if let Some(ttl_duration) = ttl {
            builder = builder.time_to_live(ttl_duration);
        }

        Self {
            cache: builder.build(),
        }
    }

    /// Current number of entries.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Current weighted size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.cache.weighted_size()
    }
}

impl Default for MemoryKeyValueCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE_BYTES, None)
    }
}

impl KeyValueCache for MemoryKeyValueCache {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key)
    }

    fn put(&self, key: &str, value: String) -> bool {
        self.cache.insert(key.to_string(), value);
        true
    }
}
