//! Cache-aside repository for partition metadata.
//!
//! Isolates every other component from the cache key format. Keys are
//! a durable contract when cache contents are shared across processes:
//!
//! - single partition: `<hrn>::<layer>::[<version>::]<partitionId>::partition`
//! - collection:       `<hrn>::<layer>::[<version>::]partitions`
//!
//! The literal `partition` / `partitions` suffix keeps single-partition
//! keys from ever colliding with collection keys for the same coordinates.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::traits::KeyValueCache;
use crate::hrn::CatalogHrn;
use crate::model::PartitionMetadata;
use crate::request::PartitionsRequest;

/// Caches partition metadata in a key-value store.
pub struct MetadataCacheRepository {
    cache: Arc<dyn KeyValueCache>,
}

impl MetadataCacheRepository {
    pub fn new(cache: Arc<dyn KeyValueCache>) -> Self {
        Self { cache }
    }

    /// Builds the cache key for a partition collection or, when
    /// `partition_id` is given, for a single partition.
    ///
    /// Pure function: identical coordinates always produce identical keys,
    /// distinct coordinates never collide.
    pub fn build_key(
        hrn: &CatalogHrn,
        layer_id: &str,
        version: Option<u64>,
        partition_id: Option<&str>,
    ) -> String {
        let mut key = format!("{}::{}::", hrn, layer_id);
        if let Some(version) = version {
            key.push_str(&version.to_string());
            key.push_str("::");
        }
        match partition_id {
            Some(id) => {
                key.push_str(id);
                key.push_str("::partition");
            }
            None => key.push_str("partitions"),
        }
        key
    }

    /// Stores fetched partition metadata.
    ///
    /// Id-based requests store each partition under its own key so later
    /// requests for other id subsets can still hit; requests without ids
    /// store the whole collection under one key. Returns `false` if any
    /// write failed; failures are best-effort and must not fail the read
    /// path.
    pub fn put(
        &self,
        request: &PartitionsRequest,
        hrn: &CatalogHrn,
        layer_id: &str,
        partitions: &[PartitionMetadata],
    ) -> bool {
        if request.partition_ids().is_some() {
            let mut ok = true;
            for metadata in partitions {
                let key = Self::build_key(hrn, layer_id, request.version(), Some(&metadata.partition));
                match serde_json::to_string(metadata) {
                    Ok(serialized) => ok &= self.cache.put(&key, serialized),
                    Err(e) => {
                        warn!(error = %e, key = %key, "Failed to serialize partition metadata");
                        ok = false;
                    }
                }
            }
            return ok;
        }

        let key = Self::build_key(hrn, layer_id, request.version(), None);
        match serde_json::to_string(partitions) {
            Ok(serialized) => self.cache.put(&key, serialized),
            Err(e) => {
                warn!(error = %e, key = %key, "Failed to serialize partition collection");
                false
            }
        }
    }

    /// Looks up partition metadata for a request.
    ///
    /// Id-based requests resolve each id individually with all-or-nothing
    /// semantics: if any requested id is missing the whole lookup is a
    /// miss, so callers never merge partial cache hits with network
    /// results. Undecodable cached entries count as misses.
    pub fn get(
        &self,
        request: &PartitionsRequest,
        hrn: &CatalogHrn,
        layer_id: &str,
    ) -> Option<Vec<PartitionMetadata>> {
        if let Some(partition_ids) = request.partition_ids() {
            let mut available = Vec::with_capacity(partition_ids.len());
            for partition_id in partition_ids {
                let key = Self::build_key(hrn, layer_id, request.version(), Some(partition_id));
                let serialized = self.cache.get(&key)?;
                match serde_json::from_str::<PartitionMetadata>(&serialized) {
                    Ok(metadata) => available.push(metadata),
                    Err(e) => {
                        debug!(error = %e, key = %key, "Discarding undecodable cache entry");
                        return None;
                    }
                }
            }
            return Some(available);
        }

        let key = Self::build_key(hrn, layer_id, request.version(), None);
        let serialized = self.cache.get(&key)?;
        match serde_json::from_str(&serialized) {
            Ok(partitions) => Some(partitions),
            Err(e) => {
                debug!(error = %e, key = %key, "Discarding undecodable cache entry");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::cache::memory::MemoryKeyValueCache;

    fn test_hrn() -> CatalogHrn {
        CatalogHrn::from_string("hrn:geo:data:::test-catalog").unwrap()
    }

    fn partition(id: &str, data_handle: &str) -> PartitionMetadata {
        PartitionMetadata {
            partition: id.to_string(),
            data_handle: data_handle.to_string(),
            version: Some(2),
            data_size: None,
            compressed_data_size: None,
            checksum: None,
            crc: None,
        }
    }

    fn repository() -> MetadataCacheRepository {
        MetadataCacheRepository::new(Arc::new(MemoryKeyValueCache::default()))
    }

    #[test]
    fn test_build_key_single_partition() {
        let key = MetadataCacheRepository::build_key(&test_hrn(), "layer-1", Some(42), Some("100"));
        assert_eq!(key, "hrn:geo:data:::test-catalog::layer-1::42::100::partition");
    }

    #[test]
    fn test_build_key_collection() {
        let key = MetadataCacheRepository::build_key(&test_hrn(), "layer-1", Some(42), None);
        assert_eq!(key, "hrn:geo:data:::test-catalog::layer-1::42::partitions");
    }

    #[test]
    fn test_build_key_omits_absent_version() {
        let key = MetadataCacheRepository::build_key(&test_hrn(), "layer-1", None, None);
        assert_eq!(key, "hrn:geo:data:::test-catalog::layer-1::partitions");
    }

    #[test]
    fn test_build_key_collision_freedom() {
        let hrn = test_hrn();
        let keys = [
            MetadataCacheRepository::build_key(&hrn, "layer-1", None, None),
            MetadataCacheRepository::build_key(&hrn, "layer-1", None, Some("100")),
            MetadataCacheRepository::build_key(&hrn, "layer-1", Some(1), None),
            MetadataCacheRepository::build_key(&hrn, "layer-1", Some(1), Some("100")),
            MetadataCacheRepository::build_key(&hrn, "layer-1", Some(1), Some("1000")),
            MetadataCacheRepository::build_key(&hrn, "layer-2", Some(1), Some("100")),
        ];

        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_build_key_deterministic() {
        let a = MetadataCacheRepository::build_key(&test_hrn(), "layer-1", Some(7), Some("13"));
        let b = MetadataCacheRepository::build_key(&test_hrn(), "layer-1", Some(7), Some("13"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_put_then_get_by_ids() {
        let repo = repository();
        let hrn = test_hrn();
        let request = PartitionsRequest::new()
            .with_version(42)
            .with_partition_ids(vec!["100".to_string(), "1000".to_string()]);
        let stored = vec![partition("100", "handle-a"), partition("1000", "handle-b")];

        assert!(repo.put(&request, &hrn, "layer-1", &stored));

        let mut fetched = repo.get(&request, &hrn, "layer-1").unwrap();
        fetched.sort_by(|a, b| a.partition.cmp(&b.partition));
        assert_eq!(fetched, stored);
    }

    #[test]
    fn test_get_by_ids_all_or_nothing() {
        let repo = repository();
        let hrn = test_hrn();

        // Only partition 100 makes it into the cache.
        let put_request = PartitionsRequest::new().with_partition_ids(vec!["100".to_string()]);
        repo.put(&put_request, &hrn, "layer-1", &[partition("100", "handle-a")]);

        let get_request = PartitionsRequest::new()
            .with_partition_ids(vec!["100".to_string(), "1000".to_string()]);
        assert!(repo.get(&get_request, &hrn, "layer-1").is_none());
    }

    #[test]
    fn test_put_then_get_collection() {
        let repo = repository();
        let hrn = test_hrn();
        let request = PartitionsRequest::new();
        let stored = vec![partition("100", "handle-a"), partition("1000", "handle-b")];

        assert!(repo.put(&request, &hrn, "layer-1", &stored));
        assert_eq!(repo.get(&request, &hrn, "layer-1").unwrap(), stored);
    }

    #[test]
    fn test_collection_and_single_keys_do_not_alias() {
        let repo = repository();
        let hrn = test_hrn();

        // Store a collection; an id-based lookup for the same coordinates
        // must not see it.
        let collection_request = PartitionsRequest::new();
        repo.put(
            &collection_request,
            &hrn,
            "layer-1",
            &[partition("100", "handle-a")],
        );

        let id_request = PartitionsRequest::new().with_partition_ids(vec!["100".to_string()]);
        assert!(repo.get(&id_request, &hrn, "layer-1").is_none());
    }

    #[test]
    fn test_get_miss_on_empty_cache() {
        let repo = repository();
        assert!(repo.get(&PartitionsRequest::new(), &test_hrn(), "layer-1").is_none());
    }

    #[test]
    fn test_undecodable_entry_counts_as_miss() {
        let cache = Arc::new(MemoryKeyValueCache::default());
        let hrn = test_hrn();
        let key = MetadataCacheRepository::build_key(&hrn, "layer-1", None, None);
        cache.put(&key, "not json".to_string());

        let repo = MetadataCacheRepository::new(cache);
        assert!(repo.get(&PartitionsRequest::new(), &hrn, "layer-1").is_none());
    }

    #[test]
    fn test_put_reports_write_failures() {
        /// Cache that rejects every write.
        struct RejectingCache;

        impl KeyValueCache for RejectingCache {
            fn get(&self, _key: &str) -> Option<String> {
                None
            }
            fn put(&self, _key: &str, _value: String) -> bool {
                false
            }
        }

        let repo = MetadataCacheRepository::new(Arc::new(RejectingCache));
        let request = PartitionsRequest::new().with_partition_ids(vec!["100".to_string()]);

        let ok = repo.put(&request, &test_hrn(), "layer-1", &[partition("100", "h")]);
        assert!(!ok);

        // A failed write leaves the read path on the miss branch.
        assert!(repo.get(&request, &test_hrn(), "layer-1").is_none());
    }
}
