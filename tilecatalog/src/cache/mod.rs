//! Key-value cache interface, default in-memory provider and the
//! partition-metadata cache repository.

mod memory;
pub mod repository;
mod traits;

pub use memory::MemoryKeyValueCache;
pub use repository::MetadataCacheRepository;
pub use traits::KeyValueCache;
