//! Cache Module
//!
//! Read-through in-memory cache with TTL expiry and LRU eviction.

mod bounded;
mod entry;
mod lru;
mod stats;


// Re-export public types
pub use bounded::BoundedCache;
pub use entry::CacheEntry;
pub use lru::LruList;
pub use stats::CacheStats;
