//! Cache Module
//!
//! Bounded in-memory LRU cache with an entry-count limit and a memory limit.

mod entry;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, Eviction, EvictionReason};
pub use lru::LruTracker;
pub use shared::{EvictionCallback, LruCache};
pub use stats::CacheStats;
pub use store::CacheStore;
