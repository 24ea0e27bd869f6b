//! Cache Entry Module
//!
//! Defines stored records and the reasons an entry can leave the cache.

use std::fmt;

use serde::Serialize;

// == Cache Entry ==
/// A single key/payload record held by the cache.
///
/// The payload length is the entry's memory cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Unique key
    pub key: String,
    /// Opaque payload bytes
    pub payload: Vec<u8>,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(key: String, payload: Vec<u8>) -> Self {
        Self { key, payload }
    }

    // == Size ==
    /// Returns the memory cost of this entry in bytes.
    pub fn size(&self) -> u64 {
        self.payload.len() as u64
    }
}

// == Eviction Reason ==
/// Why an entry left the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionReason {
    /// The entry-count bound was exceeded
    FullEntries,
    /// The memory bound was exceeded
    FullMemory,
    /// Explicit `remove` or `remove_oldest`
    ByUser,
    /// The whole cache was cleared
    Cleared,
}

impl fmt::Display for EvictionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EvictionReason::FullEntries => "removed by full entries",
            EvictionReason::FullMemory => "removed by full memory",
            EvictionReason::ByUser => "removed by user",
            EvictionReason::Cleared => "removed by clear",
        };
        f.write_str(text)
    }
}

// == Eviction ==
/// An entry that has left the cache, tagged with the reason.
///
/// Produced by the store while the lock is held and handed to the
/// notification callback once the lock is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eviction {
    pub entry: CacheEntry,
    pub reason: EvictionReason,
}

impl Eviction {
    pub fn new(entry: CacheEntry, reason: EvictionReason) -> Self {
        Self { entry, reason }
    }
}
