//! Cache Store Module
//!
//! Single-threaded cache engine: recency tracking, memory accounting and the
//! dual-bound eviction decision. Locking and notification live in `shared`.

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Eviction, EvictionReason, LruTracker};

// == Cache Store ==
/// Bounded LRU storage with an entry-count limit and a payload-memory limit.
///
/// `None` for either limit means unbounded. Every mutating operation returns
/// the entries that left the cache so the caller can notify after unlocking.
#[derive(Debug)]
pub struct CacheStore {
    /// Recency list and key index
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries, None = unbounded
    max_entries: Option<usize>,
    /// Maximum sum of payload bytes, None = unbounded
    max_memory: Option<u64>,
    /// Sum of payload bytes of all live entries
    current_memory: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of entries, 0 = no limit
    /// * `max_memory` - Maximum total payload bytes, 0 = no limit
    pub fn new(max_entries: usize, max_memory: u64) -> Self {
        Self {
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: (max_entries > 0).then_some(max_entries),
            max_memory: (max_memory > 0).then_some(max_memory),
            current_memory: 0,
        }
    }

    // Free memory under the bound is at least `size` bytes.
    fn has_room_for(&self, size: u64) -> bool {
        match self.max_memory {
            Some(max) => max.saturating_sub(self.current_memory) >= size,
            None => true,
        }
    }

    fn evict_oldest(&mut self, reason: EvictionReason) -> Option<Eviction> {
        let entry = self.lru.evict_oldest()?;
        self.current_memory -= entry.size();
        debug!(key = %entry.key, size = entry.size(), %reason, "evicted cache entry");
        Some(Eviction::new(entry, reason))
    }

    // == Add ==
    /// Inserts a new entry or refreshes an existing one.
    ///
    /// A payload larger than the memory bound is rejected silently. Otherwise
    /// least recently used entries are evicted until the payload fits, the
    /// entry is placed at the front, and the entry-count bound is enforced.
    ///
    /// A refresh replaces the payload and charges only the difference, so the
    /// memory figure always equals the sum of live payload lengths.
    pub fn add(&mut self, key: String, payload: Vec<u8>) -> Vec<Eviction> {
        let size = payload.len() as u64;
        let mut evicted = Vec::new();

        if self.max_memory.is_some_and(|max| size > max) {
            debug!(key = %key, size, "rejected payload larger than memory bound");
            self.stats.record_rejection();
            return evicted;
        }

        // A refreshed entry moves to the front and releases its old payload
        // first, so the loop below never evicts the key being written.
        if self.lru.touch(&key) {
            if let Some(entry) = self.lru.get_mut(&key) {
                self.current_memory -= entry.size();
                entry.payload = Vec::new();
            }
        }

        while !self.has_room_for(size) {
            match self.evict_oldest(EvictionReason::FullMemory) {
                Some(eviction) => {
                    self.stats.record_eviction();
                    evicted.push(eviction);
                }
                // Unreachable with exact accounting, kept to bound the loop.
                None => return evicted,
            }
        }

        match self.lru.get_mut(&key) {
            Some(entry) => entry.payload = payload,
            None => self.lru.push_front(CacheEntry::new(key, payload)),
        }
        self.current_memory += size;

        if self.max_entries.is_some_and(|max| self.lru.len() > max) {
            if let Some(eviction) = self.evict_oldest(EvictionReason::FullEntries) {
                self.stats.record_eviction();
                evicted.push(eviction);
            }
        }

        evicted
    }

    // == Get ==
    /// Returns a copy of the payload and marks the entry most recently used.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        if self.lru.touch(key) {
            self.stats.record_hit();
            self.lru.get(key).map(|entry| entry.payload.clone())
        } else {
            self.stats.record_miss();
            None
        }
    }

    // == Remove ==
    /// Removes the named entry if present.
    pub fn remove(&mut self, key: &str) -> Option<Eviction> {
        let entry = self.lru.remove(key)?;
        self.current_memory -= entry.size();
        Some(Eviction::new(entry, EvictionReason::ByUser))
    }

    // == Remove Oldest ==
    /// Removes the least recently used entry if the store is non-empty.
    pub fn remove_oldest(&mut self) -> Option<Eviction> {
        self.evict_oldest(EvictionReason::ByUser)
    }

    // == Clear ==
    /// Removes every entry. The store stays usable afterwards.
    pub fn clear(&mut self) -> Vec<Eviction> {
        self.current_memory = 0;
        self.lru
            .drain()
            .into_iter()
            .map(|entry| Eviction::new(entry, EvictionReason::Cleared))
            .collect()
    }

    // == Accessors ==
    pub fn len(&self) -> usize {
        self.lru.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lru.is_empty()
    }

    /// Membership test that leaves recency untouched.
    pub fn contains(&self, key: &str) -> bool {
        self.lru.contains(key)
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.lru.keys()
    }

    /// Current sum of payload bytes.
    pub fn memory_usage(&self) -> u64 {
        self.current_memory
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    pub fn max_memory(&self) -> Option<u64> {
        self.max_memory
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_usage(self.lru.len(), self.current_memory);
        stats
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys_of(evicted: &[Eviction]) -> Vec<(&str, EvictionReason)> {
        evicted
            .iter()
            .map(|e| (e.entry.key.as_str(), e.reason))
            .collect()
    }

    #[test]
    fn test_store_new_maps_zero_to_unbounded() {
        let store = CacheStore::new(0, 0);
        assert_eq!(store.max_entries(), None);
        assert_eq!(store.max_memory(), None);
        assert!(store.is_empty());
        assert_eq!(store.memory_usage(), 0);
    }

    #[test]
    fn test_store_new_keeps_bounds() {
        let store = CacheStore::new(3, 100);
        assert_eq!(store.max_entries(), Some(3));
        assert_eq!(store.max_memory(), Some(100));
    }

    #[test]
    fn test_store_add_and_get() {
        let mut store = CacheStore::new(10, 0);

        assert!(store.add("key1".to_string(), b"value1".to_vec()).is_empty());

        assert_eq!(store.get("key1"), Some(b"value1".to_vec()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.memory_usage(), 6);
    }

    #[test]
    fn test_store_get_missing_has_no_side_effects() {
        let mut store = CacheStore::new(10, 0);
        store.add("a".to_string(), vec![1]);
        store.add("b".to_string(), vec![2]);

        assert_eq!(store.get("nope"), None);
        assert_eq!(store.keys(), vec!["b", "a"]);
    }

    #[test]
    fn test_store_entry_bound_evicts_oldest() {
        let mut store = CacheStore::new(2, 0);

        store.add("a".to_string(), vec![1]);
        store.add("b".to_string(), vec![1]);
        let evicted = store.add("c".to_string(), vec![1]);

        assert_eq!(keys_of(&evicted), vec![("a", EvictionReason::FullEntries)]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a"), None);
        assert_eq!(store.memory_usage(), 2);
    }

    #[test]
    fn test_store_memory_bound_evicts_before_insert() {
        let mut store = CacheStore::new(0, 10);

        store.add("x".to_string(), vec![0; 6]);
        let evicted = store.add("y".to_string(), vec![0; 6]);

        assert_eq!(keys_of(&evicted), vec![("x", EvictionReason::FullMemory)]);
        assert_eq!(store.memory_usage(), 6);
        assert_eq!(store.keys(), vec!["y"]);
    }

    #[test]
    fn test_store_memory_bound_evicts_several() {
        let mut store = CacheStore::new(0, 10);

        store.add("a".to_string(), vec![0; 3]);
        store.add("b".to_string(), vec![0; 3]);
        store.add("c".to_string(), vec![0; 3]);
        let evicted = store.add("d".to_string(), vec![0; 8]);

        assert_eq!(
            keys_of(&evicted),
            vec![
                ("a", EvictionReason::FullMemory),
                ("b", EvictionReason::FullMemory),
                ("c", EvictionReason::FullMemory),
            ]
        );
        assert_eq!(store.memory_usage(), 8);
    }

    #[test]
    fn test_store_exact_fit_does_not_evict() {
        let mut store = CacheStore::new(0, 10);

        store.add("a".to_string(), vec![0; 4]);
        let evicted = store.add("b".to_string(), vec![0; 6]);

        assert!(evicted.is_empty());
        assert_eq!(store.memory_usage(), 10);
    }

    #[test]
    fn test_store_rejects_oversized_payload() {
        let mut store = CacheStore::new(0, 5);
        store.add("small".to_string(), vec![0; 2]);

        let evicted = store.add("z".to_string(), vec![0; 6]);

        assert!(evicted.is_empty());
        assert!(!store.contains("z"));
        assert!(store.contains("small"));
        assert_eq!(store.memory_usage(), 2);
        assert_eq!(store.stats().rejected, 1);
    }

    #[test]
    fn test_store_oversized_refresh_keeps_old_payload() {
        let mut store = CacheStore::new(0, 5);
        store.add("k".to_string(), vec![1, 2]);

        store.add("k".to_string(), vec![0; 6]);

        assert_eq!(store.get("k"), Some(vec![1, 2]));
        assert_eq!(store.memory_usage(), 2);
    }

    #[test]
    fn test_store_refresh_charges_only_new_length() {
        let mut store = CacheStore::new(0, 0);

        store.add("k".to_string(), vec![0; 10]);
        store.add("k".to_string(), vec![0; 4]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.memory_usage(), 4);
        assert_eq!(store.get("k"), Some(vec![0; 4]));
    }

    #[test]
    fn test_store_refresh_moves_to_front() {
        let mut store = CacheStore::new(2, 0);

        store.add("a".to_string(), vec![1]);
        store.add("b".to_string(), vec![1]);
        store.add("a".to_string(), vec![2]);
        let evicted = store.add("c".to_string(), vec![1]);

        assert_eq!(keys_of(&evicted), vec![("b", EvictionReason::FullEntries)]);
        assert_eq!(store.keys(), vec!["c", "a"]);
    }

    #[test]
    fn test_store_refresh_of_oldest_never_evicts_itself() {
        let mut store = CacheStore::new(0, 10);

        store.add("old".to_string(), vec![0; 4]);
        store.add("new".to_string(), vec![0; 4]);
        // "old" is at the back; growing it must push out "new" instead.
        let evicted = store.add("old".to_string(), vec![0; 8]);

        assert_eq!(keys_of(&evicted), vec![("new", EvictionReason::FullMemory)]);
        assert_eq!(store.keys(), vec!["old"]);
        assert_eq!(store.memory_usage(), 8);
    }

    #[test]
    fn test_store_same_payload_twice_is_idempotent() {
        let mut store = CacheStore::new(0, 0);
        store.add("a".to_string(), vec![7; 3]);
        store.add("b".to_string(), vec![7; 3]);

        store.add("a".to_string(), vec![7; 3]);
        store.add("a".to_string(), vec![7; 3]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.keys(), vec!["a", "b"]);
        assert_eq!(store.memory_usage(), 6);
    }

    #[test]
    fn test_store_get_refreshes_recency() {
        let mut store = CacheStore::new(2, 0);

        store.add("a".to_string(), vec![1]);
        store.get("a");
        store.add("b".to_string(), vec![1]);
        store.get("a");
        let evicted = store.add("c".to_string(), vec![1]);

        assert_eq!(keys_of(&evicted), vec![("b", EvictionReason::FullEntries)]);
        assert!(store.contains("a"));
    }

    #[test]
    fn test_store_zero_length_payload() {
        let mut store = CacheStore::new(0, 1);

        store.add("empty".to_string(), Vec::new());
        store.add("one".to_string(), vec![1]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.memory_usage(), 1);
        assert_eq!(store.get("empty"), Some(Vec::new()));
    }

    #[test]
    fn test_store_remove() {
        let mut store = CacheStore::new(0, 0);
        store.add("a".to_string(), vec![0; 3]);

        let removed = store.remove("a").unwrap();
        assert_eq!(removed.reason, EvictionReason::ByUser);
        assert_eq!(removed.entry.payload, vec![0; 3]);
        assert!(store.is_empty());
        assert_eq!(store.memory_usage(), 0);

        assert!(store.remove("a").is_none());
    }

    #[test]
    fn test_store_remove_oldest() {
        let mut store = CacheStore::new(0, 0);
        assert!(store.remove_oldest().is_none());

        store.add("a".to_string(), vec![0; 2]);
        store.add("b".to_string(), vec![0; 3]);

        let removed = store.remove_oldest().unwrap();
        assert_eq!(removed.entry.key, "a");
        assert_eq!(removed.reason, EvictionReason::ByUser);
        assert_eq!(store.memory_usage(), 3);
    }

    #[test]
    fn test_store_clear_reports_every_entry() {
        let mut store = CacheStore::new(0, 0);
        store.add("a".to_string(), vec![0; 2]);
        store.add("b".to_string(), vec![0; 3]);

        let cleared = store.clear();

        assert_eq!(
            keys_of(&cleared),
            vec![("b", EvictionReason::Cleared), ("a", EvictionReason::Cleared)]
        );
        assert!(store.is_empty());
        assert_eq!(store.memory_usage(), 0);

        store.add("c".to_string(), vec![0; 1]);
        assert_eq!(store.keys(), vec!["c"]);
        assert_eq!(store.memory_usage(), 1);
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new(1, 0);

        store.add("a".to_string(), vec![0; 4]);
        store.get("a");
        store.get("missing");
        store.add("b".to_string(), vec![0; 2]);

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.memory_bytes, 2);
    }

    #[test]
    fn test_store_user_removals_are_not_counted_as_evictions() {
        let mut store = CacheStore::new(0, 0);
        store.add("a".to_string(), vec![1]);
        store.add("b".to_string(), vec![1]);
        store.remove("a");
        store.remove_oldest();
        store.clear();

        assert_eq!(store.stats().evictions, 0);
    }
}
