//! Shared Cache Handle
//!
//! Thread-safe front end over `CacheStore`.
//!
//! Lock discipline: every mutation runs under the write lock and collects the
//! entries that left the cache. The lock is released before the eviction
//! callback runs, so a callback may call back into the cache.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::cache::{CacheStats, CacheStore, Eviction, EvictionReason};
use crate::config::Config;

/// Notification hook invoked with (key, payload, reason) for every departing entry.
pub type EvictionCallback = dyn Fn(&str, &[u8], EvictionReason) + Send + Sync;

// State shared by every handle: the store and the notification hook.
struct Shared {
    store: RwLock<CacheStore>,
    on_evicted: RwLock<Option<Arc<EvictionCallback>>>,
}

// == LRU Cache ==
/// Cloneable, thread-safe bounded LRU cache.
///
/// Clones share the same store and the same eviction callback.
#[derive(Clone)]
pub struct LruCache {
    shared: Arc<Shared>,
}

impl LruCache {
    // == Constructor ==
    /// Creates an empty cache. A bound of 0 means no limit.
    ///
    /// # Arguments
    /// * `max_entries` - Maximum number of distinct keys
    /// * `max_memory` - Maximum total payload bytes
    pub fn new(max_entries: usize, max_memory: u64) -> Self {
        Self {
            shared: Arc::new(Shared {
                store: RwLock::new(CacheStore::new(max_entries, max_memory)),
                on_evicted: RwLock::new(None),
            }),
        }
    }

    /// Creates a cache sized from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_entries, config.max_memory)
    }

    // == Eviction Callback ==
    /// Installs the eviction notification hook and returns the handle.
    pub fn on_evicted<F>(self, callback: F) -> Self
    where
        F: Fn(&str, &[u8], EvictionReason) + Send + Sync + 'static,
    {
        self.set_eviction_callback(callback);
        self
    }

    /// Installs or replaces the eviction notification hook for every handle.
    ///
    /// The hook runs on the calling thread after the cache lock is released,
    /// once per departing entry, in the order the entries left. A hook that
    /// owns a clone of this cache keeps the cache alive until it is replaced.
    pub fn set_eviction_callback<F>(&self, callback: F)
    where
        F: Fn(&str, &[u8], EvictionReason) + Send + Sync + 'static,
    {
        let callback: Arc<EvictionCallback> = Arc::new(callback);
        *self.shared.on_evicted.write() = Some(callback);
    }

    fn notify<I>(&self, evicted: I)
    where
        I: IntoIterator<Item = Eviction>,
    {
        let callback = self.shared.on_evicted.read().clone();
        if let Some(callback) = callback {
            for Eviction { entry, reason } in evicted {
                callback(&entry.key, &entry.payload, reason);
            }
        }
    }

    // == Add ==
    /// Inserts or refreshes `key`. Oversized payloads are dropped silently.
    pub fn add(&self, key: impl Into<String>, payload: Vec<u8>) {
        let evicted = self.shared.store.write().add(key.into(), payload);
        self.notify(evicted);
    }

    // == Get ==
    /// Returns the payload for `key` and marks it most recently used.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.shared.store.write().get(key)
    }

    // == Remove ==
    /// Removes `key` if present, notifying with `ByUser`.
    pub fn remove(&self, key: &str) {
        let evicted = self.shared.store.write().remove(key);
        self.notify(evicted);
    }

    /// Removes the least recently used entry, notifying with `ByUser`.
    pub fn remove_oldest(&self) {
        let evicted = self.shared.store.write().remove_oldest();
        self.notify(evicted);
    }

    // == Clear ==
    /// Removes every entry, notifying with `Cleared` for each.
    pub fn clear(&self) {
        let evicted = self.shared.store.write().clear();
        self.notify(evicted);
    }

    // == Read-only Accessors ==
    pub fn len(&self) -> usize {
        self.shared.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.store.read().is_empty()
    }

    /// Membership test that leaves recency untouched.
    pub fn contains(&self, key: &str) -> bool {
        self.shared.store.read().contains(key)
    }

    /// Snapshot of keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.shared.store.read().keys()
    }

    pub fn memory_usage(&self) -> u64 {
        self.shared.store.read().memory_usage()
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.shared.store.read().max_entries()
    }

    pub fn max_memory(&self) -> Option<u64> {
        self.shared.store.read().max_memory()
    }

    pub fn stats(&self) -> CacheStats {
        self.shared.store.read().stats()
    }
}

impl fmt::Debug for LruCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("store", &*self.shared.store.read())
            .field("on_evicted", &self.shared.on_evicted.read().is_some())
            .finish()
    }
}
