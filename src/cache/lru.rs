//! LRU Tracker Module
//!
//! Recency list plus key index for LRU eviction.
//!
//! Entries live in a generational arena and are threaded into a doubly-linked
//! list through arena indices. The key index maps each key to the arena slot
//! of its node, so every key has exactly one node and every node one key.

use std::collections::HashMap;

use generational_arena::{Arena, Index};

use crate::cache::CacheEntry;

#[derive(Debug)]
struct Node {
    entry: CacheEntry,
    prev: Option<Index>,
    next: Option<Index>,
}

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// All operations are O(1) except `keys`.
#[derive(Debug)]
pub struct LruTracker {
    nodes: Arena<Node>,
    index: HashMap<String, Index>,
    head: Option<Index>,
    tail: Option<Index>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            nodes: Arena::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
        }
    }

    // Detaches a node from its neighbours. Arena and index are left alone.
    fn unlink(&mut self, idx: Index) {
        let (prev, next) = {
            let node = &self.nodes[idx];
            (node.prev, node.next)
        };

        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
    }

    fn link_front(&mut self, idx: Index) {
        let old_head = self.head;
        {
            let node = &mut self.nodes[idx];
            node.prev = None;
            node.next = old_head;
        }
        if let Some(h) = old_head {
            self.nodes[h].prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    // == Push Front ==
    /// Inserts a new entry as the most recently used one.
    ///
    /// The caller guarantees the key is not tracked yet.
    pub fn push_front(&mut self, entry: CacheEntry) {
        debug_assert!(!self.index.contains_key(&entry.key));
        let key = entry.key.clone();
        let idx = self.nodes.insert(Node {
            entry,
            prev: None,
            next: None,
        });
        self.index.insert(key, idx);
        self.link_front(idx);
    }

    // == Touch ==
    /// Marks a key as recently used (moves to front).
    ///
    /// Returns false if the key is not tracked.
    pub fn touch(&mut self, key: &str) -> bool {
        let Some(&idx) = self.index.get(key) else {
            return false;
        };
        if self.head != Some(idx) {
            self.unlink(idx);
            self.link_front(idx);
        }
        true
    }

    // == Get ==
    /// Looks up an entry without changing its recency.
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.index.get(key).map(|&idx| &self.nodes[idx].entry)
    }

    /// Mutable lookup without changing recency.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut CacheEntry> {
        let idx = *self.index.get(key)?;
        self.nodes.get_mut(idx).map(|node| &mut node.entry)
    }

    // == Remove ==
    /// Removes a key from the tracker, returning its entry.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let idx = self.index.remove(key)?;
        self.unlink(idx);
        self.nodes.remove(idx).map(|node| node.entry)
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<CacheEntry> {
        let idx = self.tail?;
        self.unlink(idx);
        let node = self.nodes.remove(idx)?;
        self.index.remove(&node.entry.key);
        Some(node.entry)
    }

    // == Peek Oldest ==
    /// Returns the least recently used entry without removing it.
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&CacheEntry> {
        self.tail.map(|idx| &self.nodes[idx].entry)
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Keys ==
    /// Returns keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = &self.nodes[idx];
            keys.push(node.entry.key.clone());
            cursor = node.next;
        }
        keys
    }

    // == Drain ==
    /// Empties the tracker, returning entries from most to least recently used.
    pub fn drain(&mut self) -> Vec<CacheEntry> {
        let mut entries = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            match self.nodes.remove(idx) {
                Some(node) => {
                    cursor = node.next;
                    entries.push(node.entry);
                }
                None => break,
            }
        }
        self.nodes.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
        entries
    }
}

impl Default for LruTracker {
    fn default() -> Self {
        Self::new()
    }
}
