//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with insertion-order tracking
//! and TTL expiration.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, InsertionOrder};

/// Slack allowed between queued order records and live entries before the
/// queue is compacted.
const ORDER_SLACK: usize = 16;

// == Expiring Cache ==
/// Fixed-capacity cache with a single TTL shared by every entry.
///
/// Expired entries are never returned. They are dropped lazily when looked
/// up, or in bulk by [`ExpiringCache::purge_expired`]. When a new key is
/// inserted into a full cache, the oldest-inserted entry is evicted.
///
/// A capacity of zero retains nothing: `put` is a no-op. A TTL of zero makes
/// every lookup a miss.
#[derive(Debug)]
pub struct ExpiringCache<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Insertion order for eviction
    order: InsertionOrder<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Lifetime of every entry
    ttl: Duration,
    /// Generation handed to the next insertion
    next_generation: u64,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new cache with the given capacity and entry TTL.
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            max_entries,
            ttl,
            next_generation: 0,
        }
    }

    // == Get ==
    /// Returns the value for `key` if present and younger than the TTL.
    ///
    /// An expired entry is removed on the spot and counted as a miss.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if !entry.is_expired(self.ttl) {
            let value = entry.value.clone();
            self.stats.record_hit();
            return Some(value);
        }

        self.entries.remove(key);
        self.stats.record_expirations(1);
        self.stats.record_miss();
        self.stats.set_total_entries(self.entries.len());
        None
    }

    // == Put ==
    /// Inserts or overwrites `key`, stamping it with the current instant.
    ///
    /// Overwriting moves the key to the newest insertion position and never
    /// evicts. Inserting a new key into a full cache evicts exactly one entry,
    /// the oldest inserted.
    pub fn put(&mut self, key: K, value: V) {
        if self.max_entries == 0 {
            return;
        }

        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite && self.entries.len() >= self.max_entries && self.evict_oldest().is_some()
        {
            self.stats.record_eviction();
        }

        let generation = self.next_generation;
        self.next_generation += 1;

        self.entries
            .insert(key.clone(), CacheEntry::new(value, generation));
        self.order.push(key, generation);
        self.compact_order_if_needed();

        self.stats.set_total_entries(self.entries.len());
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(ttl));
        let removed = before - self.entries.len();

        if removed > 0 {
            self.stats.record_expirations(removed);
            self.compact_order_if_needed();
        }

        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pops order records until one still matches a live entry, and removes
    /// that entry.
    fn evict_oldest(&mut self) -> Option<K> {
        while let Some((key, generation)) = self.order.pop_oldest() {
            let is_live = self
                .entries
                .get(&key)
                .is_some_and(|entry| entry.generation == generation);

            if is_live {
                self.entries.remove(&key);
                return Some(key);
            }
        }
        None
    }

    fn compact_order_if_needed(&mut self) {
        if self.entries.is_empty() {
            self.order.clear();
            return;
        }

        if self.order.len() > 2 * self.entries.len() + ORDER_SLACK {
            let entries = &self.entries;
            self.order.compact(|key, generation| {
                entries
                    .get(key)
                    .is_some_and(|entry| entry.generation == generation)
            });
        }
    }
}
