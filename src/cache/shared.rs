//! Shared Cache Module
//!
//! Thread-safe handle over [`ExpiringCache`] so request handlers and the
//! cleanup task can use it without locking it themselves.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::cache::{CacheStats, ExpiringCache};

// == Shared Cache ==
/// Cloneable, internally synchronized expiring cache.
///
/// Every operation holds the lock only for a single O(1) map access and
/// never across an `.await`, so lookups for different keys never wait on
/// each other's compute.
pub struct SharedCache<K, V> {
    inner: Arc<Mutex<ExpiringCache<K, V>>>,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Creates a new shared cache with the given capacity and entry TTL.
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ExpiringCache::new(max_entries, ttl))),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().await.get(key)
    }

    pub async fn put(&self, key: K, value: V) {
        self.inner.lock().await.put(key, value);
    }

    /// Removes every expired entry, returning how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        self.inner.lock().await.purge_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
