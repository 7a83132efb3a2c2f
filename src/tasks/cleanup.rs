//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::hash::Hash;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a background task that periodically purges expired cache entries.
///
/// Lookups already ignore expired entries; this pass only reclaims the
/// memory of keys that are never asked for again.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task<K, V>(
    cache: SharedCache<K, V>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired().await;

            if removed > 0 {
                let stats = cache.stats().await;
                info!(
                    removed,
                    entries = stats.total_entries,
                    hits = stats.hits,
                    misses = stats.misses,
                    evictions = stats.evictions,
                    hit_rate = stats.hit_rate(),
                    "TTL cleanup removed expired entries"
                );
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
