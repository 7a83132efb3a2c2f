//! Cache Module
//!
//! Provides the in-memory prediction cache with per-entry TTL expiration and
//! insertion-order eviction.

mod entry;
mod order;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use order::InsertionOrder;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::ExpiringCache;

// == Public Constants ==
/// Default maximum number of cached predictions
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default time-to-live for a cached prediction, in seconds
pub const DEFAULT_TTL_SECS: u64 = 60;
