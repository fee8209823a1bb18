//! Cache Module
//!
//! In-memory TTL caches with lazy expiry, optional LRU bound and bulk sweep.

mod entry;
mod lru;
mod stats;
mod ttl_cache;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use ttl_cache::TtlCache;

use std::time::Duration;

// == Public Constants ==
/// TTL for aggregate GitHub statistics
pub const GITHUB_STATS_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// TTL for contribution calendars and latest-commit lookups
pub const GITHUB_ACTIVITY_TTL: Duration = Duration::from_secs(60 * 60);

/// TTL for weather snapshots
pub const WEATHER_TTL: Duration = Duration::from_secs(30 * 60);
