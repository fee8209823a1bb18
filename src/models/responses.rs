//! Response DTOs for the portfolio API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cache::CacheStats;

/// Envelope for any payload served through a cache
#[derive(Debug, Clone, Serialize)]
pub struct CachedResponse<T> {
    pub data: T,
    /// True when served without contacting the upstream provider
    pub cached: bool,
}

impl<T> CachedResponse<T> {
    pub fn new(data: T, cached: bool) -> Self {
        Self { data, cached }
    }
}

/// Response body for a successful contact submission
#[derive(Debug, Clone, Serialize)]
pub struct ContactResponse {
    pub message: String,
}

impl ContactResponse {
    pub fn sent() -> Self {
        Self {
            message: "Message sent successfully".to_string(),
        }
    }
}

/// Statistics for one named cache
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsView {
    #[serde(flatten)]
    pub stats: CacheStats,
    pub hit_rate: f64,
    pub ttl_secs: u64,
}

impl CacheStatsView {
    pub fn new(stats: CacheStats, ttl_secs: u64) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
            ttl_secs,
        }
    }
}

/// Contact limiter occupancy
#[derive(Debug, Clone, Serialize)]
pub struct LimiterStatsView {
    pub tracked_tokens: usize,
    pub interval_secs: u64,
    pub limit: u32,
}

/// Response body for GET /api/cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Keyed by cache name
    pub caches: BTreeMap<String, CacheStatsView>,
    pub rate_limiter: LimiterStatsView,
}

/// Response body for POST /api/cache/sweep
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepResponse {
    /// Expired cache entries removed
    pub cache_entries: usize,
    /// Closed rate-limit windows removed
    pub rate_limit_tokens: usize,
}

/// Response body for DELETE /api/cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub removed: usize,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_response_serialize() {
        let resp = CachedResponse::new(serde_json::json!({"x": 1}), true);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["data"]["x"], 1);
        assert_eq!(json["cached"], true);
    }

    #[test]
    fn test_cache_stats_view_flattens() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..CacheStats::default()
        };
        let json = serde_json::to_value(CacheStatsView::new(stats, 1800)).unwrap();

        assert_eq!(json["hits"], 3);
        assert_eq!(json["hit_rate"], 0.75);
        assert_eq!(json["ttl_secs"], 1800);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
