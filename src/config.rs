//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{GITHUB_ACTIVITY_TTL, GITHUB_STATS_TTL, WEATHER_TTL};
use crate::limiter::{DEFAULT_INTERVAL, DEFAULT_MAX_TOKENS};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Token for the GitHub API; anonymous requests when unset
    pub github_token: Option<String>,
    /// OpenWeatherMap key; the weather endpoint answers 503 when unset
    pub openweather_api_key: Option<String>,
    /// TTL in seconds for aggregate GitHub statistics
    pub github_stats_ttl: u64,
    /// TTL in seconds for contributions and latest commits
    pub github_activity_ttl: u64,
    /// TTL in seconds for weather snapshots
    pub weather_ttl: u64,
    /// Bearer token for the cache sweep/clear endpoints; disabled when unset
    pub admin_token: Option<String>,
    /// Entry bound per cache, 0 for unbounded
    pub cache_max_entries: usize,
    /// Contact submissions allowed per window, per caller
    pub contact_rate_limit: u32,
    /// Contact rate-limit window in seconds
    pub contact_rate_interval: u64,
    /// Distinct callers tracked by the contact limiter
    pub contact_max_tokens: usize,
    /// Reverse proxies in front of the server that append to
    /// `X-Forwarded-For`; 0 ignores the header and keys on the peer address
    pub trusted_proxy_hops: usize,
    /// Directory receiving contact messages
    pub contact_dir: PathBuf,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
    /// Upstream request timeout in seconds
    pub upstream_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` (default: 3000)
    /// - `GITHUB_TOKEN` (default: unset)
    /// - `OPENWEATHER_API_KEY` (default: unset)
    /// - `GITHUB_STATS_TTL` (default: 86400)
    /// - `GITHUB_ACTIVITY_TTL` (default: 3600)
    /// - `WEATHER_TTL` (default: 1800)
    /// - `ADMIN_TOKEN` (default: unset)
    /// - `CACHE_MAX_ENTRIES` (default: 1000)
    /// - `CONTACT_RATE_LIMIT` (default: 10)
    /// - `CONTACT_RATE_INTERVAL` (default: 60)
    /// - `CONTACT_MAX_TOKENS` (default: 500)
    /// - `TRUSTED_PROXY_HOPS` (default: 0)
    /// - `CONTACT_DIR` (default: contact-messages)
    /// - `SWEEP_INTERVAL` (default: 60)
    /// - `UPSTREAM_TIMEOUT` (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parsed("SERVER_PORT", defaults.server_port),
            github_token: non_empty("GITHUB_TOKEN"),
            openweather_api_key: non_empty("OPENWEATHER_API_KEY"),
            github_stats_ttl: parsed("GITHUB_STATS_TTL", defaults.github_stats_ttl),
            github_activity_ttl: parsed("GITHUB_ACTIVITY_TTL", defaults.github_activity_ttl),
            weather_ttl: parsed("WEATHER_TTL", defaults.weather_ttl),
            admin_token: non_empty("ADMIN_TOKEN"),
            cache_max_entries: parsed("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            contact_rate_limit: parsed("CONTACT_RATE_LIMIT", defaults.contact_rate_limit),
            contact_rate_interval: parsed("CONTACT_RATE_INTERVAL", defaults.contact_rate_interval),
            contact_max_tokens: parsed("CONTACT_MAX_TOKENS", defaults.contact_max_tokens),
            trusted_proxy_hops: parsed("TRUSTED_PROXY_HOPS", defaults.trusted_proxy_hops),
            contact_dir: non_empty("CONTACT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.contact_dir),
            sweep_interval: parsed("SWEEP_INTERVAL", defaults.sweep_interval),
            upstream_timeout: parsed("UPSTREAM_TIMEOUT", defaults.upstream_timeout),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }

    /// Cache bound as understood by `TtlCache`.
    pub fn cache_bound(&self) -> Option<usize> {
        (self.cache_max_entries > 0).then_some(self.cache_max_entries)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            github_token: None,
            openweather_api_key: None,
            github_stats_ttl: GITHUB_STATS_TTL.as_secs(),
            github_activity_ttl: GITHUB_ACTIVITY_TTL.as_secs(),
            weather_ttl: WEATHER_TTL.as_secs(),
            admin_token: None,
            cache_max_entries: 1000,
            contact_rate_limit: 10,
            contact_rate_interval: DEFAULT_INTERVAL.as_secs(),
            contact_max_tokens: DEFAULT_MAX_TOKENS,
            trusted_proxy_hops: 0,
            contact_dir: PathBuf::from("contact-messages"),
            sweep_interval: 60,
            upstream_timeout: 10,
        }
    }
}

fn parsed<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
