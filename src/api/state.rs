//! Application State
//!
//! Cache, limiter and upstream instances shared by every handler.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::cache::TtlCache;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::contact::{ContactStore, FileContactStore};
use crate::limiter::IntervalRateLimiter;
use crate::models::{
    CacheStatsView, CommitInfo, ContributionCalendar, GitHubStats, WeatherSnapshot,
};
use crate::upstream::{GitHubClient, GitHubSource, OpenWeatherClient, WeatherSource};

/// Shared handle to one cache instance
pub type SharedCache<V> = Arc<RwLock<TtlCache<V>>>;

// == Caches ==
/// One cache per upstream payload, each with its own TTL.
#[derive(Debug, Clone)]
pub struct Caches {
    pub github_stats: SharedCache<GitHubStats>,
    pub contributions: SharedCache<ContributionCalendar>,
    pub commits: SharedCache<CommitInfo>,
    pub weather: SharedCache<WeatherSnapshot>,
}

impl Caches {
    pub fn from_config(config: &Config, clock: Arc<dyn Clock>) -> Self {
        let bound = config.cache_bound();
        let activity_ttl = Duration::from_secs(config.github_activity_ttl);

        Self {
            github_stats: shared(
                Duration::from_secs(config.github_stats_ttl),
                bound,
                clock.clone(),
            ),
            contributions: shared(activity_ttl, bound, clock.clone()),
            commits: shared(activity_ttl, bound, clock.clone()),
            weather: shared(Duration::from_secs(config.weather_ttl), bound, clock),
        }
    }

    /// Removes expired entries from every cache.
    pub async fn sweep_expired(&self) -> usize {
        self.github_stats.write().await.sweep_expired()
            + self.contributions.write().await.sweep_expired()
            + self.commits.write().await.sweep_expired()
            + self.weather.write().await.sweep_expired()
    }

    /// Empties every cache.
    pub async fn clear(&self) -> usize {
        self.github_stats.write().await.clear()
            + self.contributions.write().await.clear()
            + self.commits.write().await.clear()
            + self.weather.write().await.clear()
    }

    /// Statistics keyed by cache name.
    pub async fn stats(&self) -> BTreeMap<String, CacheStatsView> {
        let mut stats = BTreeMap::new();
        stats.insert("github_stats".to_string(), view(&self.github_stats).await);
        stats.insert("contributions".to_string(), view(&self.contributions).await);
        stats.insert("commits".to_string(), view(&self.commits).await);
        stats.insert("weather".to_string(), view(&self.weather).await);
        stats
    }
}

fn shared<V: Clone>(ttl: Duration, bound: Option<usize>, clock: Arc<dyn Clock>) -> SharedCache<V> {
    Arc::new(RwLock::new(TtlCache::with_clock(ttl, bound, clock)))
}

async fn view<V: Clone>(cache: &SharedCache<V>) -> CacheStatsView {
    let cache = cache.read().await;
    CacheStatsView::new(cache.stats(), cache.ttl().as_secs())
}

// == App State ==
/// Application state shared across all handlers.
///
/// The limiter sits behind a write lock so that counting a use and
/// comparing it against the limit happen as one step.
#[derive(Clone)]
pub struct AppState {
    pub caches: Caches,
    pub limiter: Arc<RwLock<IntervalRateLimiter>>,
    /// Contact submissions allowed per window
    pub contact_limit: u32,
    /// Proxies whose `X-Forwarded-For` entries are believed
    pub trusted_proxy_hops: usize,
    pub admin_token: Option<Arc<str>>,
    pub github: Arc<dyn GitHubSource>,
    pub weather: Arc<dyn WeatherSource>,
    pub contact_store: Arc<dyn ContactStore>,
}

impl AppState {
    /// Creates the production state: system clock, real upstream clients
    /// and file-backed contact storage.
    pub fn from_config(config: &Config) -> Self {
        let timeout = config.upstream_timeout();
        Self::with_sources(
            config,
            Arc::new(SystemClock),
            Arc::new(GitHubClient::new(config.github_token.clone(), timeout)),
            Arc::new(OpenWeatherClient::new(
                config.openweather_api_key.clone(),
                timeout,
            )),
            Arc::new(FileContactStore::new(config.contact_dir.clone())),
        )
    }

    /// Creates state around caller-supplied collaborators.
    pub fn with_sources(
        config: &Config,
        clock: Arc<dyn Clock>,
        github: Arc<dyn GitHubSource>,
        weather: Arc<dyn WeatherSource>,
        contact_store: Arc<dyn ContactStore>,
    ) -> Self {
        let limiter = IntervalRateLimiter::with_clock(
            Duration::from_secs(config.contact_rate_interval),
            config.contact_max_tokens,
            clock.clone(),
        );

        Self {
            caches: Caches::from_config(config, clock),
            limiter: Arc::new(RwLock::new(limiter)),
            contact_limit: config.contact_rate_limit,
            trusted_proxy_hops: config.trusted_proxy_hops,
            admin_token: config.admin_token.as_deref().map(Arc::from),
            github,
            weather,
            contact_store,
        }
    }
}
