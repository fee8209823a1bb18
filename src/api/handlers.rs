//! API Handlers
//!
//! HTTP request handlers for each endpoint. Data endpoints read through a
//! cache and only reach the upstream provider on a miss.

use std::future::Future;
use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Query, State},
    http::{header, HeaderMap},
    Json,
};
use chrono::Utc;
use tracing::{debug, info, warn};

use super::state::{AppState, SharedCache};
use crate::contact::ContactMessage;
use crate::error::{ApiError, Result};
use crate::models::{
    CachedResponse, ClearResponse, CommitInfo, CommitQuery, ContactRequest, ContactResponse,
    ContributionCalendar, GitHubStats, HealthResponse, LimiterStatsView, StatsResponse,
    SweepResponse, UserQuery, WeatherParams, WeatherSnapshot,
};
use crate::upstream::UpstreamError;

/// Rate-limit token when the caller's address is unknown
pub const ANONYMOUS_TOKEN: &str = "anonymous";

// == Read Through ==
/// Serves `key` from `cache`, or runs `fetch` and stores its result.
///
/// The lock is released while the upstream call is in flight, so two
/// concurrent misses on one key may both fetch; the later write wins.
async fn read_through<V, F, Fut>(
    cache: &SharedCache<V>,
    key: String,
    fetch: F,
) -> Result<CachedResponse<V>>
where
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<V, UpstreamError>>,
{
    // Write lock even for hits: `get` updates LRU order and stats
    let hit = cache.write().await.get(&key);
    if let Some(value) = hit {
        debug!("Cache hit for {}", key);
        return Ok(CachedResponse::new(value, true));
    }

    debug!("Cache miss for {}", key);
    let value = fetch().await.map_err(|err| {
        debug!("Upstream fetch for {} failed", key);
        ApiError::from(err)
    })?;

    cache.write().await.set(key, value.clone());
    Ok(CachedResponse::new(value, false))
}

/// Handler for GET /api/github/stats?username=
pub async fn github_stats_handler(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<CachedResponse<GitHubStats>>> {
    if let Some(error_msg) = query.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let github = state.github.clone();
    let response = read_through(&state.caches.github_stats, query.cache_key("stats"), || async move {
        github.user_stats(&query.username).await
    })
    .await?;

    Ok(Json(response))
}

/// Handler for GET /api/github/contributions?username=
pub async fn contributions_handler(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<CachedResponse<ContributionCalendar>>> {
    if let Some(error_msg) = query.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let github = state.github.clone();
    let key = query.cache_key("contributions");
    let response = read_through(&state.caches.contributions, key, || async move {
        github.contributions(&query.username).await
    })
    .await?;

    Ok(Json(response))
}

/// Handler for GET /api/github/commit?owner=&repo=
pub async fn commit_handler(
    State(state): State<AppState>,
    Query(query): Query<CommitQuery>,
) -> Result<Json<CachedResponse<CommitInfo>>> {
    if let Some(error_msg) = query.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let github = state.github.clone();
    let response = read_through(&state.caches.commits, query.cache_key(), || async move {
        github.latest_commit(&query.owner, &query.repo).await
    })
    .await?;

    Ok(Json(response))
}

/// Handler for GET /api/weather?city= or ?lat=&lon=
pub async fn weather_handler(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<CachedResponse<WeatherSnapshot>>> {
    let query = params.into_query().map_err(ApiError::InvalidRequest)?;

    let weather = state.weather.clone();
    let response = read_through(&state.caches.weather, query.cache_key(), || async move {
        weather.current(&query).await
    })
    .await?;

    Ok(Json(response))
}

/// Handler for POST /api/contact
///
/// Every attempt counts against the caller's limit, including ones that
/// then fail validation.
pub async fn contact_handler(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(req): Json<ContactRequest>,
) -> Result<Json<ContactResponse>> {
    let peer = connect_info.map(|ConnectInfo(addr)| addr.ip());
    let token = client_token(peer, &headers, state.trusted_proxy_hops);

    let checked = state.limiter.write().await.check(state.contact_limit, &token);
    if let Err(exceeded) = checked {
        warn!("Contact form rate limit hit by {}: {}", token, exceeded);
        return Err(exceeded.into());
    }

    let message = ContactMessage::from_request(req, token, Utc::now())?;
    state.contact_store.save(&message).await?;

    Ok(Json(ContactResponse::sent()))
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let caches = state.caches.stats().await;
    let limiter = state.limiter.read().await;

    Json(StatsResponse {
        caches,
        rate_limiter: LimiterStatsView {
            tracked_tokens: limiter.len(),
            interval_secs: limiter.interval().as_secs(),
            limit: state.contact_limit,
        },
    })
}

/// Handler for POST /api/cache/sweep
pub async fn sweep_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SweepResponse>> {
    authorize_admin(&state, &headers)?;

    let response = SweepResponse {
        cache_entries: state.caches.sweep_expired().await,
        rate_limit_tokens: state.limiter.write().await.sweep_expired(),
    };
    info!(
        "Manual sweep removed {} cache entries and {} rate-limit tokens",
        response.cache_entries, response.rate_limit_tokens
    );

    Ok(Json(response))
}

/// Handler for DELETE /api/cache
pub async fn clear_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ClearResponse>> {
    authorize_admin(&state, &headers)?;

    let removed = state.caches.clear().await;
    info!("Cleared {} cache entries", removed);

    Ok(Json(ClearResponse { removed }))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

// == Helpers ==
/// Identifies the caller for rate limiting.
///
/// With no trusted proxies this is the peer address. Otherwise the peer and
/// the last `trusted_hops - 1` forwarded entries belong to our own proxies,
/// and the entry just before them is the client. Entries further left are
/// supplied by the client and ignored.
pub fn client_token(peer: Option<IpAddr>, headers: &HeaderMap, trusted_hops: usize) -> String {
    let peer = peer.map(|ip| ip.to_string());
    if trusted_hops == 0 {
        return peer.unwrap_or_else(|| ANONYMOUS_TOKEN.to_string());
    }

    let mut chain: Vec<String> = headers
        .get_all("x-forwarded-for")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .map(str::to_string)
        .collect();
    chain.extend(peer);

    let client = chain.len().saturating_sub(trusted_hops + 1);
    chain
        .into_iter()
        .nth(client)
        .unwrap_or_else(|| ANONYMOUS_TOKEN.to_string())
}

fn authorize_admin(state: &AppState, headers: &HeaderMap) -> Result<()> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Err(ApiError::Unavailable(
            "cache administration is disabled".to_string(),
        ));
    };

    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == expected => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}
