//! Upstream Providers Module
//!
//! Traits the handlers fetch through, plus the reqwest clients backing them.

mod github;
mod weather;

pub use github::GitHubClient;
pub use weather::OpenWeatherClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CommitInfo, ContributionCalendar, GitHubStats, WeatherQuery, WeatherSnapshot};

/// Header value sent with every upstream request
pub const USER_AGENT: &str = concat!("folio_edge/", env!("CARGO_PKG_VERSION"));

// == Upstream Error ==
/// Errors that can occur when calling a third-party API
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// HTTP request failed or timed out. Holds the error without its URL,
    /// which may carry an API key.
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    /// Provider answered with a non-success status
    #[error("Upstream responded with status {0}")]
    Status(u16),

    /// Subject of the request does not exist upstream
    #[error("{0} not found")]
    NotFound(String),

    /// Response did not have the expected shape
    #[error("Malformed upstream response: {0}")]
    Malformed(String),

    /// Required credential is not configured
    #[error("Missing credentials: {0}")]
    MissingCredentials(&'static str),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Request(err.without_url())
    }
}

// == Source Traits ==
/// GitHub data the site displays.
#[async_trait]
pub trait GitHubSource: Send + Sync {
    async fn user_stats(&self, username: &str) -> Result<GitHubStats, UpstreamError>;

    async fn contributions(&self, username: &str) -> Result<ContributionCalendar, UpstreamError>;

    async fn latest_commit(&self, owner: &str, repo: &str) -> Result<CommitInfo, UpstreamError>;
}

/// Current weather conditions.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_request_error_drops_url() {
        // Nothing listens on port 1, so the connect fails
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1/data?appid=SECRETKEY123")
            .timeout(std::time::Duration::from_millis(200))
            .send()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("SECRETKEY123"));

        let upstream = UpstreamError::from(err);

        assert!(matches!(upstream, UpstreamError::Request(_)));
        assert!(!upstream.to_string().contains("SECRETKEY123"));
        assert!(!format!("{:?}", upstream).contains("SECRETKEY123"));
    }
}
