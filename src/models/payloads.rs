//! Payload types served to the site and held in the caches
//!
//! Field names are camelCase on the wire to match the frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate profile statistics for one GitHub user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubStats {
    pub login: String,
    pub name: Option<String>,
    pub followers: u64,
    /// Owned, non-fork repositories
    pub public_repos: u64,
    pub total_stars: u64,
    pub total_forks: u64,
    pub total_commits: u64,
    pub total_pull_requests: u64,
    pub total_issues: u64,
    /// Languages by total bytes across owned repositories, largest first
    pub top_languages: Vec<LanguageShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageShare {
    pub name: String,
    pub color: Option<String>,
    /// Bytes of code
    pub size: u64,
    /// Share of all counted bytes, 0.0 to 100.0
    pub percentage: f64,
}

/// Contribution heatmap for the last year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total_contributions: u64,
    pub weeks: Vec<ContributionWeek>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeek {
    pub days: Vec<ContributionDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    pub count: u64,
    pub color: String,
}

/// Most recent commit on a repository's default branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInfo {
    pub sha: String,
    /// First line of the commit message
    pub message: String,
    pub author: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub url: String,
}

/// Current conditions at one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub location: String,
    pub country: Option<String>,
    /// Degrees Celsius
    pub temperature: f64,
    pub feels_like: f64,
    /// Relative humidity, percent
    pub humidity: u8,
    pub description: String,
    pub icon: String,
    /// Metres per second
    pub wind_speed: f64,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}
