//! GitHub API client
//!
//! Profile statistics and the contribution calendar come from the GraphQL
//! API; the latest commit comes from the REST commits listing.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{GitHubSource, UpstreamError, USER_AGENT};
use crate::models::{
    CommitInfo, ContributionCalendar, ContributionDay, ContributionWeek, GitHubStats,
    LanguageShare,
};

const GRAPHQL_URL: &str = "https://api.github.com/graphql";
const REST_BASE_URL: &str = "https://api.github.com";

/// Languages kept in `GitHubStats::top_languages`
const TOP_LANGUAGES: usize = 6;

const STATS_QUERY: &str = r#"
query($login: String!) {
  user(login: $login) {
    login
    name
    followers { totalCount }
    repositories(ownerAffiliations: OWNER, isFork: false, first: 100) {
      totalCount
      nodes {
        stargazerCount
        forkCount
        languages(first: 10, orderBy: {field: SIZE, direction: DESC}) {
          edges { size node { name color } }
        }
      }
    }
    contributionsCollection {
      totalCommitContributions
      totalPullRequestContributions
      totalIssueContributions
    }
  }
}"#;

const CONTRIBUTIONS_QUERY: &str = r#"
query($login: String!) {
  user(login: $login) {
    contributionsCollection {
      contributionCalendar {
        totalContributions
        weeks { contributionDays { date contributionCount color } }
      }
    }
  }
}"#;

// == Client ==
/// Client for the GitHub APIs
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    token: Option<String>,
    timeout: Duration,
}

impl GitHubClient {
    /// The GraphQL API rejects anonymous calls, so stats and contributions
    /// need a token. The commit lookup works without one.
    pub fn new(token: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            token,
            timeout,
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        login: &str,
    ) -> Result<T, UpstreamError> {
        if self.token.is_none() {
            return Err(UpstreamError::MissingCredentials("GITHUB_TOKEN"));
        }

        debug!("GitHub GraphQL request for {}", login);
        let response = self
            .authorized(self.client.post(GRAPHQL_URL))
            .json(&json!({ "query": query, "variables": { "login": login } }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpstreamError::Status(response.status().as_u16()));
        }

        let body: GraphQlResponse<T> = response.json().await?;
        body.into_data(login)
    }
}

#[async_trait]
impl GitHubSource for GitHubClient {
    async fn user_stats(&self, username: &str) -> Result<GitHubStats, UpstreamError> {
        let data: UserData<StatsUser> = self.graphql(STATS_QUERY, username).await?;
        let user = data
            .user
            .ok_or_else(|| UpstreamError::NotFound(format!("GitHub user '{}'", username)))?;
        Ok(stats_from_user(user))
    }

    async fn contributions(&self, username: &str) -> Result<ContributionCalendar, UpstreamError> {
        let data: UserData<ContributionsUser> = self.graphql(CONTRIBUTIONS_QUERY, username).await?;
        let user = data
            .user
            .ok_or_else(|| UpstreamError::NotFound(format!("GitHub user '{}'", username)))?;
        Ok(calendar_from_user(user))
    }

    async fn latest_commit(&self, owner: &str, repo: &str) -> Result<CommitInfo, UpstreamError> {
        let url = format!("{}/repos/{}/{}/commits?per_page=1", REST_BASE_URL, owner, repo);
        debug!("GitHub REST request {}", url);

        let response = self.authorized(self.client.get(&url)).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::CONFLICT => {
                // 409 is what GitHub returns for an empty repository
                return Err(UpstreamError::NotFound(format!(
                    "commits for '{}/{}'",
                    owner, repo
                )));
            }
            status if !status.is_success() => return Err(UpstreamError::Status(status.as_u16())),
            _ => {}
        }

        let commits: Vec<RestCommit> = response.json().await?;
        commits
            .into_iter()
            .next()
            .map(commit_from_rest)
            .ok_or_else(|| UpstreamError::NotFound(format!("commits for '{}/{}'", owner, repo)))
    }
}

// == Wire Types ==
#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl<T> GraphQlResponse<T> {
    fn into_data(self, login: &str) -> Result<T, UpstreamError> {
        if let Some(err) = self.errors.first() {
            if err.kind.as_deref() == Some("NOT_FOUND") {
                return Err(UpstreamError::NotFound(format!("GitHub user '{}'", login)));
            }
            return Err(UpstreamError::Malformed(err.message.clone()));
        }
        self.data
            .ok_or_else(|| UpstreamError::Malformed("GraphQL response has no data".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct UserData<U> {
    user: Option<U>,
}

#[derive(Debug, Deserialize)]
struct TotalCount {
    #[serde(rename = "totalCount")]
    total_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsUser {
    login: String,
    name: Option<String>,
    followers: TotalCount,
    repositories: Repositories,
    contributions_collection: ContributionTotals,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Repositories {
    total_count: u64,
    #[serde(default)]
    nodes: Vec<RepoNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepoNode {
    stargazer_count: u64,
    fork_count: u64,
    languages: Option<LanguageEdges>,
}

#[derive(Debug, Deserialize)]
struct LanguageEdges {
    #[serde(default)]
    edges: Vec<LanguageEdge>,
}

#[derive(Debug, Deserialize)]
struct LanguageEdge {
    size: u64,
    node: LanguageNode,
}

#[derive(Debug, Deserialize)]
struct LanguageNode {
    name: String,
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionTotals {
    total_commit_contributions: u64,
    total_pull_request_contributions: u64,
    total_issue_contributions: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsUser {
    contributions_collection: CalendarCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarCollection {
    contribution_calendar: RawCalendar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCalendar {
    total_contributions: u64,
    weeks: Vec<RawWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWeek {
    contribution_days: Vec<RawDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDay {
    date: String,
    contribution_count: u64,
    color: String,
}

#[derive(Debug, Deserialize)]
struct RestCommit {
    sha: String,
    html_url: String,
    commit: RestCommitDetail,
}

#[derive(Debug, Deserialize)]
struct RestCommitDetail {
    message: String,
    author: Option<RestCommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct RestCommitAuthor {
    name: Option<String>,
    date: Option<DateTime<Utc>>,
}

// == Transforms ==
fn stats_from_user(user: StatsUser) -> GitHubStats {
    let mut total_stars = 0;
    let mut total_forks = 0;
    let mut language_sizes: HashMap<String, (Option<String>, u64)> = HashMap::new();

    for repo in user.repositories.nodes {
        total_stars += repo.stargazer_count;
        total_forks += repo.fork_count;
        for edge in repo.languages.map(|l| l.edges).unwrap_or_default() {
            let slot = language_sizes
                .entry(edge.node.name)
                .or_insert((edge.node.color, 0));
            slot.1 += edge.size;
        }
    }

    let total_size: u64 = language_sizes.values().map(|(_, size)| size).sum();
    let mut top_languages: Vec<LanguageShare> = language_sizes
        .into_iter()
        .map(|(name, (color, size))| LanguageShare {
            name,
            color,
            size,
            percentage: if total_size == 0 {
                0.0
            } else {
                (size as f64 / total_size as f64 * 1000.0).round() / 10.0
            },
        })
        .collect();
    // Name breaks ties so the order is stable across fetches
    top_languages.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name)));
    top_languages.truncate(TOP_LANGUAGES);

    let totals = user.contributions_collection;
    GitHubStats {
        login: user.login,
        name: user.name,
        followers: user.followers.total_count,
        public_repos: user.repositories.total_count,
        total_stars,
        total_forks,
        total_commits: totals.total_commit_contributions,
        total_pull_requests: totals.total_pull_request_contributions,
        total_issues: totals.total_issue_contributions,
        top_languages,
    }
}

fn calendar_from_user(user: ContributionsUser) -> ContributionCalendar {
    let raw = user.contributions_collection.contribution_calendar;
    ContributionCalendar {
        total_contributions: raw.total_contributions,
        weeks: raw
            .weeks
            .into_iter()
            .map(|week| ContributionWeek {
                days: week
                    .contribution_days
                    .into_iter()
                    .map(|day| ContributionDay {
                        date: day.date,
                        count: day.contribution_count,
                        color: day.color,
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn commit_from_rest(commit: RestCommit) -> CommitInfo {
    let (author, date) = match commit.commit.author {
        Some(author) => (author.name, author.date),
        None => (None, None),
    };
    CommitInfo {
        sha: commit.sha,
        message: commit
            .commit
            .message
            .lines()
            .next()
            .unwrap_or_default()
            .to_string(),
        author,
        date,
        url: commit.html_url,
    }
}
