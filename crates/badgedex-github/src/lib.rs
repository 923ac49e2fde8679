//! # badgedex-github - The Client
//!
//! Unauthenticated client for the public GitHub REST API, used to estimate a
//! user's progress on the Pull Shark and Starstruck badges.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use badgedex_github::{GithubClient, DEFAULT_API_BASE, DEFAULT_TIMEOUT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), badgedex_github::Error> {
//!     let client = GithubClient::new(DEFAULT_API_BASE, DEFAULT_TIMEOUT)?;
//!     let (profile, stats) = client.lookup("octocat").await?;
//!     println!("{} has {} merged PRs", profile.display_name(), stats.merged_prs);
//!     Ok(())
//! }
//! ```
//!
//! ## Lookup Flow
//!
//! ```text
//!   GET /users/{u}  ──fail──►  Error (NotFound / RateLimited / ...)
//!        │ ok
//!        ├──► GET /search/issues?q=author:{u} type:pr is:merged      ─┐ concurrent,
//!        └──► GET /search/repositories?q=user:{u}&sort=stars&...     ─┘ 0 on failure
//! ```

use badgedex_core::{LookupFailure, ProfileStats, ProfileSummary};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Public GitHub REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `User-Agent` sent with every request; GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("badgedex/", env!("CARGO_PKG_VERSION"));

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors from the GitHub client.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("JSON error for {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP 404.
    #[error("not found: {url}")]
    NotFound { url: String },

    /// HTTP 403 or 429; unauthenticated quota exhausted.
    #[error("rate limited (HTTP {status})")]
    RateLimited { status: u16 },

    /// Any other non-success status.
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// The configured base URL cannot carry path segments.
    #[error("invalid API base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The username was empty after trimming.
    #[error("username is empty")]
    EmptyUsername,
}

impl Error {
    /// The user-visible failure category for this error.
    #[must_use]
    pub fn failure(&self) -> LookupFailure {
        match self {
            Self::NotFound { .. } => LookupFailure::NotFound,
            Self::RateLimited { .. } => LookupFailure::RateLimited,
            _ => LookupFailure::Failed,
        }
    }
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================

/// Body of `GET /search/issues`; only the count is used.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchCount {
    pub total_count: u64,
}

/// Body of `GET /search/repositories`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoSearch {
    #[serde(default)]
    pub items: Vec<RepoItem>,
}

/// One repository in a search result.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoItem {
    #[serde(default)]
    pub stargazers_count: u64,
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client for the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GithubClient {
    base_url: Url,
    client: reqwest::Client,
}

impl GithubClient {
    /// Create a client for `base_url` with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBaseUrl`] if `base_url` does not parse as a
    /// hierarchical URL, or [`Error::Http`] if the HTTP client fails to build.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let parsed = Url::parse(base_url).map_err(|e| Error::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: parsed,
            client,
        })
    }

    /// `GET /users/{username}`.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] on 404, [`Error::RateLimited`] on 403/429,
    /// [`Error::Status`] on other failures.
    pub async fn fetch_profile(&self, username: &str) -> Result<ProfileSummary, Error> {
        let url = self.endpoint(&["users", username]);
        self.get_json(url, &[]).await
    }

    /// Number of merged pull requests authored by `username`.
    pub async fn merged_pr_count(&self, username: &str) -> Result<u64, Error> {
        let url = self.endpoint(&["search", "issues"]);
        let q = format!("author:{username} type:pr is:merged");
        let body: SearchCount = self.get_json(url, &[("q", q.as_str())]).await?;
        Ok(body.total_count)
    }

    /// Star count of `username`'s most-starred repository (0 if none).
    pub async fn max_stars(&self, username: &str) -> Result<u64, Error> {
        let url = self.endpoint(&["search", "repositories"]);
        let q = format!("user:{username}");
        let body: RepoSearch = self
            .get_json(
                url,
                &[
                    ("q", q.as_str()),
                    ("sort", "stars"),
                    ("order", "desc"),
                    ("per_page", "1"),
                ],
            )
            .await?;
        Ok(body.items.first().map_or(0, |repo| repo.stargazers_count))
    }

    /// Full lookup: profile first, then both searches concurrently.
    ///
    /// Only the profile request can fail the lookup; a failed search is
    /// logged and counted as zero.
    pub async fn lookup(&self, username: &str) -> Result<(ProfileSummary, ProfileStats), Error> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::EmptyUsername);
        }

        let profile = self.fetch_profile(username).await?;

        let (merged_prs, max_stars) =
            tokio::join!(self.merged_pr_count(username), self.max_stars(username));

        let stats = ProfileStats {
            merged_prs: or_zero(merged_prs, "merged PR search", username),
            max_stars: or_zero(max_stars, "repository search", username),
        };

        debug!(
            username,
            merged_prs = stats.merged_prs,
            max_stars = stats.max_stars,
            "lookup complete"
        );
        Ok((profile, stats))
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base can always take segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, ACCEPT_GITHUB_JSON)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => {
                return Err(Error::NotFound {
                    url: url.to_string(),
                });
            }
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                return Err(Error::RateLimited {
                    status: status.as_u16(),
                });
            }
            s if !s.is_success() => {
                return Err(Error::Status {
                    status: s.as_u16(),
                    url: url.to_string(),
                });
            }
            _ => {}
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| Error::Json {
            context: url.path().to_string(),
            source,
        })
    }
}

fn or_zero(result: Result<u64, Error>, what: &str, username: &str) -> u64 {
    result.unwrap_or_else(|err| {
        warn!(username, error = %err, "{what} failed; counting as 0");
        0
    })
}

// =============================================================================
// TESTS
// =============================================================================
