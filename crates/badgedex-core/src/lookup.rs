//! # Profile Lookup State
//!
//! Models the "check your progress" panel as a reducer.
//!
//! A lookup is started with [`LookupState::begin`], which hands out a ticket,
//! and settled with [`LookupState::finish`]. Tickets increase monotonically;
//! only the most recent one may settle the state, so a slow response from an
//! earlier lookup can never overwrite a later one.

use crate::tier::{BadgeProgress, progress_for};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bio shown when a profile has none.
pub const DEFAULT_BIO: &str = "Ready to earn some badges!";

// =============================================================================
// REMOTE DATA
// =============================================================================

/// Public profile summary as returned by `GET /users/{username}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
}

impl ProfileSummary {
    /// Display name, falling back to the login.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.login)
    }

    /// Bio, falling back to a friendly default.
    #[must_use]
    pub fn display_bio(&self) -> &str {
        self.bio
            .as_deref()
            .filter(|b| !b.is_empty())
            .unwrap_or(DEFAULT_BIO)
    }

    /// The official achievements tab for this user.
    #[must_use]
    pub fn achievements_url(&self) -> String {
        format!("{}?tab=achievements", self.html_url)
    }
}

/// Metrics gathered by the auxiliary searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub merged_prs: u64,
    pub max_stars: u64,
}

impl ProfileStats {
    /// Progress on Pull Shark and Starstruck, in that order.
    #[must_use]
    pub fn progress(&self) -> [BadgeProgress; 2] {
        progress_for(self)
    }
}

/// User-visible lookup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupFailure {
    /// HTTP 404 on the profile request.
    NotFound,
    /// The upstream API is throttling us.
    RateLimited,
    /// Any other non-success response or transport error.
    Failed,
}

impl LookupFailure {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::NotFound => "User not found",
            Self::RateLimited => "API rate limit exceeded. Please try again later.",
            Self::Failed => "Failed to fetch profile",
        }
    }
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Handle for one in-flight lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LookupTicket(u64);

/// The lookup panel: at most one of `profile`/`error` is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LookupState {
    pub username: Option<String>,
    pub loading: bool,
    pub error: Option<LookupFailure>,
    pub profile: Option<ProfileSummary>,
    pub stats: Option<ProfileStats>,
    #[serde(skip)]
    latest: u64,
}

impl LookupState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a lookup for `username`.
    ///
    /// Returns `None` (and leaves the state untouched) when the trimmed
    /// username is empty. Otherwise clears any previous result.
    pub fn begin(&mut self, username: &str) -> Option<LookupTicket> {
        let username = username.trim();
        if username.is_empty() {
            return None;
        }
        self.latest = self.latest.saturating_add(1);
        self.username = Some(username.to_string());
        self.loading = true;
        self.error = None;
        self.profile = None;
        self.stats = None;
        Some(LookupTicket(self.latest))
    }

    /// Settle the lookup identified by `ticket`.
    ///
    /// Returns `false` if a newer lookup has started since; the outcome is
    /// then discarded.
    pub fn finish(
        &mut self,
        ticket: LookupTicket,
        outcome: Result<(ProfileSummary, ProfileStats), LookupFailure>,
    ) -> bool {
        if ticket.0 != self.latest {
            return false;
        }
        self.loading = false;
        match outcome {
            Ok((profile, stats)) => {
                self.error = None;
                self.profile = Some(profile);
                self.stats = Some(stats);
            }
            Err(failure) => {
                self.error = Some(failure);
                self.profile = None;
                self.stats = None;
            }
        }
        true
    }

    /// Whether `ticket` is still the most recent lookup.
    #[must_use]
    pub fn is_current(&self, ticket: LookupTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Badge progress, once stats are available.
    #[must_use]
    pub fn progress(&self) -> Option<[BadgeProgress; 2]> {
        self.stats.as_ref().map(ProfileStats::progress)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::Tier;

    fn octocat() -> ProfileSummary {
        ProfileSummary {
            login: "octocat".to_string(),
            avatar_url: "https://avatars.example/octocat".to_string(),
            html_url: "https://github.com/octocat".to_string(),
            name: None,
            bio: None,
            public_repos: 8,
            followers: 100,
        }
    }

    #[test]
    fn blank_username_does_not_start_a_lookup() {
        let mut state = LookupState::new();
        assert!(state.begin("   ").is_none());
        assert!(!state.loading);
        assert!(state.username.is_none());
    }

    #[test]
    fn success_sets_profile_and_stats() {
        let mut state = LookupState::new();
        let ticket = state.begin(" octocat ");
        assert_eq!(state.username.as_deref(), Some("octocat"));
        assert!(state.loading);

        let stats = ProfileStats {
            merged_prs: 16,
            max_stars: 3,
        };
        let applied = ticket.map(|t| state.finish(t, Ok((octocat(), stats))));
        assert_eq!(applied, Some(true));
        assert!(!state.loading);
        assert_eq!(state.stats, Some(stats));
        assert!(state.error.is_none());

        let progress = state.progress();
        assert_eq!(progress.map(|p| p[0].progress.tier), Some(Tier::Silver));
        assert_eq!(progress.map(|p| p[1].progress.tier), Some(Tier::None));
    }

    #[test]
    fn not_found_clears_profile_and_stats() {
        let mut state = LookupState::new();
        if let Some(t) = state.begin("octocat") {
            state.finish(t, Ok((octocat(), ProfileStats::default())));
        }
        if let Some(t) = state.begin("no-such-user-zz") {
            state.finish(t, Err(LookupFailure::NotFound));
        }
        assert_eq!(state.error.map(LookupFailure::message), Some("User not found"));
        assert!(state.profile.is_none());
        assert!(state.stats.is_none());
    }

    #[test]
    fn stale_responses_are_ignored() {
        let mut state = LookupState::new();
        let first = state.begin("slow-user");
        let second = state.begin("fast-user");

        if let Some(t) = second {
            assert!(state.finish(t, Err(LookupFailure::RateLimited)));
        }
        if let Some(t) = first {
            assert!(!state.is_current(t));
            assert!(!state.finish(t, Ok((octocat(), ProfileStats::default()))));
        }

        assert_eq!(state.username.as_deref(), Some("fast-user"));
        assert_eq!(state.error, Some(LookupFailure::RateLimited));
        assert!(state.profile.is_none());
    }

    #[test]
    fn profile_display_fallbacks() {
        let mut p = octocat();
        assert_eq!(p.display_name(), "octocat");
        assert_eq!(p.display_bio(), DEFAULT_BIO);
        assert_eq!(
            p.achievements_url(),
            "https://github.com/octocat?tab=achievements"
        );

        p.name = Some("The Octocat".to_string());
        p.bio = Some(String::new());
        assert_eq!(p.display_name(), "The Octocat");
        assert_eq!(p.display_bio(), DEFAULT_BIO);
    }

    #[test]
    fn profile_deserializes_from_api_shape() {
        let json = r#"{
            "login": "octocat",
            "avatar_url": "https://a/o.png",
            "html_url": "https://github.com/octocat",
            "name": null,
            "bio": "hi",
            "public_repos": 2,
            "followers": 9,
            "type": "User"
        }"#;
        let profile: Result<ProfileSummary, _> = serde_json::from_str(json);
        assert_eq!(profile.ok().map(|p| (p.followers, p.bio)), Some((9, Some("hi".to_string()))));
    }
}
