//! JSON shapes shared by `--json` CLI output and the HTTP API.

use badgedex_core::tier::BadgeProgress;
use badgedex_core::{
    BadgeRecord, BadgeStatus, Catalog, LookupFailure, LookupState, OwnedSet, ProfileStats,
    ProfileSummary,
};
use serde::Serialize;

/// A badge plus the visitor's ownership flag.
#[derive(Debug, Clone, Serialize)]
pub struct BadgeView {
    #[serde(flatten)]
    pub badge: &'static BadgeRecord,
    pub owned: bool,
}

impl BadgeView {
    pub fn new(badge: &'static BadgeRecord, owned: &OwnedSet) -> Self {
        Self {
            badge,
            owned: owned.contains(badge.id),
        }
    }

    pub fn all<I>(badges: I, owned: &OwnedSet) -> Vec<Self>
    where
        I: IntoIterator<Item = &'static BadgeRecord>,
    {
        badges
            .into_iter()
            .map(|badge| Self::new(badge, owned))
            .collect()
    }
}

/// Result of a filtered catalog query.
#[derive(Debug, Clone, Serialize)]
pub struct BadgeList {
    /// Badges in the whole catalog.
    pub total: usize,
    /// Owned badges still present in the catalog.
    pub owned_count: usize,
    pub badges: Vec<BadgeView>,
}

impl BadgeList {
    pub fn new(catalog: Catalog<'static>, shown: Vec<&'static BadgeRecord>, owned: &OwnedSet) -> Self {
        Self {
            total: catalog.len(),
            owned_count: owned.visible(catalog).count(),
            badges: BadgeView::all(shown, owned),
        }
    }
}

/// The catalog split by lifecycle status.
#[derive(Debug, Clone, Serialize)]
pub struct Sections {
    pub active: Vec<BadgeView>,
    pub retired: Vec<BadgeView>,
    pub program: Vec<BadgeView>,
}

impl Sections {
    pub fn new(catalog: Catalog<'static>, owned: &OwnedSet) -> Self {
        Self {
            active: BadgeView::all(catalog.with_status(BadgeStatus::Active), owned),
            retired: BadgeView::all(catalog.with_status(BadgeStatus::Retired), owned),
            program: BadgeView::all(catalog.with_status(BadgeStatus::Program), owned),
        }
    }
}

/// Outcome of a toggle.
#[derive(Debug, Clone, Serialize)]
pub struct ToggleResult {
    pub id: String,
    pub owned: bool,
    pub owned_count: usize,
}

/// The lookup panel as rendered to clients.
#[derive(Debug, Clone, Serialize)]
pub struct LookupView {
    pub username: Option<String>,
    pub loading: bool,
    pub error: Option<LookupFailure>,
    pub message: Option<&'static str>,
    pub profile: Option<ProfileCard>,
    pub stats: Option<ProfileStats>,
    pub progress: Option<[BadgeProgress; 2]>,
}

impl From<&LookupState> for LookupView {
    fn from(state: &LookupState) -> Self {
        Self {
            username: state.username.clone(),
            loading: state.loading,
            error: state.error,
            message: state.error.map(LookupFailure::message),
            profile: state.profile.as_ref().map(ProfileCard::from),
            stats: state.stats,
            progress: state.progress(),
        }
    }
}

/// Profile with display fallbacks already applied.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileCard {
    pub login: String,
    pub display_name: String,
    pub bio: String,
    pub avatar_url: String,
    pub html_url: String,
    pub achievements_url: String,
    pub public_repos: u64,
    pub followers: u64,
}

impl From<&ProfileSummary> for ProfileCard {
    fn from(profile: &ProfileSummary) -> Self {
        Self {
            login: profile.login.clone(),
            display_name: profile.display_name().to_string(),
            bio: profile.display_bio().to_string(),
            avatar_url: profile.avatar_url.clone(),
            html_url: profile.html_url.clone(),
            achievements_url: profile.achievements_url(),
            public_repos: profile.public_repos,
            followers: profile.followers,
        }
    }
}
