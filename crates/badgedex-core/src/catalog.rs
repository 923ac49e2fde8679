//! # Catalog
//!
//! The compiled-in badge catalog and FAQ entries.
//!
//! Declaration order is editorial: `SortKey::Default` keeps it, and the
//! section and guide listings follow it.

use crate::badge::{BadgeRecord, BadgeStatus, Category, Rarity, Tier, TierRequirement};
use crate::BadgeError;
use serde::Serialize;
use std::collections::BTreeSet;

// =============================================================================
// STATIC DATA
// =============================================================================

/// Every known badge, in editorial order.
pub static BADGES: &[BadgeRecord] = &[
    BadgeRecord {
        id: "quickdraw",
        name: "Quickdraw",
        glyph: "🚀",
        description: "Closed an issue or pull request within 5 minutes of opening.",
        status: BadgeStatus::Active,
        rarity: Rarity::Common,
        category: Category::Contribution,
        tiers: &[TierRequirement::new(Tier::Base, "Close within 5 mins of opening.")],
        guide: &[
            "Create a new issue in your own repository.",
            "Immediately write a comment closing it or click the \"Close issue\" button.",
            "Alternatively, open a PR and merge it immediately.",
        ],
        tips: &["You can do this in a private repository you own."],
        note: None,
    },
    BadgeRecord {
        id: "pair-extraordinaire",
        name: "Pair Extraordinaire",
        glyph: "👯",
        description: "Co-authored a commit that was merged.",
        status: BadgeStatus::Active,
        rarity: Rarity::Uncommon,
        category: Category::Collaboration,
        tiers: &[
            TierRequirement::new(Tier::Base, "Co-author a merged commit."),
            TierRequirement::new(Tier::Bronze, "Co-author 10 commits."),
            TierRequirement::new(Tier::Silver, "Co-author 24 commits."),
            TierRequirement::new(Tier::Gold, "Co-author 48 commits."),
        ],
        guide: &[
            "Write a commit message with the Co-authored-by trailer.",
            "Format: `Co-authored-by: Name <name@example.com>`",
            "Ensure there is an empty line between the commit body and the trailer.",
        ],
        tips: &[],
        note: None,
    },
    BadgeRecord {
        id: "pull-shark",
        name: "Pull Shark",
        glyph: "🦈",
        description: "Opened pull requests that have been merged.",
        status: BadgeStatus::Active,
        rarity: Rarity::Rare,
        category: Category::Contribution,
        tiers: &[
            TierRequirement::new(Tier::Bronze, "2 merged PRs."),
            TierRequirement::new(Tier::Silver, "16 merged PRs."),
            TierRequirement::new(Tier::Gold, "1024 merged PRs."),
        ],
        guide: &[
            "Contribute to repositories by opening Pull Requests.",
            "The PR must be merged to count.",
            "PRs in your own repositories count!",
        ],
        tips: &[],
        note: None,
    },
    BadgeRecord {
        id: "galaxy-brain",
        name: "Galaxy Brain",
        glyph: "🧠",
        description: "Answers accepted on GitHub Discussions.",
        status: BadgeStatus::Active,
        rarity: Rarity::Rare,
        category: Category::Community,
        tiers: &[
            TierRequirement::new(Tier::Bronze, "2 accepted answers."),
            TierRequirement::new(Tier::Silver, "8 accepted answers."),
            TierRequirement::new(Tier::Gold, "16 accepted answers."),
        ],
        guide: &[
            "Find a repository with Discussions enabled.",
            "Answer a question in the Q&A category.",
            "The author of the discussion must mark your reply as the answer.",
        ],
        tips: &[],
        note: None,
    },
    BadgeRecord {
        id: "yolo",
        name: "YOLO",
        glyph: "🤪",
        description: "Merged a pull request without code review.",
        status: BadgeStatus::Active,
        rarity: Rarity::Uncommon,
        category: Category::Contribution,
        tiers: &[TierRequirement::new(Tier::Base, "Merge a PR without review.")],
        guide: &[
            "Create a PR in a repository where you have write access.",
            "Merge it immediately without waiting for a review approval.",
            "Often requires branch protection rules to be disabled or bypassed.",
        ],
        tips: &[],
        note: None,
    },
    BadgeRecord {
        id: "public-sponsor",
        name: "Public Sponsor",
        glyph: "💖",
        description: "Sponsoring an open source project via GitHub Sponsors.",
        status: BadgeStatus::Active,
        rarity: Rarity::Common,
        category: Category::Community,
        tiers: &[TierRequirement::new(Tier::Base, "Sponsor a project.")],
        guide: &[
            "Navigate to a user or organization profile that has GitHub Sponsors enabled.",
            "Click \"Sponsor\" and complete a payment.",
            "The badge appears on your profile to show your support.",
        ],
        tips: &[],
        note: None,
    },
    BadgeRecord {
        id: "starstruck",
        name: "Starstruck",
        glyph: "🌟",
        description: "Created a repository that received many stars.",
        status: BadgeStatus::Active,
        rarity: Rarity::Legendary,
        category: Category::Community,
        tiers: &[
            TierRequirement::new(Tier::Bronze, "16 stars."),
            TierRequirement::new(Tier::Silver, "128 stars."),
            TierRequirement::new(Tier::Gold, "512 stars."),
        ],
        guide: &[
            "Create a useful open source project.",
            "Promote it to the community.",
            "Stars must be from distinct users.",
        ],
        tips: &[],
        note: None,
    },
    BadgeRecord {
        id: "arctic-code-vault",
        name: "Arctic Code Vault",
        glyph: "❄️",
        description: "Contributed code to a repository archived in the Arctic Code Vault.",
        status: BadgeStatus::Retired,
        rarity: Rarity::Rare,
        category: Category::Contribution,
        tiers: &[],
        guide: &[],
        tips: &[],
        note: Some("Snapshot taken on 02/02/2020. No longer earnable."),
    },
    BadgeRecord {
        id: "mars-2020",
        name: "Mars 2020",
        glyph: "🚁",
        description: "Contributed to a repository used in the Mars 2020 Helicopter mission.",
        status: BadgeStatus::Retired,
        rarity: Rarity::Legendary,
        category: Category::Contribution,
        tiers: &[],
        guide: &[],
        tips: &[],
        note: Some("Legacy badge for specific contributors."),
    },
    BadgeRecord {
        id: "github-pro",
        name: "GitHub Pro",
        glyph: "💎",
        description: "Active subscriber to GitHub Pro.",
        status: BadgeStatus::Program,
        rarity: Rarity::Common,
        category: Category::Program,
        tiers: &[],
        guide: &[],
        tips: &[],
        note: None,
    },
    BadgeRecord {
        id: "developer-program",
        name: "Developer Program",
        glyph: "⚡",
        description: "Member of the GitHub Developer Program.",
        status: BadgeStatus::Program,
        rarity: Rarity::Uncommon,
        category: Category::Program,
        tiers: &[],
        guide: &[],
        tips: &[],
        note: None,
    },
    BadgeRecord {
        id: "security-bug-bounty",
        name: "Security Bug Bounty",
        glyph: "🛡️",
        description: "Hunted down a security vulnerability.",
        status: BadgeStatus::Program,
        rarity: Rarity::Legendary,
        category: Category::Program,
        tiers: &[],
        guide: &[],
        tips: &[],
        note: Some("Awarded manually by GitHub security team."),
    },
];

/// A troubleshooting entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaqItem {
    pub question: &'static str,
    pub answer: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<&'static str>,
}

/// Frequently asked questions about badge processing.
pub static FAQS: &[FaqItem] = &[
    FaqItem {
        question: "My badge didn't appear immediately!",
        answer: "GitHub achievements are processed asynchronously. It can take anywhere from a few minutes to 24 hours for a badge to show up on your profile.",
        fix: Some("Wait at least 24 hours before trying again."),
    },
    FaqItem {
        question: "Do private repositories count?",
        answer: "Yes! For most badges like Quickdraw, Pair Extraordinaire, and Pull Shark, contributions in private repositories you own or collaborate on count towards the achievement.",
        fix: Some(
            "Make sure you have 'Include private contributions on my profile' checked in your profile settings if you want the commit graph to reflect it, though badges usually appear regardless.",
        ),
    },
    FaqItem {
        question: "Can I lose a badge?",
        answer: "Generally, no. Once earned, badges stay on your profile. However, if you delete the repository or the specific contribution that triggered the badge (e.g., deleting the Pull Request), there is a slim chance it could be recalculated, but this is rare.",
        fix: None,
    },
    FaqItem {
        question: "How do I hide a badge?",
        answer: "GitHub allows you to toggle the visibility of specific achievements.",
        fix: Some(
            "Go to your Profile > Scroll to Achievements > Click the gear/settings icon (if available) or manage visibility in Profile Settings.",
        ),
    },
];

// =============================================================================
// CATALOG HANDLE
// =============================================================================

/// Read-only handle over a badge list.
///
/// `Catalog::builtin()` wraps [`BADGES`]; tests build catalogs from their own
/// slices.
#[derive(Debug, Clone, Copy)]
pub struct Catalog<'a> {
    badges: &'a [BadgeRecord],
}

impl Catalog<'static> {
    /// The compiled-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self { badges: BADGES }
    }
}

impl<'a> Catalog<'a> {
    #[must_use]
    pub fn new(badges: &'a [BadgeRecord]) -> Self {
        Self { badges }
    }

    /// All records in declaration order.
    #[must_use]
    pub fn badges(&self) -> &'a [BadgeRecord] {
        self.badges
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.badges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }

    /// Look up a badge by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&'a BadgeRecord> {
        self.badges.iter().find(|b| b.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Badges with the given lifecycle status, in declaration order.
    pub fn with_status(
        &self,
        status: BadgeStatus,
    ) -> impl Iterator<Item = &'a BadgeRecord> + use<'a> {
        self.badges.iter().filter(move |b| b.status == status)
    }

    /// Badges that carry earning instructions.
    pub fn guides(&self) -> impl Iterator<Item = &'a BadgeRecord> + use<'a> {
        self.badges.iter().filter(|b| b.has_guide())
    }

    /// Check that every identifier is unique.
    pub fn validate(&self) -> crate::Result<()> {
        let mut seen = BTreeSet::new();
        for badge in self.badges {
            if !seen.insert(badge.id) {
                return Err(BadgeError::DuplicateBadgeId(badge.id.to_string()));
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_ids_are_unique() {
        assert!(Catalog::builtin().validate().is_ok());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let dup = [BADGES[0], BADGES[0]];
        let err = Catalog::new(&dup).validate();
        assert!(matches!(err, Err(BadgeError::DuplicateBadgeId(id)) if id == "quickdraw"));
    }

    #[test]
    fn builtin_sections_have_expected_sizes() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 12);
        assert_eq!(catalog.with_status(BadgeStatus::Active).count(), 7);
        assert_eq!(catalog.with_status(BadgeStatus::Retired).count(), 2);
        assert_eq!(catalog.with_status(BadgeStatus::Program).count(), 3);
    }

    #[test]
    fn get_finds_by_id() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.get("yolo").map(|b| b.name), Some("YOLO"));
        assert!(catalog.get("nope").is_none());
    }

    #[test]
    fn guides_skip_badges_without_steps() {
        let ids: Vec<&str> = Catalog::builtin().guides().map(|b| b.id).collect();
        assert_eq!(ids.len(), 7);
        assert!(!ids.contains(&"mars-2020"));
        assert!(ids.contains(&"starstruck"));
    }

    #[test]
    fn tier_lists_keep_source_order() {
        let shark = Catalog::builtin().get("pull-shark");
        let tiers: Vec<Tier> = shark
            .map(|b| b.tiers.iter().map(|t| t.tier).collect())
            .unwrap_or_default();
        assert_eq!(tiers, vec![Tier::Bronze, Tier::Silver, Tier::Gold]);
    }
}
