//! # Badge Records
//!
//! The immutable record types that make up the catalog.
//!
//! Records borrow `'static` data: the catalog is compiled into the binary and
//! never mutated, so nothing here owns heap memory.

use crate::BadgeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Lifecycle status of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BadgeStatus {
    /// Currently earnable.
    Active,
    /// No longer earnable; kept for legacy holders.
    Retired,
    /// Granted through a paid or membership program.
    Program,
}

impl BadgeStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Retired => "Retired",
            Self::Program => "Program",
        }
    }
}

impl fmt::Display for BadgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Editorial difficulty classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

impl Rarity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Legendary => "Legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thematic grouping used by the category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Contribution,
    Collaboration,
    Community,
    Program,
}

impl Category {
    pub const ALL: [Self; 4] = [
        Self::Contribution,
        Self::Collaboration,
        Self::Community,
        Self::Program,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contribution => "Contribution",
            Self::Collaboration => "Collaboration",
            Self::Community => "Community",
            Self::Program => "Program",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = BadgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| BadgeError::InvalidFilter {
                kind: "category",
                value: s.to_string(),
                expected: "Contribution, Collaboration, Community, Program",
            })
    }
}

/// One ordinal level of achievement difficulty.
///
/// `Base` marks single-tier badges; the numeric tracks only ever report
/// `None`, `Bronze`, `Silver` or `Gold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    None,
    Base,
    Bronze,
    Silver,
    Gold,
}

impl Tier {
    /// Ordinal rank, `None` = 0 through `Gold` = 4.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Base => 1,
            Self::Bronze => 2,
            Self::Silver => 3,
            Self::Gold => 4,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Base => "Base",
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// A tier label paired with its human-readable requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierRequirement {
    pub tier: Tier,
    pub description: &'static str,
}

impl TierRequirement {
    pub const fn new(tier: Tier, description: &'static str) -> Self {
        Self { tier, description }
    }
}

/// A single catalog entry.
///
/// Tier, guide and tip lists are empty slices when the badge has none. Their
/// order is significant and always preserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeRecord {
    pub id: &'static str,
    pub name: &'static str,
    pub glyph: &'static str,
    pub description: &'static str,
    pub status: BadgeStatus,
    pub rarity: Rarity,
    pub category: Category,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub tiers: &'static [TierRequirement],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub guide: &'static [&'static str],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub tips: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

impl BadgeRecord {
    /// Number of declared tiers (0 for untiered badges).
    #[must_use]
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Whether the badge carries step-by-step earning instructions.
    #[must_use]
    pub fn has_guide(&self) -> bool {
        !self.guide.is_empty()
    }

    /// Case-insensitive substring match over name, description, guide steps
    /// and tips. `needle` must already be lower-cased.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        let hit = |text: &str| text.to_lowercase().contains(needle);
        hit(self.name)
            || hit(self.description)
            || self.guide.iter().any(|step| hit(step))
            || self.tips.iter().any(|tip| hit(tip))
    }
}

// =============================================================================
// TESTS
// =============================================================================
