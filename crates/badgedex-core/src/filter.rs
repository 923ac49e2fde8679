//! # Filter Engine
//!
//! Narrows and orders the catalog for display.
//!
//! `process` applies four steps in a fixed order, each a narrowing or a
//! reordering of the previous result:
//!
//! 1. text search (lower-cased substring over name, description, guide, tips)
//! 2. ownership filter
//! 3. category filter
//! 4. stable sort
//!
//! The input slice is never mutated. Search text is matched literally:
//! leading or trailing whitespace is part of the needle.

use crate::badge::{BadgeRecord, Category};
use crate::owned::OwnedSet;
use crate::BadgeError;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// FILTER DIMENSIONS
// =============================================================================

/// Ownership predicate.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Owned,
    Missing,
}

impl StatusFilter {
    /// Whether a badge with the given ownership passes the filter.
    #[must_use]
    pub fn admits(self, is_owned: bool) -> bool {
        match self {
            Self::All => true,
            Self::Owned => is_owned,
            Self::Missing => !is_owned,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Owned => "owned",
            Self::Missing => "missing",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = BadgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "owned" => Ok(Self::Owned),
            "missing" => Ok(Self::Missing),
            _ => Err(BadgeError::InvalidFilter {
                kind: "status filter",
                value: s.to_string(),
                expected: "all, owned, missing",
            }),
        }
    }
}

/// Category predicate. `All` is the identity filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    #[must_use]
    pub fn admits(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = BadgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<Category>()
            .map(Self::Only)
            .map_err(|_| BadgeError::InvalidFilter {
                kind: "category filter",
                value: s.to_string(),
                expected: "All, Contribution, Collaboration, Community, Program",
            })
    }
}

/// Ordering applied after filtering.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Catalog declaration order.
    #[default]
    Default,
    /// Case-insensitive name, ascending.
    Name,
    /// Category name, ascending.
    Category,
    /// Tier count, descending; untiered badges last.
    Rarity,
}

impl SortKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Name => "name",
            Self::Category => "category",
            Self::Rarity => "rarity",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = BadgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "name" => Ok(Self::Name),
            "category" => Ok(Self::Category),
            "rarity" => Ok(Self::Rarity),
            _ => Err(BadgeError::InvalidFilter {
                kind: "sort key",
                value: s.to_string(),
                expected: "default, name, category, rarity",
            }),
        }
    }
}

// =============================================================================
// FILTER STATE
// =============================================================================

/// Transient, user-selected predicates. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FilterState {
    pub search: String,
    pub status: StatusFilter,
    pub category: CategoryFilter,
    pub sort: SortKey,
}

impl FilterState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}

// =============================================================================
// PROCESS
// =============================================================================

/// Filter and order `badges` for display.
///
/// Returns references into `badges`; equal sort keys keep their relative
/// input order.
#[must_use]
pub fn process<'a>(
    badges: &'a [BadgeRecord],
    state: &FilterState,
    owned: &OwnedSet,
) -> Vec<&'a BadgeRecord> {
    select(badges, state, owned)
        .into_iter()
        .map(|(_, badge)| badge)
        .collect()
}

/// Positions in `badges` of the `process` result, in output order.
pub(crate) fn process_indices(
    badges: &[BadgeRecord],
    state: &FilterState,
    owned: &OwnedSet,
) -> Vec<usize> {
    select(badges, state, owned)
        .into_iter()
        .map(|(index, _)| index)
        .collect()
}

fn select<'a>(
    badges: &'a [BadgeRecord],
    state: &FilterState,
    owned: &OwnedSet,
) -> Vec<(usize, &'a BadgeRecord)> {
    let needle = state.search.to_lowercase();

    let mut selected: Vec<(usize, &BadgeRecord)> = badges
        .iter()
        .enumerate()
        .filter(|(_, badge)| needle.is_empty() || badge.matches_text(&needle))
        .filter(|(_, badge)| state.status.admits(owned.contains(badge.id)))
        .filter(|(_, badge)| state.category.admits(badge.category))
        .collect();

    // `sort_by_key` is stable; ties keep the editorial order.
    match state.sort {
        SortKey::Default => {}
        SortKey::Name => selected.sort_by_key(|(_, badge)| badge.name.to_lowercase()),
        SortKey::Category => selected.sort_by_key(|(_, badge)| badge.category.as_str()),
        SortKey::Rarity => selected.sort_by_key(|(_, badge)| Reverse(badge.tier_count())),
    }

    selected
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::{BadgeStatus, Rarity, Tier, TierRequirement};
    use crate::catalog::BADGES;
    use proptest::prelude::*;

    const fn badge(id: &'static str, name: &'static str, category: Category) -> BadgeRecord {
        BadgeRecord {
            id,
            name,
            glyph: "",
            description: "",
            status: BadgeStatus::Active,
            rarity: Rarity::Common,
            category,
            tiers: &[],
            guide: &[],
            tips: &[],
            note: None,
        }
    }

    fn ids(result: &[&BadgeRecord]) -> Vec<&'static str> {
        result.iter().map(|b| b.id).collect()
    }

    #[test]
    fn identity_state_returns_input_in_order() {
        let out = process(BADGES, &FilterState::new(), &OwnedSet::new());
        let expected: Vec<&str> = BADGES.iter().map(|b| b.id).collect();
        assert_eq!(ids(&out), expected);
    }

    #[test]
    fn empty_catalog_yields_empty_output() {
        let state = FilterState::new()
            .with_search("x")
            .with_sort(SortKey::Name);
        assert!(process(&[], &state, &OwnedSet::new()).is_empty());
    }

    #[test]
    fn owned_filter_keeps_only_owned() {
        let catalog = [
            badge("a", "A", Category::Contribution),
            badge("b", "B", Category::Community),
        ];
        let owned = OwnedSet::from_ids(["b"]);
        let state = FilterState::new().with_status(StatusFilter::Owned);
        assert_eq!(ids(&process(&catalog, &state, &owned)), vec!["b"]);

        let state = FilterState::new().with_status(StatusFilter::Missing);
        assert_eq!(ids(&process(&catalog, &state, &owned)), vec!["a"]);
    }

    #[test]
    fn search_reaches_guide_steps_and_tips() {
        let state = FilterState::new().with_search("PRIVATE REPOSITORY");
        let out = process(BADGES, &state, &OwnedSet::new());
        assert_eq!(ids(&out), vec!["quickdraw"]);

        let state = FilterState::new().with_search("trailer");
        let out = process(BADGES, &state, &OwnedSet::new());
        assert_eq!(ids(&out), vec!["pair-extraordinaire"]);
    }

    #[test]
    fn search_whitespace_is_literal() {
        let catalog = [
            badge("a", "Pull Shark", Category::Contribution),
            badge("b", "YOLO", Category::Contribution),
        ];
        let state = FilterState::new().with_search(" ");
        assert_eq!(ids(&process(&catalog, &state, &OwnedSet::new())), vec!["a"]);
    }

    #[test]
    fn category_filter_narrows() {
        let state = FilterState::new().with_category(CategoryFilter::Only(Category::Program));
        let out = process(BADGES, &state, &OwnedSet::new());
        assert_eq!(
            ids(&out),
            vec!["github-pro", "developer-program", "security-bug-bounty"]
        );
    }

    #[test]
    fn name_sort_is_case_insensitive() {
        let catalog = [
            badge("1", "beta", Category::Program),
            badge("2", "Alpha", Category::Program),
            badge("3", "Gamma", Category::Program),
        ];
        let state = FilterState::new().with_sort(SortKey::Name);
        assert_eq!(
            ids(&process(&catalog, &state, &OwnedSet::new())),
            vec!["2", "1", "3"]
        );
    }

    #[test]
    fn category_sort_is_lexicographic_and_stable() {
        let catalog = [
            badge("p", "P", Category::Program),
            badge("c1", "C1", Category::Contribution),
            badge("m", "M", Category::Community),
            badge("c2", "C2", Category::Contribution),
            badge("l", "L", Category::Collaboration),
        ];
        let state = FilterState::new().with_sort(SortKey::Category);
        assert_eq!(
            ids(&process(&catalog, &state, &OwnedSet::new())),
            vec!["l", "m", "c1", "c2", "p"]
        );
    }

    #[test]
    fn rarity_sort_puts_more_tiers_first_and_untiered_last() {
        const ONE: &[TierRequirement] = &[TierRequirement::new(Tier::Base, "x")];
        const THREE: &[TierRequirement] = &[
            TierRequirement::new(Tier::Bronze, "x"),
            TierRequirement::new(Tier::Silver, "y"),
            TierRequirement::new(Tier::Gold, "z"),
        ];
        let catalog = [
            badge("none", "N", Category::Program),
            BadgeRecord { tiers: ONE, ..badge("one-a", "O", Category::Program) },
            BadgeRecord { tiers: THREE, ..badge("three", "T", Category::Program) },
            BadgeRecord { tiers: ONE, ..badge("one-b", "O", Category::Program) },
        ];
        let state = FilterState::new().with_sort(SortKey::Rarity);
        assert_eq!(
            ids(&process(&catalog, &state, &OwnedSet::new())),
            vec!["three", "one-a", "one-b", "none"]
        );
    }

    #[test]
    fn builtin_rarity_sort_leads_with_pair_extraordinaire() {
        let state = FilterState::new().with_sort(SortKey::Rarity);
        let out = process(BADGES, &state, &OwnedSet::new());
        assert_eq!(out.first().map(|b| b.id), Some("pair-extraordinaire"));
        assert!(out.iter().skip(7).all(|b| b.tiers.is_empty()));
    }

    #[test]
    fn filters_parse_from_wire_names() {
        assert_eq!("Owned".parse::<StatusFilter>().ok(), Some(StatusFilter::Owned));
        assert_eq!("ALL".parse::<CategoryFilter>().ok(), Some(CategoryFilter::All));
        assert_eq!(
            "community".parse::<CategoryFilter>().ok(),
            Some(CategoryFilter::Only(Category::Community))
        );
        assert_eq!("rarity".parse::<SortKey>().ok(), Some(SortKey::Rarity));
        assert!("stars".parse::<SortKey>().is_err());
        assert!("kept".parse::<StatusFilter>().is_err());
    }

    fn subset() -> impl Strategy<Value = Vec<BadgeRecord>> {
        prop::collection::vec(0..BADGES.len(), 0..20)
            .prop_map(|picks| picks.into_iter().filter_map(|i| BADGES.get(i).copied()).collect())
    }

    proptest! {
        #[test]
        fn prop_identity_law(badges in subset()) {
            let out = process(&badges, &FilterState::new(), &OwnedSet::from_ids(["yolo"]));
            let copied: Vec<BadgeRecord> = out.into_iter().copied().collect();
            prop_assert_eq!(copied, badges);
        }

        #[test]
        fn prop_name_sort_idempotent(badges in subset()) {
            let state = FilterState::new().with_sort(SortKey::Name);
            let owned = OwnedSet::new();
            let once: Vec<BadgeRecord> = process(&badges, &state, &owned).into_iter().copied().collect();
            let twice: Vec<BadgeRecord> = process(&once, &state, &owned).into_iter().copied().collect();
            prop_assert_eq!(&once, &twice);
            for pair in once.windows(2) {
                prop_assert!(pair[0].name.to_lowercase() <= pair[1].name.to_lowercase());
            }
        }

        #[test]
        fn prop_owned_and_missing_partition(badges in subset(), owned_picks in prop::collection::vec(0..BADGES.len(), 0..6)) {
            let owned = OwnedSet::from_ids(owned_picks.iter().filter_map(|&i| BADGES.get(i)).map(|b| b.id));
            let have = process(&badges, &FilterState::new().with_status(StatusFilter::Owned), &owned).len();
            let lack = process(&badges, &FilterState::new().with_status(StatusFilter::Missing), &owned).len();
            prop_assert_eq!(have + lack, badges.len());
        }
    }
}
