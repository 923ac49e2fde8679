//! # Owned Set
//!
//! The visitor's collection of self-marked badges.
//!
//! `OwnedSet` is a value: `toggle` consumes it and returns the next state.
//! Persistence is a separate adapter ([`OwnedStore`]) that callers invoke
//! after a transition has been accepted; the reducer itself never touches
//! storage.

use crate::badge::BadgeRecord;
use crate::catalog::Catalog;
use crate::BadgeError;
use std::collections::BTreeSet;

/// Fixed key under which the owned set is persisted.
pub const OWNED_KEY: &str = "owned-badges";

// =============================================================================
// OWNED SET
// =============================================================================

/// Set of badge identifiers marked collected.
///
/// Uses `BTreeSet` so iteration (and therefore the stored snapshot) is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OwnedSet {
    ids: BTreeSet<String>,
}

impl OwnedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from identifiers. Duplicates collapse.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Flip membership of `id`: remove it if present, add it otherwise.
    #[must_use]
    pub fn toggle(mut self, id: &str) -> Self {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
        self
    }

    /// Toggle `id` only if it names a badge in `catalog`.
    pub fn toggle_in(self, catalog: &Catalog<'_>, id: &str) -> crate::Result<Self> {
        if !catalog.contains(id) {
            return Err(BadgeError::UnknownBadge(id.to_string()));
        }
        Ok(self.toggle(id))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// All stored identifiers in sorted order, including stale ones.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Owned badges that still exist in `catalog`, in catalog order.
    ///
    /// Stale identifiers left over from a larger catalog are skipped.
    pub fn visible<'c>(
        &self,
        catalog: Catalog<'c>,
    ) -> impl Iterator<Item = &'c BadgeRecord> + use<'_, 'c> {
        catalog
            .badges()
            .iter()
            .filter(move |b| self.contains(b.id))
    }
}

// =============================================================================
// PERSISTENCE ADAPTER
// =============================================================================

/// Durable home for the owned set.
///
/// Implementations store the whole set under [`OWNED_KEY`]. A missing entry
/// loads as the empty set.
pub trait OwnedStore {
    fn load(&self) -> crate::Result<OwnedSet>;

    fn save(&mut self, owned: &OwnedSet) -> crate::Result<()>;
}

impl<S: OwnedStore + ?Sized> OwnedStore for Box<S> {
    fn load(&self) -> crate::Result<OwnedSet> {
        (**self).load()
    }

    fn save(&mut self, owned: &OwnedSet) -> crate::Result<()> {
        (**self).save(owned)
    }
}

/// In-memory store, mainly for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Option<OwnedSet>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// A store holding `saved` that cannot be decoded on load.
    #[must_use]
    pub fn unreadable(saved: OwnedSet) -> Self {
        Self {
            saved: Some(saved),
            fail_reads: true,
            ..Self::default()
        }
    }

    /// The last successfully saved set, if any.
    #[must_use]
    pub fn saved(&self) -> Option<&OwnedSet> {
        self.saved.as_ref()
    }
}

impl OwnedStore for MemoryStore {
    fn load(&self) -> crate::Result<OwnedSet> {
        if self.fail_reads {
            return Err(BadgeError::Format("unreadable snapshot".to_string()));
        }
        Ok(self.saved.clone().unwrap_or_default())
    }

    fn save(&mut self, owned: &OwnedSet) -> crate::Result<()> {
        if self.fail_writes {
            return Err(BadgeError::Storage("write rejected".to_string()));
        }
        self.saved = Some(owned.clone());
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn toggle_adds_then_removes() {
        let owned = OwnedSet::new().toggle("yolo");
        assert!(owned.contains("yolo"));
        let owned = owned.toggle("yolo");
        assert!(!owned.contains("yolo"));
        assert!(owned.is_empty());
    }

    #[test]
    fn toggle_in_rejects_unknown_ids() {
        let catalog = Catalog::builtin();
        let result = OwnedSet::new().toggle_in(&catalog, "not-a-badge");
        assert!(matches!(result, Err(BadgeError::UnknownBadge(id)) if id == "not-a-badge"));
    }

    #[test]
    fn visible_skips_stale_ids_and_follows_catalog_order() {
        let catalog = Catalog::builtin();
        let owned = OwnedSet::from_ids(["starstruck", "retired-long-ago", "quickdraw"]);
        let visible: Vec<&str> = owned.visible(catalog).map(|b| b.id).collect();
        assert_eq!(visible, vec!["quickdraw", "starstruck"]);
        assert_eq!(owned.len(), 3);
    }

    #[test]
    fn visible_records_outlive_the_set() {
        let visible: Vec<&'static BadgeRecord> = {
            let owned = OwnedSet::from_ids(["yolo"]);
            owned.visible(Catalog::builtin()).collect()
        };
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "yolo");
    }

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load().ok(), Some(OwnedSet::new()));

        let owned = OwnedSet::from_ids(["yolo"]);
        assert!(store.save(&owned).is_ok());
        assert_eq!(store.load().ok(), Some(owned));
    }

    #[test]
    fn failing_store_keeps_nothing() {
        let mut store = MemoryStore::failing();
        assert!(store.save(&OwnedSet::from_ids(["yolo"])).is_err());
        assert!(store.saved().is_none());
    }

    proptest! {
        #[test]
        fn prop_toggle_is_an_involution(
            ids in prop::collection::btree_set("[a-z]{1,8}", 0..10),
            target in "[a-z]{1,8}",
        ) {
            let original = OwnedSet::from_ids(ids);
            let round_trip = original.clone().toggle(&target).toggle(&target);
            prop_assert_eq!(round_trip, original);
        }
    }
}
