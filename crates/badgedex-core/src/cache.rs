//! # View Cache
//!
//! LRU memoization of [`crate::process`] results.
//!
//! The catalog is small enough that recomputing on every keystroke is cheap;
//! the cache exists so a long-running front end (the HTTP API) can answer
//! repeated identical queries without re-sorting.
//!
//! ## Design
//!
//! - `BTreeMap` storage for deterministic ordering
//! - Logical clock (monotonic counter) instead of wall time
//! - Keys hold the full owned id list rather than a hash, so two different
//!   owned sets can never collide

use crate::badge::BadgeRecord;
use crate::filter::{CategoryFilter, FilterState, SortKey, StatusFilter, process_indices};
use crate::owned::OwnedSet;
use std::collections::BTreeMap;

// =============================================================================
// LRU CACHE CONFIGURATION
// =============================================================================

/// Default maximum number of cached views.
pub const DEFAULT_VIEW_CACHE_SIZE: usize = 64;

/// Default eviction batch size (number of entries to evict at once).
pub const DEFAULT_EVICTION_BATCH: usize = 8;

// =============================================================================
// CACHE ENTRY
// =============================================================================

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    /// Logical timestamp of last access.
    last_access: u64,
}

// =============================================================================
// LRU CACHE
// =============================================================================

/// Least-recently-used cache over ordered keys.
#[derive(Debug)]
pub struct LruCache<K: Ord + Clone, V: Clone> {
    entries: BTreeMap<K, CacheEntry<V>>,
    max_size: usize,
    eviction_batch: usize,
    logical_clock: u64,
    hits: u64,
    misses: u64,
}

impl<K: Ord + Clone, V: Clone> Default for LruCache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_VIEW_CACHE_SIZE)
    }
}

impl<K: Ord + Clone, V: Clone> LruCache<K, V> {
    /// Create a cache holding at most `max_size` entries (minimum 1).
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            max_size: max_size.max(1),
            eviction_batch: DEFAULT_EVICTION_BATCH,
            logical_clock: 0,
            hits: 0,
            misses: 0,
        }
    }

    #[must_use]
    pub fn with_eviction_batch(mut self, batch_size: usize) -> Self {
        self.eviction_batch = batch_size.max(1);
        self
    }

    /// Get a value, refreshing its recency on hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.logical_clock = self.logical_clock.saturating_add(1);
        let timestamp = self.logical_clock;

        if let Some(entry) = self.entries.get_mut(key) {
            entry.last_access = timestamp;
            self.hits = self.hits.saturating_add(1);
            Some(&entry.value)
        } else {
            self.misses = self.misses.saturating_add(1);
            None
        }
    }

    /// Insert a value, evicting the least recently used entries when full.
    pub fn insert(&mut self, key: K, value: V) {
        self.logical_clock = self.logical_clock.saturating_add(1);
        let timestamp = self.logical_clock;

        if self.entries.len() >= self.max_size && !self.entries.contains_key(&key) {
            self.evict();
        }

        self.entries.insert(
            key,
            CacheEntry {
                value,
                last_access: timestamp,
            },
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    fn evict(&mut self) {
        let to_evict = self.eviction_batch.min(self.entries.len());

        let mut by_access: Vec<(u64, K)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.last_access, key.clone()))
            .collect();
        by_access.sort_by_key(|(access, _)| *access);

        for (_, key) in by_access.into_iter().take(to_evict) {
            self.entries.remove(&key);
        }
    }
}

// =============================================================================
// CATALOG VIEW
// =============================================================================

/// Cache key: every input of `process` except the catalog itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ViewKey {
    pub search: String,
    pub status: StatusFilter,
    pub category: CategoryFilter,
    pub sort: SortKey,
    pub owned: Vec<String>,
}

impl ViewKey {
    #[must_use]
    pub fn new(state: &FilterState, owned: &OwnedSet) -> Self {
        Self {
            search: state.search.clone(),
            status: state.status,
            category: state.category,
            sort: state.sort,
            owned: owned.ids().map(str::to_string).collect(),
        }
    }
}

/// A catalog slice paired with a cache of its processed views.
///
/// Cached values are positions into the slice, so a `CatalogView` must only
/// ever serve the slice it was built with.
#[derive(Debug)]
pub struct CatalogView<'a> {
    badges: &'a [BadgeRecord],
    cache: LruCache<ViewKey, Vec<usize>>,
}

impl<'a> CatalogView<'a> {
    #[must_use]
    pub fn new(badges: &'a [BadgeRecord]) -> Self {
        Self::with_capacity(badges, DEFAULT_VIEW_CACHE_SIZE)
    }

    #[must_use]
    pub fn with_capacity(badges: &'a [BadgeRecord], capacity: usize) -> Self {
        Self {
            badges,
            cache: LruCache::new(capacity),
        }
    }

    /// Same result as `process(badges, state, owned)`, memoized.
    pub fn view(&mut self, state: &FilterState, owned: &OwnedSet) -> Vec<&'a BadgeRecord> {
        let key = ViewKey::new(state, owned);
        let badges = self.badges;

        let indices = match self.cache.get(&key) {
            Some(hit) => hit.clone(),
            None => {
                let computed = process_indices(badges, state, owned);
                self.cache.insert(key, computed.clone());
                computed
            }
        };

        indices.into_iter().filter_map(|i| badges.get(i)).collect()
    }

    #[must_use]
    pub fn cache(&self) -> &LruCache<ViewKey, Vec<usize>> {
        &self.cache
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BADGES;
    use crate::filter::process;

    #[test]
    fn cache_insert_and_get() {
        let mut cache = LruCache::new(10);
        cache.insert(1u64, "value1");
        cache.insert(2u64, "value2");

        assert_eq!(cache.get(&1), Some(&"value1"));
        assert_eq!(cache.get(&2), Some(&"value2"));
        assert_eq!(cache.get(&3), None);
        assert_eq!(cache.hits(), 2);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn cache_evicts_least_recently_used() {
        let mut cache = LruCache::new(3).with_eviction_batch(1);

        cache.insert(1u64, "a");
        cache.insert(2u64, "b");
        cache.insert(3u64, "c");

        let _ = cache.get(&1);
        let _ = cache.get(&2);

        cache.insert(4u64, "d");

        assert!(cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(!cache.contains(&3));
        assert!(cache.contains(&4));
    }

    #[test]
    fn cache_update_existing_does_not_evict() {
        let mut cache = LruCache::new(1);
        cache.insert(1u64, "old");
        cache.insert(1u64, "new");

        assert_eq!(cache.get(&1), Some(&"new"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn view_matches_uncached_process() {
        let mut view = CatalogView::new(BADGES);
        let owned = OwnedSet::from_ids(["yolo", "starstruck"]);
        let states = [
            FilterState::new(),
            FilterState::new().with_sort(SortKey::Name),
            FilterState::new().with_status(StatusFilter::Missing).with_sort(SortKey::Rarity),
            FilterState::new().with_search("pr"),
        ];

        for state in &states {
            let expected: Vec<&str> = process(BADGES, state, &owned).iter().map(|b| b.id).collect();
            let first: Vec<&str> = view.view(state, &owned).iter().map(|b| b.id).collect();
            let second: Vec<&str> = view.view(state, &owned).iter().map(|b| b.id).collect();
            assert_eq!(first, expected);
            assert_eq!(second, expected);
        }
        assert_eq!(view.cache().len(), states.len());
        assert_eq!(view.cache().hits(), states.len() as u64);
    }

    #[test]
    fn different_owned_sets_do_not_share_entries() {
        let mut view = CatalogView::new(BADGES);
        let state = FilterState::new().with_status(StatusFilter::Owned);

        let a = view.view(&state, &OwnedSet::from_ids(["yolo"]));
        let b = view.view(&state, &OwnedSet::from_ids(["quickdraw"]));

        assert_eq!(a.first().map(|r| r.id), Some("yolo"));
        assert_eq!(b.first().map(|r| r.id), Some("quickdraw"));
        assert_eq!(view.cache().len(), 2);
    }
}
