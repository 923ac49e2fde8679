//! # badgedex-core
//!
//! The pure logic behind badgedex: a static catalog of GitHub achievement
//! badges, the filter/sort engine that narrows it for display, the tier
//! progress calculator used for profile estimates, and the reducers that
//! model the visitor's owned set and profile lookups.
//!
//! ## Layout
//!
//! ```text
//! badge      - record types (status, rarity, category, tiers)
//! catalog    - the compiled-in catalog and FAQ
//! filter     - process(): search -> ownership -> category -> sort
//! cache      - LRU memoization of process() results
//! tier       - tier_of() and the built-in progress tracks
//! owned      - OwnedSet reducer + OwnedStore adapter trait
//! lookup     - profile lookup state with stale-response rejection
//! formats    - binary snapshot of the owned set
//! storage    - redb-backed OwnedStore
//! ```
//!
//! Nothing in this crate performs network I/O or spawns threads.

pub mod badge;
pub mod cache;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod formats;
pub mod lookup;
pub mod owned;
pub mod storage;
pub mod tier;

pub use badge::{BadgeRecord, BadgeStatus, Category, Rarity, Tier, TierRequirement};
pub use cache::{CatalogView, LruCache, ViewKey};
pub use catalog::{BADGES, Catalog, FAQS, FaqItem};
pub use error::BadgeError;
pub use filter::{CategoryFilter, FilterState, SortKey, StatusFilter, process};
pub use formats::{decode_owned, encode_owned};
pub use lookup::{LookupFailure, LookupState, LookupTicket, ProfileStats, ProfileSummary};
pub use owned::{MemoryStore, OwnedSet, OwnedStore};
pub use storage::RedbOwnedStore;
pub use tier::{
    BadgeProgress, PULL_SHARK, STARSTRUCK, Thresholds, TierProgress, Track, progress_for, tier_of,
};

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, BadgeError>;
