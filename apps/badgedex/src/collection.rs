//! The visitor's collection: an [`OwnedSet`] bound to its store.
//!
//! Toggles are applied in memory first and then saved. A failed save is
//! logged and does not undo the toggle; the next successful save catches the
//! store up.
//!
//! If the saved set cannot be read at load time the collection is detached:
//! toggles still work in memory but nothing is written, so an unreadable
//! snapshot (for example one from a newer version) is never overwritten.

use badgedex_core::{BadgeError, Catalog, OwnedSet, OwnedStore};
use tracing::{debug, error, warn};

/// Owned set plus the adapter that persists it.
#[derive(Debug)]
pub struct Collection<S: OwnedStore> {
    catalog: Catalog<'static>,
    owned: OwnedSet,
    store: S,
    detached: bool,
}

impl<S: OwnedStore> Collection<S> {
    /// Load the owned set from `store`, starting empty and detached if it
    /// cannot be read.
    pub fn load(store: S) -> Self {
        let (owned, detached) = match store.load() {
            Ok(owned) => (owned, false),
            Err(err) => {
                error!(
                    error = %err,
                    "could not load owned badges; starting empty and leaving the store untouched"
                );
                (OwnedSet::new(), true)
            }
        };
        debug!(count = owned.len(), detached, "owned set loaded");
        Self {
            catalog: Catalog::builtin(),
            owned,
            store,
            detached,
        }
    }

    /// True when the store could not be read and toggles are not persisted.
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn catalog(&self) -> Catalog<'static> {
        self.catalog
    }

    pub fn owned(&self) -> &OwnedSet {
        &self.owned
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Toggle `id` and persist. Returns whether `id` is now owned.
    ///
    /// # Errors
    ///
    /// [`BadgeError::UnknownBadge`] if `id` is not in the catalog. Storage
    /// failures are not returned.
    pub fn toggle(&mut self, id: &str) -> Result<bool, BadgeError> {
        self.owned = self.owned.clone().toggle_in(&self.catalog, id)?;
        let now_owned = self.owned.contains(id);

        if self.detached {
            warn!(badge = id, "store unreadable; toggle kept in memory only");
        } else if let Err(err) = self.store.save(&self.owned) {
            warn!(badge = id, error = %err, "failed to persist owned badges");
        }
        debug!(badge = id, owned = now_owned, "toggled");
        Ok(now_owned)
    }
}
