//! redb-backed [`OwnedStore`].
//!
//! One table, `preferences`, keyed by string. The owned set lives under
//! [`OWNED_KEY`] as a snapshot from [`crate::formats`].

use crate::formats::{decode_owned, encode_owned};
use crate::owned::{OWNED_KEY, OwnedSet, OwnedStore};
use redb::{Database, ReadableDatabase, TableDefinition, TableError};
use std::fmt;
use std::path::{Path, PathBuf};

/// Preference table: key -> opaque bytes.
pub const PREFERENCES: TableDefinition<&str, &[u8]> = TableDefinition::new("preferences");

/// Owned-set store in a redb database file.
pub struct RedbOwnedStore {
    db: Database,
    path: PathBuf,
}

impl fmt::Debug for RedbOwnedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedbOwnedStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RedbOwnedStore {
    /// Open the database at `path`, creating it if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let db = Database::create(&path)?;
        Ok(Self { db, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw snapshot bytes under [`OWNED_KEY`], if present.
    fn read_snapshot(&self) -> crate::Result<Option<Vec<u8>>> {
        let txn = self.db.begin_read()?;
        let table = match txn.open_table(PREFERENCES) {
            Ok(table) => table,
            // Nothing has been saved yet.
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(table.get(OWNED_KEY)?.map(|guard| guard.value().to_vec()))
    }

    fn write_snapshot(&self, bytes: &[u8]) -> crate::Result<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(PREFERENCES)?;
            table.insert(OWNED_KEY, bytes)?;
        }
        txn.commit()?;
        Ok(())
    }
}

impl OwnedStore for RedbOwnedStore {
    /// A missing table or key loads as the empty set; an unreadable
    /// snapshot is a [`crate::BadgeError::Format`] error.
    fn load(&self) -> crate::Result<OwnedSet> {
        match self.read_snapshot()? {
            Some(bytes) => decode_owned(&bytes),
            None => Ok(OwnedSet::new()),
        }
    }

    fn save(&mut self, owned: &OwnedSet) -> crate::Result<()> {
        let bytes = encode_owned(owned)?;
        self.write_snapshot(&bytes)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::BadgeError;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> RedbOwnedStore {
        RedbOwnedStore::open(dir.path().join("prefs.redb")).unwrap()
    }

    #[test]
    fn fresh_database_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.load().unwrap(), OwnedSet::new());
    }

    #[test]
    fn saved_set_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let owned = OwnedSet::from_ids(["yolo", "pull-shark"]);
        {
            let mut store = store_in(&dir);
            store.save(&owned).unwrap();
        }
        let reopened = store_in(&dir);
        assert_eq!(reopened.load().unwrap(), owned);
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.save(&OwnedSet::from_ids(["yolo"])).unwrap();
        store.save(&OwnedSet::from_ids(["quickdraw"])).unwrap();

        let loaded = store.load().unwrap();
        assert!(loaded.contains("quickdraw"));
        assert!(!loaded.contains("yolo"));
    }

    #[test]
    fn corrupt_snapshot_is_a_format_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.write_snapshot(b"not a snapshot").unwrap();
        assert!(matches!(store.load(), Err(BadgeError::Format(_))));
    }

    #[test]
    fn debug_shows_path() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.path(), dir.path().join("prefs.redb"));
        assert!(format!("{store:?}").contains("prefs.redb"));
    }
}
