//! # redb-backed Profile Storage
//!
//! A disk-backed profile store using the redb embedded database:
//! ACID transactions, crash safety (copy-on-write B-trees), zero
//! configuration.
//!
//! The store holds the canonical snapshot bytes (header + postcard
//! payload) under a single key and commits a fresh snapshot per mutation.
//! Profiles are small, so whole-snapshot writes stay cheap and keep the
//! on-disk state identical to the export format.

use crate::formats::persistence::{profile_from_bytes, profile_to_bytes};
use crate::profile::Profile;
use crate::types::SproutError;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;

/// Table for the profile snapshot: fixed key -> snapshot bytes.
const SNAPSHOT: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshot");

/// Key under which the current snapshot is stored.
const CURRENT: &str = "current";

/// A disk-backed profile store using redb.
pub struct RedbStore {
    /// The redb database handle.
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a profile database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SproutError> {
        let db =
            Database::create(path.as_ref()).map_err(|e| SproutError::IoError(e.to_string()))?;

        // Initialize the table if it doesn't exist
        {
            let write_txn = db
                .begin_write()
                .map_err(|e| SproutError::IoError(e.to_string()))?;
            let _ = write_txn
                .open_table(SNAPSHOT)
                .map_err(|e| SproutError::IoError(e.to_string()))?;
            write_txn
                .commit()
                .map_err(|e| SproutError::IoError(e.to_string()))?;
        }

        Ok(Self { db })
    }

    /// Load the stored profile, if one has been saved.
    pub fn load(&self) -> Result<Option<Profile>, SproutError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| SproutError::IoError(e.to_string()))?;
        let table = read_txn
            .open_table(SNAPSHOT)
            .map_err(|e| SproutError::IoError(e.to_string()))?;

        let bytes = {
            let guard = table
                .get(CURRENT)
                .map_err(|e| SproutError::IoError(e.to_string()))?;
            match guard {
                Some(value) => value.value().to_vec(),
                None => return Ok(None),
            }
        };

        profile_from_bytes(&bytes).map(Some)
    }

    /// Persist a profile snapshot in a single ACID commit.
    pub fn save(&self, profile: &Profile) -> Result<(), SproutError> {
        let bytes = profile_to_bytes(profile)?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| SproutError::IoError(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(SNAPSHOT)
                .map_err(|e| SproutError::IoError(e.to_string()))?;
            table
                .insert(CURRENT, bytes.as_slice())
                .map_err(|e| SproutError::IoError(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| SproutError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Compact the database file (optional optimization).
    pub fn compact(&mut self) -> Result<(), SproutError> {
        self.db
            .compact()
            .map_err(|e| SproutError::IoError(e.to_string()))?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SavingsGoal, VisualKind};
    use chrono::NaiveDate;

    #[test]
    fn fresh_store_loads_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = RedbStore::open(dir.path().join("profile.db")).expect("open");
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("profile.db");

        let mut profile = Profile::new();
        profile
            .add_goal(SavingsGoal::fixed(
                "trip",
                "Trip",
                1000.0,
                VisualKind::Pet,
                Some("swan".to_string()),
            ))
            .expect("add");
        profile
            .deposit(
                "trip",
                NaiveDate::from_ymd_opt(2025, 7, 1).expect("date"),
                250.0,
            )
            .expect("deposit");

        {
            let store = RedbStore::open(&path).expect("open");
            store.save(&profile).expect("save");
        }

        // Reopen: the profile survives the handle drop.
        let store = RedbStore::open(&path).expect("reopen");
        let loaded = store.load().expect("load").expect("saved profile");
        assert_eq!(loaded, profile);
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = RedbStore::open(dir.path().join("profile.db")).expect("open");

        let first = Profile::new();
        store.save(&first).expect("save");

        let mut second = Profile::new();
        second
            .wallet
            .credit(crate::types::CurrencyKind::Mustika, 42);
        store.save(&second).expect("save");

        let loaded = store.load().expect("load").expect("profile");
        assert_eq!(loaded.wallet.mustika, 42);
    }
}
