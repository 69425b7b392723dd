//! # Session Module
//!
//! Session management combining a profile with its catalog and storage.
//!
//! ## Storage Backends
//!
//! - `InMemory`: volatile profile (fast; explicit export for durability)
//! - `Persistent`: redb-backed store; every successful mutation is
//!   committed before it is reported back to the caller
//!
//! The catalog and skin assets are immutable session collaborators,
//! supplied once at startup.

use crate::catalog::{Catalog, SkinAssets};
use crate::formats::persistence::{profile_from_bytes, profile_to_bytes, snapshot_checksum};
use crate::profile::Profile;
use crate::rewards::RewardSummary;
use crate::shop::{self, DiscountOffer};
use crate::storage::RedbStore;
use crate::theme::BackgroundSpec;
use crate::types::{CustomTheme, SavingsGoal, SproutError};
use chrono::NaiveDate;
use std::path::Path;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Storage backend for a Session.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory profile (fast, volatile).
    InMemory(Profile),
    /// Disk-backed profile using redb (ACID, persistent).
    Persistent { store: RedbStore, profile: Profile },
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(Profile::new())
    }
}

// NOTE: StorageBackend does NOT implement Clone.
// RedbStore (database handle) cannot be safely cloned.

// =============================================================================
// SESSION
// =============================================================================

/// A Session combines a profile with the immutable catalog and asset
/// table, dispatching mutations to the active storage backend.
#[derive(Debug)]
pub struct Session {
    backend: StorageBackend,
    catalog: Catalog,
    assets: SkinAssets,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a new in-memory session with the builtin catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            backend: StorageBackend::default(),
            catalog: Catalog::builtin(),
            assets: SkinAssets::builtin(),
        }
    }

    /// Create an in-memory session around an existing profile.
    #[must_use]
    pub fn with_profile(profile: Profile) -> Self {
        Self {
            backend: StorageBackend::InMemory(profile),
            catalog: Catalog::builtin(),
            assets: SkinAssets::builtin(),
        }
    }

    /// Create a session with persistent redb storage.
    ///
    /// Opens or creates a database at the given path; an existing
    /// snapshot is loaded, otherwise a fresh profile is started.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, SproutError> {
        let store = RedbStore::open(path)?;
        let profile = store.load()?.unwrap_or_default();
        Ok(Self {
            backend: StorageBackend::Persistent { store, profile },
            catalog: Catalog::builtin(),
            assets: SkinAssets::builtin(),
        })
    }

    /// Replace the catalog (startup configuration; order is contractual).
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Persistent { .. })
    }

    /// The immutable catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The immutable skin asset table.
    #[must_use]
    pub fn assets(&self) -> &SkinAssets {
        &self.assets
    }

    /// The current profile state.
    #[must_use]
    pub fn profile(&self) -> &Profile {
        match &self.backend {
            StorageBackend::InMemory(profile) => profile,
            StorageBackend::Persistent { profile, .. } => profile,
        }
    }

    /// Run a mutation against the profile, committing to disk first on
    /// persistent backends. Failed mutations are never committed.
    fn mutate<T>(
        backend: &mut StorageBackend,
        op: impl FnOnce(&mut Profile) -> Result<T, SproutError>,
    ) -> Result<T, SproutError> {
        match backend {
            StorageBackend::InMemory(profile) => op(profile),
            StorageBackend::Persistent { store, profile } => {
                let out = op(profile)?;
                store.save(profile)?;
                Ok(out)
            }
        }
    }

    // =========================================================================
    // SHOP
    // =========================================================================

    /// This week's discount offer, if any (owned selections are exempt).
    #[must_use]
    pub fn current_offer(&self, today: NaiveDate) -> Option<DiscountOffer> {
        shop::current_offer(&self.catalog, self.profile().owned(), today)
    }

    /// Buy an item at today's effective price. Returns the price paid.
    pub fn purchase(&mut self, item_id: &str, today: NaiveDate) -> Result<u64, SproutError> {
        let catalog = &self.catalog;
        Self::mutate(&mut self.backend, |profile| {
            profile.purchase(catalog, item_id, today)
        })
    }

    // =========================================================================
    // DAILY CLAIM
    // =========================================================================

    /// Whether the daily claim is available today.
    #[must_use]
    pub fn can_claim(&self, today: NaiveDate) -> bool {
        self.profile().can_claim(&self.catalog, today)
    }

    /// Claim today's collection rewards.
    ///
    /// `Ok(None)` when the claim is unavailable; `Err` only on storage
    /// failure.
    pub fn claim_daily(
        &mut self,
        today: NaiveDate,
    ) -> Result<Option<RewardSummary>, SproutError> {
        let catalog = &self.catalog;
        match &mut self.backend {
            StorageBackend::InMemory(profile) => Ok(profile.claim_daily(catalog, today)),
            StorageBackend::Persistent { store, profile } => {
                let summary = profile.claim_daily(catalog, today);
                if summary.is_some() {
                    store.save(profile)?;
                }
                Ok(summary)
            }
        }
    }

    // =========================================================================
    // GOALS
    // =========================================================================

    /// Add a new goal.
    pub fn add_goal(&mut self, goal: SavingsGoal) -> Result<(), SproutError> {
        Self::mutate(&mut self.backend, |profile| profile.add_goal(goal))
    }

    /// Deposit into a goal. Returns the new saved amount.
    pub fn deposit(
        &mut self,
        goal_id: &str,
        at: NaiveDate,
        amount: f64,
    ) -> Result<f64, SproutError> {
        Self::mutate(&mut self.backend, |profile| {
            profile.deposit(goal_id, at, amount)
        })
    }

    /// Withdraw from a goal. Returns the amount actually withdrawn.
    pub fn withdraw(
        &mut self,
        goal_id: &str,
        at: NaiveDate,
        amount: f64,
    ) -> Result<f64, SproutError> {
        Self::mutate(&mut self.backend, |profile| {
            profile.withdraw(goal_id, at, amount)
        })
    }

    /// Cash out a completed goal. Returns the cashed-out balance.
    pub fn cash_out(&mut self, goal_id: &str) -> Result<f64, SproutError> {
        Self::mutate(&mut self.backend, |profile| profile.cash_out(goal_id))
    }

    // =========================================================================
    // THEMES
    // =========================================================================

    /// Derive and store a custom theme. Returns the stored theme.
    pub fn add_theme(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        primary: &str,
        accent: &str,
        card_background: &str,
        background: &BackgroundSpec,
    ) -> Result<CustomTheme, SproutError> {
        let id = id.into();
        let name = name.into();
        Self::mutate(&mut self.backend, |profile| {
            Ok(profile
                .add_theme(id, name, primary, accent, card_background, background)
                .clone())
        })
    }

    // =========================================================================
    // SNAPSHOTS (backup / export / import)
    // =========================================================================

    /// Export the profile as canonical snapshot bytes plus checksum.
    pub fn export_snapshot(&self) -> Result<(Vec<u8>, u64), SproutError> {
        let bytes = profile_to_bytes(self.profile())?;
        let checksum = snapshot_checksum(&bytes);
        Ok((bytes, checksum))
    }

    /// Replace the profile from snapshot bytes (backup restore).
    pub fn import_snapshot(&mut self, bytes: &[u8]) -> Result<(), SproutError> {
        let restored = profile_from_bytes(bytes)?;
        Self::mutate(&mut self.backend, move |profile| {
            *profile = restored;
            Ok(())
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
