//! # sprout-core
//!
//! The deterministic savings engine for Sprout - THE LOGIC.
//!
//! This crate implements the engine behind the gamified savings app: the
//! cosmetics catalog, goal growth scoring, evolution stages, the weekly
//! shop discount rotation, daily collection rewards, and theme palette
//! derivation — all as pure functions over plain data, plus the profile
//! state they drive.
//!
//! ## Architectural Constraints
//!
//! - Has NO async, NO network dependencies (pure Rust)
//! - Deterministic: `BTreeMap`/`BTreeSet` only, no ambient clock, no
//!   randomness; calendar dates are injected parameters
//! - Derivations are total: unparseable colors fall back to defaults,
//!   empty histories/catalogs yield zero/none results, unavailability is
//!   data (`Option`), not an error

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod formats;
pub mod growth;
pub mod profile;
pub mod rewards;
pub mod session;
pub mod shop;
pub mod stage;
pub mod storage;
pub mod theme;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    CurrencyKind, CustomTheme, GoalTarget, HistoryEntry, ItemKind, Rarity, SavingsGoal, ShopItem,
    SproutError, VisualKind, Wallet,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use catalog::{Catalog, SkinAssets};
pub use growth::{fixed_progress, goal_stage, progress_percent, score_infinite};
pub use profile::Profile;
pub use rewards::{ClaimLedger, ItemReward, RewardSummary, aggregate_rewards};
pub use session::{Session, StorageBackend};
pub use shop::{DiscountOffer, current_offer, discounted_price, select_discounted};
pub use stage::{Stage, StageView, classify_stage};
pub use storage::RedbStore;
pub use theme::{BackgroundSpec, Rgb, derive_theme};

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{profile_from_bytes, profile_to_bytes, snapshot_checksum};
