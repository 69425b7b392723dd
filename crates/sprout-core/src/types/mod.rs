//! # Core Type Definitions
//!
//! This module contains the core data model for the Sprout savings engine:
//! - Shop catalog records (`ShopItem`, `ItemKind`, `Rarity`)
//! - Savings goals (`SavingsGoal`, `GoalTarget`, `HistoryEntry`, `VisualKind`)
//! - Virtual currency (`Wallet`, `CurrencyKind`)
//! - Custom themes (`CustomTheme`)
//! - Error types (`SproutError`)
//!
//! ## Determinism Guarantees
//!
//! All collection-bearing types use `BTreeMap`/`BTreeSet` for deterministic
//! ordering, and currency arithmetic uses saturating/checked integer ops.
//! Calendar values are plain `chrono::NaiveDate` data, injected by callers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// SHOP CATALOG
// =============================================================================

/// The kind of cosmetic a shop item unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Theme,
    ChartSkin,
    Title,
    Frame,
    Persona,
    SavingsSkin,
    Banner,
}

impl ItemKind {
    /// Stable string form used in JSON payloads and CLI output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Theme => "theme",
            ItemKind::ChartSkin => "chart_skin",
            ItemKind::Title => "title",
            ItemKind::Frame => "frame",
            ItemKind::Persona => "persona",
            ItemKind::SavingsSkin => "savings_skin",
            ItemKind::Banner => "banner",
        }
    }
}

/// Cosmetic rarity tier. Items without an explicit tier are common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Rare,
    Legendary,
    Mythical,
}

impl Rarity {
    /// Stable string form used in JSON payloads and CLI output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Rare => "rare",
            Rarity::Legendary => "legendary",
            Rarity::Mythical => "mythical",
        }
    }
}

/// An immutable catalog entry. Defined once at process start, never
/// mutated at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    /// Unique item identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Price in mustika. Zero-priced items are starter content.
    pub price: u64,
    /// What this item unlocks.
    pub kind: ItemKind,
    /// Optional grouping inside a kind (e.g. "plant", "pet").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Payload applied when equipped (asset key, CSS class, title text).
    pub value: String,
    /// Icon reference for list rendering.
    pub icon: String,
    /// Rarity tier; `None` means common.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<Rarity>,
}

// =============================================================================
// VIRTUAL CURRENCY
// =============================================================================

/// Which currency a reward accrues into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyKind {
    /// Premium currency, spent in the shop.
    Mustika,
    /// Progression currency.
    Xp,
}

/// The user's currency balances.
///
/// Credits saturate; debits are checked and fail with
/// [`SproutError::InsufficientFunds`] rather than wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Wallet {
    pub mustika: u64,
    pub xp: u64,
}

impl Wallet {
    /// Create a wallet with the given starting balances.
    #[must_use]
    pub const fn new(mustika: u64, xp: u64) -> Self {
        Self { mustika, xp }
    }

    /// Credit an amount into one currency using saturating arithmetic.
    pub fn credit(&mut self, currency: CurrencyKind, amount: u64) {
        match currency {
            CurrencyKind::Mustika => self.mustika = self.mustika.saturating_add(amount),
            CurrencyKind::Xp => self.xp = self.xp.saturating_add(amount),
        }
    }

    /// Debit mustika, failing if the balance does not cover the amount.
    pub fn debit_mustika(&mut self, amount: u64) -> Result<(), SproutError> {
        match self.mustika.checked_sub(amount) {
            Some(rest) => {
                self.mustika = rest;
                Ok(())
            }
            None => Err(SproutError::InsufficientFunds {
                price: amount,
                balance: self.mustika,
            }),
        }
    }
}

// =============================================================================
// SAVINGS GOALS
// =============================================================================

/// How a goal is visualized while it grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualKind {
    Plant,
    Pet,
}

impl VisualKind {
    /// The skin asset entry used when a goal has no skin (or an unknown one).
    #[must_use]
    pub fn default_skin_id(&self) -> &'static str {
        match self {
            VisualKind::Plant => "default",
            VisualKind::Pet => "pet_default",
        }
    }
}

/// Target shape of a goal: a fixed amount or open-ended accumulation.
///
/// Externally tagged so the snapshot format (postcard) can encode it
/// without a self-describing payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalTarget {
    /// Save toward a fixed amount; reaching it completes the goal.
    Fixed { amount: f64 },
    /// Open-ended "infinite" goal; progress comes from transaction cadence.
    Infinite,
}

/// A single deposit (positive) or withdrawal (negative) on a goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Calendar date of the transaction (local calendar, injected).
    pub at: NaiveDate,
    /// Signed amount: `> 0` deposit, `< 0` withdrawal.
    pub amount: f64,
}

/// A user-defined virtual piggy bank, visualized as an evolving plant or pet.
///
/// Invariant: an infinite goal never consults a numeric target for
/// progress; a fixed goal always does. `saved_amount` is clamped to
/// `[0, target]` for display purposes only — the stored value is exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: String,
    pub name: String,
    pub target: GoalTarget,
    pub saved_amount: f64,
    /// Latched: once a fixed goal reaches its target this stays `true`,
    /// gating the cash-out transition.
    pub is_completed: bool,
    pub visual: VisualKind,
    /// Equipped cosmetic skin; `None` falls back to the visual's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_id: Option<String>,
    /// Ordered transaction history, oldest first.
    pub history: Vec<HistoryEntry>,
}

impl SavingsGoal {
    /// Create a goal with a fixed target amount.
    #[must_use]
    pub fn fixed(
        id: impl Into<String>,
        name: impl Into<String>,
        target_amount: f64,
        visual: VisualKind,
        skin_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            target: GoalTarget::Fixed {
                amount: target_amount,
            },
            saved_amount: 0.0,
            is_completed: false,
            visual,
            skin_id,
            history: Vec::new(),
        }
    }

    /// Create an open-ended goal.
    #[must_use]
    pub fn infinite(
        id: impl Into<String>,
        name: impl Into<String>,
        visual: VisualKind,
        skin_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            target: GoalTarget::Infinite,
            saved_amount: 0.0,
            is_completed: false,
            visual,
            skin_id,
            history: Vec::new(),
        }
    }

    /// Whether this goal accumulates without a fixed target.
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        matches!(self.target, GoalTarget::Infinite)
    }

    /// The skin id actually used for asset lookup.
    #[must_use]
    pub fn effective_skin_id(&self) -> &str {
        self.skin_id
            .as_deref()
            .unwrap_or_else(|| self.visual.default_skin_id())
    }

    /// Record a deposit. Amounts must be finite and strictly positive.
    pub fn deposit(&mut self, at: NaiveDate, amount: f64) -> Result<(), SproutError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(SproutError::InvalidAmount(amount));
        }
        self.saved_amount += amount;
        self.history.push(HistoryEntry { at, amount });
        if let GoalTarget::Fixed { amount: target } = self.target {
            if self.saved_amount >= target {
                self.is_completed = true;
            }
        }
        Ok(())
    }

    /// Record a withdrawal, capped at the saved amount. Returns the amount
    /// actually withdrawn. Completion is latched and never reverts.
    pub fn withdraw(&mut self, at: NaiveDate, amount: f64) -> Result<f64, SproutError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(SproutError::InvalidAmount(amount));
        }
        let taken = amount.min(self.saved_amount);
        self.saved_amount -= taken;
        self.history.push(HistoryEntry { at, amount: -taken });
        Ok(taken)
    }
}

// =============================================================================
// CUSTOM THEMES
// =============================================================================

/// A derived color theme, keyed by CSS custom property name.
///
/// Produced by [`crate::theme::derive_theme`]; the id is injected by the
/// caller (time-based at the app boundary) so derivation stays pure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTheme {
    pub id: String,
    pub name: String,
    /// Slot name (`--color-primary`, ...) to color value string.
    pub colors: BTreeMap<String, String>,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Sprout engine.
///
/// - No silent failures
/// - Use `Result<T, SproutError>` for fallible operations
/// - The core should never panic; all errors must be recoverable
#[derive(Debug, Error)]
pub enum SproutError {
    /// The item id does not exist in the catalog.
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    /// The item is already in the user's inventory.
    #[error("Item already owned: {0}")]
    AlreadyOwned(String),

    /// The wallet balance does not cover the price.
    #[error("Insufficient funds: need {price}, have {balance}")]
    InsufficientFunds { price: u64, balance: u64 },

    /// The goal id does not exist in the profile.
    #[error("Unknown goal: {0}")]
    UnknownGoal(String),

    /// A goal with this id already exists.
    #[error("Goal already exists: {0}")]
    DuplicateGoal(String),

    /// Cash-out requested on a goal that has not completed.
    #[error("Goal not completed: {0}")]
    GoalNotCompleted(String),

    /// A transaction amount was non-finite, zero, or negative.
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).expect("valid date")
    }

    #[test]
    fn wallet_credit_saturates() {
        let mut wallet = Wallet::new(u64::MAX, 0);
        wallet.credit(CurrencyKind::Mustika, 10);
        assert_eq!(wallet.mustika, u64::MAX);
    }

    #[test]
    fn wallet_debit_checked() {
        let mut wallet = Wallet::new(5, 0);
        assert!(wallet.debit_mustika(10).is_err());
        assert_eq!(wallet.mustika, 5);

        wallet.debit_mustika(5).expect("covered");
        assert_eq!(wallet.mustika, 0);
    }

    #[test]
    fn fixed_goal_completes_at_target() {
        let mut goal = SavingsGoal::fixed("bike", "New bike", 100.0, VisualKind::Plant, None);
        goal.deposit(day(1), 60.0).expect("deposit");
        assert!(!goal.is_completed);

        goal.deposit(day(2), 40.0).expect("deposit");
        assert!(goal.is_completed);
    }

    #[test]
    fn completion_is_latched() {
        let mut goal = SavingsGoal::fixed("bike", "New bike", 100.0, VisualKind::Plant, None);
        goal.deposit(day(1), 100.0).expect("deposit");
        goal.withdraw(day(2), 50.0).expect("withdraw");
        assert!(goal.is_completed);
    }

    #[test]
    fn withdraw_caps_at_saved_amount() {
        let mut goal = SavingsGoal::infinite("rainy", "Rainy day", VisualKind::Pet, None);
        goal.deposit(day(1), 30.0).expect("deposit");

        let taken = goal.withdraw(day(2), 100.0).expect("withdraw");
        assert_eq!(taken, 30.0);
        assert_eq!(goal.saved_amount, 0.0);
        // History records what was actually taken, not what was asked.
        assert_eq!(goal.history[1].amount, -30.0);
    }

    #[test]
    fn rejects_invalid_amounts() {
        let mut goal = SavingsGoal::infinite("rainy", "Rainy day", VisualKind::Pet, None);
        assert!(goal.deposit(day(1), 0.0).is_err());
        assert!(goal.deposit(day(1), -5.0).is_err());
        assert!(goal.deposit(day(1), f64::NAN).is_err());
        assert!(goal.history.is_empty());
    }

    #[test]
    fn effective_skin_falls_back_per_visual() {
        let plant = SavingsGoal::fixed("a", "A", 10.0, VisualKind::Plant, None);
        let pet = SavingsGoal::infinite("b", "B", VisualKind::Pet, None);
        let skinned = SavingsGoal::infinite("c", "C", VisualKind::Pet, Some("dragon".into()));

        assert_eq!(plant.effective_skin_id(), "default");
        assert_eq!(pet.effective_skin_id(), "pet_default");
        assert_eq!(skinned.effective_skin_id(), "dragon");
    }
}
