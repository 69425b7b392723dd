//! # User Profile
//!
//! The single stateful aggregate of the engine: wallet, inventory, goals,
//! custom themes, and the daily claim ledger. All mutations are checked
//! and return `Result` (or availability as `Option` for the daily claim);
//! nothing here panics or touches a clock.

use crate::catalog::Catalog;
use crate::rewards::{ClaimLedger, RewardSummary};
use crate::shop::effective_price;
use crate::theme;
use crate::types::{CustomTheme, ItemKind, SavingsGoal, SproutError, Wallet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// PROFILE
// =============================================================================

/// A user's complete persistent state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub wallet: Wallet,
    /// Owned catalog item ids (cosmetics of every kind).
    owned: BTreeSet<String>,
    /// Goals keyed by id.
    goals: BTreeMap<String, SavingsGoal>,
    /// Derived custom themes, in creation order.
    themes: Vec<CustomTheme>,
    pub claim_ledger: ClaimLedger,
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

impl Profile {
    /// A fresh profile: empty wallet, the two starter skins, no goals.
    #[must_use]
    pub fn new() -> Self {
        let mut owned = BTreeSet::new();
        owned.insert("default".to_string());
        owned.insert("pet_default".to_string());
        Self {
            wallet: Wallet::default(),
            owned,
            goals: BTreeMap::new(),
            themes: Vec::new(),
            claim_ledger: ClaimLedger::new(),
        }
    }

    // =========================================================================
    // INVENTORY
    // =========================================================================

    /// Owned item ids, deterministically ordered.
    #[must_use]
    pub fn owned(&self) -> &BTreeSet<String> {
        &self.owned
    }

    /// Whether the user owns an item.
    #[must_use]
    pub fn owns(&self, item_id: &str) -> bool {
        self.owned.contains(item_id)
    }

    /// Owned savings skins — the collection the daily claim pays out on.
    #[must_use]
    pub fn collection(&self, catalog: &Catalog) -> Vec<String> {
        self.owned
            .iter()
            .filter(|id| {
                catalog
                    .get(id)
                    .is_some_and(|item| item.kind == ItemKind::SavingsSkin)
            })
            .cloned()
            .collect()
    }

    /// Buy an item at today's effective (possibly discounted) price.
    ///
    /// Returns the price actually paid.
    pub fn purchase(
        &mut self,
        catalog: &Catalog,
        item_id: &str,
        today: NaiveDate,
    ) -> Result<u64, SproutError> {
        let item = catalog
            .get(item_id)
            .ok_or_else(|| SproutError::UnknownItem(item_id.to_string()))?;
        if self.owned.contains(&item.id) {
            return Err(SproutError::AlreadyOwned(item.id.clone()));
        }

        let price = effective_price(catalog, &self.owned, item, today);
        self.wallet.debit_mustika(price)?;
        self.owned.insert(item.id.clone());
        Ok(price)
    }

    // =========================================================================
    // DAILY CLAIM
    // =========================================================================

    /// Whether the daily claim is available today (date gate + non-empty
    /// collection).
    #[must_use]
    pub fn can_claim(&self, catalog: &Catalog, today: NaiveDate) -> bool {
        self.claim_ledger.can_claim(today) && !self.collection(catalog).is_empty()
    }

    /// Claim today's collection rewards into the wallet.
    ///
    /// `None` when unavailable (already claimed today, or no collection);
    /// the wallet and ledger are untouched in that case.
    pub fn claim_daily(&mut self, catalog: &Catalog, today: NaiveDate) -> Option<RewardSummary> {
        let collection = self.collection(catalog);
        let summary = self.claim_ledger.claim(today, &collection, catalog)?;
        self.wallet
            .credit(crate::types::CurrencyKind::Mustika, summary.total_mustika);
        self.wallet
            .credit(crate::types::CurrencyKind::Xp, summary.total_xp);
        Some(summary)
    }

    // =========================================================================
    // GOALS
    // =========================================================================

    /// Goals in id order.
    pub fn goals(&self) -> impl Iterator<Item = &SavingsGoal> {
        self.goals.values()
    }

    /// Look up a goal by id.
    #[must_use]
    pub fn goal(&self, goal_id: &str) -> Option<&SavingsGoal> {
        self.goals.get(goal_id)
    }

    /// Add a new goal. Ids must be unique within the profile.
    pub fn add_goal(&mut self, goal: SavingsGoal) -> Result<(), SproutError> {
        if self.goals.contains_key(&goal.id) {
            return Err(SproutError::DuplicateGoal(goal.id));
        }
        self.goals.insert(goal.id.clone(), goal);
        Ok(())
    }

    /// Deposit into a goal. Returns the goal's new saved amount.
    pub fn deposit(
        &mut self,
        goal_id: &str,
        at: NaiveDate,
        amount: f64,
    ) -> Result<f64, SproutError> {
        let goal = self
            .goals
            .get_mut(goal_id)
            .ok_or_else(|| SproutError::UnknownGoal(goal_id.to_string()))?;
        goal.deposit(at, amount)?;
        Ok(goal.saved_amount)
    }

    /// Withdraw from a goal. Returns the amount actually withdrawn.
    pub fn withdraw(
        &mut self,
        goal_id: &str,
        at: NaiveDate,
        amount: f64,
    ) -> Result<f64, SproutError> {
        let goal = self
            .goals
            .get_mut(goal_id)
            .ok_or_else(|| SproutError::UnknownGoal(goal_id.to_string()))?;
        goal.withdraw(at, amount)
    }

    /// Cash out a completed goal: removes it and returns the balance.
    ///
    /// Only completed goals can cash out — completion gates the transition.
    pub fn cash_out(&mut self, goal_id: &str) -> Result<f64, SproutError> {
        let goal = self
            .goals
            .get(goal_id)
            .ok_or_else(|| SproutError::UnknownGoal(goal_id.to_string()))?;
        if !goal.is_completed {
            return Err(SproutError::GoalNotCompleted(goal_id.to_string()));
        }
        let balance = goal.saved_amount;
        self.goals.remove(goal_id);
        Ok(balance)
    }

    // =========================================================================
    // THEMES
    // =========================================================================

    /// Custom themes in creation order.
    #[must_use]
    pub fn themes(&self) -> &[CustomTheme] {
        &self.themes
    }

    /// Derive and store a custom theme.
    pub fn add_theme(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        primary: &str,
        accent: &str,
        card_background: &str,
        background: &theme::BackgroundSpec,
    ) -> &CustomTheme {
        let derived = theme::derive_theme(id, name, primary, accent, card_background, background);
        self.themes.push(derived);
        // Just pushed; the vec is non-empty.
        &self.themes[self.themes.len() - 1]
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shop;
    use crate::types::VisualKind;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).expect("valid date")
    }

    #[test]
    fn fresh_profile_owns_starters_only() {
        let profile = Profile::new();
        assert!(profile.owns("default"));
        assert!(profile.owns("pet_default"));
        assert_eq!(profile.owned().len(), 2);
    }

    #[test]
    fn purchase_requires_funds_and_novelty() {
        let catalog = Catalog::builtin();
        let mut profile = Profile::new();
        let today = date(1);

        // Broke: cannot afford the dragon.
        assert!(matches!(
            profile.purchase(&catalog, "dragon", today),
            Err(SproutError::InsufficientFunds { .. })
        ));

        profile.wallet.credit(crate::types::CurrencyKind::Mustika, 2000);
        let paid = profile.purchase(&catalog, "dragon", today).expect("buy");
        assert_eq!(paid, 1200);
        assert!(profile.owns("dragon"));

        // Re-buying is rejected before any funds move.
        assert!(matches!(
            profile.purchase(&catalog, "dragon", today),
            Err(SproutError::AlreadyOwned(_))
        ));
        assert_eq!(profile.wallet.mustika, 800);

        assert!(matches!(
            profile.purchase(&catalog, "no_such_item", today),
            Err(SproutError::UnknownItem(_))
        ));
    }

    #[test]
    fn purchase_pays_discounted_price_for_the_offer() {
        let catalog = Catalog::builtin();
        let mut profile = Profile::new();
        let today = date(1);

        let offer = shop::current_offer(&catalog, profile.owned(), today).expect("offer");
        profile
            .wallet
            .credit(crate::types::CurrencyKind::Mustika, offer.original_price);

        let paid = profile
            .purchase(&catalog, &offer.item_id, today)
            .expect("buy");
        assert_eq!(paid, offer.discounted_price);
        assert_eq!(
            profile.wallet.mustika,
            offer.original_price - offer.discounted_price
        );
    }

    #[test]
    fn claim_credits_wallet_once_per_day() {
        let catalog = Catalog::builtin();
        let mut profile = Profile::new();
        let today = date(1);

        // Starters: "default" and "pet_default" are both pet-kind commons.
        let summary = profile.claim_daily(&catalog, today).expect("claim");
        assert_eq!(summary.total_mustika, 10);
        assert_eq!(summary.total_xp, 0);
        assert_eq!(profile.wallet.mustika, 10);

        assert!(profile.claim_daily(&catalog, today).is_none());
        assert_eq!(profile.wallet.mustika, 10);

        assert!(profile.claim_daily(&catalog, date(2)).is_some());
        assert_eq!(profile.wallet.mustika, 20);
    }

    #[test]
    fn collection_only_counts_savings_skins() {
        let catalog = Catalog::builtin();
        let mut profile = Profile::new();
        profile.wallet.credit(crate::types::CurrencyKind::Mustika, 500);
        profile
            .purchase(&catalog, "frame_leaf", date(1))
            .expect("buy");

        let collection = profile.collection(&catalog);
        assert!(!collection.contains(&"frame_leaf".to_string()));
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn goal_lifecycle_to_cash_out() {
        let mut profile = Profile::new();
        profile
            .add_goal(SavingsGoal::fixed(
                "laptop",
                "New laptop",
                500.0,
                VisualKind::Plant,
                Some("bonsai".to_string()),
            ))
            .expect("add");

        assert!(matches!(
            profile.cash_out("laptop"),
            Err(SproutError::GoalNotCompleted(_))
        ));

        profile.deposit("laptop", date(1), 500.0).expect("deposit");
        let balance = profile.cash_out("laptop").expect("cash out");
        assert_eq!(balance, 500.0);
        assert!(profile.goal("laptop").is_none());
    }

    #[test]
    fn duplicate_goal_ids_rejected() {
        let mut profile = Profile::new();
        let goal = SavingsGoal::infinite("g", "G", VisualKind::Pet, None);
        profile.add_goal(goal.clone()).expect("add");
        assert!(matches!(
            profile.add_goal(goal),
            Err(SproutError::DuplicateGoal(_))
        ));
    }

    #[test]
    fn unknown_goal_operations_fail() {
        let mut profile = Profile::new();
        assert!(profile.deposit("nope", date(1), 10.0).is_err());
        assert!(profile.withdraw("nope", date(1), 10.0).is_err());
        assert!(profile.cash_out("nope").is_err());
    }

    #[test]
    fn add_theme_stores_derived_slots() {
        let mut profile = Profile::new();
        let theme = profile.add_theme(
            "theme-1",
            "Night",
            "16 185 129",
            "245 158 11",
            "30 41 59",
            &theme::BackgroundSpec::Solid {
                color: "15 23 42".to_string(),
            },
        );
        assert_eq!(theme.colors.len(), 12);
        assert_eq!(profile.themes().len(), 1);
    }
}
