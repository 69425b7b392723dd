//! # Daily Collection Rewards
//!
//! Sums per-item rewards from the user's collected savings skins, split
//! into two currencies by item category: pet-kind skins pay mustika,
//! everything else pays xp.
//!
//! Claiming is idempotent per calendar day. Dates are compared as local
//! calendar dates (the `YYYY-MM-DD` granularity), injected by the caller;
//! the aggregator itself is a pure function of the collection and catalog.

use crate::catalog::Catalog;
use crate::types::{CurrencyKind, Rarity};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// REWARD TABLE
// =============================================================================

/// Base reward for a common (untiered) skin.
pub const REWARD_COMMON: u64 = 5;

/// Base reward for a rare skin.
pub const REWARD_RARE: u64 = 8;

/// Base reward for a legendary skin.
pub const REWARD_LEGENDARY: u64 = 13;

/// Base reward for a mythical skin.
pub const REWARD_MYTHICAL: u64 = 20;

/// Skin ids that count as pet-kind without containing `"pet"`.
pub const PET_SKIN_IDS: &[&str] = &["swan", "dragon", "robot", "turtle", "jellyfish", "fox"];

/// Daily reward for one skin by rarity tier (`None` = common).
#[must_use]
pub fn base_reward(rarity: Option<Rarity>) -> u64 {
    match rarity {
        None => REWARD_COMMON,
        Some(Rarity::Rare) => REWARD_RARE,
        Some(Rarity::Legendary) => REWARD_LEGENDARY,
        Some(Rarity::Mythical) => REWARD_MYTHICAL,
    }
}

/// Whether a skin id counts as pet-kind for currency routing.
///
/// Pet-kind: the id contains `"pet"`, equals the `"default"` sentinel, or
/// is one of the fixed pet ids in [`PET_SKIN_IDS`].
#[must_use]
pub fn is_pet_kind(skin_id: &str) -> bool {
    skin_id.contains("pet") || skin_id == "default" || PET_SKIN_IDS.contains(&skin_id)
}

// =============================================================================
// AGGREGATION
// =============================================================================

/// One collected skin's contribution to the daily claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReward {
    pub id: String,
    pub reward: u64,
    pub currency: CurrencyKind,
    /// Rarity tier; `None` means common (also used for unknown ids).
    pub rarity: Option<Rarity>,
}

/// Aggregated daily rewards over a collection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RewardSummary {
    pub total_mustika: u64,
    pub total_xp: u64,
    pub per_item: Vec<ItemReward>,
}

/// Sum per-item rewards for a collection of skin ids.
///
/// Total: skin ids missing from the catalog are rewarded as common. An
/// empty collection yields zero totals (and is never claimable).
#[must_use]
pub fn aggregate_rewards(collected_skin_ids: &[String], catalog: &Catalog) -> RewardSummary {
    let mut summary = RewardSummary::default();

    for id in collected_skin_ids {
        let rarity = catalog.get(id).and_then(|entry| entry.rarity);
        let reward = base_reward(rarity);
        let currency = if is_pet_kind(id) {
            CurrencyKind::Mustika
        } else {
            CurrencyKind::Xp
        };

        match currency {
            CurrencyKind::Mustika => {
                summary.total_mustika = summary.total_mustika.saturating_add(reward);
            }
            CurrencyKind::Xp => {
                summary.total_xp = summary.total_xp.saturating_add(reward);
            }
        }
        summary.per_item.push(ItemReward {
            id: id.clone(),
            reward,
            currency,
            rarity,
        });
    }

    summary
}

// =============================================================================
// CLAIM LEDGER
// =============================================================================

/// Once-per-calendar-day claim gate.
///
/// Unavailability is data (`can_claim`, `Option` results), never an error:
/// a second same-day claim attempt simply finds the action unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClaimLedger {
    /// Local calendar date of the last successful claim.
    pub last_claim: Option<NaiveDate>,
}

impl ClaimLedger {
    /// Create a ledger with no claims recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a claim is available today (independent of the collection).
    #[must_use]
    pub fn can_claim(&self, today: NaiveDate) -> bool {
        self.last_claim != Some(today)
    }

    /// Claim today's rewards for the collection.
    ///
    /// Returns `None` — without mutating the ledger — when already claimed
    /// today or when the collection is empty.
    pub fn claim(
        &mut self,
        today: NaiveDate,
        collected_skin_ids: &[String],
        catalog: &Catalog,
    ) -> Option<RewardSummary> {
        if !self.can_claim(today) || collected_skin_ids.is_empty() {
            return None;
        }
        self.last_claim = Some(today);
        Some(aggregate_rewards(collected_skin_ids, catalog))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).expect("valid date")
    }

    #[test]
    fn mythical_pet_pays_mustika() {
        let summary = aggregate_rewards(&ids(&["dragon"]), &Catalog::builtin());
        assert_eq!(summary.total_mustika, 20);
        assert_eq!(summary.total_xp, 0);
        assert_eq!(summary.per_item[0].currency, CurrencyKind::Mustika);
        assert_eq!(summary.per_item[0].rarity, Some(Rarity::Mythical));
    }

    #[test]
    fn legendary_plant_pays_xp() {
        let summary = aggregate_rewards(&ids(&["sakura"]), &Catalog::builtin());
        assert_eq!(summary.total_mustika, 0);
        assert_eq!(summary.total_xp, 13);
    }

    #[test]
    fn empty_collection_yields_zero() {
        let summary = aggregate_rewards(&[], &Catalog::builtin());
        assert_eq!(summary.total_mustika, 0);
        assert_eq!(summary.total_xp, 0);
        assert!(summary.per_item.is_empty());
    }

    #[test]
    fn mixed_collection_splits_by_kind() {
        // dragon (mythical pet: 20 mustika), sakura (legendary plant: 13 xp),
        // sunflower (common plant: 5 xp), turtle (common-priced pet id: 5 mustika).
        let summary = aggregate_rewards(
            &ids(&["dragon", "sakura", "sunflower", "turtle"]),
            &Catalog::builtin(),
        );
        assert_eq!(summary.total_mustika, 25);
        assert_eq!(summary.total_xp, 18);
        assert_eq!(summary.per_item.len(), 4);
    }

    #[test]
    fn pet_kind_covers_substring_sentinel_and_fixed_set() {
        assert!(is_pet_kind("pet_hamster"));
        assert!(is_pet_kind("pet_default"));
        assert!(is_pet_kind("default"));
        assert!(is_pet_kind("fox"));
        assert!(!is_pet_kind("sakura"));
        assert!(!is_pet_kind("sunflower"));
    }

    #[test]
    fn unknown_ids_reward_as_common() {
        let summary = aggregate_rewards(&ids(&["mystery_pet"]), &Catalog::builtin());
        assert_eq!(summary.total_mustika, REWARD_COMMON);
        assert_eq!(summary.per_item[0].rarity, None);
    }

    #[test]
    fn claim_is_idempotent_per_day() {
        let catalog = Catalog::builtin();
        let collection = ids(&["dragon"]);
        let mut ledger = ClaimLedger::new();

        assert!(ledger.can_claim(date(1)));
        let first = ledger.claim(date(1), &collection, &catalog);
        assert!(first.is_some());

        // Second attempt the same day is unavailable, not an error.
        assert!(!ledger.can_claim(date(1)));
        assert!(ledger.claim(date(1), &collection, &catalog).is_none());

        // Next day it opens again.
        assert!(ledger.can_claim(date(2)));
        assert!(ledger.claim(date(2), &collection, &catalog).is_some());
    }

    #[test]
    fn empty_collection_blocks_claim_even_when_eligible() {
        let mut ledger = ClaimLedger::new();
        assert!(ledger.can_claim(date(1)));
        assert!(ledger.claim(date(1), &[], &Catalog::builtin()).is_none());
        // The ledger was not consumed by the refused attempt.
        assert!(ledger.can_claim(date(1)));
    }
}
