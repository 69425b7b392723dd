//! # Weekly Shop Discounts
//!
//! Deterministically picks one catalog item per calendar week to discount.
//!
//! The rotation is a pure function of `(catalog order, date)`: the week
//! number since January 1st of the date's year indexes into the filtered
//! catalog modulo its length. Savings skins never rotate into the pool.
//! "Current time" is an injected `NaiveDate`, never an ambient clock, so
//! callers (and tests) can pin arbitrary dates.

use crate::catalog::Catalog;
use crate::types::{ItemKind, ShopItem};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// DISCOUNT CONSTANTS
// =============================================================================

/// Discounted prices are `price * DISCOUNT_NUM / DISCOUNT_DEN` — the
/// integer floor of 80%.
pub const DISCOUNT_NUM: u64 = 4;
pub const DISCOUNT_DEN: u64 = 5;

// =============================================================================
// SELECTION
// =============================================================================

/// Zero-based week-of-year: full weeks elapsed since January 1st.
#[must_use]
fn week_of_year(date: NaiveDate) -> u32 {
    date.ordinal0() / 7
}

/// The items eligible for the weekly rotation, in catalog order:
/// priced items that are not savings skins.
fn discount_pool(catalog: &Catalog) -> Vec<&ShopItem> {
    catalog
        .iter()
        .filter(|item| item.price > 0 && item.kind != ItemKind::SavingsSkin)
        .collect()
}

/// Select this week's discounted item, if the pool is non-empty.
///
/// Deterministic: the same date (any day of the same week) and the same
/// catalog ordering always select the same item.
#[must_use]
pub fn select_discounted<'a>(catalog: &'a Catalog, today: NaiveDate) -> Option<&'a ShopItem> {
    let pool = discount_pool(catalog);
    if pool.is_empty() {
        return None;
    }
    let index = (week_of_year(today) as usize) % pool.len();
    Some(pool[index])
}

/// Floor of 80% of the original price.
#[must_use]
pub fn discounted_price(price: u64) -> u64 {
    price * DISCOUNT_NUM / DISCOUNT_DEN
}

/// This week's offer, as plain data for display layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountOffer {
    pub item_id: String,
    pub original_price: u64,
    pub discounted_price: u64,
}

/// The current offer, or `None` when the pool is empty or the selected
/// item is already owned (owned items are exempt from the discount).
#[must_use]
pub fn current_offer(
    catalog: &Catalog,
    owned: &BTreeSet<String>,
    today: NaiveDate,
) -> Option<DiscountOffer> {
    let item = select_discounted(catalog, today)?;
    if owned.contains(&item.id) {
        return None;
    }
    Some(DiscountOffer {
        item_id: item.id.clone(),
        original_price: item.price,
        discounted_price: discounted_price(item.price),
    })
}

/// The price a buyer actually pays for an item today.
#[must_use]
pub fn effective_price(
    catalog: &Catalog,
    owned: &BTreeSet<String>,
    item: &ShopItem,
    today: NaiveDate,
) -> u64 {
    match current_offer(catalog, owned, today) {
        Some(offer) if offer.item_id == item.id => offer.discounted_price,
        _ => item.price,
    }
}

// =============================================================================
// TESTS
// =============================================================================
