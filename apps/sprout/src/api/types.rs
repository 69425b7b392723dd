//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.
//!
//! Validation happens here at the boundary (id/name lengths, amount
//! domains, date formats) before anything reaches the core engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sprout_core::{
    CustomTheme, DiscountOffer, Profile, RewardSummary, SavingsGoal, ShopItem, SkinAssets,
    SproutError, VisualKind, goal_stage, progress_percent, theme::BackgroundSpec,
};

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for item/goal/theme ids in requests.
pub const MAX_ID_LENGTH: usize = 64;

/// Maximum length for user-facing names in requests.
pub const MAX_NAME_LENGTH: usize = 256;

/// Maximum length for color/background strings in requests.
pub const MAX_COLOR_LENGTH: usize = 1024;

/// Validate a request id field.
fn validate_id(id: &str) -> Result<(), SproutError> {
    if id.is_empty() || id.len() > MAX_ID_LENGTH {
        return Err(SproutError::DeserializationError(format!(
            "Id must be 1..={} bytes",
            MAX_ID_LENGTH
        )));
    }
    Ok(())
}

/// Validate a request name field.
fn validate_name(name: &str) -> Result<(), SproutError> {
    if name.is_empty() || name.len() > MAX_NAME_LENGTH {
        return Err(SproutError::DeserializationError(format!(
            "Name must be 1..={} bytes",
            MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Parse an optional `YYYY-MM-DD` request date, defaulting to `today`.
///
/// The wall clock is read by the caller (app layer); the parsed value is
/// what actually flows into the core.
pub fn resolve_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, SproutError> {
    match raw {
        None => Ok(today),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
            SproutError::DeserializationError(format!("Invalid date '{}': {}", s, e))
        }),
    }
}

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Profile status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub mustika: u64,
    pub xp: u64,
    pub owned_items: usize,
    pub goal_count: usize,
    pub theme_count: usize,
    /// `YYYY-MM-DD` of the last daily claim, if any.
    pub last_claim: Option<String>,
}

impl StatusResponse {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            mustika: profile.wallet.mustika,
            xp: profile.wallet.xp,
            owned_items: profile.owned().len(),
            goal_count: profile.goals().count(),
            theme_count: profile.themes().len(),
            last_claim: profile
                .claim_ledger
                .last_claim
                .map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

// =============================================================================
// SHOP RESPONSES
// =============================================================================

/// One catalog item as displayed in the shop grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopItemJson {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub value: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    pub owned: bool,
    /// Present only on this week's discounted item (if unowned).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<u64>,
}

impl ShopItemJson {
    pub fn from_item(item: &ShopItem, owned: bool, offer: Option<&DiscountOffer>) -> Self {
        let discounted_price = offer
            .filter(|o| o.item_id == item.id)
            .map(|o| o.discounted_price);
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            price: item.price,
            kind: item.kind.as_str().to_string(),
            category: item.category.clone(),
            value: item.value.clone(),
            icon: item.icon.clone(),
            rarity: item.rarity.map(|r| r.as_str().to_string()),
            owned,
            discounted_price,
        }
    }
}

/// Shop listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopResponse {
    pub items: Vec<ShopItemJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<DiscountJson>,
}

/// This week's discount offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountJson {
    pub item_id: String,
    pub original_price: u64,
    pub discounted_price: u64,
}

impl From<DiscountOffer> for DiscountJson {
    fn from(offer: DiscountOffer) -> Self {
        Self {
            item_id: offer.item_id,
            original_price: offer.original_price,
            discounted_price: offer.discounted_price,
        }
    }
}

// =============================================================================
// PURCHASE REQUEST/RESPONSE
// =============================================================================

/// Purchase request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub item_id: String,
    /// Optional `YYYY-MM-DD`; defaults to the server's local date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl PurchaseRequest {
    /// Validate fields before they reach the engine.
    pub fn validate(&self) -> Result<(), SproutError> {
        validate_id(&self.item_id)
    }
}

/// Purchase response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub success: bool,
    pub paid: Option<u64>,
    pub balance: Option<u64>,
    pub error: Option<String>,
}

impl PurchaseResponse {
    pub fn success(paid: u64, balance: u64) -> Self {
        Self {
            success: true,
            paid: Some(paid),
            balance: Some(balance),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            paid: None,
            balance: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// CLAIM REQUEST/RESPONSE
// =============================================================================

/// Daily claim request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimRequest {
    /// Optional `YYYY-MM-DD`; defaults to the server's local date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// One collected skin's payout line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRewardJson {
    pub id: String,
    pub reward: u64,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
}

/// Daily claim response.
///
/// `claimed = false` with `success = true` means the claim was simply
/// unavailable (already claimed today, or empty collection) — that is
/// data, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimResponse {
    pub success: bool,
    pub claimed: bool,
    pub total_mustika: u64,
    pub total_xp: u64,
    pub per_item: Vec<ItemRewardJson>,
    pub error: Option<String>,
}

impl ClaimResponse {
    pub fn claimed(summary: &RewardSummary) -> Self {
        Self {
            success: true,
            claimed: true,
            total_mustika: summary.total_mustika,
            total_xp: summary.total_xp,
            per_item: summary
                .per_item
                .iter()
                .map(|r| ItemRewardJson {
                    id: r.id.clone(),
                    reward: r.reward,
                    currency: match r.currency {
                        sprout_core::CurrencyKind::Mustika => "mustika".to_string(),
                        sprout_core::CurrencyKind::Xp => "xp".to_string(),
                    },
                    rarity: r.rarity.map(|rar| rar.as_str().to_string()),
                })
                .collect(),
            error: None,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            success: true,
            claimed: false,
            total_mustika: 0,
            total_xp: 0,
            per_item: vec![],
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            claimed: false,
            total_mustika: 0,
            total_xp: 0,
            per_item: vec![],
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// GOAL REQUESTS/RESPONSES
// =============================================================================

/// Goal creation request. `target_amount = None` creates an infinite goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGoalRequest {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<f64>,
    /// `"plant"` or `"pet"`.
    pub visual: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_id: Option<String>,
}

impl CreateGoalRequest {
    /// Validate and convert to a goal.
    pub fn to_goal(&self) -> Result<SavingsGoal, SproutError> {
        validate_id(&self.id)?;
        validate_name(&self.name)?;
        if let Some(skin) = &self.skin_id {
            validate_id(skin)?;
        }
        let visual = match self.visual.as_str() {
            "plant" => VisualKind::Plant,
            "pet" => VisualKind::Pet,
            other => {
                return Err(SproutError::DeserializationError(format!(
                    "Unknown visual kind '{}' (expected plant|pet)",
                    other
                )));
            }
        };
        Ok(match self.target_amount {
            Some(target) => {
                if !target.is_finite() || target <= 0.0 {
                    return Err(SproutError::InvalidAmount(target));
                }
                SavingsGoal::fixed(&self.id, &self.name, target, visual, self.skin_id.clone())
            }
            None => SavingsGoal::infinite(&self.id, &self.name, visual, self.skin_id.clone()),
        })
    }
}

/// One goal as displayed, with derived progress and stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalJson {
    pub id: String,
    pub name: String,
    pub is_infinite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<f64>,
    pub saved_amount: f64,
    pub is_completed: bool,
    pub visual: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_id: Option<String>,
    pub progress_percent: f64,
    pub stage: u8,
    pub stage_label: String,
    pub is_max: bool,
    /// Resolved stage image reference, if the asset table covers the skin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
}

impl GoalJson {
    pub fn from_goal(goal: &SavingsGoal, assets: &SkinAssets) -> Self {
        let view = goal_stage(goal);
        let asset = assets
            .stage_asset(goal.effective_skin_id(), goal.visual, view.stage)
            .map(str::to_string);
        Self {
            id: goal.id.clone(),
            name: goal.name.clone(),
            is_infinite: goal.is_infinite(),
            target_amount: match goal.target {
                sprout_core::GoalTarget::Fixed { amount } => Some(amount),
                sprout_core::GoalTarget::Infinite => None,
            },
            saved_amount: goal.saved_amount,
            is_completed: goal.is_completed,
            visual: match goal.visual {
                VisualKind::Plant => "plant".to_string(),
                VisualKind::Pet => "pet".to_string(),
            },
            skin_id: goal.skin_id.clone(),
            progress_percent: progress_percent(goal),
            stage: view.stage.number(),
            stage_label: view.display_label(),
            is_max: view.is_max,
            asset,
        }
    }
}

/// Goal listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalsResponse {
    pub goals: Vec<GoalJson>,
}

/// Deposit/withdraw request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountRequest {
    pub amount: f64,
    /// Optional `YYYY-MM-DD`; defaults to the server's local date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Response for deposit/withdraw/cash-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountResponse {
    pub success: bool,
    /// New saved amount (deposit), amount withdrawn, or cashed-out balance.
    pub amount: Option<f64>,
    pub error: Option<String>,
}

impl AmountResponse {
    pub fn success(amount: f64) -> Self {
        Self {
            success: true,
            amount: Some(amount),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            amount: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// THEME REQUEST/RESPONSE
// =============================================================================

/// Theme derivation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeRequest {
    pub name: String,
    pub primary: String,
    pub accent: String,
    pub card_background: String,
    /// Solid app background color; ignored when an image is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Background image reference; takes precedence over the color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

impl ThemeRequest {
    /// Validate fields and build the background spec.
    pub fn to_background(&self) -> Result<BackgroundSpec, SproutError> {
        validate_name(&self.name)?;
        for color in [
            &self.primary,
            &self.accent,
            &self.card_background,
        ] {
            if color.len() > MAX_COLOR_LENGTH {
                return Err(SproutError::DeserializationError(format!(
                    "Color string exceeds {} bytes",
                    MAX_COLOR_LENGTH
                )));
            }
        }
        Ok(match (&self.background_image, &self.background_color) {
            (Some(reference), _) => BackgroundSpec::Image {
                reference: reference.clone(),
            },
            (None, Some(color)) => BackgroundSpec::Solid {
                color: color.clone(),
            },
            (None, None) => BackgroundSpec::Solid {
                color: self.card_background.clone(),
            },
        })
    }
}

/// Theme derivation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub success: bool,
    pub theme: Option<CustomTheme>,
    pub error: Option<String>,
}

impl ThemeResponse {
    pub fn success(theme: CustomTheme) -> Self {
        Self {
            success: true,
            theme: Some(theme),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            theme: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// EXPORT RESPONSE
// =============================================================================

/// Snapshot export response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
    pub success: bool,
    pub data: Option<String>, // Base64 encoded
    pub checksum: Option<u64>,
    pub error: Option<String>,
}

impl ExportResponse {
    pub fn success(data: Vec<u8>, checksum: u64) -> Self {
        Self {
            success: true,
            data: Some(base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                &data,
            )),
            checksum: Some(checksum),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            checksum: None,
            error: Some(msg.into()),
        }
    }
}
