//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use sprout::api::{
    ClaimResponse, CreateGoalRequest, DiscountJson, GoalJson, HealthResponse, PurchaseRequest,
    PurchaseResponse, ShopItemJson, StatusResponse, ThemeRequest,
};
use sprout_core::{Catalog, SavingsGoal, SkinAssets, VisualKind, current_offer};
use std::collections::BTreeSet;

// =============================================================================
// HEALTH RESPONSE TESTS
// =============================================================================

#[test]
fn test_health_response_default() {
    let health = HealthResponse::default();
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
}

#[test]
fn test_health_response_serialization() {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: "0.4.2".to_string(),
    };

    let json = serde_json::to_string(&health).unwrap();
    assert!(json.contains("\"status\":\"ok\""));
    assert!(json.contains("\"version\":\"0.4.2\""));
}

// =============================================================================
// STATUS RESPONSE TESTS
// =============================================================================

#[test]
fn test_status_response_roundtrip() {
    let status = StatusResponse {
        mustika: 120,
        xp: 45,
        owned_items: 5,
        goal_count: 2,
        theme_count: 1,
        last_claim: Some("2025-08-01".to_string()),
    };

    let json = serde_json::to_string(&status).unwrap();
    let back: StatusResponse = serde_json::from_str(&json).unwrap();
    assert_eq!(back.mustika, 120);
    assert_eq!(back.last_claim.as_deref(), Some("2025-08-01"));
}

// =============================================================================
// SHOP ITEM TESTS
// =============================================================================

#[test]
fn test_shop_item_json_marks_discount_only_on_offer() {
    let catalog = Catalog::builtin();
    let today = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let offer = current_offer(&catalog, &BTreeSet::new(), today).unwrap();

    let discounted = catalog.get(&offer.item_id).unwrap();
    let json = ShopItemJson::from_item(discounted, false, Some(&offer));
    assert_eq!(json.discounted_price, Some(offer.discounted_price));

    let other = catalog.get("dragon").unwrap();
    let json = ShopItemJson::from_item(other, false, Some(&offer));
    assert_eq!(json.discounted_price, None);
    assert_eq!(json.rarity.as_deref(), Some("mythical"));
    assert_eq!(json.kind, "savings_skin");
}

#[test]
fn test_discount_json_from_offer() {
    let catalog = Catalog::builtin();
    let today = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let offer = current_offer(&catalog, &BTreeSet::new(), today).unwrap();

    let json = DiscountJson::from(offer.clone());
    assert_eq!(json.item_id, offer.item_id);
    assert_eq!(json.discounted_price, offer.original_price * 4 / 5);
}

// =============================================================================
// PURCHASE TYPES TESTS
// =============================================================================

#[test]
fn test_purchase_request_validation() {
    let ok = PurchaseRequest {
        item_id: "dragon".to_string(),
        date: None,
    };
    assert!(ok.validate().is_ok());

    let empty = PurchaseRequest {
        item_id: String::new(),
        date: None,
    };
    assert!(empty.validate().is_err());

    let oversized = PurchaseRequest {
        item_id: "x".repeat(65),
        date: None,
    };
    assert!(oversized.validate().is_err());
}

#[test]
fn test_purchase_response_constructors() {
    let ok = PurchaseResponse::success(80, 20);
    assert!(ok.success);
    assert_eq!(ok.paid, Some(80));
    assert_eq!(ok.balance, Some(20));
    assert!(ok.error.is_none());

    let err = PurchaseResponse::error("nope");
    assert!(!err.success);
    assert_eq!(err.error.as_deref(), Some("nope"));
}

// =============================================================================
// CLAIM RESPONSE TESTS
// =============================================================================

#[test]
fn test_claim_unavailable_is_success_without_claim() {
    let response = ClaimResponse::unavailable();
    assert!(response.success);
    assert!(!response.claimed);
    assert_eq!(response.total_mustika, 0);
    assert!(response.error.is_none());
}

// =============================================================================
// GOAL TYPES TESTS
// =============================================================================

#[test]
fn test_create_goal_request_fixed_and_infinite() {
    let fixed: CreateGoalRequest = serde_json::from_str(
        r#"{"id":"bike","name":"Bike","target_amount":250.0,"visual":"plant"}"#,
    )
    .unwrap();
    let goal = fixed.to_goal().unwrap();
    assert!(!goal.is_infinite());

    let infinite: CreateGoalRequest =
        serde_json::from_str(r#"{"id":"rainy","name":"Rainy","visual":"pet"}"#).unwrap();
    let goal = infinite.to_goal().unwrap();
    assert!(goal.is_infinite());
    assert_eq!(goal.effective_skin_id(), "pet_default");
}

#[test]
fn test_create_goal_request_rejects_bad_input() {
    let bad_visual: CreateGoalRequest =
        serde_json::from_str(r#"{"id":"g","name":"G","visual":"rock"}"#).unwrap();
    assert!(bad_visual.to_goal().is_err());

    let bad_target: CreateGoalRequest =
        serde_json::from_str(r#"{"id":"g","name":"G","target_amount":0.0,"visual":"pet"}"#)
            .unwrap();
    assert!(bad_target.to_goal().is_err());

    let empty_id: CreateGoalRequest =
        serde_json::from_str(r#"{"id":"","name":"G","visual":"pet"}"#).unwrap();
    assert!(empty_id.to_goal().is_err());
}

#[test]
fn test_goal_json_derives_stage_fields() {
    let assets = SkinAssets::builtin();
    let mut goal = SavingsGoal::fixed("bike", "Bike", 100.0, VisualKind::Plant, None);
    goal.deposit(
        chrono::NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        80.0,
    )
    .unwrap();

    let json = GoalJson::from_goal(&goal, &assets);
    assert_eq!(json.progress_percent, 80.0);
    assert_eq!(json.stage, 4);
    assert!(!json.is_max);
    assert_eq!(json.stage_label, "Mature");
    assert_eq!(json.asset.as_deref(), Some("assets/skins/default/stage4.png"));

    let serialized = serde_json::to_string(&json).unwrap();
    // Infinite-goal-only field is omitted... target is present for fixed goals.
    assert!(serialized.contains("\"target_amount\":100.0"));
}

// =============================================================================
// THEME REQUEST TESTS
// =============================================================================

#[test]
fn test_theme_request_background_precedence() {
    let both: ThemeRequest = serde_json::from_str(
        r##"{"name":"T","primary":"#fff","accent":"#000","card_background":"#fff",
            "background_color":"#eee","background_image":"bg.jpg"}"##,
    )
    .unwrap();
    match both.to_background().unwrap() {
        sprout_core::BackgroundSpec::Image { reference } => assert_eq!(reference, "bg.jpg"),
        sprout_core::BackgroundSpec::Solid { .. } => panic!("image should win"),
    }

    let color_only: ThemeRequest = serde_json::from_str(
        r##"{"name":"T","primary":"#fff","accent":"#000","card_background":"#fff",
            "background_color":"#eee"}"##,
    )
    .unwrap();
    match color_only.to_background().unwrap() {
        sprout_core::BackgroundSpec::Solid { color } => assert_eq!(color, "#eee"),
        sprout_core::BackgroundSpec::Image { .. } => panic!("expected solid"),
    }

    // Neither given: the card background doubles as the app background.
    let neither: ThemeRequest = serde_json::from_str(
        r##"{"name":"T","primary":"#fff","accent":"#000","card_background":"#abc"}"##,
    )
    .unwrap();
    match neither.to_background().unwrap() {
        sprout_core::BackgroundSpec::Solid { color } => assert_eq!(color, "#abc"),
        sprout_core::BackgroundSpec::Image { .. } => panic!("expected solid"),
    }
}

#[test]
fn test_theme_request_rejects_empty_name() {
    let request: ThemeRequest = serde_json::from_str(
        r##"{"name":"","primary":"#fff","accent":"#000","card_background":"#fff"}"##,
    )
    .unwrap();
    assert!(request.to_background().is_err());
}
