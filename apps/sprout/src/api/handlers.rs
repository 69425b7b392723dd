//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Every handler resolves its effective calendar date at this boundary
//! (request-supplied `YYYY-MM-DD` or the server's local date) and hands
//! plain dates into the core — the engine itself never reads a clock.

use super::{
    AppState,
    types::{
        AmountRequest, AmountResponse, ClaimRequest, ClaimResponse, CreateGoalRequest,
        DiscountJson, ExportResponse, GoalJson, GoalsResponse, HealthResponse, PurchaseRequest,
        PurchaseResponse, ShopItemJson, ShopResponse, StatusResponse, ThemeRequest, ThemeResponse,
        resolve_date,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;

/// The server's local calendar date.
fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Optional date query parameter (`?date=YYYY-MM-DD`).
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    date: Option<String>,
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Get profile status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    (
        StatusCode::OK,
        Json(StatusResponse::from_profile(session.profile())),
    )
}

// =============================================================================
// SHOP HANDLERS
// =============================================================================

/// List the shop catalog with ownership and this week's discount applied.
pub async fn shop_handler(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> impl IntoResponse {
    let today = match resolve_date(query.date.as_deref(), local_today()) {
        Ok(d) => d,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let session = state.session.read().await;
    let profile = session.profile();
    let offer = session.current_offer(today);

    let items = session
        .catalog()
        .iter()
        .map(|item| ShopItemJson::from_item(item, profile.owns(&item.id), offer.as_ref()))
        .collect();

    let response = ShopResponse {
        items,
        discount: offer.map(DiscountJson::from),
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Get only this week's discount offer.
pub async fn discount_handler(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> impl IntoResponse {
    let today = match resolve_date(query.date.as_deref(), local_today()) {
        Ok(d) => d,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let session = state.session.read().await;
    let offer = session.current_offer(today).map(DiscountJson::from);
    (StatusCode::OK, Json(serde_json::json!({ "discount": offer }))).into_response()
}

// =============================================================================
// PURCHASE HANDLER
// =============================================================================

/// Buy a catalog item at today's effective price.
pub async fn purchase_handler(
    State(state): State<AppState>,
    Json(request): Json<PurchaseRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(PurchaseResponse::error(e.to_string())),
        );
    }
    let today = match resolve_date(request.date.as_deref(), local_today()) {
        Ok(d) => d,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(PurchaseResponse::error(e.to_string())),
            );
        }
    };

    let mut session = state.session.write().await;
    match session.purchase(&request.item_id, today) {
        Ok(paid) => {
            let balance = session.profile().wallet.mustika;
            (StatusCode::OK, Json(PurchaseResponse::success(paid, balance)))
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(PurchaseResponse::error(e.to_string())),
        ),
    }
}

// =============================================================================
// CLAIM HANDLER
// =============================================================================

/// Claim today's daily collection rewards.
pub async fn claim_handler(
    State(state): State<AppState>,
    Json(request): Json<ClaimRequest>,
) -> impl IntoResponse {
    let today = match resolve_date(request.date.as_deref(), local_today()) {
        Ok(d) => d,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ClaimResponse::error(e.to_string())),
            );
        }
    };

    let mut session = state.session.write().await;
    match session.claim_daily(today) {
        Ok(Some(summary)) => (StatusCode::OK, Json(ClaimResponse::claimed(&summary))),
        // Unavailable is data, not an error: already claimed or empty collection.
        Ok(None) => (StatusCode::OK, Json(ClaimResponse::unavailable())),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ClaimResponse::error(e.to_string())),
        ),
    }
}

// =============================================================================
// GOAL HANDLERS
// =============================================================================

/// List goals with derived progress, stage, and asset.
pub async fn goals_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    let goals = session
        .profile()
        .goals()
        .map(|goal| GoalJson::from_goal(goal, session.assets()))
        .collect();
    (StatusCode::OK, Json(GoalsResponse { goals }))
}

/// Create a new goal.
pub async fn create_goal_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateGoalRequest>,
) -> impl IntoResponse {
    let goal = match request.to_goal() {
        Ok(g) => g,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(AmountResponse::error(e.to_string())),
            );
        }
    };

    let mut session = state.session.write().await;
    match session.add_goal(goal) {
        Ok(()) => (StatusCode::OK, Json(AmountResponse::success(0.0))),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(AmountResponse::error(e.to_string())),
        ),
    }
}

/// Deposit into a goal.
pub async fn deposit_handler(
    State(state): State<AppState>,
    Path(goal_id): Path<String>,
    Json(request): Json<AmountRequest>,
) -> impl IntoResponse {
    let at = match resolve_date(request.date.as_deref(), local_today()) {
        Ok(d) => d,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(AmountResponse::error(e.to_string())),
            );
        }
    };

    let mut session = state.session.write().await;
    match session.deposit(&goal_id, at, request.amount) {
        Ok(saved) => (StatusCode::OK, Json(AmountResponse::success(saved))),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(AmountResponse::error(e.to_string())),
        ),
    }
}

/// Withdraw from a goal.
pub async fn withdraw_handler(
    State(state): State<AppState>,
    Path(goal_id): Path<String>,
    Json(request): Json<AmountRequest>,
) -> impl IntoResponse {
    let at = match resolve_date(request.date.as_deref(), local_today()) {
        Ok(d) => d,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(AmountResponse::error(e.to_string())),
            );
        }
    };

    let mut session = state.session.write().await;
    match session.withdraw(&goal_id, at, request.amount) {
        Ok(taken) => (StatusCode::OK, Json(AmountResponse::success(taken))),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(AmountResponse::error(e.to_string())),
        ),
    }
}

/// Cash out a completed goal.
pub async fn cash_out_handler(
    State(state): State<AppState>,
    Path(goal_id): Path<String>,
) -> impl IntoResponse {
    let mut session = state.session.write().await;
    match session.cash_out(&goal_id) {
        Ok(balance) => (StatusCode::OK, Json(AmountResponse::success(balance))),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(AmountResponse::error(e.to_string())),
        ),
    }
}

// =============================================================================
// THEME HANDLER
// =============================================================================

/// Derive and store a custom theme.
pub async fn theme_handler(
    State(state): State<AppState>,
    Json(request): Json<ThemeRequest>,
) -> impl IntoResponse {
    let background = match request.to_background() {
        Ok(b) => b,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ThemeResponse::error(e.to_string())),
            );
        }
    };

    // Time-based id, minted at the boundary so the derivation stays pure.
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let id = format!("theme-{millis}");

    let mut session = state.session.write().await;
    match session.add_theme(
        id,
        &request.name,
        &request.primary,
        &request.accent,
        &request.card_background,
        &background,
    ) {
        Ok(theme) => (StatusCode::OK, Json(ThemeResponse::success(theme))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ThemeResponse::error(e.to_string())),
        ),
    }
}

// =============================================================================
// EXPORT HANDLER
// =============================================================================

/// Export the profile snapshot (base64 bytes + checksum).
pub async fn export_handler(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.read().await;
    match session.export_snapshot() {
        Ok((data, checksum)) => (StatusCode::OK, Json(ExportResponse::success(data, checksum))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ExportResponse::error(format!("Export failed: {}", e))),
        ),
    }
}
