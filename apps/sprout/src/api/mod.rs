//! # Sprout HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET  /health` - Health check
//! - `GET  /status` - Wallet balances and profile counts
//! - `GET  /shop` - Catalog with ownership and this week's discount
//! - `GET  /shop/discount` - This week's discount offer only
//! - `POST /purchase` - Buy a catalog item
//! - `POST /claim` - Claim daily collection rewards
//! - `GET  /goals` - List goals with derived progress/stage
//! - `POST /goals` - Create a goal
//! - `POST /goals/{id}/deposit` - Deposit into a goal
//! - `POST /goals/{id}/withdraw` - Withdraw from a goal
//! - `POST /goals/{id}/cash-out` - Cash out a completed goal
//! - `POST /themes` - Derive and store a custom theme
//! - `POST /export` - Export the profile snapshot
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `SPROUT_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `SPROUT_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `SPROUT_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use auth::get_api_key_from_env;
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
// Re-export handlers and types for integration tests (via `sprout::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    cash_out_handler, claim_handler, create_goal_handler, deposit_handler, discount_handler,
    export_handler, goals_handler, health_handler, purchase_handler, shop_handler, status_handler,
    theme_handler, withdraw_handler,
};
#[allow(unused_imports)]
pub use types::{
    AmountRequest, AmountResponse, ClaimRequest, ClaimResponse, CreateGoalRequest, DiscountJson,
    ExportResponse, GoalJson, GoalsResponse, HealthResponse, ItemRewardJson, PurchaseRequest,
    PurchaseResponse, ShopItemJson, ShopResponse, StatusResponse, ThemeRequest, ThemeResponse,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use sprout_core::{Session, SproutError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the engine session.
#[derive(Clone)]
pub struct AppState {
    /// The session containing profile, catalog, and assets.
    pub session: Arc<RwLock<Session>>,
}

impl AppState {
    /// Create new app state with a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `SPROUT_CORS_ORIGINS` environment variable:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("SPROUT_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (SPROUT_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in SPROUT_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No SPROUT_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. CORS - handles preflight requests
/// 2. Tracing - logs all requests
/// 3. Rate Limiting - protects against DoS (if enabled)
/// 4. Authentication - validates API key (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    // Check if rate limiting is enabled
    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    // Check if authentication is enabled
    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set SPROUT_API_KEY environment variable to enable authentication."
        );
    }

    // Build base router with routes
    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/shop", get(handlers::shop_handler))
        .route("/shop/discount", get(handlers::discount_handler))
        .route("/purchase", post(handlers::purchase_handler))
        .route("/claim", post(handlers::claim_handler))
        .route(
            "/goals",
            get(handlers::goals_handler).post(handlers::create_goal_handler),
        )
        .route("/goals/{id}/deposit", post(handlers::deposit_handler))
        .route("/goals/{id}/withdraw", post(handlers::withdraw_handler))
        .route("/goals/{id}/cash-out", post(handlers::cash_out_handler))
        .route("/themes", post(handlers::theme_handler))
        .route("/export", post(handlers::export_handler));

    // Apply authentication middleware (innermost - runs last on request)
    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    // Apply rate limiting middleware
    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    // Apply CORS, body limit, and tracing (outermost layers)
    router
        .layer(axum::extract::DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, session: Session) -> Result<(), SproutError> {
    let state = AppState::new(session);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| SproutError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Sprout HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| SproutError::IoError(format!("Server error: {}", e)))
}
