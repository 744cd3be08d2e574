//! Application routing configuration with middleware stack.
//!
//! # Middleware Stack (request order)
//!
//! ```text
//! Request
//!    │
//!    ▼
//! ┌──────────────────┐
//! │      CORS        │ ← permissive, every route
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │  Rate Limiting   │ ← 429 if exceeded, never reaches the router
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │   Request ID     │ ← Adds X-Request-Id header
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │     Tracing      │ ← HTTP request/response logging
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ Body size limit  │ ← caps JSON payloads
//! └────────┬─────────┘
//!          │
//!          ▼
//!      Handler
//! ```
//!
//! Rate limiting applies uniformly to every route, health endpoints
//! included.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::handlers;
use crate::middleware::{RateLimitLayer, RequestIdLayer};
use crate::state::AppState;

/// Build the application router with all routes and middleware configured.
///
/// Rate limiting is attached only when enabled in the configuration
/// (`RATE_LIMIT_MAX_REQUESTS > 0`); the limiter instance itself lives in
/// the application state so the background sweep task can reach it.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        // Client resource endpoints
        .route(
            "/clients",
            get(handlers::list_clients).post(handlers::create_client),
        )
        .route(
            "/clients/{id}",
            get(handlers::get_client)
                .put(handlers::update_client)
                .delete(handlers::delete_client),
        );

    // Middleware is applied bottom to top: the last layer added runs first.

    // 1. Request body size limit (prevents DoS via large payloads)
    router = router.layer(DefaultBodyLimit::max(state.config.max_request_body_size));

    // 2. Tracing
    router = router.layer(TraceLayer::new_for_http());

    // 3. Request ID
    router = router.layer(RequestIdLayer::new());

    // 4. Rate limiting (if enabled)
    if let Some(limiter) = state.limiter.clone() {
        info!(
            max_requests = state.config.rate_limit_max_requests,
            window_ms = state.config.rate_limit_window.as_millis() as u64,
            "Rate limiting enabled"
        );
        router = router.layer(RateLimitLayer::new(limiter));
    } else {
        info!("Rate limiting disabled (RATE_LIMIT_MAX_REQUESTS=0)");
    }

    // 5. CORS, outermost: even throttled responses carry the headers
    router = router.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    router.with_state(state)
}
