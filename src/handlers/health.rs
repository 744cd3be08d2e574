//! Health and readiness endpoints.
//!
//! - **Health** (`GET /health`): always 200, with store connectivity in the
//!   body. Suitable for liveness probes and dashboards.
//! - **Readiness** (`GET /ready`): 200 only when the store answers a ping,
//!   503 otherwise. Suitable for load-balancer membership.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use tracing::instrument;

use crate::models::HealthResponse;
use crate::state::AppState;

/// Health check endpoint.
///
/// # Response Body
///
/// ```json
/// {
///   "status": "healthy",
///   "store_connected": true,
///   "version": "0.1.0",
///   "timestamp": "2026-01-15T10:30:00Z"
/// }
/// ```
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_connected = state.store.ping().await.is_ok();

    Json(HealthResponse {
        status: if store_connected {
            "healthy"
        } else {
            "degraded"
        }
        .to_string(),
        store_connected,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Readiness check endpoint for load balancers and orchestrators.
#[instrument(skip(state))]
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, StatusCode> {
    if state.store.ping().await.is_ok() {
        Ok(StatusCode::OK)
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}
