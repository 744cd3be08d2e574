//! CRUD handlers for the `/clients` resource.
//!
//! Handlers are thin: they hand the raw payload to the repository and let
//! the typed outcome decide the status code. The mapping is deterministic:
//!
//! | Outcome                  | Status |
//! |--------------------------|--------|
//! | list/get/update/delete   | 200    |
//! | create                   | 201    |
//! | `NotFound`               | 404    |
//! | `Validation`             | 400    |
//! | `Store`                  | 500    |
//!
//! Mutating payloads are arbitrary JSON objects; the repository sanitizes
//! them against the schema allow-list before anything is applied.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::error::AppResult;
use crate::metrics;
use crate::models::Client;
use crate::state::AppState;

/// List all clients.
#[instrument(skip(state))]
pub async fn list_clients(State(state): State<AppState>) -> AppResult<Json<Vec<Client>>> {
    let clients = state.repository.list_all().await?;
    Ok(Json(clients))
}

/// Get a specific client by id.
#[instrument(skip(state))]
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Client>> {
    let client = state.repository.get_by_id(&id).await?;
    Ok(Json(client))
}

/// Create a new client.
#[instrument(skip(state, payload))]
pub async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<Map<String, Value>>,
) -> AppResult<(StatusCode, Json<Client>)> {
    let client = state.repository.create(&payload).await?;
    metrics::record_client_created();

    Ok((StatusCode::CREATED, Json(client)))
}

/// Update an existing client.
#[instrument(skip(state, payload))]
pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Map<String, Value>>,
) -> AppResult<Json<Client>> {
    let client = state.repository.update(&id, &payload).await?;
    Ok(Json(client))
}

/// Delete a client by id, returning the deleted record.
#[instrument(skip(state))]
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Client>> {
    let client = state.repository.delete_by_id(&id).await?;
    metrics::record_client_deleted();

    Ok(Json(client))
}
