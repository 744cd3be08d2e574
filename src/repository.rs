//! CRUD operations for the `Client` resource.
//!
//! The repository sits between handlers and the store: it sanitizes
//! mutating payloads against the schema allow-list, enforces the
//! required-field invariant, and classifies outcomes into the typed errors
//! the router maps to status codes. Store faults are not recovered here;
//! they surface as [`AppError::Store`] with the backend's message intact.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::metrics;
use crate::models::Client;
use crate::sanitize::SchemaPolicy;
use crate::store::{ClientChanges, ClientStore, StoreError};
use crate::validation::{optional_name, require_name};

/// Message used for every unresolved identifier.
const CLIENT_NOT_FOUND: &str = "Client not found";

/// Repository over a [`ClientStore`] backend.
///
/// Cheap to clone; handlers share one instance through application state.
#[derive(Clone)]
pub struct ClientRepository {
    store: Arc<dyn ClientStore>,
    policy: SchemaPolicy,
}

impl ClientRepository {
    /// Build a repository from a store backend and a schema policy.
    pub fn new(store: Arc<dyn ClientStore>, policy: SchemaPolicy) -> Self {
        Self { store, policy }
    }

    /// All persisted clients in store order. Empty store yields an empty
    /// vector.
    pub async fn list_all(&self) -> AppResult<Vec<Client>> {
        self.store
            .find_all()
            .await
            .map_err(|e| store_failure("find_all", e))
    }

    /// Look up one client. Unknown and malformed identifiers both resolve
    /// to `NotFound`.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Client> {
        self.store
            .find_by_id(id)
            .await
            .map_err(|e| store_failure("find_by_id", e))?
            .ok_or_else(client_not_found)
    }

    /// Create a client from a raw payload.
    ///
    /// The payload is sanitized first; the required `name` field is then
    /// validated against the schema. Returns the persisted record with its
    /// store-assigned identifier.
    pub async fn create(&self, raw: &Map<String, Value>) -> AppResult<Client> {
        let fields = self.policy.sanitize(raw);
        let name = require_name(&fields)?;

        let client = self
            .store
            .insert(&name)
            .await
            .map_err(|e| store_failure("insert", e))?;

        debug!(id = %client.id, "Client created");
        Ok(client)
    }

    /// Apply a raw payload to an existing client.
    ///
    /// Only allow-listed fields are applied. A payload whose surviving
    /// fields are empty leaves the record unchanged but still resolves the
    /// identifier (or fails with `NotFound`). A present-but-invalid `name`
    /// is a validation error before the store is touched.
    pub async fn update(&self, id: &str, raw: &Map<String, Value>) -> AppResult<Client> {
        let fields = self.policy.sanitize(raw);
        let changes = ClientChanges {
            name: optional_name(&fields)?,
        };

        self.store
            .update_by_id(id, &changes)
            .await
            .map_err(|e| store_failure("update_by_id", e))?
            .ok_or_else(client_not_found)
    }

    /// Delete a client, returning the removed record.
    pub async fn delete_by_id(&self, id: &str) -> AppResult<Client> {
        let deleted = self
            .store
            .delete_by_id(id)
            .await
            .map_err(|e| store_failure("delete_by_id", e))?
            .ok_or_else(client_not_found)?;

        debug!(id = %deleted.id, "Client deleted");
        Ok(deleted)
    }
}

fn client_not_found() -> AppError {
    AppError::NotFound(CLIENT_NOT_FOUND.to_string())
}

fn store_failure(operation: &'static str, err: StoreError) -> AppError {
    metrics::record_store_failure(operation);
    AppError::from(err)
}
