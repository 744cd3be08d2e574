//! Document store access for client records.
//!
//! The store is an external collaborator: an opaque, persistent
//! key-by-identifier collection with query capability. This module defines
//! the seam the rest of the service consumes it through:
//!
//! - [`ClientStore`] - the async trait with the five store primitives
//!   (`find_all`, `find_by_id`, `insert`, `update_by_id`, `delete_by_id`)
//!   plus `ping` for startup and readiness gating
//! - [`MongoClientStore`] - the MongoDB-backed production implementation
//! - [`MemoryClientStore`] - an insertion-ordered in-memory implementation
//!   used by unit and integration tests
//!
//! # Identifier handling
//!
//! Identifiers are opaque strings assigned by the backend. A lookup with an
//! identifier the backend cannot even parse returns `Ok(None)`, the same as
//! an unknown identifier; the distinction is invisible to callers, who map
//! both to a 404.
//!
//! # Thread Safety
//!
//! All implementations must be `Send + Sync`; handlers share one store
//! instance across concurrent requests.

mod memory;
mod mongo;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::AppError;
use crate::models::Client;

pub use memory::MemoryClientStore;
pub use mongo::MongoClientStore;

/// Faults raised by a store backend.
///
/// The service does not classify backend faults further; whatever message
/// the backend produced travels up and is surfaced as a 500.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not reach the store at startup. Fatal by design.
    #[error("failed to connect to document store: {0}")]
    Connection(String),

    /// Any fault raised while serving a request.
    #[error("{0}")]
    Backend(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err.to_string())
    }
}

/// Partial update to a client record.
///
/// Only fields carried here are applied; everything else on the persisted
/// record is left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientChanges {
    pub name: Option<String>,
}

impl ClientChanges {
    /// Whether the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

/// The document store primitives consumed by the repository.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// All persisted clients, in the backend's natural (insertion) order.
    ///
    /// An empty store yields an empty vector, never an error.
    async fn find_all(&self) -> Result<Vec<Client>, StoreError>;

    /// Look up one client. Unknown and malformed identifiers both yield
    /// `Ok(None)`.
    async fn find_by_id(&self, id: &str) -> Result<Option<Client>, StoreError>;

    /// Persist a new client and return it with its assigned identifier.
    async fn insert(&self, name: &str) -> Result<Client, StoreError>;

    /// Apply `changes` to an existing client and return the post-update
    /// record, or `Ok(None)` if the identifier does not resolve.
    async fn update_by_id(
        &self,
        id: &str,
        changes: &ClientChanges,
    ) -> Result<Option<Client>, StoreError>;

    /// Remove a client and return the deleted record, or `Ok(None)` if the
    /// identifier does not resolve.
    async fn delete_by_id(&self, id: &str) -> Result<Option<Client>, StoreError>;

    /// Round-trip liveness probe against the backend.
    async fn ping(&self) -> Result<(), StoreError>;
}
