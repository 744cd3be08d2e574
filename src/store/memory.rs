//! In-memory store backend for tests and local development.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ClientChanges, ClientStore, StoreError};
use crate::models::Client;

/// Insertion-ordered in-memory implementation of [`ClientStore`].
///
/// Records live in a `Vec` guarded by an async `RwLock`, so `find_all`
/// returns them in insertion order like the MongoDB backend's natural
/// order. Identifiers are random UUIDs, opaque like ObjectIds.
#[derive(Debug, Default)]
pub struct MemoryClientStore {
    records: RwLock<Vec<Client>>,
}

impl MemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records. Test helper.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records. Test helper.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ClientStore for MemoryClientStore {
    async fn find_all(&self) -> Result<Vec<Client>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Client>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, name: &str) -> Result<Client, StoreError> {
        let client = Client {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        };
        self.records.write().await.push(client.clone());
        Ok(client)
    }

    async fn update_by_id(
        &self,
        id: &str,
        changes: &ClientChanges,
    ) -> Result<Option<Client>, StoreError> {
        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(name) = &changes.name {
            record.name = name.clone();
        }

        Ok(Some(record.clone()))
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Client>, StoreError> {
        let mut records = self.records.write().await;
        let Some(position) = records.iter().position(|c| c.id == id) else {
            return Ok(None);
        };

        Ok(Some(records.remove(position)))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
