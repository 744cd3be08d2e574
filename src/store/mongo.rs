//! MongoDB-backed store implementation.
//!
//! Wraps one typed collection handle. The driver maintains its own
//! connection pool; this type is cheap to clone and share.
//!
//! Identifiers are ObjectIds rendered as 24-character hex strings at the
//! API boundary. A string that does not parse back into an ObjectId cannot
//! name any document, so lookups with such identifiers short-circuit to
//! `Ok(None)` without a round trip.

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::doc;
use mongodb::options::ReturnDocument;
use mongodb::{Client as MongoClient, Collection};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{ClientChanges, ClientStore, StoreError};
use crate::config::Config;
use crate::models::Client;

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Persisted shape of a client record.
#[derive(Debug, Serialize, Deserialize)]
struct ClientDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
}

impl From<ClientDocument> for Client {
    fn from(document: ClientDocument) -> Self {
        Client {
            id: document.id.to_hex(),
            name: document.name,
        }
    }
}

/// MongoDB implementation of [`ClientStore`].
#[derive(Clone)]
pub struct MongoClientStore {
    client: MongoClient,
    collection: Collection<ClientDocument>,
}

impl MongoClientStore {
    /// Connect to MongoDB and verify the server answers a ping.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Connection` when the URI is invalid or the
    /// server does not respond. Callers treat this as fatal at startup:
    /// the service refuses to run with no backing store.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let client = MongoClient::with_uri_str(&config.mongodb_uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let collection = client
            .database(&config.mongodb_database)
            .collection::<ClientDocument>(&config.mongodb_collection);

        let store = Self { client, collection };

        // with_uri_str does not touch the network; the ping does.
        store
            .ping()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        debug!(
            database = %config.mongodb_database,
            collection = %config.mongodb_collection,
            "Connected to MongoDB"
        );
        Ok(store)
    }
}

#[async_trait]
impl ClientStore for MongoClientStore {
    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Client>, StoreError> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<ClientDocument> = cursor.try_collect().await?;
        Ok(documents.into_iter().map(Client::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> Result<Option<Client>, StoreError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };

        let document = self.collection.find_one(doc! { "_id": oid }).await?;
        Ok(document.map(Client::from))
    }

    #[instrument(skip(self))]
    async fn insert(&self, name: &str) -> Result<Client, StoreError> {
        let document = ClientDocument {
            id: ObjectId::new(),
            name: name.to_string(),
        };
        self.collection.insert_one(&document).await?;
        Ok(Client::from(document))
    }

    #[instrument(skip(self, changes))]
    async fn update_by_id(
        &self,
        id: &str,
        changes: &ClientChanges,
    ) -> Result<Option<Client>, StoreError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };

        // MongoDB rejects an empty $set document; a no-op update is a read.
        let Some(name) = &changes.name else {
            let document = self.collection.find_one(doc! { "_id": oid }).await?;
            return Ok(document.map(Client::from));
        };

        let document = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": { "name": name.as_str() } })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(document.map(Client::from))
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: &str) -> Result<Option<Client>, StoreError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };

        let document = self.collection.find_one_and_delete(doc! { "_id": oid }).await?;
        Ok(document.map(Client::from))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
