use serde::{Deserialize, Serialize};

/// A persisted client record.
///
/// The identifier is assigned by the document store and is opaque to this
/// service: the MongoDB backend renders an ObjectId as its hex string, the
/// in-memory backend a UUID. It never changes once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Store-assigned identifier.
    pub id: String,
    /// Display name; non-empty for every persisted record.
    pub name: String,
}
