//! The persistence core: a generic document store with pluggable backends,
//! plus the collection façades built on top of it.
//!
//! The store handle is constructed once in `main` and injected into the
//! façades; there is no process-wide lazily-initialized connection.

pub mod agent_results;
pub mod conversations;
pub mod drafts;
pub mod file;
pub mod identity;
pub mod prompts;
pub mod sqlite;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreResult;
use self::identity::Identity;

pub use self::file::FileStore;
pub use self::sqlite::SqliteStore;

/// The named collections this service persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Inbox,
    Prompts,
    Drafts,
    AgentResults,
    Conversations,
}

impl Collection {
    /// Storage key: table discriminator for SQLite, file stem for flat files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Inbox => "inbox",
            Collection::Prompts => "prompts",
            Collection::Drafts => "drafts",
            Collection::AgentResults => "agent_results",
            Collection::Conversations => "conversations",
        }
    }
}

/// A persisted document together with its store-native key.
///
/// The native key is a UUID assigned on insert, independent of whatever `id`
/// field the client put in the document. The document itself always carries a
/// usable `id` field: insert copies the native key into `id` when the client
/// supplied none.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub native_id: String,
    pub doc: Value,
}

/// Durable identifier → document mapping, per named collection.
///
/// Every mutating call commits before returning; any backend I/O failure
/// surfaces as `StoreError::Unavailable`, never as silently dropped data.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record in the collection. Order carries no meaning; callers that
    /// need an order sort on their own fields.
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<StoredRecord>>;

    /// Persist a new document, assigning a native key and guaranteeing the
    /// returned document has a resolvable `id` field.
    async fn insert(&self, collection: Collection, doc: Value) -> StoreResult<StoredRecord>;

    /// Shallow-merge `patch`'s fields into the matched document in place.
    /// Returns whether any identity encoding matched.
    async fn update_by_identity(
        &self,
        collection: Collection,
        identity: &Identity,
        patch: Value,
    ) -> StoreResult<bool>;

    /// Remove the matched document. Returns whether any identity encoding
    /// matched.
    async fn delete_by_identity(
        &self,
        collection: Collection,
        identity: &Identity,
    ) -> StoreResult<bool>;

    async fn find_one(
        &self,
        collection: Collection,
        identity: &Identity,
    ) -> StoreResult<Option<StoredRecord>>;
}

/// Shallow merge: each top-level key of `patch` replaces the corresponding
/// key of `doc`.
pub(crate) fn merge_patch(doc: &mut Value, patch: Value) {
    if let (Value::Object(target), Value::Object(fields)) = (doc, patch) {
        for (key, value) in fields {
            target.insert(key, value);
        }
    }
}

/// Give the document a resolvable `id` if the client supplied none.
pub(crate) fn ensure_id(doc: &mut Value, native_id: &str) {
    if let Value::Object(map) = doc {
        let missing = match map.get("id") {
            None | Some(Value::Null) => true,
            Some(_) => false,
        };
        if missing {
            map.insert("id".to_string(), Value::String(native_id.to_string()));
        }
    }
}
