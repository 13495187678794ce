//! Drafts façade: append-only inserts plus delete-by-identity. There is no
//! update path; the client edits a draft by deleting and re-inserting it.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::models::{Draft, RecordKind};
use crate::store::identity::Identity;
use crate::store::{Collection, RecordStore};

pub struct Drafts {
    store: Arc<dyn RecordStore>,
}

impl Drafts {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Drafts { store }
    }

    /// Every draft in the collection, skipping any tagged record that shares
    /// the storage.
    pub async fn list(&self) -> StoreResult<Vec<Value>> {
        let records = self.store.list_all(Collection::Drafts).await?;
        Ok(records
            .into_iter()
            .filter(|r| RecordKind::of(&r.doc).is_draft())
            .map(|r| r.doc)
            .collect())
    }

    /// Append a new draft; the stored document always comes back with a
    /// resolvable `id`.
    pub async fn create(&self, draft: Draft) -> StoreResult<Value> {
        let doc = serde_json::to_value(&draft)?;
        let saved = self.store.insert(Collection::Drafts, doc).await?;
        Ok(saved.doc)
    }

    /// Delete by any identifier encoding; `NotFound` when none match.
    pub async fn delete(&self, token: &str) -> StoreResult<()> {
        let identity = Identity::resolve(token)?;
        if self.store.delete_by_identity(Collection::Drafts, &identity).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}
