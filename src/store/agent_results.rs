//! Agent-results façade: saved agent answers the user chose to keep.
//! Append-only inserts plus delete-by-identity, like drafts.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::models::{AgentResult, RecordKind};
use crate::store::identity::Identity;
use crate::store::{Collection, RecordStore};

pub struct AgentResults {
    store: Arc<dyn RecordStore>,
}

impl AgentResults {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        AgentResults { store }
    }

    pub async fn list(&self) -> StoreResult<Vec<Value>> {
        let records = self.store.list_all(Collection::AgentResults).await?;
        Ok(records
            .into_iter()
            .filter(|r| RecordKind::of(&r.doc).is_agent_result())
            .map(|r| r.doc)
            .collect())
    }

    pub async fn create(&self, result: AgentResult) -> StoreResult<Value> {
        let doc = serde_json::to_value(&result)?;
        let saved = self.store.insert(Collection::AgentResults, doc).await?;
        Ok(saved.doc)
    }

    pub async fn delete(&self, token: &str) -> StoreResult<()> {
        let identity = Identity::resolve(token)?;
        if self
            .store
            .delete_by_identity(Collection::AgentResults, &identity)
            .await?
        {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}
