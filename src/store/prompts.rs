//! Prompt-configuration store: a singleton document holding the three named
//! prompt strings the agent routes interpolate verbatim. Outside the
//! persistence core proper, but persisted through the same store handle so
//! both backends cover it.

use std::sync::Arc;

use crate::error::StoreResult;
use crate::models::Prompts;
use crate::store::identity::Identity;
use crate::store::{Collection, RecordStore};

pub struct PromptsStore {
    store: Arc<dyn RecordStore>,
}

impl PromptsStore {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        PromptsStore { store }
    }

    /// The current prompt configuration; empty strings before the first save.
    pub async fn get(&self) -> StoreResult<Prompts> {
        let records = self.store.list_all(Collection::Prompts).await?;
        match records.into_iter().next() {
            Some(record) => Ok(serde_json::from_value(record.doc)?),
            None => Ok(Prompts::default()),
        }
    }

    /// Replace the configuration wholesale. Content is stored verbatim.
    pub async fn replace(&self, prompts: Prompts) -> StoreResult<()> {
        let patch = serde_json::to_value(&prompts)?;
        let existing = self.store.list_all(Collection::Prompts).await?;

        match existing.into_iter().next() {
            Some(record) => {
                let identity = Identity::resolve(&record.native_id)?;
                self.store
                    .update_by_identity(Collection::Prompts, &identity, patch)
                    .await?;
            }
            None => {
                self.store.insert(Collection::Prompts, patch).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    fn facade() -> PromptsStore {
        PromptsStore::new(Arc::new(SqliteStore::new(":memory:").unwrap()))
    }

    #[tokio::test]
    async fn defaults_before_first_save() {
        let prompts = facade();
        let current = prompts.get().await.unwrap();
        assert_eq!(current.categorization, "");
    }

    #[tokio::test]
    async fn replace_overwrites_without_accumulating_documents() {
        let prompts = facade();
        prompts
            .replace(Prompts {
                categorization: "sort by urgency".into(),
                action_item: "bullet list".into(),
                auto_reply: "formal tone".into(),
            })
            .await
            .unwrap();
        prompts
            .replace(Prompts {
                categorization: "sort by sender".into(),
                action_item: "bullet list".into(),
                auto_reply: "casual tone".into(),
            })
            .await
            .unwrap();

        let current = prompts.get().await.unwrap();
        assert_eq!(current.categorization, "sort by sender");
        assert_eq!(current.auto_reply, "casual tone");
    }
}
