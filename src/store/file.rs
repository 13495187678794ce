//! Flat-file document backend.
//!
//! One pretty-printed JSON array per collection under the data directory,
//! matching the layout a hand-edited deployment would use. Every mutation is
//! a read-modify-write of the whole file; the write lands in a temp file and
//! is renamed over the original, so a crash mid-write never truncates the
//! collection.
//!
//! The native key travels inside each stored document under a reserved
//! `_nid` field, which is stripped before documents are handed to callers.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::identity::Identity;
use crate::store::{ensure_id, merge_patch, Collection, RecordStore, StoredRecord};

const NATIVE_ID_FIELD: &str = "_nid";

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use (creating if needed) `dir` as the data directory.
    pub fn new(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(FileStore { dir })
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.as_str()))
    }

    async fn load(&self, collection: Collection) -> StoreResult<Vec<StoredRecord>> {
        let path = self.path(collection);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            // A collection that has never been written to is empty, not broken.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let docs: Vec<Value> = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Unavailable(format!("corrupt collection file {path:?}: {e}")))?;

        docs.into_iter().map(split_native_id).collect()
    }

    async fn save(&self, collection: Collection, records: &[StoredRecord]) -> StoreResult<()> {
        let docs: Vec<Value> = records.iter().map(join_native_id).collect();
        let bytes = serde_json::to_vec_pretty(&docs)?;

        let path = self.path(collection);
        let tmp = temp_path(&path);
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

/// Pull the reserved native-id field out of a document loaded from disk.
fn split_native_id(mut doc: Value) -> StoreResult<StoredRecord> {
    let native_id = match &mut doc {
        Value::Object(map) => match map.remove(NATIVE_ID_FIELD) {
            Some(Value::String(nid)) => nid,
            _ => {
                return Err(StoreError::Unavailable(
                    "stored document is missing its native id".to_string(),
                ))
            }
        },
        _ => return Err(StoreError::Unavailable("stored document is not an object".to_string())),
    };
    Ok(StoredRecord { native_id, doc })
}

fn join_native_id(record: &StoredRecord) -> Value {
    let mut doc = record.doc.clone();
    if let Value::Object(map) = &mut doc {
        map.insert(NATIVE_ID_FIELD.to_string(), Value::String(record.native_id.clone()));
    }
    doc
}

#[async_trait]
impl RecordStore for FileStore {
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<StoredRecord>> {
        self.load(collection).await
    }

    async fn insert(&self, collection: Collection, mut doc: Value) -> StoreResult<StoredRecord> {
        let native_id = Uuid::new_v4().to_string();
        ensure_id(&mut doc, &native_id);

        let mut records = self.load(collection).await?;
        records.push(StoredRecord { native_id: native_id.clone(), doc: doc.clone() });
        self.save(collection, &records).await?;

        Ok(StoredRecord { native_id, doc })
    }

    async fn update_by_identity(
        &self,
        collection: Collection,
        identity: &Identity,
        patch: Value,
    ) -> StoreResult<bool> {
        let mut records = self.load(collection).await?;
        let Some(native_id) = identity.locate(&records).map(|r| r.native_id.clone()) else {
            return Ok(false);
        };

        for record in &mut records {
            if record.native_id == native_id {
                merge_patch(&mut record.doc, patch);
                break;
            }
        }
        self.save(collection, &records).await?;
        Ok(true)
    }

    async fn delete_by_identity(
        &self,
        collection: Collection,
        identity: &Identity,
    ) -> StoreResult<bool> {
        let mut records = self.load(collection).await?;
        let Some(native_id) = identity.locate(&records).map(|r| r.native_id.clone()) else {
            return Ok(false);
        };

        records.retain(|r| r.native_id != native_id);
        self.save(collection, &records).await?;
        Ok(true)
    }

    async fn find_one(
        &self,
        collection: Collection,
        identity: &Identity,
    ) -> StoreResult<Option<StoredRecord>> {
        let records = self.load(collection).await?;
        Ok(identity.locate(&records).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, FileStore) {
        let dir = TempDir::new().expect("temp dir");
        let store = FileStore::new(dir.path()).expect("file store");
        (dir, store)
    }

    #[tokio::test]
    async fn insert_then_list_round_trips() {
        let (_dir, store) = temp_store();
        let saved = store
            .insert(Collection::Drafts, json!({"id": 42, "subject": "a", "body": "b"}))
            .await
            .unwrap();

        let all = store.list_all(Collection::Drafts).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].doc, saved.doc);
        // The reserved field never leaks into caller-visible documents.
        assert!(all[0].doc.get(NATIVE_ID_FIELD).is_none());
    }

    #[tokio::test]
    async fn data_survives_a_reopen() {
        let (dir, store) = temp_store();
        store
            .insert(Collection::Drafts, json!({"id": "d1", "subject": "a", "body": "b"}))
            .await
            .unwrap();
        drop(store);

        let reopened = FileStore::new(dir.path()).unwrap();
        let identity = Identity::resolve("d1").unwrap();
        let found = reopened.find_one(Collection::Drafts, &identity).await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn delete_by_numeric_coercion() {
        let (_dir, store) = temp_store();
        store
            .insert(Collection::Drafts, json!({"id": 42, "subject": "a", "body": "b"}))
            .await
            .unwrap();

        let identity = Identity::resolve("42").unwrap();
        assert!(store.delete_by_identity(Collection::Drafts, &identity).await.unwrap());
        assert!(store.list_all(Collection::Drafts).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_id_leaves_file_unchanged() {
        let (_dir, store) = temp_store();
        store
            .insert(Collection::Drafts, json!({"id": "keep", "subject": "a", "body": "b"}))
            .await
            .unwrap();

        let identity = Identity::resolve("unknown").unwrap();
        assert!(!store.delete_by_identity(Collection::Drafts, &identity).await.unwrap());
        assert_eq!(store.list_all(Collection::Drafts).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn native_key_resolution_after_store_assigned_id_was_overwritten() {
        let (_dir, store) = temp_store();
        let saved = store
            .insert(Collection::Conversations, json!({"title": "c", "messages": []}))
            .await
            .unwrap();

        // Overwrite the doc id with an unrelated value; the native key must
        // still reach the record.
        let identity = Identity::resolve(&saved.native_id).unwrap();
        store
            .update_by_identity(Collection::Conversations, &identity, json!({"id": "renamed"}))
            .await
            .unwrap();

        let by_native = Identity::resolve(&saved.native_id).unwrap();
        let found = store.find_one(Collection::Conversations, &by_native).await.unwrap().unwrap();
        assert_eq!(found.doc["id"], json!("renamed"));
    }

    #[tokio::test]
    async fn corrupt_collection_file_is_reported_not_emptied() {
        let (dir, store) = temp_store();
        std::fs::write(dir.path().join("drafts.json"), b"not json").unwrap();
        let err = store.list_all(Collection::Drafts).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
