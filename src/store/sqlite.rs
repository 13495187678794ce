//! SQLite document backend.
//!
//! One `records` table holds every collection; documents are stored as JSON
//! text keyed by a UUID native id. SQLite runs in autocommit mode, so each
//! mutating statement is durably committed before the call returns.

use async_trait::async_trait;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::identity::Identity;
use crate::store::{ensure_id, merge_patch, Collection, RecordStore, StoredRecord};

pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    /// `":memory:"` opens an in-memory database for tests.
    pub fn new(path: &str) -> StoreResult<Self> {
        let (manager, max_size) = if path == ":memory:" {
            // A pooled in-memory database must stay on one connection, or
            // each checkout would see its own empty database.
            (SqliteConnectionManager::memory(), 1)
        } else {
            (SqliteConnectionManager::file(path), 8)
        };

        let pool = Pool::builder().max_size(max_size).build(manager)?;

        let conn = pool.get()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                native_id TEXT NOT NULL UNIQUE,
                doc TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_records_collection ON records(collection);",
        )?;

        Ok(SqliteStore { pool })
    }

    fn conn(&self) -> StoreResult<DbConn> {
        Ok(self.pool.get()?)
    }

    fn scan(&self, collection: Collection) -> StoreResult<Vec<StoredRecord>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT native_id, doc FROM records WHERE collection = ?1 ORDER BY id")?;

        let rows = stmt.query_map([collection.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (native_id, doc_text) = row?;
            let doc: Value = serde_json::from_str(&doc_text)
                .map_err(|e| StoreError::Unavailable(format!("corrupt document {native_id}: {e}")))?;
            records.push(StoredRecord { native_id, doc });
        }
        Ok(records)
    }

    fn write_doc(&self, native_id: &str, doc: &Value) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE records SET doc = ?1 WHERE native_id = ?2",
            rusqlite::params![serde_json::to_string(doc)?, native_id],
        )?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<StoredRecord>> {
        self.scan(collection)
    }

    async fn insert(&self, collection: Collection, mut doc: Value) -> StoreResult<StoredRecord> {
        let native_id = Uuid::new_v4().to_string();
        ensure_id(&mut doc, &native_id);

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO records (collection, native_id, doc) VALUES (?1, ?2, ?3)",
            rusqlite::params![collection.as_str(), &native_id, serde_json::to_string(&doc)?],
        )?;

        Ok(StoredRecord { native_id, doc })
    }

    async fn update_by_identity(
        &self,
        collection: Collection,
        identity: &Identity,
        patch: Value,
    ) -> StoreResult<bool> {
        let records = self.scan(collection)?;
        let Some(hit) = identity.locate(&records) else {
            return Ok(false);
        };

        let mut doc = hit.doc.clone();
        let native_id = hit.native_id.clone();
        merge_patch(&mut doc, patch);
        self.write_doc(&native_id, &doc)?;
        Ok(true)
    }

    async fn delete_by_identity(
        &self,
        collection: Collection,
        identity: &Identity,
    ) -> StoreResult<bool> {
        let records = self.scan(collection)?;
        let Some(hit) = identity.locate(&records) else {
            return Ok(false);
        };

        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM records WHERE native_id = ?1",
            [hit.native_id.as_str()],
        )?;
        Ok(deleted > 0)
    }

    async fn find_one(
        &self,
        collection: Collection,
        identity: &Identity,
    ) -> StoreResult<Option<StoredRecord>> {
        let records = self.scan(collection)?;
        Ok(identity.locate(&records).cloned())
    }
}
