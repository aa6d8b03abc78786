//! Bookmark Store for Lokal Jobs.
//!
//! Durable mapping from job id to the JSON-serialized posting, backed by the
//! single `bookmarks` table. Nothing is cached here: every call reads or
//! writes the database at call time.

use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::database::Database;
use crate::types::errors::StoreError;
use crate::types::job::JobPosting;

/// Trait defining bookmark persistence operations.
#[async_trait]
pub trait BookmarkStoreTrait: Send + Sync {
    /// Ensures the storage and its table exist. Idempotent.
    async fn initialize(&self) -> Result<(), StoreError>;
    /// Upserts `job` under `job.id`, fully replacing any previous record.
    async fn put(&self, job: &JobPosting) -> Result<(), StoreError>;
    /// Deletes the record for `id`. Removing a missing id is not an error.
    async fn remove(&self, id: &str) -> Result<(), StoreError>;
    /// Reads the record for `id` from the database; a completed `put` or
    /// `remove` is always visible to a later call.
    async fn get(&self, id: &str) -> Result<Option<JobPosting>, StoreError>;
    /// Returns every bookmarked posting, in no particular order.
    async fn list(&self) -> Result<Vec<JobPosting>, StoreError>;
}

/// Bookmark store backed by the SQLite [`Database`].
///
/// Blocking `rusqlite` calls run on the tokio blocking pool.
#[derive(Clone)]
pub struct BookmarkStore {
    db: Arc<Database>,
}

impl BookmarkStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    async fn blocking<T, F>(&self, on_error: fn(String) -> StoreError, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            db.with_connection(|conn| Ok(f(conn)))
                .map_err(|e| on_error(e.to_string()))?
        })
        .await
        .map_err(|e| on_error(format!("storage task failed: {}", e)))?
    }
}

fn put_record(conn: &Connection, job: &JobPosting) -> Result<(), StoreError> {
    let data = serde_json::to_string(job).map_err(StoreError::write)?;
    conn.execute(
        "INSERT OR REPLACE INTO bookmarks (id, data) VALUES (?1, ?2)",
        params![job.id, data],
    )
    .map_err(StoreError::write)?;
    Ok(())
}

fn decode(id: &str, data: &str) -> Result<JobPosting, StoreError> {
    serde_json::from_str(data).map_err(|e| {
        tracing::warn!(id, error = %e, "stored bookmark is not a valid posting");
        StoreError::StorageReadError(format!("corrupt bookmark record '{}': {}", id, e))
    })
}

/// Reads all records. A single undecodable record fails the whole read.
fn list_records(conn: &Connection) -> Result<Vec<JobPosting>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT id, data FROM bookmarks")
        .map_err(StoreError::read)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
        .map_err(StoreError::read)?;

    let mut results = Vec::new();
    for row in rows {
        let (id, data) = row.map_err(StoreError::read)?;
        results.push(decode(&id, &data)?);
    }
    Ok(results)
}

#[async_trait]
impl BookmarkStoreTrait for BookmarkStore {
    async fn initialize(&self) -> Result<(), StoreError> {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || db.initialize())
            .await
            .map_err(|e| StoreError::write(format!("storage task failed: {}", e)))?
            .map_err(StoreError::write)
    }

    async fn put(&self, job: &JobPosting) -> Result<(), StoreError> {
        let job = job.clone();
        self.blocking(StoreError::StorageWriteError, move |conn| put_record(conn, &job))
            .await
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        self.blocking(StoreError::StorageWriteError, move |conn| {
            let affected = conn
                .execute("DELETE FROM bookmarks WHERE id = ?1", params![id])
                .map_err(StoreError::write)?;
            if affected == 0 {
                tracing::debug!(id = %id, "remove of absent bookmark ignored");
            }
            Ok(())
        })
        .await
    }

    async fn get(&self, id: &str) -> Result<Option<JobPosting>, StoreError> {
        let id = id.to_string();
        self.blocking(StoreError::StorageReadError, move |conn| {
            let data: Option<String> = conn
                .query_row("SELECT data FROM bookmarks WHERE id = ?1", params![id], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(StoreError::read)?;
            data.map(|d| decode(&id, &d)).transpose()
        })
        .await
    }

    async fn list(&self) -> Result<Vec<JobPosting>, StoreError> {
        self.blocking(StoreError::StorageReadError, list_records).await
    }
}
