//! SQLite file holding the note store.

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::kv::SqliteKeyValueStore;
use crate::notes::NoteBook;

/// Notes are read and rewritten as one blob.
const MAX_CONNECTIONS: u32 = 2;

/// Migrated SQLite database for the key-value table.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database at `path`, creating the file and its directory if
    /// needed, and apply pending migrations.
    ///
    /// ```no_run
    /// use tapscan_storage::Database;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let db = Database::open("data/tapscan.db").await?;
    /// db.note_book().add("Top up transit card").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| {
                StorageError::Configuration(format!("cannot create {}: {}", dir.display(), e))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        debug!(path = %path.display(), "Note database opened");
        Self::migrated(pool).await
    }

    /// Private database that lives as long as this handle.
    pub async fn in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        // Each :memory: connection is its own database; keep exactly one alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::migrated(pool).await
    }

    async fn migrated(pool: SqlitePool) -> StorageResult<Self> {
        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Apply the workspace `migrations/`. Already-applied ones are skipped.
    pub async fn migrate(&self) -> StorageResult<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn key_value_store(&self) -> SqliteKeyValueStore {
        SqliteKeyValueStore::new(self.pool.clone())
    }

    pub fn note_book(&self) -> NoteBook<SqliteKeyValueStore> {
        NoteBook::new(self.key_value_store())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("notes.db");

        let db = Database::open(&path).await.unwrap();

        assert!(path.exists());
        assert!(db.note_book().list().await.unwrap().is_empty());
        db.close().await;
    }

    #[tokio::test]
    async fn test_in_memory_keeps_data_between_calls() {
        let db = Database::in_memory().await.unwrap();

        db.note_book().add("kept").await.unwrap();

        assert_eq!(db.note_book().list().await.unwrap().len(), 1);
    }
}
