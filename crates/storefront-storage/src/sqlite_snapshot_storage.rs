//! `SQLite` implementation of the `SnapshotStorage` trait.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::debug;

use storefront_core::clock::Clock;
use storefront_core::error::DomainError;
use storefront_core::storage::SnapshotStorage;

use crate::schema::CREATE_KV_TABLE;

fn storage_error(err: sqlx::Error) -> DomainError {
    DomainError::Storage(err.to_string())
}

/// SQLite-backed snapshot storage. One row per key; writes are upserts.
#[derive(Clone)]
pub struct SqliteSnapshotStorage {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for SqliteSnapshotStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteSnapshotStorage")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl SqliteSnapshotStorage {
    /// Creates a storage over an existing pool. Call
    /// [`ensure_schema`](Self::ensure_schema) before first use.
    #[must_use]
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Opens (creating if missing) the database at `url` and ensures the
    /// schema exists.
    ///
    /// A single connection is used so writes are applied in the order they
    /// are issued; it is never recycled, which also keeps `sqlite::memory:`
    /// databases alive.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the URL is invalid or the database
    /// cannot be opened.
    pub async fn connect(url: &str, clock: Arc<dyn Clock>) -> Result<Self, DomainError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(storage_error)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(storage_error)?;

        let storage = Self::new(pool, clock);
        storage.ensure_schema().await?;
        Ok(storage)
    }

    /// Creates the key-value table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Storage` if the statement fails.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(CREATE_KV_TABLE)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    /// The underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SnapshotStorage for SqliteSnapshotStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, DomainError> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        debug!(key, found = value.is_some(), "read snapshot");
        Ok(value)
    }

    async fn write(&self, key: &str, blob: &str) -> Result<(), DomainError> {
        sqlx::query(
            r"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (key) DO UPDATE
                SET value = excluded.value,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(blob)
        .bind(self.clock.now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;
        debug!(key, bytes = blob.len(), "wrote snapshot");
        Ok(())
    }
}
