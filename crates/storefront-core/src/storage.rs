//! Durable key-value storage abstraction.

use async_trait::async_trait;

use crate::error::DomainError;

/// Single-slot-per-key durable storage for serialized snapshots.
///
/// A `write` replaces whatever was previously stored under the key.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Read the blob stored under `key`, or `None` if nothing was written yet.
    async fn read(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Store `blob` under `key`, overwriting any prior value.
    async fn write(&self, key: &str, blob: &str) -> Result<(), DomainError>;
}
