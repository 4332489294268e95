//! Test storages — mock `SnapshotStorage` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use storefront_core::error::DomainError;
use storefront_core::storage::SnapshotStorage;

/// A storage that keeps values in memory and records every write.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    values: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
    reads: AtomicUsize,
}

impl InMemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage that already holds `blob` under `key`. The seed does
    /// not count as a write.
    #[must_use]
    pub fn with_entry(key: &str, blob: &str) -> Self {
        let storage = Self::new();
        storage
            .values
            .lock()
            .unwrap()
            .insert(key.to_owned(), blob.to_owned());
        storage
    }

    /// Returns the value currently stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Returns a snapshot of all writes, in the order they happened.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }

    /// Number of `read` calls so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotStorage for InMemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn write(&self, key: &str, blob: &str) -> Result<(), DomainError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_owned(), blob.to_owned());
        self.writes
            .lock()
            .unwrap()
            .push((key.to_owned(), blob.to_owned()));
        Ok(())
    }
}

/// A storage whose reads and writes always fail. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingStorage;

#[async_trait]
impl SnapshotStorage for FailingStorage {
    async fn read(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Err(DomainError::Storage("disk unavailable".into()))
    }

    async fn write(&self, _key: &str, _blob: &str) -> Result<(), DomainError> {
        Err(DomainError::Storage("disk unavailable".into()))
    }
}

/// A storage whose reads never complete and whose writes are discarded.
/// Useful for testing hydration timeouts.
#[derive(Debug)]
pub struct StallingStorage;

#[async_trait]
impl SnapshotStorage for StallingStorage {
    async fn read(&self, _key: &str) -> Result<Option<String>, DomainError> {
        std::future::pending().await
    }

    async fn write(&self, _key: &str, _blob: &str) -> Result<(), DomainError> {
        Ok(())
    }
}
