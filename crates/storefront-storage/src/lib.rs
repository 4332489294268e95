//! Storefront Storage — durable key-value storage on SQLite.
//!
//! Implements `SnapshotStorage` so the cart survives process restarts.

pub mod schema;
pub mod sqlite_snapshot_storage;
