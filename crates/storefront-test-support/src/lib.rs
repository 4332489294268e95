//! Shared test mocks and utilities for the storefront client.

mod catalog;
mod clock;
mod storage;

pub use catalog::{FailingCatalog, StaticCatalog};
pub use clock::{FixedClock, SteppingClock};
pub use storage::{FailingStorage, InMemoryStorage, StallingStorage};
