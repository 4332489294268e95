//! Storefront Catalog — the remote product catalog.
//!
//! Products live in a read-only JSON document hosted on jsonbin.io. This
//! crate fetches and unwraps it into `Product` records.

pub mod jsonbin;
