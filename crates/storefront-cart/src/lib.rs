//! Storefront — shopping cart bounded context.
//!
//! Owns the cart line items and their transitions (`domain`), the observable
//! store that serializes every mutation, and the bridge that hydrates the
//! store at startup and persists it after each change (`application`).

pub mod application;
pub mod domain;
