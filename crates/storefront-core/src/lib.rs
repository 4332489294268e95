//! Storefront Core — shared domain abstractions.
//!
//! This crate defines the product model, the collaborator traits (catalog and
//! durable storage) and the error types that every other crate depends on.
//! It contains no infrastructure code.

pub mod catalog;
pub mod clock;
pub mod command;
pub mod error;
pub mod product;
pub mod storage;
