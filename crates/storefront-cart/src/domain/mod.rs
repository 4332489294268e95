//! Domain layer: the cart value, its line items and commands.

pub mod aggregates;
pub mod commands;
