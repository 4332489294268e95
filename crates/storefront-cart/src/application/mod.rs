//! Application layer: the observable store, persistence and handlers.

pub mod command_handlers;
pub mod persistence;
pub mod query_handlers;
pub mod store;
