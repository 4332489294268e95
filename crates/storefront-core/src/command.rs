//! Naming for requested state transitions.

use crate::product::ProductId;

/// A request to change storefront state, described for structured logs.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted name such as `cart.add`.
    fn command_type(&self) -> &'static str;

    /// The product the command targets, if it targets one.
    fn product_id(&self) -> Option<ProductId>;
}
