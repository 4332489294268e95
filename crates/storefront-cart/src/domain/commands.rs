//! Commands for the cart context.

use storefront_core::command::Command;
use storefront_core::product::{Product, ProductId};

/// A state transition requested by a presentation collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum CartCommand {
    /// Put one more unit of the product in the cart.
    Add(Product),
    /// Raise the quantity of a line by one.
    Increment(ProductId),
    /// Lower the quantity of a line by one, never below one.
    Decrement(ProductId),
    /// Delete a line entirely.
    Remove(ProductId),
    /// Empty the cart.
    Clear,
}

impl Command for CartCommand {
    fn command_type(&self) -> &'static str {
        match self {
            Self::Add(_) => "cart.add",
            Self::Increment(_) => "cart.increment",
            Self::Decrement(_) => "cart.decrement",
            Self::Remove(_) => "cart.remove",
            Self::Clear => "cart.clear",
        }
    }

    fn product_id(&self) -> Option<ProductId> {
        match self {
            Self::Add(product) => Some(product.id),
            Self::Increment(id) | Self::Decrement(id) | Self::Remove(id) => Some(*id),
            Self::Clear => None,
        }
    }
}
