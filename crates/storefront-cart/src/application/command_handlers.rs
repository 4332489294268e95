//! Command handlers for the cart context.
//!
//! Application-level entry points used by presentation collaborators: they
//! guard on readiness, apply the command through the store and hand back the
//! fresh view.

use chrono::{DateTime, Utc};
use serde::Serialize;
use storefront_core::clock::Clock;
use storefront_core::command::Command;
use storefront_core::error::DomainError;
use tracing::info;
use uuid::Uuid;

use crate::application::query_handlers::CartView;
use crate::application::store::CartStore;
use crate::domain::aggregates::{self, CartLineItem};
use crate::domain::commands::CartCommand;

/// Result of a successfully handled command.
#[derive(Debug, Clone, Serialize)]
pub struct CartCommandResult {
    /// Whether the command changed the cart.
    pub changed: bool,
    /// The cart after the command.
    pub cart: CartView,
}

/// Confirmation of a simulated checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    /// Locally generated order identifier.
    pub order_id: Uuid,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// The lines that were checked out.
    pub items: Vec<CartLineItem>,
    /// Sum of all quantities.
    pub item_count: u64,
    /// Amount charged.
    pub grand_total: f64,
}

/// Applies `command` to the cart.
///
/// Unknown ids are not an error: the command is a no-op and `changed` is
/// false.
///
/// # Errors
///
/// Returns `DomainError::NotReady` while the store is still hydrating and
/// `DomainError::Validation` if an added product has a negative or
/// non-finite price.
pub fn handle_command(
    command: &CartCommand,
    store: &CartStore,
) -> Result<CartCommandResult, DomainError> {
    if !store.is_ready() {
        return Err(DomainError::NotReady);
    }
    if let CartCommand::Add(product) = command {
        aggregates::validate_product(product)?;
    }
    let changed = store.dispatch(command);
    let snapshot = store.snapshot();
    info!(
        command_type = command.command_type(),
        product_id = command.product_id(),
        changed,
        revision = snapshot.revision,
        "handled cart command"
    );
    Ok(CartCommandResult {
        changed,
        cart: CartView::of(&snapshot.cart, snapshot.revision),
    })
}

/// Simulated checkout: empties the cart and returns a receipt for what it
/// held. No payment is taken and nothing leaves the device.
///
/// # Errors
///
/// Returns `DomainError::NotReady` while hydrating and
/// `DomainError::Validation` if the cart is empty.
pub fn handle_checkout(
    store: &CartStore,
    clock: &dyn Clock,
) -> Result<CheckoutReceipt, DomainError> {
    if !store.is_ready() {
        return Err(DomainError::NotReady);
    }
    let cart = store.take();
    if cart.is_empty() {
        return Err(DomainError::Validation(
            "cannot check out an empty cart".to_owned(),
        ));
    }

    let receipt = CheckoutReceipt {
        order_id: Uuid::now_v7(),
        placed_at: clock.now(),
        item_count: cart.item_count(),
        grand_total: cart.grand_total(),
        items: cart.into_items(),
    };
    info!(order_id = %receipt.order_id, item_count = receipt.item_count, "checked out cart");
    Ok(receipt)
}
