//! Query handlers for the cart context.
//!
//! Read-only views over the store's current snapshot, with the derived
//! values presentation needs precomputed.

use serde::Serialize;
use storefront_core::error::DomainError;
use storefront_core::product::ProductId;

use crate::application::store::CartStore;
use crate::domain::aggregates::{Cart, CartLineItem};

/// Read-only view of a single line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLineView {
    /// Catalog identifier of the product.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Price of a single unit.
    pub unit_price: f64,
    /// Product image, if any.
    pub image_url: Option<String>,
    /// Units in the cart.
    pub quantity: u32,
    /// `unit_price * quantity`.
    pub subtotal: f64,
    /// Whether a decrement would change the line.
    pub can_decrement: bool,
}

impl From<&CartLineItem> for CartLineView {
    fn from(item: &CartLineItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            unit_price: item.unit_price,
            image_url: item.image_url.clone(),
            quantity: item.quantity,
            subtotal: item.subtotal(),
            can_decrement: item.can_decrement(),
        }
    }
}

/// Read-only view of the whole cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    /// Lines in cart order.
    pub items: Vec<CartLineView>,
    /// Sum of all quantities.
    pub item_count: u64,
    /// Sum of all line subtotals.
    pub grand_total: f64,
    /// Store revision the view was taken at.
    pub revision: u64,
}

impl CartView {
    /// Builds a view of `cart` as of `revision`.
    #[must_use]
    pub fn of(cart: &Cart, revision: u64) -> Self {
        Self {
            items: cart.items().iter().map(CartLineView::from).collect(),
            item_count: cart.item_count(),
            grand_total: cart.grand_total(),
            revision,
        }
    }
}

/// Returns the current cart.
///
/// # Errors
///
/// Returns `DomainError::NotReady` while the store is still hydrating.
pub fn get_cart(store: &CartStore) -> Result<CartView, DomainError> {
    let snapshot = store.snapshot();
    if !snapshot.is_ready() {
        return Err(DomainError::NotReady);
    }
    Ok(CartView::of(&snapshot.cart, snapshot.revision))
}

/// Returns how many units of `id` are in the cart (0 when absent).
///
/// # Errors
///
/// Returns `DomainError::NotReady` while the store is still hydrating.
pub fn get_quantity(store: &CartStore, id: ProductId) -> Result<u32, DomainError> {
    let snapshot = store.snapshot();
    if !snapshot.is_ready() {
        return Err(DomainError::NotReady);
    }
    Ok(snapshot.cart.quantity_of(id))
}
