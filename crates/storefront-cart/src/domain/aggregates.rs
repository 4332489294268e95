//! The cart state value and its transitions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use storefront_core::error::DomainError;
use storefront_core::product::{Product, ProductId};

use super::commands::CartCommand;

/// A product together with the quantity currently in the cart.
///
/// Older snapshots used the catalog's Portuguese field names; those still
/// deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Catalog identifier of the product.
    pub id: ProductId,
    /// Display name.
    #[serde(alias = "nome")]
    pub name: String,
    /// Price of a single unit.
    #[serde(alias = "preco")]
    pub unit_price: f64,
    /// Product image, if any.
    #[serde(default, alias = "imagem")]
    pub image_url: Option<String>,
    /// Units in the cart; never below 1.
    #[serde(alias = "quantidade")]
    pub quantity: u32,
}

impl CartLineItem {
    /// Creates a line item holding a single unit of `product`.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            unit_price: product.unit_price,
            image_url: product.image_url.clone(),
            quantity: 1,
        }
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }

    /// Whether `decrement` would change this line.
    #[must_use]
    pub fn can_decrement(&self) -> bool {
        self.quantity > 1
    }
}

fn is_valid_unit_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

/// Checks that `product` can be put in a cart.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the unit price is negative or not
/// finite.
pub fn validate_product(product: &Product) -> Result<(), DomainError> {
    if is_valid_unit_price(product.unit_price) {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "product {} has invalid unit price {}",
            product.id, product.unit_price
        )))
    }
}

/// The cart: line items in insertion order, unique by product id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from previously persisted line items, verbatim.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MalformedSnapshot` if two items share an id, a
    /// quantity is zero, or a unit price is negative or not finite.
    pub fn from_items(items: Vec<CartLineItem>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(DomainError::MalformedSnapshot(format!(
                    "duplicate line item for product {}",
                    item.id
                )));
            }
            if item.quantity == 0 {
                return Err(DomainError::MalformedSnapshot(format!(
                    "line item for product {} has quantity 0",
                    item.id
                )));
            }
            if !is_valid_unit_price(item.unit_price) {
                return Err(DomainError::MalformedSnapshot(format!(
                    "line item for product {} has invalid unit price {}",
                    item.id, item.unit_price
                )));
            }
        }
        Ok(Self { items })
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Consumes the cart, returning its line items.
    #[must_use]
    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Quantity of `id` in the cart, 0 when absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.find(id).map_or(0, |item| item.quantity)
    }

    /// Sum of line subtotals, recomputed on every call.
    #[must_use]
    pub fn grand_total(&self) -> f64 {
        self.items.iter().map(CartLineItem::subtotal).sum()
    }

    /// Applies `command`, returning whether the cart changed.
    pub fn apply(&mut self, command: &CartCommand) -> bool {
        match command {
            CartCommand::Add(product) => self.add(product),
            CartCommand::Increment(id) => self.increment(*id),
            CartCommand::Decrement(id) => self.decrement(*id),
            CartCommand::Remove(id) => self.remove(*id),
            CartCommand::Clear => self.clear(),
        }
    }

    /// Adds one unit of `product`: bumps the existing line in place, or
    /// appends a new line at the end.
    ///
    /// A product whose price [`validate_product`] rejects is ignored, so the
    /// cart never holds a line that could not be restored from a snapshot.
    pub fn add(&mut self, product: &Product) -> bool {
        if !is_valid_unit_price(product.unit_price) {
            return false;
        }
        if let Some(item) = self.find_mut(product.id) {
            return bump(item);
        }
        self.items.push(CartLineItem::from_product(product));
        true
    }

    /// Adds one unit to the line for `id`. No-op if absent.
    pub fn increment(&mut self, id: ProductId) -> bool {
        self.find_mut(id).is_some_and(bump)
    }

    /// Removes one unit from the line for `id` while it holds more than one.
    /// A single-unit line is left as is; use [`Cart::remove`] to delete it.
    pub fn decrement(&mut self, id: ProductId) -> bool {
        match self.find_mut(id) {
            Some(item) if item.can_decrement() => {
                item.quantity -= 1;
                true
            }
            _ => false,
        }
    }

    /// Deletes the line for `id` regardless of its quantity.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Empties the cart.
    pub fn clear(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        changed
    }

    fn find(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn find_mut(&mut self, id: ProductId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }
}

// Saturates at u32::MAX rather than wrapping.
fn bump(item: &mut CartLineItem) -> bool {
    match item.quantity.checked_add(1) {
        Some(next) => {
            item.quantity = next;
            true
        }
        None => false,
    }
}
