//! Observable cart store.
//!
//! The store is the single mutation entry point for the cart. Every
//! transition runs synchronously inside the watch channel's modify hook, so
//! observers only ever see whole states, and only states that changed.

use std::sync::Arc;

use serde::Serialize;
use storefront_core::command::Command;
use storefront_core::product::{Product, ProductId};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::domain::aggregates::{Cart, CartLineItem};
use crate::domain::commands::CartCommand;

/// Where the store is in its startup lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartLifecycle {
    /// The saved snapshot has not been loaded yet. The cart contents are not
    /// authoritative and must not be rendered.
    Hydrating,
    /// Hydration finished (or was given up on); the cart is authoritative.
    Ready,
}

/// The value observers receive on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    /// Startup lifecycle.
    pub lifecycle: CartLifecycle,
    /// Current cart contents.
    pub cart: Cart,
    /// Bumped on every effective change; orders persisted snapshots.
    pub revision: u64,
}

impl CartSnapshot {
    fn hydrating() -> Self {
        Self {
            lifecycle: CartLifecycle::Hydrating,
            cart: Cart::new(),
            revision: 0,
        }
    }

    /// Whether hydration has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.lifecycle == CartLifecycle::Ready
    }
}

/// Shared handle to the process-wide cart.
///
/// Clones refer to the same cart.
#[derive(Debug, Clone)]
pub struct CartStore {
    sender: Arc<watch::Sender<CartSnapshot>>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Creates an empty store in the `Hydrating` state.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(CartSnapshot::hydrating());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Applies `command` and notifies observers if the cart changed.
    ///
    /// Returns whether the cart changed.
    #[instrument(
        skip(self, command),
        fields(command_type = command.command_type(), product_id = command.product_id())
    )]
    pub fn dispatch(&self, command: &CartCommand) -> bool {
        let changed = self.sender.send_if_modified(|snapshot| {
            if snapshot.cart.apply(command) {
                snapshot.revision += 1;
                true
            } else {
                false
            }
        });
        debug!(changed, "applied cart command");
        changed
    }

    /// Adds one unit of `product`.
    pub fn add(&self, product: Product) -> bool {
        self.dispatch(&CartCommand::Add(product))
    }

    /// Raises the quantity of `id` by one.
    pub fn increment(&self, id: ProductId) -> bool {
        self.dispatch(&CartCommand::Increment(id))
    }

    /// Lowers the quantity of `id` by one, never below one.
    pub fn decrement(&self, id: ProductId) -> bool {
        self.dispatch(&CartCommand::Decrement(id))
    }

    /// Deletes the line for `id`.
    pub fn remove(&self, id: ProductId) -> bool {
        self.dispatch(&CartCommand::Remove(id))
    }

    /// Empties the cart.
    pub fn clear(&self) -> bool {
        self.dispatch(&CartCommand::Clear)
    }

    /// Atomically empties the cart and returns what it held.
    pub fn take(&self) -> Cart {
        let mut taken = Cart::new();
        self.sender.send_if_modified(|snapshot| {
            if snapshot.cart.is_empty() {
                return false;
            }
            taken = std::mem::take(&mut snapshot.cart);
            snapshot.revision += 1;
            true
        });
        taken
    }

    /// Replaces the cart with the hydrated one and marks the store ready.
    ///
    /// Anything dispatched while hydrating is discarded. Returns the revision
    /// at which the store became ready. Calling this again once ready is
    /// ignored.
    pub fn complete_hydration(&self, cart: Cart) -> u64 {
        let mut cart = Some(cart);
        let mut ready_revision = 0;
        self.sender.send_if_modified(|snapshot| {
            // Read under the lock: a dispatch may land as soon as it is released.
            if !snapshot.is_ready() {
                snapshot.cart = cart.take().unwrap_or_default();
                snapshot.lifecycle = CartLifecycle::Ready;
                snapshot.revision += 1;
            }
            ready_revision = snapshot.revision;
            cart.is_none()
        });
        if cart.is_some() {
            warn!("cart hydration completed twice; ignoring the second snapshot");
        }
        ready_revision
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.sender.borrow().clone()
    }

    /// Current line items, in cart order.
    #[must_use]
    pub fn items(&self) -> Vec<CartLineItem> {
        self.sender.borrow().cart.items().to_vec()
    }

    /// Grand total of the current cart.
    #[must_use]
    pub fn grand_total(&self) -> f64 {
        self.sender.borrow().cart.grand_total()
    }

    #[must_use]
    pub fn lifecycle(&self) -> CartLifecycle {
        self.sender.borrow().lifecycle
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.sender.borrow().is_ready()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.sender.borrow().revision
    }

    /// Receiver notified after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.sender.subscribe()
    }

    /// Resolves once hydration has completed.
    pub async fn wait_until_ready(&self) {
        let mut receiver = self.subscribe();
        // The sender lives as long as `self`, so this cannot observe a close.
        let _ = receiver.wait_for(CartSnapshot::is_ready).await;
    }
}
