//! Shared application state.

use std::sync::Arc;

use storefront_cart::application::store::CartStore;
use storefront_core::catalog::ProductCatalog;
use storefront_core::clock::Clock;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide cart.
    pub cart: CartStore,
    /// Remote product catalog.
    pub catalog: Arc<dyn ProductCatalog>,
    /// Clock used to stamp checkout receipts.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(cart: CartStore, catalog: Arc<dyn ProductCatalog>, clock: Arc<dyn Clock>) -> Self {
        Self {
            cart,
            catalog,
            clock,
        }
    }
}
