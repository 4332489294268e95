//! Test catalogs — canned `ProductCatalog` implementations for tests.

use async_trait::async_trait;
use storefront_core::catalog::ProductCatalog;
use storefront_core::error::{CatalogError, DomainError};
use storefront_core::product::Product;

/// A catalog that always returns the same products.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    /// Create a catalog serving `products` in the given order.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl ProductCatalog for StaticCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.products.clone())
    }
}

/// A catalog that is never reachable. Useful for testing error-handling
/// paths.
#[derive(Debug)]
pub struct FailingCatalog;

#[async_trait]
impl ProductCatalog for FailingCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>, DomainError> {
        Err(CatalogError::Unreachable("connection refused".into()).into())
    }
}
