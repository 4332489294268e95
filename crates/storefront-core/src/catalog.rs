//! Product catalog abstraction.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::product::Product;

/// Read-only source of the products offered by the storefront.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch the full product list, in catalog order.
    ///
    /// Fails with `DomainError::Catalog` when the source is unreachable,
    /// misconfigured, or answers with an unexpected shape.
    async fn fetch_products(&self) -> Result<Vec<Product>, DomainError>;
}
