//! Product records delivered by the remote catalog.

use serde::{Deserialize, Serialize};

/// Stable catalog key of a product.
pub type ProductId = i64;

/// A read-only catalog product.
///
/// The catalog publishes its records with Portuguese field names (`nome`,
/// `preco`, `imagem`); both those and the English names deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique catalog identifier.
    pub id: ProductId,
    /// Display name.
    #[serde(alias = "nome")]
    pub name: String,
    /// Price of a single unit.
    #[serde(alias = "preco")]
    pub unit_price: f64,
    /// Product image, when the catalog has one.
    #[serde(default, alias = "imagem")]
    pub image_url: Option<String>,
}

impl Product {
    /// Creates a product without an image.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            image_url: None,
        }
    }

    /// Sets the image URL.
    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}
