//! jsonbin.io implementation of the `ProductCatalog` trait.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use storefront_core::catalog::ProductCatalog;
use storefront_core::error::{CatalogError, DomainError};
use storefront_core::product::Product;

/// Header carrying a bin's master key.
pub const MASTER_KEY_HEADER: &str = "X-Master-Key";
/// Header carrying a bin's access key.
pub const ACCESS_KEY_HEADER: &str = "X-Access-Key";

/// Body of a bin read. The product list may be wrapped in `record` (v3
/// API) or sit at the top level.
#[derive(Debug, Deserialize)]
struct JsonBinResponse {
    record: Option<ProductList>,
    #[serde(alias = "produtos")]
    products: Option<Vec<Product>>,
}

#[derive(Debug, Deserialize)]
struct ProductList {
    #[serde(alias = "produtos")]
    products: Option<Vec<Product>>,
}

/// Unwraps the product list from a bin body.
///
/// # Errors
///
/// Returns `CatalogError::UnexpectedShape` if the body is not JSON or holds
/// no product list.
pub fn parse_products(body: &[u8]) -> Result<Vec<Product>, CatalogError> {
    let response: JsonBinResponse = serde_json::from_slice(body)
        .map_err(|e| CatalogError::UnexpectedShape(e.to_string()))?;

    response
        .record
        .and_then(|record| record.products)
        .or(response.products)
        .ok_or_else(|| CatalogError::UnexpectedShape("no product list in response".to_owned()))
}

/// Catalog backed by a jsonbin.io bin.
///
/// The API key is sent in both key headers so master and access keys work
/// alike; never log it.
#[derive(Debug, Clone)]
pub struct JsonBinCatalog {
    http: reqwest::Client,
    url: Option<String>,
    api_key: Option<String>,
}

impl JsonBinCatalog {
    /// Creates a catalog reading from `url`, e.g.
    /// `https://api.jsonbin.io/v3/b/<BIN_ID>/latest`.
    ///
    /// A missing URL is reported on every fetch rather than here, so the
    /// application can start and show the error.
    #[must_use]
    pub fn new(url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.filter(|url| !url.trim().is_empty()),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    fn headers(&self) -> Result<HeaderMap, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| CatalogError::InvalidApiKey)?;
            headers.insert(MASTER_KEY_HEADER, value.clone());
            headers.insert(ACCESS_KEY_HEADER, value);
        }
        Ok(headers)
    }

    async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
        let url = self.url.as_deref().ok_or(CatalogError::NotConfigured)?;

        let response = self
            .http
            .get(url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| CatalogError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Unreachable(e.to_string()))?;
        parse_products(&body)
    }
}

#[async_trait]
impl ProductCatalog for JsonBinCatalog {
    #[instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<Product>, DomainError> {
        match self.fetch().await {
            Ok(products) => {
                debug!(count = products.len(), "fetched products");
                Ok(products)
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch products");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_products_reads_record_wrapper() {
        let body = br#"{
            "record": { "produtos": [
                { "id": 1, "nome": "Camiseta", "preco": 59.9, "imagem": "https://img.example/1.png" },
                { "id": 2, "nome": "Bone", "preco": 35.0 }
            ] },
            "metadata": { "id": "abc", "private": false }
        }"#;

        let products = parse_products(body).unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Camiseta");
        assert_eq!(products[1].id, 2);
        assert!(products[1].image_url.is_none());
    }

    #[test]
    fn test_parse_products_reads_top_level_list() {
        let body = br#"{ "produtos": [ { "id": 9, "nome": "Mochila", "preco": 120.0 } ] }"#;

        let products = parse_products(body).unwrap();

        assert_eq!(products, vec![Product::new(9, "Mochila", 120.0)]);
    }

    #[test]
    fn test_parse_products_accepts_english_names() {
        let body = br#"{ "products": [ { "id": 3, "name": "Lamp", "unit_price": 30.0 } ] }"#;

        let products = parse_products(body).unwrap();

        assert_eq!(products, vec![Product::new(3, "Lamp", 30.0)]);
    }

    #[test]
    fn test_parse_products_rejects_missing_list() {
        let body = br#"{ "record": { "items": [] } }"#;

        let result = parse_products(body);

        assert!(matches!(result, Err(CatalogError::UnexpectedShape(_))));
    }

    #[test]
    fn test_parse_products_rejects_malformed_records() {
        let body = br#"{ "produtos": [ { "id": "one", "nome": "Bad" } ] }"#;

        let result = parse_products(body);

        assert!(matches!(result, Err(CatalogError::UnexpectedShape(_))));
    }

    #[test]
    fn test_parse_products_rejects_non_json() {
        let result = parse_products(b"<html>502 Bad Gateway</html>");

        assert!(matches!(result, Err(CatalogError::UnexpectedShape(_))));
    }

    #[tokio::test]
    async fn test_fetch_without_url_is_not_configured() {
        let catalog = JsonBinCatalog::new(None, Some("key".to_owned()));

        let result = catalog.fetch_products().await;

        assert!(matches!(
            result,
            Err(DomainError::Catalog(CatalogError::NotConfigured))
        ));
    }

    #[tokio::test]
    async fn test_blank_url_is_not_configured() {
        let catalog = JsonBinCatalog::new(Some("   ".to_owned()), None);

        let result = catalog.fetch_products().await;

        assert!(matches!(
            result,
            Err(DomainError::Catalog(CatalogError::NotConfigured))
        ));
    }

    #[tokio::test]
    async fn test_api_key_with_control_characters_is_misconfiguration() {
        let catalog = JsonBinCatalog::new(
            Some("http://127.0.0.1:9/bin".to_owned()),
            Some("bad\nkey".to_owned()),
        );

        let result = catalog.fetch_products().await;

        assert!(matches!(
            result,
            Err(DomainError::Catalog(CatalogError::InvalidApiKey))
        ));
    }
}
