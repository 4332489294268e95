//! Routes for the product catalog.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use storefront_cart::application::query_handlers;
use storefront_core::product::Product;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// A catalog product and how many of it are in the cart.
#[derive(Debug, Serialize)]
pub struct ProductListing {
    /// The catalog record.
    #[serde(flatten)]
    pub product: Product,
    /// Units in the cart; absent while the cart is hydrating.
    pub in_cart: Option<u32>,
}

/// Response body for GET /.
#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    /// Products in catalog order.
    pub products: Vec<ProductListing>,
}

/// GET /
#[instrument(skip(state))]
async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let products = state.catalog.fetch_products().await?;
    info!(count = products.len(), "listing products");

    let products = products
        .into_iter()
        .map(|product| ProductListing {
            in_cart: query_handlers::get_quantity(&state.cart, product.id).ok(),
            product,
        })
        .collect();

    Ok(Json(ProductsResponse { products }))
}

/// Returns the router for the product catalog.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_products))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use serde_json::Value;
    use storefront_cart::application::store::CartStore;
    use storefront_cart::domain::aggregates::Cart;
    use storefront_core::catalog::ProductCatalog;
    use storefront_test_support::{FailingCatalog, FixedClock, StaticCatalog};
    use tower::ServiceExt;

    fn app_state_with(cart: CartStore, catalog: Arc<dyn ProductCatalog>) -> AppState {
        AppState::new(cart, catalog, Arc::new(FixedClock(Utc::now())))
    }

    fn catalog() -> Arc<dyn ProductCatalog> {
        Arc::new(StaticCatalog::new(vec![
            Product::new(1, "Widget", 9.9),
            Product::new(2, "Gadget", 5.0).with_image_url("https://img.example/g.png"),
        ]))
    }

    async fn get_products(state: AppState) -> (StatusCode, Value) {
        let app = router().with_state(state);
        let request = Request::builder()
            .method("GET")
            .uri("/")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    #[tokio::test]
    async fn test_list_products_includes_cart_quantities() {
        // Arrange
        let cart = CartStore::new();
        cart.complete_hydration(Cart::new());
        cart.add(Product::new(2, "Gadget", 5.0));
        cart.increment(2);

        // Act
        let (status, json) = get_products(app_state_with(cart, catalog())).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        let products = json["products"].as_array().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0]["id"], 1);
        assert_eq!(products[0]["name"], "Widget");
        assert_eq!(products[0]["in_cart"], 0);
        assert_eq!(products[1]["in_cart"], 2);
        assert_eq!(products[1]["image_url"], "https://img.example/g.png");
    }

    #[tokio::test]
    async fn test_list_products_omits_quantities_while_hydrating() {
        // Arrange
        let state = app_state_with(CartStore::new(), catalog());

        // Act
        let (status, json) = get_products(state).await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert!(json["products"][0]["in_cart"].is_null());
    }

    #[tokio::test]
    async fn test_list_products_returns_502_when_catalog_fails() {
        // Arrange
        let state = app_state_with(CartStore::new(), Arc::new(FailingCatalog));

        // Act
        let (status, json) = get_products(state).await;

        // Assert
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"], "catalog_error");
        assert_eq!(json["retryable"], true);
    }
}
