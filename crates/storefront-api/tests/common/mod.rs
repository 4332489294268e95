//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use storefront_cart::application::persistence::{self, HydrationOutcome, PersistenceSettings, Persister};
use storefront_cart::application::store::CartStore;
use storefront_core::catalog::ProductCatalog;
use storefront_core::clock::Clock;
use storefront_core::product::Product;
use storefront_core::storage::SnapshotStorage;
use storefront_test_support::{FixedClock, StaticCatalog};
use tower::ServiceExt;

use storefront_api::state::AppState;

/// A booted application: router plus the handles a process would own.
pub struct TestApp {
    pub router: Router,
    pub cart: CartStore,
    pub outcome: HydrationOutcome,
    pub persister: Persister,
}

/// Fixed timestamp used across all integration tests.
pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Products served by the default test catalog.
pub fn sample_products() -> Vec<Product> {
    vec![
        Product::new(1, "Widget", 9.9),
        Product::new(2, "Gadget", 5.0).with_image_url("https://img.example/gadget.png"),
    ]
}

/// Build the full app router over `storage`, hydrate the cart and start
/// persisting it, the same way `main.rs` does.
pub async fn boot(storage: Arc<dyn SnapshotStorage>) -> TestApp {
    boot_with_catalog(storage, Arc::new(StaticCatalog::new(sample_products()))).await
}

/// Like [`boot`], with a custom catalog.
pub async fn boot_with_catalog(
    storage: Arc<dyn SnapshotStorage>,
    catalog: Arc<dyn ProductCatalog>,
) -> TestApp {
    let cart = CartStore::new();
    let (outcome, persister) =
        persistence::bootstrap(&cart, storage, &PersistenceSettings::default()).await;
    let router = storefront_api::app(AppState::new(cart.clone(), catalog, fixed_clock()));

    TestApp {
        router,
        cart,
        outcome,
        persister,
    }
}

/// Build the router around a cart that never finishes hydrating.
pub fn build_hydrating_app() -> (Router, CartStore) {
    let cart = CartStore::new();
    let router = storefront_api::app(AppState::new(
        cart.clone(),
        Arc::new(StaticCatalog::new(sample_products())),
        fixed_clock(),
    ));
    (router, cart)
}

/// JSON body for POST /api/v1/cart/add.
pub fn product_json(id: i64, name: &str, price: f64) -> serde_json::Value {
    serde_json::json!({ "id": id, "name": name, "unit_price": price, "image_url": null })
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
