//! Storefront API — HTTP surface for presentation collaborators.

use axum::Router;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

/// Builds the full application router.
pub fn app(app_state: state::AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/products", routes::products::router())
        .nest("/api/v1/cart", routes::cart::router())
        .with_state(app_state)
}
