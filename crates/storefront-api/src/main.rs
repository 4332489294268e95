//! Storefront API server entry point.

use std::sync::Arc;

use storefront_api::config::AppConfig;
use storefront_api::error::AppError;
use storefront_api::state::AppState;
use storefront_cart::application::persistence;
use storefront_cart::application::store::CartStore;
use storefront_catalog::jsonbin::JsonBinCatalog;
use storefront_core::clock::{Clock, SystemClock};
use storefront_core::storage::SnapshotStorage;
use storefront_storage::sqlite_snapshot_storage::SqliteSnapshotStorage;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting storefront API server");

    let config = AppConfig::from_env()?;
    let addr = config.bind_addr()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let storage: Arc<dyn SnapshotStorage> =
        Arc::new(SqliteSnapshotStorage::connect(&config.database_url, Arc::clone(&clock)).await?);
    if config.catalog_url.is_none() {
        tracing::warn!("CATALOG_URL is not set; product listing will fail");
    }
    let catalog = Arc::new(JsonBinCatalog::new(
        config.catalog_url.clone(),
        config.catalog_api_key.clone(),
    ));

    // Hydrate in the background; cart routes answer 503 until it finishes.
    let cart = CartStore::new();
    let settings = config.persistence_settings();
    let bootstrap = {
        let cart = cart.clone();
        tokio::spawn(async move { persistence::bootstrap(&cart, storage, &settings).await })
    };

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = storefront_api::app(AppState::new(cart, catalog, clock))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match bootstrap.await {
        Ok((_, persister)) => persister.shutdown().await,
        Err(err) => tracing::warn!(error = %err, "cart bootstrap did not finish"),
    }
    tracing::info!("Storefront API server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
