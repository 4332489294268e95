//! Integration tests for `JsonBinCatalog` against a local HTTP server.

use std::net::SocketAddr;

use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use storefront_catalog::jsonbin::JsonBinCatalog;
use storefront_core::catalog::ProductCatalog;
use storefront_core::error::{CatalogError, DomainError};

/// Serve `router` on an ephemeral port and return its address.
async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn bin_with_products() -> &'static str {
    r#"{
        "record": { "produtos": [
            { "id": 1, "nome": "Camiseta", "preco": 59.9, "imagem": "https://img.example/1.png" },
            { "id": 2, "nome": "Bone", "preco": 35.0, "imagem": "" }
        ] },
        "metadata": { "id": "bin", "private": true }
    }"#
}

#[tokio::test]
async fn test_fetch_products_returns_catalog_in_order() {
    let addr = serve(Router::new().route("/v3/b/bin/latest", get(bin_with_products))).await;
    let catalog = JsonBinCatalog::new(Some(format!("http://{addr}/v3/b/bin/latest")), None);

    let products = catalog.fetch_products().await.unwrap();

    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!((products[0].unit_price - 59.9).abs() < 1e-9);
}

#[tokio::test]
async fn test_fetch_products_sends_key_in_both_headers() {
    async fn require_key(headers: HeaderMap) -> Result<&'static str, StatusCode> {
        let master = headers.get("x-master-key").and_then(|v| v.to_str().ok());
        let access = headers.get("x-access-key").and_then(|v| v.to_str().ok());
        if master == Some("s3cret") && access == Some("s3cret") {
            Ok(r#"{ "produtos": [ { "id": 5, "nome": "Caneca", "preco": 19.9 } ] }"#)
        } else {
            Err(StatusCode::UNAUTHORIZED)
        }
    }
    let addr = serve(Router::new().route("/private", get(require_key))).await;
    let catalog = JsonBinCatalog::new(
        Some(format!("http://{addr}/private")),
        Some("s3cret".to_owned()),
    );

    let products = catalog.fetch_products().await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Caneca");
}

#[tokio::test]
async fn test_fetch_products_maps_error_status() {
    async fn unauthorized() -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
    let addr = serve(Router::new().route("/private", get(unauthorized))).await;
    let catalog = JsonBinCatalog::new(Some(format!("http://{addr}/private")), None);

    let result = catalog.fetch_products().await;

    match result.unwrap_err() {
        DomainError::Catalog(CatalogError::Status(status)) => assert_eq!(status, 401),
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_products_rejects_unexpected_shape() {
    async fn wrong_shape() -> &'static str {
        r#"{ "message": "Bin not found" }"#
    }
    let addr = serve(Router::new().route("/bin", get(wrong_shape))).await;
    let catalog = JsonBinCatalog::new(Some(format!("http://{addr}/bin")), None);

    let result = catalog.fetch_products().await;

    assert!(matches!(
        result,
        Err(DomainError::Catalog(CatalogError::UnexpectedShape(_)))
    ));
}

#[tokio::test]
async fn test_fetch_products_reports_unreachable_host() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let catalog = JsonBinCatalog::new(Some(format!("http://{addr}/bin")), None);

    let result = catalog.fetch_products().await;

    assert!(matches!(
        result,
        Err(DomainError::Catalog(CatalogError::Unreachable(_)))
    ));
}
