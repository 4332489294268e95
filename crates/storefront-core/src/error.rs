//! Domain error types.

use thiserror::Error;

/// Failures raised while loading the remote product catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No catalog URL has been configured.
    #[error("catalog URL is not configured")]
    NotConfigured,

    /// The configured API key cannot be sent as an HTTP header.
    #[error("catalog API key is not a valid header value")]
    InvalidApiKey,

    /// The catalog could not be reached (DNS, TLS, connection, timeout).
    #[error("catalog is unreachable: {0}")]
    Unreachable(String),

    /// The catalog answered with a non-success HTTP status.
    #[error("catalog returned HTTP status {0}")]
    Status(u16),

    /// The catalog answered, but not with a product list.
    #[error("catalog response has an unexpected shape: {0}")]
    UnexpectedShape(String),
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The cart has not finished hydrating and holds no authoritative data.
    #[error("cart is not ready: hydration has not completed")]
    NotReady,

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// A persisted snapshot could not be decoded into a valid cart.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// The product catalog collaborator failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The durable storage collaborator failed.
    #[error("storage error: {0}")]
    Storage(String),
}
