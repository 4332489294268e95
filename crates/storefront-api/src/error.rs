//! Storefront — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storefront_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Durable storage could not be opened.
    #[error("storage error: {0}")]
    Storage(#[from] DomainError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Whether repeating the request may succeed.
    pub retryable: bool,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, retryable) = match &self.0 {
            DomainError::NotReady => (StatusCode::SERVICE_UNAVAILABLE, "cart_not_ready", true),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error", false),
            DomainError::Catalog(_) => (StatusCode::BAD_GATEWAY, "catalog_error", true),
            DomainError::MalformedSnapshot(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "snapshot_error", false)
            }
            DomainError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", false),
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
            retryable,
        };

        (status, Json(body)).into_response()
    }
}
