//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use storefront_cart::application::persistence::{
    CART_STORAGE_KEY, DEFAULT_HYDRATION_TIMEOUT, PersistenceSettings,
};

use crate::error::AppError;

/// Settings for the API server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// `SQLite` database holding the cart snapshot.
    pub database_url: String,
    /// jsonbin.io bin URL; fetches fail until it is set.
    pub catalog_url: Option<String>,
    /// jsonbin.io master or access key, for private bins.
    pub catalog_api_key: Option<String>,
    /// Upper bound on the startup snapshot read.
    pub hydration_timeout: Duration,
}

impl AppConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://storefront.db".to_string());
        let hydration_timeout = match lookup("HYDRATION_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(raw.parse().map_err(|e| {
                AppError::Config(format!("HYDRATION_TIMEOUT_MS must be milliseconds: {e}"))
            })?),
            None => DEFAULT_HYDRATION_TIMEOUT,
        };

        Ok(Self {
            host,
            port,
            database_url,
            catalog_url: lookup("CATALOG_URL"),
            catalog_api_key: lookup("CATALOG_API_KEY"),
            hydration_timeout,
        })
    }

    /// Socket address built from `host` and `port`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the combination does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }

    /// Persistence bridge settings for the cart.
    #[must_use]
    pub fn persistence_settings(&self) -> PersistenceSettings {
        PersistenceSettings {
            key: CART_STORAGE_KEY.to_owned(),
            hydration_timeout: self.hydration_timeout,
        }
    }
}
