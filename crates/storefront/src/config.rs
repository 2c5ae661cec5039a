//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `CATALOG_SOURCE` - Catalog location, an `http(s)://` URL or a file path
//!   (default: `crates/storefront/data/products.json`)
//! - `STOREFRONT_DATA_DIR` - Directory holding the persisted cart (default: `.mercadito`)
//! - `STOREFRONT_STATIC_DIR` - Directory served under `/static` (default: `crates/storefront/static`)
//! - `CATALOG_FETCH_ATTEMPTS` - Catalog fetch attempts before giving up (default: 3)
//! - `CATALOG_FETCH_RETRY_MS` - Pause between attempts in milliseconds (default: 500)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::{AnySource, CatalogError, RetryPolicy};

pub const DEFAULT_CATALOG_SOURCE: &str = "crates/storefront/data/products.json";
pub const DEFAULT_DATA_DIR: &str = ".mercadito";
pub const DEFAULT_STATIC_DIR: &str = "crates/storefront/static";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Where the catalog is fetched from
    pub catalog: AnySource,
    /// Retry behaviour for the startup catalog fetch
    pub catalog_retry: RetryPolicy,
    /// Directory for the persisted cart
    pub data_dir: PathBuf,
    /// Directory with images and stylesheets
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env.parsed_or("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = env.parsed_or("STOREFRONT_PORT", 3000_u16)?;

        let catalog_location = env.or_default("CATALOG_SOURCE", DEFAULT_CATALOG_SOURCE);
        let catalog = AnySource::parse(&catalog_location).map_err(|e| match e {
            CatalogError::InvalidSource(_, reason) => {
                ConfigError::InvalidEnvVar("CATALOG_SOURCE".to_string(), reason)
            }
            other => ConfigError::InvalidEnvVar("CATALOG_SOURCE".to_string(), other.to_string()),
        })?;

        let attempts = env.parsed_or("CATALOG_FETCH_ATTEMPTS", 3_u32)?;
        let retry_ms = env.parsed_or("CATALOG_FETCH_RETRY_MS", 500_u64)?;
        let catalog_retry = RetryPolicy::new(attempts, Duration::from_millis(retry_ms));

        let data_dir = PathBuf::from(env.or_default("STOREFRONT_DATA_DIR", DEFAULT_DATA_DIR));
        let static_dir =
            PathBuf::from(env.or_default("STOREFRONT_STATIC_DIR", DEFAULT_STATIC_DIR));

        let sentry_dsn = env.optional("SENTRY_DSN");
        let sentry_environment = env.optional("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = env.parsed_or("SENTRY_SAMPLE_RATE", 1.0_f32)?;
        let sentry_traces_sample_rate = env.parsed_or("SENTRY_TRACES_SAMPLE_RATE", 0.0_f32)?;

        Ok(Self {
            host,
            port,
            catalog,
            catalog_retry,
            data_dir,
            static_dir,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with typed accessors.
struct Env<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert!(matches!(config.catalog, AnySource::File(_)));
        assert_eq!(config.catalog_retry.attempts(), 3);
        assert_eq!(config.catalog_retry.delay(), Duration::from_millis(500));
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("CATALOG_SOURCE", "https://shop.example.com/products.json"),
            ("CATALOG_FETCH_ATTEMPTS", "5"),
            ("CATALOG_FETCH_RETRY_MS", "50"),
            ("STOREFRONT_DATA_DIR", "/tmp/cart"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert!(matches!(config.catalog, AnySource::Http(_)));
        assert_eq!(config.catalog_retry.attempts(), 5);
        assert_eq!(config.catalog_retry.delay(), Duration::from_millis(50));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/cart"));
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("STOREFRONT_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_invalid_catalog_url() {
        let err = load(&[("CATALOG_SOURCE", "https://")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "CATALOG_SOURCE"));
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let config = load(&[("STOREFRONT_PORT", " "), ("CATALOG_SOURCE", "")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(matches!(config.catalog, AnySource::File(_)));
    }

    #[test]
    fn test_zero_attempts_clamped() {
        let config = load(&[("CATALOG_FETCH_ATTEMPTS", "0")]).unwrap();
        assert_eq!(config.catalog_retry.attempts(), 1);
    }
}
