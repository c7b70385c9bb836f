//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ROCKETSHOES_API_URL` - Base URL of the inventory API (serves `/products/{id}` and `/stock/{id}`)
//!
//! ## Optional
//! - `ROCKETSHOES_HOST` - Bind address (default: 127.0.0.1)
//! - `ROCKETSHOES_PORT` - Listen port (default: 3000)
//! - `ROCKETSHOES_STORAGE_DIR` - Directory for the persisted cart (default: .rocketshoes)
//! - `ROCKETSHOES_STORAGE_KEY` - Storage slot holding the cart (default: @RocketShoes:cart)
//! - `ROCKETSHOES_PRODUCT_CACHE_TTL_SECS` - Product detail cache TTL (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default storage slot for the cart.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
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
    /// Inventory API configuration
    pub inventory: InventoryConfig,
    /// Cart persistence configuration
    pub storage: StorageConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Inventory API configuration.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    /// Base URL; product and stock paths are joined onto it
    pub base_url: Url,
    /// How long fetched product details stay cached
    pub product_cache_ttl: Duration,
}

/// Cart persistence configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding one file per storage key
    pub dir: PathBuf,
    /// Key of the slot holding the serialized cart
    pub key: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("ROCKETSHOES_HOST", "127.0.0.1")?;
        let port = parse_env("ROCKETSHOES_PORT", "3000")?;

        Ok(Self {
            host,
            port,
            inventory: InventoryConfig::from_env()?,
            storage: StorageConfig::from_env(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl InventoryConfig {
    /// Load the inventory API settings on their own.
    ///
    /// The CLI needs these without the server settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `ROCKETSHOES_API_URL` is missing or not a URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = get_required_env("ROCKETSHOES_API_URL")?;
        let base_url = parse_base_url(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("ROCKETSHOES_API_URL".to_string(), e))?;
        let ttl_secs: u64 = parse_env("ROCKETSHOES_PRODUCT_CACHE_TTL_SECS", "300")?;

        Ok(Self {
            base_url,
            product_cache_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

impl StorageConfig {
    /// Load the storage settings on their own.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            dir: PathBuf::from(get_env_or_default("ROCKETSHOES_STORAGE_DIR", ".rocketshoes")),
            key: get_env_or_default("ROCKETSHOES_STORAGE_KEY", DEFAULT_STORAGE_KEY),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an API base URL, normalizing it to end with `/` so relative paths
/// join underneath it instead of replacing its last segment.
///
/// # Errors
///
/// Returns a description of the problem if `raw` is not an http(s) URL.
pub fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            inventory: InventoryConfig {
                base_url: parse_base_url("http://localhost:3333").unwrap(),
                product_cache_ttl: Duration::from_secs(300),
            },
            storage: StorageConfig {
                dir: PathBuf::from(".rocketshoes"),
                key: DEFAULT_STORAGE_KEY.to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_parse_base_url_appends_slash() {
        let url = parse_base_url("http://localhost:3333/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3333/api/");
        assert_eq!(
            url.join("stock/1").unwrap().as_str(),
            "http://localhost:3333/api/stock/1"
        );
    }

    #[test]
    fn test_parse_base_url_keeps_root() {
        let url = parse_base_url("http://localhost:3333").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3333/");
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(parse_base_url("not a url").is_err());
        assert!(parse_base_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("ROCKETSHOES_API_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: ROCKETSHOES_API_URL"
        );
    }
}
