//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_STATIC_DIR` - Static asset directory (default: crates/storefront/static)
//! - `CATALOG_API_URL` - Catalog service base URL (default: <https://fakestoreapi.com>)
//! - `CATALOG_CACHE_TTL_SECS` - Catalog cache lifetime, 0 disables (default: 60)
//! - `SEARCH_DEBOUNCE_MS` - Quiet period before a search runs (default: 300)
//! - `CHECKOUT_LATENCY_MS` - Simulated order processing time (default: 1000)
//! - `CHECKOUT_REDIRECT_MS` - Delay before leaving the confirmation (default: 4500)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com";

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
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Catalog service configuration
    pub catalog: CatalogConfig,
    /// Quiet period for search-as-you-type
    pub search_debounce: Duration,
    /// Mock checkout timings
    pub checkout: CheckoutConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Catalog service configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL; products are read from `{base_url}/products`
    pub base_url: Url,
    /// How long a fetched catalog is reused. Zero disables caching.
    pub cache_ttl: Duration,
}

impl CatalogConfig {
    /// Config for `base_url` with the default cache lifetime.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            cache_ttl: Duration::from_secs(60),
        }
    }

    /// Full URL of the product list.
    #[must_use]
    pub fn products_url(&self) -> String {
        format!("{}/products", self.base_url.as_str().trim_end_matches('/'))
    }
}

/// Mock checkout timings.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutConfig {
    /// Simulated processing time before an order is confirmed
    pub latency: Duration,
    /// How long the confirmation shows before returning to the catalog
    pub redirect_delay: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1000),
            redirect_delay: Duration::from_millis(4500),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let static_dir = PathBuf::from(get_env_or_default(
            "STOREFRONT_STATIC_DIR",
            "crates/storefront/static",
        ));

        let catalog = CatalogConfig {
            base_url: parse_env("CATALOG_API_URL", DEFAULT_CATALOG_URL)?,
            cache_ttl: Duration::from_secs(parse_env("CATALOG_CACHE_TTL_SECS", "60")?),
        };

        let search_debounce = Duration::from_millis(parse_env("SEARCH_DEBOUNCE_MS", "300")?);
        let checkout = CheckoutConfig {
            latency: Duration::from_millis(parse_env("CHECKOUT_LATENCY_MS", "1000")?),
            redirect_delay: Duration::from_millis(parse_env("CHECKOUT_REDIRECT_MS", "4500")?),
        };

        Ok(Self {
            host,
            port,
            base_url,
            static_dir,
            catalog,
            search_debounce,
            checkout,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Defaults for everything except the catalog location.
    #[must_use]
    pub fn with_catalog(catalog: CatalogConfig) -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            static_dir: PathBuf::from("crates/storefront/static"),
            catalog,
            search_debounce: Duration::from_millis(300),
            checkout: CheckoutConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether session cookies should be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
