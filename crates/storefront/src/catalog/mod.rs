//! Catalog service client.
//!
//! # Architecture
//!
//! - The catalog service is the source of truth; nothing is stored locally
//! - Products are read with one `GET {base}/products` request
//! - In-memory caching via `moka`, so a page render and the action behind it
//!   see the same catalog. Failed fetches are never cached.
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog);
//! let products = client.products().await?;
//! ```

mod client;

pub use client::CatalogClient;

use thiserror::Error;

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog service answered with a non-success status.
    #[error("Catalog service returned HTTP {0}")]
    Status(u16),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
