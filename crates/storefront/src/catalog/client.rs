//! Catalog HTTP client with a short-lived product cache.

use std::sync::Arc;

use bazaar_core::Product;
use moka::future::Cache;
use tracing::{debug, instrument};

use super::CatalogError;
use crate::config::CatalogConfig;

/// Cache key for the product list.
const PRODUCTS_KEY: &str = "products";

/// Client for the catalog service.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    endpoint: String,
    cache: Option<Cache<&'static str, Arc<Vec<Product>>>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                endpoint: config.products_url(),
                cache,
            }),
        }
    }

    /// Every product, in the order the service lists them.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-success status, or a body
    /// that is not a product array.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, CatalogError> {
        if let Some(cache) = &self.inner.cache
            && let Some(products) = cache.get(PRODUCTS_KEY).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products = Arc::new(self.fetch().await?);

        if let Some(cache) = &self.inner.cache {
            cache.insert(PRODUCTS_KEY, Arc::clone(&products)).await;
        }

        Ok(products)
    }

    async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self.inner.client.get(&self.inner.endpoint).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Catalog service returned non-success status"
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        let products: Vec<Product> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(200).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })?;

        debug!(count = products.len(), "Fetched catalog");
        Ok(products)
    }
}
