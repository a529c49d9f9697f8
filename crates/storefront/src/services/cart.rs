//! Cart operations that need the catalog.

use bazaar_core::{
    Cart, CartLedger, CartRepository, CartView, ProductId, StoreError, build_cart_view,
};
use tracing::{instrument, warn};

use crate::catalog::CatalogClient;

/// Add one unit of `id` to the cart.
///
/// Returns `false` when the catalog cannot be fetched or does not list `id`;
/// the cart is left unchanged in both cases.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
#[instrument(skip(ledger, catalog))]
pub async fn add_to_cart<R: CartRepository>(
    ledger: &CartLedger<R>,
    catalog: &CatalogClient,
    id: ProductId,
) -> Result<bool, StoreError> {
    let products = match catalog.products().await {
        Ok(products) => products,
        Err(e) => {
            warn!(error = %e, "Catalog unavailable, cannot add to cart");
            return Ok(false);
        }
    };

    Ok(ledger.add(id, &products).await?.is_some())
}

/// Reconcile `cart` against the live catalog.
///
/// An empty cart short-circuits without a catalog request. If the catalog
/// cannot be fetched the view is built from snapshots and marked degraded.
pub async fn reconcile(cart: &Cart, catalog: &CatalogClient) -> CartView {
    if cart.is_empty() {
        return CartView::empty();
    }

    match catalog.products().await {
        Ok(products) => build_cart_view(cart, Some(products.as_slice())),
        Err(e) => {
            warn!(error = %e, "Catalog unavailable, showing cart from snapshots");
            build_cart_view(cart, None)
        }
    }
}

/// Load the cart and reconcile it.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub async fn cart_view<R: CartRepository>(
    ledger: &CartLedger<R>,
    catalog: &CatalogClient,
) -> Result<CartView, StoreError> {
    let cart = ledger.load().await?;
    Ok(reconcile(&cart, catalog).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::time::Duration;

    use axum::{Router, routing::get};
    use bazaar_core::MemoryStore;
    use url::Url;

    use super::*;
    use crate::config::CatalogConfig;

    const BODY: &str = r#"[
        {"id": 1, "title": "Backpack", "price": 109.95, "category": "men's clothing"},
        {"id": 2, "title": "Mug", "price": 4.5, "category": "kitchen"}
    ]"#;

    async fn live_catalog() -> CatalogClient {
        let app = Router::new().route("/products", get(|| async { BODY }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });
        client(&format!("http://{addr}"))
    }

    fn dead_catalog() -> CatalogClient {
        client("http://127.0.0.1:9")
    }

    fn client(url: &str) -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            base_url: Url::parse(url).unwrap(),
            cache_ttl: Duration::ZERO,
        })
    }

    #[tokio::test]
    async fn test_add_to_cart_resolves_against_catalog() {
        let ledger = CartLedger::new(MemoryStore::new());
        let catalog = live_catalog().await;

        assert!(add_to_cart(&ledger, &catalog, ProductId::new(1)).await.unwrap());
        assert!(!add_to_cart(&ledger, &catalog, ProductId::new(42)).await.unwrap());

        let cart = ledger.load().await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].name.as_deref(), Some("Backpack"));
    }

    #[tokio::test]
    async fn test_add_to_cart_without_catalog_is_noop() {
        let ledger = CartLedger::new(MemoryStore::new());
        assert!(!add_to_cart(&ledger, &dead_catalog(), ProductId::new(1)).await.unwrap());
        assert!(ledger.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cart_view_falls_back_to_snapshots() {
        let ledger = CartLedger::new(MemoryStore::new());
        let catalog = live_catalog().await;
        add_to_cart(&ledger, &catalog, ProductId::new(2)).await.unwrap();
        add_to_cart(&ledger, &catalog, ProductId::new(2)).await.unwrap();

        let live = cart_view(&ledger, &catalog).await.unwrap();
        assert!(!live.degraded);
        assert_eq!(live.total_display(), "9.00");

        let offline = cart_view(&ledger, &dead_catalog()).await.unwrap();
        assert!(offline.degraded);
        assert_eq!(offline.rows[0].name, "Mug");
        assert_eq!(offline.total_display(), "9.00");
    }

    #[tokio::test]
    async fn test_empty_cart_skips_catalog() {
        let ledger = CartLedger::new(MemoryStore::new());
        let view = cart_view(&ledger, &dead_catalog()).await.unwrap();
        assert!(view.is_empty());
        assert!(!view.degraded);
    }
}
