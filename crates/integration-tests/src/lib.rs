//! Integration tests for Bazaar.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! Each test spawns a fake catalog service and a storefront on ephemeral
//! ports, then drives the storefront over HTTP with a cookie-keeping client,
//! so cart and favorites state flows through a real session.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use axum::{Router, extract::State, http::StatusCode, routing::get};
use bazaar_storefront::config::{CatalogConfig, StorefrontConfig};
use bazaar_storefront::routes;
use bazaar_storefront::state::AppState;
use reqwest::header::{CONTENT_TYPE, HeaderMap};
use tokio::net::TcpListener;
use url::Url;

/// Products served by the fake catalog.
pub const PRODUCTS: &str = r#"[
    {"id": 1, "title": "Fjallraven Backpack", "price": 109.95, "description": "Fits 15 inch laptops",
     "category": "men's clothing", "image": "https://img.test/1.jpg", "rating": {"rate": 3.9, "count": 120}},
    {"id": 5, "title": "Dragon Station Bracelet", "price": 22.75, "description": "Silver and gold",
     "category": "jewelery", "image": "https://img.test/5.jpg", "rating": {"rate": 4.6, "count": 400}},
    {"id": 9, "title": "Portable External Hard Drive", "price": 64, "description": "USB 3.0",
     "category": "electronics", "image": "https://img.test/9.jpg", "rating": {"rate": 3.3, "count": 203}},
    {"id": 18, "title": "Short Sleeve Boat Neck", "price": 9.85, "description": "Lightweight",
     "category": "women's clothing", "image": "https://img.test/18.jpg", "rating": {"rate": 4.7, "count": 130}}
]"#;

/// Fake catalog service.
#[derive(Clone, Default)]
pub struct FakeCatalog {
    hits: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl FakeCatalog {
    /// Make every following request fail with 503.
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of product list requests served.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    async fn spawn(&self) -> Url {
        let app = Router::new()
            .route("/products", get(products))
            .with_state(self.clone());
        let addr = serve(app).await;
        Url::parse(&format!("http://{addr}")).unwrap()
    }
}

async fn products(State(catalog): State<FakeCatalog>) -> (StatusCode, &'static str) {
    catalog.hits.fetch_add(1, Ordering::SeqCst);
    if catalog.failing.load(Ordering::SeqCst) {
        (StatusCode::SERVICE_UNAVAILABLE, "down")
    } else {
        (StatusCode::OK, PRODUCTS)
    }
}

async fn serve(app: Router) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// A running storefront with its own catalog and visitor session.
pub struct TestApp {
    pub base: String,
    pub client: reqwest::Client,
    pub catalog: FakeCatalog,
}

impl TestApp {
    /// Spawn a storefront with an uncached catalog and fast checkout.
    pub async fn spawn() -> Self {
        Self::spawn_with_checkout_latency(Duration::from_millis(10)).await
    }

    /// Spawn a storefront whose orders take `latency` to place.
    pub async fn spawn_with_checkout_latency(latency: Duration) -> Self {
        let catalog = FakeCatalog::default();
        let mut catalog_config = CatalogConfig::new(catalog.spawn().await);
        catalog_config.cache_ttl = Duration::ZERO;

        let mut config = StorefrontConfig::with_catalog(catalog_config);
        config.checkout.latency = latency;
        config.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../storefront/static").into();

        let addr = serve(routes::app(AppState::new(config))).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            base: format!("http://{addr}"),
            client,
            catalog,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Plain GET.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    /// GET issued the way htmx issues it.
    pub async fn htmx_get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header("hx-request", "true")
            .send()
            .await
            .unwrap()
    }

    /// Plain form POST, as a browser without scripts sends it.
    pub async fn post(&self, path: &str, fields: &[(&str, &str)]) -> reqwest::Response {
        self.post_with(path, fields, HeaderMap::new()).await
    }

    /// Form POST issued the way htmx issues it.
    pub async fn htmx_post(&self, path: &str, fields: &[(&str, &str)]) -> reqwest::Response {
        let mut headers = HeaderMap::new();
        headers.insert("hx-request", "true".parse().unwrap());
        self.post_with(path, fields, headers).await
    }

    /// htmx form POST that gives up after `timeout`, like a visitor
    /// closing the tab. The server keeps whatever it already started.
    ///
    /// # Errors
    ///
    /// Returns the client error, normally the timeout.
    pub async fn abandoned_htmx_post(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        timeout: Duration,
    ) -> reqwest::Result<reqwest::Response> {
        self.form_request(path, fields)
            .header("hx-request", "true")
            .timeout(timeout)
            .send()
            .await
    }

    async fn post_with(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        headers: HeaderMap,
    ) -> reqwest::Response {
        self.form_request(path, fields)
            .headers(headers)
            .send()
            .await
            .unwrap()
    }

    fn form_request(&self, path: &str, fields: &[(&str, &str)]) -> reqwest::RequestBuilder {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();

        self.client
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
    }

    /// Current cart badge count.
    pub async fn cart_count(&self) -> u64 {
        badge_count(&self.get("/cart/count").await.text().await.unwrap())
    }

    /// Current favorites badge count.
    pub async fn favorites_count(&self) -> u64 {
        badge_count(&self.get("/favorites/count").await.text().await.unwrap())
    }
}

/// Number shown in a badge fragment; an empty fragment is zero.
#[must_use]
pub fn badge_count(html: &str) -> u64 {
    let digits: String = html.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// The `HX-Trigger` header, if any.
#[must_use]
pub fn hx_trigger(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get("hx-trigger")
        .and_then(|value| value.to_str().ok())
        .map(String::from)
}
