//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog page (?category=&q=)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (catalog reachable)
//!
//! # Catalog (HTMX fragments)
//! GET  /products               - Category bar and product grid fragment
//!
//! # Favorites
//! GET  /favorites              - Favorites page
//! POST /favorites/toggle       - Toggle (returns favorite button, triggers favorites-updated)
//! POST /favorites/remove       - Remove (returns favorites grid, triggers favorites-updated)
//! GET  /favorites/count        - Favorites count badge (fragment)
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns cart badge, triggers cart-updated)
//! POST /cart/increase          - +1 at index (returns cart_items fragment)
//! POST /cart/decrease          - -1 at index (returns cart_items fragment)
//! POST /cart/quantity          - Set quantity at index (returns cart_items fragment)
//! POST /cart/remove            - Remove at index (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Checkout form and order summary
//! POST /checkout               - Place the (mock) order
//! ```
//!
//! Every mutating route answers HTMX requests with a fragment and answers
//! plain form posts with a 303 redirect, so the site works without scripts.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod favorites;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::Redirect,
    routing::{get, post},
};
use bazaar_core::{CartLedger, FavoritesLedger, StoreError};
use tower_http::{services::ServeDir, trace::TraceLayer};
use url::Url;

use crate::middleware::{create_session_layer, request_id_middleware, security_headers_middleware};
use crate::state::AppState;
use crate::store::SessionStore;

/// HTMX event fired after any cart change.
pub const CART_UPDATED: &str = "cart-updated";

/// HTMX event fired after any favorites change.
pub const FAVORITES_UPDATED: &str = "favorites-updated";

/// Header counts shown on every page.
#[derive(Debug, Clone, Copy, Default)]
pub struct Badges {
    pub cart: u64,
    pub favorites: usize,
}

impl Badges {
    /// Read both counts from the visitor's store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn load(store: &SessionStore) -> Result<Self, StoreError> {
        Ok(Self {
            cart: CartLedger::new(store.clone()).count().await?,
            favorites: FavoritesLedger::new(store.clone()).count().await?,
        })
    }
}

/// Count badge fragment (HTMX). Renders nothing for zero.
#[derive(Template, WebTemplate)]
#[template(path = "partials/badge.html")]
pub struct BadgeTemplate {
    pub count: u64,
}

/// Whether the request was issued by htmx.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Redirect a plain form post back to the page it came from.
///
/// Only the path and query of the `Referer` are used, so the redirect never
/// leaves the site. Falls back to `fallback` when there is no usable referer.
#[must_use]
pub fn redirect_back(headers: &HeaderMap, fallback: &str) -> Redirect {
    let target = headers
        .get(axum::http::header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| Url::parse(referer).ok())
        .map(|url| match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        });

    Redirect::to(target.as_deref().unwrap_or(fallback))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/products", get(catalog::results))
}

/// Create the favorites routes router.
pub fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::show))
        .route("/toggle", post(favorites::toggle))
        .route("/remove", post(favorites::remove))
        .route("/count", get(favorites::count))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/quantity", post(cart::set_quantity))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .nest("/favorites", favorites_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::submit))
}

/// The complete storefront application, minus Sentry layers.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let static_dir = ServeDir::new(&state.config().static_dir);

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", static_dir)
        .layer(session_layer)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the catalog cannot be fetched.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.catalog().products().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::{HeaderValue, header};
    use axum::response::IntoResponse;

    use super::*;

    fn location(redirect: Redirect) -> String {
        let response = redirect.into_response();
        response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert("hx-request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }

    #[test]
    fn test_redirect_back_keeps_path_and_query_only() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::REFERER,
            HeaderValue::from_static("https://evil.test/?category=jewelery&q=ring"),
        );
        assert_eq!(
            location(redirect_back(&headers, "/")),
            "/?category=jewelery&q=ring"
        );
    }

    #[test]
    fn test_redirect_back_fallback() {
        let headers = HeaderMap::new();
        assert_eq!(location(redirect_back(&headers, "/cart")), "/cart");

        let mut headers = HeaderMap::new();
        headers.insert(header::REFERER, HeaderValue::from_static("not a url"));
        assert_eq!(location(redirect_back(&headers, "/favorites")), "/favorites");
    }
}
