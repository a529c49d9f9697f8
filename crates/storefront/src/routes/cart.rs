//! Cart route handlers.
//!
//! The cart lives in the visitor's session. Rows are addressed by position,
//! and every change re-renders the reconciled cart so prices and the total
//! track the live catalog.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use bazaar_core::{Cart, CartLedger, CartView, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::routes::{BadgeTemplate, Badges, CART_UPDATED, is_htmx, redirect_back};
use crate::services::cart::{add_to_cart, cart_view, reconcile};
use crate::state::AppState;
use crate::store::SessionStore;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
}

/// Row-addressed form data.
#[derive(Debug, Deserialize)]
pub struct RowForm {
    pub index: usize,
}

/// Quantity input form data. The raw input is sanitized by the ledger.
#[derive(Debug, Deserialize)]
pub struct QuantityForm {
    pub index: usize,
    #[serde(default)]
    pub quantity: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub badges: Badges,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Display the cart page.
#[instrument(skip(state, store))]
pub async fn show(State(state): State<AppState>, store: SessionStore) -> Result<CartShowTemplate> {
    let cart = cart_view(&CartLedger::new(store.clone()), state.catalog()).await?;

    Ok(CartShowTemplate {
        badges: Badges::load(&store).await?,
        cart,
    })
}

/// Add one unit of a product to the cart.
///
/// HTMX requests get the refreshed cart badge back. Products the catalog
/// does not list are ignored.
#[instrument(skip(state, store, headers))]
pub async fn add(
    State(state): State<AppState>,
    store: SessionStore,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let ledger = CartLedger::new(store);
    let added = add_to_cart(&ledger, state.catalog(), ProductId::new(form.product_id)).await?;

    if added {
        let id = form.product_id.to_string();
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
    }

    if !is_htmx(&headers) {
        return Ok(redirect_back(&headers, "/").into_response());
    }

    let badge = BadgeTemplate {
        count: ledger.count().await?,
    };

    Ok(if added {
        (AppendHeaders([("HX-Trigger", CART_UPDATED)]), badge).into_response()
    } else {
        badge.into_response()
    })
}

/// Increase the quantity of the row at `index` by one.
#[instrument(skip(state, store, headers))]
pub async fn increase(
    State(state): State<AppState>,
    store: SessionStore,
    headers: HeaderMap,
    Form(form): Form<RowForm>,
) -> Result<Response> {
    let cart = CartLedger::new(store).change_quantity(form.index, 1).await?;
    Ok(updated(&state, &headers, &cart).await)
}

/// Decrease the quantity of the row at `index` by one, never below one.
#[instrument(skip(state, store, headers))]
pub async fn decrease(
    State(state): State<AppState>,
    store: SessionStore,
    headers: HeaderMap,
    Form(form): Form<RowForm>,
) -> Result<Response> {
    let cart = CartLedger::new(store).change_quantity(form.index, -1).await?;
    Ok(updated(&state, &headers, &cart).await)
}

/// Set the quantity of the row at `index` from raw input.
#[instrument(skip(state, store, headers))]
pub async fn set_quantity(
    State(state): State<AppState>,
    store: SessionStore,
    headers: HeaderMap,
    Form(form): Form<QuantityForm>,
) -> Result<Response> {
    let cart = CartLedger::new(store)
        .set_quantity(form.index, &form.quantity)
        .await?;
    Ok(updated(&state, &headers, &cart).await)
}

/// Remove the row at `index`.
#[instrument(skip(state, store, headers))]
pub async fn remove(
    State(state): State<AppState>,
    store: SessionStore,
    headers: HeaderMap,
    Form(form): Form<RowForm>,
) -> Result<Response> {
    let cart = CartLedger::new(store).remove(form.index).await?;
    add_breadcrumb("cart", "Removed from cart", None);
    Ok(updated(&state, &headers, &cart).await)
}

/// Cart count badge (HTMX).
#[instrument(skip(store))]
pub async fn count(store: SessionStore) -> Result<BadgeTemplate> {
    Ok(BadgeTemplate {
        count: CartLedger::new(store).count().await?,
    })
}

/// Response after a row change: the re-rendered items for HTMX, or a
/// redirect back to the cart page.
async fn updated(state: &AppState, headers: &HeaderMap, cart: &Cart) -> Response {
    if !is_htmx(headers) {
        return Redirect::to("/cart").into_response();
    }

    (
        AppendHeaders([("HX-Trigger", CART_UPDATED)]),
        CartItemsTemplate {
            cart: reconcile(cart, state.catalog()).await,
        },
    )
        .into_response()
}
