//! Favorites route handlers.
//!
//! Toggling swaps just the heart button; removing from the favorites page
//! swaps the whole grid. Both fire `favorites-updated` so the header badge
//! refreshes itself.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use bazaar_core::{Favorites, FavoritesLedger, Product, ProductId};
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::routes::catalog::{ProductCard, ProductGrid};
use crate::routes::{BadgeTemplate, Badges, FAVORITES_UPDATED, is_htmx, redirect_back};
use crate::state::AppState;
use crate::store::SessionStore;

/// Favorite toggle/remove form data.
#[derive(Debug, Deserialize)]
pub struct FavoriteForm {
    pub product_id: i32,
}

/// Heart button display data.
#[derive(Debug, Clone, Copy)]
pub struct FavoriteToggle {
    pub id: i32,
    pub is_favorite: bool,
}

/// Favorites page template.
#[derive(Template, WebTemplate)]
#[template(path = "favorites/show.html")]
pub struct FavoritesShowTemplate {
    pub badges: Badges,
    pub grid: ProductGrid,
}

/// Product grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub grid: ProductGrid,
}

/// Heart button fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/favorite_button.html")]
pub struct FavoriteButtonTemplate {
    pub card: FavoriteToggle,
}

/// Cards for every favorite the catalog still lists, in catalog order.
fn favorite_cards(favorites: &Favorites, products: &[Product]) -> Vec<ProductCard> {
    favorites
        .resolve(products)
        .map(|product| ProductCard::new(product, favorites))
        .collect()
}

async fn load_grid(state: &AppState, favorites: &Favorites) -> ProductGrid {
    if favorites.is_empty() {
        return ProductGrid::favorites(Vec::new());
    }

    match state.catalog().products().await {
        Ok(products) => ProductGrid::favorites(favorite_cards(favorites, &products)),
        Err(e) => {
            warn!(error = %e, "Failed to fetch catalog for favorites");
            ProductGrid::favorites(Vec::new()).failed()
        }
    }
}

/// Display the favorites page.
#[instrument(skip(state, store))]
pub async fn show(
    State(state): State<AppState>,
    store: SessionStore,
) -> Result<FavoritesShowTemplate> {
    let favorites = FavoritesLedger::new(store.clone()).load().await?;

    Ok(FavoritesShowTemplate {
        grid: load_grid(&state, &favorites).await,
        badges: Badges::load(&store).await?,
    })
}

/// Toggle a product's favorite flag.
#[instrument(skip(store, headers))]
pub async fn toggle(
    store: SessionStore,
    headers: HeaderMap,
    Form(form): Form<FavoriteForm>,
) -> Result<Response> {
    let is_favorite = FavoritesLedger::new(store)
        .toggle(ProductId::new(form.product_id))
        .await?;

    let id = form.product_id.to_string();
    add_breadcrumb(
        "favorites",
        if is_favorite { "Added favorite" } else { "Removed favorite" },
        Some(&[("product_id", id.as_str())]),
    );

    if !is_htmx(&headers) {
        return Ok(redirect_back(&headers, "/").into_response());
    }

    Ok((
        AppendHeaders([("HX-Trigger", FAVORITES_UPDATED)]),
        FavoriteButtonTemplate {
            card: FavoriteToggle {
                id: form.product_id,
                is_favorite,
            },
        },
    )
        .into_response())
}

/// Remove a product from favorites (favorites page).
#[instrument(skip(state, store, headers))]
pub async fn remove(
    State(state): State<AppState>,
    store: SessionStore,
    headers: HeaderMap,
    Form(form): Form<FavoriteForm>,
) -> Result<Response> {
    let favorites = FavoritesLedger::new(store)
        .remove(ProductId::new(form.product_id))
        .await?;

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/favorites").into_response());
    }

    Ok((
        AppendHeaders([("HX-Trigger", FAVORITES_UPDATED)]),
        ProductGridTemplate {
            grid: load_grid(&state, &favorites).await,
        },
    )
        .into_response())
}

/// Favorites count badge (HTMX).
#[instrument(skip(store))]
pub async fn count(store: SessionStore) -> Result<BadgeTemplate> {
    let count = FavoritesLedger::new(store).count().await?;
    Ok(BadgeTemplate {
        count: u64::try_from(count).unwrap_or(u64::MAX),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::{Price, Rating};

    use super::*;

    fn product(id: i32, title: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from_cents(999),
            description: String::new(),
            category: "electronics".to_string(),
            image: String::new(),
            rating: Rating { rate: 4.0, count: 3 },
        }
    }

    #[test]
    fn test_favorite_cards_skip_unlisted_products() {
        let favorites = Favorites::from_ids([ProductId::new(2), ProductId::new(9)]);
        let catalog = vec![product(1, "Drive"), product(2, "Monitor")];

        let cards = favorite_cards(&favorites, &catalog);
        let titles: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Monitor"]);
        assert!(cards.iter().all(|c| c.is_favorite));
    }

    #[test]
    fn test_empty_favorites_render_hint() {
        let html = ProductGridTemplate {
            grid: ProductGrid::favorites(Vec::new()),
        }
        .render()
        .unwrap();
        assert!(html.contains("No Favorites Yet"));
    }

    #[test]
    fn test_favorites_grid_offers_remove() {
        let favorites = Favorites::from_ids([ProductId::new(1)]);
        let html = ProductGridTemplate {
            grid: ProductGrid::favorites(favorite_cards(&favorites, &[product(1, "Drive")])),
        }
        .render()
        .unwrap();
        assert!(html.contains("/favorites/remove"));
        assert!(!html.contains("/favorites/toggle"));
    }

    #[test]
    fn test_button_reflects_state() {
        let on = FavoriteButtonTemplate {
            card: FavoriteToggle {
                id: 4,
                is_favorite: true,
            },
        }
        .render()
        .unwrap();
        assert!(on.contains("aria-pressed=\"true\""));
        assert!(on.contains("value=\"4\""));

        let off = FavoriteButtonTemplate {
            card: FavoriteToggle {
                id: 4,
                is_favorite: false,
            },
        }
        .render()
        .unwrap();
        assert!(off.contains("aria-pressed=\"false\""));
    }
}
