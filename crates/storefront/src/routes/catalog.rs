//! Catalog route handlers.
//!
//! The catalog page renders the search box once; category changes and
//! search input swap only the results (category bar plus grid) via HTMX.
//! Search input fires after the configured quiet period.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use bazaar_core::{CatalogView, Favorites, FavoritesLedger, Product, StarRating};
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::error::Result;
use crate::filters;
use crate::routes::Badges;
use crate::state::AppState;
use crate::store::SessionStore;

/// Inline message shown when the catalog cannot be fetched.
pub const CATALOG_ERROR: &str = "Failed to load products. Please try again later.";

/// Catalog query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub q: String,
}

/// Product card display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: i32,
    pub title: String,
    pub price: String,
    pub image: String,
    pub category: String,
    /// One CSS modifier per star: `full`, `half`, or `empty`.
    pub stars: Vec<&'static str>,
    pub rate: f64,
    pub rating_count: u32,
    pub is_favorite: bool,
}

impl ProductCard {
    #[must_use]
    pub fn new(product: &Product, favorites: &Favorites) -> Self {
        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            price: product.price.display(),
            image: product.image.clone(),
            category: product.category.clone(),
            stars: star_classes(StarRating::from_rate(product.rating.rate)),
            rate: product.rating.rate,
            rating_count: product.rating.count,
            is_favorite: favorites.contains(product.id),
        }
    }
}

fn star_classes(rating: StarRating) -> Vec<&'static str> {
    let mut stars = vec!["full"; usize::from(rating.full)];
    if rating.half {
        stars.push("half");
    }
    stars.extend(std::iter::repeat_n("empty", usize::from(rating.empty)));
    stars
}

/// Product grid display data for templates.
#[derive(Debug, Clone)]
pub struct ProductGrid {
    pub cards: Vec<ProductCard>,
    /// Set when the catalog could not be fetched.
    pub error: Option<&'static str>,
    pub empty_title: &'static str,
    pub empty_hint: &'static str,
    /// Favorites page: cards offer "Remove" instead of the heart toggle.
    pub removable: bool,
}

impl ProductGrid {
    /// Grid for the catalog page.
    #[must_use]
    pub const fn catalog(cards: Vec<ProductCard>) -> Self {
        Self {
            cards,
            error: None,
            empty_title: "No products found",
            empty_hint: "Try adjusting your search or filter criteria",
            removable: false,
        }
    }

    /// Grid for the favorites page.
    #[must_use]
    pub const fn favorites(cards: Vec<ProductCard>) -> Self {
        Self {
            cards,
            error: None,
            empty_title: "No Favorites Yet",
            empty_hint: "Go back and add some products to your favorites ❤️",
            removable: true,
        }
    }

    /// Replace the grid with the catalog error state.
    #[must_use]
    pub const fn failed(mut self) -> Self {
        self.error = Some(CATALOG_ERROR);
        self
    }
}

/// Category button display data for templates.
#[derive(Debug, Clone)]
pub struct CategoryLink {
    pub value: String,
    pub active: bool,
}

/// Category bar and product grid.
#[derive(Debug, Clone)]
pub struct CatalogResults {
    pub categories: Vec<CategoryLink>,
    pub category: String,
    pub query: String,
    pub grid: ProductGrid,
}

impl CatalogResults {
    /// Filter `products` by `params`, marking `favorites`.
    #[must_use]
    pub fn build(products: &[Product], params: &CatalogQuery, favorites: &Favorites) -> Self {
        let mut view = CatalogView::new(products.to_vec());
        view.set_category(&params.category);
        view.set_search_query(&params.q);

        let category = view.category().as_str().to_string();
        let categories = view
            .categories()
            .iter()
            .map(|value| CategoryLink {
                active: *value == category,
                value: value.clone(),
            })
            .collect();
        let cards = view
            .filtered()
            .map(|product| ProductCard::new(product, favorites))
            .collect();

        Self {
            categories,
            category,
            query: params.q.clone(),
            grid: ProductGrid::catalog(cards),
        }
    }

    /// Results when the catalog is unavailable.
    #[must_use]
    pub fn failed(params: &CatalogQuery) -> Self {
        Self {
            categories: Vec::new(),
            category: params.category.clone(),
            query: params.q.clone(),
            grid: ProductGrid::catalog(Vec::new()).failed(),
        }
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "catalog/index.html")]
pub struct CatalogIndexTemplate {
    pub badges: Badges,
    pub results: CatalogResults,
    pub search_delay_ms: u128,
}

/// Catalog results fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/catalog_results.html")]
pub struct CatalogResultsTemplate {
    pub results: CatalogResults,
}

async fn load_results(
    state: &AppState,
    store: &SessionStore,
    params: &CatalogQuery,
) -> Result<CatalogResults> {
    let favorites = FavoritesLedger::new(store.clone()).load().await?;

    Ok(match state.catalog().products().await {
        Ok(products) => CatalogResults::build(&products, params, &favorites),
        Err(e) => {
            warn!(error = %e, "Failed to fetch catalog");
            CatalogResults::failed(params)
        }
    })
}

/// Display the catalog page.
#[instrument(skip(state, store))]
pub async fn index(
    State(state): State<AppState>,
    store: SessionStore,
    Query(params): Query<CatalogQuery>,
) -> Result<CatalogIndexTemplate> {
    let results = load_results(&state, &store, &params).await?;

    Ok(CatalogIndexTemplate {
        badges: Badges::load(&store).await?,
        results,
        search_delay_ms: state.config().search_debounce.as_millis(),
    })
}

/// Category bar and grid for the current filters (HTMX).
#[instrument(skip(state, store))]
pub async fn results(
    State(state): State<AppState>,
    store: SessionStore,
    Query(params): Query<CatalogQuery>,
) -> Result<CatalogResultsTemplate> {
    Ok(CatalogResultsTemplate {
        results: load_results(&state, &store, &params).await?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use bazaar_core::{Price, ProductId, Rating};

    use super::*;

    fn product(id: i32, title: &str, category: &str, rate: f64) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from_cents(1995),
            description: String::new(),
            category: category.to_string(),
            image: String::new(),
            rating: Rating { rate, count: 7 },
        }
    }

    fn products() -> Vec<Product> {
        vec![
            product(1, "Backpack", "men's clothing", 3.9),
            product(2, "Ring", "jewelery", 4.6),
            product(3, "Jacket", "men's clothing", 2.1),
        ]
    }

    fn query(category: &str, q: &str) -> CatalogQuery {
        CatalogQuery {
            category: category.to_string(),
            q: q.to_string(),
        }
    }

    #[test]
    fn test_star_classes() {
        assert_eq!(
            star_classes(StarRating::from_rate(3.9)),
            vec!["full", "full", "full", "half", "empty"]
        );
        assert_eq!(star_classes(StarRating::from_rate(0.0)), vec!["empty"; 5]);
    }

    #[test]
    fn test_results_mark_active_category_and_favorites() {
        let favorites = Favorites::from_ids([ProductId::new(3)]);
        let results = CatalogResults::build(&products(), &query("men's clothing", ""), &favorites);

        let active: Vec<&str> = results
            .categories
            .iter()
            .filter(|c| c.active)
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(active, vec!["men's clothing"]);

        let ids: Vec<i32> = results.grid.cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(results.grid.cards.iter().any(|c| c.id == 3 && c.is_favorite));
        assert_eq!(results.grid.cards[0].price, "19.95");
    }

    #[test]
    fn test_blank_category_selects_all() {
        let results = CatalogResults::build(&products(), &query("", "ring"), &Favorites::new());
        assert_eq!(results.category, "all");
        assert!(results.categories[0].active);
        assert_eq!(results.grid.cards.len(), 1);
    }

    #[test]
    fn test_failed_results_carry_error() {
        let results = CatalogResults::failed(&query("all", ""));
        assert_eq!(results.grid.error, Some(CATALOG_ERROR));
        assert!(results.categories.is_empty());
    }

    #[test]
    fn test_grid_renders_empty_state() {
        let html = CatalogResultsTemplate {
            results: CatalogResults::build(&products(), &query("all", "zzz"), &Favorites::new()),
        }
        .render()
        .unwrap();
        assert!(html.contains("No products found"));
    }

    #[test]
    fn test_grid_renders_error_with_retry() {
        let html = CatalogResultsTemplate {
            results: CatalogResults::failed(&query("jewelery", "")),
        }
        .render()
        .unwrap();
        assert!(html.contains(CATALOG_ERROR));
        assert!(html.contains("Try Again"));
    }
}
