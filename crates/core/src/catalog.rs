//! Catalog view model: category and search filtering over the product list.

use crate::product::Product;

/// Category value that matches every product.
pub const ALL_CATEGORIES: &str = "all";

/// Number of stars in a rating display.
pub const MAX_STARS: u8 = 5;

/// Active category filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Parse a category parameter. Empty and `"all"` select everything.
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        if value.is_empty() || value == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Named(value.to_string())
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Named(name) => name,
        }
    }

    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => product.category == *name,
        }
    }
}

/// Products of one catalog fetch plus the active filters.
#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    products: Vec<Product>,
    categories: Vec<String>,
    category: CategoryFilter,
    query: String,
    query_lower: String,
}

impl CatalogView {
    /// Build a view with no filters applied.
    ///
    /// Categories are derived once here: `"all"` first, then each distinct
    /// category in the order it first appears.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for product in &products {
            if !categories.iter().any(|c| *c == product.category) {
                categories.push(product.category.clone());
            }
        }

        Self {
            products,
            categories,
            ..Self::default()
        }
    }

    /// Every product, unfiltered.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub const fn category(&self) -> &CategoryFilter {
        &self.category
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.query
    }

    pub fn set_category(&mut self, category: &str) {
        self.category = CategoryFilter::from_param(category);
    }

    pub fn set_search_query(&mut self, query: &str) {
        query.clone_into(&mut self.query);
        self.query_lower = query.to_lowercase();
    }

    /// Products passing both filters, in catalog order.
    pub fn filtered(&self) -> impl Iterator<Item = &Product> + '_ {
        self.products.iter().filter(|product| {
            self.category.matches(product) && product.matches_lowercase(&self.query_lower)
        })
    }
}

/// Human label for a category button.
///
/// `"all"` becomes `"All Products"`; other names get each space-separated
/// word capitalised (`"men's clothing"` → `"Men's Clothing"`).
#[must_use]
pub fn category_label(category: &str) -> String {
    if category == ALL_CATEGORIES {
        return "All Products".to_string();
    }

    category
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Star breakdown for a 0–5 rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating {
    pub full: u8,
    pub half: bool,
    pub empty: u8,
}

impl StarRating {
    /// Whole part as full stars, one half star when the fraction is at least
    /// 0.5, and empty stars up to five.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_rate(rate: f64) -> Self {
        let rate = if rate.is_finite() {
            rate.clamp(0.0, f64::from(MAX_STARS))
        } else {
            0.0
        };
        let full = rate.floor() as u8;
        let half = full < MAX_STARS && rate.fract() >= 0.5;
        let empty = MAX_STARS - full - u8::from(half);
        Self { full, half, empty }
    }
}
