//! Catalog product records.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product as returned by the catalog API.
///
/// Read-only: the storefront never mutates catalog data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: Rating,
}

/// Aggregate customer rating.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Average score, 0 to 5.
    #[serde(default)]
    pub rate: f64,
    /// Number of ratings.
    #[serde(default)]
    pub count: u32,
}

impl Product {
    /// Whether the title or description contains `needle`, ignoring case.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Find a product by id.
#[must_use]
pub fn find_product(products: &[Product], id: ProductId) -> Option<&Product> {
    products.iter().find(|p| p.id == id)
}
