//! The favorites ledger.
//!
//! Favorites are stored as a list of product ids. Older persisted data may
//! mix bare ids with whole product snapshots (`{"id": 3, "title": ...}`);
//! both shapes decode, snapshots are reduced to their id, and the next write
//! stores ids only.

use serde::{Deserialize, Deserializer, Serialize};

use crate::product::Product;
use crate::types::ProductId;

/// A persisted favorites entry in either historical shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StoredFavorite {
    Id(ProductId),
    Snapshot { id: ProductId },
    Other(serde_json::Value),
}

/// Set of favorited products, in the order they were favorited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Favorites {
    ids: Vec<ProductId>,
}

impl Favorites {
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Build from ids, dropping repeats after the first occurrence.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = ProductId>) -> Self {
        let mut favorites = Self::new();
        for id in ids {
            if !favorites.contains(id) {
                favorites.ids.push(id);
            }
        }
        favorites
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of favorites, shown on the favorites badge.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.ids.iter().copied()
    }

    /// Add `id` if absent, remove it if present.
    ///
    /// Returns whether `id` is a favorite afterwards.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        if self.remove(id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    /// Remove `id`. Returns `false` if it was not a favorite.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|&existing| existing != id);
        self.ids.len() != before
    }

    /// Catalog products that are favorites, in catalog order.
    ///
    /// Ids missing from the catalog are skipped.
    pub fn resolve<'a>(&'a self, catalog: &'a [Product]) -> impl Iterator<Item = &'a Product> + 'a {
        catalog.iter().filter(|product| self.contains(product.id))
    }
}

impl<'de> Deserialize<'de> for Favorites {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<StoredFavorite>::deserialize(deserializer)?;
        let ids = entries.into_iter().filter_map(|entry| match entry {
            StoredFavorite::Id(id) | StoredFavorite::Snapshot { id } => Some(id),
            StoredFavorite::Other(value) => {
                tracing::debug!(%value, "skipping unrecognised favorites entry");
                None
            }
        });
        Ok(Self::from_ids(ids))
    }
}
