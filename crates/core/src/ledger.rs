//! Cart and favorites ledgers: read, mutate, and write back in one step.
//!
//! Every mutation loads the current value from its repository, applies the
//! change, and persists it before returning. Nothing is buffered, so the
//! store always holds the latest state.

use tracing::instrument;

use crate::cart::Cart;
use crate::favorites::Favorites;
use crate::product::{Product, find_product};
use crate::store::{CartRepository, FavoritesRepository, StoreError};
use crate::types::ProductId;

/// Cart operations over a [`CartRepository`].
#[derive(Debug, Clone)]
pub struct CartLedger<R> {
    repo: R,
}

impl<R: CartRepository> CartLedger<R> {
    pub const fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn load(&self) -> Result<Cart, StoreError> {
        self.repo.load_cart().await
    }

    /// Sum of quantities across all lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.repo.load_cart().await?.item_count())
    }

    /// Add one unit of the product `id`, resolved against `catalog`.
    ///
    /// Returns `None` without touching the store when `id` is not in the
    /// catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    #[instrument(skip(self, catalog), fields(product_id = %id))]
    pub async fn add(
        &self,
        id: ProductId,
        catalog: &[Product],
    ) -> Result<Option<Cart>, StoreError> {
        let Some(product) = find_product(catalog, id) else {
            tracing::debug!("product not in catalog, ignoring add");
            return Ok(None);
        };

        let mut cart = self.repo.load_cart().await?;
        cart.add(product);
        self.repo.save_cart(&cart).await?;
        Ok(Some(cart))
    }

    /// Adjust the quantity of the line at `index` by `delta`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub async fn change_quantity(&self, index: usize, delta: i64) -> Result<Cart, StoreError> {
        self.mutate(|cart| cart.change_quantity_at(index, delta))
            .await
    }

    /// Set the quantity of the line at `index` from raw form input.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub async fn set_quantity(&self, index: usize, raw: &str) -> Result<Cart, StoreError> {
        self.mutate(|cart| cart.set_quantity_at(index, raw)).await
    }

    /// Remove the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub async fn remove(&self, index: usize) -> Result<Cart, StoreError> {
        self.mutate(|cart| cart.remove_at(index)).await
    }

    /// Delete the cart entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.repo.clear_cart().await
    }

    /// Load, apply `f`, and save if `f` reports a change.
    async fn mutate(&self, f: impl FnOnce(&mut Cart) -> bool + Send) -> Result<Cart, StoreError> {
        let mut cart = self.repo.load_cart().await?;
        if f(&mut cart) {
            self.repo.save_cart(&cart).await?;
        } else {
            tracing::debug!("cart position out of range, nothing changed");
        }
        Ok(cart)
    }
}

/// Favorites operations over a [`FavoritesRepository`].
#[derive(Debug, Clone)]
pub struct FavoritesLedger<R> {
    repo: R,
}

impl<R: FavoritesRepository> FavoritesLedger<R> {
    pub const fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Current favorites, migrated to the id-only shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn load(&self) -> Result<Favorites, StoreError> {
        self.repo.load_favorites().await
    }

    /// Number of favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.repo.load_favorites().await?.len())
    }

    /// Flip membership of `id`. Returns whether it is a favorite afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn toggle(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut favorites = self.repo.load_favorites().await?;
        let now_favorite = favorites.toggle(id);
        self.repo.save_favorites(&favorites).await?;
        Ok(now_favorite)
    }

    /// Remove `id` if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub async fn remove(&self, id: ProductId) -> Result<Favorites, StoreError> {
        let mut favorites = self.repo.load_favorites().await?;
        if favorites.remove(id) {
            self.repo.save_favorites(&favorites).await?;
        }
        Ok(favorites)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::product::Rating;
    use crate::store::{CART_KEY, FAVORITES_KEY, KeyValueStore, MemoryStore};
    use crate::types::{Price, Quantity};

    fn product(id: i32, title: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from_cents(cents),
            description: String::new(),
            category: "misc".to_string(),
            image: String::new(),
            rating: Rating::default(),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![product(1, "Backpack", 10995), product(2, "Mug", 450)]
    }

    #[tokio::test]
    async fn test_add_persists_and_increments() {
        let store = MemoryStore::new();
        let ledger = CartLedger::new(store.clone());

        ledger.add(ProductId::new(1), &catalog()).await.unwrap();
        ledger.add(ProductId::new(1), &catalog()).await.unwrap();
        ledger.add(ProductId::new(2), &catalog()).await.unwrap();

        let cart = ledger.load().await.unwrap();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, Quantity::new(2));
        assert_eq!(ledger.count().await.unwrap(), 3);
        assert!(store.get(CART_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_add_unknown_product_is_noop() {
        let store = MemoryStore::new();
        let ledger = CartLedger::new(store.clone());

        let added = ledger.add(ProductId::new(99), &catalog()).await.unwrap();
        assert!(added.is_none());
        assert_eq!(store.get(CART_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_positional_updates() {
        let ledger = CartLedger::new(MemoryStore::new());
        ledger.add(ProductId::new(1), &catalog()).await.unwrap();
        ledger.add(ProductId::new(2), &catalog()).await.unwrap();

        let cart = ledger.change_quantity(1, 2).await.unwrap();
        assert_eq!(cart.items()[1].quantity, Quantity::new(3));

        let cart = ledger.change_quantity(1, -10).await.unwrap();
        assert_eq!(cart.items()[1].quantity, Quantity::ONE);

        let cart = ledger.set_quantity(0, "abc").await.unwrap();
        assert_eq!(cart.items()[0].quantity, Quantity::ONE);

        let cart = ledger.set_quantity(0, "7").await.unwrap();
        assert_eq!(cart.items()[0].quantity, Quantity::new(7));

        let cart = ledger.remove(0).await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.id_at(0), Some(ProductId::new(2)));

        let cart = ledger.remove(5).await.unwrap();
        assert_eq!(cart.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_empties_cart() {
        let ledger = CartLedger::new(MemoryStore::new());
        ledger.add(ProductId::new(1), &catalog()).await.unwrap();
        ledger.clear().await.unwrap();
        assert_eq!(ledger.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_favorites_toggle_and_remove() {
        let store = MemoryStore::new();
        let ledger = FavoritesLedger::new(store.clone());

        assert!(ledger.toggle(ProductId::new(3)).await.unwrap());
        assert!(ledger.toggle(ProductId::new(4)).await.unwrap());
        assert!(!ledger.toggle(ProductId::new(3)).await.unwrap());
        assert_eq!(ledger.count().await.unwrap(), 1);

        let favorites = ledger.remove(ProductId::new(4)).await.unwrap();
        assert!(favorites.is_empty());
        assert_eq!(store.get(FAVORITES_KEY).await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_favorites_migrate_on_first_write() {
        let store = MemoryStore::new();
        store
            .set(FAVORITES_KEY, r#"[{"id": 1, "title": "Backpack"}]"#.to_string())
            .await
            .unwrap();

        let ledger = FavoritesLedger::new(store.clone());
        ledger.toggle(ProductId::new(2)).await.unwrap();

        assert_eq!(store.get(FAVORITES_KEY).await.unwrap().as_deref(), Some("[1,2]"));
    }
}
