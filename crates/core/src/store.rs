//! Persistent key-value store and the cart/favorites repositories on top of it.
//!
//! A [`KeyValueStore`] holds JSON text under string keys. The storefront backs
//! it with the visitor's session, the CLI with a file, and tests with
//! [`MemoryStore`]. Every store is a [`CartRepository`] and a
//! [`FavoritesRepository`] through the blanket impls below.
//!
//! Reading is forgiving: a missing key, or a value that does not parse, reads
//! as an empty sequence. Only backend failures are errors.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::cart::Cart;
use crate::favorites::Favorites;

/// Key holding the cart.
pub const CART_KEY: &str = "cart";

/// Key holding the favorites list.
pub const FAVORITES_KEY: &str = "favorites";

/// Errors raised by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not read or write.
    #[error("Store backend error: {0}")]
    Backend(String),

    /// A value could not be encoded for writing.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String-keyed storage of JSON text.
pub trait KeyValueStore: Send + Sync {
    /// Raw value under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Replace the value under `key`.
    fn set(&self, key: &str, value: String)
    -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete `key`. Deleting a missing key succeeds.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Read `key` as JSON, treating absent or malformed values as `T::default()`.
///
/// # Errors
///
/// Returns an error only if the backend read fails.
pub async fn read_json<S, T>(store: &S, key: &str) -> Result<T, StoreError>
where
    S: KeyValueStore,
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.get(key).await? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::debug!(key, error = %e, "discarding malformed stored value");
            Ok(T::default())
        }
    }
}

/// Write `value` under `key` as JSON.
///
/// # Errors
///
/// Returns an error if encoding or the backend write fails.
pub async fn write_json<S, T>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    S: KeyValueStore,
    T: Serialize + Sync,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, raw).await
}

/// Durable owner of the cart.
pub trait CartRepository: Send + Sync {
    fn load_cart(&self) -> impl Future<Output = Result<Cart, StoreError>> + Send;
    fn save_cart(&self, cart: &Cart) -> impl Future<Output = Result<(), StoreError>> + Send;
    fn clear_cart(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Durable owner of the favorites list.
pub trait FavoritesRepository: Send + Sync {
    fn load_favorites(&self) -> impl Future<Output = Result<Favorites, StoreError>> + Send;
    fn save_favorites(
        &self,
        favorites: &Favorites,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl<S: KeyValueStore> CartRepository for S {
    async fn load_cart(&self) -> Result<Cart, StoreError> {
        read_json(self, CART_KEY).await
    }

    async fn save_cart(&self, cart: &Cart) -> Result<(), StoreError> {
        write_json(self, CART_KEY, cart).await
    }

    async fn clear_cart(&self) -> Result<(), StoreError> {
        self.remove(CART_KEY).await
    }
}

impl<S: KeyValueStore> FavoritesRepository for S {
    async fn load_favorites(&self) -> Result<Favorites, StoreError> {
        read_json(self, FAVORITES_KEY).await
    }

    async fn save_favorites(&self, favorites: &Favorites) -> Result<(), StoreError> {
        write_json(self, FAVORITES_KEY, favorites).await
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send {
        (**self).get(key)
    }

    fn set(
        &self,
        key: &str,
        value: String,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).remove(key)
    }
}

/// In-process store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<R>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> R,
    ) -> Result<R, StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(f(&mut entries))
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value);
        })
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }
}
