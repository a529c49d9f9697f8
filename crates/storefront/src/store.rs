//! Session-backed persistent store.
//!
//! The visitor's session plays the role of the browser's local storage: each
//! ledger value is a JSON string under its own session key, and every write is
//! flushed to the session store before the handler continues.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bazaar_core::{KeyValueStore, StoreError};
use tower_sessions::Session;

/// Session keys used by the storefront.
pub mod keys {
    pub use bazaar_core::store::{CART_KEY as CART, FAVORITES_KEY as FAVORITES};

    /// Phase of the current checkout attempt.
    pub const CHECKOUT: &str = "checkout";
}

/// [`KeyValueStore`] over a `tower-sessions` session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    session: Session,
}

impl SessionStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

fn backend(e: tower_sessions::session::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl KeyValueStore for SessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.session.get::<String>(key).await.map_err(backend)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.session.insert(key, value).await.map_err(backend)?;
        self.session.save().await.map_err(backend)
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.session
            .remove::<String>(key)
            .await
            .map_err(backend)?;
        self.session.save().await.map_err(backend)
    }
}

impl<S> FromRequestParts<S> for SessionStore
where
    S: Send + Sync,
{
    type Rejection = <Session as FromRequestParts<S>>::Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Session::from_request_parts(parts, state)
            .await
            .map(Self::new)
    }
}
