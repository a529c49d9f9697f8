//! Bazaar Core - Domain types and ledgers.
//!
//! This crate holds everything about the storefront that does not depend on
//! a transport or a UI:
//! - `bazaar-storefront` - Server-rendered web storefront
//! - `bazaar-cli` - Terminal client over the same ledgers
//!
//! # Architecture
//!
//! The core crate performs no network or file I/O. Persistence goes through
//! the [`store::KeyValueStore`] trait, which each front end implements for
//! its own backing store (session, file, memory).
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, quantities, emails, and statuses
//! - [`product`] - Catalog product records
//! - [`cart`] - Cart ledger with per-line product snapshots
//! - [`favorites`] - Favorites ledger and legacy-shape migration
//! - [`catalog`] - Category/search view model over the catalog
//! - [`ledger`] - Load-mutate-save operations over the repositories
//! - [`reconcile`] - Cart rows joined against live catalog data
//! - [`checkout`] - Form validation and the order state machine
//! - [`store`] - Key-value store and repository traits

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod favorites;
pub mod ledger;
pub mod product;
pub mod reconcile;
pub mod store;
pub mod types;

pub use cart::{Cart, CartItem};
pub use catalog::{CatalogView, CategoryFilter, StarRating, category_label};
pub use checkout::{Checkout, CheckoutForm, Confirmation, FieldErrors, SubmitOutcome};
pub use favorites::Favorites;
pub use ledger::{CartLedger, FavoritesLedger};
pub use product::{Product, Rating};
pub use reconcile::{CartView, CartViewRow, build_cart_view};
pub use store::{CartRepository, FavoritesRepository, KeyValueStore, MemoryStore, StoreError};
pub use types::*;
