//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Catalog-aware cart operations (add by id, reconciled view)
//! - `checkout` - Mock order placement with persisted phase

pub mod cart;
pub mod checkout;

pub use checkout::{CheckoutResult, CheckoutService};
