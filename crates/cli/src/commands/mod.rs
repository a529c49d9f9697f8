//! Command implementations.
//!
//! Each command loads what it needs from the store and the catalog, performs
//! one operation through the core ledgers, and prints the result to stdout.
//! Formatting lives in plain functions so it can be tested without a
//! terminal.

use std::fmt::Display;

use bazaar_core::StoreError;
use bazaar_storefront::catalog::CatalogError;
use bazaar_storefront::config::ConfigError;
use thiserror::Error;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod favorites;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The catalog could not be fetched.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The store file could not be read or written.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Reading input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Row numbers start at 1.
    #[error("Invalid row: {0}. Rows are numbered from 1")]
    InvalidRow(usize),

    /// The product is not in the catalog.
    #[error("Product {0} is not in the catalog")]
    UnknownProduct(i32),

    /// The checkout form failed validation.
    #[error("Checkout rejected: {0} invalid field(s)")]
    CheckoutRejected(usize),
}

/// Convert a 1-based row number to a cart index.
pub fn row_index(row: usize) -> Result<usize, CommandError> {
    row.checked_sub(1).ok_or(CommandError::InvalidRow(row))
}

/// Write command output to stdout.
#[allow(clippy::print_stdout)]
pub fn print(output: impl Display) {
    println!("{output}");
}
