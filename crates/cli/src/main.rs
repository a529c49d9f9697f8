//! Bazaar CLI - Browse the catalog and manage a cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally filtered
//! bazaar products --category jewelery --search ring
//!
//! # Search as you type (one line per keystroke batch, `:category <name>` to filter,
//! # `:clear` to drop the search)
//! bazaar browse
//!
//! # Manage the cart and favorites
//! bazaar cart add 5
//! bazaar cart set 1 3
//! bazaar favorites toggle 5
//!
//! # Place a mock order
//! bazaar checkout --name "Jane Doe" --email jane@example.com --address "1 Main Street"
//! ```
//!
//! Cart, favorites, and checkout state persist in a JSON file
//! (`--store`, default `bazaar-store.json`). The catalog location and timings
//! come from the same environment variables as the storefront.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use bazaar_storefront::catalog::CatalogClient;
use bazaar_storefront::config::StorefrontConfig;
use clap::{Parser, Subcommand};

mod commands;
mod store;

use commands::CommandError;
use store::FileStore;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar storefront from the terminal")]
struct Cli {
    /// File holding cart, favorites, and checkout state
    #[arg(long, global = true, default_value = "bazaar-store.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only show this category (`all` for every category)
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Only show products whose title or description contains this text
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// List categories
    Categories,
    /// Search interactively, reading input lines from stdin
    Browse,
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Place a mock order for the cart
    Checkout {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        address: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with live prices
    Show,
    /// Add one unit of a product
    Add { product_id: i32 },
    /// Increase the quantity of a row by one
    Increase { row: usize },
    /// Decrease the quantity of a row by one
    Decrease { row: usize },
    /// Set the quantity of a row
    Set { row: usize, quantity: String },
    /// Remove a row
    Remove { row: usize },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// Show favorite products
    Show,
    /// Add or remove a favorite
    Toggle { product_id: i32 },
    /// Remove a favorite
    Remove { product_id: i32 },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bazaar_cli=info,warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let config = StorefrontConfig::from_env()?;
    let catalog = CatalogClient::new(&config.catalog);
    let store = FileStore::new(cli.store);

    match cli.command {
        Commands::Products { category, search } => {
            commands::catalog::list(&catalog, &store, &category, &search).await?;
        }
        Commands::Categories => commands::catalog::categories(&catalog).await?,
        Commands::Browse => commands::catalog::browse(&catalog, config.search_debounce).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&store, &catalog).await?,
            CartAction::Add { product_id } => {
                commands::cart::add(&store, &catalog, product_id).await?;
            }
            CartAction::Increase { row } => {
                commands::cart::change(&store, &catalog, row, 1).await?;
            }
            CartAction::Decrease { row } => {
                commands::cart::change(&store, &catalog, row, -1).await?;
            }
            CartAction::Set { row, quantity } => {
                commands::cart::set(&store, &catalog, row, &quantity).await?;
            }
            CartAction::Remove { row } => commands::cart::remove(&store, &catalog, row).await?,
            CartAction::Clear => commands::cart::clear(&store).await?,
        },
        Commands::Favorites { action } => match action {
            FavoritesAction::Show => commands::favorites::show(&store, &catalog).await?,
            FavoritesAction::Toggle { product_id } => {
                commands::favorites::toggle(&store, product_id).await?;
            }
            FavoritesAction::Remove { product_id } => {
                commands::favorites::remove(&store, product_id).await?;
            }
        },
        Commands::Checkout {
            name,
            email,
            address,
        } => {
            let form = bazaar_core::CheckoutForm {
                name,
                email,
                address,
            };
            commands::checkout::place_order(&store, &form, config.checkout.latency).await?;
        }
    }
    Ok(())
}
