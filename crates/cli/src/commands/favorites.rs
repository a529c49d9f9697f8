//! Favorites commands.

use bazaar_core::{FavoritesLedger, KeyValueStore, ProductId};
use bazaar_storefront::catalog::CatalogClient;

use super::catalog::format_products;
use super::{CommandError, print};

/// Show favorite products the catalog still lists.
pub async fn show<S: KeyValueStore>(
    store: &S,
    catalog: &CatalogClient,
) -> Result<(), CommandError> {
    let favorites = FavoritesLedger::new(store).load().await?;
    if favorites.is_empty() {
        print("No favorites yet.");
        return Ok(());
    }

    let products = catalog.products().await?;
    print(format_products(favorites.resolve(&products), &favorites).trim_end());
    Ok(())
}

/// Flip the favorite flag of `product_id`.
pub async fn toggle<S: KeyValueStore>(store: &S, product_id: i32) -> Result<(), CommandError> {
    let added = FavoritesLedger::new(store)
        .toggle(ProductId::new(product_id))
        .await?;

    if added {
        print(format_args!("Added {product_id} to favorites."));
    } else {
        print(format_args!("Removed {product_id} from favorites."));
    }
    Ok(())
}

/// Remove `product_id` from favorites.
pub async fn remove<S: KeyValueStore>(store: &S, product_id: i32) -> Result<(), CommandError> {
    let favorites = FavoritesLedger::new(store)
        .remove(ProductId::new(product_id))
        .await?;
    print(format_args!("{} favorite(s) left.", favorites.len()));
    Ok(())
}
