//! Cart commands.

use std::fmt::Write as _;

use bazaar_core::{CartLedger, CartView, KeyValueStore, ProductId};
use bazaar_storefront::catalog::CatalogClient;
use bazaar_storefront::services::cart::{add_to_cart, cart_view, reconcile};

use super::{CommandError, print, row_index};

/// Numbered rows, then the total.
pub fn format_cart(view: &CartView) -> String {
    if view.is_empty() {
        return "Your cart is empty.".to_string();
    }

    let mut out = String::new();
    if view.degraded {
        out.push_str("(catalog unavailable, prices as added)\n");
    }
    for row in &view.rows {
        let _ = writeln!(
            out,
            "{:>3}. {} x{} @ ${} = ${}",
            row.index + 1,
            row.name,
            row.quantity,
            row.unit_price,
            row.subtotal,
        );
    }
    let _ = write!(
        out,
        "Total: ${} ({} item{})",
        view.total_display(),
        view.item_count,
        if view.item_count == 1 { "" } else { "s" }
    );
    out
}

/// Show the reconciled cart.
pub async fn show<S: KeyValueStore>(
    store: &S,
    catalog: &CatalogClient,
) -> Result<(), CommandError> {
    let view = cart_view(&CartLedger::new(store), catalog).await?;
    print(format_cart(&view));
    Ok(())
}

/// Add one unit of `product_id`.
pub async fn add<S: KeyValueStore>(
    store: &S,
    catalog: &CatalogClient,
    product_id: i32,
) -> Result<(), CommandError> {
    let ledger = CartLedger::new(store);
    if !add_to_cart(&ledger, catalog, ProductId::new(product_id)).await? {
        return Err(CommandError::UnknownProduct(product_id));
    }

    tracing::info!(product_id, "Added to cart");
    show(store, catalog).await
}

/// Change the quantity of `row` by `delta`.
pub async fn change<S: KeyValueStore>(
    store: &S,
    catalog: &CatalogClient,
    row: usize,
    delta: i64,
) -> Result<(), CommandError> {
    let cart = CartLedger::new(store)
        .change_quantity(row_index(row)?, delta)
        .await?;
    print(format_cart(&reconcile(&cart, catalog).await));
    Ok(())
}

/// Set the quantity of `row` from raw input.
pub async fn set<S: KeyValueStore>(
    store: &S,
    catalog: &CatalogClient,
    row: usize,
    quantity: &str,
) -> Result<(), CommandError> {
    let cart = CartLedger::new(store)
        .set_quantity(row_index(row)?, quantity)
        .await?;
    print(format_cart(&reconcile(&cart, catalog).await));
    Ok(())
}

/// Remove `row`.
pub async fn remove<S: KeyValueStore>(
    store: &S,
    catalog: &CatalogClient,
    row: usize,
) -> Result<(), CommandError> {
    let cart = CartLedger::new(store).remove(row_index(row)?).await?;
    print(format_cart(&reconcile(&cart, catalog).await));
    Ok(())
}

/// Empty the cart.
pub async fn clear<S: KeyValueStore>(store: &S) -> Result<(), CommandError> {
    CartLedger::new(store).clear().await?;
    print("Cart cleared.");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::{Cart, CartItem, Price, Quantity, build_cart_view};

    use super::*;

    fn item(id: i32, name: &str, cents: i64, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: Some(name.to_string()),
            price: Some(Price::from_cents(cents)),
            image: None,
            quantity: Quantity::new(quantity),
        }
    }

    #[test]
    fn test_format_empty_cart() {
        assert_eq!(format_cart(&CartView::empty()), "Your cart is empty.");
    }

    #[test]
    fn test_format_rows_are_numbered_from_one() {
        let cart = Cart::from_items(vec![item(1, "Backpack", 10995, 1), item(2, "Mug", 450, 2)]);
        let out = format_cart(&build_cart_view(&cart, None));

        assert!(out.starts_with("(catalog unavailable"));
        assert!(out.contains("  1. Backpack x1 @ $109.95 = $109.95"));
        assert!(out.contains("  2. Mug x2 @ $4.50 = $9.00"));
        assert!(out.ends_with("Total: $118.95 (3 items)"));
    }
}
