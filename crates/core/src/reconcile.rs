//! Joins cart lines against live catalog data for display.
//!
//! Live product data wins; the snapshot stored with each cart line is used
//! when the catalog is unavailable or no longer lists the product.

use crate::cart::{Cart, CartItem};
use crate::product::{Product, find_product};
use crate::types::{Price, ProductId, Quantity};

/// Display name used when neither catalog nor snapshot has one.
pub const FALLBACK_NAME: &str = "Product";

/// One rendered cart row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartViewRow {
    /// Position in the cart, used by positional list controls.
    pub index: usize,
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub image: String,
    pub quantity: Quantity,
    pub subtotal: Price,
}

/// The reconciled cart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CartView {
    pub rows: Vec<CartViewRow>,
    pub total: Price,
    /// Sum of quantities.
    pub item_count: u64,
    /// Set when the catalog could not be fetched and only snapshots were used.
    pub degraded: bool,
}

impl CartView {
    /// The empty-cart sentinel.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total with two decimals; `"0.00"` for an empty cart.
    #[must_use]
    pub fn total_display(&self) -> String {
        self.total.display()
    }
}

/// Reconcile `cart` against `catalog`.
///
/// `None` means the catalog could not be fetched: rows are built from
/// snapshots alone and the view is flagged as degraded.
#[must_use]
pub fn build_cart_view(cart: &Cart, catalog: Option<&[Product]>) -> CartView {
    let rows: Vec<CartViewRow> = cart
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let live = catalog.and_then(|products| find_product(products, item.id));
            build_row(index, item, live)
        })
        .collect();

    CartView {
        total: rows.iter().map(|row| row.subtotal).sum(),
        item_count: cart.item_count(),
        degraded: catalog.is_none(),
        rows,
    }
}

fn build_row(index: usize, item: &CartItem, live: Option<&Product>) -> CartViewRow {
    let name = live
        .map(|p| p.title.as_str())
        .filter(|title| !title.is_empty())
        .or(item.name.as_deref())
        .unwrap_or(FALLBACK_NAME)
        .to_string();
    let unit_price = live
        .map(|p| p.price)
        .or(item.price)
        .unwrap_or(Price::ZERO);
    let image = live
        .map(|p| p.image.as_str())
        .filter(|image| !image.is_empty())
        .or(item.image.as_deref())
        .unwrap_or_default()
        .to_string();

    CartViewRow {
        index,
        product_id: item.id,
        name,
        unit_price,
        image,
        quantity: item.quantity,
        subtotal: unit_price.times(item.quantity),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::product::Rating;

    fn product(id: i32, title: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Price::from_cents(cents),
            description: String::new(),
            category: "misc".to_string(),
            image: format!("https://img.test/{id}.png"),
            rating: Rating::default(),
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(&product(1, "Old Backpack", 1000));
        cart.add(&product(1, "Old Backpack", 1000));
        cart.add(&product(2, "Mug", 450));
        cart
    }

    #[test]
    fn test_empty_cart_sentinel() {
        let view = build_cart_view(&Cart::new(), Some(&[][..]));
        assert!(view.is_empty());
        assert_eq!(view.total_display(), "0.00");
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn test_prefers_live_catalog_data() {
        let catalog = vec![product(1, "New Backpack", 1250), product(2, "Mug", 450)];
        let view = build_cart_view(&cart(), Some(catalog.as_slice()));

        assert!(!view.degraded);
        assert_eq!(view.rows[0].name, "New Backpack");
        assert_eq!(view.rows[0].unit_price.display(), "12.50");
        assert_eq!(view.rows[0].subtotal.display(), "25.00");
        assert_eq!(view.total_display(), "29.50");
        assert_eq!(view.item_count, 3);
    }

    #[test]
    fn test_falls_back_to_snapshot_when_catalog_missing() {
        let view = build_cart_view(&cart(), None);

        assert!(view.degraded);
        assert_eq!(view.rows[0].name, "Old Backpack");
        assert_eq!(view.rows[0].subtotal.display(), "20.00");
        assert_eq!(view.rows[1].subtotal.display(), "4.50");
        assert_eq!(view.total_display(), "24.50");
    }

    #[test]
    fn test_falls_back_per_item_when_catalog_lacks_id() {
        let catalog = vec![product(2, "Big Mug", 500)];
        let view = build_cart_view(&cart(), Some(catalog.as_slice()));

        assert!(!view.degraded);
        assert_eq!(view.rows[0].name, "Old Backpack");
        assert_eq!(view.rows[1].name, "Big Mug");
        assert_eq!(view.total_display(), "25.00");
    }

    #[test]
    fn test_snapshot_gaps_use_defaults() {
        let cart: Cart = serde_json::from_str(r#"[{"id": 9, "quantity": 2}]"#).unwrap();
        let view = build_cart_view(&cart, None);

        let row = &view.rows[0];
        assert_eq!(row.name, FALLBACK_NAME);
        assert_eq!(row.unit_price, Price::ZERO);
        assert!(row.image.is_empty());
        assert_eq!(view.total_display(), "0.00");
    }

    #[test]
    fn test_rows_carry_positions() {
        let view = build_cart_view(&cart(), None);
        let indexes: Vec<usize> = view.rows.iter().map(|row| row.index).collect();
        assert_eq!(indexes, vec![0, 1]);
    }
}
