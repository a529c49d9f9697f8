//! The cart ledger.
//!
//! A [`Cart`] is an ordered list of [`CartItem`]s with at most one entry per
//! product. Mutations are keyed by [`ProductId`]; list UIs that only know a
//! row position go through the `*_at` adapters, which resolve the position
//! to an id first.
//!
//! Each item carries a snapshot of the product's name, price and image taken
//! when it was first added, so the cart can still be shown when the catalog
//! is unreachable.

use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::types::{Price, ProductId, Quantity};

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    /// Product title at add time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unit price at add time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// Image URL at add time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub quantity: Quantity,
}

impl CartItem {
    /// Start a new line for `product` with quantity one.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: Some(product.title.clone()),
            price: Some(product.price),
            image: Some(product.image.clone()),
            quantity: Quantity::ONE,
        }
    }

    /// Line total computed from the snapshot price.
    #[must_use]
    pub fn snapshot_subtotal(&self) -> Price {
        self.price.unwrap_or(Price::ZERO).times(self.quantity)
    }
}

/// The shopping cart.
///
/// Serialized as a bare JSON array of items. Deserializing merges duplicate
/// ids (see [`Cart::from_items`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from raw items, merging duplicate ids.
    ///
    /// The first occurrence keeps its position and snapshot; quantities of
    /// later duplicates are added to it.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            match cart.items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.offset(i64::from(item.quantity.get()));
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Lines in display order.
    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    /// Lines as a slice.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities, shown on the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Row position of `id`, if present.
    #[must_use]
    pub fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Id of the line at `index`, if in range.
    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<ProductId> {
        self.items.get(index).map(|item| item.id)
    }

    /// Total computed from snapshot prices only.
    #[must_use]
    pub fn snapshot_total(&self) -> Price {
        self.items.iter().map(CartItem::snapshot_subtotal).sum()
    }

    /// Add one unit of `product`.
    ///
    /// Increments the existing line, or appends a new line with a snapshot of
    /// the product's current title, price and image.
    pub fn add(&mut self, product: &Product) {
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(item) => item.quantity = item.quantity.offset(1),
            None => self.items.push(CartItem::from_product(product)),
        }
    }

    /// Adjust the quantity of `id` by `delta`, never below one.
    ///
    /// Returns `false` if `id` is not in the cart.
    pub fn change_quantity(&mut self, id: ProductId, delta: i64) -> bool {
        self.line_mut(id).is_some_and(|item| {
            item.quantity = item.quantity.offset(delta);
            true
        })
    }

    /// Set the quantity of `id`.
    ///
    /// Returns `false` if `id` is not in the cart.
    pub fn set_quantity(&mut self, id: ProductId, quantity: Quantity) -> bool {
        self.line_mut(id).is_some_and(|item| {
            item.quantity = quantity;
            true
        })
    }

    /// Remove the line for `id`, preserving the order of the others.
    ///
    /// Returns `false` if `id` is not in the cart.
    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Positional form of [`Cart::change_quantity`]. Out of range is a no-op.
    pub fn change_quantity_at(&mut self, index: usize, delta: i64) -> bool {
        self.id_at(index)
            .is_some_and(|id| self.change_quantity(id, delta))
    }

    /// Positional form of [`Cart::set_quantity`] taking raw form input.
    ///
    /// Non-numeric input sets the quantity to one. Out of range is a no-op.
    pub fn set_quantity_at(&mut self, index: usize, raw: &str) -> bool {
        self.id_at(index)
            .is_some_and(|id| self.set_quantity(id, Quantity::parse_input(raw)))
    }

    /// Positional form of [`Cart::remove`]. Out of range is a no-op.
    ///
    /// Rows after `index` shift up by one.
    pub fn remove_at(&mut self, index: usize) -> bool {
        self.id_at(index).is_some_and(|id| self.remove(id))
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
