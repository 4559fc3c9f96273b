//! Wishlist Aggregate

use serde::Serialize;
use tracing::debug;
use crate::domain::aggregates::Product;
use crate::domain::events::WishlistEvent;
use crate::domain::value_objects::ProductId;

/// Saved products in insertion order, unique by id.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Wishlist {
    items: Vec<Product>,
    #[serde(skip)]
    events: Vec<WishlistEvent>,
}

impl Wishlist {
    pub fn new() -> Self { Self::default() }

    pub fn items(&self) -> &[Product] { &self.items }
    pub fn get(&self, product_id: ProductId) -> Option<&Product> { self.items.iter().find(|p| p.id == product_id) }
    pub fn contains(&self, product_id: ProductId) -> bool { self.get(product_id).is_some() }
    pub fn len(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn add_item(&mut self, product: &Product) {
        if self.contains(product.id) { return; }
        self.items.push(product.clone());
        debug!(product_id = %product.id, "wishlist entry added");
        self.events.push(WishlistEvent::ItemAdded { product_id: product.id });
    }

    pub fn remove_item(&mut self, product_id: ProductId) {
        let before = self.items.len();
        self.items.retain(|p| p.id != product_id);
        if self.items.len() != before {
            debug!(%product_id, "wishlist entry removed");
            self.events.push(WishlistEvent::ItemRemoved { product_id });
        }
    }

    /// Returns whether the product is saved afterwards.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.contains(product.id) {
            self.remove_item(product.id);
            false
        } else {
            self.add_item(product);
            true
        }
    }

    pub fn clear(&mut self) {
        if self.items.is_empty() { return; }
        self.items.clear();
        self.events.push(WishlistEvent::Cleared);
    }

    pub fn take_events(&mut self) -> Vec<WishlistEvent> { std::mem::take(&mut self.events) }
}
