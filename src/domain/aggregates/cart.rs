//! Cart Aggregate

use serde::Serialize;
use tracing::debug;
use crate::domain::aggregates::Product;
use crate::domain::events::CartEvent;
use crate::domain::value_objects::{Money, ProductId, Quantity};

/// Ordered line items, at most one per product.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    #[serde(skip)]
    events: Vec<CartEvent>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartLine {
    product: Product,
    quantity: Quantity,
}

impl CartLine {
    pub fn product_id(&self) -> ProductId { self.product.id }
    pub fn product(&self) -> &Product { &self.product }
    pub fn unit_price(&self) -> Money { self.product.price }
    pub fn quantity(&self) -> u32 { self.quantity.value() }
    /// Rounded to cents before it joins the subtotal.
    pub fn line_total(&self) -> Money { self.product.price.multiply(self.quantity.value()).round() }
}

impl Cart {
    pub fn new() -> Self { Self::default() }

    pub fn lines(&self) -> &[CartLine] { &self.lines }
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> { self.lines.iter().find(|l| l.product.id == product_id) }
    pub fn contains(&self, product_id: ProductId) -> bool { self.line(product_id).is_some() }
    pub fn quantity_of(&self, product_id: ProductId) -> Option<u32> { self.line(product_id).map(CartLine::quantity) }
    pub fn line_count(&self) -> usize { self.lines.len() }
    pub fn total_units(&self) -> u32 { self.lines.iter().map(CartLine::quantity).sum() }
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }

    /// Re-adding bumps the quantity; the first snapshot is kept.
    pub fn add_item(&mut self, product: &Product) {
        if let Some(existing) = self.line_mut(product.id) {
            existing.quantity = existing.quantity.increment();
            let quantity = existing.quantity.value();
            debug!(product_id = %product.id, quantity, "cart quantity incremented on re-add");
            self.events.push(CartEvent::QuantityChanged { product_id: product.id, quantity });
        } else {
            self.lines.push(CartLine { product: product.clone(), quantity: Quantity::ONE });
            debug!(product_id = %product.id, "cart line added");
            self.events.push(CartEvent::ItemAdded { product_id: product.id });
        }
    }

    pub fn remove_item(&mut self, product_id: ProductId) {
        let before = self.lines.len();
        self.lines.retain(|l| l.product.id != product_id);
        if self.lines.len() != before {
            debug!(%product_id, "cart line removed");
            self.events.push(CartEvent::ItemRemoved { product_id });
        }
    }

    pub fn increase_quantity(&mut self, product_id: ProductId) {
        let Some(line) = self.line_mut(product_id) else { return };
        line.quantity = line.quantity.increment();
        let quantity = line.quantity.value();
        self.events.push(CartEvent::QuantityChanged { product_id, quantity });
    }

    /// Stops at one; deleting a line is `remove_item`'s job.
    pub fn decrease_quantity(&mut self, product_id: ProductId) {
        let Some(line) = self.line_mut(product_id) else { return };
        let Some(lower) = line.quantity.decrement() else { return };
        line.quantity = lower;
        self.events.push(CartEvent::QuantityChanged { product_id, quantity: lower.value() });
    }

    pub fn clear(&mut self) {
        if self.lines.is_empty() { return; }
        self.lines.clear();
        debug!("cart cleared");
        self.events.push(CartEvent::Cleared);
    }

    pub fn take_events(&mut self) -> Vec<CartEvent> { std::mem::take(&mut self.events) }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> { self.lines.iter_mut().find(|l| l.product.id == product_id) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn product(id: u64, cents: u64) -> Product {
        Product::new(id, format!("Product {id}"), Money::from_cents(cents), "misc")
    }

    #[test]
    fn test_cart_operations() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 2000));
        cart.add_item(&product(2, 999));
        cart.add_item(&product(1, 2000));
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.quantity_of(ProductId::new(1)), Some(2));
        assert_eq!(cart.total_units(), 3);
        // insertion order preserved
        assert_eq!(cart.lines()[0].product_id(), ProductId::new(1));
        assert_eq!(cart.lines()[1].product_id(), ProductId::new(2));
    }

    #[test]
    fn test_re_add_keys_on_identity_not_content() {
        let mut cart = Cart::new();
        cart.add_item(&product(7, 1000));
        let mut changed = product(7, 5000);
        changed.title = "Renamed".into();
        cart.add_item(&changed);
        assert_eq!(cart.line_count(), 1);
        let line = cart.line(ProductId::new(7)).unwrap();
        assert_eq!(line.quantity(), 2);
        assert_eq!(line.unit_price(), Money::from_cents(1000));
        assert_eq!(line.product().title, "Product 7");
    }

    #[test]
    fn test_decrease_stops_at_one() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 100));
        cart.increase_quantity(ProductId::new(1));
        cart.decrease_quantity(ProductId::new(1));
        cart.decrease_quantity(ProductId::new(1));
        cart.decrease_quantity(ProductId::new(1));
        assert_eq!(cart.quantity_of(ProductId::new(1)), Some(1));
    }

    #[test]
    fn test_absent_ids_are_noops() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 100));
        cart.take_events();
        cart.remove_item(ProductId::new(9));
        cart.increase_quantity(ProductId::new(9));
        cart.decrease_quantity(ProductId::new(9));
        cart.decrease_quantity(ProductId::new(1));
        assert_eq!(cart.line_count(), 1);
        assert!(cart.take_events().is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 100));
        cart.add_item(&product(2, 100));
        cart.remove_item(ProductId::new(1));
        assert!(!cart.contains(ProductId::new(1)));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(
            cart.take_events(),
            vec![
                CartEvent::ItemAdded { product_id: ProductId::new(1) },
                CartEvent::ItemAdded { product_id: ProductId::new(2) },
                CartEvent::ItemRemoved { product_id: ProductId::new(1) },
                CartEvent::Cleared,
            ]
        );
    }

    #[test]
    fn test_line_total_rounds_per_line() {
        let mut cart = Cart::new();
        let mut p = product(1, 0);
        p.price = "0.333".parse().unwrap();
        cart.add_item(&p);
        cart.increase_quantity(ProductId::new(1));
        assert_eq!(cart.lines()[0].line_total(), Money::from_cents(67));
    }

    proptest! {
        #[test]
        fn prop_decrease_converges_to_one(ups in 0usize..20, downs in 0usize..40) {
            let mut cart = Cart::new();
            cart.add_item(&product(1, 100));
            for _ in 0..ups { cart.increase_quantity(ProductId::new(1)); }
            for _ in 0..downs {
                cart.decrease_quantity(ProductId::new(1));
                prop_assert!(cart.quantity_of(ProductId::new(1)).unwrap() >= 1);
            }
            let expected = (1 + ups).saturating_sub(downs).max(1) as u32;
            prop_assert_eq!(cart.quantity_of(ProductId::new(1)), Some(expected));
        }
    }
}
