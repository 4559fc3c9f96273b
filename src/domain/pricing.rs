//! Pricing engine.
//!
//! One pure projection from cart lines to a [`Quote`]. The cart summary and
//! the checkout review both call [`quote`], so the two views cannot drift.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::domain::aggregates::CartLine;
use crate::domain::value_objects::Money;

/// Shipping and tax constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Subtotals strictly above this ship free.
    pub free_shipping_threshold: Money,
    pub flat_shipping_fee: Money,
    pub tax_rate: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Money::from_cents(5000),
            flat_shipping_fee: Money::from_cents(599),
            tax_rate: Decimal::new(10, 2),
        }
    }
}

impl PricingPolicy {
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal > self.free_shipping_threshold { Money::ZERO } else { self.flat_shipping_fee }
    }

    pub fn tax_for(&self, subtotal: Money) -> Money { subtotal.scale(self.tax_rate).round() }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub item_count: usize,
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
    #[serde(skip)]
    threshold: Money,
}

impl Quote {
    pub fn qualifies_for_free_shipping(&self) -> bool { self.subtotal > self.threshold }

    /// How much more the shopper has to add before shipping is waived.
    /// Zero once free shipping applies; otherwise at least one cent.
    pub fn amount_to_free_shipping(&self) -> Money {
        if self.qualifies_for_free_shipping() { return Money::ZERO; }
        self.threshold.saturating_sub(self.subtotal) + Money::from_cents(1)
    }
}

pub fn quote(lines: &[CartLine], policy: &PricingPolicy) -> Quote {
    let subtotal: Money = lines.iter().map(CartLine::line_total).sum();
    let shipping = policy.shipping_for(subtotal);
    let tax = policy.tax_for(subtotal);
    Quote {
        item_count: lines.len(),
        subtotal,
        shipping,
        tax,
        total: (subtotal + shipping + tax).round(),
        threshold: policy.free_shipping_threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{Cart, Product};
    use crate::domain::value_objects::ProductId;
    use proptest::prelude::*;

    fn cart_of(items: &[(u64, u64, u32)]) -> Cart {
        let mut cart = Cart::new();
        for &(id, cents, qty) in items {
            let p = Product::new(id, format!("P{id}"), Money::from_cents(cents), "misc");
            for _ in 0..qty { cart.add_item(&p); }
        }
        cart
    }

    #[test]
    fn test_reference_scenario() {
        let cart = cart_of(&[(1, 2000, 2), (2, 999, 1)]);
        let q = quote(cart.lines(), &PricingPolicy::default());
        assert_eq!(q.subtotal, Money::from_cents(4999));
        assert_eq!(q.shipping, Money::from_cents(599));
        assert_eq!(q.tax, Money::from_cents(500));
        assert_eq!(q.total, Money::from_cents(6098));
        assert_eq!(q.item_count, 2);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let policy = PricingPolicy::default();
        let at = quote(cart_of(&[(1, 5000, 1)]).lines(), &policy);
        assert_eq!(at.shipping, Money::from_cents(599));
        assert!(!at.qualifies_for_free_shipping());
        assert_eq!(at.amount_to_free_shipping(), Money::from_cents(1));

        let above = quote(cart_of(&[(1, 5001, 1)]).lines(), &policy);
        assert_eq!(above.shipping, Money::ZERO);
        assert_eq!(above.amount_to_free_shipping(), Money::ZERO);
    }

    #[test]
    fn test_empty_cart_still_pays_flat_shipping() {
        let q = quote(&[], &PricingPolicy::default());
        assert_eq!(q.subtotal, Money::ZERO);
        assert_eq!(q.shipping, Money::from_cents(599));
        assert_eq!(q.tax, Money::ZERO);
        assert_eq!(q.total, Money::from_cents(599));
    }

    #[test]
    fn test_custom_policy() {
        let policy = PricingPolicy {
            free_shipping_threshold: Money::from_cents(10000),
            flat_shipping_fee: Money::from_cents(1000),
            tax_rate: Decimal::new(5, 2),
        };
        let q = quote(cart_of(&[(1, 6000, 1)]).lines(), &policy);
        assert_eq!(q.shipping, Money::from_cents(1000));
        assert_eq!(q.tax, Money::from_cents(300));
        assert_eq!(q.total, Money::from_cents(7300));
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 0.05 * 0.10 = 0.005 -> 0.01
        let q = quote(cart_of(&[(1, 5, 1)]).lines(), &PricingPolicy::default());
        assert_eq!(q.tax, Money::from_cents(1));
    }

    proptest! {
        #[test]
        fn prop_raising_quantity_never_lowers_subtotal(
            prices in proptest::collection::vec(0u64..10_000, 1..6),
            pick in 0usize..6,
        ) {
            let items: Vec<(u64, u64, u32)> = prices.iter().enumerate().map(|(i, c)| (i as u64 + 1, *c, 1)).collect();
            let mut cart = cart_of(&items);
            let policy = PricingPolicy::default();
            let before = quote(cart.lines(), &policy);
            let target = ProductId::new((pick % prices.len()) as u64 + 1);
            cart.increase_quantity(target);
            let after = quote(cart.lines(), &policy);
            prop_assert!(after.subtotal >= before.subtotal);
            prop_assert!(after.tax >= before.tax);
            // total is monotone as long as the shipping tier stays put
            if after.shipping == before.shipping {
                prop_assert!(after.total >= before.total);
            }
        }
    }
}
