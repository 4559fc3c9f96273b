//! Domain events
//!
//! Stores buffer one event per effective mutation; views drain them with
//! `take_events` to decide what to re-render. No-op calls raise nothing.
use crate::domain::value_objects::ProductId;
use serde::Serialize;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum DomainEvent {
    Cart(CartEvent),
    Wishlist(WishlistEvent),
    Checkout(CheckoutEvent),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum CartEvent {
    ItemAdded { product_id: ProductId },
    QuantityChanged { product_id: ProductId, quantity: u32 },
    ItemRemoved { product_id: ProductId },
    Cleared,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum WishlistEvent {
    ItemAdded { product_id: ProductId },
    ItemRemoved { product_id: ProductId },
    Cleared,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum CheckoutEvent {
    StepChanged { step: usize },
    SubmissionStarted,
    OrderConfirmed { order_id: String },
    ReturnToCatalog { after: Duration },
}

impl From<CartEvent> for DomainEvent {
    fn from(e: CartEvent) -> Self { DomainEvent::Cart(e) }
}

impl From<WishlistEvent> for DomainEvent {
    fn from(e: WishlistEvent) -> Self { DomainEvent::Wishlist(e) }
}

impl From<CheckoutEvent> for DomainEvent {
    fn from(e: CheckoutEvent) -> Self { DomainEvent::Checkout(e) }
}
