//! Aggregates module
pub mod product;
pub mod cart;
pub mod wishlist;
pub mod checkout;

pub use product::{Product, Rating};
pub use cart::{Cart, CartLine};
pub use wishlist::Wishlist;
pub use checkout::{Checkout, CheckoutError, CheckoutStep, CheckoutTiming, OrderConfirmation, StepOutcome, Submission};
