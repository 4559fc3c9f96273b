//! Storefront commerce state engine
//!
//! Client-side state for a small online shop, independent of any UI.
//!
//! ## Features
//! - Catalog lookup and search
//! - Cart and wishlist stores with change events
//! - Pricing: subtotal, flat-rate shipping, tax, total
//! - Sign-in gate for additive actions
//! - Three-step checkout with simulated order placement

pub mod catalog;
pub mod config;
pub mod domain;
pub mod session;
pub mod storefront;

use thiserror::Error;

pub use catalog::{Catalog, CatalogError};
pub use config::{ConfigError, StorefrontConfig};
pub use domain::aggregates::{Cart, CartLine, Checkout, CheckoutError, CheckoutStep, OrderConfirmation, Product, Wishlist};
pub use domain::events::DomainEvent;
pub use domain::pricing::{quote, PricingPolicy, Quote};
pub use domain::value_objects::{Money, ProductId, Quantity};
pub use session::{AccessGate, Session, SessionObserver, SessionSource};
pub use storefront::Storefront;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("Sign in to continue")]
    AuthenticationRequired,

    #[error("No checkout in progress")]
    NoCheckout,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
