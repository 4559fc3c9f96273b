//! Application-root state container.
//!
//! Owns the cart, the wishlist and the current checkout draft, and is the
//! only path by which views mutate them. Additive actions consult the
//! [`AccessGate`] first; a rejected action never reaches a store. Removal,
//! quantity edits and clears are not gated.

use tracing::{info, warn};
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::domain::aggregates::{Cart, Checkout, OrderConfirmation, Product, Wishlist};
use crate::domain::events::DomainEvent;
use crate::domain::pricing::{quote, PricingPolicy, Quote};
use crate::domain::value_objects::ProductId;
use crate::session::{AccessGate, Session, SessionObserver};
use crate::{Result, StorefrontError};

#[derive(Debug)]
pub struct Storefront {
    catalog: Catalog,
    cart: Cart,
    wishlist: Wishlist,
    gate: AccessGate,
    config: StorefrontConfig,
    checkout: Option<Checkout>,
    events: Vec<DomainEvent>,
}

impl Storefront {
    pub fn new(catalog: Catalog, session: SessionObserver, config: StorefrontConfig) -> Self {
        Self {
            catalog, cart: Cart::new(), wishlist: Wishlist::new(), gate: AccessGate::new(session),
            config, checkout: None, events: vec![],
        }
    }

    pub fn catalog(&self) -> &Catalog { &self.catalog }
    pub fn cart(&self) -> &Cart { &self.cart }
    pub fn wishlist(&self) -> &Wishlist { &self.wishlist }
    pub fn session(&self) -> Option<Session> { self.gate.session() }
    pub fn pricing(&self) -> &PricingPolicy { &self.config.pricing }

    pub fn product(&self, id: ProductId) -> Result<&Product> { Ok(self.catalog.product(id)?) }
    pub fn search(&self, query: &str) -> Vec<&Product> { self.catalog.search(query).collect() }

    /// Shared by the cart summary and the checkout review.
    pub fn quote(&self) -> Quote { quote(self.cart.lines(), &self.config.pricing) }

    pub fn add_to_cart(&mut self, id: ProductId) -> Result<()> {
        self.authorize("add_to_cart", id)?;
        let product = self.catalog.product(id)?;
        self.cart.add_item(product);
        self.collect_events();
        Ok(())
    }

    /// For products fetched individually (detail page) rather than listed.
    pub fn add_product_to_cart(&mut self, product: &Product) -> Result<()> {
        self.authorize("add_to_cart", product.id)?;
        self.cart.add_item(product);
        self.collect_events();
        Ok(())
    }

    pub fn add_to_wishlist(&mut self, id: ProductId) -> Result<()> {
        self.authorize("add_to_wishlist", id)?;
        let product = self.catalog.product(id)?;
        self.wishlist.add_item(product);
        self.collect_events();
        Ok(())
    }

    /// Returns whether the product is saved afterwards.
    pub fn toggle_wishlist(&mut self, product: &Product) -> Result<bool> {
        self.authorize("toggle_wishlist", product.id)?;
        let saved = self.wishlist.toggle(product);
        self.collect_events();
        Ok(saved)
    }

    /// Adds the saved snapshot to the cart, then drops it from the wishlist.
    /// Two ordinary mutations in sequence, not a transaction.
    pub fn move_to_cart(&mut self, id: ProductId) -> Result<()> {
        self.authorize("move_to_cart", id)?;
        let Some(product) = self.wishlist.get(id).cloned() else { return Ok(()) };
        self.cart.add_item(&product);
        self.collect_events();
        self.wishlist.remove_item(id);
        self.collect_events();
        Ok(())
    }

    pub fn remove_from_cart(&mut self, id: ProductId) { self.cart.remove_item(id); self.collect_events(); }
    pub fn increase_quantity(&mut self, id: ProductId) { self.cart.increase_quantity(id); self.collect_events(); }
    pub fn decrease_quantity(&mut self, id: ProductId) { self.cart.decrease_quantity(id); self.collect_events(); }
    pub fn clear_cart(&mut self) { self.cart.clear(); self.collect_events(); }
    pub fn remove_from_wishlist(&mut self, id: ProductId) { self.wishlist.remove_item(id); self.collect_events(); }
    pub fn clear_wishlist(&mut self) { self.wishlist.clear(); self.collect_events(); }

    /// Current draft, or a fresh one when none exists or the last one was
    /// confirmed.
    pub fn begin_checkout(&mut self) -> &mut Checkout {
        if self.checkout.as_ref().map_or(true, Checkout::is_confirmed) {
            self.checkout = Some(Checkout::new(self.config.timing));
        }
        self.checkout.get_or_insert_with(Checkout::default)
    }

    pub fn checkout(&self) -> Option<&Checkout> { self.checkout.as_ref() }
    pub fn checkout_mut(&mut self) -> Option<&mut Checkout> { self.checkout.as_mut() }

    /// Navigating away drops the draft, including any pending confirmation.
    pub fn abandon_checkout(&mut self) {
        if let Some(mut draft) = self.checkout.take() {
            self.events.extend(draft.take_events().into_iter().map(DomainEvent::from));
            info!(draft_id = %draft.draft_id(), "checkout abandoned");
        }
    }

    /// Begin, wait out the simulated latency, then complete. Dropping the
    /// future mid-wait abandons the attempt; the draft can be resubmitted.
    pub async fn place_order(&mut self) -> Result<OrderConfirmation> {
        let checkout = self.checkout.as_mut().ok_or(StorefrontError::NoCheckout)?;
        let submission = checkout.begin_submission(&self.cart)?;
        submission.settle().await;
        let confirmation = checkout.complete_submission(submission, &mut self.cart, &self.config.pricing)?;
        self.collect_events();
        Ok(confirmation)
    }

    /// Everything that changed since the last drain, in mutation order.
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        self.collect_events();
        std::mem::take(&mut self.events)
    }

    fn authorize(&self, action: &'static str, product_id: ProductId) -> Result<()> {
        if self.gate.allows_mutation() { return Ok(()); }
        warn!(action, %product_id, "rejected: sign-in required");
        Err(StorefrontError::AuthenticationRequired)
    }

    fn collect_events(&mut self) {
        self.events.extend(self.cart.take_events().into_iter().map(DomainEvent::from));
        self.events.extend(self.wishlist.take_events().into_iter().map(DomainEvent::from));
        if let Some(checkout) = self.checkout.as_mut() {
            self.events.extend(checkout.take_events().into_iter().map(DomainEvent::from));
        }
    }
}
