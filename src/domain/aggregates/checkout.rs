//! Checkout Aggregate
//!
//! Three ordered steps: shipping form, payment choice, review. Forward moves
//! out of the shipping step are gated on form validation; backward moves are
//! free. Submission is split in three phases so the latency wait happens
//! without borrowing the checkout:
//!
//! 1. [`Checkout::begin_submission`] arms the re-entrancy guard,
//! 2. [`Submission::settle`] waits out the simulated placement latency,
//! 3. [`Checkout::complete_submission`] clears the cart and confirms.
//!
//! Dropping a [`Submission`] before step 3 abandons it: the guard is
//! released, nothing has been persisted and the cart is untouched.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;
use crate::domain::aggregates::{Cart, CartLine};
use crate::domain::events::CheckoutEvent;
use crate::domain::pricing::{quote, PricingPolicy, Quote};
use crate::domain::value_objects::{FieldErrors, PaymentMethod, ShippingField, ShippingInfo};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CheckoutStep {
    #[default]
    ShippingInfo,
    PaymentMethod,
    ReviewOrder,
}

impl CheckoutStep {
    pub const ALL: [CheckoutStep; 3] = [Self::ShippingInfo, Self::PaymentMethod, Self::ReviewOrder];

    pub fn index(&self) -> usize { *self as usize }
    pub fn from_index(index: usize) -> Option<Self> { Self::ALL.get(index).copied() }
    pub fn next(&self) -> Option<Self> { Self::from_index(self.index() + 1) }
    pub fn previous(&self) -> Option<Self> { self.index().checked_sub(1).and_then(Self::from_index) }
    pub fn is_terminal(&self) -> bool { self.next().is_none() }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ShippingInfo => "Shipping Information",
            Self::PaymentMethod => "Payment Method",
            Self::ReviewOrder => "Review Order",
        }
    }
}

/// Result of a step transition request. A failed validation is an outcome,
/// not an error: the messages live in [`Checkout::errors`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Moved(CheckoutStep),
    /// Shipping form invalid; step unchanged.
    Blocked,
    /// Already on the review step; submit instead.
    AtTerminal,
    /// Already on the first step.
    AtStart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckoutTiming {
    pub submit_latency: Duration,
    pub redirect_delay: Duration,
}

impl Default for CheckoutTiming {
    fn default() -> Self {
        Self { submit_latency: Duration::from_millis(1500), redirect_delay: Duration::from_millis(3000) }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    /// Display-only number; not durable.
    pub order_id: String,
    pub confirmed_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub quote: Quote,
}

/// In-flight placement handed out by [`Checkout::begin_submission`].
#[derive(Debug)]
#[must_use = "a submission does nothing until settled and completed"]
pub struct Submission {
    draft_id: Uuid,
    order_id: String,
    latency: Duration,
    in_flight: Arc<AtomicBool>,
}

impl Submission {
    pub fn order_id(&self) -> &str { &self.order_id }

    /// Simulated placement round trip. Always succeeds.
    pub async fn settle(&self) { tokio::time::sleep(self.latency).await; }
}

impl Drop for Submission {
    fn drop(&mut self) {
        if self.in_flight.swap(false, Ordering::AcqRel) {
            debug!(draft_id = %self.draft_id, order_id = %self.order_id, "order submission abandoned");
        }
    }
}

#[derive(Debug)]
pub struct Checkout {
    draft_id: Uuid,
    step: CheckoutStep,
    shipping: ShippingInfo,
    payment_method: PaymentMethod,
    errors: FieldErrors,
    in_flight: Arc<AtomicBool>,
    confirmation: Option<OrderConfirmation>,
    timing: CheckoutTiming,
    events: Vec<CheckoutEvent>,
}

impl Checkout {
    pub fn new(timing: CheckoutTiming) -> Self {
        Self {
            draft_id: Uuid::new_v4(), step: CheckoutStep::default(), shipping: ShippingInfo::default(),
            payment_method: PaymentMethod::default(), errors: FieldErrors::default(),
            in_flight: Arc::default(), confirmation: None, timing, events: vec![],
        }
    }

    pub fn draft_id(&self) -> Uuid { self.draft_id }
    pub fn step(&self) -> CheckoutStep { self.step }
    pub fn shipping(&self) -> &ShippingInfo { &self.shipping }
    pub fn payment_method(&self) -> PaymentMethod { self.payment_method }
    pub fn errors(&self) -> &FieldErrors { &self.errors }
    /// Held from `begin_submission` until the handle completes or is dropped.
    pub fn submission_in_progress(&self) -> bool { self.in_flight.load(Ordering::Acquire) }
    pub fn is_confirmed(&self) -> bool { self.confirmation.is_some() }
    pub fn confirmation(&self) -> Option<&OrderConfirmation> { self.confirmation.as_ref() }

    /// Editing a field dismisses its pending error.
    pub fn set_field(&mut self, field: ShippingField, value: impl Into<String>) {
        self.shipping.set(field, value);
        self.errors.dismiss(field);
    }

    pub fn set_shipping(&mut self, shipping: ShippingInfo) {
        self.shipping = shipping;
        self.errors = FieldErrors::default();
    }

    pub fn dismiss_error(&mut self, field: ShippingField) { self.errors.dismiss(field); }

    pub fn select_payment_method(&mut self, method: PaymentMethod) { self.payment_method = method; }

    pub fn advance(&mut self) -> StepOutcome {
        let Some(next) = self.step.next() else { return StepOutcome::AtTerminal };
        if self.step == CheckoutStep::ShippingInfo {
            self.errors = self.shipping.check();
            if !self.errors.is_empty() {
                debug!(draft_id = %self.draft_id, failing = self.errors.len(), "shipping validation blocked advance");
                return StepOutcome::Blocked;
            }
        }
        self.move_to(next)
    }

    pub fn retreat(&mut self) -> StepOutcome {
        match self.step.previous() {
            Some(prev) => self.move_to(prev),
            None => StepOutcome::AtStart,
        }
    }

    /// First `limit` lines for the review panel, plus how many were left out.
    pub fn review_items<'c>(&self, cart: &'c Cart, limit: usize) -> (&'c [CartLine], usize) {
        let lines = cart.lines();
        let shown = lines.len().min(limit);
        (&lines[..shown], lines.len() - shown)
    }

    pub fn begin_submission(&mut self, cart: &Cart) -> Result<Submission, CheckoutError> {
        if self.confirmation.is_some() { return Err(CheckoutError::AlreadyConfirmed); }
        if self.submission_in_progress() { return Err(CheckoutError::SubmissionInProgress); }
        if !self.step.is_terminal() { return Err(CheckoutError::NotAtReview { step: self.step }); }
        if cart.is_empty() { return Err(CheckoutError::EmptyCart); }

        self.in_flight.store(true, Ordering::Release);
        self.events.push(CheckoutEvent::SubmissionStarted);
        let order_id = generate_order_id();
        debug!(draft_id = %self.draft_id, %order_id, "order submission started");
        Ok(Submission {
            draft_id: self.draft_id,
            order_id,
            latency: self.timing.submit_latency,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// Clears `cart` and records the confirmation. The quote reflects the cart
    /// as it stands at completion.
    pub fn complete_submission(
        &mut self,
        mut submission: Submission,
        cart: &mut Cart,
        policy: &PricingPolicy,
    ) -> Result<OrderConfirmation, CheckoutError> {
        if submission.draft_id != self.draft_id || !self.submission_in_progress() {
            return Err(CheckoutError::UnknownSubmission);
        }
        self.in_flight.store(false, Ordering::Release);
        let confirmation = OrderConfirmation {
            order_id: std::mem::take(&mut submission.order_id),
            confirmed_at: Utc::now(),
            payment_method: self.payment_method,
            quote: quote(cart.lines(), policy),
        };
        cart.clear();
        self.confirmation = Some(confirmation.clone());
        info!(draft_id = %self.draft_id, order_id = %confirmation.order_id, total = %confirmation.quote.total, "order confirmed");
        self.events.push(CheckoutEvent::OrderConfirmed { order_id: confirmation.order_id.clone() });
        self.events.push(CheckoutEvent::ReturnToCatalog { after: self.timing.redirect_delay });
        Ok(confirmation)
    }

    pub fn take_events(&mut self) -> Vec<CheckoutEvent> { std::mem::take(&mut self.events) }

    fn move_to(&mut self, step: CheckoutStep) -> StepOutcome {
        self.step = step;
        self.events.push(CheckoutEvent::StepChanged { step: step.index() });
        StepOutcome::Moved(step)
    }
}

impl Default for Checkout {
    fn default() -> Self { Self::new(CheckoutTiming::default()) }
}

fn generate_order_id() -> String {
    rand::rng().random_range(100_000u32..=1_000_000).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("orders can only be placed from the review step (currently {})", .step.title())]
    NotAtReview { step: CheckoutStep },
    #[error("cannot place an order for an empty cart")]
    EmptyCart,
    #[error("an order submission is already in progress")]
    SubmissionInProgress,
    #[error("this checkout has already been confirmed")]
    AlreadyConfirmed,
    #[error("submission does not belong to this checkout")]
    UnknownSubmission,
}
