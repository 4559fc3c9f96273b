//! Commerce domain: value objects, aggregates, events and pricing.
pub mod aggregates;
pub mod events;
pub mod pricing;
pub mod value_objects;
