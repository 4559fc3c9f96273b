//! Value Objects for the storefront engine

mod shipping;

pub use shipping::{FieldErrors, PaymentMethod, ShippingField, ShippingInfo};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog identifier of a product
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    pub const fn new(value: u64) -> Self { Self(value) }
    pub const fn value(&self) -> u64 { self.0 }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self { Self(value) }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Money value object.
///
/// Single-currency fixed-point amount. Arithmetic keeps full precision;
/// [`Money::round`] applies the two-digit half-up display rounding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoneyRepr", into = "String")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() { return Err(MoneyError::Negative(amount)); }
        Ok(Self(amount))
    }
    pub fn from_cents(cents: u64) -> Self { Self(Decimal::from(cents) / Decimal::ONE_HUNDRED) }
    pub fn amount(&self) -> Decimal { self.0 }
    pub fn is_zero(&self) -> bool { self.0.is_zero() }
    pub fn multiply(&self, qty: u32) -> Money { Money(self.0 * Decimal::from(qty)) }
    pub fn scale(&self, rate: Decimal) -> Money { Money(self.0 * rate) }
    pub fn saturating_sub(&self, other: Money) -> Money { Money((self.0 - other.0).max(Decimal::ZERO)) }

    /// Two decimal places, ties away from zero.
    pub fn round(&self) -> Money {
        Money(self.0.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }
}

impl std::ops::Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money { Money(self.0 + rhs.0) }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money { iter.fold(Money::ZERO, |acc, m| acc + m) }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "${:.2}", self.round().0) }
}

impl FromStr for Money {
    type Err = MoneyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let amount = Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map_err(|_| MoneyError::Unparseable(s.to_string()))?;
        Money::new(amount)
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self { money.0.to_string() }
}

/// Wire shape accepted for amounts: catalog feeds send bare JSON numbers,
/// our own serialized output uses strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum MoneyRepr {
    Number(serde_json::Number),
    Text(String),
}

impl TryFrom<MoneyRepr> for Money {
    type Error = MoneyError;
    fn try_from(repr: MoneyRepr) -> Result<Self, Self::Error> {
        match repr {
            MoneyRepr::Number(n) => n.to_string().parse(),
            MoneyRepr::Text(s) => s.parse(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MoneyError {
    #[error("amount cannot be negative: {0}")]
    Negative(Decimal),
    #[error("not a decimal amount: {0:?}")]
    Unparseable(String),
}

/// Line quantity, never below one
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    pub fn new(value: u32) -> Option<Self> { (value >= 1).then_some(Self(value)) }
    pub fn value(&self) -> u32 { self.0 }
    pub fn increment(&self) -> Self { Self(self.0.saturating_add(1)) }
    /// `None` when already at the floor.
    pub fn decrement(&self) -> Option<Self> { Self::new(self.0 - 1) }
}

impl Default for Quantity { fn default() -> Self { Self::ONE } }

impl TryFrom<u32> for Quantity {
    type Error = &'static str;
    fn try_from(value: u32) -> Result<Self, Self::Error> { Quantity::new(value).ok_or("quantity must be at least 1") }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self { q.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_round_half_up() {
        assert_eq!(Money::from_str("4.999").unwrap().round(), Money::from_cents(500));
        assert_eq!(Money::from_str("0.005").unwrap().round(), Money::from_cents(1));
        assert_eq!(Money::from_str("0.004").unwrap().round(), Money::ZERO);
    }

    #[test]
    fn test_money_rejects_negative() {
        assert!(matches!(Money::from_str("-1.00"), Err(MoneyError::Negative(_))));
        assert!(matches!(Money::from_str("abc"), Err(MoneyError::Unparseable(_))));
    }

    #[test]
    fn test_money_decodes_number_and_string() {
        let a: Money = serde_json::from_str("9.99").unwrap();
        let b: Money = serde_json::from_str("\"9.99\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, Money::from_cents(999));
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"9.99\"");
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(6098).to_string(), "$60.98");
        assert_eq!(Money::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_quantity_floor() {
        assert!(Quantity::new(0).is_none());
        assert_eq!(Quantity::ONE.decrement(), None);
        assert_eq!(Quantity::ONE.increment().decrement(), Some(Quantity::ONE));
        assert!(serde_json::from_str::<Quantity>("0").is_err());
    }
}
