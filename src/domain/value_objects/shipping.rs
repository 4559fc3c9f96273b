//! Shipping form captured by the first checkout step

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10,15}$").expect("valid phone regex"));

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShippingField {
    FirstName,
    LastName,
    Address,
    City,
    PostalCode,
    Email,
    Phone,
}

impl ShippingField {
    pub const ALL: [ShippingField; 7] = [
        Self::FirstName, Self::LastName, Self::Address, Self::City, Self::PostalCode, Self::Email, Self::Phone,
    ];

    /// Form key, as used in error maps.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Address => "address",
            Self::City => "city",
            Self::PostalCode => "postalCode",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Address => "Address",
            Self::City => "City",
            Self::PostalCode => "Postal code",
            Self::Email => "Email",
            Self::Phone => "Phone",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> { Self::ALL.into_iter().find(|f| f.key() == key) }
}

impl fmt::Display for ShippingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.key()) }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub email: String,
    pub phone: String,
}

impl ShippingInfo {
    pub fn get(&self, field: ShippingField) -> &str {
        match field {
            ShippingField::FirstName => &self.first_name,
            ShippingField::LastName => &self.last_name,
            ShippingField::Address => &self.address,
            ShippingField::City => &self.city,
            ShippingField::PostalCode => &self.postal_code,
            ShippingField::Email => &self.email,
            ShippingField::Phone => &self.phone,
        }
    }

    pub fn set(&mut self, field: ShippingField, value: impl Into<String>) {
        let slot = match field {
            ShippingField::FirstName => &mut self.first_name,
            ShippingField::LastName => &mut self.last_name,
            ShippingField::Address => &mut self.address,
            ShippingField::City => &mut self.city,
            ShippingField::PostalCode => &mut self.postal_code,
            ShippingField::Email => &mut self.email,
            ShippingField::Phone => &mut self.phone,
        };
        *slot = value.into();
    }

    /// Runs the step-one rules and collects one message per failing field.
    pub fn check(&self) -> FieldErrors {
        match self.validate() {
            Ok(()) => FieldErrors::default(),
            Err(errors) => FieldErrors::from(errors),
        }
    }

    fn check_field(&self, field: ShippingField) -> Option<ValidationError> {
        let value = self.get(field);
        if value.trim().is_empty() {
            return Some(field_error("required", format!("{} is required", field.label())));
        }
        let pattern = match field {
            ShippingField::Email => &*EMAIL_RE,
            ShippingField::Phone => &*PHONE_RE,
            _ => return None,
        };
        // patterns apply to the raw value, as typed
        (!pattern.is_match(value)).then(|| field_error("invalid", format!("{} is invalid", field.label())))
    }
}

impl Validate for ShippingInfo {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for field in ShippingField::ALL {
            if let Some(err) = self.check_field(field) {
                errors.add(field.key(), err);
            }
        }
        if errors.errors().is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn field_error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

/// Field-keyed validation messages shown next to the form inputs
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<ShippingField, String>);

impl FieldErrors {
    pub fn get(&self, field: ShippingField) -> Option<&str> { self.0.get(&field).map(String::as_str) }
    pub fn contains(&self, field: ShippingField) -> bool { self.0.contains_key(&field) }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn dismiss(&mut self, field: ShippingField) { self.0.remove(&field); }
    pub fn iter(&self) -> impl Iterator<Item = (ShippingField, &str)> { self.0.iter().map(|(f, m)| (*f, m.as_str())) }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let map = errors
            .field_errors()
            .into_iter()
            .filter_map(|(key, errs)| {
                let field = ShippingField::from_key(key)?;
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field.label()));
                Some((field, message))
            })
            .collect();
        Self(map)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    #[serde(rename = "paypal")]
    PayPal,
    #[serde(rename = "cash")]
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreditCard => "Credit/Debit Card",
            Self::PayPal => "PayPal",
            Self::CashOnDelivery => "Cash on Delivery",
        }
    }
}
