//! Environment-driven configuration.
//!
//! Every key is optional; an unset key takes the storefront default and a
//! malformed one is an error rather than a silent fallback.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use crate::domain::aggregates::CheckoutTiming;
use crate::domain::pricing::PricingPolicy;

pub const FREE_SHIPPING_THRESHOLD: &str = "STOREFRONT_FREE_SHIPPING_THRESHOLD";
pub const FLAT_SHIPPING_FEE: &str = "STOREFRONT_FLAT_SHIPPING_FEE";
pub const TAX_RATE: &str = "STOREFRONT_TAX_RATE";
pub const SUBMIT_LATENCY_MS: &str = "STOREFRONT_SUBMIT_LATENCY_MS";
pub const REDIRECT_DELAY_MS: &str = "STOREFRONT_REDIRECT_DELAY_MS";
pub const CATALOG_PATH: &str = "STOREFRONT_CATALOG";
pub const SEARCH_QUERY: &str = "STOREFRONT_QUERY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StorefrontConfig {
    pub pricing: PricingPolicy,
    pub timing: CheckoutTiming,
    pub catalog_path: Option<PathBuf>,
    pub search_query: Option<String>,
}

impl StorefrontConfig {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let pricing = PricingPolicy {
            free_shipping_threshold: parse_or(&lookup, FREE_SHIPPING_THRESHOLD, defaults.pricing.free_shipping_threshold)?,
            flat_shipping_fee: parse_or(&lookup, FLAT_SHIPPING_FEE, defaults.pricing.flat_shipping_fee)?,
            tax_rate: parse_or(&lookup, TAX_RATE, defaults.pricing.tax_rate)?,
        };
        if pricing.tax_rate.is_sign_negative() {
            return Err(invalid(TAX_RATE, pricing.tax_rate.to_string()));
        }
        let timing = CheckoutTiming {
            submit_latency: millis_or(&lookup, SUBMIT_LATENCY_MS, defaults.timing.submit_latency)?,
            redirect_delay: millis_or(&lookup, REDIRECT_DELAY_MS, defaults.timing.redirect_delay)?,
        };
        Ok(Self {
            pricing,
            timing,
            catalog_path: lookup(CATALOG_PATH).filter(|s| !s.trim().is_empty()).map(PathBuf::from),
            search_query: lookup(SEARCH_QUERY),
        })
    }
}

fn invalid(key: &'static str, value: String) -> ConfigError { ConfigError::Invalid { key, value } }

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| invalid(key, raw)),
    }
}

fn millis_or(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    parse_or(lookup, key, default_ms).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Money;
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StorefrontConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.pricing.flat_shipping_fee, Money::from_cents(599));
        assert_eq!(config.timing.submit_latency, Duration::from_millis(1500));
        assert_eq!(config.catalog_path, None);
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            (FREE_SHIPPING_THRESHOLD, "75"),
            (FLAT_SHIPPING_FEE, "4.50"),
            (TAX_RATE, "0.08"),
            (SUBMIT_LATENCY_MS, "0"),
            (CATALOG_PATH, "fixtures/products.json"),
            (SEARCH_QUERY, "jacket"),
        ]))
        .unwrap();
        assert_eq!(config.pricing.free_shipping_threshold, Money::from_cents(7500));
        assert_eq!(config.pricing.flat_shipping_fee, Money::from_cents(450));
        assert_eq!(config.pricing.tax_rate, Decimal::new(8, 2));
        assert_eq!(config.timing.submit_latency, Duration::ZERO);
        assert_eq!(config.timing.redirect_delay, Duration::from_millis(3000));
        assert_eq!(config.catalog_path, Some(PathBuf::from("fixtures/products.json")));
        assert_eq!(config.search_query.as_deref(), Some("jacket"));
    }

    #[test]
    fn test_malformed_values_are_errors() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[(FLAT_SHIPPING_FEE, "-1")])).unwrap_err();
        assert_eq!(err, ConfigError::Invalid { key: FLAT_SHIPPING_FEE, value: "-1".into() });
        assert!(StorefrontConfig::from_lookup(lookup_from(&[(TAX_RATE, "ten")])).is_err());
        assert!(StorefrontConfig::from_lookup(lookup_from(&[(TAX_RATE, "-0.1")])).is_err());
        assert!(StorefrontConfig::from_lookup(lookup_from(&[(SUBMIT_LATENCY_MS, "soon")])).is_err());
    }
}
