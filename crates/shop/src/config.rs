//! Shop configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const REFUND_POLICY_ENV: &str = "BOOKSHOP_REFUND_POLICY";
pub const RECORD_REJECTED_ORDERS_ENV: &str = "BOOKSHOP_RECORD_REJECTED_ORDERS";

/// How `Shop::refund_order` treats lines whose book left the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundPolicy {
    /// Validate every line first; refuse the whole refund if any line fails.
    #[default]
    Atomic,
    /// Restore what can be restored, skip the rest, mark the order refunded.
    BestEffort,
}

impl core::str::FromStr for RefundPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" => Ok(Self::Atomic),
            "best_effort" | "best-effort" => Ok(Self::BestEffort),
            other => Err(ConfigError::invalid(REFUND_POLICY_ENV, other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

impl ConfigError {
    fn invalid(key: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.into(),
        }
    }
}

/// Shop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Refund line handling.
    pub refund_policy: RefundPolicy,
    /// When a consumer's order is rejected, still clear the cart and record
    /// the order id in the consumer's history.
    pub record_rejected_orders: bool,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            refund_policy: RefundPolicy::Atomic,
            record_rejected_orders: true,
        }
    }
}

impl ShopConfig {
    pub fn with_refund_policy(mut self, policy: RefundPolicy) -> Self {
        self.refund_policy = policy;
        self
    }

    pub fn with_record_rejected_orders(mut self, record: bool) -> Self {
        self.record_rejected_orders = record;
        self
    }

    /// Build a config from `BOOKSHOP_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ShopConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(REFUND_POLICY_ENV) {
            config.refund_policy = raw.parse()?;
        }

        if let Some(raw) = lookup(RECORD_REJECTED_ORDERS_ENV) {
            config.record_rejected_orders = parse_bool(RECORD_REJECTED_ORDERS_ENV, &raw)?;
        }

        Ok(config)
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::invalid(key, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_keep_reference_consumer_behavior() {
        let config = ShopConfig::default();
        assert_eq!(config.refund_policy, RefundPolicy::Atomic);
        assert!(config.record_rejected_orders);
        assert_eq!(ShopConfig::from_lookup(|_| None), Ok(config));
    }

    #[test]
    fn lookup_overrides_defaults() {
        let config = ShopConfig::from_lookup(lookup_from(&[
            (REFUND_POLICY_ENV, "Best-Effort"),
            (RECORD_REJECTED_ORDERS_ENV, "off"),
        ]))
        .unwrap();

        assert_eq!(config.refund_policy, RefundPolicy::BestEffort);
        assert!(!config.record_rejected_orders);
    }

    #[test]
    fn malformed_values_are_reported() {
        let err = ShopConfig::from_lookup(lookup_from(&[(RECORD_REJECTED_ORDERS_ENV, "maybe")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: RECORD_REJECTED_ORDERS_ENV,
                value: "maybe".to_string(),
            }
        );

        assert!("sometimes".parse::<RefundPolicy>().is_err());
    }

    #[test]
    fn builders_chain() {
        let config = ShopConfig::default()
            .with_refund_policy(RefundPolicy::BestEffort)
            .with_record_rejected_orders(false);
        assert_eq!(config.refund_policy, RefundPolicy::BestEffort);
        assert!(!config.record_rejected_orders);
    }
}
