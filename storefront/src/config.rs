//! Configuration management for the storefront.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::booking::DEFAULT_WINDOW_DAYS;
use crate::checkout::DEFAULT_SUBMISSION_DELAY;
use crate::money::TaxRate;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const MAX_TAX_RATE_BPS: u32 = 10_000;
const MAX_BOOKING_WINDOW_DAYS: u32 = 365;

/// A configuration variable could not be used
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The value did not parse
    #[error("{var}={value:?} is not a valid {expected}")]
    Unparseable {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// What was expected
        expected: &'static str,
    },

    /// The value parsed but is out of range
    #[error("{var}={value} is out of range ({reason})")]
    OutOfRange {
        /// Variable name
        var: &'static str,
        /// Parsed value
        value: u64,
        /// Accepted range
        reason: &'static str,
    },
}

/// Storefront configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// JSON file backing durable storage (`STOREFRONT_DATA_FILE`)
    pub data_file: PathBuf,
    /// `tracing` filter directive (`STOREFRONT_LOG`)
    pub log_filter: String,
    /// Sales tax (`STOREFRONT_TAX_RATE_BPS`, basis points)
    pub tax_rate: TaxRate,
    /// Simulated order submission latency (`STOREFRONT_CHECKOUT_DELAY_MS`)
    pub checkout_delay: Duration,
    /// Days ahead repairs can be booked (`STOREFRONT_BOOKING_WINDOW_DAYS`)
    pub booking_window_days: u32,
    /// System dark mode preference (`STOREFRONT_PREFERS_DARK`)
    pub prefers_dark: bool,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("storefront-data.json"),
            log_filter: "info".to_string(),
            tax_rate: TaxRate::DEFAULT,
            checkout_delay: DEFAULT_SUBMISSION_DELAY,
            booking_window_days: DEFAULT_WINDOW_DAYS,
            prefers_dark: false,
        }
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(var)
        .map(|value| {
            value.trim().parse().map_err(|_| ConfigError::Unparseable {
                var,
                value,
                expected,
            })
        })
        .transpose()
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let tax_bps = parse::<u32>(&lookup, "STOREFRONT_TAX_RATE_BPS", "integer")?
            .unwrap_or(defaults.tax_rate.basis_points());
        if tax_bps > MAX_TAX_RATE_BPS {
            return Err(ConfigError::OutOfRange {
                var: "STOREFRONT_TAX_RATE_BPS",
                value: u64::from(tax_bps),
                reason: "0 to 10000",
            });
        }

        let window = parse::<u32>(&lookup, "STOREFRONT_BOOKING_WINDOW_DAYS", "integer")?
            .unwrap_or(defaults.booking_window_days);
        if window == 0 || window > MAX_BOOKING_WINDOW_DAYS {
            return Err(ConfigError::OutOfRange {
                var: "STOREFRONT_BOOKING_WINDOW_DAYS",
                value: u64::from(window),
                reason: "1 to 365",
            });
        }

        let checkout_delay = parse::<u64>(&lookup, "STOREFRONT_CHECKOUT_DELAY_MS", "integer")?
            .map_or(defaults.checkout_delay, Duration::from_millis);

        Ok(Self {
            data_file: lookup("STOREFRONT_DATA_FILE").map_or(defaults.data_file, PathBuf::from),
            log_filter: lookup("STOREFRONT_LOG").unwrap_or(defaults.log_filter),
            tax_rate: TaxRate::from_basis_points(tax_bps),
            checkout_delay,
            booking_window_days: window,
            prefers_dark: parse::<bool>(&lookup, "STOREFRONT_PREFERS_DARK", "boolean")?
                .unwrap_or(defaults.prefers_dark),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(StorefrontConfig::from_lookup(lookup(&[])), Ok(StorefrontConfig::default()));
    }

    #[test]
    fn reads_every_variable() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("STOREFRONT_DATA_FILE", "/tmp/shop.json"),
            ("STOREFRONT_LOG", "storefront=debug"),
            ("STOREFRONT_TAX_RATE_BPS", "725"),
            ("STOREFRONT_CHECKOUT_DELAY_MS", "0"),
            ("STOREFRONT_BOOKING_WINDOW_DAYS", "7"),
            ("STOREFRONT_PREFERS_DARK", "true"),
        ]));

        assert_eq!(
            config,
            Ok(StorefrontConfig {
                data_file: PathBuf::from("/tmp/shop.json"),
                log_filter: "storefront=debug".to_string(),
                tax_rate: TaxRate::from_basis_points(725),
                checkout_delay: Duration::ZERO,
                booking_window_days: 7,
                prefers_dark: true,
            })
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            StorefrontConfig::from_lookup(lookup(&[("STOREFRONT_TAX_RATE_BPS", "eight")])),
            Err(ConfigError::Unparseable { var: "STOREFRONT_TAX_RATE_BPS", .. })
        ));
        assert!(matches!(
            StorefrontConfig::from_lookup(lookup(&[("STOREFRONT_PREFERS_DARK", "yes")])),
            Err(ConfigError::Unparseable { expected: "boolean", .. })
        ));
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            StorefrontConfig::from_lookup(lookup(&[("STOREFRONT_TAX_RATE_BPS", "10001")])),
            Err(ConfigError::OutOfRange { value: 10_001, .. })
        ));
        assert!(matches!(
            StorefrontConfig::from_lookup(lookup(&[("STOREFRONT_BOOKING_WINDOW_DAYS", "0")])),
            Err(ConfigError::OutOfRange { var: "STOREFRONT_BOOKING_WINDOW_DAYS", .. })
        ));
    }
}
