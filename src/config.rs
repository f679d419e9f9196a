//! Ledger configuration.
//!
//! [`LedgerConfig`] is the TOML shape an operator writes; it keeps prices and
//! the fee rate as decimal strings. [`LedgerSettings`] is the resolved,
//! fixed-point form the ledger is constructed from.
//!
//! ```toml
//! [addresses]
//! custody = "0x0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f"
//! admin = "0xadadadadadadadadadadadadadadadadadadadad"
//! coordinator = "0xcccccccccccccccccccccccccccccccccccccccc"
//! fee_recipient = "0xfefefefefefefefefefefefefefefefefefefefe"
//!
//! [pricing]
//! max_price = "1000"
//! min_price = "0.001"
//!
//! [fees]
//! fee_rate = "0.0001"
//!
//! [logging]
//! level = "info"
//! event_log_capacity = 4096
//! ```

use std::path::Path;

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::types::fixed::{self, SCALE};

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    pub addresses: AddressConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub fees: FeeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressConfig {
    /// The ledger's own custody address
    pub custody: Address,
    pub admin: Address,
    /// Only identity allowed to drive event start/end
    pub coordinator: Address,
    /// Destination of swept fees
    pub fee_recipient: Address,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Upper bound for aggregated buys
    #[serde(default = "default_max_price")]
    pub max_price: Decimal,
    /// Lower bound for aggregated sells; order prices must be above it
    #[serde(default = "default_min_price")]
    pub min_price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeeConfig {
    /// Share of each withdrawal kept as fee (0.0001 = 0.01%)
    #[serde(default = "default_fee_rate")]
    pub fee_rate: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. "info" or "binary_book=debug"
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Notifications retained before the oldest are dropped
    #[serde(default = "default_event_log_capacity")]
    pub event_log_capacity: usize,
}

fn default_max_price() -> Decimal {
    Decimal::from(1000)
}

fn default_min_price() -> Decimal {
    Decimal::new(1, 3)
}

fn default_fee_rate() -> Decimal {
    Decimal::new(1, 4)
}

fn default_log_level() -> String {
    "info".into()
}

fn default_event_log_capacity() -> usize {
    4096
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            max_price: default_max_price(),
            min_price: default_min_price(),
        }
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            fee_rate: default_fee_rate(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            event_log_capacity: default_event_log_capacity(),
        }
    }
}

impl LedgerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LedgerConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
        // Resolve once so bad values surface at load time.
        LedgerSettings::from_config(&config)?;
        Ok(config)
    }
}

// ============================================================================
// Resolved settings
// ============================================================================

/// Fixed-point settings the ledger is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSettings {
    pub custody: Address,
    pub admin: Address,
    pub coordinator: Address,
    pub fee_recipient: Address,
    pub max_price: U256,
    pub min_price: U256,
    pub fee_rate: U256,
    pub event_log_capacity: usize,
}

impl LedgerSettings {
    /// Settings with the default price bounds and fee rate.
    pub fn new(custody: Address, admin: Address, coordinator: Address, fee_recipient: Address) -> Self {
        Self {
            custody,
            admin,
            coordinator,
            fee_recipient,
            max_price: fixed::whole(1000),
            min_price: SCALE / U256::from(1000u64),
            fee_rate: SCALE / U256::from(10_000u64),
            event_log_capacity: default_event_log_capacity(),
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Result<Self, ConfigError> {
        let addresses = &config.addresses;
        for (field, address) in [
            ("addresses.custody", addresses.custody),
            ("addresses.admin", addresses.admin),
            ("addresses.coordinator", addresses.coordinator),
            ("addresses.fee_recipient", addresses.fee_recipient),
        ] {
            if address.is_zero() {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must not be the zero address".into(),
                });
            }
        }

        let max_price = to_fixed_field("pricing.max_price", config.pricing.max_price)?;
        let min_price = to_fixed_field("pricing.min_price", config.pricing.min_price)?;
        let fee_rate = to_fixed_field("fees.fee_rate", config.fees.fee_rate)?;

        if min_price >= max_price {
            return Err(ConfigError::InvalidValue {
                field: "pricing.min_price",
                reason: format!(
                    "{} must be below max_price {}",
                    config.pricing.min_price, config.pricing.max_price
                ),
            });
        }
        if fee_rate > SCALE {
            return Err(ConfigError::InvalidValue {
                field: "fees.fee_rate",
                reason: format!("{} exceeds 1", config.fees.fee_rate),
            });
        }
        if config.logging.event_log_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "logging.event_log_capacity",
                reason: "must be at least 1".into(),
            });
        }

        Ok(Self {
            custody: addresses.custody,
            admin: addresses.admin,
            coordinator: addresses.coordinator,
            fee_recipient: addresses.fee_recipient,
            max_price,
            min_price,
            fee_rate,
            event_log_capacity: config.logging.event_log_capacity,
        })
    }
}

fn to_fixed_field(field: &'static str, value: Decimal) -> Result<U256, ConfigError> {
    fixed::decimal_to_fixed(value).ok_or_else(|| ConfigError::InvalidValue {
        field,
        reason: format!("{} is negative or out of range", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"
        [addresses]
        custody = "0x0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f"
        admin = "0xadadadadadadadadadadadadadadadadadadadad"
        coordinator = "0xcccccccccccccccccccccccccccccccccccccccc"
        fee_recipient = "0xfefefefefefefefefefefefefefefefefefefefe"
    "#;

    #[test]
    fn test_config_defaults() {
        let config = LedgerConfig::from_toml_str(BASE).unwrap();
        assert_eq!(config.logging.level, "info");

        let settings = LedgerSettings::from_config(&config).unwrap();
        assert_eq!(settings.admin, Address::repeat_byte(0xAD));
        assert_eq!(settings.max_price, fixed::whole(1000));
        assert_eq!(settings.min_price, fixed::to_fixed("0.001").unwrap());
        assert_eq!(settings.fee_rate, fixed::to_fixed("0.0001").unwrap());
        assert_eq!(settings.event_log_capacity, 4096);

        let defaults = LedgerSettings::new(settings.custody, settings.admin, settings.coordinator, settings.fee_recipient);
        assert_eq!(defaults, settings);
    }

    #[test]
    fn test_config_overrides() {
        let content = format!(
            "{}\n[pricing]\nmax_price = \"5\"\nmin_price = \"0.5\"\n[fees]\nfee_rate = \"0.01\"\n[logging]\nlevel = \"debug\"\nevent_log_capacity = 16\n",
            BASE
        );
        let config = LedgerConfig::from_toml_str(&content).unwrap();
        let settings = LedgerSettings::from_config(&config).unwrap();

        assert_eq!(settings.max_price, fixed::whole(5));
        assert_eq!(settings.min_price, fixed::to_fixed("0.5").unwrap());
        assert_eq!(settings.fee_rate, fixed::to_fixed("0.01").unwrap());
        assert_eq!(config.logging.level, "debug");
        assert_eq!(settings.event_log_capacity, 16);
    }

    #[test]
    fn test_config_rejects_empty_event_log() {
        let content = format!("{}\n[logging]\nevent_log_capacity = 0\n", BASE);
        let err = LedgerConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "logging.event_log_capacity", .. }));
    }

    #[test]
    fn test_config_rejects_inverted_bounds() {
        let content = format!("{}\n[pricing]\nmax_price = \"1\"\nmin_price = \"2\"\n", BASE);
        let err = LedgerConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "pricing.min_price", .. }));
    }

    #[test]
    fn test_config_rejects_fee_above_one() {
        let content = format!("{}\n[fees]\nfee_rate = \"1.5\"\n", BASE);
        let err = LedgerConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "fees.fee_rate", .. }));
    }

    #[test]
    fn test_config_rejects_zero_address() {
        let content = BASE.replace(
            "0xcccccccccccccccccccccccccccccccccccccccc",
            "0x0000000000000000000000000000000000000000",
        );
        let err = LedgerConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "addresses.coordinator", .. }));
    }

    #[test]
    fn test_config_parse_error() {
        let err = LedgerConfig::from_toml_str("[addresses]\nadmin = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_config_missing_file() {
        let err = LedgerConfig::load("/nonexistent/ledger.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile(_)));
    }
}
