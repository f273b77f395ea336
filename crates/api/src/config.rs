//! Application configuration loaded from environment variables.

use std::str::FromStr;

use common::Address;
use domain::DeliveryCostConfig;
use saga::ServicesConfig;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `DATABASE_URL`: Postgres connection string; in-memory stores when unset
/// - `WAREHOUSE_ADDRESS`: marker used for every warehouse address field
///   (default: `"ADDRESS_1"`)
/// - `DELIVERY_BASE_COST`, `DELIVERY_WAREHOUSE_ADDRESS_RATIO`,
///   `DELIVERY_FRAGILE_RATIO`, `DELIVERY_WEIGHT_RATIO`,
///   `DELIVERY_VOLUME_RATIO`, `DELIVERY_ADDRESS_RATIO`,
///   `DELIVERY_REMOTE_ADDRESS_MARKER`: delivery pricing
///
/// Values that fail to parse fall back to their defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database_url: Option<String>,
    pub warehouse_address: String,
    pub delivery_cost: DeliveryCostConfig,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let cost = defaults.delivery_cost;
        let parse = |key: &str, default| parse_or(lookup(key), default);

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(lookup("PORT"), defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            warehouse_address: lookup("WAREHOUSE_ADDRESS").unwrap_or(defaults.warehouse_address),
            delivery_cost: DeliveryCostConfig {
                base_cost: parse("DELIVERY_BASE_COST", cost.base_cost),
                warehouse_address_ratio: parse(
                    "DELIVERY_WAREHOUSE_ADDRESS_RATIO",
                    cost.warehouse_address_ratio,
                ),
                fragile_ratio: parse("DELIVERY_FRAGILE_RATIO", cost.fragile_ratio),
                weight_ratio: parse("DELIVERY_WEIGHT_RATIO", cost.weight_ratio),
                volume_ratio: parse("DELIVERY_VOLUME_RATIO", cost.volume_ratio),
                delivery_address_ratio: parse("DELIVERY_ADDRESS_RATIO", cost.delivery_address_ratio),
                remote_address_marker: lookup("DELIVERY_REMOTE_ADDRESS_MARKER")
                    .unwrap_or(cost.remote_address_marker),
            },
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings handed to the wired services.
    pub fn services_config(&self) -> ServicesConfig {
        ServicesConfig {
            delivery_cost: self.delivery_cost.clone(),
            warehouse_address: Address::marker(&self.warehouse_address),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            database_url: None,
            warehouse_address: "ADDRESS_1".to_string(),
            delivery_cost: DeliveryCostConfig::default(),
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}
