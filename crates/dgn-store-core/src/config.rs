use alloy_primitives::address;
use anyhow::{Context, Result};
use dgn_api_types::{Address, TOKEN_DECIMALS, parse_address};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Deployed DGN store contract.
pub const DEFAULT_CONTRACT_ADDRESS: Address =
    address!("22aF7a9CDD4CB0762D206e5B664F4feB7086C56D");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub contract_address: Address,
    pub token_symbol: String,
    pub decimals: u8,
    pub receipt_poll_interval_ms: u64,
    /// `EnvFilter` directive for the front-end log layer.
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_CONTRACT_ADDRESS,
            token_symbol: "DGN".to_owned(),
            decimals: TOKEN_DECIMALS,
            receipt_poll_interval_ms: 4_000,
            log_level: "info".to_owned(),
        }
    }
}

impl StoreConfig {
    /// Defaults overridden by `DGN_CONTRACT_ADDRESS`, `DGN_TOKEN_SYMBOL`,
    /// `DGN_RECEIPT_POLL_MS` and `DGN_LOG`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Partial JSON documents are accepted; absent keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid store config")
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup("DGN_CONTRACT_ADDRESS") {
            config.contract_address =
                parse_address(&value).context("DGN_CONTRACT_ADDRESS")?;
        }
        if let Some(value) = lookup("DGN_TOKEN_SYMBOL") {
            config.token_symbol = value.trim().to_owned();
        }
        if let Some(value) = lookup("DGN_RECEIPT_POLL_MS") {
            config.receipt_poll_interval_ms = value
                .trim()
                .parse()
                .context("DGN_RECEIPT_POLL_MS must be an integer")?;
        }
        if let Some(value) = lookup("DGN_LOG") {
            config.log_level = value.trim().to_owned();
        }

        Ok(config)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }
}
