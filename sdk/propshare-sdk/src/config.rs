//! SDK configuration: target networks, flow timing, and investment bounds.

use std::time::Duration;

use alloy_primitives::{
    utils::{format_ether, parse_ether},
    U256,
};
use serde::{Deserialize, Serialize};

/// A network the application can ask the wallet to operate on.
///
/// Immutable once constructed; `chain_id_hex` is compared
/// case-insensitively against whatever the wallet reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    pub chain_id_hex: String,
    pub name: String,
    pub rpc_url: String,
    pub block_explorer: Option<String>,
}

impl NetworkDescriptor {
    pub fn sepolia() -> Self {
        Self {
            chain_id_hex: "0xaa36a7".to_string(),
            name: "Sepolia Testnet".to_string(),
            rpc_url: "https://sepolia.infura.io/v3/9aa3d95b3bc440fa88ea12eaa4456161".to_string(),
            block_explorer: Some("https://sepolia.etherscan.io".to_string()),
        }
    }

    pub fn localhost() -> Self {
        Self {
            chain_id_hex: "0x7a69".to_string(),
            name: "Localhost".to_string(),
            rpc_url: "http://127.0.0.1:8545".to_string(),
            block_explorer: None,
        }
    }

    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = url.into();
        self
    }

    /// Case-insensitive chain id comparison (MetaMask reports lowercase hex,
    /// configuration files do not always agree).
    pub fn matches(&self, chain_id_hex: &str) -> bool {
        self.chain_id_hex.eq_ignore_ascii_case(chain_id_hex)
    }
}

/// Timing knobs for wallet and contract interactions.
#[derive(Debug, Clone)]
pub struct FlowSettings {
    /// Overall budget for establishing a wallet connection.
    pub connection_timeout: Duration,
    /// Budget for a single contract read.
    pub call_timeout: Duration,
    /// Additional attempts after a first failure.
    pub retry_attempts: u32,
    /// Fixed delay between retry attempts. No jitter, no backoff.
    pub retry_delay: Duration,
    /// Pause before re-reading the chain id after a switch request.
    pub settle_delay: Duration,
    /// Budget for transaction submission and for the receipt wait.
    pub transaction_timeout: Duration,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            connection_timeout: Duration::from_secs(60),
            call_timeout: Duration::from_secs(30),
            retry_attempts: 2,
            retry_delay: Duration::from_secs(2),
            settle_delay: Duration::from_secs(1),
            transaction_timeout: Duration::from_secs(120),
        }
    }
}

impl FlowSettings {
    /// Millisecond-scale timing for tests and offline examples.
    pub fn brisk() -> Self {
        Self {
            connection_timeout: Duration::from_secs(2),
            call_timeout: Duration::from_secs(2),
            retry_attempts: 2,
            retry_delay: Duration::from_millis(1),
            settle_delay: Duration::from_millis(1),
            transaction_timeout: Duration::from_secs(2),
        }
    }
}

/// Bounds applied to a user-entered investment amount, in wei.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvestmentLimits {
    pub min: U256,
    pub max: U256,
    pub default_amount: U256,
}

impl Default for InvestmentLimits {
    fn default() -> Self {
        Self {
            // 0.00001 ETH
            min: U256::from(10_000_000_000_000u64),
            // 0.05 ETH
            max: U256::from(50_000_000_000_000_000u64),
            // 0.0001 ETH
            default_amount: U256::from(100_000_000_000_000u64),
        }
    }
}

impl InvestmentLimits {
    pub fn new(min: U256, max: U256) -> Self {
        Self { min, max, default_amount: min }
    }
}

/// `n` whole ether in wei.
pub fn ether(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
}

/// Render a wei amount as a human ether string, without trailing zeros.
pub fn format_eth(amount: U256) -> String {
    let rendered = format_ether(amount);
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse a user-entered ether amount into wei.
pub fn parse_eth(input: &str) -> Option<U256> {
    parse_ether(input.trim()).ok()
}
