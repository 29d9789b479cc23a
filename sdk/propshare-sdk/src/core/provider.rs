use async_trait::async_trait;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use tokio::sync::broadcast;

use crate::config::NetworkDescriptor;
use crate::core::constants::{
    CODE_REQUEST_PENDING, CODE_UNKNOWN_CHAIN, CODE_USER_REJECTED, PENDING_FRAGMENT,
    REJECTION_FRAGMENTS,
};

/// Error surfaced by a wallet provider, carrying the EIP-1193 numeric code
/// when the wallet supplied one.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    pub code: Option<i64>,
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { code: None, message: message.into() }
    }

    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self { code: Some(code), message: message.into() }
    }

    pub fn user_rejected() -> Self {
        Self::with_code(CODE_USER_REJECTED, "User rejected the request.")
    }

    pub fn request_pending() -> Self {
        Self::with_code(CODE_REQUEST_PENDING, "Request of this type already processing.")
    }

    pub fn unknown_chain(chain_id_hex: &str) -> Self {
        Self::with_code(
            CODE_UNKNOWN_CHAIN,
            format!("Unrecognized chain ID \"{chain_id_hex}\"."),
        )
    }

    pub fn is_user_rejected(&self) -> bool {
        self.code == Some(CODE_USER_REJECTED)
            || REJECTION_FRAGMENTS.iter().any(|fragment| self.message.contains(fragment))
    }

    pub fn is_request_pending(&self) -> bool {
        self.code == Some(CODE_REQUEST_PENDING) || self.message.contains(PENDING_FRAGMENT)
    }

    pub fn is_unknown_chain(&self) -> bool {
        self.code == Some(CODE_UNKNOWN_CHAIN)
    }
}

/// A read-only contract call (`eth_call`).
#[derive(Debug, Clone)]
pub struct CallRequest {
    pub to: Address,
    pub data: Bytes,
}

/// A value-bearing transaction submitted through the wallet.
#[derive(Debug, Clone)]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

/// Confirmation receipt for a submitted transaction.
#[derive(Debug, Clone)]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub status: bool,
}

/// Notifications pushed by the wallet.
#[derive(Debug, Clone)]
pub enum WalletEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(String),
}

/// The injected wallet capability.
///
/// Everything the SDK needs from a browser wallet goes through this trait,
/// so a session manager can be driven by a real wallet bridge or by the
/// deterministic fake in [`crate::testing`].
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// `eth_requestAccounts` — may prompt the user, may be rejected.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// `eth_accounts` — silent probe, never prompts.
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Current chain id as a hex string (`0xaa36a7`).
    async fn chain_id(&self) -> Result<String, ProviderError>;

    /// `wallet_switchEthereumChain`.
    async fn switch_chain(&self, chain_id_hex: &str) -> Result<(), ProviderError>;

    /// `wallet_addEthereumChain`.
    async fn add_chain(&self, network: &NetworkDescriptor) -> Result<(), ProviderError>;

    /// `eth_call`.
    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, ProviderError>;

    async fn send_transaction(&self, request: &TransactionRequest)
        -> Result<TxHash, ProviderError>;

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TransactionReceipt, ProviderError>;

    /// Wallet event stream (`accountsChanged` / `chainChanged`).
    fn subscribe(&self) -> broadcast::Receiver<WalletEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_detected_by_code_or_message() {
        assert!(ProviderError::user_rejected().is_user_rejected());
        assert!(ProviderError::new("MetaMask Tx Signature: User denied transaction signature.")
            .is_user_rejected());
        assert!(ProviderError::new("ACTION_REJECTED").is_user_rejected());
        assert!(!ProviderError::new("nonce too low").is_user_rejected());
    }

    #[test]
    fn pending_detected_by_code_or_message() {
        assert!(ProviderError::request_pending().is_request_pending());
        assert!(ProviderError::new("wallet is already processing eth_requestAccounts")
            .is_request_pending());
        assert!(!ProviderError::user_rejected().is_request_pending());
    }

    #[test]
    fn unknown_chain_requires_the_code() {
        assert!(ProviderError::unknown_chain("0xaa36a7").is_unknown_chain());
        assert!(!ProviderError::new("Unrecognized chain").is_unknown_chain());
    }
}
