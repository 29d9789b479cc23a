use alloy_primitives::U256;
use thiserror::Error;

use crate::core::provider::ProviderError;

/// SDK error taxonomy. `Display` strings are the user-facing messages.
#[derive(Debug, Error)]
pub enum WalletError {
    /// No wallet extension is available at all. Distinct from any network
    /// failure.
    #[error("No Ethereum wallet found. Please install MetaMask.")]
    NoWallet,

    /// The wallet answered the account request with an empty list.
    #[error("No accounts found. Please check your wallet.")]
    NoAccounts,

    /// The user rejected the account request.
    #[error("Please connect your wallet to continue.")]
    ConnectionRejected,

    /// The wallet is still busy with an earlier request.
    #[error("Request already pending. Please check your wallet.")]
    RequestPending,

    /// A submission for this property is already in flight.
    #[error("An investment for this property is already in progress.")]
    InvestmentInFlight,

    #[error("Could not add the {network} network to your wallet.")]
    ChainAddFailed { network: String },

    #[error("Network switch was rejected. Please switch to {network} manually.")]
    SwitchRejected { network: String },

    #[error("Failed to switch network: {0}")]
    SwitchFailed(String),

    #[error("Unable to check network: {0}")]
    NetworkCheckFailed(ProviderError),

    #[error("Invalid investment amount.")]
    InvalidAmount,

    #[error("Investment must be greater than 0")]
    NonPositiveAmount,

    #[error("Minimum investment is {min} ETH")]
    BelowMinimum { min: String },

    #[error("Maximum investment is {max} ETH")]
    AboveMaximum { max: String },

    /// Unknown, inactive, or zero-valued property.
    #[error("Property {0} is not open for investment.")]
    PropertyUnavailable(U256),

    /// The user rejected the transaction in the wallet.
    #[error("Transaction was rejected in your wallet. You can try again when ready.")]
    TransactionRejected,

    #[error("Transaction reverted: {0}")]
    TransactionReverted(String),

    #[error("Request timed out. Please try again or check your wallet.")]
    Timeout,

    #[error("Contract unreachable: {0}")]
    ContractUnreachable(ProviderError),

    #[error("Failed to decode contract response: {0}")]
    AbiDecode(String),

    /// Anything the taxonomy does not recognize.
    #[error("Wallet error: {0}")]
    Provider(ProviderError),
}

pub type Result<T> = std::result::Result<T, WalletError>;

impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        WalletError::Provider(err)
    }
}

impl WalletError {
    /// Classification for failures of the account request.
    pub fn from_connection(err: ProviderError) -> Self {
        if err.is_user_rejected() {
            WalletError::ConnectionRejected
        } else if err.is_request_pending() {
            WalletError::RequestPending
        } else {
            WalletError::Provider(err)
        }
    }

    /// Classification for failures of a transaction submission.
    pub fn from_transaction(err: ProviderError) -> Self {
        if err.is_user_rejected() {
            WalletError::TransactionRejected
        } else if err.is_request_pending() {
            WalletError::RequestPending
        } else if propshare_interface::is_contract_revert(&err.message) {
            WalletError::TransactionReverted(err.message)
        } else {
            WalletError::Provider(err)
        }
    }

    /// True for errors raised before any wallet or network interaction.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            WalletError::InvalidAmount
                | WalletError::NonPositiveAmount
                | WalletError::BelowMinimum { .. }
                | WalletError::AboveMaximum { .. }
                | WalletError::PropertyUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_rejection_gets_the_designated_message() {
        let err = WalletError::from_connection(ProviderError::user_rejected());
        assert_eq!(err.to_string(), "Please connect your wallet to continue.");
    }

    #[test]
    fn transaction_rejection_is_distinct_from_connection_rejection() {
        let err = WalletError::from_transaction(ProviderError::user_rejected());
        assert!(matches!(err, WalletError::TransactionRejected));
    }

    #[test]
    fn revert_reasons_classify_as_reverted() {
        let err = WalletError::from_transaction(ProviderError::new(
            "execution reverted: Not enough shares available",
        ));
        assert!(matches!(err, WalletError::TransactionReverted(_)));
    }

    #[test]
    fn unclassified_errors_stay_generic() {
        let err = WalletError::from_transaction(ProviderError::new("nonce too low"));
        assert!(matches!(err, WalletError::Provider(_)));
    }
}
