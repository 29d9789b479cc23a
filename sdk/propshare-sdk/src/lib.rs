pub mod config;
pub mod contract;
pub mod core;
pub mod error;
pub mod invest;
pub mod network;
pub mod profile;
pub mod properties;
pub mod retry;
pub mod session;
pub mod testing;
pub mod types;

pub use crate::config::{FlowSettings, InvestmentLimits, NetworkDescriptor};
pub use crate::contract::ContractClient;
pub use crate::core::constants::DEFAULT_CONTRACT_ADDRESS;
pub use crate::core::provider::{
    CallRequest, ProviderError, TransactionReceipt, TransactionRequest, WalletEvent,
    WalletProvider,
};
pub use crate::core::signer::WalletSigner;
pub use crate::error::{Result, WalletError};
pub use crate::invest::{validate_amount, InvestmentFlow};
pub use crate::network::NetworkReconciler;
pub use crate::profile::{InMemoryProfileStore, ProfileStore, UserProfile};
pub use crate::properties::{demo_listings, LoadSource, PropertyBook};
pub use crate::retry::{with_retry, with_timeout};
pub use crate::session::SessionManager;
pub use crate::types::{
    ConnectedWallet, InvestmentOutcome, PropertyListing, PropertyView, TransactionState,
    WalletSession,
};

pub mod abi {
    pub use propshare_interface::{
        is_contract_revert, ownership_bps, share_price, shares_for_amount, Property,
        OWNERSHIP_SCALE, REVERT_INSUFFICIENT_SHARES, REVERT_PROPERTY_INACTIVE,
        REVERT_ZERO_INVESTMENT,
    };
}
