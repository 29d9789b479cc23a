use alloy_primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};

use propshare_interface::Property;

/// Live wallet session state, published through a watch channel.
///
/// Created on the first successful account request, mutated on wallet
/// events, reset when the wallet reports zero accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletSession {
    pub connected: bool,
    pub address: Option<Address>,
    pub chain_id: String,
    /// Bumped on every chain change. Observers reload dependent data
    /// wholesale when this moves; there is no incremental adjustment.
    pub reload_generation: u64,
}

/// Result of a successful connection.
#[derive(Debug, Clone)]
pub struct ConnectedWallet {
    pub address: Address,
    pub chain_id: String,
}

/// Transaction lifecycle.
///
/// Transitions are strictly forward; `Failed` is reachable only from
/// `Confirming` or `Processing`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionState {
    #[default]
    Idle,
    Preparing,
    Confirming,
    Processing,
    Completed,
    Failed,
}

impl TransactionState {
    fn rank(self) -> u8 {
        match self {
            TransactionState::Idle => 0,
            TransactionState::Preparing => 1,
            TransactionState::Confirming => 2,
            TransactionState::Processing => 3,
            TransactionState::Completed => 4,
            TransactionState::Failed => 5,
        }
    }

    pub fn can_advance_to(self, next: TransactionState) -> bool {
        match next {
            TransactionState::Failed => {
                matches!(self, TransactionState::Confirming | TransactionState::Processing)
            }
            _ => next.rank() == self.rank() + 1,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TransactionState::Completed | TransactionState::Failed)
    }
}

/// A property as the UI sees it.
///
/// `shares_issued` may run ahead of the chain after an optimistic update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyView {
    pub id: U256,
    pub name: String,
    pub location: String,
    pub image_url: String,
    pub total_value: U256,
    pub total_shares: U256,
    pub shares_issued: U256,
    pub active: bool,
}

impl PropertyView {
    /// Wei per share, `None` for a zero-share listing.
    pub fn share_price(&self) -> Option<U256> {
        propshare_interface::share_price(self.total_value, self.total_shares)
    }

    pub fn remaining_shares(&self) -> U256 {
        self.total_shares.saturating_sub(self.shares_issued)
    }

    /// How subscribed the property is, in basis points.
    pub fn subscription_bps(&self) -> Option<U256> {
        propshare_interface::ownership_bps(self.shares_issued, self.total_shares)
    }
}

impl From<Property> for PropertyView {
    fn from(p: Property) -> Self {
        Self {
            id: p.id,
            name: p.name,
            location: p.location,
            image_url: p.imageUrl,
            total_value: p.totalValue,
            total_shares: p.totalShares,
            shares_issued: p.sharesIssued,
            active: p.active,
        }
    }
}

impl From<PropertyView> for Property {
    fn from(view: PropertyView) -> Self {
        Property {
            id: view.id,
            name: view.name,
            location: view.location,
            imageUrl: view.image_url,
            totalValue: view.total_value,
            totalShares: view.total_shares,
            sharesIssued: view.shares_issued,
            active: view.active,
        }
    }
}

/// Parameters for listing a new property (owner-only contract call).
#[derive(Debug, Clone)]
pub struct PropertyListing {
    pub name: String,
    pub location: String,
    pub image_url: String,
    pub total_value: U256,
    pub total_shares: U256,
}

/// What a completed investment produced.
#[derive(Debug, Clone)]
pub struct InvestmentOutcome {
    pub tx_hash: TxHash,
    /// Client-side estimate applied to the local view; the chain remains
    /// authoritative.
    pub estimated_shares: U256,
}
