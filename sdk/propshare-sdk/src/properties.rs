//! Local property view store.
//!
//! Loaded from the contract when reachable, from the built-in demo
//! listings otherwise. Investment completions are applied optimistically;
//! an authoritative refresh replaces the whole book when it lands.

use alloy_primitives::U256;
use tokio::sync::RwLock;
use tracing::warn;

use crate::config::{ether, FlowSettings};
use crate::contract::ContractClient;
use crate::retry::with_retry;
use crate::types::PropertyView;

/// Where the book's current contents came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Contract,
    Fallback,
}

#[derive(Default)]
pub struct PropertyBook {
    inner: RwLock<Vec<PropertyView>>,
}

impl PropertyBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch all properties through the retry wrapper; fall back to the
    /// demo listings when the contract stays unreachable.
    pub async fn load(&self, contract: &ContractClient, settings: &FlowSettings) -> LoadSource {
        match with_retry(
            || contract.get_all_properties(),
            settings.retry_attempts,
            settings.retry_delay,
        )
        .await
        {
            Ok(properties) => {
                self.replace(properties).await;
                LoadSource::Contract
            }
            Err(err) => {
                warn!(%err, "contract unreachable, serving demo listings");
                self.replace(demo_listings()).await;
                LoadSource::Fallback
            }
        }
    }

    pub async fn replace(&self, properties: Vec<PropertyView>) {
        *self.inner.write().await = properties;
    }

    pub async fn get(&self, id: U256) -> Option<PropertyView> {
        self.inner.read().await.iter().find(|p| p.id == id).cloned()
    }

    pub async fn all(&self) -> Vec<PropertyView> {
        self.inner.read().await.clone()
    }

    pub async fn active(&self) -> Vec<PropertyView> {
        self.inner.read().await.iter().filter(|p| p.active).cloned().collect()
    }

    /// Optimistic increment after a confirmed investment.
    ///
    /// The `sharesIssued <= totalShares` invariant is enforced on-chain
    /// only; an estimate that runs past the total is logged and left for
    /// the next authoritative refresh to correct.
    pub async fn apply_investment(&self, id: U256, shares: U256) {
        let mut book = self.inner.write().await;
        let Some(property) = book.iter_mut().find(|p| p.id == id) else {
            warn!(%id, "optimistic update for a property not in the book");
            return;
        };
        property.shares_issued = property.shares_issued.saturating_add(shares);
        if property.shares_issued > property.total_shares {
            warn!(
                %id,
                issued = %property.shares_issued,
                total = %property.total_shares,
                "optimistic share count exceeds the total supply"
            );
        }
    }
}

/// The five listings the deployment scripts seed.
pub fn demo_listings() -> Vec<PropertyView> {
    let listing = |id: u64, name: &str, location: &str, image: &str, value: u64, shares: u64| {
        PropertyView {
            id: U256::from(id),
            name: name.to_string(),
            location: location.to_string(),
            image_url: image.to_string(),
            total_value: ether(value),
            total_shares: U256::from(shares),
            shares_issued: U256::ZERO,
            active: true,
        }
    };

    vec![
        listing(
            0,
            "Luxury Apartment in Manhattan",
            "New York, NY",
            "https://images.unsplash.com/photo-1560448204-e02f11c3d0e2?w=800",
            100,
            10_000,
        ),
        listing(
            1,
            "Beachfront Villa",
            "Miami, FL",
            "https://images.unsplash.com/photo-1582268611958-ebfd161ef9cf?w=800",
            200,
            20_000,
        ),
        listing(
            2,
            "Modern Office Building",
            "San Francisco, CA",
            "https://images.unsplash.com/photo-1486406146926-c627a92ad1ab?w=800",
            300,
            30_000,
        ),
        listing(
            3,
            "Mountain Retreat Lodge",
            "Aspen, CO",
            "https://images.unsplash.com/photo-1626178793926-22b28830aa30?w=800",
            80,
            8_000,
        ),
        listing(
            4,
            "Waterfront Condo",
            "Seattle, WA",
            "https://images.unsplash.com/photo-1545241047-6083a3684587?w=800",
            120,
            12_000,
        ),
    ]
}
