//! Off-chain user profile boundary.
//!
//! Profiles are keyed by the external auth identifier and exchanged as
//! plain request/response. This sits outside the wallet core; the trait
//! exists so hosts can plug in their own persistence.

use std::collections::HashMap;

use alloy_primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub auth_id: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub wallet_address: Option<Address>,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn fetch(&self, auth_id: &str) -> Result<Option<UserProfile>>;
    async fn upsert(&self, profile: UserProfile) -> Result<()>;
}

#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn fetch(&self, auth_id: &str) -> Result<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(auth_id).cloned())
    }

    async fn upsert(&self, profile: UserProfile) -> Result<()> {
        self.profiles.write().await.insert(profile.auth_id.clone(), profile);
        Ok(())
    }
}
