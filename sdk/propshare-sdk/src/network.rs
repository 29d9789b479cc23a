//! Network reconciliation against the wallet-reported chain.
//!
//! One module, one classification policy: callers that want to surface the
//! failure use `?`, callers that only need a yes/no match on the error.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{FlowSettings, NetworkDescriptor};
use crate::core::provider::WalletProvider;
use crate::error::{Result, WalletError};
use crate::retry::with_retry;

pub struct NetworkReconciler {
    provider: Arc<dyn WalletProvider>,
    settings: FlowSettings,
}

impl NetworkReconciler {
    pub fn new(provider: Arc<dyn WalletProvider>, settings: FlowSettings) -> Self {
        Self { provider, settings }
    }

    /// Ensure the wallet is on `required`, switching (and adding the chain
    /// once, if the wallet does not know it) as needed.
    ///
    /// Chain-id reads go through the retry wrapper; switch and add prompts
    /// are issued at most once per call.
    pub async fn ensure_network(&self, required: &NetworkDescriptor) -> Result<()> {
        let mut allow_add = true;
        loop {
            let current = self.read_chain_id().await?;
            if required.matches(&current) {
                debug!(chain = %current, "already on the required network");
                return Ok(());
            }

            info!(
                current = %current,
                required = %required.chain_id_hex,
                "network mismatch, requesting switch"
            );
            match self.provider.switch_chain(&required.chain_id_hex).await {
                Ok(()) => {
                    self.verify_switch(required).await;
                    return Ok(());
                }
                Err(err) if err.is_unknown_chain() && allow_add => {
                    info!(network = %required.name, "chain unknown to wallet, requesting add");
                    allow_add = false;
                    self.provider.add_chain(required).await.map_err(|err| {
                        warn!(%err, "wallet refused to add the chain");
                        WalletError::ChainAddFailed { network: required.name.clone() }
                    })?;
                    // Re-check from the top, once.
                }
                Err(err) if err.is_user_rejected() => {
                    return Err(WalletError::SwitchRejected { network: required.name.clone() });
                }
                Err(err) if err.is_request_pending() => {
                    return Err(WalletError::RequestPending);
                }
                Err(err) => return Err(WalletError::SwitchFailed(err.message)),
            }
        }
    }

    async fn read_chain_id(&self) -> Result<String> {
        with_retry(
            || self.provider.chain_id(),
            self.settings.retry_attempts,
            self.settings.retry_delay,
        )
        .await
        .map_err(WalletError::NetworkCheckFailed)
    }

    /// Re-read the chain after a settle delay. A mismatch here is a known
    /// loose end: logged, never fatal.
    async fn verify_switch(&self, required: &NetworkDescriptor) {
        tokio::time::sleep(self.settings.settle_delay).await;
        match self.provider.chain_id().await {
            Ok(chain_id) if required.matches(&chain_id) => {
                info!(network = %required.name, "switched to the required network");
            }
            Ok(chain_id) => {
                warn!(
                    reported = %chain_id,
                    required = %required.chain_id_hex,
                    "wallet reports a different chain after the switch"
                );
            }
            Err(err) => {
                warn!(%err, "could not verify the network switch");
            }
        }
    }
}
