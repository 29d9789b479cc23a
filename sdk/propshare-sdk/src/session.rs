//! Wallet session establishment and lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use alloy_primitives::Address;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::config::FlowSettings;
use crate::core::provider::{WalletEvent, WalletProvider};
use crate::core::signer::WalletSigner;
use crate::error::{Result, WalletError};
use crate::retry::{with_retry, with_timeout};
use crate::types::{ConnectedWallet, WalletSession};

/// Owns the wallet session: connection, the session snapshot, and the
/// wallet event subscription.
///
/// The provider is injected; `None` models the no-wallet-installed case.
#[derive(Clone)]
pub struct SessionManager {
    provider: Option<Arc<dyn WalletProvider>>,
    settings: FlowSettings,
    state: Arc<watch::Sender<WalletSession>>,
    subscribed: Arc<AtomicBool>,
}

impl SessionManager {
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, settings: FlowSettings) -> Self {
        let (state, _) = watch::channel(WalletSession::default());
        Self {
            provider,
            settings,
            state: Arc::new(state),
            subscribed: Arc::new(AtomicBool::new(false)),
        }
    }

    fn provider(&self) -> Result<&Arc<dyn WalletProvider>> {
        self.provider.as_ref().ok_or(WalletError::NoWallet)
    }

    /// Silent probe (`eth_accounts`): adopt an existing authorization
    /// without prompting. Returns `None` when no account is exposed.
    pub async fn check_connection(&self) -> Result<Option<ConnectedWallet>> {
        let provider = self.provider()?.clone();
        let accounts = provider.accounts().await?;
        let Some(address) = accounts.first().copied() else {
            debug!("no pre-authorized accounts");
            return Ok(None);
        };
        let chain_id = provider.chain_id().await.map_err(WalletError::NetworkCheckFailed)?;
        self.adopt(address, chain_id.clone());
        self.ensure_subscribed(&provider);
        Ok(Some(ConnectedWallet { address, chain_id }))
    }

    /// Request account access. May prompt the user; may be rejected.
    pub async fn connect(&self) -> Result<ConnectedWallet> {
        let provider = self.provider()?.clone();
        let settings = self.settings.clone();

        let establish = async {
            let accounts = with_retry(
                || provider.request_accounts(),
                settings.retry_attempts,
                settings.retry_delay,
            )
            .await
            .map_err(WalletError::from_connection)?;
            let address = accounts.first().copied().ok_or(WalletError::NoAccounts)?;
            let chain_id =
                provider.chain_id().await.map_err(WalletError::NetworkCheckFailed)?;
            Ok(ConnectedWallet { address, chain_id })
        };

        let connected = with_timeout(settings.connection_timeout, establish).await?;
        info!(address = %connected.address, chain = %connected.chain_id, "wallet connected");
        self.adopt(connected.address, connected.chain_id.clone());
        self.ensure_subscribed(&provider);
        Ok(connected)
    }

    /// Signing handle bound to the first connected account.
    pub fn signer(&self) -> Result<WalletSigner> {
        let provider = self.provider()?.clone();
        let address = self.state.borrow().address.ok_or(WalletError::NoAccounts)?;
        Ok(WalletSigner::new(address, provider))
    }

    pub fn session(&self) -> WalletSession {
        self.state.borrow().clone()
    }

    /// Watch the session snapshot; observers see connection resets and
    /// chain-change reload generations.
    pub fn subscribe(&self) -> watch::Receiver<WalletSession> {
        self.state.subscribe()
    }

    fn adopt(&self, address: Address, chain_id: String) {
        self.state.send_modify(|session| {
            session.connected = true;
            session.address = Some(address);
            session.chain_id = chain_id;
        });
    }

    /// Spawn the wallet event pump. Idempotent per session: calling this
    /// again never duplicates listeners.
    fn ensure_subscribed(&self, provider: &Arc<dyn WalletProvider>) {
        if self.subscribed.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut events = provider.subscribe();
        let state = self.state.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(WalletEvent::AccountsChanged(accounts)) => {
                        match accounts.first().copied() {
                            Some(address) => {
                                debug!(%address, "active account changed");
                                state.send_modify(|session| {
                                    session.connected = true;
                                    session.address = Some(address);
                                });
                            }
                            None => {
                                info!("wallet reported zero accounts, session reset");
                                state.send_modify(|session| {
                                    session.connected = false;
                                    session.address = None;
                                });
                            }
                        }
                    }
                    Ok(WalletEvent::ChainChanged(chain_id)) => {
                        info!(chain = %chain_id, "chain changed, dependent data reloads");
                        state.send_modify(|session| {
                            session.chain_id = chain_id;
                            session.reload_generation += 1;
                        });
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "wallet event stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
}
