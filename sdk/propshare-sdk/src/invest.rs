//! The investment transaction flow.
//!
//! Validates the entered amount, ensures a connected wallet on the right
//! network, submits the value-bearing `invest` call, and drives the
//! transaction state machine. On completion the local book is bumped
//! optimistically and then refreshed from the chain when possible.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use alloy_primitives::U256;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::{format_eth, FlowSettings, InvestmentLimits, NetworkDescriptor};
use crate::contract::ContractClient;
use crate::error::{Result, WalletError};
use crate::network::NetworkReconciler;
use crate::properties::PropertyBook;
use crate::retry::{with_retry, with_timeout};
use crate::session::SessionManager;
use crate::types::{InvestmentOutcome, TransactionState};

/// Validate a user-entered ether amount against the configured bounds.
///
/// Violations abort before any wallet or network interaction and are
/// validation errors, never network errors.
pub fn validate_amount(input: &str, limits: &InvestmentLimits) -> Result<U256> {
    let trimmed = input.trim();
    if trimmed.starts_with('-') {
        return Err(WalletError::InvalidAmount);
    }
    let amount =
        alloy_primitives::utils::parse_ether(trimmed).map_err(|_| WalletError::InvalidAmount)?;
    if amount.is_zero() {
        return Err(WalletError::NonPositiveAmount);
    }
    if amount < limits.min {
        return Err(WalletError::BelowMinimum { min: format_eth(limits.min) });
    }
    if amount > limits.max {
        return Err(WalletError::AboveMaximum { max: format_eth(limits.max) });
    }
    Ok(amount)
}

pub struct InvestmentFlow {
    session: SessionManager,
    contract: ContractClient,
    book: Arc<PropertyBook>,
    network: NetworkDescriptor,
    limits: InvestmentLimits,
    settings: FlowSettings,
    state: Arc<watch::Sender<TransactionState>>,
    in_flight: Mutex<HashSet<U256>>,
}

impl InvestmentFlow {
    pub fn new(
        session: SessionManager,
        contract: ContractClient,
        book: Arc<PropertyBook>,
        network: NetworkDescriptor,
        limits: InvestmentLimits,
        settings: FlowSettings,
    ) -> Self {
        let (state, _) = watch::channel(TransactionState::Idle);
        Self {
            session,
            contract,
            book,
            network,
            limits,
            settings,
            state: Arc::new(state),
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Observe the transaction lifecycle. Progress is reported here, not
    /// through the return value of [`invest`](Self::invest).
    pub fn subscribe_state(&self) -> watch::Receiver<TransactionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> TransactionState {
        *self.state.borrow()
    }

    pub fn validate(&self, input: &str) -> Result<U256> {
        validate_amount(input, &self.limits)
    }

    /// Run the full flow for one property.
    ///
    /// Steps are strictly sequential; a second call for the same property
    /// while one is in flight fails fast with
    /// [`WalletError::InvestmentInFlight`].
    pub async fn invest(&self, property_id: U256, amount_text: &str) -> Result<InvestmentOutcome> {
        let amount = self.validate(amount_text)?;
        let property = self
            .book
            .get(property_id)
            .await
            .ok_or(WalletError::PropertyUnavailable(property_id))?;
        if !property.active {
            return Err(WalletError::PropertyUnavailable(property_id));
        }
        let estimated_shares =
            propshare_interface::shares_for_amount(amount, property.total_value, property.total_shares)
                .ok_or(WalletError::PropertyUnavailable(property_id))?;

        let _guard = self.acquire_flight(property_id)?;
        self.state.send_replace(TransactionState::Idle);

        self.ensure_ready().await?;
        let signer = self.session.signer()?;

        self.advance(TransactionState::Preparing);
        info!(
            property = %property_id,
            amount = %format_eth(amount),
            shares = %estimated_shares,
            "submitting investment"
        );

        self.advance(TransactionState::Confirming);
        let tx_hash = with_timeout(
            self.settings.transaction_timeout,
            self.contract.invest(&signer, property_id, amount),
        )
        .await
        .map_err(|err| self.fail(err))?;

        self.advance(TransactionState::Processing);
        info!(%tx_hash, "transaction submitted, awaiting receipt");

        let receipt = with_timeout(
            self.settings.transaction_timeout,
            self.contract.wait_for_receipt(tx_hash),
        )
        .await
        .map_err(|err| self.fail(err))?;
        if !receipt.status {
            return Err(self.fail(WalletError::TransactionReverted(
                "transaction reverted on-chain".to_string(),
            )));
        }

        self.advance(TransactionState::Completed);
        self.book.apply_investment(property_id, estimated_shares).await;
        self.refresh_book().await;

        Ok(InvestmentOutcome { tx_hash, estimated_shares })
    }

    /// Connect first if no session exists, then reconcile the network.
    async fn ensure_ready(&self) -> Result<()> {
        if !self.session.session().connected {
            self.session.connect().await?;
        }
        let reconciler =
            NetworkReconciler::new(self.contract.provider(), self.settings.clone());
        reconciler.ensure_network(&self.network).await
    }

    /// Authoritative re-read after a completed investment. A failure keeps
    /// the optimistic values; they are never rolled back.
    async fn refresh_book(&self) {
        match with_retry(
            || self.contract.get_all_properties(),
            self.settings.retry_attempts,
            self.settings.retry_delay,
        )
        .await
        {
            Ok(properties) => self.book.replace(properties).await,
            Err(err) => {
                warn!(%err, "authoritative refresh failed, keeping the optimistic view");
            }
        }
    }

    fn acquire_flight(&self, property_id: U256) -> Result<FlightGuard<'_>> {
        let mut in_flight = self.in_flight.lock().expect("in-flight latch poisoned");
        if !in_flight.insert(property_id) {
            return Err(WalletError::InvestmentInFlight);
        }
        Ok(FlightGuard { flow: self, property_id })
    }

    fn advance(&self, next: TransactionState) {
        let current = *self.state.borrow();
        if current.can_advance_to(next) {
            self.state.send_replace(next);
        } else {
            warn!(?current, ?next, "ignoring out-of-order state transition");
        }
    }

    fn fail(&self, err: WalletError) -> WalletError {
        warn!(%err, "investment flow failed");
        self.advance(TransactionState::Failed);
        err
    }
}

/// Releases the per-property latch when the flow exits, on any path.
struct FlightGuard<'a> {
    flow: &'a InvestmentFlow,
    property_id: U256,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flow
            .in_flight
            .lock()
            .expect("in-flight latch poisoned")
            .remove(&self.property_id);
    }
}
