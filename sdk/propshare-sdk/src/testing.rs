//! Deterministic wallet and contract fakes for tests and examples.
//!
//! [`MockWalletProvider`] plays both roles behind the provider boundary: a
//! scriptable wallet (accounts, chains, one-line failure injection, event
//! emission) and an in-process `FractionalProperty` simulation that
//! enforces the contract's rules, revert strings included. A journal of
//! provider method names supports assertions like "no network call was
//! made" or "exactly one add-chain request".

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use alloy_primitives::{Address, TxHash, B256, U256};
use alloy_sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use tokio::sync::{broadcast, Notify};

use propshare_interface::{
    getActivePropertiesCall, getAllPropertiesCall, getUserInvestmentCall,
    getUserOwnershipPercentageCall, investCall, listPropertyCall, ownership_bps,
    shares_for_amount, Property, REVERT_INSUFFICIENT_SHARES, REVERT_PROPERTY_INACTIVE,
    REVERT_ZERO_INVESTMENT,
};

use crate::config::NetworkDescriptor;
use crate::core::provider::{
    CallRequest, ProviderError, TransactionReceipt, TransactionRequest, WalletEvent,
    WalletProvider,
};
use crate::properties::demo_listings;
use crate::types::PropertyView;

fn revert(reason: &str) -> ProviderError {
    ProviderError::new(format!("execution reverted: {reason}"))
}

/// The `FractionalProperty` contract, simulated.
struct ContractSim {
    owner: Address,
    properties: Vec<PropertyView>,
    shares: HashMap<(U256, Address), U256>,
}

impl ContractSim {
    fn call(&self, data: &[u8]) -> Result<Vec<u8>, ProviderError> {
        if data.starts_with(&getAllPropertiesCall::SELECTOR) {
            let props: Vec<Property> =
                self.properties.iter().cloned().map(Property::from).collect();
            Ok(props.abi_encode())
        } else if data.starts_with(&getActivePropertiesCall::SELECTOR) {
            let props: Vec<Property> = self
                .properties
                .iter()
                .filter(|p| p.active)
                .cloned()
                .map(Property::from)
                .collect();
            Ok(props.abi_encode())
        } else if data.starts_with(&getUserInvestmentCall::SELECTOR) {
            let call = getUserInvestmentCall::abi_decode(data)
                .map_err(|err| ProviderError::new(err.to_string()))?;
            let shares = self
                .shares
                .get(&(call.propertyId, call.investor))
                .copied()
                .unwrap_or(U256::ZERO);
            Ok(shares.abi_encode())
        } else if data.starts_with(&getUserOwnershipPercentageCall::SELECTOR) {
            let call = getUserOwnershipPercentageCall::abi_decode(data)
                .map_err(|err| ProviderError::new(err.to_string()))?;
            let property = self
                .properties
                .iter()
                .find(|p| p.id == call.propertyId)
                .ok_or_else(|| ProviderError::new("execution reverted"))?;
            let shares = self
                .shares
                .get(&(call.propertyId, call.investor))
                .copied()
                .unwrap_or(U256::ZERO);
            let bps = ownership_bps(shares, property.total_shares).unwrap_or(U256::ZERO);
            Ok(bps.abi_encode())
        } else {
            Err(ProviderError::new("unknown selector"))
        }
    }

    fn transact(&mut self, from: Address, value: U256, data: &[u8]) -> Result<(), ProviderError> {
        if data.starts_with(&investCall::SELECTOR) {
            let call = investCall::abi_decode(data)
                .map_err(|err| ProviderError::new(err.to_string()))?;
            self.invest(from, call.propertyId, value)
        } else if data.starts_with(&listPropertyCall::SELECTOR) {
            let call = listPropertyCall::abi_decode(data)
                .map_err(|err| ProviderError::new(err.to_string()))?;
            if from != self.owner {
                return Err(revert("OwnableUnauthorizedAccount"));
            }
            let id = U256::from(self.properties.len() as u64);
            self.properties.push(PropertyView {
                id,
                name: call.name,
                location: call.location,
                image_url: call.imageUrl,
                total_value: call.totalValue,
                total_shares: call.totalShares,
                shares_issued: U256::ZERO,
                active: true,
            });
            Ok(())
        } else {
            Err(ProviderError::new("unknown selector"))
        }
    }

    fn invest(&mut self, from: Address, property_id: U256, value: U256) -> Result<(), ProviderError> {
        let Some(property) = self.properties.iter_mut().find(|p| p.id == property_id) else {
            return Err(ProviderError::new("execution reverted"));
        };
        if value.is_zero() {
            return Err(revert(REVERT_ZERO_INVESTMENT));
        }
        if !property.active {
            return Err(revert(REVERT_PROPERTY_INACTIVE));
        }
        let shares = shares_for_amount(value, property.total_value, property.total_shares)
            .ok_or_else(|| ProviderError::new("execution reverted"))?;
        if shares > property.total_shares - property.shares_issued {
            return Err(revert(REVERT_INSUFFICIENT_SHARES));
        }
        property.shares_issued += shares;
        if property.shares_issued == property.total_shares {
            property.active = false;
        }
        *self.shares.entry((property_id, from)).or_insert(U256::ZERO) += shares;
        Ok(())
    }
}

struct Inner {
    accounts: Mutex<Vec<Address>>,
    chain_id: Mutex<String>,
    known_chains: Mutex<HashSet<String>>,
    request_accounts_error: Mutex<Option<ProviderError>>,
    switch_error: Mutex<Option<ProviderError>>,
    contract_down: Mutex<bool>,
    receipts_revert: Mutex<bool>,
    receipt_gate: Mutex<Option<Arc<Notify>>>,
    journal: Mutex<Vec<&'static str>>,
    events: broadcast::Sender<WalletEvent>,
    contract: Mutex<ContractSim>,
    receipts: Mutex<HashMap<TxHash, TransactionReceipt>>,
    nonce: Mutex<u64>,
}

#[derive(Clone)]
pub struct MockWalletProvider {
    inner: Arc<Inner>,
}

impl Default for MockWalletProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWalletProvider {
    pub const DEFAULT_ACCOUNT: Address = Address::repeat_byte(0x42);

    /// A wallet on Sepolia with one account and the demo listings seeded.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            inner: Arc::new(Inner {
                accounts: Mutex::new(vec![Self::DEFAULT_ACCOUNT]),
                chain_id: Mutex::new("0xaa36a7".to_string()),
                known_chains: Mutex::new(
                    ["0xaa36a7".to_string(), "0x7a69".to_string()].into_iter().collect(),
                ),
                request_accounts_error: Mutex::new(None),
                switch_error: Mutex::new(None),
                contract_down: Mutex::new(false),
                receipts_revert: Mutex::new(false),
                receipt_gate: Mutex::new(None),
                journal: Mutex::new(Vec::new()),
                events,
                contract: Mutex::new(ContractSim {
                    owner: Self::DEFAULT_ACCOUNT,
                    properties: demo_listings(),
                    shares: HashMap::new(),
                }),
                receipts: Mutex::new(HashMap::new()),
                nonce: Mutex::new(0),
            }),
        }
    }

    pub fn with_chain_id(self, chain_id_hex: &str) -> Self {
        *self.inner.chain_id.lock().expect("mock state poisoned") = chain_id_hex.to_string();
        self
    }

    pub fn with_known_chains(self, chain_ids: &[&str]) -> Self {
        *self.inner.known_chains.lock().expect("mock state poisoned") =
            chain_ids.iter().map(|id| id.to_lowercase()).collect();
        self
    }

    pub fn with_accounts(self, accounts: Vec<Address>) -> Self {
        if let Some(first) = accounts.first() {
            self.inner.contract.lock().expect("mock state poisoned").owner = *first;
        }
        *self.inner.accounts.lock().expect("mock state poisoned") = accounts;
        self
    }

    pub fn with_properties(self, properties: Vec<PropertyView>) -> Self {
        self.inner.contract.lock().expect("mock state poisoned").properties = properties;
        self
    }

    /// Every `eth_call` and transaction fails as if the node were gone.
    pub fn with_contract_down(self) -> Self {
        *self.inner.contract_down.lock().expect("mock state poisoned") = true;
        self
    }

    /// Fail account requests with `err` until cleared.
    pub fn fail_request_accounts(&self, err: ProviderError) {
        *self.inner.request_accounts_error.lock().expect("mock state poisoned") = Some(err);
    }

    pub fn clear_request_accounts_failure(&self) {
        *self.inner.request_accounts_error.lock().expect("mock state poisoned") = None;
    }

    /// Fail switch requests with `err` until cleared.
    pub fn fail_switch(&self, err: ProviderError) {
        *self.inner.switch_error.lock().expect("mock state poisoned") = Some(err);
    }

    /// Transactions are accepted but confirm with a reverted receipt, and
    /// the simulated contract state stays untouched.
    pub fn revert_receipts(&self) {
        *self.inner.receipts_revert.lock().expect("mock state poisoned") = true;
    }

    /// Park `wait_for_receipt` callers until [`release_receipts`](Self::release_receipts).
    pub fn hold_receipts(&self) {
        *self.inner.receipt_gate.lock().expect("mock state poisoned") =
            Some(Arc::new(Notify::new()));
    }

    pub fn release_receipts(&self) {
        if let Some(gate) = self.inner.receipt_gate.lock().expect("mock state poisoned").take() {
            gate.notify_waiters();
        }
    }

    /// Push a wallet event to every subscriber.
    pub fn emit(&self, event: WalletEvent) {
        let _ = self.inner.events.send(event);
    }

    /// How many event receivers are currently subscribed.
    pub fn event_subscribers(&self) -> usize {
        self.inner.events.receiver_count()
    }

    pub fn journal(&self) -> Vec<&'static str> {
        self.inner.journal.lock().expect("mock state poisoned").clone()
    }

    pub fn calls(&self, name: &str) -> usize {
        self.journal().iter().filter(|entry| **entry == name).count()
    }

    pub fn reported_chain(&self) -> String {
        self.inner.chain_id.lock().expect("mock state poisoned").clone()
    }

    pub fn shares_of(&self, property_id: U256, investor: Address) -> U256 {
        self.inner
            .contract
            .lock()
            .expect("mock state poisoned")
            .shares
            .get(&(property_id, investor))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn set_property_active(&self, property_id: U256, active: bool) {
        let mut contract = self.inner.contract.lock().expect("mock state poisoned");
        if let Some(property) = contract.properties.iter_mut().find(|p| p.id == property_id) {
            property.active = active;
        }
    }

    fn log(&self, name: &'static str) {
        self.inner.journal.lock().expect("mock state poisoned").push(name);
    }

    fn next_hash(&self) -> (TxHash, u64) {
        let mut nonce = self.inner.nonce.lock().expect("mock state poisoned");
        *nonce += 1;
        let hash = B256::from(U256::from(*nonce).to_be_bytes::<32>());
        (hash, *nonce)
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.log("request_accounts");
        if let Some(err) =
            self.inner.request_accounts_error.lock().expect("mock state poisoned").clone()
        {
            return Err(err);
        }
        Ok(self.inner.accounts.lock().expect("mock state poisoned").clone())
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.log("accounts");
        Ok(self.inner.accounts.lock().expect("mock state poisoned").clone())
    }

    async fn chain_id(&self) -> Result<String, ProviderError> {
        self.log("chain_id");
        Ok(self.reported_chain())
    }

    async fn switch_chain(&self, chain_id_hex: &str) -> Result<(), ProviderError> {
        self.log("switch_chain");
        if let Some(err) = self.inner.switch_error.lock().expect("mock state poisoned").clone() {
            return Err(err);
        }
        let known = self
            .inner
            .known_chains
            .lock()
            .expect("mock state poisoned")
            .contains(&chain_id_hex.to_lowercase());
        if !known {
            return Err(ProviderError::unknown_chain(chain_id_hex));
        }
        *self.inner.chain_id.lock().expect("mock state poisoned") = chain_id_hex.to_lowercase();
        Ok(())
    }

    async fn add_chain(&self, network: &NetworkDescriptor) -> Result<(), ProviderError> {
        self.log("add_chain");
        let id = network.chain_id_hex.to_lowercase();
        self.inner.known_chains.lock().expect("mock state poisoned").insert(id.clone());
        *self.inner.chain_id.lock().expect("mock state poisoned") = id;
        Ok(())
    }

    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, ProviderError> {
        self.log("call");
        if *self.inner.contract_down.lock().expect("mock state poisoned") {
            return Err(ProviderError::new("connection refused"));
        }
        self.inner.contract.lock().expect("mock state poisoned").call(&request.data)
    }

    async fn send_transaction(
        &self,
        request: &TransactionRequest,
    ) -> Result<TxHash, ProviderError> {
        self.log("send_transaction");
        if *self.inner.contract_down.lock().expect("mock state poisoned") {
            return Err(ProviderError::new("connection refused"));
        }
        let reverted = *self.inner.receipts_revert.lock().expect("mock state poisoned");
        if !reverted {
            self.inner
                .contract
                .lock()
                .expect("mock state poisoned")
                .transact(request.from, request.value, &request.data)?;
        }
        let (hash, block_number) = self.next_hash();
        self.inner.receipts.lock().expect("mock state poisoned").insert(
            hash,
            TransactionReceipt { transaction_hash: hash, block_number, status: !reverted },
        );
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TransactionReceipt, ProviderError> {
        self.log("wait_for_receipt");
        let gate = self.inner.receipt_gate.lock().expect("mock state poisoned").clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.inner
            .receipts
            .lock()
            .expect("mock state poisoned")
            .get(&hash)
            .cloned()
            .ok_or_else(|| ProviderError::new("receipt not found"))
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.inner.events.subscribe()
    }
}
