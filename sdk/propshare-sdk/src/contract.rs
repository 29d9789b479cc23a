//! Typed client for the FractionalProperty contract.
//!
//! Reads go through `eth_call` and ABI decoding; writes go through a
//! [`WalletSigner`] as value-bearing transactions. Either way every byte
//! crosses the injected wallet provider boundary.

use std::sync::Arc;

use alloy_primitives::{Address, TxHash, U256};
use alloy_sol_types::SolCall;

use propshare_interface::{
    getActivePropertiesCall, getAllPropertiesCall, getUserInvestmentCall,
    getUserOwnershipPercentageCall, investCall, listPropertyCall,
};

use crate::config::FlowSettings;
use crate::core::provider::{CallRequest, TransactionReceipt, WalletProvider};
use crate::core::signer::WalletSigner;
use crate::error::{Result, WalletError};
use crate::retry::with_timeout;
use crate::types::{PropertyListing, PropertyView};

#[derive(Clone)]
pub struct ContractClient {
    address: Address,
    provider: Arc<dyn WalletProvider>,
    settings: FlowSettings,
}

impl ContractClient {
    pub fn new(address: Address, provider: Arc<dyn WalletProvider>, settings: FlowSettings) -> Self {
        Self { address, provider, settings }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub(crate) fn provider(&self) -> Arc<dyn WalletProvider> {
        self.provider.clone()
    }

    async fn call_raw(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let request = CallRequest { to: self.address, data: data.into() };
        with_timeout(self.settings.call_timeout, async {
            self.provider.call(&request).await.map_err(WalletError::ContractUnreachable)
        })
        .await
    }

    pub async fn get_all_properties(&self) -> Result<Vec<PropertyView>> {
        let data = self.call_raw(getAllPropertiesCall {}.abi_encode()).await?;
        let properties = getAllPropertiesCall::abi_decode_returns(&data)
            .map_err(|err| WalletError::AbiDecode(err.to_string()))?;
        Ok(properties.into_iter().map(PropertyView::from).collect())
    }

    pub async fn get_active_properties(&self) -> Result<Vec<PropertyView>> {
        let data = self.call_raw(getActivePropertiesCall {}.abi_encode()).await?;
        let properties = getActivePropertiesCall::abi_decode_returns(&data)
            .map_err(|err| WalletError::AbiDecode(err.to_string()))?;
        Ok(properties.into_iter().map(PropertyView::from).collect())
    }

    /// Shares held by `investor` in `property_id`.
    pub async fn get_user_investment(&self, property_id: U256, investor: Address) -> Result<U256> {
        let call = getUserInvestmentCall { propertyId: property_id, investor };
        let data = self.call_raw(call.abi_encode()).await?;
        getUserInvestmentCall::abi_decode_returns(&data)
            .map_err(|err| WalletError::AbiDecode(err.to_string()))
    }

    /// Ownership of `investor` in basis points (2500 = 25.00%).
    pub async fn get_user_ownership_percentage(
        &self,
        property_id: U256,
        investor: Address,
    ) -> Result<U256> {
        let call = getUserOwnershipPercentageCall { propertyId: property_id, investor };
        let data = self.call_raw(call.abi_encode()).await?;
        getUserOwnershipPercentageCall::abi_decode_returns(&data)
            .map_err(|err| WalletError::AbiDecode(err.to_string()))
    }

    /// Submit the payable `invest` call; `amount` rides as the transaction
    /// value.
    pub async fn invest(
        &self,
        signer: &WalletSigner,
        property_id: U256,
        amount: U256,
    ) -> Result<TxHash> {
        let data = investCall { propertyId: property_id }.abi_encode();
        signer
            .send_transaction(self.address, amount, data.into())
            .await
            .map_err(WalletError::from_transaction)
    }

    /// Owner-only: list a new property.
    pub async fn list_property(
        &self,
        signer: &WalletSigner,
        listing: &PropertyListing,
    ) -> Result<TxHash> {
        let call = listPropertyCall {
            name: listing.name.clone(),
            location: listing.location.clone(),
            imageUrl: listing.image_url.clone(),
            totalValue: listing.total_value,
            totalShares: listing.total_shares,
        };
        signer
            .send_transaction(self.address, U256::ZERO, call.abi_encode().into())
            .await
            .map_err(WalletError::from_transaction)
    }

    pub async fn wait_for_receipt(&self, hash: TxHash) -> Result<TransactionReceipt> {
        self.provider.wait_for_receipt(hash).await.map_err(WalletError::from)
    }
}
