use std::fmt;
use std::sync::Arc;

use alloy_primitives::{Address, Bytes, TxHash, U256};

use crate::core::provider::{ProviderError, TransactionRequest, WalletProvider};

/// Signing capability bound to one wallet account.
///
/// The wallet itself holds the key; this handle only fixes the `from`
/// address for transactions routed through the provider.
#[derive(Clone)]
pub struct WalletSigner {
    address: Address,
    provider: Arc<dyn WalletProvider>,
}

impl WalletSigner {
    pub(crate) fn new(address: Address, provider: Arc<dyn WalletProvider>) -> Self {
        Self { address, provider }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Submit a value-bearing call from the bound account.
    pub async fn send_transaction(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
    ) -> Result<TxHash, ProviderError> {
        let request = TransactionRequest { from: self.address, to, value, data };
        self.provider.send_transaction(&request).await
    }
}

impl fmt::Debug for WalletSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSigner").field("address", &self.address).finish()
    }
}
