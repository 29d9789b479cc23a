use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::U256;

use propshare_sdk::config::ether;
use propshare_sdk::testing::MockWalletProvider;
use propshare_sdk::{
    ContractClient, FlowSettings, InvestmentFlow, InvestmentLimits, NetworkDescriptor,
    PropertyBook, SessionManager, WalletProvider, DEFAULT_CONTRACT_ADDRESS,
};

pub struct Fixture {
    pub mock: MockWalletProvider,
    pub session: SessionManager,
    pub contract: ContractClient,
    pub book: Arc<PropertyBook>,
    pub flow: InvestmentFlow,
}

/// Limits wide enough to invest whole-ether amounts against the demo
/// listings.
pub fn wide_limits() -> InvestmentLimits {
    InvestmentLimits::new(U256::from(10_000_000_000_000u64), ether(1_000))
}

pub async fn fixture() -> Fixture {
    fixture_with(MockWalletProvider::new(), wide_limits()).await
}

pub async fn fixture_with(mock: MockWalletProvider, limits: InvestmentLimits) -> Fixture {
    let provider: Arc<dyn WalletProvider> = Arc::new(mock.clone());
    let settings = FlowSettings::brisk();

    let session = SessionManager::new(Some(provider.clone()), settings.clone());
    let contract = ContractClient::new(DEFAULT_CONTRACT_ADDRESS, provider, settings.clone());
    let book = Arc::new(PropertyBook::new());
    book.load(&contract, &settings).await;

    let flow = InvestmentFlow::new(
        session.clone(),
        contract.clone(),
        book.clone(),
        NetworkDescriptor::sepolia(),
        limits,
        settings,
    );

    Fixture { mock, session, contract, book, flow }
}

/// Poll the mock journal until `name` has been called `count` times.
pub async fn wait_for_calls(mock: &MockWalletProvider, name: &str, count: usize) {
    for _ in 0..2_000 {
        if mock.calls(name) >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("timed out waiting for {count} calls to {name}");
}
