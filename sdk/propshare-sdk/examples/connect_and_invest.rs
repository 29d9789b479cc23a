// Example: the full session + investment walkthrough.
//
// Runs against the in-process mock wallet so it works offline. The wallet
// starts on the localhost chain to exercise the network switch. With a
// real browser-wallet bridge you would pass your own `WalletProvider`
// implementation into `SessionManager` instead.

use std::sync::Arc;

use alloy_primitives::U256;

use propshare_sdk::config::ether;
use propshare_sdk::testing::MockWalletProvider;
use propshare_sdk::{
    ContractClient, FlowSettings, InvestmentFlow, InvestmentLimits, NetworkDescriptor,
    PropertyBook, SessionManager, WalletProvider, DEFAULT_CONTRACT_ADDRESS,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let mock = MockWalletProvider::new().with_chain_id("0x7a69");
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
        InvestmentLimits::new(U256::from(1u64), ether(1_000)),
        settings,
    );

    let connected = session.connect().await?;
    println!("connected as {} on chain {}", connected.address, connected.chain_id);

    let outcome = flow.invest(U256::ZERO, "10").await?;
    println!(
        "tx {} bought an estimated {} shares",
        outcome.tx_hash, outcome.estimated_shares
    );

    let property = book.get(U256::ZERO).await.expect("seeded listing");
    println!(
        "{}: {}/{} shares issued",
        property.name, property.shares_issued, property.total_shares
    );

    let bps = contract
        .get_user_ownership_percentage(U256::ZERO, connected.address)
        .await?;
    println!(
        "ownership: {}.{:02}%",
        bps / U256::from(100u64),
        bps % U256::from(100u64)
    );

    Ok(())
}
