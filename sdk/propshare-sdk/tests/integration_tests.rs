use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, U256};

use propshare_sdk::config::ether;
use propshare_sdk::testing::MockWalletProvider;
use propshare_sdk::{
    FlowSettings, InvestmentLimits, LoadSource, PropertyListing, ProviderError, SessionManager,
    TransactionState, WalletError, WalletEvent,
};

mod common;
use common::{fixture, fixture_with, wait_for_calls, wide_limits};

#[tokio::test]
async fn out_of_bounds_amounts_reject_before_any_provider_call() {
    let f = fixture_with(MockWalletProvider::new(), InvestmentLimits::default()).await;
    let baseline = f.mock.journal().len();

    for input in ["0.000001", "0.1", "0", "-1", "ten eth"] {
        let err = f.flow.invest(U256::ZERO, input).await.unwrap_err();
        assert!(err.is_validation(), "{input} must fail validation, got {err}");
    }

    assert_eq!(
        f.mock.journal().len(),
        baseline,
        "validation failures must not touch the provider"
    );
    assert_eq!(f.flow.state(), TransactionState::Idle);
}

#[tokio::test]
async fn completed_investment_updates_the_optimistic_view() {
    let f = fixture().await;
    let before = f.book.get(U256::ZERO).await.unwrap().shares_issued;

    let outcome = f.flow.invest(U256::ZERO, "10").await.unwrap();

    // 10 ETH into 100 ETH / 10_000 shares.
    assert_eq!(outcome.estimated_shares, U256::from(1_000u64));
    assert_eq!(f.flow.state(), TransactionState::Completed);

    let after = f.book.get(U256::ZERO).await.unwrap().shares_issued;
    assert_eq!(after, before + outcome.estimated_shares);
    assert_eq!(
        f.mock.shares_of(U256::ZERO, MockWalletProvider::DEFAULT_ACCOUNT),
        U256::from(1_000u64)
    );
    assert!(f.session.session().connected, "flow connects the wallet on demand");
}

#[tokio::test]
async fn ownership_queries_reflect_the_investment() {
    let f = fixture().await;
    f.flow.invest(U256::ZERO, "25").await.unwrap();

    let account = MockWalletProvider::DEFAULT_ACCOUNT;
    let shares = f.contract.get_user_investment(U256::ZERO, account).await.unwrap();
    let bps = f
        .contract
        .get_user_ownership_percentage(U256::ZERO, account)
        .await
        .unwrap();

    assert_eq!(shares, U256::from(2_500u64));
    assert_eq!(bps, U256::from(2_500u64), "25 ETH of 100 ETH is 25.00%");
}

#[tokio::test]
async fn rejected_account_request_gets_the_designated_message() {
    let f = fixture().await;
    f.mock.fail_request_accounts(ProviderError::user_rejected());

    let err = f.session.connect().await.unwrap_err();
    assert!(matches!(err, WalletError::ConnectionRejected));
    assert_eq!(err.to_string(), "Please connect your wallet to continue.");

    // The investment flow surfaces the same condition and never reaches
    // the transaction states.
    let err = f.flow.invest(U256::ZERO, "1").await.unwrap_err();
    assert!(matches!(err, WalletError::ConnectionRejected));
    assert_eq!(f.flow.state(), TransactionState::Idle);
}

#[tokio::test]
async fn missing_wallet_is_a_distinct_condition() {
    let session = SessionManager::new(None, FlowSettings::brisk());
    let err = session.connect().await.unwrap_err();
    assert!(matches!(err, WalletError::NoWallet));
    assert_eq!(err.to_string(), "No Ethereum wallet found. Please install MetaMask.");
}

#[tokio::test]
async fn empty_accounts_event_resets_the_session() {
    let f = fixture().await;
    f.session.connect().await.unwrap();
    assert!(f.session.session().connected);

    let mut sessions = f.session.subscribe();
    f.mock.emit(WalletEvent::AccountsChanged(vec![]));

    tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            sessions.changed().await.unwrap();
            let session = sessions.borrow().clone();
            if !session.connected {
                assert_eq!(session.address, None);
                break;
            }
        }
    })
    .await
    .expect("session never reset");
}

#[tokio::test]
async fn chain_change_bumps_the_reload_generation() {
    let f = fixture().await;
    f.session.connect().await.unwrap();

    let mut sessions = f.session.subscribe();
    f.mock.emit(WalletEvent::ChainChanged("0x7a69".to_string()));

    tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            sessions.changed().await.unwrap();
            let session = sessions.borrow().clone();
            if session.reload_generation == 1 {
                assert_eq!(session.chain_id, "0x7a69");
                break;
            }
        }
    })
    .await
    .expect("reload generation never moved");
}

#[tokio::test]
async fn concurrent_submission_for_one_property_is_latched() {
    let f = fixture().await;
    f.mock.hold_receipts();

    let flow = Arc::new(f.flow);
    let background = {
        let flow = flow.clone();
        tokio::spawn(async move { flow.invest(U256::ZERO, "1").await })
    };

    wait_for_calls(&f.mock, "wait_for_receipt", 1).await;

    let err = flow.invest(U256::ZERO, "1").await.unwrap_err();
    assert!(matches!(err, WalletError::InvestmentInFlight));

    f.mock.release_receipts();
    background.await.unwrap().unwrap();

    // The latch releases with the flow; a new submission goes through.
    flow.invest(U256::ZERO, "1").await.unwrap();
}

#[tokio::test]
async fn contract_revert_classifies_and_fails_the_flow() {
    let f = fixture().await;
    // The local book still believes the listing is open; the chain knows
    // better.
    f.mock.set_property_active(U256::ZERO, false);

    let err = f.flow.invest(U256::ZERO, "1").await.unwrap_err();
    match err {
        WalletError::TransactionReverted(message) => {
            assert!(message.contains("Property is not active"), "{message}");
        }
        other => panic!("expected a revert, got {other}"),
    }
    assert_eq!(f.flow.state(), TransactionState::Failed);
}

#[tokio::test]
async fn reverted_receipt_fails_without_an_optimistic_update() {
    let f = fixture().await;
    f.mock.revert_receipts();

    let err = f.flow.invest(U256::ZERO, "1").await.unwrap_err();
    assert!(matches!(err, WalletError::TransactionReverted(_)));
    assert_eq!(f.flow.state(), TransactionState::Failed);
    assert_eq!(f.book.get(U256::ZERO).await.unwrap().shares_issued, U256::ZERO);
}

#[tokio::test]
async fn unreachable_contract_falls_back_to_demo_listings() {
    let f = fixture_with(MockWalletProvider::new().with_contract_down(), wide_limits()).await;

    let source = f.book.load(&f.contract, &FlowSettings::brisk()).await;
    assert_eq!(source, LoadSource::Fallback);

    let listings = f.book.all().await;
    assert_eq!(listings.len(), 5);
    assert!(listings.iter().all(|p| p.active));
}

#[tokio::test]
async fn silent_probe_adopts_an_existing_authorization() {
    let f = fixture().await;

    let adopted = f.session.check_connection().await.unwrap();
    assert_eq!(
        adopted.map(|c| c.address),
        Some(MockWalletProvider::DEFAULT_ACCOUNT)
    );
    assert!(f.session.session().connected);
    assert_eq!(f.mock.calls("request_accounts"), 0, "the probe must never prompt");
}

#[tokio::test]
async fn owner_can_list_a_new_property() {
    let f = fixture().await;
    f.session.connect().await.unwrap();
    let signer = f.session.signer().unwrap();

    let listing = PropertyListing {
        name: "Harbor Lofts".to_string(),
        location: "Boston, MA".to_string(),
        image_url: "https://example.com/lofts.jpg".to_string(),
        total_value: ether(50),
        total_shares: U256::from(5_000u64),
    };
    f.contract.list_property(&signer, &listing).await.unwrap();

    let properties = f.contract.get_all_properties().await.unwrap();
    assert_eq!(properties.len(), 6);
    assert_eq!(properties[5].name, "Harbor Lofts");
    assert!(properties[5].active);
}

#[tokio::test]
async fn listing_is_gated_to_the_owner() {
    let f = fixture().await;
    f.session.connect().await.unwrap();

    // Switch the wallet to a non-owner account and let the session follow.
    let intruder = Address::repeat_byte(0x99);
    let mut sessions = f.session.subscribe();
    f.mock.emit(WalletEvent::AccountsChanged(vec![intruder]));
    tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            sessions.changed().await.unwrap();
            if sessions.borrow().address == Some(intruder) {
                break;
            }
        }
    })
    .await
    .expect("session never followed the account change");

    let signer = f.session.signer().unwrap();
    assert_eq!(signer.address(), intruder);

    let listing = PropertyListing {
        name: "Harbor Lofts".to_string(),
        location: "Boston, MA".to_string(),
        image_url: "https://example.com/lofts.jpg".to_string(),
        total_value: ether(50),
        total_shares: U256::from(5_000u64),
    };
    let err = f.contract.list_property(&signer, &listing).await.unwrap_err();
    match err {
        WalletError::Provider(provider_err) => {
            assert!(provider_err.message.contains("OwnableUnauthorizedAccount"));
        }
        other => panic!("expected the owner gate to reject, got {other}"),
    }
}

#[tokio::test]
async fn event_subscription_is_idempotent() {
    let f = fixture().await;
    f.session.connect().await.unwrap();
    f.session.check_connection().await.unwrap();
    f.session.connect().await.unwrap();

    assert_eq!(f.mock.event_subscribers(), 1, "one pump, no duplicate listeners");
}

#[tokio::test]
async fn fully_subscribing_a_property_deactivates_it() {
    let f = fixture().await;

    // 100 ETH buys every share of the Manhattan listing.
    f.flow.invest(U256::ZERO, "100").await.unwrap();

    let property = f.book.get(U256::ZERO).await.unwrap();
    assert_eq!(property.shares_issued, property.total_shares);
    assert!(!property.active, "a fully subscribed property auto-deactivates");

    // The local book now reflects the deactivation, so a follow-up attempt
    // is a validation failure, before any provider traffic.
    let baseline = f.mock.journal().len();
    let err = f.flow.invest(U256::ZERO, "1").await.unwrap_err();
    assert!(matches!(err, WalletError::PropertyUnavailable(_)));
    assert_eq!(f.mock.journal().len(), baseline);
}
