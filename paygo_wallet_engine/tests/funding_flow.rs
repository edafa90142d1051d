//! End-to-end tests of the funding reconciliation flow: initialize → verify / webhook, including the settlement
//! race that the conditional status update must win exactly once.

use log::*;
use paygo_wallet_engine::{
    db_types::TransactionStatus,
    events::EventProducers,
    traits::{AccountQueries, WalletLedgerDatabase, WebhookCharge},
    FundingFlowApi,
    FundingFlowError,
    SettlementResult,
    SqliteDatabase,
};
use pwg_common::Kobo;
use tokio::runtime::Runtime;

mod support;

use support::{seed_user, setup_db, tear_down, StubGateway};

fn api_with(db: SqliteDatabase, gateway: StubGateway) -> FundingFlowApi<SqliteDatabase, StubGateway> {
    FundingFlowApi::new(db, gateway, EventProducers::default())
}

#[test]
fn initialize_creates_one_pending_transaction() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let user = seed_user(&db, "Amina", "Yusuf", "amina@example.com", None).await;
        let api = api_with(db.clone(), StubGateway::new());

        let initiation = api.initialize_funding(user.id, Kobo::from(500_000)).await.expect("Error initializing");
        assert!(!initiation.already_pending);
        assert!(initiation.reference.starts_with(&format!("PAYGO_{}_", user.id)));
        assert!(initiation.authorization_url.contains(&initiation.reference));

        let pending = db.pending_funding_for_user(user.id).await.unwrap().expect("No pending transaction");
        assert_eq!(pending.status, TransactionStatus::Pending);
        assert_eq!(pending.amount, Kobo::from(500_000));
        assert_eq!(pending.authorization_url.as_deref(), Some(initiation.authorization_url.as_str()));
        // Nothing is credited at initialization time.
        assert!(db.fetch_wallet(user.id).await.unwrap().is_none());
        tear_down(db).await;
    });
}

#[test]
fn initialize_below_minimum_is_rejected() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let user = seed_user(&db, "Amina", "Yusuf", "amina@example.com", None).await;
        let api = api_with(db.clone(), StubGateway::new());

        let err = api.initialize_funding(user.id, Kobo::from(5_000)).await.map(|_| ()).unwrap_err();
        assert!(matches!(err, FundingFlowError::AmountBelowMinimum(_)));
        assert_eq!(db.count_transactions(user.id).await.unwrap(), 0);
        tear_down(db).await;
    });
}

#[test]
fn initialize_twice_returns_the_existing_handle() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let user = seed_user(&db, "Amina", "Yusuf", "amina@example.com", None).await;
        let api = api_with(db.clone(), StubGateway::new());

        let first = api.initialize_funding(user.id, Kobo::from(50_000)).await.unwrap();
        let second = api.initialize_funding(user.id, Kobo::from(80_000)).await.unwrap();
        assert!(second.already_pending);
        assert_eq!(second.reference, first.reference);
        assert_eq!(second.authorization_url, first.authorization_url);
        // No second row was created.
        assert_eq!(db.count_transactions(user.id).await.unwrap(), 1);
        tear_down(db).await;
    });
}

#[test]
fn initialize_persists_nothing_when_the_gateway_is_down() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let user = seed_user(&db, "Amina", "Yusuf", "amina@example.com", None).await;
        let api = api_with(db.clone(), StubGateway::unreachable());

        let err = api.initialize_funding(user.id, Kobo::from(50_000)).await.map(|_| ()).unwrap_err();
        assert!(matches!(err, FundingFlowError::GatewayError(_)));
        assert_eq!(db.count_transactions(user.id).await.unwrap(), 0);
        tear_down(db).await;
    });
}

#[test]
fn verify_credits_exactly_once() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let user = seed_user(&db, "Amina", "Yusuf", "amina@example.com", None).await;
        let api = api_with(db.clone(), StubGateway::new());
        let amount = Kobo::from(500_000);

        let initiation = api.initialize_funding(user.id, amount).await.unwrap();
        let first = api.verify_funding(&initiation.reference).await.unwrap();
        assert_eq!(first, SettlementResult::Credited { amount, new_balance: amount });

        // A client retry of the same verify is a no-op.
        let second = api.verify_funding(&initiation.reference).await.unwrap();
        assert_eq!(second, SettlementResult::Duplicate);

        // So is the webhook arriving after the fact.
        let charge = WebhookCharge { reference: initiation.reference.clone(), amount, user_id: Some(user.id) };
        let third = api.process_webhook_charge(charge).await.unwrap();
        assert_eq!(third, SettlementResult::Duplicate);

        let wallet = db.fetch_wallet(user.id).await.unwrap().expect("Wallet was not created");
        assert_eq!(wallet.balance, amount);
        let tx = db.fetch_transactions(user.id, 0, 10).await.unwrap();
        assert_eq!(tx.len(), 1);
        assert_eq!(tx[0].status, TransactionStatus::Successful);
        // Exactly one credit notification was recorded.
        assert_eq!(db.fetch_notifications(user.id).await.unwrap().len(), 1);
        tear_down(db).await;
    });
}

#[test]
fn webhook_first_wins_and_verify_is_a_duplicate() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let user = seed_user(&db, "Amina", "Yusuf", "amina@example.com", None).await;
        let api = api_with(db.clone(), StubGateway::new());
        let amount = Kobo::from(120_000);

        let initiation = api.initialize_funding(user.id, amount).await.unwrap();
        let charge = WebhookCharge { reference: initiation.reference.clone(), amount, user_id: Some(user.id) };
        let first = api.process_webhook_charge(charge).await.unwrap();
        assert_eq!(first, SettlementResult::Credited { amount, new_balance: amount });

        let second = api.verify_funding(&initiation.reference).await.unwrap();
        assert_eq!(second, SettlementResult::Duplicate);

        let wallet = db.fetch_wallet(user.id).await.unwrap().unwrap();
        assert_eq!(wallet.balance, amount);
        tear_down(db).await;
    });
}

#[test]
fn concurrent_settlement_credits_once() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let user = seed_user(&db, "Amina", "Yusuf", "amina@example.com", None).await;
        let api = api_with(db.clone(), StubGateway::new());
        let amount = Kobo::from(250_000);

        let initiation = api.initialize_funding(user.id, amount).await.unwrap();
        let charge = WebhookCharge { reference: initiation.reference.clone(), amount, user_id: Some(user.id) };
        let (verified, hooked) =
            tokio::join!(api.verify_funding(&initiation.reference), api.process_webhook_charge(charge));
        let verified = verified.unwrap();
        let hooked = hooked.unwrap();
        info!("verify: {verified:?}, webhook: {hooked:?}");

        let credited = SettlementResult::Credited { amount, new_balance: amount };
        // Exactly one of the racing consumers wins; the other observes the already-settled row.
        assert!(
            (verified == credited && hooked == SettlementResult::Duplicate)
                || (hooked == credited && verified == SettlementResult::Duplicate),
            "expected one winner and one duplicate, got verify={verified:?} webhook={hooked:?}"
        );
        let wallet = db.fetch_wallet(user.id).await.unwrap().unwrap();
        assert_eq!(wallet.balance, amount);
        tear_down(db).await;
    });
}

#[test]
fn webhook_without_owner_metadata_is_ignored() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let user = seed_user(&db, "Amina", "Yusuf", "amina@example.com", None).await;
        let api = api_with(db.clone(), StubGateway::new());

        let initiation = api.initialize_funding(user.id, Kobo::from(50_000)).await.unwrap();
        let charge = WebhookCharge { reference: initiation.reference.clone(), amount: Kobo::from(50_000), user_id: None };
        let result = api.process_webhook_charge(charge).await.unwrap();
        assert_eq!(result, SettlementResult::Ignored);

        // The pending row is untouched and no wallet was created.
        let pending = db.pending_funding_for_user(user.id).await.unwrap().unwrap();
        assert_eq!(pending.status, TransactionStatus::Pending);
        assert!(db.fetch_wallet(user.id).await.unwrap().is_none());
        tear_down(db).await;
    });
}

#[test]
fn webhook_for_unknown_reference_is_a_duplicate_noop() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let user = seed_user(&db, "Amina", "Yusuf", "amina@example.com", None).await;
        let api = api_with(db.clone(), StubGateway::new());

        let charge =
            WebhookCharge { reference: "PAYGO_999_0_0".to_string(), amount: Kobo::from(75_000), user_id: Some(user.id) };
        let result = api.process_webhook_charge(charge).await.unwrap();
        assert_eq!(result, SettlementResult::Duplicate);
        assert!(db.fetch_wallet(user.id).await.unwrap().is_none());
        assert_eq!(db.count_transactions(user.id).await.unwrap(), 0);
        tear_down(db).await;
    });
}

#[test]
fn unsuccessful_settlement_does_not_credit() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let user = seed_user(&db, "Amina", "Yusuf", "amina@example.com", None).await;
        let api = api_with(db.clone(), StubGateway::with_settlement_status("abandoned"));

        let initiation = api.initialize_funding(user.id, Kobo::from(50_000)).await.unwrap();
        let err = api.verify_funding(&initiation.reference).await.map(|_| ()).unwrap_err();
        assert!(matches!(err, FundingFlowError::PaymentNotSuccessful(_)));

        let pending = db.pending_funding_for_user(user.id).await.unwrap().unwrap();
        assert_eq!(pending.status, TransactionStatus::Pending);
        assert!(db.fetch_wallet(user.id).await.unwrap().is_none());
        tear_down(db).await;
    });
}

#[test]
fn stale_pending_fundings_are_failed() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let user = seed_user(&db, "Amina", "Yusuf", "amina@example.com", None).await;
        let api = api_with(db.clone(), StubGateway::new());

        let old = api.initialize_funding(user.id, Kobo::from(50_000)).await.unwrap();
        // Backdate the pending row so it falls past the cutoff.
        sqlx::query("UPDATE transactions SET created_at = datetime('now', '-2 days') WHERE reference = $1")
            .bind(&old.reference)
            .execute(db.pool())
            .await
            .unwrap();

        let flipped = api.fail_stale_fundings(chrono::Duration::hours(24)).await.unwrap();
        assert_eq!(flipped.len(), 1);
        assert_eq!(flipped[0].reference, old.reference);
        assert_eq!(flipped[0].status, TransactionStatus::Failed);

        // The user can fund again now; a fresh pending row is created and survives the next sweep.
        let fresh = api.initialize_funding(user.id, Kobo::from(60_000)).await.unwrap();
        assert!(!fresh.already_pending);
        assert_ne!(fresh.reference, old.reference);
        let flipped = api.fail_stale_fundings(chrono::Duration::hours(24)).await.unwrap();
        assert!(flipped.is_empty());
        tear_down(db).await;
    });
}
