//! Tests of the atomic double-entry transfer: conservation of money, all-or-nothing commits, and the full
//! validation pipeline.

use paygo_wallet_engine::{
    db_types::{EntryType, TransactionStatus, User},
    events::EventProducers,
    traits::{AccountQueries, WebhookCharge},
    FundingFlowApi,
    SettlementResult,
    SqliteDatabase,
    TransferApi,
    TransferError,
    TransferRequest,
};
use pwg_common::Kobo;
use tokio::runtime::Runtime;

mod support;

use support::{seed_user, setup_db, tear_down, StubGateway};

fn transfer_api(db: &SqliteDatabase) -> TransferApi<SqliteDatabase> {
    TransferApi::new(db.clone(), EventProducers::default())
}

fn request(email: &str, amount: i64, pin: &str) -> TransferRequest {
    TransferRequest { recipient_email: email.to_string(), amount: Kobo::from(amount), pin: pin.to_string() }
}

/// Seeds a wallet balance by running a funding through the real reconciliation path.
async fn fund_wallet(db: &SqliteDatabase, user: &User, amount: i64) {
    let api = FundingFlowApi::new(db.clone(), StubGateway::new(), EventProducers::default())
        .with_minimum_funding(Kobo::from(1));
    let amount = Kobo::from(amount);
    let initiation = api.initialize_funding(user.id, amount).await.expect("Error initializing funding");
    let charge = WebhookCharge { reference: initiation.reference, amount, user_id: Some(user.id) };
    let result = api.process_webhook_charge(charge).await.expect("Error settling funding");
    assert!(matches!(result, SettlementResult::Credited { .. }));
}

async fn balance_of(db: &SqliteDatabase, user_id: i64) -> Kobo {
    db.fetch_wallet(user_id).await.unwrap().map(|w| w.balance).unwrap_or_default()
}

#[test]
fn successful_transfer_moves_money_and_writes_the_paper_trail() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let sender = seed_user(&db, "Amina", "Yusuf", "amina@example.com", Some("1234")).await;
        let recipient = seed_user(&db, "Bola", "Ahmed", "bola@example.com", None).await;
        fund_wallet(&db, &sender, 10_000).await;
        let api = transfer_api(&db);

        let receipt =
            api.transfer(sender.id, request("Bola@Example.com ", 3_000, "1234")).await.expect("Transfer failed");
        assert_eq!(receipt.amount, Kobo::from(3_000));
        assert_eq!(receipt.new_balance, Kobo::from(7_000));
        assert_eq!(receipt.recipient.user_id, recipient.id);
        assert!(receipt.reference.starts_with("TRF_"));
        assert!(receipt.reference.ends_with("_DB"));

        // Conservation: total across the two wallets is unchanged.
        assert_eq!(balance_of(&db, sender.id).await, Kobo::from(7_000));
        assert_eq!(balance_of(&db, recipient.id).await, Kobo::from(3_000));

        // Two correlated ledger rows, one per side, both successful.
        let debit = &db.fetch_transactions(sender.id, 0, 1).await.unwrap()[0];
        assert_eq!(debit.entry_type, EntryType::Debit);
        assert_eq!(debit.status, TransactionStatus::Successful);
        assert_eq!(debit.counterparty_email.as_deref(), Some("bola@example.com"));
        let credit = &db.fetch_transactions(recipient.id, 0, 1).await.unwrap()[0];
        assert_eq!(credit.entry_type, EntryType::Credit);
        assert_eq!(credit.counterparty_email.as_deref(), Some("amina@example.com"));
        let base_d = debit.reference.trim_end_matches("_DB");
        let base_c = credit.reference.trim_end_matches("_CR");
        assert_eq!(base_d, base_c);

        // One notification each.
        let sender_notes = db.fetch_notifications(sender.id).await.unwrap();
        let recipient_notes = db.fetch_notifications(recipient.id).await.unwrap();
        assert_eq!(sender_notes.iter().filter(|n| n.title == "Money sent").count(), 1);
        assert_eq!(recipient_notes.iter().filter(|n| n.title == "Money received").count(), 1);
        tear_down(db).await;
    });
}

#[test]
fn insufficient_balance_changes_nothing() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let sender = seed_user(&db, "Amina", "Yusuf", "amina@example.com", Some("1234")).await;
        let recipient = seed_user(&db, "Bola", "Ahmed", "bola@example.com", None).await;
        fund_wallet(&db, &sender, 2_000).await;
        let api = transfer_api(&db);

        let err = api.transfer(sender.id, request("bola@example.com", 3_000, "1234")).await.unwrap_err();
        assert!(matches!(err, TransferError::InsufficientBalance));

        assert_eq!(balance_of(&db, sender.id).await, Kobo::from(2_000));
        assert!(db.fetch_wallet(recipient.id).await.unwrap().is_none());
        // Only the funding row exists; no transfer legs were written.
        assert_eq!(db.count_transactions(sender.id).await.unwrap(), 1);
        assert_eq!(db.count_transactions(recipient.id).await.unwrap(), 0);
        assert!(db.fetch_notifications(recipient.id).await.unwrap().is_empty());
        tear_down(db).await;
    });
}

#[test]
fn validation_pipeline_rejects_bad_requests_without_state_change() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let sender = seed_user(&db, "Amina", "Yusuf", "amina@example.com", Some("1234")).await;
        let _recipient = seed_user(&db, "Bola", "Ahmed", "bola@example.com", None).await;
        fund_wallet(&db, &sender, 10_000).await;
        let api = transfer_api(&db);

        let cases: Vec<(TransferRequest, TransferError)> = vec![
            (request("bola@example.com", 0, "1234"), TransferError::InvalidAmount),
            (request("bola@example.com", -50, "1234"), TransferError::InvalidAmount),
            (request("bola@example.com", 1_000, "12a4"), TransferError::InvalidPin),
            (request("bola@example.com", 1_000, "123"), TransferError::InvalidPin),
            (request("   ", 1_000, "1234"), TransferError::MissingRecipient),
            (request("bola@example.com", 1_000, "9999"), TransferError::IncorrectPin),
            (request("nobody@example.com", 1_000, "1234"), TransferError::RecipientNotFound),
            (request("Amina@example.com", 1_000, "1234"), TransferError::SelfTransfer),
        ];
        for (req, expected) in cases {
            let err = api.transfer(sender.id, req).await.unwrap_err();
            assert_eq!(
                std::mem::discriminant(&err),
                std::mem::discriminant(&expected),
                "expected {expected:?}, got {err:?}"
            );
        }

        // Every rejection above left the ledger alone.
        assert_eq!(balance_of(&db, sender.id).await, Kobo::from(10_000));
        assert_eq!(db.count_transactions(sender.id).await.unwrap(), 1);
        tear_down(db).await;
    });
}

#[test]
fn transfer_without_a_configured_pin_is_rejected() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let sender = seed_user(&db, "Amina", "Yusuf", "amina@example.com", None).await;
        let _recipient = seed_user(&db, "Bola", "Ahmed", "bola@example.com", None).await;
        fund_wallet(&db, &sender, 10_000).await;
        let api = transfer_api(&db);

        let err = api.transfer(sender.id, request("bola@example.com", 1_000, "1234")).await.unwrap_err();
        assert!(matches!(err, TransferError::PinNotSet));
        assert_eq!(balance_of(&db, sender.id).await, Kobo::from(10_000));
        tear_down(db).await;
    });
}

#[test]
fn sender_without_a_wallet_is_rejected() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let sender = seed_user(&db, "Amina", "Yusuf", "amina@example.com", Some("1234")).await;
        let _recipient = seed_user(&db, "Bola", "Ahmed", "bola@example.com", None).await;
        let api = transfer_api(&db);

        let err = api.transfer(sender.id, request("bola@example.com", 1_000, "1234")).await.unwrap_err();
        assert!(matches!(err, TransferError::SenderWalletMissing));
        tear_down(db).await;
    });
}

#[test]
fn recipient_wallet_is_created_lazily_and_accumulates() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let sender = seed_user(&db, "Amina", "Yusuf", "amina@example.com", Some("1234")).await;
        let recipient = seed_user(&db, "Bola", "Ahmed", "bola@example.com", None).await;
        fund_wallet(&db, &sender, 10_000).await;
        let api = transfer_api(&db);

        assert!(db.fetch_wallet(recipient.id).await.unwrap().is_none());
        api.transfer(sender.id, request("bola@example.com", 1_000, "1234")).await.unwrap();
        assert_eq!(balance_of(&db, recipient.id).await, Kobo::from(1_000));
        api.transfer(sender.id, request("bola@example.com", 2_500, "1234")).await.unwrap();
        assert_eq!(balance_of(&db, recipient.id).await, Kobo::from(3_500));
        assert_eq!(balance_of(&db, sender.id).await, Kobo::from(6_500));
        tear_down(db).await;
    });
}

#[test]
fn concurrent_transfers_cannot_overdraw_the_sender() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let sender = seed_user(&db, "Amina", "Yusuf", "amina@example.com", Some("1234")).await;
        let _recipient = seed_user(&db, "Bola", "Ahmed", "bola@example.com", None).await;
        fund_wallet(&db, &sender, 10_000).await;
        let api = transfer_api(&db);

        // Both requests pass the optimistic pre-check; the guarded debit admits only one.
        let (a, b) = tokio::join!(
            api.transfer(sender.id, request("bola@example.com", 6_000, "1234")),
            api.transfer(sender.id, request("bola@example.com", 6_000, "1234"))
        );
        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "exactly one transfer must win: {a:?} / {b:?}");
        let loser = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
        assert!(matches!(loser, TransferError::InsufficientBalance));
        assert_eq!(balance_of(&db, sender.id).await, Kobo::from(4_000));
        tear_down(db).await;
    });
}

#[test]
fn beneficiary_history_is_recorded_once_per_transfer() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let db = setup_db().await;
        let sender = seed_user(&db, "Amina", "Yusuf", "amina@example.com", Some("1234")).await;
        let recipient = seed_user(&db, "Bola", "Ahmed", "bola@example.com", None).await;
        fund_wallet(&db, &sender, 10_000).await;
        let api = transfer_api(&db);

        api.transfer(sender.id, request("bola@example.com", 1_000, "1234")).await.unwrap();
        api.transfer(sender.id, request("bola@example.com", 1_000, "1234")).await.unwrap();

        let row: (i64, i64) = sqlx::query_as(
            "SELECT beneficiary_user_id, transfer_count FROM beneficiaries WHERE user_id = $1",
        )
        .bind(sender.id)
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(row, (recipient.id, 2));
        tear_down(db).await;
    });
}
