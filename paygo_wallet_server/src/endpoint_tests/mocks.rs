use chrono::{Duration, Utc};
use mockall::mock;
use paygo_wallet_engine::{
    db_types::{
        EntryType,
        NewNotification,
        NewTransaction,
        Notification,
        Transaction,
        TransactionStatus,
        User,
        Wallet,
    },
    traits::{
        AccountApiError,
        AccountQueries,
        GatewayClientError,
        GatewayRedirect,
        GatewaySettlement,
        InsertFundingResult,
        NewGatewayPayment,
        PaymentGatewayClient,
        SettlementOutcome,
        TransferOutcome,
        TransferSpec,
        WalletLedgerDatabase,
        WalletLedgerError,
    },
};
use pwg_common::Kobo;

mock! {
    pub Backend {}
    impl WalletLedgerDatabase for Backend {
        fn url(&self) -> &str;
        async fn pending_funding_for_user(&self, user_id: i64) -> Result<Option<Transaction>, WalletLedgerError>;
        async fn insert_pending_funding(&self, funding: NewTransaction) -> Result<InsertFundingResult, WalletLedgerError>;
        async fn settle_funding(
            &self,
            reference: &str,
            user_id: i64,
            amount: Kobo,
            note: NewNotification,
        ) -> Result<SettlementOutcome, WalletLedgerError>;
        async fn transfer_funds(&self, spec: TransferSpec) -> Result<TransferOutcome, WalletLedgerError>;
        async fn record_beneficiary(
            &self,
            user_id: i64,
            beneficiary_user_id: i64,
            name: &str,
            email: &str,
        ) -> Result<(), WalletLedgerError>;
        async fn fail_stale_fundings(&self, older_than: Duration) -> Result<Vec<Transaction>, WalletLedgerError>;
        async fn close(&mut self) -> Result<(), WalletLedgerError>;
    }
    impl AccountQueries for Backend {
        async fn fetch_user_by_id(&self, user_id: i64) -> Result<Option<User>, AccountApiError>;
        async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AccountApiError>;
        async fn fetch_wallet(&self, user_id: i64) -> Result<Option<Wallet>, AccountApiError>;
        async fn fetch_transactions(&self, user_id: i64, offset: i64, limit: i64) -> Result<Vec<Transaction>, AccountApiError>;
        async fn count_transactions(&self, user_id: i64) -> Result<i64, AccountApiError>;
        async fn fetch_transaction_by_id(&self, id: i64, user_id: i64) -> Result<Option<Transaction>, AccountApiError>;
        async fn fetch_notifications(&self, user_id: i64) -> Result<Vec<Notification>, AccountApiError>;
    }
}

mock! {
    pub Gateway {}
    impl PaymentGatewayClient for Gateway {
        async fn initialize_payment(&self, payment: NewGatewayPayment) -> Result<GatewayRedirect, GatewayClientError>;
        async fn verify_payment(&self, reference: &str) -> Result<GatewaySettlement, GatewayClientError>;
    }
}

pub fn sample_user(id: i64, email: &str, pin: Option<&str>) -> User {
    User {
        id,
        first_name: "Amina".to_string(),
        last_name: "Yusuf".to_string(),
        email: email.to_string(),
        wallet_pin_hash: pin.map(|p| paygo_wallet_engine::helpers::hash_pin(p).unwrap()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn sample_wallet(user_id: i64, balance: i64) -> Wallet {
    Wallet { id: 1, user_id, balance: Kobo::from(balance), created_at: Utc::now(), updated_at: Utc::now() }
}

pub fn sample_pending_funding(user_id: i64, amount: i64, reference: &str) -> Transaction {
    Transaction {
        id: 1,
        user_id,
        entry_type: EntryType::Credit,
        amount: Kobo::from(amount),
        reference: reference.to_string(),
        status: TransactionStatus::Pending,
        description: "Pending Paystack wallet funding".to_string(),
        authorization_url: Some(format!("https://checkout.paystack.test/{reference}")),
        counterparty_user_id: None,
        counterparty_name: None,
        counterparty_email: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
