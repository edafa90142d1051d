use std::fmt::Debug;

use chrono::Duration;
use log::*;
use pwg_common::Kobo;
use sqlx::SqlitePool;

use super::{beneficiaries, db_url, new_pool, notifications, transactions, users, wallets, SqliteDatabaseError};
use crate::{
    db::traits::{
        AccountApiError,
        AccountQueries,
        InsertFundingResult,
        SettlementOutcome,
        TransferOutcome,
        TransferSpec,
        WalletLedgerDatabase,
        WalletLedgerError,
    },
    db_types::{NewNotification, NewTransaction, NewUser, Notification, Transaction, User, Wallet},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL from the environment.
    pub async fn new(max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Inserts a user row. The wallet engine never registers users in production; this exists for the
    /// account-provisioning collaborator and for test setup.
    pub async fn create_user(&self, user: NewUser) -> Result<User, SqliteDatabaseError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(user, &mut conn).await
    }
}

impl WalletLedgerDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn pending_funding_for_user(&self, user_id: i64) -> Result<Option<Transaction>, WalletLedgerError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let pending = transactions::pending_credit_for_user(user_id, &mut conn).await?;
        Ok(pending)
    }

    async fn insert_pending_funding(&self, funding: NewTransaction) -> Result<InsertFundingResult, WalletLedgerError> {
        let reference = funding.reference.clone();
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let result = transactions::idempotent_insert(funding, &mut conn).await?;
        match &result {
            InsertFundingResult::Inserted(id) => {
                debug!("🗃️ Pending funding [{reference}] saved with id {id}");
            },
            InsertFundingResult::AlreadyExists(_) => {
                debug!("🗃️ Pending funding [{reference}] already recorded; nothing written");
            },
        }
        Ok(result)
    }

    async fn settle_funding(
        &self,
        reference: &str,
        user_id: i64,
        amount: Kobo,
        note: NewNotification,
    ) -> Result<SettlementOutcome, WalletLedgerError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let claimed = transactions::claim_pending(reference, &mut tx).await?;
        if !claimed {
            // A racing consumer already settled this reference, or it was never pending here.
            debug!("🗃️ Settlement of [{reference}] is a no-op; the reference is not pending");
            return Ok(SettlementOutcome::AlreadySettled);
        }
        let new_balance = wallets::credit_wallet(user_id, amount, &mut tx).await?;
        notifications::insert(note, &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        debug!("🗃️ Funding [{reference}] settled. {amount} credited to user #{user_id}");
        Ok(SettlementOutcome::Credited { new_balance })
    }

    async fn transfer_funds(&self, spec: TransferSpec) -> Result<TransferOutcome, WalletLedgerError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let sender_balance = match wallets::debit_wallet(spec.sender_id, spec.amount, &mut tx).await? {
            Some(balance) => balance,
            // Dropping the open transaction rolls everything back.
            None => return Ok(TransferOutcome::InsufficientFunds),
        };
        let recipient_balance = wallets::credit_wallet(spec.recipient_id, spec.amount, &mut tx).await?;
        let debit_ref = spec.debit_row.reference.clone();
        transactions::idempotent_insert(spec.debit_row, &mut tx).await?;
        transactions::idempotent_insert(spec.credit_row, &mut tx).await?;
        notifications::insert(spec.sender_note, &mut tx).await?;
        notifications::insert(spec.recipient_note, &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        debug!(
            "🗃️ Transfer [{debit_ref}] of {} committed: user #{} -> user #{}",
            spec.amount, spec.sender_id, spec.recipient_id
        );
        Ok(TransferOutcome::Completed { sender_balance, recipient_balance })
    }

    async fn record_beneficiary(
        &self,
        user_id: i64,
        beneficiary_user_id: i64,
        name: &str,
        email: &str,
    ) -> Result<(), WalletLedgerError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        beneficiaries::upsert_from_transfer(user_id, beneficiary_user_id, name, email, &mut conn).await?;
        Ok(())
    }

    async fn fail_stale_fundings(&self, older_than: Duration) -> Result<Vec<Transaction>, WalletLedgerError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let flipped = transactions::fail_stale_pending(older_than.num_minutes(), &mut conn).await?;
        Ok(flipped)
    }

    async fn close(&mut self) -> Result<(), WalletLedgerError> {
        self.pool.close().await;
        Ok(())
    }
}

impl AccountQueries for SqliteDatabase {
    async fn fetch_user_by_id(&self, user_id: i64) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let user = users::user_by_id(user_id, &mut conn).await?;
        Ok(user)
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let user = users::user_by_email(email, &mut conn).await?;
        Ok(user)
    }

    async fn fetch_wallet(&self, user_id: i64) -> Result<Option<Wallet>, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let wallet = wallets::wallet_for_user(user_id, &mut conn).await?;
        Ok(wallet)
    }

    async fn fetch_transactions(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Transaction>, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let txs = transactions::fetch_page_for_user(user_id, offset, limit, &mut conn).await?;
        Ok(txs)
    }

    async fn count_transactions(&self, user_id: i64) -> Result<i64, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let count = transactions::count_for_user(user_id, &mut conn).await?;
        Ok(count)
    }

    async fn fetch_transaction_by_id(&self, id: i64, user_id: i64) -> Result<Option<Transaction>, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let tx = transactions::fetch_by_id(id, user_id, &mut conn).await?;
        Ok(tx)
    }

    async fn fetch_notifications(&self, user_id: i64) -> Result<Vec<Notification>, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        let notes = notifications::fetch_for_user(user_id, &mut conn).await?;
        Ok(notes)
    }
}
