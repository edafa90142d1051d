//! Unified read API for wallet accounts.

use std::fmt::Debug;

use pwg_common::Kobo;

use crate::{
    db::traits::{AccountApiError, AccountQueries},
    db_types::{Notification, Wallet},
    wpe_api::wallet_objects::{Pagination, TransactionHistory, TransactionRecord},
};

pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: AccountQueries
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// The user's wallet, or `None` if no credit has ever created one.
    pub async fn wallet(&self, user_id: i64) -> Result<Option<Wallet>, AccountApiError> {
        self.db.fetch_wallet(user_id).await
    }

    pub async fn balance(&self, user_id: i64) -> Result<Option<Kobo>, AccountApiError> {
        Ok(self.db.fetch_wallet(user_id).await?.map(|w| w.balance))
    }

    /// A page of the user's transaction history, newest first, with the total row count for the pager.
    pub async fn history(&self, user_id: i64, pagination: Pagination) -> Result<TransactionHistory, AccountApiError> {
        let total = self.db.count_transactions(user_id).await?;
        let rows = self.db.fetch_transactions(user_id, pagination.offset(), pagination.limit()).await?;
        let transactions = rows.into_iter().map(TransactionRecord::from).collect();
        Ok(TransactionHistory { page: pagination.page(), limit: pagination.limit(), total, transactions })
    }

    /// A single transaction, scoped to its owner.
    pub async fn transaction(&self, user_id: i64, id: i64) -> Result<Option<TransactionRecord>, AccountApiError> {
        Ok(self.db.fetch_transaction_by_id(id, user_id).await?.map(TransactionRecord::from))
    }

    pub async fn notifications(&self, user_id: i64) -> Result<Vec<Notification>, AccountApiError> {
        self.db.fetch_notifications(user_id).await
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
