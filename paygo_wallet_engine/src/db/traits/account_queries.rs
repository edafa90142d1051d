use super::AccountApiError;
use crate::db_types::{Notification, Transaction, User, Wallet};

/// Read-side contract: users, wallets, histories and notifications.
///
/// Services never hold balance state in memory across requests; every read goes back to the store.
#[allow(async_fn_in_trait)]
pub trait AccountQueries {
    async fn fetch_user_by_id(&self, user_id: i64) -> Result<Option<User>, AccountApiError>;

    /// Looks a user up by email. Callers are expected to normalize (trim + lowercase) the address first; see
    /// [`crate::helpers::normalize_email`].
    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AccountApiError>;

    async fn fetch_wallet(&self, user_id: i64) -> Result<Option<Wallet>, AccountApiError>;

    /// A page of the user's transaction history, newest first.
    async fn fetch_transactions(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Transaction>, AccountApiError>;

    async fn count_transactions(&self, user_id: i64) -> Result<i64, AccountApiError>;

    /// A single transaction, scoped to its owner.
    async fn fetch_transaction_by_id(&self, id: i64, user_id: i64) -> Result<Option<Transaction>, AccountApiError>;

    /// The user's notifications, newest first.
    async fn fetch_notifications(&self, user_id: i64) -> Result<Vec<Notification>, AccountApiError>;
}
