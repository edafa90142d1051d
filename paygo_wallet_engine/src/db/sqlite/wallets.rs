use log::trace;
use pwg_common::Kobo;
use sqlx::SqliteConnection;

use crate::{db::sqlite::SqliteDatabaseError, db_types::Wallet};

pub async fn wallet_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<Wallet>, SqliteDatabaseError> {
    let wallet = sqlx::query_as(
        "SELECT id, user_id, balance, created_at, updated_at FROM wallets WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(wallet)
}

/// Credits a wallet, creating it lazily if the user has none yet. Returns the new balance.
///
/// The upsert makes the credit and the creation the same statement, so there is no read-then-write window for a
/// concurrent credit to squeeze into.
pub async fn credit_wallet(
    user_id: i64,
    amount: Kobo,
    conn: &mut SqliteConnection,
) -> Result<Kobo, SqliteDatabaseError> {
    let balance: Kobo = sqlx::query_scalar(
        "INSERT INTO wallets (user_id, balance) VALUES ($1, $2) \
         ON CONFLICT (user_id) DO UPDATE SET balance = balance + excluded.balance, updated_at = CURRENT_TIMESTAMP \
         RETURNING balance",
    )
    .bind(user_id)
    .bind(amount)
    .fetch_one(conn)
    .await?;
    trace!("💰️ Wallet of user #{user_id} credited with {amount}; new balance {balance}");
    Ok(balance)
}

/// Debits a wallet only if it holds at least `amount`. Returns the new balance, or `None` when the guard did not
/// match (insufficient funds, or no wallet row at all).
pub async fn debit_wallet(
    user_id: i64,
    amount: Kobo,
    conn: &mut SqliteConnection,
) -> Result<Option<Kobo>, SqliteDatabaseError> {
    let balance: Option<Kobo> = sqlx::query_scalar(
        "UPDATE wallets SET balance = balance - $1, updated_at = CURRENT_TIMESTAMP \
         WHERE user_id = $2 AND balance >= $1 \
         RETURNING balance",
    )
    .bind(amount)
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    match balance {
        Some(b) => trace!("💰️ Wallet of user #{user_id} debited by {amount}; new balance {b}"),
        None => trace!("💰️ Debit of {amount} refused for user #{user_id}"),
    }
    Ok(balance)
}
