use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db::{sqlite::SqliteDatabaseError, traits::InsertFundingResult},
    db_types::{NewTransaction, Transaction},
};

const TRANSACTION_COLUMNS: &str = "id, user_id, entry_type, amount, reference, status, description, \
    authorization_url, counterparty_user_id, counterparty_name, counterparty_email, created_at, updated_at";

/// Inserts a ledger row, treating a reference collision as "already recorded" rather than an error.
pub async fn idempotent_insert(
    row: NewTransaction,
    conn: &mut SqliteConnection,
) -> Result<InsertFundingResult, SqliteDatabaseError> {
    let reference = row.reference.clone();
    let (cp_user_id, cp_name, cp_email) = match row.counterparty {
        Some(cp) => (Some(cp.user_id), Some(cp.name), Some(cp.email)),
        None => (None, None, None),
    };
    let result = sqlx::query_scalar::<_, i64>(
        "INSERT INTO transactions \
            (user_id, entry_type, amount, reference, status, description, authorization_url, \
             counterparty_user_id, counterparty_name, counterparty_email) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING id",
    )
    .bind(row.user_id)
    .bind(row.entry_type)
    .bind(row.amount)
    .bind(row.reference)
    .bind(row.status)
    .bind(row.description)
    .bind(row.authorization_url)
    .bind(cp_user_id)
    .bind(cp_name)
    .bind(cp_email)
    .fetch_one(conn)
    .await;
    match result {
        Ok(id) => Ok(InsertFundingResult::Inserted(id)),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(InsertFundingResult::AlreadyExists(reference)),
        Err(e) => Err(SqliteDatabaseError::from(e)),
    }
}

/// The user's open pending funding, if any. At most one is expected at a time.
pub async fn pending_credit_for_user(
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, SqliteDatabaseError> {
    let q = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions \
         WHERE user_id = $1 AND entry_type = 'Credit' AND status = 'Pending' \
         ORDER BY created_at DESC LIMIT 1"
    );
    let tx = sqlx::query_as(&q).bind(user_id).fetch_optional(conn).await?;
    Ok(tx)
}

/// The compare-and-swap at the heart of the reconciliation design: transition `{reference, Pending}` to
/// `Successful`. Exactly one caller can ever see `true` for a given reference.
pub async fn claim_pending(reference: &str, conn: &mut SqliteConnection) -> Result<bool, SqliteDatabaseError> {
    let result = sqlx::query(
        "UPDATE transactions SET status = 'Successful', updated_at = CURRENT_TIMESTAMP \
         WHERE reference = $1 AND status = 'Pending'",
    )
    .bind(reference)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn fetch_by_reference(
    reference: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, SqliteDatabaseError> {
    let q = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE reference = $1");
    let tx = sqlx::query_as(&q).bind(reference).fetch_optional(conn).await?;
    Ok(tx)
}

pub async fn fetch_page_for_user(
    user_id: i64,
    offset: i64,
    limit: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Transaction>, SqliteDatabaseError> {
    let q = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE user_id = $1 \
         ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
    );
    let txs = sqlx::query_as(&q).bind(user_id).bind(limit).bind(offset).fetch_all(conn).await?;
    Ok(txs)
}

pub async fn count_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<i64, SqliteDatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

pub async fn fetch_by_id(
    id: i64,
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Transaction>, SqliteDatabaseError> {
    let q = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1 AND user_id = $2");
    let tx = sqlx::query_as(&q).bind(id).bind(user_id).fetch_optional(conn).await?;
    Ok(tx)
}

/// Fails pending credit rows older than the given number of minutes, returning the flipped rows.
///
/// The cutoff comparison happens in SQL so that the stored `CURRENT_TIMESTAMP` text format is compared against
/// itself rather than against an RFC3339 string bound from Rust.
pub async fn fail_stale_pending(
    minutes: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Transaction>, SqliteDatabaseError> {
    let cutoff = format!("-{minutes} minutes");
    let q = format!(
        "UPDATE transactions \
         SET status = 'Failed', description = 'Expired pending wallet funding', updated_at = CURRENT_TIMESTAMP \
         WHERE status = 'Pending' AND entry_type = 'Credit' AND created_at <= datetime('now', $1) \
         RETURNING {TRANSACTION_COLUMNS}"
    );
    let flipped: Vec<Transaction> = sqlx::query_as(&q).bind(cutoff).fetch_all(conn).await?;
    if !flipped.is_empty() {
        debug!("🗃️ {} stale pending funding(s) marked as failed", flipped.len());
    }
    Ok(flipped)
}
