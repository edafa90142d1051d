use log::trace;
use sqlx::SqliteConnection;

use crate::{db::sqlite::SqliteDatabaseError, db_types::Beneficiary};

/// Records that `user_id` has sent money to `beneficiary_user_id`, bumping the transfer count on repeats.
pub async fn upsert_from_transfer(
    user_id: i64,
    beneficiary_user_id: i64,
    name: &str,
    email: &str,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    let _ = sqlx::query(
        "INSERT INTO beneficiaries (user_id, beneficiary_user_id, name, email) VALUES ($1, $2, $3, $4) \
         ON CONFLICT (user_id, beneficiary_user_id) DO UPDATE SET \
            transfer_count = transfer_count + 1, \
            name = excluded.name, \
            email = excluded.email, \
            updated_at = CURRENT_TIMESTAMP",
    )
    .bind(user_id)
    .bind(beneficiary_user_id)
    .bind(name)
    .bind(email)
    .execute(conn)
    .await?;
    trace!("🗃️ Beneficiary {beneficiary_user_id} recorded for user #{user_id}");
    Ok(())
}

pub async fn fetch_for_user(
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Beneficiary>, SqliteDatabaseError> {
    let rows = sqlx::query_as(
        "SELECT id, user_id, beneficiary_user_id, name, email, transfer_count, created_at, updated_at \
         FROM beneficiaries WHERE user_id = $1 ORDER BY updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}
