use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{NewUser, User},
};

const USER_COLUMNS: &str = "id, first_name, last_name, email, wallet_pin_hash, \
    created_at, updated_at";

pub async fn user_by_id(user_id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, SqliteDatabaseError> {
    let q = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let user = sqlx::query_as(&q).bind(user_id).fetch_optional(conn).await?;
    Ok(user)
}

/// Fetches a user by (already normalized) email address.
pub async fn user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, SqliteDatabaseError> {
    let q = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    let user = sqlx::query_as(&q).bind(email).fetch_optional(conn).await?;
    Ok(user)
}

/// Inserts a user row. Wallet provisioning does not happen here; wallets are created lazily on first credit.
pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, SqliteDatabaseError> {
    let q = format!(
        "INSERT INTO users (first_name, last_name, email, wallet_pin_hash) VALUES ($1, $2, $3, $4) \
         RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as(&q)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.email)
        .bind(user.wallet_pin_hash)
        .fetch_one(conn)
        .await
        .map_err(|e| SqliteDatabaseError::UserCreationError(e.to_string()))?;
    Ok(user)
}
