use thiserror::Error;

use crate::db::traits::{AccountApiError, WalletLedgerError};

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Database query error: {0}")]
    QueryError(String),
    #[error("Could not create user: {0}")]
    UserCreationError(String),
}

impl From<SqliteDatabaseError> for WalletLedgerError {
    fn from(e: SqliteDatabaseError) -> Self {
        WalletLedgerError::DatabaseError(e.to_string())
    }
}

impl From<SqliteDatabaseError> for AccountApiError {
    fn from(e: SqliteDatabaseError) -> Self {
        AccountApiError::DatabaseError(e.to_string())
    }
}
