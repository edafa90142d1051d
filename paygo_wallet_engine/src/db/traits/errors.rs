use thiserror::Error;

/// Errors surfaced by [`super::WalletLedgerDatabase`] implementations.
///
/// Domain conditions (duplicate settlement, insufficient funds) are *not* errors; they are expressed in the
/// result objects so that callers can distinguish a no-op from a failure.
#[derive(Debug, Clone, Error)]
pub enum WalletLedgerError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Errors surfaced by [`super::AccountQueries`] implementations.
#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Errors surfaced by [`super::PaymentGatewayClient`] implementations.
#[derive(Debug, Clone, Error)]
pub enum GatewayClientError {
    #[error("Payment gateway is unreachable: {0}")]
    Unreachable(String),
    #[error("Payment gateway rejected the request: {0}")]
    Rejected(String),
    #[error("Unexpected payment gateway response: {0}")]
    InvalidResponse(String),
}
