use pwg_common::Kobo;
use thiserror::Error;

pub use crate::db::traits::AccountApiError;
use crate::db::traits::{GatewayClientError, WalletLedgerError};

/// Failures of the funding reconciliation flow.
///
/// Note what is *not* here: a duplicate settlement is a [`SettlementResult::Duplicate`] success, and an
/// already-pending funding is returned as a flagged success. Only genuine failures are errors.
///
/// [`SettlementResult::Duplicate`]: crate::wpe_api::funding_flow_api::SettlementResult
#[derive(Debug, Clone, Error)]
pub enum FundingFlowError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Minimum funding amount is {0}")]
    AmountBelowMinimum(Kobo),
    #[error("User #{0} was not found")]
    UserNotFound(i64),
    #[error("Payment gateway error: {0}")]
    GatewayError(#[from] GatewayClientError),
    #[error("Payment was not successful (gateway reported '{0}')")]
    PaymentNotSuccessful(String),
    #[error("Gateway settlement for [{0}] carried no wallet owner metadata")]
    MissingUserMetadata(String),
}

impl From<WalletLedgerError> for FundingFlowError {
    fn from(e: WalletLedgerError) -> Self {
        FundingFlowError::DatabaseError(e.to_string())
    }
}

impl From<AccountApiError> for FundingFlowError {
    fn from(e: AccountApiError) -> Self {
        FundingFlowError::DatabaseError(e.to_string())
    }
}

/// Failures of the transfer flow, in the order the pipeline checks them.
#[derive(Debug, Clone, Error)]
pub enum TransferError {
    #[error("Invalid amount")]
    InvalidAmount,
    #[error("A valid 4-digit PIN is required")]
    InvalidPin,
    #[error("Recipient email is required")]
    MissingRecipient,
    #[error("Sender #{0} was not found")]
    SenderNotFound(i64),
    #[error("Set a wallet PIN before transfers")]
    PinNotSet,
    #[error("Incorrect PIN")]
    IncorrectPin,
    #[error("Sender wallet not found")]
    SenderWalletMissing,
    #[error("Recipient not found")]
    RecipientNotFound,
    #[error("Cannot send to yourself")]
    SelfTransfer,
    #[error("Insufficient balance")]
    InsufficientBalance,
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<WalletLedgerError> for TransferError {
    fn from(e: WalletLedgerError) -> Self {
        TransferError::DatabaseError(e.to_string())
    }
}

impl From<AccountApiError> for TransferError {
    fn from(e: AccountApiError) -> Self {
        TransferError::DatabaseError(e.to_string())
    }
}
