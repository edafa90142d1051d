use pwg_common::Kobo;

use crate::db_types::{NewNotification, NewTransaction};

/// Outcome of inserting a pending funding row, keyed on the unique reference.
#[derive(Debug, Clone)]
pub enum InsertFundingResult {
    Inserted(i64),
    AlreadyExists(String),
}

/// Outcome of a settlement attempt for a payment reference.
///
/// `AlreadySettled` means the conditional status update matched zero rows: either a racing consumer won, or the
/// reference is unknown. Both cases are no-ops by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    Credited { new_balance: Kobo },
    AlreadySettled,
}

/// Everything a backend needs to commit one transfer atomically. The API layer pre-builds the ledger rows and
/// notifications so the backend only has to apply them in one unit.
#[derive(Debug, Clone)]
pub struct TransferSpec {
    pub sender_id: i64,
    pub recipient_id: i64,
    pub amount: Kobo,
    pub debit_row: NewTransaction,
    pub credit_row: NewTransaction,
    pub sender_note: NewNotification,
    pub recipient_note: NewNotification,
}

/// Outcome of an atomic transfer attempt.
///
/// `InsufficientFunds` is reported when the guarded debit matches zero rows; nothing is committed in that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    Completed { sender_balance: Kobo, recipient_balance: Kobo },
    InsufficientFunds,
}
