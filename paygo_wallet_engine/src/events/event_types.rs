use pwg_common::Kobo;

/// Published after a funding settlement commits. Carries everything the funded-email needs, so handlers do not
/// have to read the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletFundedEvent {
    pub user_id: i64,
    /// Present when the wallet owner could be resolved at publish time.
    pub email: Option<String>,
    pub amount: Kobo,
    pub new_balance: Kobo,
}

/// Published after a transfer commits, once for the sender's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSentEvent {
    pub sender_id: i64,
    pub sender_email: String,
    pub recipient_name: String,
    pub amount: Kobo,
    pub new_balance: Kobo,
}

/// Published after a transfer commits, once for the recipient's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceivedEvent {
    pub recipient_id: i64,
    pub recipient_email: String,
    pub sender_name: String,
    pub amount: Kobo,
    pub new_balance: Kobo,
}
