use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use pwg_common::Kobo;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------      EntryType      ---------------------------------------------------------
/// Which side of the ledger a transaction row sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Credit,
    Debit,
}

impl Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryType::Credit => write!(f, "credit"),
            EntryType::Debit => write!(f, "debit"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid ledger value: {0}")]
pub struct ConversionError(pub String);

impl FromStr for EntryType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Credit" | "credit" => Ok(Self::Credit),
            "Debit" | "debit" => Ok(Self::Debit),
            s => Err(ConversionError(format!("Invalid entry type: {s}"))),
        }
    }
}

//--------------------------------------  TransactionStatus  ---------------------------------------------------------
/// Lifecycle of a transaction row.
///
/// A reference transitions from `Pending` to a terminal state at most once. Funding rows are born `Pending` and are
/// settled (or failed) later; transfer rows are written `Successful` inside the transfer's atomic unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Successful,
    Failed,
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Successful => write!(f, "successful"),
            TransactionStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" | "pending" => Ok(Self::Pending),
            "Successful" | "successful" => Ok(Self::Successful),
            "Failed" | "failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid transaction status: {s}"))),
        }
    }
}

//--------------------------------------        User         ---------------------------------------------------------
/// A wallet owner. Registration and PIN management happen in the (external) auth subsystem; the engine only reads
/// these rows.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Argon2 PHC string of the 4-digit transfer PIN. `None` until the user sets one.
    pub wallet_pin_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Insert payload for a user row. Used by the account-provisioning collaborator and by test setup.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub wallet_pin_hash: Option<String>,
}

//--------------------------------------       Wallet        ---------------------------------------------------------
/// Current balance for a user. One wallet per user; created lazily on first credit.
#[derive(Debug, Clone, FromRow)]
pub struct Wallet {
    pub id: i64,
    pub user_id: i64,
    pub balance: Kobo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------   CounterpartyInfo  ---------------------------------------------------------
/// The "other side" of a transfer leg: recipient details on a debit row, sender details on a credit row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterpartyInfo {
    pub user_id: i64,
    pub name: String,
    pub email: String,
}

//--------------------------------------     Transaction     ---------------------------------------------------------
/// One row of the append-only money-movement ledger.
#[derive(Debug, Clone, FromRow)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub entry_type: EntryType,
    pub amount: Kobo,
    /// Globally unique idempotency key. Never reused; transitions status at most once.
    pub reference: String,
    pub status: TransactionStatus,
    pub description: String,
    /// Redirect handle for gateway funding rows. `None` for transfer legs.
    pub authorization_url: Option<String>,
    pub counterparty_user_id: Option<i64>,
    pub counterparty_name: Option<String>,
    pub counterparty_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn counterparty(&self) -> Option<CounterpartyInfo> {
        match (self.counterparty_user_id, &self.counterparty_name, &self.counterparty_email) {
            (Some(user_id), Some(name), Some(email)) => {
                Some(CounterpartyInfo { user_id, name: name.clone(), email: email.clone() })
            },
            _ => None,
        }
    }
}

//--------------------------------------    NewTransaction   ---------------------------------------------------------
/// Insert payload for a ledger row.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: i64,
    pub entry_type: EntryType,
    pub amount: Kobo,
    pub reference: String,
    pub status: TransactionStatus,
    pub description: String,
    pub authorization_url: Option<String>,
    pub counterparty: Option<CounterpartyInfo>,
}

impl NewTransaction {
    /// A gateway funding row, born pending and carrying the redirect handle.
    pub fn pending_funding(user_id: i64, amount: Kobo, reference: String, authorization_url: String) -> Self {
        Self {
            user_id,
            entry_type: EntryType::Credit,
            amount,
            reference,
            status: TransactionStatus::Pending,
            description: "Pending Paystack wallet funding".to_string(),
            authorization_url: Some(authorization_url),
            counterparty: None,
        }
    }

    /// The sender's leg of a transfer, recording who received the money.
    pub fn transfer_debit(user_id: i64, amount: Kobo, reference: String, recipient: CounterpartyInfo) -> Self {
        Self {
            user_id,
            entry_type: EntryType::Debit,
            amount,
            reference,
            status: TransactionStatus::Successful,
            description: format!("Transfer to {}", recipient.name),
            authorization_url: None,
            counterparty: Some(recipient),
        }
    }

    /// The recipient's leg of a transfer, recording who sent the money.
    pub fn transfer_credit(user_id: i64, amount: Kobo, reference: String, sender: CounterpartyInfo) -> Self {
        Self {
            user_id,
            entry_type: EntryType::Credit,
            amount,
            reference,
            status: TransactionStatus::Successful,
            description: format!("Received from {}", sender.name),
            authorization_url: None,
            counterparty: Some(sender),
        }
    }
}

//--------------------------------------    Notification     ---------------------------------------------------------
/// A side-effect record of a ledger event, surfaced to the user in-app. Not authoritative state.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub kind: EntryType,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub kind: EntryType,
}

impl NewNotification {
    pub fn wallet_funded(user_id: i64, amount: Kobo) -> Self {
        Self {
            user_id,
            title: "Wallet funded".to_string(),
            message: format!("Your wallet has been credited with {amount}"),
            kind: EntryType::Credit,
        }
    }

    pub fn money_sent(user_id: i64, amount: Kobo, recipient: &CounterpartyInfo) -> Self {
        Self {
            user_id,
            title: "Money sent".to_string(),
            message: format!("You transferred {amount} to {} ({})", recipient.name, recipient.email),
            kind: EntryType::Debit,
        }
    }

    pub fn money_received(user_id: i64, amount: Kobo, sender: &CounterpartyInfo) -> Self {
        Self {
            user_id,
            title: "Money received".to_string(),
            message: format!("You received {amount} from {} ({})", sender.name, sender.email),
            kind: EntryType::Credit,
        }
    }
}

//--------------------------------------     Beneficiary     ---------------------------------------------------------
/// Derived record of who a user has sent money to. Updated as a side effect of successful transfers.
#[derive(Debug, Clone, FromRow)]
pub struct Beneficiary {
    pub id: i64,
    pub user_id: i64,
    pub beneficiary_user_id: i64,
    pub name: String,
    pub email: String,
    pub transfer_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_round_trips() {
        for s in [TransactionStatus::Pending, TransactionStatus::Successful, TransactionStatus::Failed] {
            assert_eq!(s.to_string().parse::<TransactionStatus>().unwrap(), s);
        }
        assert!("paid".parse::<TransactionStatus>().is_err());
    }

    #[test]
    fn transfer_rows_carry_counterparties() {
        let recipient = CounterpartyInfo { user_id: 2, name: "Bola Ahmed".into(), email: "bola@example.com".into() };
        let row = NewTransaction::transfer_debit(1, Kobo::from(3_000), "TRF_1_1_DB".into(), recipient.clone());
        assert_eq!(row.entry_type, EntryType::Debit);
        assert_eq!(row.status, TransactionStatus::Successful);
        assert_eq!(row.description, "Transfer to Bola Ahmed");
        assert_eq!(row.counterparty, Some(recipient));
    }
}
