//! Wire-facing response objects. Field names follow the original mobile-client contract, hence the camelCase
//! renames throughout.

use chrono::{DateTime, Utc};
use pwg_common::Kobo;
use serde::{Deserialize, Serialize};

use crate::db_types::{CounterpartyInfo, EntryType, Transaction, TransactionStatus};

/// Page selector for history listings. Pages are 1-based; out-of-range values snap back to the defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: default_page(), limit: default_limit() }
    }
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    pub fn limit(&self) -> i64 {
        if self.limit < 1 {
            default_limit()
        } else {
            self.limit
        }
    }

    pub fn page(&self) -> i64 {
        self.page.max(1)
    }
}

/// One ledger row as served to clients. The counterparty column set is split back into `senderInfo` /
/// `recipientInfo` depending on which leg this row is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: i64,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub amount: Kobo,
    pub reference: String,
    pub status: TransactionStatus,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_info: Option<CounterpartyInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_info: Option<CounterpartyInfo>,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionRecord {
    fn from(tx: Transaction) -> Self {
        let counterparty = tx.counterparty();
        let (sender_info, recipient_info) = match tx.entry_type {
            EntryType::Credit => (counterparty, None),
            EntryType::Debit => (None, counterparty),
        };
        Self {
            id: tx.id,
            entry_type: tx.entry_type,
            amount: tx.amount,
            reference: tx.reference,
            status: tx.status,
            description: tx.description,
            authorization_url: tx.authorization_url,
            sender_info,
            recipient_info,
            created_at: tx.created_at,
        }
    }
}

/// A page of transaction history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionHistory {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub transactions: Vec<TransactionRecord>,
}

/// Result of a funding initialization. `already_pending` signals that an earlier redirect handle was returned
/// instead of a new payment being opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingInitiation {
    pub reference: String,
    pub authorization_url: String,
    pub already_pending: bool,
}

/// Receipt handed back to the sender after a successful transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    pub reference: String,
    pub amount: Kobo,
    pub new_balance: Kobo,
    pub recipient: CounterpartyInfo,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pagination_defaults_and_offsets() {
        let p = Pagination::default();
        assert_eq!((p.page(), p.limit(), p.offset()), (1, 10, 0));
        let p = Pagination { page: 3, limit: 20 };
        assert_eq!(p.offset(), 40);
        let p = Pagination { page: 0, limit: -5 };
        assert_eq!((p.page(), p.limit(), p.offset()), (1, 10, 0));
    }

    #[test]
    fn debit_rows_expose_recipient_info() {
        use crate::db_types::NewTransaction;
        let recipient = CounterpartyInfo { user_id: 9, name: "Ada Obi".into(), email: "ada@example.com".into() };
        let new_tx = NewTransaction::transfer_debit(1, Kobo::from(500), "TRF_X_DB".into(), recipient.clone());
        let tx = Transaction {
            id: 1,
            user_id: new_tx.user_id,
            entry_type: new_tx.entry_type,
            amount: new_tx.amount,
            reference: new_tx.reference,
            status: new_tx.status,
            description: new_tx.description,
            authorization_url: None,
            counterparty_user_id: Some(recipient.user_id),
            counterparty_name: Some(recipient.name.clone()),
            counterparty_email: Some(recipient.email.clone()),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let record = TransactionRecord::from(tx);
        assert_eq!(record.recipient_info, Some(recipient));
        assert!(record.sender_info.is_none());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "debit");
        assert!(json.get("recipientInfo").is_some());
        assert!(json.get("senderInfo").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
