use std::fmt::Debug;

use log::*;
use pwg_common::Kobo;
use serde::Deserialize;

use crate::{
    db::traits::{TransferOutcome, TransferSpec, WalletBackend},
    db_types::{CounterpartyInfo, NewNotification, NewTransaction, User},
    events::{EventProducers, TransferReceivedEvent, TransferSentEvent},
    helpers::{is_valid_pin, new_transfer_references, normalize_email},
    wpe_api::{errors::TransferError, wallet_objects::TransferReceipt},
};

/// A transfer as requested by the sender.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub recipient_email: String,
    pub amount: Kobo,
    pub pin: String,
}

/// `TransferApi` performs the atomic double-entry transfer between two wallets.
///
/// All pre-checks (validation, PIN, balances) run outside any database transaction; the backend's single atomic
/// unit then applies the debit, credit, both ledger rows and both notifications together. Beneficiary history
/// and emails are post-commit, best-effort side effects.
pub struct TransferApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for TransferApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TransferApi")
    }
}

impl<B> TransferApi<B>
where B: WalletBackend
{
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }

    pub async fn transfer(&self, sender_id: i64, request: TransferRequest) -> Result<TransferReceipt, TransferError> {
        if !request.amount.is_positive() {
            return Err(TransferError::InvalidAmount);
        }
        if !is_valid_pin(&request.pin) {
            return Err(TransferError::InvalidPin);
        }
        if request.recipient_email.trim().is_empty() {
            return Err(TransferError::MissingRecipient);
        }
        let email = normalize_email(&request.recipient_email);

        let sender = self.db.fetch_user_by_id(sender_id).await?.ok_or(TransferError::SenderNotFound(sender_id))?;
        let pin_hash = sender.wallet_pin_hash.as_deref().ok_or(TransferError::PinNotSet)?;
        if !crate::helpers::verify_pin(pin_hash, &request.pin) {
            debug!("🔁️ Transfer by user #{sender_id} rejected: PIN mismatch");
            return Err(TransferError::IncorrectPin);
        }

        let sender_wallet = self.db.fetch_wallet(sender_id).await?.ok_or(TransferError::SenderWalletMissing)?;
        let recipient = self.db.fetch_user_by_email(&email).await?.ok_or(TransferError::RecipientNotFound)?;
        if recipient.id == sender_id {
            return Err(TransferError::SelfTransfer);
        }
        // No transaction is open yet; this pre-check keeps obviously doomed requests away from the store. The
        // guarded debit inside the atomic unit re-checks under concurrency.
        if sender_wallet.balance < request.amount {
            return Err(TransferError::InsufficientBalance);
        }

        let spec = build_spec(&sender, &recipient, request.amount);
        let debit_reference = spec.debit_row.reference.clone();
        let recipient_info = spec.debit_row.counterparty.clone().ok_or_else(|| {
            TransferError::DatabaseError("debit row lost its counterparty".to_string())
        })?;
        let (sender_balance, recipient_balance) = match self.db.transfer_funds(spec).await? {
            TransferOutcome::Completed { sender_balance, recipient_balance } => (sender_balance, recipient_balance),
            TransferOutcome::InsufficientFunds => return Err(TransferError::InsufficientBalance),
        };
        info!(
            "🔁️ Transfer [{debit_reference}] of {} from user #{sender_id} to user #{} complete",
            request.amount, recipient.id
        );

        // Post-commit side effects. None of these may fail the transfer.
        if let Err(e) =
            self.db.record_beneficiary(sender_id, recipient.id, &recipient.full_name(), &recipient.email).await
        {
            warn!("🔁️ Could not record beneficiary for user #{sender_id}: {e}");
        }
        self.publish_transfer_events(&sender, &recipient, request.amount, sender_balance, recipient_balance).await;

        Ok(TransferReceipt {
            reference: debit_reference,
            amount: request.amount,
            new_balance: sender_balance,
            recipient: recipient_info,
        })
    }

    async fn publish_transfer_events(
        &self,
        sender: &User,
        recipient: &User,
        amount: Kobo,
        sender_balance: Kobo,
        recipient_balance: Kobo,
    ) {
        let sent = TransferSentEvent {
            sender_id: sender.id,
            sender_email: sender.email.clone(),
            recipient_name: recipient.full_name(),
            amount,
            new_balance: sender_balance,
        };
        for producer in &self.producers.transfer_sent_producers {
            producer.publish_event(sent.clone()).await;
        }
        let received = TransferReceivedEvent {
            recipient_id: recipient.id,
            recipient_email: recipient.email.clone(),
            sender_name: sender.full_name(),
            amount,
            new_balance: recipient_balance,
        };
        for producer in &self.producers.transfer_received_producers {
            producer.publish_event(received.clone()).await;
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}

/// Assembles the atomic unit: correlated references, both ledger legs, both notifications.
fn build_spec(sender: &User, recipient: &User, amount: Kobo) -> TransferSpec {
    let refs = new_transfer_references();
    let sender_info = CounterpartyInfo { user_id: sender.id, name: sender.full_name(), email: sender.email.clone() };
    let recipient_info =
        CounterpartyInfo { user_id: recipient.id, name: recipient.full_name(), email: recipient.email.clone() };
    let debit_row = NewTransaction::transfer_debit(sender.id, amount, refs.debit, recipient_info.clone());
    let credit_row = NewTransaction::transfer_credit(recipient.id, amount, refs.credit, sender_info.clone());
    let sender_note = NewNotification::money_sent(sender.id, amount, &recipient_info);
    let recipient_note = NewNotification::money_received(recipient.id, amount, &sender_info);
    TransferSpec {
        sender_id: sender.id,
        recipient_id: recipient.id,
        amount,
        debit_row,
        credit_row,
        sender_note,
        recipient_note,
    }
}
