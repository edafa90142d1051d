use std::fmt::Debug;

use chrono::Duration;
use log::*;
use pwg_common::Kobo;

use crate::{
    db::traits::{
        InsertFundingResult,
        NewGatewayPayment,
        PaymentGatewayClient,
        SettlementOutcome,
        WalletBackend,
        WebhookCharge,
    },
    db_types::{NewNotification, NewTransaction, Transaction},
    events::{EventProducers, WalletFundedEvent},
    helpers::new_funding_reference,
    wpe_api::{errors::FundingFlowError, wallet_objects::FundingInitiation},
};

/// The default minimum funding amount: ₦100.
pub const DEFAULT_MINIMUM_FUNDING: Kobo = Kobo::from_naira(100);

/// Result of driving a settlement signal (verify call or webhook) through the ledger.
///
/// `Duplicate` and `Ignored` are success values: the signal was understood and deliberately produced no state
/// change. Only [`FundingFlowError`] represents failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementResult {
    /// This caller won the settlement race; the wallet was credited exactly once.
    Credited { amount: Kobo, new_balance: Kobo },
    /// The reference was already consumed (or never pending). Nothing was mutated.
    Duplicate,
    /// The signal carried no usable wallet owner; acknowledged without state change.
    Ignored,
}

/// `FundingFlowApi` drives wallet funding through the external payment gateway and reconciles the gateway's
/// three independent signals — client-initiated verify, asynchronous webhook, and the pending-transaction state —
/// into exactly one wallet credit per payment reference.
pub struct FundingFlowApi<B, G> {
    db: B,
    gateway: G,
    minimum_funding: Kobo,
    producers: EventProducers,
}

impl<B, G> Debug for FundingFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FundingFlowApi")
    }
}

impl<B, G> FundingFlowApi<B, G>
where
    B: WalletBackend,
    G: PaymentGatewayClient,
{
    pub fn new(db: B, gateway: G, producers: EventProducers) -> Self {
        Self { db, gateway, minimum_funding: DEFAULT_MINIMUM_FUNDING, producers }
    }

    pub fn with_minimum_funding(mut self, minimum: Kobo) -> Self {
        self.minimum_funding = minimum;
        self
    }

    /// Starts a funding for the given user.
    ///
    /// If the user already has a pending funding transaction, its redirect handle is returned (flagged
    /// `already_pending`) instead of opening a second payment with the gateway. Otherwise a fresh reference is
    /// generated, the gateway is asked for an authorization URL, and only then is the pending transaction
    /// persisted — an unreachable gateway leaves no trace in the ledger.
    pub async fn initialize_funding(&self, user_id: i64, amount: Kobo) -> Result<FundingInitiation, FundingFlowError> {
        if amount < self.minimum_funding {
            return Err(FundingFlowError::AmountBelowMinimum(self.minimum_funding));
        }
        let user = self.db.fetch_user_by_id(user_id).await?.ok_or(FundingFlowError::UserNotFound(user_id))?;
        if let Some(pending) = self.db.pending_funding_for_user(user_id).await? {
            info!("🔄️💳️ User #{user_id} already has pending funding [{}]; returning its handle", pending.reference);
            return Ok(FundingInitiation {
                reference: pending.reference,
                authorization_url: pending.authorization_url.unwrap_or_default(),
                already_pending: true,
            });
        }
        let reference = new_funding_reference(user_id);
        let payment =
            NewGatewayPayment { user_id, email: user.email.clone(), amount, reference: reference.clone() };
        let redirect = self.gateway.initialize_payment(payment).await?;
        let row = NewTransaction::pending_funding(user_id, amount, reference.clone(), redirect.authorization_url.clone());
        if let InsertFundingResult::AlreadyExists(r) = self.db.insert_pending_funding(row).await? {
            // A retried request can land here if the gateway call raced a concurrent initialize.
            warn!("🔄️💳️ Funding reference [{r}] was already recorded; returning the existing handle");
            return Ok(FundingInitiation {
                reference: r,
                authorization_url: redirect.authorization_url,
                already_pending: true,
            });
        }
        debug!("🔄️💳️ Funding [{reference}] of {amount} initialized for user #{user_id}");
        Ok(FundingInitiation { reference, authorization_url: redirect.authorization_url, already_pending: false })
    }

    /// Settles a funding via the client-initiated verify path.
    ///
    /// The gateway is the authority on both the settlement status and the settled amount; the wallet owner is
    /// taken from the metadata echoed back by the gateway. The settlement itself is the atomic triple performed
    /// by the backend; a racing webhook that got there first surfaces as `Duplicate`.
    pub async fn verify_funding(&self, reference: &str) -> Result<SettlementResult, FundingFlowError> {
        let settlement = self.gateway.verify_payment(reference).await?;
        if !settlement.is_successful() {
            debug!("🔄️💳️ Verify of [{reference}]: gateway reports '{}'", settlement.status);
            return Err(FundingFlowError::PaymentNotSuccessful(settlement.status));
        }
        let user_id =
            settlement.user_id.ok_or_else(|| FundingFlowError::MissingUserMetadata(reference.to_string()))?;
        self.settle(reference, user_id, settlement.amount).await
    }

    /// Settles a funding via the webhook path. The payload signature has already been verified by the caller.
    ///
    /// Events without usable owner metadata are acknowledged as `Ignored` so the gateway never retries them.
    pub async fn process_webhook_charge(&self, charge: WebhookCharge) -> Result<SettlementResult, FundingFlowError> {
        let Some(user_id) = charge.user_id else {
            warn!("🔄️💳️ Webhook charge [{}] has no wallet owner metadata; acknowledging without action", charge.reference);
            return Ok(SettlementResult::Ignored);
        };
        self.settle(&charge.reference, user_id, charge.amount).await
    }

    async fn settle(&self, reference: &str, user_id: i64, amount: Kobo) -> Result<SettlementResult, FundingFlowError> {
        let note = NewNotification::wallet_funded(user_id, amount);
        match self.db.settle_funding(reference, user_id, amount, note).await? {
            SettlementOutcome::Credited { new_balance } => {
                info!("🔄️💳️ Funding [{reference}] settled: {amount} credited to user #{user_id}");
                self.publish_wallet_funded(user_id, amount, new_balance).await;
                Ok(SettlementResult::Credited { amount, new_balance })
            },
            SettlementOutcome::AlreadySettled => {
                info!("🔄️💳️ Funding [{reference}] already processed; treating as duplicate");
                Ok(SettlementResult::Duplicate)
            },
        }
    }

    async fn publish_wallet_funded(&self, user_id: i64, amount: Kobo, new_balance: Kobo) {
        if self.producers.wallet_funded_producers.is_empty() {
            return;
        }
        // Best-effort owner lookup so the mail hook does not need database access.
        let email = match self.db.fetch_user_by_id(user_id).await {
            Ok(user) => user.map(|u| u.email),
            Err(e) => {
                warn!("🔄️💳️ Could not resolve email for funded event of user #{user_id}: {e}");
                None
            },
        };
        let event = WalletFundedEvent { user_id, email, amount, new_balance };
        for producer in &self.producers.wallet_funded_producers {
            producer.publish_event(event.clone()).await;
        }
    }

    /// Marks pending fundings older than the cutoff as failed. Run periodically by the host application; a dead
    /// redirect handle would otherwise block the user from ever funding again.
    pub async fn fail_stale_fundings(&self, older_than: Duration) -> Result<Vec<Transaction>, FundingFlowError> {
        let flipped = self.db.fail_stale_fundings(older_than).await?;
        if !flipped.is_empty() {
            info!("🔄️💳️ {} stale pending funding(s) failed", flipped.len());
        }
        Ok(flipped)
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}
