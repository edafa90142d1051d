use chrono::Duration;
use pwg_common::Kobo;

use super::{InsertFundingResult, SettlementOutcome, TransferOutcome, TransferSpec, WalletLedgerError};
use crate::db_types::{NewNotification, NewTransaction, Transaction};

/// This trait defines the mutation contract for backends supporting the wallet engine.
///
/// Every method that touches more than one record must apply its writes in a single atomic unit: either all of
/// them commit, or none do. Race safety relies on the backend's conditional ("compare-and-swap style") updates,
/// never on in-memory locks.
#[allow(async_fn_in_trait)]
pub trait WalletLedgerDatabase {
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Returns the user's open pending funding transaction, if one exists.
    ///
    /// At most one funding can be pending per user; initialization returns the existing redirect handle instead
    /// of creating a second one.
    async fn pending_funding_for_user(&self, user_id: i64) -> Result<Option<Transaction>, WalletLedgerError>;

    /// Persists a `Pending` credit transaction carrying the gateway's redirect handle.
    ///
    /// The reference is the idempotency key: if a row with the same reference already exists, nothing is written
    /// and `AlreadyExists` is returned.
    async fn insert_pending_funding(&self, funding: NewTransaction) -> Result<InsertFundingResult, WalletLedgerError>;

    /// Settles a funding reference exactly once. In a single atomic unit:
    /// * the transaction matching `{reference, status = Pending}` is transitioned to `Successful`;
    /// * the user's wallet is credited with the settled amount (the wallet is created if absent);
    /// * the given notification is recorded.
    ///
    /// The conditional status update is the single mutual-exclusion point between racing consumers (client
    /// verify vs gateway webhook). The loser observes zero matched rows and gets `AlreadySettled` back, with no
    /// balance mutation.
    async fn settle_funding(
        &self,
        reference: &str,
        user_id: i64,
        amount: Kobo,
        note: NewNotification,
    ) -> Result<SettlementOutcome, WalletLedgerError>;

    /// Applies one transfer in a single atomic unit:
    /// * guarded debit of the sender's wallet (`balance >= amount` enforced in the update itself);
    /// * credit of the recipient's wallet (created with the transferred amount if absent);
    /// * both ledger rows and both notifications from the [`TransferSpec`].
    ///
    /// A guarded debit that matches zero rows aborts the unit and reports `InsufficientFunds`; no partial
    /// debit-without-credit state is ever durable.
    async fn transfer_funds(&self, spec: TransferSpec) -> Result<TransferOutcome, WalletLedgerError>;

    /// Records (or bumps) the sender's beneficiary entry for a recipient. Called once per successful transfer,
    /// outside the atomic unit.
    async fn record_beneficiary(
        &self,
        user_id: i64,
        beneficiary_user_id: i64,
        name: &str,
        email: &str,
    ) -> Result<(), WalletLedgerError>;

    /// Marks pending funding transactions older than the cutoff as `Failed`, returning the rows that were
    /// flipped. Redirect handles for these references are long dead; failing them re-opens funding for the user.
    async fn fail_stale_fundings(&self, older_than: Duration) -> Result<Vec<Transaction>, WalletLedgerError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), WalletLedgerError> {
        Ok(())
    }
}
