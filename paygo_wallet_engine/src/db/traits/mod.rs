mod account_queries;
mod data_objects;
mod errors;
mod payment_gateway_client;
mod wallet_ledger;

pub use account_queries::AccountQueries;
pub use data_objects::{InsertFundingResult, SettlementOutcome, TransferOutcome, TransferSpec};
pub use errors::{AccountApiError, GatewayClientError, WalletLedgerError};
pub use payment_gateway_client::{
    GatewayRedirect,
    GatewaySettlement,
    NewGatewayPayment,
    PaymentGatewayClient,
    WebhookCharge,
};
pub use wallet_ledger::WalletLedgerDatabase;

/// Everything the funding and transfer flows need from a backend. Blanket-implemented, so any type providing both
/// the mutation and query contracts qualifies.
pub trait WalletBackend: WalletLedgerDatabase + AccountQueries {}

impl<T: WalletLedgerDatabase + AccountQueries> WalletBackend for T {}
