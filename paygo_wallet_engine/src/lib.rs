//! PayGo Wallet Engine
//!
//! The wallet engine is the consistency core of the PayGo digital wallet. It keeps wallet balances, the append-only
//! transaction ledger, and the external payment gateway's settlement signals mutually consistent under concurrent
//! requests, webhook retries, and partial failures.
//!
//! The library is divided into three main sections:
//! 1. Database management and control ([`mod@db`]). SQLite is the supported backend. You should never need to access
//!    the database directly. Instead, use the public API provided by the engine. The exception is the data types used
//!    in the database. These are defined in the `db_types` module and are public.
//! 2. The engine public API ([`mod@wpe_api`]). [`FundingFlowApi`] reconciles the gateway's three independent signals
//!    (client verify, asynchronous webhook, pending-transaction state) into exactly one wallet credit per payment
//!    reference. [`TransferApi`] performs the atomic double-entry transfer between two wallets. [`AccountApi`] serves
//!    read queries (balances, histories, notifications).
//! 3. An event channel ([`mod@events`]). Ledger commits publish events that subscribers (such as the mail dispatcher
//!    in the server crate) can hook into. Event handling is fire-and-forget and can never fail a ledger operation.
mod db;

pub mod db_types;
pub mod events;
pub mod helpers;
mod wpe_api;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use db::traits;
pub use db::traits::{
    AccountQueries,
    InsertFundingResult,
    PaymentGatewayClient,
    SettlementOutcome,
    TransferOutcome,
    WalletBackend,
    WalletLedgerDatabase,
};
pub use wpe_api::{
    accounts_api::AccountApi,
    errors::{AccountApiError, FundingFlowError, TransferError},
    funding_flow_api::{FundingFlowApi, SettlementResult, DEFAULT_MINIMUM_FUNDING},
    transfer_api::{TransferApi, TransferRequest},
    wallet_objects,
};
