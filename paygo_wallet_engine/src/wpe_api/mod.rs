//! # Wallet engine public API
//!
//! The `wpe_api` module exposes the programmatic API for the wallet engine. The API is modular, so that clients
//! can pick only the functionality they need:
//!
//! * [`funding_flow_api`] reconciles the payment gateway's three independent signals (client-initiated verify,
//!   asynchronous webhook, pending-transaction state) into exactly one wallet credit per payment reference.
//! * [`transfer_api`] performs the PIN-authorised, atomic double-entry transfer between two wallets.
//! * [`accounts_api`] serves read queries: balances, transaction history and notifications.
//!
//! The pattern for using the APIs is the same throughout: an API instance is created by supplying a database
//! backend that implements the backend traits the API requires, for example:
//!
//! ```rust,ignore
//! use paygo_wallet_engine::{AccountApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/paygo_store.db", 25).await?;
//! // SqliteDatabase implements AccountQueries
//! let api = AccountApi::new(db);
//! let balance = api.balance(user_id).await?;
//! ```

pub mod accounts_api;
pub mod errors;
pub mod funding_flow_api;
pub mod transfer_api;
pub mod wallet_objects;
