//! Database management and control.
//!
//! This module provides the interface contracts of the wallet engine database *backends*, and the SQLite
//! implementation of those contracts.
//!
//! ## Traits
//! * [`traits::WalletLedgerDatabase`] defines every atomic mutation of the ledger: recording pending fundings,
//!   settling them exactly once, and the double-entry transfer. This is where the consistency guarantees live.
//! * [`traits::AccountQueries`] defines the read side: users, wallets, transaction history and notifications.
//! * [`traits::PaymentGatewayClient`] is the outbound contract for the external payment gateway. It is implemented
//!   by an adapter in the server crate so that the engine itself never speaks HTTP.

#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;
