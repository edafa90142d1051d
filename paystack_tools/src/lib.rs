//! A small client library for the Paystack REST API.
//!
//! Only the two endpoints the wallet backend needs are wrapped:
//! * `POST /transaction/initialize` — start a card payment and obtain the redirect (authorization) URL.
//! * `GET /transaction/verify/{reference}` — ask Paystack whether a payment reference has settled.
//!
//! The webhook payload types ([`ChargeEvent`]) also live here, since they are part of the same wire format.
//! Signature verification of webhooks is the caller's responsibility; this crate only models the payloads.

mod api;
mod config;
pub mod data_objects;
mod error;

pub use api::PaystackApi;
pub use config::PaystackConfig;
pub use data_objects::{Authorization, ChargeEvent, ChargeEventData, FundingMetadata, InitializeBody, VerifiedPayment};
pub use error::PaystackApiError;

/// The event name Paystack sends when a charge has been captured successfully.
pub const CHARGE_SUCCESS_EVENT: &str = "charge.success";

/// The settlement status string Paystack reports for a successful payment.
pub const PAYMENT_SUCCESS_STATUS: &str = "success";
