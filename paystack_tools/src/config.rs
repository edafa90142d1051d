use std::env;

use log::*;
use pwg_common::Secret;

pub const DEFAULT_PAYSTACK_API_URL: &str = "https://api.paystack.co";

/// Configuration for talking to the Paystack API.
///
/// The secret key doubles as the HMAC signing key for incoming webhooks, which is why it is wrapped in
/// [`Secret`] and never logged.
#[derive(Clone, Debug, Default)]
pub struct PaystackConfig {
    /// Base URL of the Paystack API. Overridable so tests can point the client at a local stub.
    pub api_url: String,
    /// The account's secret key. Sent as a bearer token and used to sign webhook payloads.
    pub secret_key: Secret<String>,
    /// Where Paystack redirects the customer after checkout completes.
    pub callback_url: String,
}

impl PaystackConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = env::var("PWG_PAYSTACK_API_URL").ok().unwrap_or_else(|| DEFAULT_PAYSTACK_API_URL.to_string());
        let secret_key = env::var("PWG_PAYSTACK_SECRET_KEY").ok().unwrap_or_else(|| {
            error!("🅿️ PWG_PAYSTACK_SECRET_KEY is not set. Payment initialization and webhook checks will fail.");
            String::default()
        });
        let callback_url = env::var("PWG_PAYSTACK_CALLBACK_URL").ok().unwrap_or_else(|| {
            warn!("🅿️ PWG_PAYSTACK_CALLBACK_URL is not set. Customers will not be redirected after checkout.");
            String::default()
        });
        Self { api_url, secret_key: Secret::new(secret_key), callback_url }
    }
}
