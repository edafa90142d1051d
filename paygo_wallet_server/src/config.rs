use std::env;

use chrono::Duration;
use log::*;
use paystack_tools::PaystackConfig;
use pwg_common::Kobo;

const DEFAULT_PWG_HOST: &str = "127.0.0.1";
const DEFAULT_PWG_PORT: u16 = 8480;
/// Pending fundings whose redirect handle is older than this are swept to `Failed` by the reaper.
const DEFAULT_STALE_FUNDING_TIMEOUT: Duration = Duration::hours(24);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Fundings below this amount are rejected outright.
    pub funding_minimum: Kobo,
    /// Age after which an unsettled pending funding is marked as failed.
    pub stale_funding_timeout: Duration,
    /// Payment gateway credentials and endpoints.
    pub paystack: PaystackConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PWG_HOST.to_string(),
            port: DEFAULT_PWG_PORT,
            database_url: String::default(),
            funding_minimum: paygo_wallet_engine::DEFAULT_MINIMUM_FUNDING,
            stale_funding_timeout: DEFAULT_STALE_FUNDING_TIMEOUT,
            paystack: PaystackConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("PWG_HOST").ok().unwrap_or_else(|| DEFAULT_PWG_HOST.into());
        let port = env::var("PWG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for PWG_PORT. {e} Using the default, {DEFAULT_PWG_PORT}, instead.");
                    DEFAULT_PWG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_PWG_PORT);
        let database_url = env::var("PWG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ PWG_DATABASE_URL is not set. Please set it to the URL for the wallet database.");
            String::default()
        });
        let funding_minimum = env::var("PWG_FUNDING_MINIMUM")
            .ok()
            .and_then(|s| {
                s.parse::<i64>()
                    .map(Kobo::from)
                    .map_err(|e| warn!("🪛️ Invalid value for PWG_FUNDING_MINIMUM (kobo): {e}"))
                    .ok()
            })
            .unwrap_or(paygo_wallet_engine::DEFAULT_MINIMUM_FUNDING);
        let stale_funding_timeout = env::var("PWG_STALE_FUNDING_TIMEOUT_HOURS")
            .map_err(|_| {
                info!(
                    "🪛️ PWG_STALE_FUNDING_TIMEOUT_HOURS is not set. Using the default value of {} hrs.",
                    DEFAULT_STALE_FUNDING_TIMEOUT.num_hours()
                )
            })
            .and_then(|s| {
                s.parse::<i64>()
                    .map(Duration::hours)
                    .map_err(|e| warn!("🪛️ Invalid configuration value for PWG_STALE_FUNDING_TIMEOUT_HOURS. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_STALE_FUNDING_TIMEOUT);
        let paystack = PaystackConfig::new_from_env_or_default();
        Self { host, port, database_url, funding_minimum, stale_funding_timeout, paystack }
    }
}
