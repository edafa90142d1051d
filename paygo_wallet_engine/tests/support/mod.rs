pub mod prepare_env;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use log::*;
use paygo_wallet_engine::{
    db_types::{NewUser, User},
    helpers::hash_pin,
    traits::{
        GatewayClientError,
        GatewayRedirect,
        GatewaySettlement,
        NewGatewayPayment,
        PaymentGatewayClient,
        WalletLedgerDatabase,
    },
    SqliteDatabase,
};
use pwg_common::Kobo;
use sqlx::migrate::MigrateDatabase;

use prepare_env::{prepare_test_env, random_db_path};

pub async fn setup_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating database")
}

pub async fn tear_down(mut db: SqliteDatabase) {
    let url = db.url().to_string();
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    sqlx::Sqlite::drop_database(&url).await.unwrap();
}

pub async fn seed_user(db: &SqliteDatabase, first: &str, last: &str, email: &str, pin: Option<&str>) -> User {
    let wallet_pin_hash = pin.map(|p| hash_pin(p).expect("Error hashing PIN"));
    let user = NewUser {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        wallet_pin_hash,
    };
    db.create_user(user).await.expect("Error seeding user")
}

/// An in-memory stand-in for the payment gateway. Remembers what was initialized so that verify calls can echo
/// the amount and owner back, the way the real gateway echoes metadata.
#[derive(Clone, Default)]
pub struct StubGateway {
    payments: Arc<Mutex<HashMap<String, (Kobo, i64)>>>,
    pub unreachable: bool,
    pub settlement_status: Option<String>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self { unreachable: true, ..Self::default() }
    }

    pub fn with_settlement_status(status: &str) -> Self {
        Self { settlement_status: Some(status.to_string()), ..Self::default() }
    }
}

impl PaymentGatewayClient for StubGateway {
    async fn initialize_payment(&self, payment: NewGatewayPayment) -> Result<GatewayRedirect, GatewayClientError> {
        if self.unreachable {
            return Err(GatewayClientError::Unreachable("connection refused".to_string()));
        }
        let mut payments = self.payments.lock().unwrap();
        payments.insert(payment.reference.clone(), (payment.amount, payment.user_id));
        Ok(GatewayRedirect {
            authorization_url: format!("https://checkout.paystack.test/{}", payment.reference),
            reference: payment.reference,
        })
    }

    async fn verify_payment(&self, reference: &str) -> Result<GatewaySettlement, GatewayClientError> {
        if self.unreachable {
            return Err(GatewayClientError::Unreachable("connection refused".to_string()));
        }
        let payments = self.payments.lock().unwrap();
        let (amount, user_id) = payments
            .get(reference)
            .copied()
            .ok_or_else(|| GatewayClientError::Rejected(format!("unknown reference {reference}")))?;
        let status = self.settlement_status.clone().unwrap_or_else(|| "success".to_string());
        Ok(GatewaySettlement { reference: reference.to_string(), status, amount, user_id: Some(user_id) })
    }
}
