//! Adapts the Paystack REST client onto the engine's [`PaymentGatewayClient`] contract, and converts webhook
//! wire payloads into the engine's charge type.

use log::debug;
use paygo_wallet_engine::traits::{
    GatewayClientError,
    GatewayRedirect,
    GatewaySettlement,
    NewGatewayPayment,
    PaymentGatewayClient,
    WebhookCharge,
};
use paystack_tools::{
    data_objects::{ChargeEventData, FundingMetadata, InitializeBody},
    PaystackApi,
    PaystackApiError,
    PaystackConfig,
};

use crate::errors::ServerError;

#[derive(Clone)]
pub struct PaystackGateway {
    api: PaystackApi,
    callback_url: String,
}

impl PaystackGateway {
    pub fn new(config: PaystackConfig) -> Result<Self, ServerError> {
        let callback_url = config.callback_url.clone();
        let api = PaystackApi::new(config).map_err(|e| ServerError::InitializeError(e.to_string()))?;
        Ok(Self { api, callback_url })
    }
}

impl PaymentGatewayClient for PaystackGateway {
    async fn initialize_payment(&self, payment: NewGatewayPayment) -> Result<GatewayRedirect, GatewayClientError> {
        let body = InitializeBody {
            email: payment.email,
            amount: payment.amount,
            reference: payment.reference,
            callback_url: self.callback_url.clone(),
            metadata: FundingMetadata { user_id: payment.user_id, amount: payment.amount },
        };
        let auth = self.api.initialize_transaction(body).await.map_err(map_api_error)?;
        Ok(GatewayRedirect { authorization_url: auth.authorization_url, reference: auth.reference })
    }

    async fn verify_payment(&self, reference: &str) -> Result<GatewaySettlement, GatewayClientError> {
        let payment = self.api.verify_transaction(reference).await.map_err(map_api_error)?;
        debug!("🅿️ Verify [{reference}] -> '{}' for {}", payment.status, payment.amount);
        Ok(GatewaySettlement {
            reference: payment.reference,
            status: payment.status,
            amount: payment.amount,
            user_id: payment.metadata.map(|m| m.user_id),
        })
    }
}

fn map_api_error(e: PaystackApiError) -> GatewayClientError {
    match e {
        PaystackApiError::Initialization(m) | PaystackApiError::RequestError(m) => GatewayClientError::Unreachable(m),
        PaystackApiError::QueryError { status, message } => {
            GatewayClientError::Rejected(format!("HTTP {status}: {message}"))
        },
        PaystackApiError::EnvelopeError(m) => GatewayClientError::Rejected(m),
        PaystackApiError::JsonError(m) => GatewayClientError::InvalidResponse(m),
        PaystackApiError::EmptyResponse => GatewayClientError::InvalidResponse("empty data section".to_string()),
    }
}

/// Strips a verified charge event down to what the ledger needs.
pub fn charge_from_event(data: ChargeEventData) -> WebhookCharge {
    WebhookCharge { reference: data.reference, amount: data.amount, user_id: data.metadata.map(|m| m.user_id) }
}
