use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::PaystackConfig,
    data_objects::{Authorization, InitializeBody, PaystackEnvelope, VerifiedPayment},
    PaystackApiError,
};

#[derive(Clone)]
pub struct PaystackApi {
    config: PaystackConfig,
    client: Arc<Client>,
}

impl PaystackApi {
    pub fn new(config: PaystackConfig) -> Result<Self, PaystackApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.secret_key.reveal());
        let val =
            HeaderValue::from_str(bearer.as_str()).map_err(|e| PaystackApiError::Initialization(e.to_string()))?;
        headers.insert("Authorization", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| PaystackApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Sends a request to Paystack and unwraps the standard `{status, message, data}` envelope.
    async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, PaystackApiError> {
        let url = self.url(path);
        trace!("🅿️ Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| PaystackApiError::RequestError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| PaystackApiError::RequestError(e.to_string()))?;
            return Err(PaystackApiError::QueryError { status, message });
        }
        trace!("🅿️ REST query successful");
        let envelope =
            response.json::<PaystackEnvelope<T>>().await.map_err(|e| PaystackApiError::JsonError(e.to_string()))?;
        if !envelope.status {
            return Err(PaystackApiError::EnvelopeError(envelope.message));
        }
        envelope.data.ok_or(PaystackApiError::EmptyResponse)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    /// Starts a new card payment. Returns the redirect handle the customer must be sent to.
    pub async fn initialize_transaction(&self, body: InitializeBody) -> Result<Authorization, PaystackApiError> {
        debug!("🅿️ Initializing payment [{}] for {}", body.reference, body.email);
        let auth = self.rest_query::<Authorization, _>(Method::POST, "/transaction/initialize", Some(body)).await?;
        debug!("🅿️ Payment [{}] initialized", auth.reference);
        Ok(auth)
    }

    /// Asks Paystack for the settlement state of a payment reference.
    pub async fn verify_transaction(&self, reference: &str) -> Result<VerifiedPayment, PaystackApiError> {
        debug!("🅿️ Verifying payment [{reference}]");
        let path = format!("/transaction/verify/{reference}");
        let payment = self.rest_query::<VerifiedPayment, ()>(Method::GET, &path, None).await?;
        debug!("🅿️ Payment [{reference}] reported as '{}'", payment.status);
        Ok(payment)
    }
}
