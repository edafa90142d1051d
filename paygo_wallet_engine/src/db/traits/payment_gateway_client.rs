use pwg_common::Kobo;

use super::GatewayClientError;

/// The settlement status string the gateway reports for a captured payment.
const GATEWAY_SUCCESS_STATUS: &str = "success";

/// A funding payment to be initialized with the external gateway.
#[derive(Debug, Clone)]
pub struct NewGatewayPayment {
    pub user_id: i64,
    pub email: String,
    pub amount: Kobo,
    pub reference: String,
}

/// The redirect handle the gateway hands back for a newly initialized payment.
#[derive(Debug, Clone)]
pub struct GatewayRedirect {
    pub authorization_url: String,
    pub reference: String,
}

/// The gateway's answer to a verify call: settlement status, the settled amount, and the wallet owner echoed
/// back from the metadata attached at initialization time.
#[derive(Debug, Clone)]
pub struct GatewaySettlement {
    pub reference: String,
    pub status: String,
    pub amount: Kobo,
    pub user_id: Option<i64>,
}

impl GatewaySettlement {
    pub fn is_successful(&self) -> bool {
        self.status == GATEWAY_SUCCESS_STATUS
    }
}

/// A successful-charge webhook event, already authenticated and stripped down to the fields the ledger needs.
#[derive(Debug, Clone)]
pub struct WebhookCharge {
    pub reference: String,
    pub amount: Kobo,
    pub user_id: Option<i64>,
}

/// Outbound contract for the external payment gateway.
///
/// The engine treats the gateway as an opaque remote service; the concrete HTTP client lives in the server
/// crate's integration layer. Calls are synchronous from the caller's perspective and block the request, but
/// they never run inside a database transaction.
#[allow(async_fn_in_trait)]
pub trait PaymentGatewayClient {
    /// Asks the gateway to start a payment, returning the redirect (authorization) URL for the customer.
    async fn initialize_payment(&self, payment: NewGatewayPayment) -> Result<GatewayRedirect, GatewayClientError>;

    /// Asks the gateway whether the given reference has settled.
    async fn verify_payment(&self, reference: &str) -> Result<GatewaySettlement, GatewayClientError>;
}
