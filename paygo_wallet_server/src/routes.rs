//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Handlers are generic over the backend traits so that endpoint tests can run them against mocks. Actix cannot
//! register generic functions through the attribute macros, so the `route!` macro generates a small
//! `HttpServiceFactory` shim per handler (one `PhantomData` type parameter per trait bound).

use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use paygo_wallet_engine::{
    traits::{AccountQueries, PaymentGatewayClient, WalletBackend},
    wallet_objects::Pagination,
    AccountApi,
    FundingFlowApi,
    SettlementResult,
    TransferApi,
    TransferRequest,
};
use paystack_tools::ChargeEvent;
use serde_json::json;

use crate::{
    auth::AuthenticatedUser,
    data_objects::{FundWalletRequest, JsonResponse},
    errors::ServerError,
    integrations::paystack::charge_from_event,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Funding  ----------------------------------------------------
route!(fund_wallet => Post "/fund/paystack" impl WalletBackend, PaymentGatewayClient);
/// Starts a wallet funding. Returns the gateway redirect handle; if a funding is already pending for the caller,
/// the existing handle comes back flagged `alreadyPending` instead of a new payment being opened.
pub async fn fund_wallet<B, G>(
    user: AuthenticatedUser,
    body: web::Json<FundWalletRequest>,
    api: web::Data<FundingFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: WalletBackend + 'static,
    G: PaymentGatewayClient + 'static,
{
    trace!("💻️ POST fund wallet for user #{}", user.id);
    let initiation = api.initialize_funding(user.id, body.amount).await?;
    Ok(HttpResponse::Ok().json(initiation))
}

route!(verify_funding => Get "/verify/{reference}" impl WalletBackend, PaymentGatewayClient);
/// Client-initiated settlement check. A reference that was already consumed (typically by the webhook racing
/// ahead) is reported as a duplicate, not an error.
pub async fn verify_funding<B, G>(
    path: web::Path<String>,
    api: web::Data<FundingFlowApi<B, G>>,
) -> Result<HttpResponse, ServerError>
where
    B: WalletBackend + 'static,
    G: PaymentGatewayClient + 'static,
{
    let reference = path.into_inner();
    trace!("💻️ GET verify funding [{reference}]");
    let response = match api.verify_funding(&reference).await? {
        SettlementResult::Credited { amount, new_balance } => json!({
            "message": "Wallet funded successfully",
            "amount": amount,
            "newBalance": new_balance,
        }),
        SettlementResult::Duplicate | SettlementResult::Ignored => json!({
            "status": "duplicate",
            "message": "Payment already processed",
        }),
    };
    Ok(HttpResponse::Ok().json(response))
}

route!(paystack_webhook => Post "/paystack" impl WalletBackend, PaymentGatewayClient);
/// Gateway-initiated settlement push. The HMAC middleware has already authenticated the payload.
///
/// Every response from here on is a success-level acknowledgement — even on internal error — so the gateway
/// never enters a retry storm. Failures are logged, and the idempotent settlement makes redelivery safe anyway.
pub async fn paystack_webhook<B, G>(body: web::Bytes, api: web::Data<FundingFlowApi<B, G>>) -> HttpResponse
where
    B: WalletBackend + 'static,
    G: PaymentGatewayClient + 'static,
{
    trace!("💻️ Received gateway webhook");
    let event = match serde_json::from_slice::<ChargeEvent>(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!("💻️ Could not parse webhook payload. {e}");
            return HttpResponse::Ok().json(JsonResponse::failure("Could not parse webhook payload"));
        },
    };
    if !event.is_successful_charge() {
        debug!("💻️ Ignoring webhook event '{}'", event.event);
        return HttpResponse::Ok().json(JsonResponse::success("Event ignored"));
    }
    let charge = charge_from_event(event.data);
    match api.process_webhook_charge(charge).await {
        Ok(result) => {
            debug!("💻️ Webhook charge processed: {result:?}");
            HttpResponse::Ok().json(JsonResponse::success("Charge processed"))
        },
        Err(e) => {
            error!("💻️ Error processing webhook charge. {e}");
            HttpResponse::Ok().json(JsonResponse::failure("Charge could not be processed"))
        },
    }
}

//----------------------------------------------   Transfer  ----------------------------------------------------
route!(transfer => Post "/transfer" impl WalletBackend);
pub async fn transfer<B>(
    user: AuthenticatedUser,
    body: web::Json<TransferRequest>,
    api: web::Data<TransferApi<B>>,
) -> Result<HttpResponse, ServerError>
where B: WalletBackend + 'static {
    trace!("💻️ POST transfer from user #{}", user.id);
    let receipt = api.transfer(user.id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Transfer successful",
        "newBalance": receipt.new_balance,
        "transaction": receipt,
    })))
}

//----------------------------------------------   Read side  ---------------------------------------------------
route!(wallet_balance => Get "/balance" impl AccountQueries);
pub async fn wallet_balance<B>(
    user: AuthenticatedUser,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError>
where B: AccountQueries + 'static {
    let balance = api
        .balance(user.id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound("Wallet not found".to_string()))?;
    Ok(HttpResponse::Ok().json(json!({ "balance": balance })))
}

route!(transactions => Get "/transactions" impl AccountQueries);
pub async fn transactions<B>(
    user: AuthenticatedUser,
    query: web::Query<Pagination>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError>
where B: AccountQueries + 'static {
    let history = api.history(user.id, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(history))
}

route!(transaction_by_id => Get "/transactions/{id}" impl AccountQueries);
pub async fn transaction_by_id<B>(
    user: AuthenticatedUser,
    path: web::Path<i64>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError>
where B: AccountQueries + 'static {
    let id = path.into_inner();
    let transaction = api
        .transaction(user.id, id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound("Transaction not found".to_string()))?;
    Ok(HttpResponse::Ok().json(json!({ "transaction": transaction })))
}

route!(notifications => Get "/notifications" impl AccountQueries);
pub async fn notifications<B>(
    user: AuthenticatedUser,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError>
where B: AccountQueries + 'static {
    let notifications = api.notifications(user.id).await?;
    Ok(HttpResponse::Ok().json(json!({ "notifications": notifications })))
}
