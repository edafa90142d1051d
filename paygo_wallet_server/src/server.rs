use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use paygo_wallet_engine::{
    events::{EventHandlers, EventProducers},
    AccountApi,
    FundingFlowApi,
    SqliteDatabase,
    TransferApi,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::paystack::PaystackGateway,
    mailer::mail_hooks,
    middleware::{HmacMiddlewareFactory, PAYSTACK_SIGNATURE_HEADER},
    reaper::start_stale_funding_reaper,
    routes::{
        health,
        FundWalletRoute,
        NotificationsRoute,
        PaystackWebhookRoute,
        TransactionByIdRoute,
        TransactionsRoute,
        TransferRoute,
        VerifyFundingRoute,
        WalletBalanceRoute,
    },
};

const EVENT_BUFFER_SIZE: usize = 128;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, mail_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let _reaper = start_stale_funding_reaper(db.clone(), config.stale_funding_timeout);
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let gateway = PaystackGateway::new(config.paystack.clone())?;
    let webhook_key = config.paystack.secret_key.clone();
    let funding_minimum = config.funding_minimum;
    let srv = HttpServer::new(move || {
        let funding_api = FundingFlowApi::new(db.clone(), gateway.clone(), producers.clone())
            .with_minimum_funding(funding_minimum);
        let transfer_api = TransferApi::new(db.clone(), producers.clone());
        let accounts_api = AccountApi::new(db.clone());
        // The webhook scope is registered before the general wallet scope so that its requests pass through the
        // signature check; everything else on /wallet carries the upstream-authenticated user header.
        let webhook_scope = web::scope("/wallet/webhook")
            .wrap(HmacMiddlewareFactory::new(PAYSTACK_SIGNATURE_HEADER, webhook_key.clone(), true))
            .service(PaystackWebhookRoute::<SqliteDatabase, PaystackGateway>::new());
        let wallet_scope = web::scope("/wallet")
            .service(FundWalletRoute::<SqliteDatabase, PaystackGateway>::new())
            .service(VerifyFundingRoute::<SqliteDatabase, PaystackGateway>::new())
            .service(TransferRoute::<SqliteDatabase>::new())
            .service(WalletBalanceRoute::<SqliteDatabase>::new())
            .service(TransactionsRoute::<SqliteDatabase>::new())
            .service(TransactionByIdRoute::<SqliteDatabase>::new())
            .service(NotificationsRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("pwg::access_log"))
            .app_data(web::Data::new(funding_api))
            .app_data(web::Data::new(transfer_api))
            .app_data(web::Data::new(accounts_api))
            .service(health)
            .service(webhook_scope)
            .service(wallet_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
