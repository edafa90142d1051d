//! Webhook endpoint tests: the signature gate and the always-acknowledge policy.

use actix_web::{dev::ServiceResponse, test, web, App, HttpResponse, ResponseError};
use paygo_wallet_engine::{
    events::EventProducers,
    traits::{SettlementOutcome, WalletLedgerError},
    FundingFlowApi,
};
use pwg_common::{Kobo, Secret};

use super::mocks::{MockBackend, MockGateway};
use crate::{
    data_objects::JsonResponse,
    helpers::calculate_signature,
    middleware::{HmacMiddlewareFactory, PAYSTACK_SIGNATURE_HEADER},
    routes::PaystackWebhookRoute,
};

const SECRET: &str = "sk_test_webhook_secret";

fn charge_body(reference: &str, amount: i64, user_id: i64) -> String {
    format!(
        r#"{{"event":"charge.success","data":{{"reference":"{reference}","amount":{amount},"metadata":{{"userId":{user_id},"amount":{amount}}}}}}}"#
    )
}

async fn post_webhook(db: MockBackend, body: String, signature: Option<String>) -> ServiceResponse {
    let api = FundingFlowApi::new(db, MockGateway::new(), EventProducers::default());
    let app = test::init_service(
        App::new().app_data(web::Data::new(api)).service(
            web::scope("/wallet/webhook")
                .wrap(HmacMiddlewareFactory::new(
                    PAYSTACK_SIGNATURE_HEADER,
                    Secret::new(SECRET.to_string()),
                    true,
                ))
                .service(PaystackWebhookRoute::<MockBackend, MockGateway>::new()),
        ),
    )
    .await;
    let mut req = test::TestRequest::post()
        .uri("/wallet/webhook/paystack")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(body);
    if let Some(sig) = signature {
        req = req.insert_header((PAYSTACK_SIGNATURE_HEADER, sig));
    }
    // The signature middleware rejects by returning an `Error` (which a live actix dispatcher renders into the
    // response). `test::call_service` panics on any returned error instead of rendering it, so drive the service
    // with `try_call_service` and render the error the same way the server would.
    match test::try_call_service(&app, req.to_request()).await {
        Ok(res) => res.map_into_boxed_body(),
        Err(err) => {
            let http_req = test::TestRequest::default().to_http_request();
            let response: HttpResponse = err.error_response();
            ServiceResponse::new(http_req, response)
        }
    }
}

#[actix_web::test]
async fn webhook_with_invalid_signature_is_rejected_without_state_change() {
    // No expectations are set: any ledger call would panic the test.
    let db = MockBackend::new();
    let body = charge_body("PAYGO_1_1700000000000_42", 500_000, 1);
    let response = post_webhook(db, body, Some("0b".repeat(64))).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn webhook_without_signature_is_rejected() {
    let db = MockBackend::new();
    let body = charge_body("PAYGO_1_1700000000000_42", 500_000, 1);
    let response = post_webhook(db, body, None).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn webhook_with_valid_signature_settles_the_charge() {
    let mut db = MockBackend::new();
    db.expect_settle_funding()
        .withf(|reference, user_id, amount, _note| {
            reference == "PAYGO_1_1700000000000_42" && *user_id == 1 && *amount == Kobo::from(500_000)
        })
        .times(1)
        .returning(|_, _, _, _| Ok(SettlementOutcome::Credited { new_balance: Kobo::from(500_000) }));
    let body = charge_body("PAYGO_1_1700000000000_42", 500_000, 1);
    let signature = calculate_signature(SECRET, body.as_bytes());
    let response = post_webhook(db, body, Some(signature)).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::OK);
    let reply: JsonResponse = test::read_body_json(response).await;
    assert!(reply.success);
}

#[actix_web::test]
async fn webhook_acknowledges_internal_errors() {
    let mut db = MockBackend::new();
    db.expect_settle_funding()
        .times(1)
        .returning(|_, _, _, _| Err(WalletLedgerError::DatabaseError("disk I/O error".to_string())));
    let body = charge_body("PAYGO_1_1700000000000_42", 500_000, 1);
    let signature = calculate_signature(SECRET, body.as_bytes());
    let response = post_webhook(db, body, Some(signature)).await;
    // Upstream must never see a retryable failure.
    assert_eq!(response.status(), actix_web::http::StatusCode::OK);
    let reply: JsonResponse = test::read_body_json(response).await;
    assert!(!reply.success);
}

#[actix_web::test]
async fn webhook_ignores_non_charge_events() {
    let db = MockBackend::new();
    let body = r#"{"event":"transfer.success","data":{}}"#.to_string();
    let signature = calculate_signature(SECRET, body.as_bytes());
    let response = post_webhook(db, body, Some(signature)).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::OK);
}

#[actix_web::test]
async fn webhook_acknowledges_charges_without_owner_metadata() {
    let db = MockBackend::new();
    let body = r#"{"event":"charge.success","data":{"reference":"PAYGO_X","amount":1000}}"#.to_string();
    let signature = calculate_signature(SECRET, body.as_bytes());
    let response = post_webhook(db, body, Some(signature)).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::OK);
}
