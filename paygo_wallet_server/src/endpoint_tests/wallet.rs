//! Wallet endpoint tests against mocked backends: funding initialization, transfers and the read side.

use actix_web::{dev::ServiceResponse, test, web, App};
use paygo_wallet_engine::{events::EventProducers, AccountApi, FundingFlowApi, TransferApi};
use serde_json::Value;

use super::mocks::{sample_pending_funding, sample_user, sample_wallet, MockBackend, MockGateway};
use crate::{
    auth::USER_ID_HEADER,
    routes::{FundWalletRoute, TransferRoute, WalletBalanceRoute},
};

async fn call_fund(db: MockBackend, gateway: MockGateway, body: Value, user_id: Option<i64>) -> ServiceResponse {
    let api = FundingFlowApi::new(db, gateway, EventProducers::default());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(api))
            .service(web::scope("/wallet").service(FundWalletRoute::<MockBackend, MockGateway>::new())),
    )
    .await;
    let mut req = test::TestRequest::post().uri("/wallet/fund/paystack").set_json(body);
    if let Some(id) = user_id {
        req = req.insert_header((USER_ID_HEADER, id.to_string()));
    }
    test::call_service(&app, req.to_request()).await
}

#[actix_web::test]
async fn funding_without_identity_is_unauthorized() {
    let response = call_fund(MockBackend::new(), MockGateway::new(), serde_json::json!({"amount": 50_000}), None).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn funding_below_minimum_is_a_bad_request() {
    let response = call_fund(MockBackend::new(), MockGateway::new(), serde_json::json!({"amount": 500}), Some(1)).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn funding_returns_the_pending_handle_instead_of_a_new_payment() {
    let mut db = MockBackend::new();
    db.expect_fetch_user_by_id().returning(|id| Ok(Some(sample_user(id, "amina@example.com", None))));
    db.expect_pending_funding_for_user()
        .times(1)
        .returning(|id| Ok(Some(sample_pending_funding(id, 50_000, "PAYGO_1_1700000000000_42"))));
    // The gateway mock has no expectations: opening a second payment would panic the test.
    let response =
        call_fund(db, MockGateway::new(), serde_json::json!({"amount": 50_000}), Some(1)).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["alreadyPending"], true);
    assert_eq!(body["reference"], "PAYGO_1_1700000000000_42");
    assert!(body["authorizationUrl"].as_str().unwrap().contains("PAYGO_1_1700000000000_42"));
}

#[actix_web::test]
async fn transfer_with_insufficient_balance_is_rejected_before_any_mutation() {
    let mut db = MockBackend::new();
    db.expect_fetch_user_by_id().returning(|id| Ok(Some(sample_user(id, "amina@example.com", Some("1234")))));
    db.expect_fetch_wallet().returning(|id| Ok(Some(sample_wallet(id, 2_000))));
    db.expect_fetch_user_by_email().returning(|_| Ok(Some(sample_user(2, "bola@example.com", None))));
    // transfer_funds has no expectation: reaching the atomic unit would panic the test.
    let api = TransferApi::new(db, EventProducers::default());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(api))
            .service(web::scope("/wallet").service(TransferRoute::<MockBackend>::new())),
    )
    .await;
    let req = test::TestRequest::post()
        .uri("/wallet/transfer")
        .insert_header((USER_ID_HEADER, "1"))
        .set_json(serde_json::json!({"recipientEmail": "bola@example.com", "amount": 3_000, "pin": "1234"}));
    let response = test::call_service(&app, req.to_request()).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Insufficient balance");
}

#[actix_web::test]
async fn balance_of_a_user_without_a_wallet_is_not_found() {
    let mut db = MockBackend::new();
    db.expect_fetch_wallet().returning(|_| Ok(None));
    let api = AccountApi::new(db);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(api))
            .service(web::scope("/wallet").service(WalletBalanceRoute::<MockBackend>::new())),
    )
    .await;
    let req = test::TestRequest::get().uri("/wallet/balance").insert_header((USER_ID_HEADER, "7"));
    let response = test::call_service(&app, req.to_request()).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn balance_is_returned_for_an_existing_wallet() {
    let mut db = MockBackend::new();
    db.expect_fetch_wallet().returning(|id| Ok(Some(sample_wallet(id, 75_000))));
    let api = AccountApi::new(db);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(api))
            .service(web::scope("/wallet").service(WalletBalanceRoute::<MockBackend>::new())),
    )
    .await;
    let req = test::TestRequest::get().uri("/wallet/balance").insert_header((USER_ID_HEADER, "7"));
    let response = test::call_service(&app, req.to_request()).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["balance"], 75_000);
}
