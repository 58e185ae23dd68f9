use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use chrono::{TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reqwest::Method;
use serde_json::{json, Value};
use wallet_tools::{
    data_objects::{ParkingType, PassRef, Reservation},
    SaveClaims,
    SaveLinkIssuer,
    ServiceAccountKey,
    TicketToSave,
    WalletApi,
    WalletApiError,
    WalletConfig,
    DEFAULT_SAVE_URL,
    SAVE_AUDIENCE,
};
use wps_common::Secret;

use super::mocks::MockTransport;
use crate::{
    config::IssuerOptions,
    routes::{health, index, save_pass},
};

const TEST_PRIVATE_KEY: &str = include_str!("../test_assets/test_rsa.pem");
const TEST_PUBLIC_KEY: &str = include_str!("../test_assets/test_rsa_pub.pem");
const ISSUER_ID: &str = "3388000000022193134";

// Creates test signing credentials. DO NOT re-use this key anywhere.
fn test_credentials() -> ServiceAccountKey {
    ServiceAccountKey {
        client_email: "pass-signer@demo-project.iam.gserviceaccount.com".to_string(),
        private_key: Secret::new(TEST_PRIVATE_KEY.to_string()),
    }
}

fn reservation() -> Reservation {
    Reservation {
        id: "res_81734".to_string(),
        confirmation_number: "CNF-81734".to_string(),
        start_date: Utc.with_ymd_and_hms(2024, 1, 1, 13, 30, 0).unwrap(),
        end_date: Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap(),
        parking_type: ParkingType { name: "Covered Self-Park".to_string() },
        airport_code: "JFK".to_string(),
    }
}

fn decode_claims(token: &str) -> SaveClaims {
    let key = DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY.as_bytes()).unwrap();
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[SAVE_AUDIENCE]);
    validation.set_required_spec_claims::<&str>(&[]);
    validation.validate_exp = false;
    decode::<SaveClaims>(token, &key, &validation).unwrap().claims
}

async fn post_wallet(transport: MockTransport) -> (StatusCode, Value) {
    let config = WalletConfig { base_url: "https://wallet.test/v1".to_string(), ..Default::default() };
    let api = web::Data::new(WalletApi::with_transport(config, transport));
    let signer = web::Data::new(
        SaveLinkIssuer::new(&test_credentials(), vec!["www.example.com".to_string()], DEFAULT_SAVE_URL).unwrap(),
    );
    let options = web::Data::new(IssuerOptions { issuer_id: ISSUER_ID.to_string() });
    let app = App::new()
        .app_data(api)
        .app_data(signer)
        .app_data(options)
        .route("/wallet", web::post().to(save_pass::<MockTransport>));
    let service = test::init_service(app).await;
    let req = TestRequest::post().uri("/wallet").set_json(reservation()).to_request();
    let res = test::call_service(&service, req).await;
    let status = res.status();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}

#[actix_web::test]
async fn save_pass_creates_a_missing_object_and_returns_a_verifiable_token() {
    let _ = env_logger::try_init().ok();
    let mut transport = MockTransport::new();
    transport
        .expect_request()
        .withf(|method, url, _| *method == Method::GET && url.ends_with("/eventTicketObject/3388000000022193134.res_81734"))
        .times(1)
        .returning(|_, url, _| Err(WalletApiError::NotFound(url.to_string())));
    transport
        .expect_request()
        .withf(|method, url, body| {
            let Some(body) = body else { return false };
            *method == Method::POST &&
                url.ends_with("/eventTicketObject") &&
                body["id"] == "3388000000022193134.res_81734" &&
                body["classId"] == "3388000000022193134.JFK" &&
                body["reservationInfo"]["confirmationCode"] == "CNF-81734"
        })
        .times(1)
        .returning(|_, _, _| Ok(json!({})));

    let (status, body) = post_wallet(transport).await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("token missing from response");
    assert_eq!(body["saveUrl"], format!("https://pay.google.com/gp/v/save/{token}"));
    let claims = decode_claims(token);
    assert_eq!(claims.payload.event_ticket_objects, vec![TicketToSave::Reference(PassRef {
        id: "3388000000022193134.res_81734".to_string(),
        class_id: "3388000000022193134.JFK".to_string(),
    })]);
}

#[actix_web::test]
async fn save_pass_replaces_an_existing_object() {
    let _ = env_logger::try_init().ok();
    let mut transport = MockTransport::new();
    transport
        .expect_request()
        .withf(|method, _, _| *method == Method::GET)
        .times(1)
        .returning(|_, _, _| {
            Ok(json!({ "id": "3388000000022193134.res_81734", "classId": "3388000000022193134.JFK", "state": "ACTIVE" }))
        });
    transport
        .expect_request()
        .withf(|method, url, _| *method == Method::PUT && url.ends_with("/eventTicketObject/3388000000022193134.res_81734"))
        .times(1)
        .returning(|_, _, _| Ok(json!({})));

    let (status, body) = post_wallet(transport).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());
}

#[actix_web::test]
async fn save_pass_issues_a_link_even_when_the_pass_store_is_down() {
    let _ = env_logger::try_init().ok();
    let mut transport = MockTransport::new();
    transport
        .expect_request()
        .withf(|method, _, _| *method == Method::GET)
        .times(1)
        .returning(|_, _, _| Err(WalletApiError::QueryError { status: 503, message: "unavailable".to_string() }));

    // The lookup failure is absorbed; the link references the pass optimistically
    let (status, body) = post_wallet(transport).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());
}

#[actix_web::test]
async fn health_check() {
    let app = App::new().service(health);
    let service = test::init_service(app).await;
    let req = TestRequest::get().uri("/health").to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn index_says_hello() {
    let app = App::new().service(index);
    let service = test::init_service(app).await;
    let req = TestRequest::get().uri("/").to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    assert_eq!(body, "Hello World");
}
