//! Test utilities and fixtures for pixrelay integration tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use serde_json::{Value, json};

pub use pixrelay::config::Config;
pub use pixrelay::state::AppState;

pub const LIRAPAY_TEST_SECRET: &str = "lira_whsec_test123";
pub const VOLTPAG_TEST_SECRET: &str = "volt_tok_test456";
pub const UTMIFY_TEST_KEY: &str = "utmify_key_test789";

/// Config pointing at a stand-in attribution endpoint, with both gateway
/// secrets and the API key provisioned. Built as a literal rather than from
/// the environment so parallel tests can't race on env vars.
pub fn test_config(attribution_url: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        lirapay_webhook_secret: Some(LIRAPAY_TEST_SECRET.to_string()),
        voltpag_webhook_secret: Some(VOLTPAG_TEST_SECRET.to_string()),
        utmify_api_url: attribution_url.to_string(),
        utmify_api_key: Some(UTMIFY_TEST_KEY.to_string()),
        alert_webhook_url: None,
        test_mode: false,
    }
}

/// Build the full relay router around the given config.
pub fn relay_app(config: Config) -> Router {
    Router::new()
        .merge(pixrelay::handlers::webhooks::router())
        .merge(pixrelay::handlers::ops::router())
        .with_state(AppState::new(config))
}

/// A complete LiraPay webhook body with the given status.
pub fn lirapay_payload(status: &str) -> Value {
    json!({
        "event": "transaction.processed",
        "data": {
            "id": "tx1",
            "status": status,
            "buyer": {
                "name": "Ana",
                "email": "a@x.com",
                "phone": "5511999998888",
                "document": "111.222.333-44",
                "ip": "1.2.3.4"
            },
            "items": [{"id": "p1", "name": "Pack", "quantity": 1, "amount": 1999}],
            "total_amount": 1999,
            "created_at": "2024-01-01T00:00:00Z",
            "paid_at": "2024-01-01T00:05:00Z",
            "tracking": {"utm_source": "fb"}
        }
    })
}

/// A complete VoltPag webhook body with the given status.
pub fn voltpag_payload(status: &str) -> Value {
    json!({
        "transactionId": "vp-1",
        "status": status,
        "customer": {
            "fullName": "Ana",
            "email": "a@x.com",
            "phoneNumber": "5511999998888",
            "cpf": "11122233344",
            "ipAddress": "1.2.3.4"
        },
        "items": [{"code": "p1", "title": "Pack", "quantity": 1, "unitPriceInCents": 1999}],
        "totalInCents": 1999,
        "createdAt": "2024-01-01T00:00:00Z",
        "approvedAt": "2024-01-01T00:05:00Z",
        "utm": {"utmSource": "fb"}
    })
}

/// Build a webhook POST carrying one credential header.
pub fn webhook_request(path: &str, header: &str, credential: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .header(header, credential)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a webhook POST with no credential header at all.
pub fn anonymous_webhook_request(path: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a JSON response body.
pub async fn response_json(response: axum::http::Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).expect("Response should be valid JSON")
}
