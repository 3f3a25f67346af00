//! Payment integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

// ============================================================================
// Process
// ============================================================================

#[tokio::test]
async fn process_creates_payment_link() {
    let harness = TestHarness::with_providers().await;
    Mock::given(method("POST"))
        .and(path("/v2/online-checkout/payment-links"))
        .and(header("Authorization", "Bearer sq_test"))
        .and(body_partial_json(json!({
            "quick_pay": {
                "name": "Recarga Cubacel",
                "price_money": { "amount": 2550, "currency": "USD" },
                "location_id": "LOC_TEST"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "payment_link": {
                "id": "PL_1",
                "url": "https://square.link/u/xyz",
                "long_url": "https://checkout.square.site/merchant/xyz"
            }
        })))
        .expect(1)
        .mount(harness.square())
        .await;

    let response = harness
        .server
        .post("/api/payments/process")
        .json(&json!({ "amount": "25.50", "description": "Recarga Cubacel", "user_id": "u-1" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["payment_link_id"], "PL_1");
    assert_eq!(body["checkout_url"], "https://square.link/u/xyz");
    assert_eq!(body["amount"], 25.5);
    assert_eq!(body["currency"], "USD");
    assert!(body["order_number"].as_str().unwrap().starts_with("ORD-"));
    assert_eq!(body["order_id"].as_str().unwrap().len(), 36);
}

#[tokio::test]
async fn process_names_missing_field() {
    let harness = TestHarness::with_providers().await;

    for (payload, field) in [
        (json!({ "description": "x", "user_id": "u" }), "amount"),
        (json!({ "amount": 5, "user_id": "u" }), "description"),
        (json!({ "amount": 5, "description": "x" }), "user_id"),
    ] {
        let response = harness.server.post("/api/payments/process").json(&payload).await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert!(body["error"]["message"].as_str().unwrap().contains(field));
    }
}

#[tokio::test]
async fn process_rejects_non_positive_amount() {
    let harness = TestHarness::with_providers().await;

    let response = harness
        .server
        .post("/api/payments/process")
        .json(&json!({ "amount": 0, "description": "x", "user_id": "u" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn process_without_square_is_unavailable() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/payments/process")
        .json(&json!({ "amount": 5, "description": "x", "user_id": "u" }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Status and refunds
// ============================================================================

#[tokio::test]
async fn status_reports_payment() {
    let harness = TestHarness::with_providers().await;
    Mock::given(method("GET"))
        .and(path("/v2/payments/PAY_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "payment": {
                "id": "PAY_1",
                "status": "COMPLETED",
                "amount_money": { "amount": 1999, "currency": "USD" },
                "created_at": "2026-10-01T12:00:00Z",
                "updated_at": "2026-10-01T12:00:05Z"
            }
        })))
        .mount(harness.square())
        .await;

    let response = harness.server.get("/api/payments/status/PAY_1").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "COMPLETED");
    assert_eq!(body["amount"], 19.99);
    assert_eq!(body["currency"], "USD");
}

#[tokio::test]
async fn status_of_unknown_payment_is_not_found() {
    let harness = TestHarness::with_providers().await;
    Mock::given(method("GET"))
        .and(path("/v2/payments/nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(harness.square())
        .await;

    harness
        .server
        .get("/api/payments/status/nope")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn encoded_path_in_payment_id_never_reaches_square() {
    let harness = TestHarness::with_providers().await;

    let response = harness
        .server
        .get("/api/payments/status/..%2Flocations")
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "bad_request");
    assert!(harness.square().received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn partial_refund_uses_requested_amount() {
    let harness = TestHarness::with_providers().await;
    Mock::given(method("POST"))
        .and(path("/v2/refunds"))
        .and(body_partial_json(json!({
            "payment_id": "PAY_1",
            "amount_money": { "amount": 500, "currency": "USD" },
            "reason": "Customer request"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "refund": {
                "id": "REF_1",
                "status": "PENDING",
                "amount_money": { "amount": 500, "currency": "USD" }
            }
        })))
        .expect(1)
        .mount(harness.square())
        .await;

    let response = harness
        .server
        .post("/api/payments/refund")
        .json(&json!({ "payment_id": "PAY_1", "amount": 5 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["refund_id"], "REF_1");
    assert_eq!(body["amount"], 5.0);
    assert_eq!(body["reason"], "Customer request");
}

#[tokio::test]
async fn refund_requires_payment_id() {
    let harness = TestHarness::with_providers().await;

    harness
        .server
        .post("/api/payments/refund")
        .json(&json!({ "amount": 5 }))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn full_refund_of_unknown_payment_is_not_found() {
    let harness = TestHarness::with_providers().await;
    Mock::given(method("GET"))
        .and(path("/v2/payments/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(harness.square())
        .await;

    harness
        .server
        .post("/api/payments/refund")
        .json(&json!({ "payment_id": "gone" }))
        .await
        .assert_status_not_found();
}

// ============================================================================
// History and status
// ============================================================================

#[tokio::test]
async fn history_lists_transactions() {
    let harness = TestHarness::with_providers().await;
    Mock::given(method("GET"))
        .and(path("/v2/payments"))
        .and(query_param("location_id", "LOC_TEST"))
        .and(query_param("begin_time", "2026-10-01T00:00:00Z"))
        .and(query_param("end_time", "2026-10-31T23:59:59Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "payments": [
                { "id": "PAY_2", "status": "COMPLETED", "amount_money": { "amount": 1000, "currency": "USD" } },
                { "id": "PAY_1", "status": "FAILED" }
            ]
        })))
        .mount(harness.square())
        .await;

    let response = harness
        .server
        .get("/api/payments/history")
        .add_query_param("start_date", "2026-10-01")
        .add_query_param("end_date", "2026-10-31")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["total_count"], 2);
    assert_eq!(body["transactions"][0]["id"], "PAY_2");
    assert_eq!(body["transactions"][0]["amount"], 10.0);
    assert!(body["transactions"][1]["amount"].is_null());
}

#[tokio::test]
async fn history_rejects_bad_dates() {
    let harness = TestHarness::with_providers().await;

    harness
        .server
        .get("/api/payments/history")
        .add_query_param("start_date", "yesterday")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn methods_are_static() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/payments/methods").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["payment_methods"]
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m["id"] == "card"));
}

#[tokio::test]
async fn square_status_reflects_configuration() {
    let harness = TestHarness::new();
    let body: Value = harness.server.get("/api/payments/square-status").await.json();
    assert_eq!(body["square_available"], false);
    assert_eq!(body["environment"], "sandbox");
    assert!(body["location_id"].is_null());

    let harness = TestHarness::with_providers().await;
    let body: Value = harness.server.get("/api/payments/square-status").await.json();
    assert_eq!(body["square_available"], true);
    assert_eq!(body["location_id"], "LOC_TEST");
}

#[tokio::test]
async fn connection_test_lists_locations() {
    let harness = TestHarness::with_providers().await;
    Mock::given(method("GET"))
        .and(path("/v2/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "locations": [{ "id": "LOC_TEST", "name": "Cubalink", "status": "ACTIVE" }]
        })))
        .mount(harness.square())
        .await;

    let response = harness.server.get("/api/payments/test-connection").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["locations"], 1);
}

#[tokio::test]
async fn connection_test_reports_bad_credentials() {
    let harness = TestHarness::with_providers().await;
    Mock::given(method("GET"))
        .and(path("/v2/locations"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{ "category": "AUTHENTICATION_ERROR", "code": "UNAUTHORIZED", "detail": "Bad token" }]
        })))
        .mount(harness.square())
        .await;

    let response = harness.server.get("/api/payments/test-connection").await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "provider_error");
    assert_eq!(body["error"]["message"], "Bad token");
}
