//! Wallet order integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn wallet_order() -> Value {
    json!({
        "user_id": "user-123",
        "items": [{ "name": "Arroz", "qty": 2 }],
        "shipping_address": { "city": "La Habana" },
        "subtotal": 20.0,
        "shipping_cost": 5.0,
        "total": 25.0,
        "cart_items": [
            { "id": "ci-1", "product_id": "p-1", "product_name": "Arroz 5lb", "product_price": 10.0, "quantity": 2 },
            { "id": "ci-2", "name": "Aceite", "price": 5.0, "weight_lb": 2.0 }
        ]
    })
}

#[tokio::test]
async fn wallet_order_writes_order_items_and_activity() {
    let harness = TestHarness::with_providers().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/orders"))
        .and(header("apikey", "service_role_test"))
        .and(body_partial_json(json!({
            "user_id": "user-123",
            "shipping_method": "express",
            "payment_method": "wallet",
            "payment_status": "completed",
            "order_status": "payment_confirmed",
            "total": 25.0
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": "order-uuid-1" }])))
        .expect(1)
        .mount(harness.supabase())
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/order_items"))
        .and(body_partial_json(json!([
            { "order_id": "order-uuid-1", "name": "Arroz 5lb", "quantity": 2, "total_price": 20.0, "total_weight_lb": 1.0 },
            { "order_id": "order-uuid-1", "name": "Aceite", "quantity": 1, "unit_weight_lb": 2.0 }
        ])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": 1 }, { "id": 2 }])))
        .expect(1)
        .mount(harness.supabase())
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/activities"))
        .and(body_partial_json(json!({ "type": "order_created", "amount": 25.0 })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": 9 }])))
        .expect(1)
        .mount(harness.supabase())
        .await;

    let response = harness
        .server
        .post("/api/orders/from-wallet")
        .json(&wallet_order())
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["order_id"], "order-uuid-1");
    let order_number = body["order_number"].as_str().unwrap();
    assert!(order_number.starts_with("ORD-"));
    assert_eq!(order_number.len(), "ORD-20261016-120000-abcdef12".len());
}

#[tokio::test]
async fn activity_failure_does_not_fail_order() {
    let harness = TestHarness::with_providers().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": 77 }])))
        .mount(harness.supabase())
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/order_items"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(harness.supabase())
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/activities"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "PGRST204",
            "message": "Could not find the 'amount' column"
        })))
        .mount(harness.supabase())
        .await;

    let response = harness
        .server
        .post("/api/orders/from-wallet")
        .json(&wallet_order())
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["order_id"], "77");
}

#[tokio::test]
async fn rejected_order_insert_is_reported() {
    let harness = TestHarness::with_providers().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/orders"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint"
        })))
        .mount(harness.supabase())
        .await;

    let response = harness
        .server
        .post("/api/orders/from-wallet")
        .json(&wallet_order())
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "provider_error");

    let requests = harness.supabase().received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() == "/rest/v1/orders"));
}

#[tokio::test]
async fn rejected_items_remove_the_order_row() {
    let harness = TestHarness::with_providers().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{ "id": "order-uuid-2" }])))
        .expect(1)
        .mount(harness.supabase())
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/order_items"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "23502",
            "message": "null value in column \"name\" violates not-null constraint"
        })))
        .expect(1)
        .mount(harness.supabase())
        .await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/orders"))
        .and(query_param("id", "eq.order-uuid-2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(harness.supabase())
        .await;

    let response = harness
        .server
        .post("/api/orders/from-wallet")
        .json(&wallet_order())
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "provider_error");

    let requests = harness.supabase().received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() != "/rest/v1/activities"));
    assert_eq!(requests.last().unwrap().method.as_str(), "DELETE");
}

#[tokio::test]
async fn malformed_wallet_order_is_a_bad_request() {
    let harness = TestHarness::with_providers().await;

    let response = harness
        .server
        .post("/api/orders/from-wallet")
        .content_type("application/json")
        .bytes("{\"user_id\": ".into())
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "bad_request");
    assert!(harness.supabase().received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn wallet_order_without_supabase_is_unavailable() {
    let harness = TestHarness::new();

    harness
        .server
        .post("/api/orders/from-wallet")
        .json(&wallet_order())
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
