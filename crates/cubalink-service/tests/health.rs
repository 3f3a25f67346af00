//! Health endpoint integration tests.

mod common;

use common::TestHarness;

#[tokio::test]
async fn health_check_returns_ok() {
    let harness = TestHarness::new();

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
}

#[tokio::test]
async fn health_reports_unconfigured_providers() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["duffel_configured"], false);
    assert_eq!(body["square_configured"], false);
    assert_eq!(body["supabase_configured"], false);
}

#[tokio::test]
async fn health_reports_configured_providers() {
    let harness = TestHarness::with_providers().await;

    let body: serde_json::Value = harness.server.get("/api/health").await.json();
    assert_eq!(body["duffel_configured"], true);
    assert_eq!(body["square_configured"], true);
    assert_eq!(body["supabase_configured"], true);
}

#[tokio::test]
async fn banner_lists_endpoints() {
    let harness = TestHarness::new();

    let response = harness.server.get("/").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "online");
    let endpoints = body["endpoints"].as_array().unwrap();
    assert!(endpoints.iter().any(|e| e == "/admin/api/flights/search"));
}
