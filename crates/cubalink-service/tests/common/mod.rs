//! Common test utilities for cubalink integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use axum::Router;
use axum_test::TestServer;
use wiremock::MockServer;

use cubalink_service::{create_router, AppState, ServiceConfig, SquareEnvironment};

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Stand-in for the Duffel API.
    pub duffel: Option<MockServer>,
    /// Stand-in for the Square API.
    pub square: Option<MockServer>,
    /// Stand-in for the Supabase REST API.
    pub supabase: Option<MockServer>,
}

impl TestHarness {
    /// Create a harness with no providers configured.
    pub fn new() -> Self {
        Self::build(base_config(), None, None, None)
    }

    /// Create a harness with every provider pointed at a mock server.
    pub async fn with_providers() -> Self {
        let duffel = MockServer::start().await;
        let square = MockServer::start().await;
        let supabase = MockServer::start().await;

        let config = ServiceConfig {
            duffel_api_key: Some("duffel_test".into()),
            duffel_api_url: duffel.uri(),
            square_access_token: Some("sq_test".into()),
            square_location_id: Some("LOC_TEST".into()),
            square_api_url: Some(square.uri()),
            supabase_url: Some(supabase.uri()),
            supabase_service_role_key: Some("service_role_test".into()),
            ..base_config()
        };

        Self::build(config, Some(duffel), Some(square), Some(supabase))
    }

    fn build(
        config: ServiceConfig,
        duffel: Option<MockServer>,
        square: Option<MockServer>,
        supabase: Option<MockServer>,
    ) -> Self {
        let state = AppState::new(config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            duffel,
            square,
            supabase,
        }
    }

    /// Duffel mock; panics when providers were not configured.
    pub fn duffel(&self) -> &MockServer {
        self.duffel.as_ref().expect("harness built without providers")
    }

    /// Square mock; panics when providers were not configured.
    pub fn square(&self) -> &MockServer {
        self.square.as_ref().expect("harness built without providers")
    }

    /// Supabase mock; panics when providers were not configured.
    pub fn supabase(&self) -> &MockServer {
        self.supabase.as_ref().expect("harness built without providers")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn base_config() -> ServiceConfig {
    ServiceConfig {
        listen_addr: "127.0.0.1:0".into(),
        square_environment: SquareEnvironment::Sandbox,
        ..ServiceConfig::default()
    }
}
