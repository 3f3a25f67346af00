//! Health check handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

/// Endpoints advertised by the service banner.
const ENDPOINTS: &[&str] = &[
    "/api/health",
    "/admin/api/flights/airports",
    "/admin/api/flights/search",
    "/admin/api/flights/booking",
    "/api/payments/process",
    "/api/orders/from-wallet",
    "/api/push-notifications",
    "/api/supabase-notifications",
    "/api/notifications/next",
];

/// Service banner.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    /// Service name.
    pub service: String,
    /// Always `online`.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Server time.
    pub timestamp: DateTime<Utc>,
    /// Main endpoints.
    pub endpoints: Vec<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
    /// Server time.
    pub timestamp: DateTime<Utc>,
    /// Whether flight search is available.
    pub duffel_configured: bool,
    /// Whether payments are available.
    pub square_configured: bool,
    /// Whether order and notification storage is available.
    pub supabase_configured: bool,
}

/// Root banner.
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        service: "cubalink".to_string(),
        status: "online".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        endpoints: ENDPOINTS.iter().map(ToString::to_string).collect(),
    })
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "cubalink".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        duffel_configured: state.has_duffel(),
        square_configured: state.has_square(),
        supabase_configured: state.has_supabase(),
    })
}
