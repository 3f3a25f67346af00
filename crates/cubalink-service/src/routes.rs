//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{flights, health, notifications, orders, payments};
use crate::state::AppState;

/// In-flight requests allowed per route group; each one may hold a provider call.
const MAX_CONCURRENT_REQUESTS: usize = 64;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /` - Service banner
/// - `GET /health`, `GET /api/health` - Health check
///
/// ## Flights (Duffel)
/// - `GET /admin/api/flights/airports?query=` - Airport lookup
/// - `POST /admin/api/flights/search` - Offer search
/// - `POST /admin/api/flights/booking` - Book an offer
///
/// ## Payments (Square)
/// - `POST /api/payments/process` - Create a payment link
/// - `GET /api/payments/status/:payment_id` - Payment status
/// - `POST /api/payments/refund` - Refund a payment
/// - `GET /api/payments/history` - Recent payments
/// - `GET /api/payments/methods` - Supported methods
/// - `GET /api/payments/square-status` - Square configuration
/// - `GET /api/payments/test-connection` - Credential check
///
/// ## Orders (Supabase)
/// - `POST /api/orders/from-wallet` - Store a wallet-paid order
///
/// ## Notifications
/// - `POST /api/push-notifications` - Send and record a push notification
/// - `GET /api/push-notifications` - Latest push notifications
/// - `DELETE /api/push-notifications/:id` - Delete a push notification
/// - `POST /api/supabase-notifications` - Queue a notification for the app
/// - `GET /api/notifications/next` - Pop the oldest queued notification
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let admin_api = Router::new()
        .route("/flights/airports", get(flights::airports))
        .route("/flights/search", post(flights::search))
        .route("/flights/booking", post(flights::book))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS));

    let api = Router::new()
        .route("/health", get(health::health))
        // Payments
        .route("/payments/process", post(payments::process_payment))
        .route("/payments/status/:payment_id", get(payments::payment_status))
        .route("/payments/refund", post(payments::refund))
        .route("/payments/history", get(payments::history))
        .route("/payments/methods", get(payments::methods))
        .route("/payments/square-status", get(payments::square_status))
        .route("/payments/test-connection", get(payments::test_connection))
        // Orders
        .route("/orders/from-wallet", post(orders::create_from_wallet))
        // Notifications
        .route(
            "/push-notifications",
            post(notifications::send_push).get(notifications::list_push),
        )
        .route("/push-notifications/:id", delete(notifications::delete_push))
        .route("/supabase-notifications", post(notifications::enqueue))
        .route("/notifications/next", get(notifications::next))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS));

    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health))
        .nest("/admin/api", admin_api)
        .nest("/api", api)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}
