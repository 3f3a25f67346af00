//! Cubalink Service - HTTP gateway for flights, payments and orders
//!
//! This is the main entry point for the cubalink service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cubalink_service::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,cubalink=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Cubalink Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    let listen_addr = config.listen_addr.clone();

    // Build app state
    let state = AppState::new(config);

    tracing::info!(
        listen_addr = %listen_addr,
        duffel_configured = %state.has_duffel(),
        square_configured = %state.has_square(),
        square_environment = state.config.square_environment.as_str(),
        supabase_configured = %state.has_supabase(),
        "Service configuration loaded"
    );

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
