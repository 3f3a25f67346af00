//! Application state.

use std::sync::Arc;

use tokio::sync::Mutex;

use cubalink_core::NotificationQueue;

use crate::config::ServiceConfig;
use crate::duffel::DuffelClient;
use crate::error::ApiError;
use crate::square::SquareClient;
use crate::supabase::SupabaseClient;

/// Application state shared across handlers.
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,

    /// Duffel client for flights (optional).
    pub duffel: Option<Arc<DuffelClient>>,

    /// Square client for payments (optional).
    pub square: Option<Arc<SquareClient>>,

    /// Supabase client for orders and notifications (optional).
    pub supabase: Option<Arc<SupabaseClient>>,

    /// Notifications waiting to be pulled by the app.
    pub notifications: Mutex<NotificationQueue>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        let duffel = config.duffel_api_key.as_ref().and_then(|key| {
            match DuffelClient::new(&config.duffel_api_url, key) {
                Ok(client) => {
                    tracing::info!(duffel_url = %config.duffel_api_url, "Duffel integration enabled");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to build Duffel client");
                    None
                }
            }
        });

        if duffel.is_none() {
            tracing::warn!("Duffel not configured - flight search will not be available");
        }

        let square = config
            .square_access_token
            .as_ref()
            .zip(config.square_location_id.as_ref())
            .and_then(|(token, location_id)| {
                match SquareClient::new(
                    config.square_base_url(),
                    token,
                    location_id,
                    config.square_redirect_url.clone(),
                ) {
                    Ok(client) => {
                        tracing::info!(
                            environment = config.square_environment.as_str(),
                            "Square integration enabled"
                        );
                        Some(Arc::new(client))
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to build Square client");
                        None
                    }
                }
            });

        if square.is_none() {
            tracing::warn!("Square not configured - payments will not be available");
        }

        let supabase = config
            .supabase_url
            .as_ref()
            .zip(config.supabase_service_role_key.as_ref())
            .and_then(|(url, key)| match SupabaseClient::new(url, key) {
                Ok(client) => {
                    tracing::info!(supabase_url = %url, "Supabase integration enabled");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to build Supabase client");
                    None
                }
            });

        if supabase.is_none() {
            tracing::warn!("Supabase not configured - orders and stored notifications will not be available");
        }

        Self {
            config,
            duffel,
            square,
            supabase,
            notifications: Mutex::new(NotificationQueue::default()),
        }
    }

    /// Check if Duffel is configured.
    #[must_use]
    pub fn has_duffel(&self) -> bool {
        self.duffel.is_some()
    }

    /// Check if Square is configured.
    #[must_use]
    pub fn has_square(&self) -> bool {
        self.square.is_some()
    }

    /// Check if Supabase is configured.
    #[must_use]
    pub fn has_supabase(&self) -> bool {
        self.supabase.is_some()
    }

    /// Duffel client, or `503 not_configured`.
    pub fn duffel(&self) -> Result<&DuffelClient, ApiError> {
        self.duffel.as_deref().ok_or(ApiError::NotConfigured("Duffel"))
    }

    /// Square client, or `503 not_configured`.
    pub fn square(&self) -> Result<&SquareClient, ApiError> {
        self.square.as_deref().ok_or(ApiError::NotConfigured("Square"))
    }

    /// Supabase client, or `503 not_configured`.
    pub fn supabase(&self) -> Result<&SupabaseClient, ApiError> {
        self.supabase
            .as_deref()
            .ok_or(ApiError::NotConfigured("Supabase"))
    }
}
