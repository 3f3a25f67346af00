//! Service configuration.
//!
//! Provider credentials come from `.secrets/<provider>.json` when such a file is
//! found, otherwise from environment variables. Nothing is compiled in.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::square::SquareEnvironment;

/// Default Duffel API base URL.
pub const DEFAULT_DUFFEL_API_URL: &str = "https://api.duffel.com";

/// Default port when neither `LISTEN_ADDR` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 10000;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: `0.0.0.0:$PORT`).
    pub listen_addr: String,

    /// Duffel access token (optional).
    pub duffel_api_key: Option<String>,

    /// Duffel API base URL.
    pub duffel_api_url: String,

    /// Square access token (optional).
    pub square_access_token: Option<String>,

    /// Square location that owns created payment links (optional).
    pub square_location_id: Option<String>,

    /// Square environment (sandbox or production).
    pub square_environment: SquareEnvironment,

    /// Square API base URL override; derived from the environment when unset.
    pub square_api_url: Option<String>,

    /// Where Square redirects the buyer after checkout (optional).
    pub square_redirect_url: Option<String>,

    /// Supabase project URL (optional).
    pub supabase_url: Option<String>,

    /// Supabase service role key (optional, bypasses row-level security).
    pub supabase_service_role_key: Option<String>,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Duffel secrets file structure.
#[derive(Debug, Deserialize)]
struct DuffelSecrets {
    api_key: String,
    #[serde(default)]
    api_url: Option<String>,
}

/// Square secrets file structure.
#[derive(Debug, Deserialize)]
struct SquareSecrets {
    access_token: String,
    location_id: String,
    #[serde(default)]
    environment: Option<String>,
}

/// Supabase secrets file structure.
#[derive(Debug, Deserialize)]
struct SupabaseSecrets {
    url: String,
    service_role_key: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        let (duffel_api_key, duffel_api_url) = load_duffel_secrets();
        let (square_access_token, square_location_id, square_environment) =
            load_square_secrets();
        let (supabase_url, supabase_service_role_key) = load_supabase_secrets();

        let listen_addr = env_opt("LISTEN_ADDR").unwrap_or_else(|| {
            let port = env_opt("PORT")
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT);
            format!("0.0.0.0:{port}")
        });

        Self {
            listen_addr,
            duffel_api_key,
            duffel_api_url,
            square_access_token,
            square_location_id,
            square_environment,
            square_api_url: env_opt("SQUARE_API_URL"),
            square_redirect_url: env_opt("SQUARE_REDIRECT_URL"),
            supabase_url,
            supabase_service_role_key,
            cors_origins: parse_origins(&env_opt("CORS_ORIGINS").unwrap_or_else(|| "*".into())),
            max_body_bytes: env_opt("MAX_BODY_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: env_opt("REQUEST_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Square base URL, honouring the explicit override.
    #[must_use]
    pub fn square_base_url(&self) -> String {
        self.square_api_url
            .clone()
            .unwrap_or_else(|| self.square_environment.base_url().to_string())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            duffel_api_key: None,
            duffel_api_url: DEFAULT_DUFFEL_API_URL.into(),
            square_access_token: None,
            square_location_id: None,
            square_environment: SquareEnvironment::Sandbox,
            square_api_url: None,
            square_redirect_url: None,
            supabase_url: None,
            supabase_service_role_key: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}

/// Read a non-empty environment variable.
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Candidate locations for `<name>.json`.
fn secret_paths(name: &str) -> Vec<PathBuf> {
    [".secrets", "cubalink/.secrets", "../.secrets"]
        .iter()
        .map(|dir| Path::new(dir).join(format!("{name}.json")))
        .collect()
}

/// Load Duffel secrets from file or environment.
fn load_duffel_secrets() -> (Option<String>, String) {
    if let Some(secrets) = load_first_secrets::<DuffelSecrets>(&secret_paths("duffel")) {
        return (
            Some(secrets.api_key),
            secrets
                .api_url
                .unwrap_or_else(|| DEFAULT_DUFFEL_API_URL.into()),
        );
    }

    tracing::debug!("Duffel secrets file not found, using environment variables");
    (
        env_opt("DUFFEL_API_KEY").or_else(|| env_opt("DUFFEL_API_TOKEN")),
        env_opt("DUFFEL_API_URL").unwrap_or_else(|| DEFAULT_DUFFEL_API_URL.into()),
    )
}

/// Load Square secrets from file or environment.
fn load_square_secrets() -> (Option<String>, Option<String>, SquareEnvironment) {
    if let Some(secrets) = load_first_secrets::<SquareSecrets>(&secret_paths("square")) {
        return (
            Some(secrets.access_token),
            Some(secrets.location_id),
            SquareEnvironment::parse(secrets.environment.as_deref()),
        );
    }

    tracing::debug!("Square secrets file not found, using environment variables");
    (
        env_opt("SQUARE_ACCESS_TOKEN"),
        env_opt("SQUARE_LOCATION_ID"),
        SquareEnvironment::parse(env_opt("SQUARE_ENVIRONMENT").as_deref()),
    )
}

/// Load Supabase secrets from file or environment.
fn load_supabase_secrets() -> (Option<String>, Option<String>) {
    if let Some(secrets) = load_first_secrets::<SupabaseSecrets>(&secret_paths("supabase")) {
        return (Some(secrets.url), Some(secrets.service_role_key));
    }

    tracing::debug!("Supabase secrets file not found, using environment variables");
    (
        env_opt("SUPABASE_URL"),
        env_opt("SUPABASE_SERVICE_ROLE_KEY"),
    )
}

/// Return the first secrets file in `paths` that exists and parses.
fn load_first_secrets<T: serde::de::DeserializeOwned>(paths: &[PathBuf]) -> Option<T> {
    for path in paths {
        match load_secrets_file::<T>(path) {
            Ok(secrets) => {
                tracing::info!(path = %path.display(), "Loaded secrets from file");
                return Some(secrets);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable secrets file");
            }
        }
    }
    None
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, std::io::Error> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}
