//! Square integration for hosted checkout and payment management.
//!
//! Square handles:
//! - Payment links (hosted checkout pages)
//! - Payment lookup and history
//! - Refunds

pub mod client;
pub mod types;

use serde::Serialize;

pub use client::{SquareClient, SquareError};
pub use types::*;

/// Square environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SquareEnvironment {
    /// Test environment.
    #[default]
    Sandbox,
    /// Live environment.
    Production,
}

impl SquareEnvironment {
    /// Parse a configured value; anything but `production` is sandbox.
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "production" => Self::Production,
            _ => Self::Sandbox,
        }
    }

    /// API base URL for this environment.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox => "https://connect.squareupsandbox.com",
            Self::Production => "https://connect.squareup.com",
        }
    }

    /// Name as reported by the status endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }
}
