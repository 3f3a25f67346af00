//! API error types and responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use cubalink_core::CoreError;

use crate::duffel::DuffelError;
use crate::square::SquareError;
use crate::supabase::SupabaseError;

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Provider credentials are missing.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// A provider rejected the request.
    #[error("{provider} error: {message}")]
    Provider {
        /// Provider name.
        provider: &'static str,
        /// Upstream HTTP status.
        status: u16,
        /// Upstream message.
        message: String,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// External service error.
    #[error("external service error: {0}")]
    ExternalService(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone(), None),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None),
            Self::NotConfigured(provider) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "not_configured",
                self.to_string(),
                Some(serde_json::json!({ "provider": provider })),
            ),
            Self::Provider {
                provider,
                status,
                message,
            } => {
                tracing::warn!(provider = %provider, upstream_status = status, error = %message, "Provider rejected request");
                let http = if (400..500).contains(status) {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::BAD_GATEWAY
                };
                (
                    http,
                    "provider_error",
                    message.clone(),
                    Some(serde_json::json!({
                        "provider": provider,
                        "upstream_status": status
                    })),
                )
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            Self::ExternalService(msg) => {
                tracing::error!(error = %msg, "External service error");
                (
                    StatusCode::BAD_GATEWAY,
                    "external_service_error",
                    msg.clone(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<DuffelError> for ApiError {
    fn from(err: DuffelError) -> Self {
        match err {
            DuffelError::Api { status, message } => Self::Provider {
                provider: "duffel",
                status,
                message,
            },
            DuffelError::InvalidBooking(msg) => Self::BadRequest(msg),
            DuffelError::Http(e) => Self::ExternalService(format!("Duffel request failed: {e}")),
            DuffelError::Serialization(e) => {
                Self::ExternalService(format!("Unexpected Duffel response: {e}"))
            }
            DuffelError::Configuration(msg) => Self::Internal(msg),
        }
    }
}

impl From<SquareError> for ApiError {
    fn from(err: SquareError) -> Self {
        match err {
            SquareError::Api {
                status, message, ..
            } => Self::Provider {
                provider: "square",
                status,
                message,
            },
            SquareError::PaymentNotFound(id) => Self::NotFound(format!("Payment not found: {id}")),
            SquareError::InvalidPaymentId(id) => {
                Self::BadRequest(format!("Invalid payment id: {id:?}"))
            }
            SquareError::MissingAmount(id) => {
                Self::BadRequest(format!("Payment {id} has no amount to refund"))
            }
            SquareError::Http(e) => Self::ExternalService(format!("Square request failed: {e}")),
            SquareError::Serialization(e) => {
                Self::ExternalService(format!("Unexpected Square response: {e}"))
            }
            SquareError::Configuration(msg) => Self::Internal(msg),
        }
    }
}

impl From<SupabaseError> for ApiError {
    fn from(err: SupabaseError) -> Self {
        match err {
            SupabaseError::Api {
                status, message, ..
            } => Self::Provider {
                provider: "supabase",
                status,
                message,
            },
            SupabaseError::Http(e) => {
                Self::ExternalService(format!("Supabase request failed: {e}"))
            }
            SupabaseError::Serialization(e) => {
                Self::ExternalService(format!("Unexpected Supabase response: {e}"))
            }
            SupabaseError::Configuration(msg) => Self::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_status_mapping() {
        let rejected = ApiError::Provider {
            provider: "square",
            status: 422,
            message: "bad amount".into(),
        }
        .into_response();
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

        let failed = ApiError::Provider {
            provider: "duffel",
            status: 503,
            message: "down".into(),
        }
        .into_response();
        assert_eq!(failed.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn core_errors_are_bad_requests() {
        let response = ApiError::from(CoreError::SameOriginDestination).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unconfigured_provider_is_unavailable() {
        let response = ApiError::NotConfigured("Square").into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
