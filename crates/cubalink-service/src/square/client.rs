//! Square API client implementation.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use std::time::Duration;

use cubalink_core::{IdempotencyKey, Money};

use super::types::{
    CheckoutOptions, CreatePaymentLinkBody, ListLocationsResponse, ListPaymentsResponse,
    Location, Payment, PaymentLink, PaymentLinkResponse, PaymentResponse, QuickPay, Refund,
    RefundPaymentBody, RefundResponse, SquareErrorResponse, SquareMoney,
};

/// Error type for Square operations.
#[derive(Debug, thiserror::Error)]
pub enum SquareError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Square API returned an error.
    #[error("Square API error: {category} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error category.
        category: String,
        /// Error code.
        code: String,
        /// Error detail.
        message: String,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Payment does not exist.
    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    /// Payment id contains characters Square never issues.
    #[error("Invalid payment id: {0:?}")]
    InvalidPaymentId(String),

    /// Payment carries no amount to refund.
    #[error("Payment {0} has no amount")]
    MissingAmount(String),
}

/// Square API client.
#[derive(Debug, Clone)]
pub struct SquareClient {
    client: Client,
    base_url: String,
    access_token: String,
    location_id: String,
    redirect_url: Option<String>,
}

impl SquareClient {
    /// API version sent with every request.
    const API_VERSION: &'static str = "2024-12-01";

    /// Create a new Square client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Sandbox or production API root
    /// * `access_token` - Square access token
    /// * `location_id` - Location that receives payments
    /// * `redirect_url` - Optional post-checkout redirect
    ///
    /// # Errors
    ///
    /// Returns `SquareError::Configuration` if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        location_id: impl Into<String>,
        redirect_url: Option<String>,
    ) -> Result<Self, SquareError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SquareError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            location_id: location_id.into(),
            redirect_url,
        })
    }

    /// Configured location id.
    #[must_use]
    pub fn location_id(&self) -> &str {
        &self.location_id
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .bearer_auth(&self.access_token)
            .header("Square-Version", Self::API_VERSION)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Create a hosted checkout link for a fixed amount.
    ///
    /// # Arguments
    ///
    /// * `name` - Item name shown at checkout
    /// * `money` - Amount to charge
    /// * `note` - Optional note attached to the payment
    pub async fn create_payment_link(
        &self,
        name: &str,
        money: &Money,
        note: Option<&str>,
    ) -> Result<PaymentLink, SquareError> {
        let idempotency_key = IdempotencyKey::generate();
        let body = CreatePaymentLinkBody {
            idempotency_key: idempotency_key.to_string(),
            quick_pay: QuickPay {
                name: name.to_string(),
                price_money: money.into(),
                location_id: self.location_id.clone(),
            },
            checkout_options: self.redirect_url.clone().map(|redirect_url| CheckoutOptions {
                redirect_url,
            }),
            payment_note: note.map(str::to_string),
        };

        tracing::debug!(
            amount = %money,
            idempotency_key = %idempotency_key.short(),
            "Creating Square payment link"
        );

        let response = self
            .request(reqwest::Method::POST, "/v2/online-checkout/payment-links")
            .json(&body)
            .send()
            .await?;

        let created: PaymentLinkResponse = self.handle_response(response).await?;
        tracing::info!(payment_link_id = %created.payment_link.id, "Square payment link created");
        Ok(created.payment_link)
    }

    /// Get a payment by ID.
    pub async fn get_payment(&self, payment_id: &str) -> Result<Option<Payment>, SquareError> {
        let payment_id = checked_payment_id(payment_id)?;
        let response = self
            .request(reqwest::Method::GET, &format!("/v2/payments/{payment_id}"))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let found: PaymentResponse = self.handle_response(response).await?;
        Ok(Some(found.payment))
    }

    /// Refund a payment.
    ///
    /// With no `amount` the full payment amount is refunded, which requires
    /// fetching the payment first.
    pub async fn refund_payment(
        &self,
        payment_id: &str,
        amount: Option<&Money>,
        reason: &str,
    ) -> Result<Refund, SquareError> {
        let payment_id = checked_payment_id(payment_id)?;
        let amount_money = match amount {
            Some(money) => SquareMoney::from(money),
            None => {
                let payment = self
                    .get_payment(payment_id)
                    .await?
                    .ok_or_else(|| SquareError::PaymentNotFound(payment_id.to_string()))?;
                payment
                    .amount_money
                    .or(payment.total_money)
                    .ok_or_else(|| SquareError::MissingAmount(payment_id.to_string()))?
            }
        };

        let body = RefundPaymentBody {
            idempotency_key: IdempotencyKey::generate().to_string(),
            payment_id: payment_id.to_string(),
            amount_money,
            reason: reason.to_string(),
        };

        tracing::debug!(
            payment_id = %payment_id,
            amount_cents = body.amount_money.amount,
            full = amount.is_none(),
            "Refunding Square payment"
        );

        let response = self
            .request(reqwest::Method::POST, "/v2/refunds")
            .json(&body)
            .send()
            .await?;

        let refunded: RefundResponse = self.handle_response(response).await?;
        tracing::info!(refund_id = %refunded.refund.id, payment_id = %payment_id, "Square refund created");
        Ok(refunded.refund)
    }

    /// List payments at the configured location, newest first.
    pub async fn list_payments(
        &self,
        begin: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Payment>, SquareError> {
        let mut query = vec![
            ("location_id", self.location_id.clone()),
            ("sort_order", "DESC".to_string()),
        ];
        if let Some(begin) = begin {
            query.push(("begin_time", begin.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        if let Some(end) = end {
            query.push(("end_time", end.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }

        let response = self
            .request(reqwest::Method::GET, "/v2/payments")
            .query(&query)
            .send()
            .await?;

        let page: ListPaymentsResponse = self.handle_response(response).await?;
        Ok(page.payments)
    }

    /// List business locations; used to check credentials.
    pub async fn list_locations(&self) -> Result<Vec<Location>, SquareError> {
        let response = self
            .request(reqwest::Method::GET, "/v2/locations")
            .send()
            .await?;

        let locations: ListLocationsResponse = self.handle_response(response).await?;
        Ok(locations.locations)
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, SquareError> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }

        let error_body: Result<SquareErrorResponse, _> = response.json().await;

        match error_body.ok().and_then(|e| e.errors.into_iter().next()) {
            Some(error) => Err(SquareError::Api {
                status: status.as_u16(),
                message: error.detail.unwrap_or_else(|| error.code.clone()),
                category: error.category,
                code: error.code,
            }),
            None => Err(SquareError::Api {
                status: status.as_u16(),
                category: "unknown".to_string(),
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
            }),
        }
    }
}

/// Payment ids end up in URL paths; only Square's id alphabet is accepted.
fn checked_payment_id(payment_id: &str) -> Result<&str, SquareError> {
    let valid = !payment_id.is_empty()
        && payment_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(payment_id)
    } else {
        Err(SquareError::InvalidPaymentId(payment_id.to_string()))
    }
}
