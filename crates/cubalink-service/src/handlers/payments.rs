//! Payment handlers backed by Square.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use cubalink_core::{Money, OrderId, OrderNumber, DEFAULT_CURRENCY};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::square::Payment;
use crate::state::AppState;

/// Payment link request from the app.
#[derive(Debug, Deserialize)]
pub struct ProcessPaymentRequest {
    /// Amount in major units; a number or a numeric string.
    #[serde(default)]
    pub amount: Option<Value>,
    /// What is being paid for.
    #[serde(default)]
    pub description: Option<String>,
    /// Paying user.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Currency (default USD).
    #[serde(default)]
    pub currency: Option<String>,
}

/// Payment link response.
#[derive(Debug, Serialize)]
pub struct ProcessPaymentResponse {
    /// Always true.
    pub success: bool,
    /// Square payment link id.
    pub payment_link_id: String,
    /// Where to send the buyer.
    pub checkout_url: String,
    /// Internal order id.
    pub order_id: OrderId,
    /// Human-facing order number.
    pub order_number: OrderNumber,
    /// Charged amount in major units.
    pub amount: f64,
    /// Currency.
    pub currency: String,
    /// Status message.
    pub message: String,
}

/// Payment status response.
#[derive(Debug, Serialize)]
pub struct PaymentStatusResponse {
    /// Always true.
    pub success: bool,
    /// Payment id.
    pub payment_id: String,
    /// Square status.
    pub status: Option<String>,
    /// Amount in major units.
    pub amount: Option<f64>,
    /// Currency.
    pub currency: Option<String>,
    /// Creation time.
    pub created_at: Option<String>,
    /// Last update time.
    pub updated_at: Option<String>,
}

/// Refund request.
#[derive(Debug, Deserialize)]
pub struct RefundRequest {
    /// Payment to refund.
    #[serde(default)]
    pub payment_id: Option<String>,
    /// Partial amount in major units; full refund when absent.
    #[serde(default)]
    pub amount: Option<Value>,
    /// Currency of a partial amount (default USD).
    #[serde(default)]
    pub currency: Option<String>,
    /// Reason (default `Customer request`).
    #[serde(default)]
    pub reason: Option<String>,
}

/// Refund response.
#[derive(Debug, Serialize)]
pub struct RefundResponse {
    /// Always true.
    pub success: bool,
    /// Square refund id.
    pub refund_id: String,
    /// Refund status.
    pub status: Option<String>,
    /// Refunded amount in major units.
    pub amount: Option<f64>,
    /// Currency.
    pub currency: Option<String>,
    /// Reason.
    pub reason: String,
    /// Status message.
    pub message: String,
}

/// History query.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Window start (`YYYY-MM-DD` or RFC 3339).
    #[serde(default)]
    pub start_date: Option<String>,
    /// Window end (`YYYY-MM-DD` or RFC 3339).
    #[serde(default)]
    pub end_date: Option<String>,
}

/// One payment in the history.
#[derive(Debug, Serialize)]
pub struct Transaction {
    /// Payment id.
    pub id: String,
    /// Square status.
    pub status: Option<String>,
    /// Amount in major units.
    pub amount: Option<f64>,
    /// Currency.
    pub currency: Option<String>,
    /// Creation time.
    pub created_at: Option<String>,
    /// Payment source.
    pub source_type: Option<String>,
    /// Payment note.
    pub note: Option<String>,
    /// Receipt URL.
    pub receipt_url: Option<String>,
}

impl From<Payment> for Transaction {
    fn from(payment: Payment) -> Self {
        let money = payment.amount_money.or(payment.total_money).map(Money::from);
        Self {
            id: payment.id,
            status: payment.status,
            amount: money.as_ref().map(Money::major),
            currency: money.map(|m| m.currency),
            created_at: payment.created_at,
            source_type: payment.source_type,
            note: payment.note,
            receipt_url: payment.receipt_url,
        }
    }
}

/// History response.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Always true.
    pub success: bool,
    /// Payments, newest first.
    pub transactions: Vec<Transaction>,
    /// Number of payments.
    pub total_count: usize,
}

/// A supported payment method.
#[derive(Debug, Serialize)]
pub struct PaymentMethod {
    /// Method id.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Short description.
    pub description: &'static str,
    /// Whether checkout offers it.
    pub enabled: bool,
}

/// Methods offered on the Square checkout page.
const PAYMENT_METHODS: &[PaymentMethod] = &[
    PaymentMethod {
        id: "card",
        name: "Credit / debit card",
        description: "Visa, Mastercard, American Express and Discover",
        enabled: true,
    },
    PaymentMethod {
        id: "apple_pay",
        name: "Apple Pay",
        description: "Pay with Apple Pay on supported devices",
        enabled: true,
    },
    PaymentMethod {
        id: "google_pay",
        name: "Google Pay",
        description: "Pay with Google Pay on supported devices",
        enabled: true,
    },
    PaymentMethod {
        id: "cash_app_pay",
        name: "Cash App Pay",
        description: "Pay with Cash App",
        enabled: true,
    },
];

/// Payment methods response.
#[derive(Debug, Serialize)]
pub struct MethodsResponse {
    /// Always true.
    pub success: bool,
    /// Supported methods.
    pub payment_methods: &'static [PaymentMethod],
}

/// Square availability response.
#[derive(Debug, Serialize)]
pub struct SquareStatusResponse {
    /// Always true.
    pub success: bool,
    /// Whether Square is configured.
    pub square_available: bool,
    /// `sandbox` or `production`.
    pub environment: &'static str,
    /// Configured location.
    pub location_id: Option<String>,
}

/// Connection test response.
#[derive(Debug, Serialize)]
pub struct ConnectionTestResponse {
    /// Always true.
    pub success: bool,
    /// Status message.
    pub message: String,
    /// `sandbox` or `production`.
    pub environment: &'static str,
    /// Number of locations visible to the token.
    pub locations: usize,
}

/// Create a payment link for an app purchase.
pub async fn process_payment(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<ProcessPaymentRequest>,
) -> Result<Json<ProcessPaymentResponse>, ApiError> {
    let amount = request.amount.as_ref().ok_or_else(|| missing("amount"))?;
    let description = required(request.description.as_deref(), "description")?;
    let user_id = required(request.user_id.as_deref(), "user_id")?;

    let money = Money::from_major(
        parse_amount(amount)?,
        request.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
    )?;

    let square = state.square()?;
    let order_id = OrderId::generate();
    let order_number = OrderNumber::payment(Utc::now());
    let note = format!("Order {order_number} for user {user_id}");

    let link = square
        .create_payment_link(description, &money, Some(&note))
        .await?;
    let checkout_url = link
        .checkout_url()
        .ok_or_else(|| ApiError::ExternalService("Square returned no checkout URL".into()))?
        .to_string();

    tracing::info!(
        order_id = %order_id,
        order_number = %order_number,
        user_id = %user_id,
        amount = %money,
        "Payment link created"
    );

    Ok(Json(ProcessPaymentResponse {
        success: true,
        payment_link_id: link.id,
        checkout_url,
        order_id,
        order_number,
        amount: money.major(),
        currency: money.currency,
        message: "Payment link created".to_string(),
    }))
}

/// Look up a payment.
pub async fn payment_status(
    State(state): State<Arc<AppState>>,
    Path(payment_id): Path<String>,
) -> Result<Json<PaymentStatusResponse>, ApiError> {
    let payment = state
        .square()?
        .get_payment(&payment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Payment not found: {payment_id}")))?;

    let money = payment
        .amount_money
        .or(payment.total_money)
        .map(Money::from);

    Ok(Json(PaymentStatusResponse {
        success: true,
        payment_id: payment.id,
        status: payment.status,
        amount: money.as_ref().map(Money::major),
        currency: money.map(|m| m.currency),
        created_at: payment.created_at,
        updated_at: payment.updated_at,
    }))
}

/// Refund a payment, fully or partially.
pub async fn refund(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<RefundRequest>,
) -> Result<Json<RefundResponse>, ApiError> {
    let payment_id = required(request.payment_id.as_deref(), "payment_id")?;
    let reason = request
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or("Customer request")
        .to_string();

    let amount = request
        .amount
        .as_ref()
        .filter(|v| !v.is_null())
        .map(|v| {
            Money::from_major(
                parse_amount(v)?,
                request.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
            )
            .map_err(ApiError::from)
        })
        .transpose()?;

    let refund = state
        .square()?
        .refund_payment(payment_id, amount.as_ref(), &reason)
        .await?;

    let money = refund.amount_money.map(Money::from);

    Ok(Json(RefundResponse {
        success: true,
        refund_id: refund.id,
        status: refund.status,
        amount: money.as_ref().map(Money::major),
        currency: money.map(|m| m.currency),
        reason,
        message: "Refund processed".to_string(),
    }))
}

/// List recent payments.
pub async fn history(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let begin = query
        .start_date
        .as_deref()
        .map(|s| parse_bound(s, Bound::Start))
        .transpose()?;
    let end = query
        .end_date
        .as_deref()
        .map(|s| parse_bound(s, Bound::End))
        .transpose()?;

    let payments = state.square()?.list_payments(begin, end).await?;
    let transactions: Vec<Transaction> = payments.into_iter().map(Transaction::from).collect();

    Ok(Json(HistoryResponse {
        success: true,
        total_count: transactions.len(),
        transactions,
    }))
}

/// Supported payment methods.
pub async fn methods() -> Json<MethodsResponse> {
    Json(MethodsResponse {
        success: true,
        payment_methods: PAYMENT_METHODS,
    })
}

/// Report whether Square is configured.
pub async fn square_status(State(state): State<Arc<AppState>>) -> Json<SquareStatusResponse> {
    Json(SquareStatusResponse {
        success: true,
        square_available: state.has_square(),
        environment: state.config.square_environment.as_str(),
        location_id: state.config.square_location_id.clone(),
    })
}

/// Verify the Square credentials by listing locations.
pub async fn test_connection(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConnectionTestResponse>, ApiError> {
    let locations = state.square()?.list_locations().await?;

    Ok(Json(ConnectionTestResponse {
        success: true,
        message: "Square connection OK".to_string(),
        environment: state.config.square_environment.as_str(),
        locations: locations.len(),
    }))
}

fn missing(field: &str) -> ApiError {
    ApiError::BadRequest(format!("missing required field: {field}"))
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ApiError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(field))
}

/// Accept `10.5` as well as `"10.5"`.
fn parse_amount(value: &Value) -> Result<f64, ApiError> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| ApiError::BadRequest(format!("amount must be a number, got {value}")))
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

/// Parse a history window bound; plain dates cover the whole day.
fn parse_bound(value: &str, bound: Bound) -> Result<DateTime<Utc>, ApiError> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ApiError::BadRequest(format!("invalid date '{value}', expected YYYY-MM-DD or RFC 3339"))
    })?;
    let time = match bound {
        Bound::Start => NaiveTime::MIN,
        Bound::End => NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
    };
    Ok(date.and_time(time).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn amounts_accept_numbers_and_strings() {
        assert!((parse_amount(&json!(10.5)).unwrap() - 10.5).abs() < f64::EPSILON);
        assert!((parse_amount(&json!("20")).unwrap() - 20.0).abs() < f64::EPSILON);
        assert!(parse_amount(&json!("ten")).is_err());
        assert!(parse_amount(&json!(true)).is_err());
    }

    #[test]
    fn plain_dates_cover_whole_day() {
        let start = parse_bound("2026-03-01", Bound::Start).unwrap();
        let end = parse_bound("2026-03-01", Bound::End).unwrap();
        assert_eq!(start.to_rfc3339(), "2026-03-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-03-01T23:59:59+00:00");
    }

    #[test]
    fn rfc3339_bounds_are_normalised_to_utc() {
        let ts = parse_bound("2026-03-01T10:00:00-05:00", Bound::Start).unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-03-01T15:00:00+00:00");
        assert!(parse_bound("03/01/2026", Bound::Start).is_err());
    }
}
