//! Square API types.

use serde::{Deserialize, Serialize};

use cubalink_core::Money;

/// Square money object (amount in the smallest unit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareMoney {
    /// Amount in cents.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
}

impl From<&Money> for SquareMoney {
    fn from(money: &Money) -> Self {
        Self {
            amount: money.amount_cents,
            currency: money.currency.clone(),
        }
    }
}

impl From<SquareMoney> for Money {
    fn from(money: SquareMoney) -> Self {
        Money::from_cents(money.amount, &money.currency)
    }
}

// ============================================================================
// Payment links
// ============================================================================

/// Body of `POST /v2/online-checkout/payment-links`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentLinkBody {
    /// Unique key per attempt.
    pub idempotency_key: String,
    /// Single-item checkout.
    pub quick_pay: QuickPay,
    /// Checkout page options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_options: Option<CheckoutOptions>,
    /// Note attached to the resulting payment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_note: Option<String>,
}

/// Quick-pay item.
#[derive(Debug, Clone, Serialize)]
pub struct QuickPay {
    /// Item name shown on the checkout page.
    pub name: String,
    /// Price.
    pub price_money: SquareMoney,
    /// Location that receives the funds.
    pub location_id: String,
}

/// Checkout page options.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutOptions {
    /// Where the buyer lands after paying.
    pub redirect_url: String,
}

/// Response wrapper for payment link creation.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentLinkResponse {
    /// The created link.
    pub payment_link: PaymentLink,
}

/// Hosted checkout link.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentLink {
    /// Link id.
    pub id: String,
    /// Short checkout URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Long checkout URL.
    #[serde(default)]
    pub long_url: Option<String>,
    /// Square order backing the link.
    #[serde(default)]
    pub order_id: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl PaymentLink {
    /// Checkout URL, preferring the short form.
    #[must_use]
    pub fn checkout_url(&self) -> Option<&str> {
        self.url.as_deref().or(self.long_url.as_deref())
    }
}

// ============================================================================
// Payments
// ============================================================================

/// Response wrapper for a single payment.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentResponse {
    /// The payment.
    pub payment: Payment,
}

/// Square payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Payment id.
    pub id: String,
    /// `APPROVED`, `PENDING`, `COMPLETED`, `CANCELED` or `FAILED`.
    #[serde(default)]
    pub status: Option<String>,
    /// Charged amount.
    #[serde(default)]
    pub amount_money: Option<SquareMoney>,
    /// Total including tips.
    #[serde(default)]
    pub total_money: Option<SquareMoney>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Payment source (`CARD`, `WALLET`, ...).
    #[serde(default)]
    pub source_type: Option<String>,
    /// Note from the payment link.
    #[serde(default)]
    pub note: Option<String>,
    /// Receipt URL.
    #[serde(default)]
    pub receipt_url: Option<String>,
}

/// Page of payments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPaymentsResponse {
    /// Payments, newest first.
    #[serde(default)]
    pub payments: Vec<Payment>,
    /// Pagination cursor.
    #[serde(default)]
    pub cursor: Option<String>,
}

// ============================================================================
// Refunds
// ============================================================================

/// Body of `POST /v2/refunds`.
#[derive(Debug, Clone, Serialize)]
pub struct RefundPaymentBody {
    /// Unique key per attempt.
    pub idempotency_key: String,
    /// Payment being refunded.
    pub payment_id: String,
    /// Amount to return.
    pub amount_money: SquareMoney,
    /// Reason shown to the buyer.
    pub reason: String,
}

/// Response wrapper for a refund.
#[derive(Debug, Clone, Deserialize)]
pub struct RefundResponse {
    /// The refund.
    pub refund: Refund,
}

/// Square refund.
#[derive(Debug, Clone, Deserialize)]
pub struct Refund {
    /// Refund id.
    pub id: String,
    /// `PENDING`, `COMPLETED`, `REJECTED` or `FAILED`.
    #[serde(default)]
    pub status: Option<String>,
    /// Refunded amount.
    #[serde(default)]
    pub amount_money: Option<SquareMoney>,
    /// Reason.
    #[serde(default)]
    pub reason: Option<String>,
    /// Refunded payment.
    #[serde(default)]
    pub payment_id: Option<String>,
}

// ============================================================================
// Locations
// ============================================================================

/// Response wrapper for the location list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListLocationsResponse {
    /// Locations.
    #[serde(default)]
    pub locations: Vec<Location>,
}

/// Business location.
#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    /// Location id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// `ACTIVE` or `INACTIVE`.
    #[serde(default)]
    pub status: Option<String>,
}

// ============================================================================
// Errors
// ============================================================================

/// Square error response.
#[derive(Debug, Clone, Deserialize)]
pub struct SquareErrorResponse {
    /// Errors.
    #[serde(default)]
    pub errors: Vec<SquareErrorDetail>,
}

/// Single Square error.
#[derive(Debug, Clone, Deserialize)]
pub struct SquareErrorDetail {
    /// Error category (e.g. `INVALID_REQUEST_ERROR`).
    #[serde(default)]
    pub category: String,
    /// Error code (e.g. `NOT_FOUND`).
    #[serde(default)]
    pub code: String,
    /// Human-readable detail.
    #[serde(default)]
    pub detail: Option<String>,
}
