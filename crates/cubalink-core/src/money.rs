//! Monetary amounts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

/// Currency used when a request does not name one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// An amount in the smallest currency unit (cents) with its ISO 4217 code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
    /// Upper-case ISO 4217 currency code.
    pub currency: String,
}

impl Money {
    /// Create from an integer cent amount.
    #[must_use]
    pub fn from_cents(amount_cents: i64, currency: &str) -> Self {
        Self {
            amount_cents,
            currency: normalize_currency(currency),
        }
    }

    /// Create from a decimal major-unit amount (e.g. `10.5` dollars).
    ///
    /// The amount is rounded to the nearest cent.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidAmount` for non-finite, zero or negative
    /// amounts, or amounts that do not fit in `i64` cents.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_major(amount: f64, currency: &str) -> Result<Self> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::InvalidAmount(format!(
                "amount must be a positive number, got {amount}"
            )));
        }

        let cents = (amount * 100.0).round();
        if cents < 1.0 || cents > i64::MAX as f64 {
            return Err(CoreError::InvalidAmount(format!(
                "amount out of range: {amount}"
            )));
        }

        Ok(Self {
            amount_cents: cents as i64,
            currency: normalize_currency(currency),
        })
    }

    /// Amount in major units (dollars).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn major(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }
}

impl fmt::Display for Money {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2} {}", self.major(), self.currency)
    }
}

fn normalize_currency(currency: &str) -> String {
    let trimmed = currency.trim();
    if trimmed.is_empty() {
        DEFAULT_CURRENCY.to_string()
    } else {
        trimmed.to_ascii_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_dollars_to_cents() {
        let money = Money::from_major(20.35, "usd").unwrap();
        assert_eq!(money.amount_cents, 2035);
        assert_eq!(money.currency, "USD");
    }

    #[test]
    fn rounds_to_nearest_cent() {
        assert_eq!(Money::from_major(10.006, "USD").unwrap().amount_cents, 1001);
        assert_eq!(Money::from_major(10.004, "USD").unwrap().amount_cents, 1000);
        assert_eq!(Money::from_major(0.014, "USD").unwrap().amount_cents, 1);
    }

    #[test]
    fn empty_currency_defaults_to_usd() {
        assert_eq!(Money::from_major(1.0, "  ").unwrap().currency, "USD");
    }

    #[test]
    fn rejects_non_positive_and_nan() {
        assert!(Money::from_major(0.0, "USD").is_err());
        assert!(Money::from_major(-5.0, "USD").is_err());
        assert!(Money::from_major(f64::NAN, "USD").is_err());
        assert!(Money::from_major(0.001, "USD").is_err());
    }

    #[test]
    fn displays_dollars() {
        assert_eq!(Money::from_cents(1000, "usd").to_string(), "$10.00 USD");
    }
}
