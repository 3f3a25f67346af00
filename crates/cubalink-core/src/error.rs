//! Error types for the core crate.

use crate::ids::IdError;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while validating or mapping gateway data.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// One or more required fields were absent.
    #[error("missing required parameters: {}", .fields.join(", "))]
    MissingField {
        /// Names of the missing fields.
        fields: Vec<&'static str>,
    },

    /// An airport code is not a three-letter IATA code.
    #[error("airport codes must be 3 letters (IATA format): {0}")]
    InvalidIata(String),

    /// Origin and destination are the same airport.
    #[error("origin and destination cannot be the same")]
    SameOriginDestination,

    /// A date is not in `YYYY-MM-DD` format.
    #[error("invalid date for {field}: {value}")]
    InvalidDate {
        /// Field holding the date.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The return date precedes the departure date.
    #[error("return date {return_date} is before departure date {departure_date}")]
    ReturnBeforeDeparture {
        /// Departure date.
        departure_date: String,
        /// Return date.
        return_date: String,
    },

    /// Passenger count outside the supported range.
    #[error("passengers must be between 1 and {max}, got {got}")]
    InvalidPassengers {
        /// Requested count.
        got: i64,
        /// Maximum supported.
        max: u32,
    },

    /// Invalid monetary amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),
}
