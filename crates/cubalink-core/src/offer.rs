//! Internal offer and airport shapes returned to the mobile app.
//!
//! Provider responses are reshaped into these types so the app never depends on
//! a provider schema.

use serde::{Deserialize, Serialize};

use crate::flight::CabinClass;

/// Value of the `type` field on every mapped offer.
pub const OFFER_TYPE: &str = "duffel_real";

/// Seat availability advertised for every offer (the provider does not expose it).
pub const DEFAULT_AVAILABLE_SEATS: u32 = 9;

/// A priced itinerary in the app's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    /// Provider offer id (used later for booking).
    pub id: String,
    /// Always [`OFFER_TYPE`].
    #[serde(rename = "type")]
    pub offer_type: String,
    /// Airline display name.
    pub airline: String,
    /// Airline IATA code.
    pub airline_code: String,
    /// Airline logo URL (PNG).
    pub airline_logo: String,
    /// Flight number of the first segment.
    pub flight_number: String,
    /// Aircraft name of the first segment.
    pub aircraft: String,
    /// Origin airport of the first segment.
    pub origin: String,
    /// Destination airport of the last segment.
    pub destination: String,
    /// Departure timestamp of the first segment.
    pub departure_time: Option<String>,
    /// Arrival timestamp of the last segment.
    pub arrival_time: Option<String>,
    /// ISO 8601 duration of the outbound slice.
    pub duration: Option<String>,
    /// Total price in major units.
    pub price: f64,
    /// Price currency.
    pub currency: String,
    /// Advertised available seats.
    pub available_seats: u32,
    /// Whether the fare is refundable.
    pub refundable: bool,
    /// Whether the fare is changeable.
    pub changeable: bool,
    /// Number of stops on the outbound slice.
    pub stops: usize,
    /// Cabin class.
    pub cabin_class: CabinClass,
}

/// An airport suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    /// IATA code.
    pub iata_code: Option<String>,
    /// Airport name.
    pub name: Option<String>,
    /// City name.
    pub city: Option<String>,
    /// Country name.
    pub country: Option<String>,
}

/// Rewrite an SVG logo URL to its PNG variant (Android cannot render SVG).
#[must_use]
pub fn png_logo(url: &str) -> String {
    match url.strip_suffix(".svg") {
        Some(stem) => format!("{stem}.png"),
        None => url.to_string(),
    }
}
