//! Duffel API types.

use serde::{Deserialize, Serialize};

use cubalink_core::{CabinClass, Slice};

/// Duffel wraps every request and response body in `{"data": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    /// Payload.
    pub data: T,
}

/// Place suggestion (airport or city).
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceSuggestion {
    /// `airport` or `city`.
    #[serde(rename = "type", default)]
    pub place_type: String,
    /// IATA code.
    #[serde(default)]
    pub iata_code: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// City name.
    #[serde(default)]
    pub city_name: Option<String>,
    /// Country name, when the API includes it.
    #[serde(default)]
    pub country_name: Option<String>,
    /// ISO country code.
    #[serde(default)]
    pub iata_country_code: Option<String>,
}

/// Body of `POST /air/offer_requests`.
#[derive(Debug, Clone, Serialize)]
pub struct OfferRequestBody {
    /// Itinerary legs.
    pub slices: Vec<Slice>,
    /// One entry per traveller.
    pub passengers: Vec<PassengerSpec>,
    /// Requested cabin.
    pub cabin_class: CabinClass,
}

/// Traveller in an offer request.
#[derive(Debug, Clone, Serialize)]
pub struct PassengerSpec {
    /// Passenger type (`adult`).
    #[serde(rename = "type")]
    pub passenger_type: &'static str,
}

/// Created offer request.
#[derive(Debug, Clone, Deserialize)]
pub struct OfferRequest {
    /// Offer request id (`orq_...`).
    pub id: String,
}

/// Priced offer.
#[derive(Debug, Clone, Deserialize)]
pub struct Offer {
    /// Offer id (`off_...`).
    pub id: String,
    /// Total price as a decimal string.
    #[serde(default)]
    pub total_amount: Option<String>,
    /// Price currency.
    #[serde(default)]
    pub total_currency: Option<String>,
    /// Cabin class, when present on the offer.
    #[serde(default)]
    pub cabin_class: Option<String>,
    /// Itinerary slices.
    #[serde(default)]
    pub slices: Vec<OfferSlice>,
}

/// A slice of an offer.
#[derive(Debug, Clone, Deserialize)]
pub struct OfferSlice {
    /// ISO 8601 duration.
    #[serde(default)]
    pub duration: Option<String>,
    /// Flight segments in order.
    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// One flight segment.
#[derive(Debug, Clone, Deserialize)]
pub struct Segment {
    /// Departure airport.
    #[serde(default)]
    pub origin: SegmentPlace,
    /// Arrival airport.
    #[serde(default)]
    pub destination: SegmentPlace,
    /// Local departure time.
    #[serde(default)]
    pub departing_at: Option<String>,
    /// Local arrival time.
    #[serde(default)]
    pub arriving_at: Option<String>,
    /// Marketing carrier.
    #[serde(default)]
    pub marketing_carrier: Option<Carrier>,
    /// Operating carrier.
    #[serde(default)]
    pub operating_carrier: Option<Carrier>,
    /// Marketing flight number.
    #[serde(default, alias = "marketing_airline_flight_number")]
    pub marketing_carrier_flight_number: Option<String>,
    /// Operating flight number.
    #[serde(default, alias = "operating_airline_flight_number")]
    pub operating_carrier_flight_number: Option<String>,
    /// Aircraft.
    #[serde(default)]
    pub aircraft: Option<Aircraft>,
}

/// Airport reference inside a segment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SegmentPlace {
    /// IATA code.
    #[serde(default)]
    pub iata_code: String,
}

/// Airline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Carrier {
    /// Airline name.
    #[serde(default)]
    pub name: Option<String>,
    /// Airline IATA code.
    #[serde(default)]
    pub iata_code: Option<String>,
    /// Square logo URL (usually SVG).
    #[serde(default)]
    pub logo_symbol_url: Option<String>,
}

/// Aircraft.
#[derive(Debug, Clone, Deserialize)]
pub struct Aircraft {
    /// Aircraft name.
    #[serde(default)]
    pub name: Option<String>,
}

// ============================================================================
// Booking
// ============================================================================

/// Booking request posted by the app.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    /// Offer to book.
    #[serde(default)]
    pub offer_id: String,
    /// Travellers.
    #[serde(default)]
    pub passengers: Vec<BookingPassenger>,
    /// `balance` (default), `hold` or `payment_intent`.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Required when paying with a payment intent.
    #[serde(default)]
    pub payment_intent_id: Option<String>,
    /// Seat services.
    #[serde(default)]
    pub selected_seats: Vec<SeatSelection>,
    /// Extra baggage services.
    #[serde(default)]
    pub selected_baggage: Vec<BaggageSelection>,
}

/// Traveller details for booking.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingPassenger {
    /// Duffel passenger id from the offer request.
    #[serde(default)]
    pub id: Option<String>,
    /// Title (default `mr`).
    #[serde(default)]
    pub title: Option<String>,
    /// Given name.
    #[serde(default)]
    pub given_name: String,
    /// Family name.
    #[serde(default)]
    pub family_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Contact phone (E.164).
    #[serde(default)]
    pub phone_number: String,
    /// Date of birth.
    #[serde(default)]
    pub born_on: String,
    /// `m` (default) or `f`.
    #[serde(default)]
    pub gender: Option<String>,
    /// Passport number.
    #[serde(default)]
    pub passport_number: Option<String>,
    /// Passport expiry date.
    #[serde(default)]
    pub passport_expires_on: Option<String>,
    /// Passport issuing country (default `US`).
    #[serde(default)]
    pub passport_country_of_issue: Option<String>,
}

/// Selected seat.
#[derive(Debug, Clone, Deserialize)]
pub struct SeatSelection {
    /// Seat service id.
    pub seat_id: String,
}

/// Selected baggage.
#[derive(Debug, Clone, Deserialize)]
pub struct BaggageSelection {
    /// Baggage service id.
    pub service_id: String,
    /// Quantity (default 1).
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Body of `POST /air/orders`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderBody {
    /// `instant` or `hold`.
    #[serde(rename = "type")]
    pub order_type: &'static str,
    /// The offer being booked.
    pub selected_offers: Vec<String>,
    /// Travellers.
    pub passengers: Vec<OrderPassenger>,
    /// Seat and baggage services.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ServiceSelection>,
    /// Payment instruction.
    pub payment: PaymentSpec,
}

/// Traveller in an order.
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize)]
pub struct OrderPassenger {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub given_name: String,
    pub family_name: String,
    pub email: String,
    pub phone_number: String,
    pub born_on: String,
    pub gender: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub identity_documents: Vec<IdentityDocument>,
}

/// Passport attached to a traveller.
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize)]
pub struct IdentityDocument {
    #[serde(rename = "type")]
    pub document_type: &'static str,
    pub unique_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<String>,
    pub issuing_country_code: String,
}

/// Seat or baggage service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceSelection {
    /// Service id.
    pub id: String,
    /// Quantity.
    pub quantity: u32,
}

/// Payment instruction for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentSpec {
    /// Pay from the Duffel balance.
    Balance,
    /// Hold the booking unpaid.
    Hold,
    /// Pay with a confirmed payment intent.
    PaymentIntent {
        /// Payment intent id.
        payment_intent_id: String,
    },
}

/// Created order.
#[derive(Debug, Clone, Deserialize)]
pub struct DuffelOrder {
    /// Order id (`ord_...`).
    pub id: String,
    /// Airline booking reference (PNR).
    #[serde(default)]
    pub booking_reference: Option<String>,
    /// Order status as reported by Duffel.
    #[serde(default)]
    pub status: Option<String>,
    /// Total amount as a decimal string.
    #[serde(default)]
    pub total_amount: Option<String>,
    /// Currency.
    #[serde(default)]
    pub total_currency: Option<String>,
    /// Issued documents (e-tickets).
    #[serde(default)]
    pub documents: serde_json::Value,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Booking summary returned to the app.
#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    /// Duffel order id.
    pub booking_id: String,
    /// PNR.
    pub booking_reference: Option<String>,
    /// Duffel order status.
    pub status: Option<String>,
    /// Total amount.
    pub total_amount: Option<String>,
    /// Currency.
    pub currency: Option<String>,
    /// E-ticket documents.
    pub documents: serde_json::Value,
    /// Creation timestamp.
    pub created_at: Option<String>,
}

impl From<DuffelOrder> for BookingConfirmation {
    fn from(order: DuffelOrder) -> Self {
        Self {
            booking_id: order.id,
            booking_reference: order.booking_reference,
            status: order.status,
            total_amount: order.total_amount,
            currency: order.total_currency,
            documents: if order.documents.is_null() {
                serde_json::json!([])
            } else {
                order.documents
            },
            created_at: order.created_at,
        }
    }
}

/// Duffel error response.
#[derive(Debug, Clone, Deserialize)]
pub struct DuffelErrorResponse {
    /// Errors, most relevant first.
    #[serde(default)]
    pub errors: Vec<DuffelErrorDetail>,
}

/// Single Duffel error.
#[derive(Debug, Clone, Deserialize)]
pub struct DuffelErrorDetail {
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Short title.
    #[serde(default)]
    pub title: Option<String>,
    /// Machine code.
    #[serde(default)]
    pub code: Option<String>,
}
