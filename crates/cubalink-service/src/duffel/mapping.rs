//! Reshaping between Duffel payloads and the app's shapes.

use cubalink_core::{
    png_logo, Airport, CabinClass, FlightOffer, DEFAULT_AVAILABLE_SEATS, DEFAULT_CURRENCY,
    OFFER_TYPE,
};

use super::client::DuffelError;
use super::types::{
    BookingPassenger, BookingRequest, Carrier, CreateOrderBody, IdentityDocument, Offer,
    OrderPassenger, PaymentSpec, PlaceSuggestion, ServiceSelection,
};

const UNKNOWN_AIRLINE: &str = "Unknown airline";

/// Map a place suggestion to an airport; non-airport places yield `None`.
#[must_use]
pub fn map_place(place: PlaceSuggestion) -> Option<Airport> {
    if place.place_type != "airport" {
        return None;
    }

    Some(Airport {
        iata_code: place.iata_code,
        name: place.name,
        city: place.city_name,
        country: place.country_name.or(place.iata_country_code),
    })
}

/// Map an offer to the app's shape using its outbound slice.
///
/// Returns `None` when the offer has no slice or the slice has no segments.
#[must_use]
pub fn map_offer(offer: &Offer, requested_cabin: CabinClass) -> Option<FlightOffer> {
    let first_slice = offer.slices.first()?;
    let first_segment = first_slice.segments.first()?;
    let last_segment = first_slice.segments.last()?;

    let marketing = first_segment.marketing_carrier.as_ref();
    let operating = first_segment.operating_carrier.as_ref();
    let carrier_field = |pick: fn(&Carrier) -> Option<&String>| {
        marketing
            .and_then(pick)
            .or_else(|| operating.and_then(pick))
            .filter(|v| !v.is_empty())
            .cloned()
    };

    let logo = carrier_field(|c| c.logo_symbol_url.as_ref()).unwrap_or_default();

    let flight_number = first_segment
        .marketing_carrier_flight_number
        .clone()
        .filter(|n| !n.is_empty())
        .or_else(|| first_segment.operating_carrier_flight_number.clone())
        .unwrap_or_default();

    let price = offer
        .total_amount
        .as_deref()
        .and_then(|a| a.parse::<f64>().ok())
        .unwrap_or(0.0);

    let cabin_class = offer
        .cabin_class
        .as_deref()
        .map_or(requested_cabin, |c| CabinClass::parse_lenient(Some(c)));

    Some(FlightOffer {
        id: offer.id.clone(),
        offer_type: OFFER_TYPE.to_string(),
        airline: carrier_field(|c| c.name.as_ref()).unwrap_or_else(|| UNKNOWN_AIRLINE.to_string()),
        airline_code: carrier_field(|c| c.iata_code.as_ref()).unwrap_or_default(),
        airline_logo: png_logo(&logo),
        flight_number,
        aircraft: first_segment
            .aircraft
            .as_ref()
            .and_then(|a| a.name.clone())
            .unwrap_or_default(),
        origin: first_segment.origin.iata_code.clone(),
        destination: last_segment.destination.iata_code.clone(),
        departure_time: first_segment.departing_at.clone(),
        arrival_time: last_segment.arriving_at.clone(),
        duration: first_slice.duration.clone(),
        price,
        currency: offer
            .total_currency
            .clone()
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        available_seats: DEFAULT_AVAILABLE_SEATS,
        refundable: true,
        changeable: true,
        stops: first_slice.segments.len() - 1,
        cabin_class,
    })
}

impl CreateOrderBody {
    /// Build an order body from the app's booking request.
    ///
    /// # Errors
    ///
    /// Returns `DuffelError::InvalidBooking` when the offer id or passengers are
    /// missing, the payment method is unknown, or a payment intent id is absent.
    pub fn from_booking(request: &BookingRequest) -> Result<Self, DuffelError> {
        if request.offer_id.trim().is_empty() {
            return Err(DuffelError::InvalidBooking("offer_id is required".into()));
        }
        if request.passengers.is_empty() {
            return Err(DuffelError::InvalidBooking(
                "at least one passenger is required".into(),
            ));
        }

        let payment = match request.payment_method.as_deref().unwrap_or("balance") {
            "balance" => PaymentSpec::Balance,
            "hold" => PaymentSpec::Hold,
            "payment_intent" => PaymentSpec::PaymentIntent {
                payment_intent_id: request
                    .payment_intent_id
                    .clone()
                    .filter(|id| !id.is_empty())
                    .ok_or_else(|| {
                        DuffelError::InvalidBooking(
                            "payment_intent_id is required for payment_intent".into(),
                        )
                    })?,
            },
            other => {
                return Err(DuffelError::InvalidBooking(format!(
                    "unsupported payment method: {other}"
                )))
            }
        };

        let services = request
            .selected_seats
            .iter()
            .map(|seat| ServiceSelection {
                id: seat.seat_id.clone(),
                quantity: 1,
            })
            .chain(request.selected_baggage.iter().map(|bag| ServiceSelection {
                id: bag.service_id.clone(),
                quantity: bag.quantity.unwrap_or(1),
            }))
            .collect();

        Ok(Self {
            order_type: if payment == PaymentSpec::Hold {
                "hold"
            } else {
                "instant"
            },
            selected_offers: vec![request.offer_id.clone()],
            passengers: request.passengers.iter().map(order_passenger).collect(),
            services,
            payment,
        })
    }
}

fn order_passenger(p: &BookingPassenger) -> OrderPassenger {
    let identity_documents = p
        .passport_number
        .as_ref()
        .filter(|n| !n.is_empty())
        .map(|number| IdentityDocument {
            document_type: "passport",
            unique_identifier: number.clone(),
            expires_on: p.passport_expires_on.clone(),
            issuing_country_code: p
                .passport_country_of_issue
                .clone()
                .unwrap_or_else(|| "US".to_string()),
        })
        .into_iter()
        .collect();

    OrderPassenger {
        id: p.id.clone(),
        title: p.title.clone().unwrap_or_else(|| "mr".to_string()),
        given_name: p.given_name.clone(),
        family_name: p.family_name.clone(),
        email: p.email.clone(),
        phone_number: p.phone_number.clone(),
        born_on: p.born_on.clone(),
        gender: p.gender.clone().unwrap_or_else(|| "m".to_string()),
        identity_documents,
    }
}
