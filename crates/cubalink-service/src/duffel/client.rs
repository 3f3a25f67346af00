//! Duffel API client implementation.

use reqwest::Client;
use std::time::Duration;

use cubalink_core::{Airport, FlightOffer, FlightSearch};

use super::mapping::{map_offer, map_place};
use super::types::{
    BookingConfirmation, BookingRequest, CreateOrderBody, DataEnvelope, DuffelErrorResponse,
    DuffelOrder, Offer, OfferRequest, OfferRequestBody, PassengerSpec, PlaceSuggestion,
};

/// Error type for Duffel operations.
#[derive(Debug, thiserror::Error)]
pub enum DuffelError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Duffel API returned an error.
    #[error("Duffel API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// First error message from the response.
        message: String,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The booking request cannot be turned into an order.
    #[error("Invalid booking: {0}")]
    InvalidBooking(String),
}

/// Duffel API client.
#[derive(Debug, Clone)]
pub struct DuffelClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DuffelClient {
    /// API version sent with every request.
    const API_VERSION: &'static str = "v2";

    /// Create a new Duffel client.
    ///
    /// # Errors
    ///
    /// Returns `DuffelError::Configuration` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, DuffelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DuffelError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Duffel-Version", Self::API_VERSION)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Airport suggestions matching `query`; cities are filtered out.
    pub async fn place_suggestions(&self, query: &str) -> Result<Vec<Airport>, DuffelError> {
        let response = self
            .request(reqwest::Method::GET, "/places/suggestions")
            .query(&[("query", query)])
            .send()
            .await?;

        let places: DataEnvelope<Vec<PlaceSuggestion>> = self.handle_response(response).await?;
        Ok(places.data.into_iter().filter_map(map_place).collect())
    }

    /// Create an offer request for `search`, returning its id.
    pub async fn create_offer_request(&self, search: &FlightSearch) -> Result<String, DuffelError> {
        let body = DataEnvelope {
            data: OfferRequestBody {
                slices: search.slices(),
                passengers: (0..search.passengers)
                    .map(|_| PassengerSpec {
                        passenger_type: "adult",
                    })
                    .collect(),
                cabin_class: search.cabin_class,
            },
        };

        tracing::debug!(
            origin = %search.origin,
            destination = %search.destination,
            departure_date = %search.departure_date,
            round_trip = search.is_round_trip(),
            passengers = search.passengers,
            "Creating Duffel offer request"
        );

        let response = self
            .request(reqwest::Method::POST, "/air/offer_requests")
            .json(&body)
            .send()
            .await?;

        let created: DataEnvelope<OfferRequest> = self.handle_response(response).await?;
        tracing::info!(offer_request_id = %created.data.id, "Duffel offer request created");
        Ok(created.data.id)
    }

    /// List the offers priced for an offer request.
    pub async fn list_offers(&self, offer_request_id: &str) -> Result<Vec<Offer>, DuffelError> {
        let response = self
            .request(reqwest::Method::GET, "/air/offers")
            .query(&[("offer_request_id", offer_request_id)])
            .send()
            .await?;

        let offers: DataEnvelope<Vec<Offer>> = self.handle_response(response).await?;
        Ok(offers.data)
    }

    /// Run a search end to end and return the offers in the app's shape.
    pub async fn search_offers(&self, search: &FlightSearch) -> Result<Vec<FlightOffer>, DuffelError> {
        let offer_request_id = self.create_offer_request(search).await?;
        let offers = self.list_offers(&offer_request_id).await?;

        let mapped: Vec<FlightOffer> = offers
            .iter()
            .filter_map(|offer| {
                let mapped = map_offer(offer, search.cabin_class);
                if mapped.is_none() {
                    tracing::warn!(offer_id = %offer.id, "Skipping offer without segments");
                }
                mapped
            })
            .collect();

        tracing::info!(
            offer_request_id = %offer_request_id,
            received = offers.len(),
            mapped = mapped.len(),
            "Duffel search complete"
        );
        Ok(mapped)
    }

    /// Book an offer.
    pub async fn create_order(
        &self,
        booking: &BookingRequest,
    ) -> Result<BookingConfirmation, DuffelError> {
        let body = DataEnvelope {
            data: CreateOrderBody::from_booking(booking)?,
        };

        tracing::debug!(
            offer_id = %booking.offer_id,
            passengers = booking.passengers.len(),
            services = body.data.services.len(),
            order_type = body.data.order_type,
            "Creating Duffel order"
        );

        let response = self
            .request(reqwest::Method::POST, "/air/orders")
            .json(&body)
            .send()
            .await?;

        let order: DataEnvelope<DuffelOrder> = self.handle_response(response).await?;
        tracing::info!(
            order_id = %order.data.id,
            booking_reference = ?order.data.booking_reference,
            "Duffel order created"
        );
        Ok(order.data.into())
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, DuffelError> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }

        let error_body: Result<DuffelErrorResponse, _> = response.json().await;
        let message = error_body
            .ok()
            .and_then(|e| e.errors.into_iter().next())
            .and_then(|e| e.message.or(e.title))
            .unwrap_or_else(|| format!("HTTP {status}"));

        Err(DuffelError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
