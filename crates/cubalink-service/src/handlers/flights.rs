//! Flight search and booking handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use cubalink_core::{Airport, FlightOffer, FlightSearch, FlightSearchInput};

use crate::duffel::{BookingConfirmation, BookingRequest};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

/// Airport lookup query.
#[derive(Debug, Deserialize)]
pub struct AirportQuery {
    /// Free text (city, airport name or code).
    #[serde(default)]
    pub query: String,
}

/// Airport lookup response.
#[derive(Debug, Serialize)]
pub struct AirportsResponse {
    /// Always true.
    pub success: bool,
    /// Matching airports.
    pub airports: Vec<Airport>,
    /// Number of airports.
    pub total: usize,
}

/// Search response.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Always true.
    pub success: bool,
    /// Offers in the app's shape.
    pub offers: Vec<FlightOffer>,
    /// Number of offers.
    pub total: usize,
}

/// Booking response.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    /// Always true.
    pub success: bool,
    /// Created booking.
    pub booking: BookingConfirmation,
}

/// Look up airports.
pub async fn airports(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<AirportQuery>,
) -> Result<Json<AirportsResponse>, ApiError> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("query parameter is required".into()));
    }

    let airports = state.duffel()?.place_suggestions(query).await?;
    tracing::debug!(query = %query, found = airports.len(), "Airport lookup");

    Ok(Json(AirportsResponse {
        success: true,
        total: airports.len(),
        airports,
    }))
}

/// Search flights.
pub async fn search(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<FlightSearchInput>,
) -> Result<Json<SearchResponse>, ApiError> {
    let search = FlightSearch::validate(&input)?;
    let offers = state.duffel()?.search_offers(&search).await?;

    Ok(Json(SearchResponse {
        success: true,
        total: offers.len(),
        offers,
    }))
}

/// Book an offer.
pub async fn book(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<BookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let booking = state.duffel()?.create_order(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            success: true,
            booking,
        }),
    ))
}
