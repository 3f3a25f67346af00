//! Flight search requests.
//!
//! `FlightSearchInput` is what the app posts; `FlightSearch::validate` turns it
//! into a checked `FlightSearch` that provider clients can rely on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

/// Maximum travellers per search.
pub const MAX_PASSENGERS: u32 = 9;

/// Cabin class requested for a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    /// Economy.
    #[default]
    Economy,
    /// Premium economy.
    PremiumEconomy,
    /// Business.
    Business,
    /// First.
    First,
}

impl CabinClass {
    /// Parse a cabin class, falling back to economy for unknown values.
    #[must_use]
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("premium_economy") => Self::PremiumEconomy,
            Some("business") => Self::Business,
            Some("first") => Self::First,
            _ => Self::Economy,
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::PremiumEconomy => "premium_economy",
            Self::Business => "business",
            Self::First => "first",
        }
    }
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A three-letter IATA airport or city code, stored upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct IataCode(String);

impl IataCode {
    /// Parse an IATA code.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidIata` unless the input is exactly three
    /// ASCII letters (surrounding whitespace ignored).
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.len() == 3 && trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(CoreError::InvalidIata(value.to_string()))
        }
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IataCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<IataCode> for String {
    fn from(code: IataCode) -> Self {
        code.0
    }
}

/// Raw search request as posted by the app.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightSearchInput {
    /// Origin airport code.
    #[serde(default)]
    pub origin: Option<String>,
    /// Destination airport code.
    #[serde(default)]
    pub destination: Option<String>,
    /// Outbound date (`YYYY-MM-DD`).
    #[serde(default)]
    pub departure_date: Option<String>,
    /// Optional return date (`YYYY-MM-DD`).
    #[serde(default)]
    pub return_date: Option<String>,
    /// Number of adult travellers (default 1). Signed so that negative
    /// counts reach validation instead of failing deserialization.
    #[serde(default)]
    pub passengers: Option<i64>,
    /// Cabin class name (default economy).
    #[serde(default)]
    pub cabin_class: Option<String>,
}

/// One leg of an itinerary request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slice {
    /// Origin code.
    pub origin: String,
    /// Destination code.
    pub destination: String,
    /// Date of travel, `YYYY-MM-DD`.
    pub departure_date: String,
}

/// A validated flight search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightSearch {
    /// Origin airport.
    pub origin: IataCode,
    /// Destination airport.
    pub destination: IataCode,
    /// Outbound date.
    pub departure_date: NaiveDate,
    /// Return date for round trips.
    pub return_date: Option<NaiveDate>,
    /// Number of adult travellers.
    pub passengers: u32,
    /// Requested cabin.
    pub cabin_class: CabinClass,
}

impl FlightSearch {
    /// Validate a raw search request.
    ///
    /// # Errors
    ///
    /// See [`CoreError`]: missing fields, bad IATA codes, identical endpoints,
    /// malformed or inverted dates, or an out-of-range passenger count.
    pub fn validate(input: &FlightSearchInput) -> Result<Self> {
        let origin = non_blank(input.origin.as_deref());
        let destination = non_blank(input.destination.as_deref());
        let departure_date = non_blank(input.departure_date.as_deref());

        let (Some(origin), Some(destination), Some(departure_date)) =
            (origin, destination, departure_date)
        else {
            return Err(CoreError::MissingField {
                fields: vec!["origin", "destination", "departure_date"],
            });
        };

        let origin = IataCode::parse(origin)?;
        let destination = IataCode::parse(destination)?;
        if origin == destination {
            return Err(CoreError::SameOriginDestination);
        }

        let departure_date = parse_date("departure_date", departure_date)?;
        let return_date = non_blank(input.return_date.as_deref())
            .map(|d| parse_date("return_date", d))
            .transpose()?;

        if let Some(ret) = return_date {
            if ret < departure_date {
                return Err(CoreError::ReturnBeforeDeparture {
                    departure_date: departure_date.to_string(),
                    return_date: ret.to_string(),
                });
            }
        }

        let requested = input.passengers.unwrap_or(1);
        let passengers = u32::try_from(requested)
            .ok()
            .filter(|n| (1..=MAX_PASSENGERS).contains(n))
            .ok_or(CoreError::InvalidPassengers {
                got: requested,
                max: MAX_PASSENGERS,
            })?;

        Ok(Self {
            origin,
            destination,
            departure_date,
            return_date,
            passengers,
            cabin_class: CabinClass::parse_lenient(input.cabin_class.as_deref()),
        })
    }

    /// Itinerary slices: outbound, then the reversed return leg if any.
    #[must_use]
    pub fn slices(&self) -> Vec<Slice> {
        let mut slices = vec![Slice {
            origin: self.origin.to_string(),
            destination: self.destination.to_string(),
            departure_date: self.departure_date.to_string(),
        }];

        if let Some(return_date) = self.return_date {
            slices.push(Slice {
                origin: self.destination.to_string(),
                destination: self.origin.to_string(),
                departure_date: return_date.to_string(),
            });
        }

        slices
    }

    /// Whether this is a round trip.
    #[must_use]
    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| CoreError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
