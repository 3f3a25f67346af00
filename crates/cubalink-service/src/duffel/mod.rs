//! Duffel integration for flight search and booking.
//!
//! Duffel handles:
//! - Airport lookup (place suggestions)
//! - Offer requests and priced offers
//! - Orders (bookings)

pub mod client;
pub mod mapping;
pub mod types;

pub use client::{DuffelClient, DuffelError};
pub use mapping::{map_offer, map_place};
pub use types::{BookingConfirmation, BookingRequest};
