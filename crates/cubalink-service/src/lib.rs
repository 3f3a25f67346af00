//! Cubalink HTTP gateway.
//!
//! This crate provides the HTTP API behind the Cubalink mobile app and admin
//! panel, including:
//!
//! - Flight search and booking through Duffel
//! - Hosted checkout, refunds and payment history through Square
//! - Wallet order storage and push notification history in Supabase
//! - An in-memory notification queue polled by the app
//!
//! # Providers
//!
//! Each provider is optional. Routes that need a missing provider answer
//! `503 not_configured`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Static handlers stay async like the rest

pub mod config;
pub mod duffel;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod square;
pub mod state;
pub mod supabase;

pub use config::ServiceConfig;
pub use duffel::{DuffelClient, DuffelError};
pub use error::ApiError;
pub use routes::create_router;
pub use square::{SquareClient, SquareEnvironment, SquareError};
pub use state::AppState;
pub use supabase::{SupabaseClient, SupabaseError};
