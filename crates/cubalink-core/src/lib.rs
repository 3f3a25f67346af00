//! Core types and mapping logic for the Cubalink23 gateway.
//!
//! This crate holds everything that does not talk to a network:
//!
//! - **Identifiers**: `OrderId`, `IdempotencyKey`
//! - **Money**: `Money` (integer cents plus ISO currency)
//! - **Flights**: `FlightSearch` validation, `CabinClass`, `IataCode`
//! - **Offers**: the internal `FlightOffer` and `Airport` shapes returned to apps
//! - **Orders**: order numbers and the rows written for wallet-paid orders
//! - **Notifications**: the in-memory `NotificationQueue`
//!
//! # Amounts
//!
//! Apps send decimal dollar amounts. They are converted once, at the edge, into
//! `Money` with an `i64` cent amount; providers receive cents.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod flight;
pub mod ids;
pub mod money;
pub mod notification;
pub mod offer;
pub mod order;

pub use error::{CoreError, Result};
pub use flight::{CabinClass, FlightSearch, FlightSearchInput, IataCode, Slice, MAX_PASSENGERS};
pub use ids::{IdError, IdempotencyKey, OrderId};
pub use money::{Money, DEFAULT_CURRENCY};
pub use notification::{
    NotificationDraft, NotificationQueue, QueuedNotification, DEFAULT_QUEUE_CAPACITY,
};
pub use offer::{png_logo, Airport, FlightOffer, DEFAULT_AVAILABLE_SEATS, OFFER_TYPE};
pub use order::{
    ActivityRow, CartItem, OrderItemRow, OrderNumber, OrderRow, WalletOrderRequest,
};
