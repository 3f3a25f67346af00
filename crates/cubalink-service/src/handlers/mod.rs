//! API handlers.

pub mod flights;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod payments;
