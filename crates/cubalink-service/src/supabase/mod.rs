//! Supabase integration (`PostgREST` with the service role key).

pub mod client;
pub mod types;

pub use client::{SupabaseClient, SupabaseError};
pub use types::{NotificationData, NotificationRecord, PostgrestError};
