//! Supabase table rows and error bodies.

use serde::{Deserialize, Serialize};

/// Row written to the `notifications` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Audience (`all` unless targeted).
    #[serde(rename = "type")]
    pub audience: String,
    /// Delivery metadata.
    pub data: NotificationData,
}

/// Delivery metadata stored alongside a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationData {
    /// Urgency flag.
    pub is_urgent: bool,
    /// Send time (RFC 3339).
    pub sent_at: String,
    /// Delivery status.
    pub status: String,
}

/// `PostgREST` error body.
#[derive(Debug, Clone, Deserialize)]
pub struct PostgrestError {
    /// Postgres or `PostgREST` error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Message.
    #[serde(default)]
    pub message: Option<String>,
    /// Details.
    #[serde(default)]
    pub details: Option<String>,
    /// Hint.
    #[serde(default)]
    pub hint: Option<String>,
}
