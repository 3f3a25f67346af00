//! Notification handlers.
//!
//! Push notifications are stored in Supabase for the admin history. Queued
//! notifications live in memory until the app pulls them.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use cubalink_core::{NotificationDraft, QueuedNotification};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;
use crate::supabase::{NotificationData, NotificationRecord};

const TABLE: &str = "notifications";
const HISTORY_LIMIT: &str = "50";

/// Push notification request from the admin panel.
#[derive(Debug, Deserialize)]
pub struct PushNotificationRequest {
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// Body text.
    #[serde(default)]
    pub message: Option<String>,
    /// Audience (default `all`).
    #[serde(default, rename = "type")]
    pub audience: Option<String>,
    /// Urgency flag.
    #[serde(default)]
    pub is_urgent: bool,
}

/// Notification as echoed back to the admin panel.
#[derive(Debug, Serialize)]
pub struct SentNotification {
    /// Title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Audience.
    #[serde(rename = "type")]
    pub audience: String,
    /// Urgency flag.
    pub is_urgent: bool,
    /// Send time.
    pub sent_at: String,
}

/// Push notification response.
#[derive(Debug, Serialize)]
pub struct PushNotificationResponse {
    /// Always true.
    pub success: bool,
    /// Status message.
    pub message: String,
    /// The sent notification.
    pub notification: SentNotification,
    /// Whether it was written to the history table.
    pub stored: bool,
}

/// Notification history response.
#[derive(Debug, Serialize)]
pub struct NotificationListResponse {
    /// Always true.
    pub success: bool,
    /// Rows as stored, newest first.
    pub notifications: Vec<Value>,
}

/// Generic acknowledgement.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    /// Always true.
    pub success: bool,
    /// Status message.
    pub message: String,
}

/// Enqueue response.
#[derive(Debug, Serialize)]
pub struct EnqueueResponse {
    /// Always true.
    pub success: bool,
    /// Status message.
    pub message: String,
    /// Id of the queued notification.
    pub notification_id: u64,
    /// Pending notifications after the push.
    pub queue_size: usize,
}

/// Next-notification response; `success` is false when the queue is empty.
#[derive(Debug, Serialize)]
pub struct NextNotificationResponse {
    /// Whether a notification was returned.
    pub success: bool,
    /// The oldest pending notification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<QueuedNotification>,
    /// Set when nothing is pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Send a push notification and record it in the history table.
pub async fn send_push(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<PushNotificationRequest>,
) -> Result<Json<PushNotificationResponse>, ApiError> {
    let title = non_blank(request.title.as_deref());
    let message = non_blank(request.message.as_deref());
    let (Some(title), Some(message)) = (title, message) else {
        return Err(ApiError::BadRequest("title and message are required".into()));
    };

    let record = NotificationRecord {
        title: title.to_string(),
        message: message.to_string(),
        audience: request.audience.unwrap_or_else(|| "all".to_string()),
        data: NotificationData {
            is_urgent: request.is_urgent,
            sent_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            status: "sent".to_string(),
        },
    };

    let stored = match state.supabase.as_deref() {
        Some(supabase) => match supabase.insert::<_, Value>(TABLE, &record).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to store push notification");
                false
            }
        },
        None => {
            tracing::debug!("Supabase not configured - push notification not stored");
            false
        }
    };

    tracing::info!(title = %record.title, audience = %record.audience, stored, "Push notification sent");

    Ok(Json(PushNotificationResponse {
        success: true,
        message: "Push notification sent".to_string(),
        notification: SentNotification {
            title: record.title,
            message: record.message,
            audience: record.audience,
            is_urgent: record.data.is_urgent,
            sent_at: record.data.sent_at,
        },
        stored,
    }))
}

/// Latest push notifications. Provider failures yield an empty list.
pub async fn list_push(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NotificationListResponse>, ApiError> {
    let supabase = state.supabase()?;

    let notifications = supabase
        .select::<Value>(
            TABLE,
            &[
                ("select", "*"),
                ("order", "created_at.desc"),
                ("limit", HISTORY_LIMIT),
            ],
        )
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load push notifications");
            Vec::new()
        });

    Ok(Json(NotificationListResponse {
        success: true,
        notifications,
    }))
}

/// Delete a push notification.
pub async fn delete_push(
    State(state): State<Arc<AppState>>,
    Path(notification_id): Path<String>,
) -> Result<Json<AckResponse>, ApiError> {
    state
        .supabase()?
        .delete(TABLE, "id", &notification_id)
        .await?;

    tracing::info!(notification_id = %notification_id, "Push notification deleted");

    Ok(Json(AckResponse {
        success: true,
        message: "Notification deleted".to_string(),
    }))
}

/// Queue a notification for the app.
pub async fn enqueue(
    State(state): State<Arc<AppState>>,
    ApiJson(draft): ApiJson<NotificationDraft>,
) -> Json<EnqueueResponse> {
    let mut queue = state.notifications.lock().await;
    let notification = queue.push(draft, Utc::now());
    let queue_size = queue.len();
    drop(queue);

    tracing::info!(
        notification_id = notification.id,
        title = %notification.title,
        queue_size,
        "Notification queued"
    );

    Json(EnqueueResponse {
        success: true,
        message: "Notification queued".to_string(),
        notification_id: notification.id,
        queue_size,
    })
}

/// Pop the oldest queued notification.
pub async fn next(State(state): State<Arc<AppState>>) -> Json<NextNotificationResponse> {
    let mut queue = state.notifications.lock().await;
    let notification = queue.pop_next();
    let remaining = queue.len();
    drop(queue);

    match notification {
        Some(notification) => {
            tracing::info!(notification_id = notification.id, remaining, "Notification delivered");
            Json(NextNotificationResponse {
                success: true,
                notification: Some(notification),
                message: None,
            })
        }
        None => Json(NextNotificationResponse {
            success: false,
            notification: None,
            message: Some("No pending notifications".to_string()),
        }),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
