//! In-memory notification queue polled by the mobile app.
//!
//! The admin panel pushes notifications; the app pulls them one at a time in
//! FIFO order. The queue is process-local and is lost on restart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of notifications kept before the oldest are dropped.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

const DEFAULT_TITLE: &str = "Notification";
const DEFAULT_MESSAGE: &str = "Notification message";
const DEFAULT_USER: &str = "admin";

/// Notification as submitted by the admin panel.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationDraft {
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// Body text.
    #[serde(default)]
    pub message: Option<String>,
    /// Whether the app should surface it immediately.
    #[serde(default)]
    pub is_urgent: bool,
    /// Target user.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// A queued notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedNotification {
    /// Sequential id, starting at 1.
    pub id: u64,
    /// Title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Urgency flag.
    pub is_urgent: bool,
    /// Always false when queued.
    pub read: bool,
    /// Enqueue time.
    pub created_at: DateTime<Utc>,
    /// Target user.
    pub user_id: String,
}

/// Bounded FIFO of pending notifications.
#[derive(Debug)]
pub struct NotificationQueue {
    queue: VecDeque<QueuedNotification>,
    next_id: u64,
    capacity: usize,
}

impl NotificationQueue {
    /// Create an empty queue holding at most `capacity` notifications.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            next_id: 1,
            capacity: capacity.max(1),
        }
    }

    /// Enqueue a draft, returning the stored notification.
    pub fn push(&mut self, draft: NotificationDraft, now: DateTime<Utc>) -> QueuedNotification {
        let notification = QueuedNotification {
            id: self.next_id,
            title: draft.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            message: draft.message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
            is_urgent: draft.is_urgent,
            read: false,
            created_at: now,
            user_id: draft.user_id.unwrap_or_else(|| DEFAULT_USER.to_string()),
        };
        self.next_id += 1;

        while self.queue.len() >= self.capacity {
            if let Some(dropped) = self.queue.pop_front() {
                tracing::warn!(
                    notification_id = dropped.id,
                    capacity = self.capacity,
                    "Notification queue full - dropping oldest"
                );
            }
        }

        self.queue.push_back(notification.clone());
        notification
    }

    /// Remove and return the oldest notification.
    pub fn pop_next(&mut self) -> Option<QueuedNotification> {
        self.queue.pop_front()
    }

    /// Number of pending notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> NotificationDraft {
        NotificationDraft {
            title: Some(title.into()),
            ..NotificationDraft::default()
        }
    }

    #[test]
    fn fifo_with_sequential_ids() {
        let mut queue = NotificationQueue::default();
        let first = queue.push(draft("a"), Utc::now());
        let second = queue.push(draft("b"), Utc::now());

        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop_next().unwrap().title, "a");
        assert_eq!(queue.pop_next().unwrap().title, "b");
        assert!(queue.pop_next().is_none());
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let mut queue = NotificationQueue::default();
        let n = queue.push(NotificationDraft::default(), Utc::now());

        assert_eq!(n.title, "Notification");
        assert_eq!(n.message, "Notification message");
        assert_eq!(n.user_id, "admin");
        assert!(!n.read);
    }

    #[test]
    fn drops_oldest_when_full() {
        let mut queue = NotificationQueue::with_capacity(2);
        queue.push(draft("a"), Utc::now());
        queue.push(draft("b"), Utc::now());
        let c = queue.push(draft("c"), Utc::now());

        assert_eq!(c.id, 3);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop_next().unwrap().title, "b");
    }

    #[test]
    fn ids_keep_increasing_after_drain() {
        let mut queue = NotificationQueue::default();
        queue.push(draft("a"), Utc::now());
        queue.pop_next();
        assert!(queue.is_empty());
        assert_eq!(queue.push(draft("b"), Utc::now()).id, 2);
    }
}
