//! Notification records and scheduling requests.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::delivery::{MulticastMessage, PushMessage};

/// Payload of a scheduled notification: one device or a fanout set.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationPayload {
    /// Message addressed to a single device token.
    Single(PushMessage),
    /// Same message fanned out to a token list.
    Multicast(MulticastMessage),
}

/// Request to schedule a notification for future delivery.
///
/// `scheduled_at` may lie in the past, which means "deliver now". A
/// request without a payload is accepted at registration and rejected
/// with an error log at dispatch time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub payload: Option<NotificationPayload>,
    /// Absolute instant at which the notification becomes due.
    pub scheduled_at: DateTime<Utc>,
}

impl NotificationRequest {
    /// Request delivery of a single-target message at `scheduled_at`.
    pub fn single(message: PushMessage, scheduled_at: DateTime<Utc>) -> Self {
        Self {
            payload: Some(NotificationPayload::Single(message)),
            scheduled_at,
        }
    }

    /// Request delivery of a multicast message at `scheduled_at`.
    pub fn multicast(message: MulticastMessage, scheduled_at: DateTime<Utc>) -> Self {
        Self {
            payload: Some(NotificationPayload::Multicast(message)),
            scheduled_at,
        }
    }
}

/// A registered notification awaiting dispatch.
///
/// Shared between the registry, the waiter task that sleeps until the
/// scheduled instant, and the dispatcher. Immutable after creation apart
/// from the completion flag.
#[derive(Debug)]
pub struct ScheduledNotification {
    /// Registry identifier, unique while the entry is present.
    pub id: String,
    pub payload: Option<NotificationPayload>,
    pub scheduled_at: DateTime<Utc>,
    /// Set once the dispatcher has accepted the handoff.
    completed: AtomicBool,
}

impl ScheduledNotification {
    /// Build a record from a request under the given identifier.
    pub fn from_request(id: String, request: NotificationRequest) -> Self {
        Self {
            id,
            payload: request.payload,
            scheduled_at: request.scheduled_at,
            completed: AtomicBool::new(false),
        }
    }

    /// Mark the notification as handed off for delivery.
    ///
    /// Must be called with the registry lock held.
    pub(crate) fn mark_completed(&self) {
        self.completed.store(true, Ordering::SeqCst);
    }

    /// Whether the dispatcher has accepted this notification.
    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }
}
