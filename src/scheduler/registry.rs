//! Registry of pending notifications.
//!
//! Tracks every scheduled notification from registration until the
//! dispatcher has made its delivery attempt. The registry is pure
//! bookkeeping: removing an entry does not stop a waiter that already
//! holds the record.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::generate_notification_id;

use super::notification::{NotificationRequest, ScheduledNotification};

/// Registry mapping notification ids to their records.
///
/// Entries are inserted by registration and removed by the dispatcher
/// after each delivery attempt, or by explicit cancellation.
#[derive(Debug, Default)]
pub struct NotificationRegistry {
    entries: Mutex<HashMap<String, Arc<ScheduledNotification>>>,
}

impl NotificationRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register a request under a freshly generated identifier.
    ///
    /// Identifiers are regenerated under the lock until an unoccupied
    /// key is found; an existing entry is never overwritten.
    pub fn register(&self, request: NotificationRequest) -> Arc<ScheduledNotification> {
        let mut entries = self.entries.lock().unwrap();

        let mut id = generate_notification_id();
        while entries.contains_key(&id) {
            id = generate_notification_id();
        }

        let notification = Arc::new(ScheduledNotification::from_request(id.clone(), request));
        entries.insert(id, Arc::clone(&notification));

        notification
    }

    /// Remove an entry.
    ///
    /// Returns whether the entry was present. Removing an absent id is a
    /// no-op, so cancellation and the dispatcher's unconditional removal
    /// can race harmlessly.
    pub fn remove(&self, id: &str) -> bool {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(id).is_some()
    }

    /// Look up a registered notification.
    pub fn get(&self, id: &str) -> Option<Arc<ScheduledNotification>> {
        let entries = self.entries.lock().unwrap();
        entries.get(id).map(Arc::clone)
    }

    /// Whether an entry with this id is registered.
    pub fn contains(&self, id: &str) -> bool {
        let entries = self.entries.lock().unwrap();
        entries.contains_key(id)
    }

    /// Number of registered notifications.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Flip a notification's completion flag while holding the registry
    /// lock.
    pub fn mark_completed(&self, notification: &ScheduledNotification) {
        let _entries = self.entries.lock().unwrap();
        notification.mark_completed();
    }
}
