//! Delayed notification scheduling with bounded in-flight dispatch.
//!
//! - [`NotificationScheduler`]: front door; registers notifications and
//!   spawns one waiter task per entry
//! - [`registry`]: id-to-record bookkeeping shared by waiters and the
//!   dispatcher
//! - [`gate`]: counting admission gate capping due-but-undispatched work
//! - [`dispatcher`]: single serialized consumer performing delivery calls
//!
//! Lifecycle of one notification: registered, waiter sleeps until the
//! scheduled instant, waiter takes a gate slot, handoff to the
//! dispatcher, delivery attempt, entry removed. Removal is
//! unconditional; failures are logged and never retried.

pub mod dispatcher;
pub mod gate;
pub mod notification;
pub mod registry;

pub use dispatcher::Dispatcher;
pub use gate::AdmissionGate;
pub use notification::{NotificationPayload, NotificationRequest, ScheduledNotification};
pub use registry::NotificationRegistry;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;

use crate::delivery::DeliveryClient;

/// Configuration for a scheduler instance.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Maximum notifications simultaneously in flight between becoming
    /// due and being handed off.
    pub max_in_flight: usize,
    /// Capacity of the waiter-to-dispatcher handoff channel.
    pub handoff_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 3600,
            handoff_capacity: 1,
        }
    }
}

impl SchedulerConfig {
    /// Create a SchedulerConfig from application config values.
    pub fn from_config(max_in_flight: usize, handoff_capacity: usize) -> Self {
        Self {
            max_in_flight,
            handoff_capacity,
        }
    }

    /// Create a test config with a small gate and rendezvous handoff.
    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            max_in_flight: 2,
            handoff_capacity: 1,
        }
    }
}

/// Shared state behind scheduler handles.
#[derive(Debug)]
struct SchedulerInner {
    registry: Arc<NotificationRegistry>,
    gate: AdmissionGate,
    intake: mpsc::Sender<Arc<ScheduledNotification>>,
    waiters: TaskTracker,
}

/// Handle to a running notification scheduler.
///
/// Cheap to clone; all clones share the same registry, gate, and
/// dispatcher.
#[derive(Debug, Clone)]
pub struct NotificationScheduler {
    inner: Arc<SchedulerInner>,
}

impl NotificationScheduler {
    /// Start a scheduler and its dispatcher.
    ///
    /// Returns the shared handle plus the dispatcher, which the host
    /// must drive (typically `tokio::spawn(dispatcher.run())`). If the
    /// dispatcher is dropped instead, waiters log a warning when their
    /// notification comes due and unregister it without delivering.
    pub fn start<C: DeliveryClient>(client: C, config: SchedulerConfig) -> (Self, Dispatcher<C>) {
        let handoff_capacity = config.handoff_capacity.max(1);
        let (intake_tx, intake_rx) = mpsc::channel(handoff_capacity);

        let registry = Arc::new(NotificationRegistry::new());
        let dispatcher = Dispatcher::new(intake_rx, client, Arc::clone(&registry));

        let scheduler = Self {
            inner: Arc::new(SchedulerInner {
                registry,
                gate: AdmissionGate::new(config.max_in_flight),
                intake: intake_tx,
                waiters: TaskTracker::new(),
            }),
        };

        tracing::info!(
            max_in_flight = scheduler.inner.gate.capacity(),
            handoff_capacity,
            "Notification scheduler started"
        );

        (scheduler, dispatcher)
    }

    /// Register a notification and spawn its waiter task.
    ///
    /// Returns the assigned identifier immediately; the delay, gate
    /// admission, and delivery all happen on the waiter. Must be called
    /// from within a Tokio runtime.
    pub fn add(&self, request: NotificationRequest) -> String {
        let notification = self.inner.registry.register(request);
        let id = notification.id.clone();

        tracing::debug!(
            id = %id,
            scheduled_at = %notification.scheduled_at,
            "Notification scheduled"
        );

        self.inner.waiters.spawn(wait_and_submit(
            notification,
            Arc::clone(&self.inner.registry),
            self.inner.gate.clone(),
            self.inner.intake.clone(),
        ));

        id
    }

    /// Cancel a notification's registry entry.
    ///
    /// Bookkeeping only: a waiter that already holds the record still
    /// proceeds to delivery, and the dispatcher's final removal becomes
    /// a no-op. Returns whether the entry was present.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.inner.registry.remove(id);
        if removed {
            tracing::debug!(id = %id, "Notification removed");
        }
        removed
    }

    /// Look up a registered notification.
    pub fn get(&self, id: &str) -> Option<Arc<ScheduledNotification>> {
        self.inner.registry.get(id)
    }

    /// Whether a notification is still registered.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.registry.contains(id)
    }

    /// Number of registered notifications.
    pub fn len(&self) -> usize {
        self.inner.registry.len()
    }

    /// Whether no notifications are registered.
    pub fn is_empty(&self) -> bool {
        self.inner.registry.is_empty()
    }

    /// Notifications currently holding an admission slot.
    pub fn in_flight(&self) -> usize {
        self.inner.gate.in_flight()
    }

    /// Admission gate capacity.
    pub fn capacity(&self) -> usize {
        self.inner.gate.capacity()
    }

    /// Waiter tasks spawned but not yet finished.
    pub fn pending_waiters(&self) -> usize {
        self.inner.waiters.len()
    }
}

/// Waiter routine, one task per registered notification.
///
/// Sleeps until the scheduled instant, takes a gate slot, hands the
/// record to the dispatcher, marks it completed under the registry lock,
/// and releases the slot.
async fn wait_and_submit(
    notification: Arc<ScheduledNotification>,
    registry: Arc<NotificationRegistry>,
    gate: AdmissionGate,
    intake: mpsc::Sender<Arc<ScheduledNotification>>,
) {
    let delay = (notification.scheduled_at - Utc::now())
        .to_std()
        .unwrap_or(Duration::ZERO);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let permit = gate.admit().await;

    if intake.send(Arc::clone(&notification)).await.is_err() {
        tracing::warn!(
            id = %notification.id,
            "Dispatcher is gone, dropping notification without delivery"
        );
        registry.remove(&notification.id);
        return;
    }

    registry.mark_completed(&notification);
    drop(permit);
}
