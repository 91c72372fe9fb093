//! Serialized dispatch of due notifications.
//!
//! A single consumer receives handed-off notifications one at a time,
//! invokes the delivery client, and unregisters the entry whatever the
//! outcome. Delivery failures are logged and never retried.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::delivery::DeliveryClient;

use super::notification::{NotificationPayload, ScheduledNotification};
use super::registry::NotificationRegistry;

/// Single serialized consumer for due notifications.
///
/// Created together with its scheduler by
/// [`NotificationScheduler::start`](super::NotificationScheduler::start);
/// the host drives it by awaiting [`Dispatcher::run`], typically on a
/// spawned task.
pub struct Dispatcher<C> {
    intake: mpsc::Receiver<Arc<ScheduledNotification>>,
    client: C,
    registry: Arc<NotificationRegistry>,
}

impl<C: DeliveryClient> Dispatcher<C> {
    pub(super) fn new(
        intake: mpsc::Receiver<Arc<ScheduledNotification>>,
        client: C,
        registry: Arc<NotificationRegistry>,
    ) -> Self {
        Self {
            intake,
            client,
            registry,
        }
    }

    /// Consume handed-off notifications until the intake channel closes.
    ///
    /// One delivery call is awaited at a time; while it runs, further
    /// waiters queue on the handoff channel. Returns once the scheduler
    /// handle and every outstanding waiter have been dropped, which
    /// under normal operation is never.
    pub async fn run(mut self) {
        while let Some(notification) = self.intake.recv().await {
            self.dispatch(&notification).await;
            self.registry.remove(&notification.id);
        }
        tracing::debug!("Dispatcher intake closed, stopping");
    }

    /// Make one delivery attempt, logging the outcome.
    async fn dispatch(&self, notification: &ScheduledNotification) {
        match &notification.payload {
            Some(NotificationPayload::Single(message)) => {
                match self.client.send_one(message).await {
                    Ok(receipt) => tracing::info!(
                        id = %notification.id,
                        message_id = %receipt.message_id,
                        token = %message.token,
                        "Notification delivered"
                    ),
                    Err(error) => tracing::error!(
                        id = %notification.id,
                        %error,
                        "Failed to deliver notification"
                    ),
                }
            }
            Some(NotificationPayload::Multicast(message)) => {
                match self.client.send_many(message).await {
                    Ok(receipt) => tracing::info!(
                        id = %notification.id,
                        recipients = message.recipient_count(),
                        success = receipt.success_count,
                        failure = receipt.failure_count,
                        "Multicast notification delivered"
                    ),
                    Err(error) => tracing::error!(
                        id = %notification.id,
                        %error,
                        "Failed to deliver multicast notification"
                    ),
                }
            }
            None => {
                tracing::error!(
                    id = %notification.id,
                    "Notification has no payload, skipping delivery"
                );
            }
        }
    }
}
