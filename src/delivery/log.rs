//! Logging delivery client.
//!
//! Stands in for a real push backend during local runs: each send is
//! logged and acknowledged after a configurable simulated latency. The
//! dry-run flag mirrors the validation-only send mode push vendors
//! expose; here it only changes what the log lines claim happened.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use super::{
    DeliveryClient, DeliveryError, DeliveryReceipt, MulticastMessage, MulticastReceipt,
    PushMessage,
};

/// Delivery client that logs instead of sending.
#[derive(Debug, Clone)]
pub struct LogDelivery {
    latency: Duration,
    dry_run: bool,
}

impl LogDelivery {
    /// Create a logging client with the given simulated backend latency.
    pub fn new(latency: Duration, dry_run: bool) -> Self {
        Self { latency, dry_run }
    }

    async fn simulate_backend(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for LogDelivery {
    fn default() -> Self {
        Self::new(Duration::ZERO, false)
    }
}

#[async_trait]
impl DeliveryClient for LogDelivery {
    async fn send_one(&self, message: &PushMessage) -> Result<DeliveryReceipt, DeliveryError> {
        self.simulate_backend().await;

        tracing::info!(
            token = %message.token,
            data_keys = message.data.len(),
            has_notification = message.notification.is_some(),
            dry_run = self.dry_run,
            "Push message accepted (log backend)"
        );

        Ok(DeliveryReceipt {
            message_id: Uuid::new_v4().simple().to_string(),
        })
    }

    async fn send_many(
        &self,
        message: &MulticastMessage,
    ) -> Result<MulticastReceipt, DeliveryError> {
        self.simulate_backend().await;

        tracing::info!(
            recipients = message.recipient_count(),
            data_keys = message.data.len(),
            dry_run = self.dry_run,
            "Multicast message accepted (log backend)"
        );

        Ok(MulticastReceipt {
            success_count: message.recipient_count(),
            failure_count: 0,
        })
    }
}
