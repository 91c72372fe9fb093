//! Delivery client seam.
//!
//! The dispatcher hands due notifications to a [`DeliveryClient`]. The
//! production implementation wraps a push vendor's SDK and lives in the
//! host application; [`LogDelivery`] is an in-process stand-in for local
//! runs.

pub mod log;
pub mod message;

pub use log::LogDelivery;
pub use message::{MessagePriority, MulticastMessage, PushContent, PushMessage};

use async_trait::async_trait;
use thiserror::Error;

/// Error type for delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Sender is not authorized: {0}")]
    Unauthorized(String),

    #[error("Delivery quota exceeded")]
    QuotaExceeded,

    #[error("Invalid device token: {0}")]
    InvalidToken(String),
}

/// Receipt for an accepted single-target message.
#[derive(Debug, Clone)]
pub struct DeliveryReceipt {
    /// Backend-assigned identifier for the accepted message.
    pub message_id: String,
}

/// Receipt for a multicast delivery.
///
/// Multicast sends succeed as a whole even when individual tokens fail;
/// the counts break the outcome down per destination.
#[derive(Debug, Clone)]
pub struct MulticastReceipt {
    pub success_count: usize,
    pub failure_count: usize,
}

impl MulticastReceipt {
    /// Whether every destination token accepted the message.
    pub fn delivered_to_all(&self) -> bool {
        self.failure_count == 0
    }
}

/// Client capable of delivering push messages.
///
/// The dispatcher awaits these calls one at a time, so a slow backend
/// directly throttles dispatch throughput.
#[async_trait]
pub trait DeliveryClient: Send + Sync + 'static {
    /// Deliver a message to a single device token.
    async fn send_one(&self, message: &PushMessage) -> Result<DeliveryReceipt, DeliveryError>;

    /// Deliver the same message to every token in the multicast set.
    async fn send_many(
        &self,
        message: &MulticastMessage,
    ) -> Result<MulticastReceipt, DeliveryError>;
}
