//! Test utilities and a recording delivery client for herald tests.
//!
//! Provides:
//! - [`RecordingClient`]: captures every delivery call with timing and
//!   concurrency observations
//! - [`wait_for`]: poll a condition with timeout

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;

use herald::delivery::{
    DeliveryClient, DeliveryError, DeliveryReceipt, MulticastMessage, MulticastReceipt,
    PushMessage,
};

/// One observed delivery call.
#[derive(Debug, Clone)]
pub struct SendEvent {
    /// Instant the delivery call was entered.
    pub started_at: DateTime<Utc>,
    /// Destination token (first token for a multicast).
    pub token: String,
    /// Number of destination tokens.
    pub recipients: usize,
}

/// Delivery client that records calls instead of sending.
///
/// Counts concurrently active calls to verify dispatch stays serialized,
/// and in gated mode holds each delivery until released, which lets a
/// test build up gate pressure deterministically.
#[derive(Clone)]
pub struct RecordingClient {
    inner: Arc<RecordingInner>,
}

struct RecordingInner {
    events: Mutex<Vec<SendEvent>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
    latency: Duration,
    /// When set, each delivery waits for one release before finishing.
    barrier: Option<Semaphore>,
    fail_sends: bool,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::build(Duration::ZERO, false, false)
    }

    /// Client whose deliveries take `latency` each.
    pub fn with_latency(latency: Duration) -> Self {
        Self::build(latency, false, false)
    }

    /// Client whose deliveries block until [`RecordingClient::release`].
    pub fn gated() -> Self {
        Self::build(Duration::ZERO, true, false)
    }

    /// Client whose deliveries all fail.
    pub fn failing() -> Self {
        Self::build(Duration::ZERO, false, true)
    }

    fn build(latency: Duration, gated: bool, fail_sends: bool) -> Self {
        Self {
            inner: Arc::new(RecordingInner {
                events: Mutex::new(Vec::new()),
                active: AtomicUsize::new(0),
                max_active: AtomicUsize::new(0),
                latency,
                barrier: gated.then(|| Semaphore::new(0)),
                fail_sends,
            }),
        }
    }

    /// Allow `n` gated deliveries to finish.
    pub fn release(&self, n: usize) {
        if let Some(barrier) = &self.inner.barrier {
            barrier.add_permits(n);
        }
    }

    /// Number of recorded delivery calls.
    pub fn sent_count(&self) -> usize {
        self.inner.events.lock().unwrap().len()
    }

    /// Snapshot of recorded delivery calls, in call order.
    pub fn events(&self) -> Vec<SendEvent> {
        self.inner.events.lock().unwrap().clone()
    }

    /// Highest number of simultaneously active delivery calls seen.
    pub fn max_active(&self) -> usize {
        self.inner.max_active.load(Ordering::SeqCst)
    }

    async fn observe(&self, token: String, recipients: usize) -> Result<(), DeliveryError> {
        let entered = self.inner.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.max_active.fetch_max(entered, Ordering::SeqCst);

        self.inner.events.lock().unwrap().push(SendEvent {
            started_at: Utc::now(),
            token,
            recipients,
        });

        if !self.inner.latency.is_zero() {
            tokio::time::sleep(self.inner.latency).await;
        }
        if let Some(barrier) = &self.inner.barrier {
            let permit = barrier.acquire().await.expect("release barrier closed");
            permit.forget();
        }

        self.inner.active.fetch_sub(1, Ordering::SeqCst);

        if self.inner.fail_sends {
            return Err(DeliveryError::Transport("recording client set to fail".into()));
        }
        Ok(())
    }
}

impl Default for RecordingClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeliveryClient for RecordingClient {
    async fn send_one(&self, message: &PushMessage) -> Result<DeliveryReceipt, DeliveryError> {
        self.observe(message.token.clone(), 1).await?;
        Ok(DeliveryReceipt {
            message_id: format!("test-{}", self.sent_count()),
        })
    }

    async fn send_many(
        &self,
        message: &MulticastMessage,
    ) -> Result<MulticastReceipt, DeliveryError> {
        self.observe(
            message.tokens.first().cloned().unwrap_or_default(),
            message.recipient_count(),
        )
        .await?;
        Ok(MulticastReceipt {
            success_count: message.recipient_count(),
            failure_count: 0,
        })
    }
}

/// Wait for a condition to become true with timeout.
///
/// # Arguments
///
/// * `timeout` - Maximum time to wait
/// * `condition` - Closure that returns true when condition is met
///
/// # Returns
///
/// `true` if condition was met, `false` if timeout expired
pub async fn wait_for<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
