//! Admission gate bounding concurrent in-flight notifications.
//!
//! A counting gate: each due notification takes one slot before it may
//! be handed to the dispatcher and returns the slot once the handoff is
//! accepted. Sized so that a stalled delivery backend cannot accumulate
//! unbounded in-flight work.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting admission gate with a fixed capacity.
///
/// Clones share the same slot pool.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionGate {
    /// Create a gate admitting at most `capacity` holders at once.
    ///
    /// A capacity of zero would park every waiter forever, so it is
    /// clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a free slot.
    ///
    /// Resolves immediately while the gate is under capacity, otherwise
    /// suspends until a holder releases. The slot is held until the
    /// returned permit is dropped.
    pub async fn admit(&self) -> AdmissionPermit {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .expect("admission gate semaphore is never closed");
        AdmissionPermit { _permit: permit }
    }

    /// Number of slots currently held.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.permits.available_permits()
    }

    /// Maximum number of simultaneous holders.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Slot held in the admission gate.
#[must_use = "dropping the permit releases the admission slot"]
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}
