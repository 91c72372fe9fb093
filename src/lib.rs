//! Herald: delayed push-notification scheduling with bounded in-flight
//! dispatch.
//!
//! Herald accepts notifications tagged with an absolute delivery instant,
//! holds each one on its own waiter task until the instant arrives, and
//! funnels due notifications through a capacity-bounded admission gate
//! into a single serialized dispatcher that performs the delivery call.
//!
//! # Architecture
//!
//! - **Per-Notification Waiters**: one task per scheduled notification
//! - **Bounded In-Flight**: a counting gate caps due-but-undispatched work
//! - **Serialized Dispatch**: exactly one delivery call in progress
//! - **Fire-And-Forget**: failures are logged, never retried or persisted
//!
//! # Modules
//!
//! - [`config`]: CLI and environment configuration
//! - [`delivery`]: delivery-client seam and push message model
//! - [`observability`]: tracing setup
//! - [`records`]: record-store seam for the host application
//! - [`rooms`]: media-room grant model and issuer seam
//! - [`scheduler`]: registry, admission gate, waiters, dispatcher

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions, // scheduler::SchedulerConfig is fine
    clippy::must_use_candidate,      // Not all functions need #[must_use]
    clippy::missing_errors_doc,      // Error docs can be verbose
    clippy::missing_panics_doc,      // Panic docs can be verbose
    clippy::struct_excessive_bools   // Capability grants are flag structs
)]

pub mod config;
pub mod delivery;
pub mod observability;
pub mod records;
pub mod rooms;
pub mod scheduler;

pub use delivery::{DeliveryClient, DeliveryError};
pub use scheduler::{
    Dispatcher, NotificationPayload, NotificationRequest, NotificationScheduler, SchedulerConfig,
};

use uuid::Uuid;

/// Generate a new opaque notification ID.
///
/// UUIDv4 in simple (unhyphenated) form: ids are registry keys and log
/// correlators, so randomness matters and ordering does not.
///
/// # Example
///
/// ```
/// let id = herald::generate_notification_id();
/// assert_eq!(id.len(), 32); // hex characters, no hyphens
/// ```
#[must_use]
pub fn generate_notification_id() -> String {
    Uuid::new_v4().simple().to_string()
}
