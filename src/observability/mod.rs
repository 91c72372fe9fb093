//! Observability infrastructure.
//!
//! Provides:
//! - Structured tracing with environment-based filtering

pub mod tracing;
