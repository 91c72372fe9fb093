//! Configuration parsing for the herald binary.
//!
//! Supports:
//! - CLI arguments via clap
//! - Environment variable overrides
//! - Sensible defaults for quick start

use clap::Parser;

use crate::scheduler::SchedulerConfig;

/// Herald: delayed push-notification scheduling with bounded in-flight dispatch.
#[derive(Parser, Debug, Clone)]
#[command(name = "herald")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Maximum notifications simultaneously in flight
    #[arg(long, env = "HERALD_MAX_IN_FLIGHT", default_value_t = 3600)]
    pub max_in_flight: usize,

    /// Capacity of the waiter-to-dispatcher handoff channel
    #[arg(long, env = "HERALD_HANDOFF_CAPACITY", default_value_t = 1)]
    pub handoff_capacity: usize,

    /// Number of synthetic notifications to schedule
    #[arg(short = 'n', long, env = "HERALD_COUNT", default_value_t = 16)]
    pub count: usize,

    /// Window over which the synthetic batch is spread, in milliseconds
    #[arg(long, env = "HERALD_SPREAD_MS", default_value_t = 2000)]
    pub spread_ms: u64,

    /// Simulated delivery latency per send, in milliseconds
    #[arg(long, env = "HERALD_DELIVERY_LATENCY_MS", default_value_t = 25)]
    pub delivery_latency_ms: u64,

    /// Schedule every Nth notification as a multicast (0 disables)
    #[arg(long, env = "HERALD_MULTICAST_EVERY", default_value_t = 4)]
    pub multicast_every: usize,

    /// Mark sends as dry-run (validation only)
    #[arg(long, env = "HERALD_DRY_RUN")]
    pub dry_run: bool,

    /// Emit logs as JSON
    #[arg(long, env = "HERALD_LOG_JSON")]
    pub log_json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Parse configuration from CLI arguments and environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Scheduler settings derived from this configuration.
    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig::from_config(self.max_in_flight, self.handoff_capacity)
    }

    /// Create a default configuration for testing.
    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            max_in_flight: 2,
            handoff_capacity: 1,
            count: 4,
            spread_ms: 50,
            delivery_latency_ms: 0,
            multicast_every: 2,
            dry_run: true,
            log_json: false,
            log_level: "debug".into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_in_flight: 3600,
            handoff_capacity: 1,
            count: 16,
            spread_ms: 2000,
            delivery_latency_ms: 25,
            multicast_every: 4,
            dry_run: false,
            log_json: false,
            log_level: "info".into(),
        }
    }
}
