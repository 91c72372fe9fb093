//! Herald: delayed push-notification scheduling with bounded in-flight
//! dispatch.
//!
//! Runs the scheduler against the logging delivery backend and feeds it a
//! batch of synthetic notifications, which makes it a smoke and soak tool
//! rather than a daemon.
//!
//! # Usage
//!
//! ```bash
//! herald --count 32 --spread-ms 2000 --dry-run
//! ```
//!
//! Environment variables can also be used:
//! - `HERALD_MAX_IN_FLIGHT`: Admission gate capacity
//! - `HERALD_COUNT`: Number of synthetic notifications
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)

use std::time::Duration;

use anyhow::Context;
use chrono::Utc;

use herald::config::Config;
use herald::delivery::{LogDelivery, MulticastMessage, PushContent, PushMessage};
use herald::observability::tracing::init_tracing;
use herald::scheduler::{NotificationRequest, NotificationScheduler};

/// Print startup banner with version and configuration.
fn print_banner(config: &Config) {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        r#"
    _   _                    _      _
   | | | |  ___  _ __  __ _ | |  __| |
   | |_| | / _ \| '__|/ _` || | / _` |
   |  _  ||  __/| |  | (_| || || (_| |
   |_| |_| \___||_|   \__,_||_| \__,_|

  Herald v{} - Notification Scheduler

  Configuration:
    In-Flight Cap:  {}
    Batch:          {} notifications over {}ms
    Send Latency:   {}ms
    Dry Run:        {}
    Log Level:      {}

  Press Ctrl+C to stop.
"#,
        version,
        config.max_in_flight,
        config.count,
        config.spread_ms,
        config.delivery_latency_ms,
        config.dry_run,
        config.log_level
    );
}

/// Register `config.count` synthetic notifications spread over the
/// configured window, with every Nth one a multicast.
fn schedule_batch(scheduler: &NotificationScheduler, config: &Config) {
    for i in 0..config.count {
        let offset_ms = if config.count <= 1 {
            0
        } else {
            config.spread_ms * i as u64 / (config.count as u64 - 1)
        };
        let scheduled_at = Utc::now() + chrono::Duration::milliseconds(offset_ms as i64);

        let request = if config.multicast_every > 0 && i % config.multicast_every == 0 {
            let tokens = (0..3).map(|device| format!("device-{i:04}-{device}")).collect();
            NotificationRequest::multicast(
                MulticastMessage::to_tokens(tokens)
                    .with_notification(PushContent::new("Herald soak", format!("multicast #{i}")))
                    .with_data("seq", i.to_string()),
                scheduled_at,
            )
        } else {
            NotificationRequest::single(
                PushMessage::to_token(format!("device-{i:04}"))
                    .with_notification(PushContent::new("Herald soak", format!("single #{i}")))
                    .with_data("seq", i.to_string()),
                scheduled_at,
            )
        };

        scheduler.add(request);
    }
}

/// Resolve once the registry has drained and every waiter has finished.
async fn wait_for_drain(scheduler: &NotificationScheduler) {
    while !scheduler.is_empty() || scheduler.pending_waiters() > 0 {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() -> anyhow::Result<()> {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;

        tokio::select! {
            _ = ctrl_c => {
                tracing::info!("Received SIGINT (Ctrl+C), stopping...");
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, stopping...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.context("failed to listen for ctrl+c")?;
        tracing::info!("Received Ctrl+C, stopping...");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse configuration from CLI arguments and environment
    let config = Config::parse_args();

    // Initialize tracing/logging
    init_tracing("herald", &config.log_level, config.log_json);

    // Print startup banner
    print_banner(&config);

    // Start the scheduler with the logging delivery backend
    let client = LogDelivery::new(
        Duration::from_millis(config.delivery_latency_ms),
        config.dry_run,
    );
    let (scheduler, dispatcher) = NotificationScheduler::start(client, config.scheduler());
    tokio::spawn(dispatcher.run());

    schedule_batch(&scheduler, &config);
    tracing::info!(
        scheduled = scheduler.len(),
        in_flight_cap = scheduler.capacity(),
        "Synthetic batch registered, waiting for dispatch"
    );

    tokio::select! {
        () = wait_for_drain(&scheduler) => {
            tracing::info!("All notifications dispatched");
        }
        signal = shutdown_signal() => {
            signal?;
            tracing::info!(
                remaining = scheduler.len(),
                "Abandoning remaining notifications"
            );
        }
    }

    tracing::info!("Herald shutdown complete");
    Ok(())
}
