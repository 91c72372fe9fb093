//! Tracing setup.
//!
//! Configures structured console logging with:
//! - Environment-based filter (via RUST_LOG)
//! - Optional JSON output for log shippers

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with the given service name.
///
/// Filtering comes from `RUST_LOG` when set, otherwise from
/// `default_level` with herald events raised to debug.
///
/// # Panics
///
/// Panics if tracing has already been initialized.
pub fn init_tracing(service_name: &str, default_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_directives(default_level)));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    }

    tracing::info!(service = service_name, json, "Tracing initialized");
}

/// Directives used when `RUST_LOG` is unset: the configured level for
/// everything, with herald raised to debug at the quieter levels.
fn fallback_directives(default_level: &str) -> String {
    match default_level {
        "trace" | "debug" => default_level.to_string(),
        _ => format!("{default_level},herald=debug"),
    }
}

/// Initialize tracing for tests (only logs errors).
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("error")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_directives_raise_herald_to_debug() {
        assert_eq!(fallback_directives("info"), "info,herald=debug");
        assert_eq!(fallback_directives("warn"), "warn,herald=debug");
    }

    #[test]
    fn test_fallback_directives_keep_verbose_levels() {
        assert_eq!(fallback_directives("trace"), "trace");
        assert_eq!(fallback_directives("debug"), "debug");
    }
}
