//! Logging setup utilities for the Lapcast binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the calling crate and the binary itself. It can be
/// overridden with the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `crate_name` - The package name of the caller (e.g., `env!("CARGO_PKG_NAME")`)
/// * `binary_name` - The name of the binary (e.g., "lapcast-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use lapcast_shared::logger::setup_logger;
///
/// setup_logger("lapcast-server", "lapcast-server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                default_filter(crate_name, binary_name, default_log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the fallback filter directive used when `RUST_LOG` is not set.
///
/// Crate and binary names are normalized to module paths (`-` becomes `_`).
pub fn default_filter(crate_name: &str, binary_name: &str, default_log_level: &str) -> String {
    let crate_target = crate_name.replace('-', "_");
    let binary_target = binary_name.replace('-', "_");
    if crate_target == binary_target {
        format!("{}={},tower_http={}", crate_target, default_log_level, default_log_level)
    } else {
        format!(
            "{}={},{}={},tower_http={}",
            crate_target, default_log_level, binary_target, default_log_level, default_log_level
        )
    }
}
