//! Logging setup utilities for the Sketchpad game server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// The filter covers the server library crate and the binary. It can be
/// overridden with the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "sketchpad-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use sketchpad_shared::logger::setup_logger;
///
/// setup_logger("sketchpad-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the default `EnvFilter` directive string.
///
/// Crate names use underscores in tracing targets, so dashes are replaced.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    format!(
        "sketchpad_server={level},{binary}={level},tower_http={level}",
        level = default_log_level,
        binary = binary_name.replace('-', "_"),
    )
}
