//! Logging setup utilities for the chat server and client.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the library crates and the binary log at `default_log_level` unless
/// `RUST_LOG` says otherwise.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "chittychat-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use chittychat_shared::logger::setup_logger;
///
/// setup_logger("chittychat-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_directives(binary_name: &str, level: &str) -> String {
    let binary = binary_name.replace('-', "_");
    format!(
        "chittychat_shared={level},chittychat_server={level},chittychat_client={level},{binary}={level},tower_http={level}"
    )
}
