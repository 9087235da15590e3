//! Structured logging with `tracing`.
//!
//! This module provides:
//! - [`init_subscriber`] for setting up the global `tracing` subscriber
//! - [`init_json_subscriber`] for machine-readable output
//! - [`init_from_settings`] to pick level and format from [`LoggingSettings`]
//! - [`capture_logs`] for recording events in tests
//!
//! Components never print directly. Store and service code emit `tracing`
//! events (`debug!` for row counts, `error!` for failed operations) and the
//! host decides where they go.

pub mod test_utils;

pub use test_utils::{CapturedEvent, CapturedLogs, capture_logs};

use todo_settings::LoggingSettings;
use tracing::Subscriber;

/// Default filter directive when neither the caller nor `RUST_LOG` sets one.
pub const DEFAULT_LEVEL: &str = "warn";

/// Build the env filter, preferring `RUST_LOG` over the supplied level.
fn build_filter(level: &str) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    let level = if level.trim().is_empty() {
        DEFAULT_LEVEL
    } else {
        level
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Build a stderr subscriber without installing it.
///
/// `json` selects JSON lines, otherwise the compact text format is used.
pub fn build_subscriber(level: &str, json: bool) -> Box<dyn Subscriber + Send + Sync> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_target(true)
        .with_writer(std::io::stderr);
    if json {
        Box::new(builder.json().finish())
    } else {
        Box::new(builder.compact().finish())
    }
}

/// Initialize the global tracing subscriber with stderr output.
///
/// Call once at application startup. Subsequent calls are no-ops.
///
/// # Arguments
///
/// * `level` - Minimum log level to display (e.g. `"info"`, `"todo_tasks=debug"`).
///   An empty string falls back to [`DEFAULT_LEVEL`].
pub fn init_subscriber(level: &str) {
    install(build_subscriber(level, false));
}

/// Initialize the global tracing subscriber with JSON lines on stderr.
///
/// Same semantics as [`init_subscriber`], for hosts that ship logs to a
/// collector.
pub fn init_json_subscriber(level: &str) {
    install(build_subscriber(level, true));
}

/// Initialize the global subscriber from the `logging` settings section.
pub fn init_from_settings(settings: &LoggingSettings) {
    install(build_subscriber(&settings.level, settings.json));
}

fn install(subscriber: Box<dyn Subscriber + Send + Sync>) {
    // fails if a global subscriber is already installed
    let _ = tracing::subscriber::set_global_default(subscriber);
}
