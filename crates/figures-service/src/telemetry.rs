//! # Telemetry
//!
//! Tracing subscriber setup for binaries. Library code only emits events.
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show debug messages (always wins)
//! - `RUST_LOG=figures=trace` - Trace for figures crates only
//! - Otherwise the `[logging] filter` from the config file
//! - Default: [`DEFAULT_LOG_FILTER`]

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor the config provides one.
pub const DEFAULT_LOG_FILTER: &str = "info,figures=debug,sqlx=warn";

/// Builds the filter: `RUST_LOG`, else `fallback`, else the default.
pub fn env_filter(fallback: &str) -> EnvFilter {
    // Directive targets match by prefix: "figures" covers every workspace crate
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Initializes the global tracing subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(
    fallback: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(fallback))
        .with_target(true)
        .try_init()
}
