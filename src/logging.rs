//! Logging setup for the CLI.
//!
//! The library only emits `tracing` events; the binary decides where they go.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive, e.g. `IDSTORE_LOG=debug`.
pub const LOG_ENV: &str = "IDSTORE_LOG";

/// Build the event filter: `IDSTORE_LOG` wins, then `default_level`, then `warn`.
pub fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install a stderr subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(default_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
