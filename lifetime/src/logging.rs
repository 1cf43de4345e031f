//! Development-time tracing for debugging the engine.
//!
//! The library only emits `tracing` events; it never installs a subscriber on
//! its own. Applications opt in by calling [`init`] once at startup.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize a tracing subscriber for development logging.
///
/// Reads the `RUST_LOG` env var and falls back to `default_directive` (the
/// config default is `warn`). Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=lifetime=debug cargo test
/// ```
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A second call (e.g. from several tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
