//! Logging initialization using `tracing` and `tracing-subscriber`.

use tracing_subscriber::{fmt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber, writing to stderr. Quiet by default so
/// stdout carries only command output; `RUST_LOG` takes precedence over
/// `debug`. Calling it again is a no-op.
pub fn init_logging(debug: bool) {
    if tracing::dispatcher::has_been_set() {
        return;
    }

    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish()
        .try_init();
}
