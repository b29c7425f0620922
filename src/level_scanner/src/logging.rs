//! Subscriber setup for binaries.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. Honors `RUST_LOG`, defaulting to `info`.
/// Logs go to stderr so they never mix with a report printed on stdout.
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    // Already installed, e.g. by a test harness.
    if let Err(e) = result {
        tracing::debug!("logging already initialized: {e}");
    }
}
