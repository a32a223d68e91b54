//! Tracing initialization.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` takes precedence when set; otherwise the provided default
/// level applies. Safe to call more than once (later calls are no-ops),
/// which keeps parallel test binaries happy.
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Initializes tracing with an explicit default level.
pub fn init_tracing_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}
