//! Logging setup for binaries built on quizgate.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Call once at startup. Library crates only emit events; nothing is
/// printed until a binary installs a subscriber.
///
/// # Example
///
/// ```no_run
/// quizgate::init_tracing();
/// tracing::info!("client starting");
/// ```
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    // A subscriber may already be installed (tests, embedding apps).
    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
