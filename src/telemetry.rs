//! Diagnostic logging for the `verity` binary.
//!
//! Library code only emits `tracing` events. The binary installs a
//! subscriber that filters them through `RUST_LOG` and writes to stderr, so
//! stdout carries nothing but the tool result.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Verbosity used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Installs the global stderr subscriber.
///
/// Only the first call takes effect; later calls are ignored.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}
