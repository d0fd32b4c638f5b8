//! # Logging
//!
//! Tracing subscriber setup for binaries built on this crate.
//!
//! `RUST_LOG` wins when set, e.g. `RUST_LOG=gomarket_store=trace`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,gomarket=debug,sqlx=warn";

/// Builds the log filter from `RUST_LOG` or [`DEFAULT_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs a stderr `fmt` subscriber.
///
/// Returns false if a global subscriber was already set.
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
