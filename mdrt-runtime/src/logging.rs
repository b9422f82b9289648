//! Subscriber setup for hosts that do not install their own.

use tracing_subscriber::EnvFilter;

/// Installs a compact fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` (e.g. `"info"` or `"mdrt_runtime=debug"`).
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
