//! Tracing initialization
//!
//! One-call subscriber setup for binaries and tests. Filtering is driven
//! by `RUST_LOG`, defaulting to `info` when unset.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; subsequent calls are no-ops so tests can
/// invoke it unconditionally.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
    {
        tracing::debug!("tracing initialized");
    }
}
