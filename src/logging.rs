//! Opt-in tracing subscriber setup.
//!
//! Library code only emits `tracing` events; it never installs a global
//! subscriber. Binaries and examples that want log output without wiring
//! their own subscriber can call [`init`] once at startup. Gated behind
//! the `logging` feature (on by default).

use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber filtered by `RUST_LOG`
/// (default level `info`). Calling it twice is a no-op; the first
/// subscriber wins.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
