//! Tracing setup for the sampler binary.

use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;

/// Install a stdout subscriber.
///
/// Filters according to `RUST_LOG`, defaulting to INFO. `RUST_LOG=debug`
/// also shows priming reads and power transitions.
pub fn init() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("RUST_LOG")
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
