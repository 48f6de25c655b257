//! Sampler configuration and constants
//!
//! Central values for the sampling loop. The binary has no command line;
//! change these and rebuild.

use core::time::Duration;

use hx711::Gain;

/// The application name
pub const APP_NAME: &str = "HX711 sampler";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pause between two samples.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(1_000);

/// Pause after `setup()` before the first sample.
pub const SETUP_SETTLE: Duration = Duration::from_millis(100);

/// Samples taken before the loop exits.
pub const SAMPLE_COUNT: usize = 10;

/// Channel/gain selection for every sample.
pub const GAIN: Gain = Gain::ChannelA128;

/// Readiness polls before a sample is given up as "chip not responding".
///
/// At 10 samples/s the chip needs up to 100 ms per conversion; the budget is
/// generous for any host that can bit-bang the protocol.
pub const READY_POLL_LIMIT: u32 = 5_000_000;

/// Runtime copy of the constants above, so tests can shorten the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Pause between two samples.
    pub interval: Duration,
    /// Pause after setup.
    pub settle: Duration,
    /// Samples to take.
    pub count: usize,
    /// Channel/gain selection.
    pub gain: Gain,
    /// Readiness polls per conversion.
    pub ready_poll_limit: u32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: SAMPLE_INTERVAL,
            settle: SETUP_SETTLE,
            count: SAMPLE_COUNT,
            gain: GAIN,
            ready_poll_limit: READY_POLL_LIMIT,
        }
    }
}
