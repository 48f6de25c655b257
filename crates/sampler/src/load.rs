//! Synthetic bridge signal fed to the simulated chip.
//!
//! A slow sine around a tare offset, with one sample driven past full scale
//! so the saturation path shows up in the log.

use hx711::raw::RAW_MASK;
use hx711::{RAW_MAX, RAW_MIN};

const TARE_OFFSET: f64 = 84_000.0;
const AMPLITUDE: f64 = 1_500_000.0;
const STEP_RAD: f64 = 0.6;
const OVERLOAD_EVERY: u32 = 7;

/// Deterministic sequence of 24-bit conversion codes.
#[derive(Debug, Default)]
pub struct SyntheticLoad {
    step: u32,
}

impl SyntheticLoad {
    /// Start at phase zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next conversion code, as the chip would put it on the wire.
    #[allow(clippy::cast_possible_truncation)] // clamped to the 24-bit rails first
    #[allow(clippy::cast_sign_loss)] // two's-complement bit pattern is the point
    #[allow(clippy::arithmetic_side_effects)] // step wraps long after the demo ends
    pub fn next_code(&mut self) -> u32 {
        self.step = self.step.wrapping_add(1);
        let value = if self.step % OVERLOAD_EVERY == 0 {
            RAW_MAX
        } else {
            let phase = f64::from(self.step) * STEP_RAD;
            (TARE_OFFSET + AMPLITUDE * phase.sin())
                .clamp(f64::from(RAW_MIN), f64::from(RAW_MAX)) as i32
        };
        (value as u32) & RAW_MASK
    }
}
