//! Sampling loop body: power up, wait for DOUT, read, power down.
//!
//! The driver leaves two obligations to its caller and this module takes
//! them on:
//! - waiting for readiness, bounded by
//!   [`SamplerConfig::ready_poll_limit`] so a dead chip is reported instead
//!   of hanging the loop;
//! - restoring a non-default gain after power-up. The chip wakes at channel
//!   A / gain 128 and only latches the driver's selection at the end of a
//!   read, so a discarded priming read comes first.

use anyhow::{bail, Result};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use hx711::{is_saturated, Gain, Hx711};
use tracing::{debug, trace};

use crate::config::SamplerConfig;

/// One kept conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Position in the run, from 0.
    pub index: usize,
    /// Sign-extended reading.
    pub raw: i32,
    /// Selection the reading was converted with.
    pub gain: Gain,
}

impl Sample {
    /// The 24-bit code as it appeared on the wire.
    #[allow(clippy::cast_sign_loss)] // two's-complement bit pattern
    pub fn code(&self) -> u32 {
        (self.raw as u32) & hx711::raw::RAW_MASK
    }

    /// Reading sits on a rail: bridge input outside the gain's range.
    pub fn saturated(&self) -> bool {
        is_saturated(self.raw)
    }
}

/// Drives one HX711 through the sampling cycle.
pub struct Sampler<CLK, DOUT, D> {
    adc: Hx711<CLK, DOUT, D>,
    config: SamplerConfig,
    taken: usize,
}

impl<CLK, DOUT, D> Sampler<CLK, DOUT, D>
where
    CLK: OutputPin,
    DOUT: InputPin,
    D: DelayNs,
    <CLK as ErrorType>::Error: Send + Sync + 'static,
    <DOUT as ErrorType>::Error: Send + Sync + 'static,
{
    /// Wrap a driver; nothing touches the pins until [`start`](Self::start).
    pub fn new(adc: Hx711<CLK, DOUT, D>, config: SamplerConfig) -> Self {
        Self {
            adc,
            config,
            taken: 0,
        }
    }

    /// Apply the configured gain and run the driver's setup power cycle.
    pub fn start(&mut self) -> Result<()> {
        self.adc.set_gain(self.config.gain);
        self.adc.setup()?;
        debug!(gain = ?self.config.gain, "HX711 setup complete");
        Ok(())
    }

    /// Conversions consumed per [`sample`](Self::sample): two when a priming
    /// read is needed.
    pub fn conversions_per_sample(&self) -> usize {
        if self.needs_priming() {
            2
        } else {
            1
        }
    }

    /// Take one sample and leave the chip powered down.
    #[allow(clippy::arithmetic_side_effects)] // sample counter
    pub fn sample(&mut self) -> Result<Sample> {
        self.adc.power_up()?;

        if self.needs_priming() {
            self.wait_ready()?;
            let discarded = self.adc.read_raw()?;
            debug!(discarded, gain = ?self.adc.gain(), "priming read after power-up");
        }

        self.wait_ready()?;
        let raw = self.adc.read_raw()?;
        self.adc.power_down()?;

        let sample = Sample {
            index: self.taken,
            raw,
            gain: self.adc.gain(),
        };
        self.taken += 1;
        Ok(sample)
    }

    /// Give the driver back.
    pub fn into_inner(self) -> Hx711<CLK, DOUT, D> {
        self.adc
    }

    /// The chip wakes at its reset selection; any other gain is only latched
    /// by the pulses of a first, discarded read.
    fn needs_priming(&self) -> bool {
        self.adc.gain() != Gain::default()
    }

    fn wait_ready(&mut self) -> Result<()> {
        for polls in 0..self.config.ready_poll_limit {
            if self.adc.is_ready()? {
                trace!(polls, "HX711 ready");
                return Ok(());
            }
            core::hint::spin_loop();
        }
        bail!(
            "HX711 not ready after {} polls (DOUT stuck high?)",
            self.config.ready_poll_limit
        )
    }
}
