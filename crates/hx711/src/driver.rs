//! HX711 converter driver
//!
//! Bit-bangs the PD_SCK/DOUT protocol over `embedded-hal` 1.0 pins. All
//! operations are blocking: a read clocks 25–27 pulses back to back with
//! busy-wait holds from the [`DelayNs`] provider and cannot be cancelled once
//! started.
//!
//! # Caller contract
//!
//! ```text
//! setup()                               once, before anything else
//! loop {
//!     power_up()                        optional
//!     while !is_ready()? {}             caller owns the wait/backoff policy
//!     read_raw()?
//!     power_down()                      optional
//! }
//! ```
//!
//! `read_raw()` does not check readiness and `power_up()` does not restore a
//! non-default [`Gain`]; both are left to the caller.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::Error;
use crate::gain::Gain;
use crate::raw::{shift_in, sign_extend_24};
use crate::timing::{DATA_BITS, DATA_CLOCK_HIGH_US, GAIN_PULSE_LOW_US, POWER_DOWN_HOLD_US};

/// Driver-side record of the last power command.
///
/// Whether a conversion is ready is a chip condition read through
/// [`Hx711::is_ready`], not tracked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// PD_SCK low, chip converting.
    Active,
    /// PD_SCK held high past the power-down threshold.
    PoweredDown,
}

/// HX711 driver.
///
/// Owns the PD_SCK output, the DOUT input and the delay provider. One
/// instance per chip.
pub struct Hx711<CLK, DOUT, D> {
    clock: CLK,
    data: DOUT,
    delay: D,
    gain: Gain,
    power: PowerState,
}

impl<CLK, DOUT, D> Hx711<CLK, DOUT, D>
where
    CLK: OutputPin,
    DOUT: InputPin,
    D: DelayNs,
{
    /// Create a driver selecting channel A, gain 128.
    ///
    /// Does not touch the pins; call [`setup`](Self::setup) before reading.
    pub fn new(clock: CLK, data: DOUT, delay: D) -> Self {
        Self::with_gain(clock, data, delay, Gain::default())
    }

    /// Create a driver with an initial selection.
    ///
    /// The selection reaches the chip through the pulses at the end of the
    /// first read.
    pub fn with_gain(clock: CLK, data: DOUT, delay: D, gain: Gain) -> Self {
        Self {
            clock,
            data,
            delay,
            gain,
            power: PowerState::Active,
        }
    }

    /// Bring the chip to a known state by cycling power.
    ///
    /// Pin directions are fixed by the HAL types handed to the constructor;
    /// this only drives PD_SCK. Call once before any other hardware access.
    pub fn setup(&mut self) -> Result<(), Error<CLK::Error, DOUT::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("HX711 setup: power cycle, gain={}", self.gain);

        self.power_down()?;
        self.power_up()
    }

    /// Select channel and gain for the conversion after the next read.
    ///
    /// No pin activity: the pulses that latch the selection are sent at the
    /// tail of the next [`read_raw`](Self::read_raw).
    pub fn set_gain(&mut self, gain: Gain) {
        #[cfg(feature = "defmt")]
        defmt::trace!("HX711 gain -> {} ({=u8} pulses)", gain, gain.pulses());

        self.gain = gain;
    }

    /// Selection the driver will send after the next read.
    pub fn gain(&self) -> Gain {
        self.gain
    }

    /// Last power command issued.
    pub fn power_state(&self) -> PowerState {
        self.power
    }

    /// `true` if DOUT is low, i.e. a conversion is waiting to be shifted out.
    ///
    /// A single non-blocking poll.
    pub fn is_ready(&mut self) -> Result<bool, Error<CLK::Error, DOUT::Error>> {
        self.data.is_low().map_err(Error::Data)
    }

    /// Shift out one conversion and return it sign-extended.
    ///
    /// The chip must be ready (see [`is_ready`](Self::is_ready)); otherwise
    /// the result is whatever DOUT happens to show, typically `-1`. Blocks for
    /// the full 25–27 pulse sequence. On a pin error the sequence is
    /// abandoned mid-way and the chip needs a power cycle to resynchronize.
    pub fn read_raw(&mut self) -> Result<i32, Error<CLK::Error, DOUT::Error>> {
        let mut raw = 0u32;
        for _ in 0..DATA_BITS {
            self.clock.set_high().map_err(Error::Clock)?;
            self.delay.delay_us(DATA_CLOCK_HIGH_US);
            let bit = self.data.is_high().map_err(Error::Data)?;
            raw = shift_in(raw, bit);
            self.clock.set_low().map_err(Error::Clock)?;
        }

        self.pulse_gain()?;

        let value = sign_extend_24(raw);

        #[cfg(feature = "defmt")]
        defmt::trace!("HX711 read raw={=u32:#x} value={=i32}", raw, value);

        Ok(value)
    }

    /// Put the chip to sleep by holding PD_SCK high past the threshold.
    ///
    /// Must not be called during a read; it shares the clock line.
    pub fn power_down(&mut self) -> Result<(), Error<CLK::Error, DOUT::Error>> {
        self.clock.set_high().map_err(Error::Clock)?;
        self.delay.delay_us(POWER_DOWN_HOLD_US);
        self.power = PowerState::PoweredDown;

        #[cfg(feature = "defmt")]
        defmt::debug!("HX711 powered down");

        Ok(())
    }

    /// Wake the chip by pulling PD_SCK low.
    ///
    /// The chip resets and reverts to [`Gain::ChannelA128`] for its next
    /// conversion. The driver's own selection is left as is and will only be
    /// re-sent after the next read.
    pub fn power_up(&mut self) -> Result<(), Error<CLK::Error, DOUT::Error>> {
        self.clock.set_low().map_err(Error::Clock)?;
        self.power = PowerState::Active;

        #[cfg(feature = "defmt")]
        if self.gain != Gain::default() {
            defmt::warn!(
                "HX711 powered up at chip default gain; {} applies from the second read",
                self.gain
            );
        }

        Ok(())
    }

    /// Release the pins and the delay provider.
    pub fn release(self) -> (CLK, DOUT, D) {
        (self.clock, self.data, self.delay)
    }

    /// Trailing pulses that latch the next selection and return DOUT high.
    fn pulse_gain(&mut self) -> Result<(), Error<CLK::Error, DOUT::Error>> {
        for _ in 0..self.gain.pulses() {
            self.clock.set_high().map_err(Error::Clock)?;
            self.delay.delay_us(DATA_CLOCK_HIGH_US);
            self.clock.set_low().map_err(Error::Clock)?;
            self.delay.delay_us(GAIN_PULSE_LOW_US);
        }
        Ok(())
    }
}
