//! Timing contract for the PD_SCK line
//!
//! Every hold below is a *minimum* the host must honor with a precise,
//! non-preemptible delay (busy-wait or hardware timer). Overshooting a clock
//! high phase past [`POWER_DOWN_THRESHOLD_US`] puts the chip to sleep in the
//! middle of a conversion; undershooting a hold may let the chip miss a pulse.
//! Either desynchronizes its pulse counter until the next power cycle.
//!
//! Values follow the HX711 datasheet (AVIA Semiconductor, rev. 2.0), §"Serial
//! Interface" timing table.

/// Number of data bits shifted out per conversion.
pub const DATA_BITS: u8 = 24;

/// Clock-high hold before sampling DOUT, in microseconds.
///
/// Datasheet T2 (PD_SCK rising edge to DOUT valid) is 0.1 µs max and
/// T3 (PD_SCK high time) is 0.2 µs min; 2 µs leaves margin on slow GPIO.
pub const DATA_CLOCK_HIGH_US: u32 = 2;

/// Clock-low hold after each gain-selection pulse, in microseconds.
///
/// Applied to the low phase only: a high phase this long would cross
/// [`POWER_DOWN_THRESHOLD_US`].
pub const GAIN_PULSE_LOW_US: u32 = 60;

/// PD_SCK high time after which the chip enters power-down, in microseconds.
pub const POWER_DOWN_THRESHOLD_US: u32 = 60;

/// PD_SCK high hold used to enter power-down, in microseconds.
pub const POWER_DOWN_HOLD_US: u32 = 100;

/// Fewest clock pulses the chip accepts per conversion (channel A, gain 128).
pub const MIN_PULSES_PER_CONVERSION: u8 = 25;

/// Most clock pulses the chip accepts per conversion (channel A, gain 64).
pub const MAX_PULSES_PER_CONVERSION: u8 = 27;

const _: () = assert!(POWER_DOWN_HOLD_US > POWER_DOWN_THRESHOLD_US);
const _: () = assert!(DATA_CLOCK_HIGH_US < POWER_DOWN_THRESHOLD_US);
#[allow(clippy::arithmetic_side_effects)] // const-evaluated
const _: () = assert!(MIN_PULSES_PER_CONVERSION == DATA_BITS + 1);
#[allow(clippy::arithmetic_side_effects)] // const-evaluated
const _: () = assert!(MAX_PULSES_PER_CONVERSION == DATA_BITS + 3);
