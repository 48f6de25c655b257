//! Driver for the HX711 24-bit load-cell ADC
//!
//! The HX711 digitizes the differential voltage of a strain-gauge bridge and
//! hands the result out over a two-wire, software-clocked serial line:
//!
//! ```text
//! MCU                       HX711
//! PD_SCK (OutputPin) ────▶  clock in / power-down control
//! DOUT   (InputPin)  ◀────  data out / ready flag (active low)
//! ```
//!
//! There is no chip-select and no addressing, so every chip needs its own pin
//! pair. The crate is built on `embedded-hal` 1.0 traits: the driver owns an
//! [`OutputPin`](embedded_hal::digital::OutputPin) for the clock, an
//! [`InputPin`](embedded_hal::digital::InputPin) for the data line and a
//! [`DelayNs`](embedded_hal::delay::DelayNs) provider for the hold times.
//!
//! # Protocol
//!
//! ```text
//!            ┌ 24 data bits, MSB first ┐┌ 1..=3 gain pulses ┐
//! PD_SCK ____▔_▔_▔_ ... _▔_▔_▔_▔________▔______▔______▔_____
//! DOUT   ▔▔▔▔\__ bit23 ... bit0 ___/▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔▔
//! ```
//!
//! The number of pulses after the 24th bit selects channel and gain for the
//! *next* conversion (see [`Gain`]). Holding PD_SCK high for more than
//! [`timing::POWER_DOWN_THRESHOLD_US`] puts the chip to sleep; pulling it low
//! again resets it to [`Gain::ChannelA128`].
//!
//! # Features
//!
//! - `std`: simulated chip in [`mocks`] for host-side testing
//! - `defmt`: `defmt::Format` derives and protocol trace logging
//!
//! # Example
//!
//! ```no_run
//! use embedded_hal::{delay::DelayNs, digital::{InputPin, OutputPin}};
//! use hx711::{Error, Gain, Hx711};
//!
//! fn sample<C: OutputPin, D: InputPin, T: DelayNs>(
//!     clock: C,
//!     data: D,
//!     delay: T,
//! ) -> Result<i32, Error<C::Error, D::Error>> {
//!     let mut adc = Hx711::with_gain(clock, data, delay, Gain::ChannelA64);
//!     adc.setup()?;
//!     while !adc.is_ready()? {}
//!     adc.read_raw()
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_code)] // pure bit-banging over HAL traits; no register access here
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
// Pedantic lints suppressed for this driver crate:
#![allow(clippy::doc_markdown)] // pin names (PD_SCK, DOUT) in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors; callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod driver;
pub mod error;
pub mod gain;
pub mod raw;
pub mod timing;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

pub use driver::{Hx711, PowerState};
pub use error::Error;
pub use gain::{Channel, Gain, InvalidGain};
pub use raw::{is_saturated, sign_extend_24, RAW_MAX, RAW_MIN};
