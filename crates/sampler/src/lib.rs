//! HX711 sampling loop
//!
//! The caller side of the driver contract: `setup()` once, then per sample
//! power up, wait for DOUT, read, power down, sleep. `main.rs` runs it on a
//! desktop against [`hx711::mocks::SimulatedHx711`]; [`acquire::Sampler`] is
//! generic over `embedded-hal` pins and runs unchanged on a board HAL.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::dbg_macro)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Desktop crate: Debug output of gains in log fields is fine here.
#![allow(clippy::use_debug)]

pub mod acquire;
pub mod config;
pub mod load;
pub mod logging;

pub use acquire::{Sample, Sampler};
pub use config::SamplerConfig;
