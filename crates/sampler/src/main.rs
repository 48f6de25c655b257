//! Desktop sampling run against the simulated HX711.
//!
//! ```bash
//! RUST_LOG=debug cargo run -p sampler
//! ```

#![allow(clippy::use_debug)]

use std::thread;

use anyhow::{Context, Result};
use hx711::mocks::SimulatedHx711;
use hx711::Hx711;
use tracing::{info, warn};

use sampler::config::{SamplerConfig, APP_NAME, APP_VERSION};
use sampler::load::SyntheticLoad;
use sampler::{logging, Sampler};

fn main() -> Result<()> {
    logging::init();

    let config = SamplerConfig::default();
    info!(
        version = APP_VERSION,
        gain = ?config.gain,
        samples = config.count,
        interval_ms = config.interval.as_millis(),
        "{APP_NAME} starting"
    );

    let chip = SimulatedHx711::new();
    let mut load = SyntheticLoad::new();

    let adc = Hx711::new(chip.clock(), chip.data(), chip.delay());
    let mut sampler = Sampler::new(adc, config.clone());
    sampler.start().context("HX711 setup failed")?;
    thread::sleep(config.settle);

    for n in 0..config.count {
        for _ in 0..sampler.conversions_per_sample() {
            chip.push_conversion(load.next_code());
        }

        let sample = sampler
            .sample()
            .with_context(|| format!("sample {n} failed"))?;

        info!(
            index = sample.index,
            code = %format_args!("{:#08x}", sample.code()),
            raw = sample.raw,
            saturated = sample.saturated(),
            "sample"
        );
        if sample.saturated() {
            warn!(
                index = sample.index,
                "reading on the rail; bridge input outside the {:?} range",
                sample.gain
            );
        }

        thread::sleep(config.interval);
    }

    info!(
        conversions = chip.reads().len(),
        protocol_errors = chip.protocol_errors(),
        power_cycles = chip.power_cycles(),
        wire_time_us = chip.elapsed_us(),
        "{APP_NAME} done"
    );
    Ok(())
}
