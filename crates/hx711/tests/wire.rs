//! Wire-level expectations with `embedded-hal-mock` pins.
//! Every PD_SCK edge and DOUT sample must appear exactly as listed.

#![allow(clippy::unwrap_used)]
#![allow(clippy::arithmetic_side_effects)]

use embedded_hal::delay::DelayNs;
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
use hx711::timing::{DATA_CLOCK_HIGH_US, GAIN_PULSE_LOW_US, POWER_DOWN_HOLD_US};
use hx711::{Gain, Hx711};

/// Delay provider that records every requested hold.
#[derive(Default)]
struct RecordingDelay {
    holds_ns: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.holds_ns.push(ns);
    }
}

fn clock_pulses(n: usize) -> Vec<PinTransaction> {
    (0..n)
        .flat_map(|_| [PinTransaction::set(State::High), PinTransaction::set(State::Low)])
        .collect()
}

fn dout_bits(raw: u32) -> Vec<PinTransaction> {
    (0..24)
        .rev()
        .map(|bit| {
            let state = if (raw >> bit) & 1 == 1 { State::High } else { State::Low };
            PinTransaction::get(state)
        })
        .collect()
}

#[test]
fn setup_is_power_down_then_power_up() {
    let clock_expect = [PinTransaction::set(State::High), PinTransaction::set(State::Low)];
    let clock = PinMock::new(&clock_expect);
    let data = PinMock::new(&[]);

    let mut adc = Hx711::new(clock, data, RecordingDelay::default());
    adc.setup().unwrap();

    let (mut clock, mut data, delay) = adc.release();
    assert_eq!(delay.holds_ns, [POWER_DOWN_HOLD_US * 1_000]);
    clock.done();
    data.done();
}

#[test]
fn read_0x123456_emits_25_pulses_and_samples_msb_first() {
    let clock = PinMock::new(&clock_pulses(25));
    let mut data_expect = vec![PinTransaction::get(State::Low)];
    data_expect.extend(dout_bits(0x12_3456));
    let data = PinMock::new(&data_expect);

    let mut adc = Hx711::new(clock, data, RecordingDelay::default());
    assert!(adc.is_ready().unwrap());
    assert_eq!(adc.read_raw().unwrap(), 1_193_046);

    let (mut clock, mut data, delay) = adc.release();
    let mut expected_holds = vec![DATA_CLOCK_HIGH_US * 1_000; 24];
    expected_holds.extend([DATA_CLOCK_HIGH_US * 1_000, GAIN_PULSE_LOW_US * 1_000]);
    assert_eq!(delay.holds_ns, expected_holds);
    clock.done();
    data.done();
}

#[test]
fn gain_64_appends_three_pulses() {
    let clock = PinMock::new(&clock_pulses(27));
    let data = PinMock::new(&dout_bits(0xFF_FFFF));

    let mut adc = Hx711::with_gain(clock, data, RecordingDelay::default(), Gain::ChannelA64);
    assert_eq!(adc.read_raw().unwrap(), -1);

    let (mut clock, mut data, _delay) = adc.release();
    clock.done();
    data.done();
}

#[test]
fn is_ready_false_when_dout_high() {
    let clock = PinMock::new(&[]);
    let data = PinMock::new(&[PinTransaction::get(State::High)]);

    let mut adc = Hx711::new(clock, data, RecordingDelay::default());
    assert!(!adc.is_ready().unwrap());

    let (mut clock, mut data, _delay) = adc.release();
    clock.done();
    data.done();
}

#[test]
fn power_up_only_drives_clock_low() {
    let clock = PinMock::new(&[PinTransaction::set(State::Low)]);
    let data = PinMock::new(&[]);

    let mut adc = Hx711::with_gain(clock, data, RecordingDelay::default(), Gain::ChannelB32);
    adc.power_up().unwrap();

    let (mut clock, mut data, delay) = adc.release();
    assert!(delay.holds_ns.is_empty());
    clock.done();
    data.done();
}
