//! Simulated HX711 for host-side testing
//!
//! [`SimulatedHx711`] models the chip's side of the PD_SCK/DOUT protocol and
//! hands out `embedded-hal` pin and delay handles that share its state, so the
//! real [`Hx711`](crate::Hx711) driver can run against it unmodified. Time is
//! virtual: it advances only through [`SimDelay`], which makes the clock-high
//! hold measurements exact.
//!
//! Modelled behavior:
//! - DOUT is low while a queued conversion waits to be shifted out, and high
//!   while powered down or when nothing is queued.
//! - The n-th rising edge of a cycle presents data bit `24 - n` (MSB first);
//!   pulses 25–27 hold DOUT high.
//! - A cycle ends when DOUT is polled with PD_SCK low after at least 24
//!   pulses, or when the chip powers down. It also ends when DOUT is sampled
//!   with PD_SCK high past the 24th pulse while a conversion is queued: that
//!   pulse is the first data bit of the next conversion, so back-to-back reads
//!   need no readiness poll in between. 25/26/27 pulses latch the selection
//!   for the next conversion; any other count is a protocol error.
//! - PD_SCK high for [`POWER_DOWN_THRESHOLD_US`] or longer powers the chip
//!   down. The following falling edge resets it to [`Gain::ChannelA128`].
//!   Queued conversions survive the power cycle.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::gain::Gain;
use crate::raw::{shift_in, RAW_MASK};
use crate::timing::{DATA_BITS, POWER_DOWN_THRESHOLD_US};

#[allow(clippy::arithmetic_side_effects, clippy::cast_lossless)] // const-evaluated
const POWER_DOWN_THRESHOLD_NS: u64 = POWER_DOWN_THRESHOLD_US as u64 * 1_000;

/// One conversion cycle as seen from the chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRecord {
    /// Conversion that was shifted out, `None` if nothing was queued.
    pub value: Option<u32>,
    /// DOUT levels sampled while PD_SCK was high, in order.
    pub sampled: Vec<bool>,
    /// PD_SCK pulses in the cycle.
    pub pulses: u8,
    /// Selection the conversion was taken with.
    pub conversion_gain: Gain,
    /// Selection latched for the next conversion; `None` on a protocol error.
    pub latched: Option<Gain>,
    /// High time of every pulse, in nanoseconds.
    pub high_holds_ns: Vec<u64>,
}

impl ReadRecord {
    /// The first 24 sampled levels assembled MSB first.
    pub fn sampled_value(&self) -> u32 {
        self.sampled
            .iter()
            .take(usize::from(DATA_BITS))
            .fold(0, |acc, &bit| shift_in(acc, bit))
    }

    /// Shortest pulse high time in the cycle, in nanoseconds.
    pub fn min_high_hold_ns(&self) -> Option<u64> {
        self.high_holds_ns.iter().copied().min()
    }

    /// Longest pulse high time in the cycle, in nanoseconds.
    pub fn max_high_hold_ns(&self) -> Option<u64> {
        self.high_holds_ns.iter().copied().max()
    }
}

#[derive(Debug)]
struct ChipState {
    now_ns: u64,
    clock_high: bool,
    rose_at_ns: u64,
    powered_down: bool,
    selected: Gain,
    pending: VecDeque<u32>,

    // current cycle
    pulses: u8,
    current: Option<u32>,
    cycle_gain: Gain,
    sampled: Vec<bool>,
    high_holds_ns: Vec<u64>,

    reads: Vec<ReadRecord>,
    protocol_errors: usize,
    rising_edges: usize,
    power_downs: usize,
    power_cycles: usize,
}

#[allow(clippy::arithmetic_side_effects)] // simulation counters and virtual time
impl ChipState {
    fn new() -> Self {
        Self {
            now_ns: 0,
            clock_high: false,
            rose_at_ns: 0,
            powered_down: false,
            selected: Gain::default(),
            pending: VecDeque::new(),
            pulses: 0,
            current: None,
            cycle_gain: Gain::default(),
            sampled: Vec::new(),
            high_holds_ns: Vec::new(),
            reads: Vec::new(),
            protocol_errors: 0,
            rising_edges: 0,
            power_downs: 0,
            power_cycles: 0,
        }
    }

    fn advance(&mut self, ns: u64) {
        self.now_ns += ns;
        if self.clock_high
            && !self.powered_down
            && self.now_ns - self.rose_at_ns >= POWER_DOWN_THRESHOLD_NS
        {
            self.enter_power_down();
        }
    }

    fn clock_rise(&mut self) {
        if self.clock_high {
            return;
        }
        self.clock_high = true;
        self.rose_at_ns = self.now_ns;
        self.rising_edges += 1;

        if self.pulses == 0 {
            self.current = self.pending.pop_front();
            self.cycle_gain = self.selected;
        }
        self.pulses = self.pulses.saturating_add(1);
    }

    fn clock_fall(&mut self) {
        if !self.clock_high {
            return;
        }
        self.clock_high = false;

        if self.powered_down {
            self.powered_down = false;
            self.selected = Gain::ChannelA128;
            self.power_cycles += 1;
        } else {
            self.high_holds_ns.push(self.now_ns - self.rose_at_ns);
        }
    }

    fn enter_power_down(&mut self) {
        self.powered_down = true;
        self.power_downs += 1;

        // The edge that started the hold is not a clock pulse.
        self.pulses = self.pulses.saturating_sub(1);
        if self.pulses == 0 {
            if let Some(value) = self.current.take() {
                self.pending.push_front(value);
            }
        } else {
            self.finish_cycle();
        }
    }

    fn dout_high(&self) -> bool {
        if self.powered_down {
            return true;
        }
        match self.pulses {
            0 => self.pending.is_empty(),
            n @ 1..=DATA_BITS => self
                .current
                .map_or(true, |v| (v >> (DATA_BITS - n)) & 1 == 1),
            _ => true,
        }
    }

    fn read_dout(&mut self) -> bool {
        self.settle();
        if self.clock_high
            && !self.powered_down
            && self.pulses > DATA_BITS
            && !self.pending.is_empty()
        {
            self.restart_cycle();
        }
        let level = self.dout_high();
        if self.clock_high && !self.powered_down && self.pulses > 0 {
            self.sampled.push(level);
        }
        level
    }

    /// Close a cycle whose data bits have all been clocked out.
    fn settle(&mut self) {
        if !self.clock_high && self.pulses >= DATA_BITS {
            self.finish_cycle();
        }
    }

    /// The pulse in progress is the first data bit of the next conversion,
    /// not a selection pulse of the previous one.
    fn restart_cycle(&mut self) {
        self.pulses -= 1;
        self.finish_cycle();
        self.current = self.pending.pop_front();
        self.cycle_gain = self.selected;
        self.pulses = 1;
    }

    fn finish_cycle(&mut self) {
        if self.pulses == 0 {
            return;
        }
        let latched = Gain::from_total_pulses(self.pulses);
        match latched {
            Some(gain) => self.selected = gain,
            None => self.protocol_errors += 1,
        }
        self.reads.push(ReadRecord {
            value: self.current.take(),
            sampled: core::mem::take(&mut self.sampled),
            pulses: self.pulses,
            conversion_gain: self.cycle_gain,
            latched,
            high_holds_ns: core::mem::take(&mut self.high_holds_ns),
        });
        self.pulses = 0;
    }
}

/// Simulated HX711 chip.
///
/// Cloning yields another handle onto the same chip.
#[derive(Debug, Clone)]
pub struct SimulatedHx711 {
    state: Rc<RefCell<ChipState>>,
}

impl SimulatedHx711 {
    /// Create a powered-up chip with no conversion queued.
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(ChipState::new())),
        }
    }

    /// Queue a 24-bit conversion result; bits above 23 are dropped.
    pub fn push_conversion(&self, raw: u32) {
        self.state.borrow_mut().pending.push_back(raw & RAW_MASK);
    }

    /// Conversions queued and not yet shifted out.
    pub fn pending_conversions(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// PD_SCK handle.
    pub fn clock(&self) -> SimClock {
        SimClock(Rc::clone(&self.state))
    }

    /// DOUT handle.
    pub fn data(&self) -> SimData {
        SimData(Rc::clone(&self.state))
    }

    /// Delay handle driving the virtual clock.
    pub fn delay(&self) -> SimDelay {
        SimDelay(Rc::clone(&self.state))
    }

    /// Selection the chip will use for its next conversion.
    pub fn selected_gain(&self) -> Gain {
        let mut state = self.state.borrow_mut();
        state.settle();
        state.selected
    }

    /// Whether the chip is in power-down.
    pub fn is_powered_down(&self) -> bool {
        self.state.borrow().powered_down
    }

    /// Completed conversion cycles, oldest first.
    pub fn reads(&self) -> Vec<ReadRecord> {
        let mut state = self.state.borrow_mut();
        state.settle();
        state.reads.clone()
    }

    /// Most recent completed conversion cycle.
    pub fn last_read(&self) -> Option<ReadRecord> {
        self.reads().pop()
    }

    /// Cycles that ended with a pulse count outside 25–27.
    pub fn protocol_errors(&self) -> usize {
        let mut state = self.state.borrow_mut();
        state.settle();
        state.protocol_errors
    }

    /// Every PD_SCK rising edge seen, including power-down holds.
    pub fn rising_edges(&self) -> usize {
        self.state.borrow().rising_edges
    }

    /// Times the chip entered power-down.
    pub fn power_downs(&self) -> usize {
        self.state.borrow().power_downs
    }

    /// Times the chip woke from power-down (and reset).
    pub fn power_cycles(&self) -> usize {
        self.state.borrow().power_cycles
    }

    /// Virtual time elapsed, in nanoseconds.
    pub fn elapsed_ns(&self) -> u64 {
        self.state.borrow().now_ns
    }

    /// Virtual time elapsed, in whole microseconds.
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_ns() / 1_000
    }
}

impl Default for SimulatedHx711 {
    fn default() -> Self {
        Self::new()
    }
}

/// PD_SCK input of a [`SimulatedHx711`].
#[derive(Debug)]
pub struct SimClock(Rc<RefCell<ChipState>>);

impl ErrorType for SimClock {
    type Error = Infallible;
}

impl OutputPin for SimClock {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().clock_fall();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().clock_rise();
        Ok(())
    }
}

/// DOUT output of a [`SimulatedHx711`].
#[derive(Debug)]
pub struct SimData(Rc<RefCell<ChipState>>);

impl ErrorType for SimData {
    type Error = Infallible;
}

impl InputPin for SimData {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.borrow_mut().read_dout())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.borrow_mut().read_dout())
    }
}

/// Delay provider advancing a [`SimulatedHx711`]'s virtual time.
#[derive(Debug)]
pub struct SimDelay(Rc<RefCell<ChipState>>);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().advance(u64::from(ns));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn pulse(clock: &mut SimClock, delay: &mut SimDelay) {
        clock.set_high().unwrap();
        delay.delay_us(1);
        clock.set_low().unwrap();
    }

    #[test]
    fn dout_low_only_with_queued_conversion() {
        let sim = SimulatedHx711::new();
        let mut data = sim.data();
        assert!(data.is_high().unwrap());
        sim.push_conversion(0);
        assert!(data.is_low().unwrap());
    }

    #[test]
    fn bits_presented_msb_first() {
        let sim = SimulatedHx711::new();
        let (mut clock, mut data, mut delay) = (sim.clock(), sim.data(), sim.delay());
        sim.push_conversion(0b1010 << 20);
        let mut seen = Vec::new();
        for _ in 0..4 {
            clock.set_high().unwrap();
            seen.push(data.is_high().unwrap());
            delay.delay_us(1);
            clock.set_low().unwrap();
        }
        assert_eq!(seen, [true, false, true, false]);
    }

    #[test]
    fn long_high_hold_powers_down_and_resets_gain() {
        let sim = SimulatedHx711::new();
        let (mut clock, mut data, mut delay) = (sim.clock(), sim.data(), sim.delay());
        sim.push_conversion(0);
        for _ in 0..27 {
            pulse(&mut clock, &mut delay);
        }
        assert!(data.is_high().unwrap());
        assert_eq!(sim.selected_gain(), Gain::ChannelA64);

        clock.set_high().unwrap();
        delay.delay_us(59);
        assert!(!sim.is_powered_down());
        delay.delay_us(1);
        assert!(sim.is_powered_down());
        clock.set_low().unwrap();
        assert_eq!(sim.power_cycles(), 1);
        assert_eq!(sim.selected_gain(), Gain::ChannelA128);
    }

    #[test]
    fn out_of_range_pulse_count_is_protocol_error() {
        let sim = SimulatedHx711::new();
        let (mut clock, mut data, mut delay) = (sim.clock(), sim.data(), sim.delay());
        sim.push_conversion(0);
        for _ in 0..28 {
            pulse(&mut clock, &mut delay);
        }
        let _ = data.is_low().unwrap();
        assert_eq!(sim.protocol_errors(), 1);
        assert_eq!(sim.last_read().unwrap().latched, None);
        assert_eq!(sim.selected_gain(), Gain::ChannelA128);
    }

    #[test]
    fn power_down_right_after_read_closes_cycle() {
        let sim = SimulatedHx711::new();
        let (mut clock, mut delay) = (sim.clock(), sim.delay());
        sim.push_conversion(0);
        for _ in 0..26 {
            pulse(&mut clock, &mut delay);
        }
        clock.set_high().unwrap();
        delay.delay_us(100);
        let reads = sim.reads();
        assert_eq!(reads.len(), 1);
        assert_eq!(reads[0].pulses, 26);
        assert_eq!(reads[0].latched, Some(Gain::ChannelB32));
    }

    #[test]
    fn power_down_before_any_pulse_keeps_conversion_queued() {
        let sim = SimulatedHx711::new();
        let (mut clock, mut delay) = (sim.clock(), sim.delay());
        sim.push_conversion(0x42);
        clock.set_high().unwrap();
        delay.delay_us(100);
        clock.set_low().unwrap();
        assert!(sim.reads().is_empty());
        assert_eq!(sim.pending_conversions(), 1);
    }

    #[test]
    fn data_sample_after_selection_pulses_starts_next_conversion() {
        let sim = SimulatedHx711::new();
        let (mut clock, mut data, mut delay) = (sim.clock(), sim.data(), sim.delay());
        sim.push_conversion(0);
        sim.push_conversion(0x80_0000);
        for _ in 0..26 {
            pulse(&mut clock, &mut delay);
        }
        clock.set_high().unwrap();
        assert!(data.is_high().unwrap(), "bit 23 of the second conversion");
        delay.delay_us(1);
        clock.set_low().unwrap();

        let reads = sim.reads();
        assert_eq!(reads.len(), 1);
        assert_eq!(reads[0].pulses, 26);
        assert_eq!(reads[0].latched, Some(Gain::ChannelB32));
        assert_eq!(sim.pending_conversions(), 0);
        assert_eq!(sim.protocol_errors(), 0);
    }

    #[test]
    fn selection_pulses_without_queued_data_stay_in_cycle() {
        let sim = SimulatedHx711::new();
        let (mut clock, mut data, mut delay) = (sim.clock(), sim.data(), sim.delay());
        sim.push_conversion(0);
        for _ in 0..25 {
            pulse(&mut clock, &mut delay);
        }
        clock.set_high().unwrap();
        assert!(data.is_high().unwrap());
        delay.delay_us(1);
        clock.set_low().unwrap();
        assert_eq!(sim.last_read().unwrap().pulses, 26);
    }

    #[test]
    fn clones_share_state() {
        let sim = SimulatedHx711::new();
        let other = sim.clone();
        other.push_conversion(1);
        assert_eq!(sim.pending_conversions(), 1);
    }
}
