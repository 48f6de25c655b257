//! Property-based tests for raw value handling and the pulse train.
//! Verifies invariants hold for ALL 24-bit codes, not just fixed examples.

#![allow(clippy::unwrap_used)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_possible_wrap)]

use hx711::mocks::SimulatedHx711;
use hx711::{is_saturated, sign_extend_24, Gain, Hx711, RAW_MAX, RAW_MIN};

fn gain_strategy() -> impl proptest::strategy::Strategy<Value = Gain> {
    proptest::sample::select(Gain::ALL.to_vec())
}

proptest::proptest! {
    /// Codes with bit 23 clear are returned unchanged.
    #[test]
    fn positive_codes_are_zero_extended(raw in 0u32..0x80_0000) {
        proptest::prop_assert_eq!(sign_extend_24(raw), raw as i32);
    }

    /// Codes with bit 23 set come back as raw - 2^24.
    #[test]
    fn negative_codes_wrap_by_2_pow_24(raw in 0x80_0000u32..=0xFF_FFFF) {
        proptest::prop_assert_eq!(i64::from(sign_extend_24(raw)), i64::from(raw) - (1 << 24));
    }

    /// Every reading lands between the two rails.
    #[test]
    fn sign_extended_value_within_rails(raw in proptest::prelude::any::<u32>()) {
        let v = sign_extend_24(raw);
        proptest::prop_assert!((RAW_MIN..=RAW_MAX).contains(&v));
        proptest::prop_assert_eq!(is_saturated(v), v == RAW_MIN || v == RAW_MAX);
    }

    /// A full read over the simulated wire returns the sign-extended code
    /// and clocks 24 + gain pulses.
    #[test]
    fn simulated_read_matches_code(raw in 0u32..=0xFF_FFFF, gain in gain_strategy()) {
        let sim = SimulatedHx711::new();
        let mut adc = Hx711::with_gain(sim.clock(), sim.data(), sim.delay(), gain);
        adc.setup().unwrap();
        sim.push_conversion(raw);

        proptest::prop_assert!(adc.is_ready().unwrap());
        proptest::prop_assert_eq!(adc.read_raw().unwrap(), sign_extend_24(raw));

        let read = sim.last_read().unwrap();
        proptest::prop_assert_eq!(read.sampled_value(), raw);
        proptest::prop_assert_eq!(read.pulses, gain.total_pulses());
        proptest::prop_assert!((25..=27).contains(&read.pulses));
    }
}
