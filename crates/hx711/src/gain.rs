//! Channel and gain selection.
//!
//! The HX711 has no register interface: the selection for the next conversion
//! is encoded as the number of PD_SCK pulses sent after the 24th data bit.
//!
//! | Pulses | Channel | Gain | Full-scale input (AVDD = 5 V) |
//! |--------|---------|------|-------------------------------|
//! | 25     | A       | 128  | ±20 mV                        |
//! | 26     | B       | 32   | ±80 mV                        |
//! | 27     | A       | 64   | ±40 mV                        |

use crate::timing::DATA_BITS;

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a numeric gain factor is not one the chip supports.
///
/// Carries the rejected value. Valid factors are 128, 64 (channel A) and
/// 32 (channel B).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidGain(pub u8);

impl core::fmt::Display for InvalidGain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unsupported HX711 gain {} (expected 128, 64 or 32)", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidGain {}

// ── Channel ──────────────────────────────────────────────────────────────────

/// Differential input pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// INA+/INA- (gain 128 or 64)
    A,
    /// INB+/INB- (gain fixed at 32)
    B,
}

// ── Gain ─────────────────────────────────────────────────────────────────────

/// Channel/gain selection applied to the conversion after the next read.
///
/// The closed set of variants keeps the trailing pulse count in `1..=3`, so
/// every read clocks 25–27 pulses. [`Gain::default`] is the chip's own reset
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// Channel A, gain 128 (1 trailing pulse).
    #[default]
    ChannelA128,
    /// Channel B, gain 32 (2 trailing pulses).
    ChannelB32,
    /// Channel A, gain 64 (3 trailing pulses).
    ChannelA64,
}

impl Gain {
    /// Every selection, in pulse-count order.
    pub const ALL: [Gain; 3] = [Gain::ChannelA128, Gain::ChannelB32, Gain::ChannelA64];

    /// Clock pulses appended after the 24 data bits.
    #[must_use]
    pub const fn pulses(self) -> u8 {
        match self {
            Self::ChannelA128 => 1,
            Self::ChannelB32 => 2,
            Self::ChannelA64 => 3,
        }
    }

    /// Total clock pulses for one read with this selection (25, 26 or 27).
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)] // 24 + at most 3
    pub const fn total_pulses(self) -> u8 {
        DATA_BITS + self.pulses()
    }

    /// Input pair this selection converts.
    #[must_use]
    pub const fn channel(self) -> Channel {
        match self {
            Self::ChannelA128 | Self::ChannelA64 => Channel::A,
            Self::ChannelB32 => Channel::B,
        }
    }

    /// Amplification factor.
    #[must_use]
    pub const fn factor(self) -> u8 {
        match self {
            Self::ChannelA128 => 128,
            Self::ChannelB32 => 32,
            Self::ChannelA64 => 64,
        }
    }

    /// Selection latched by a conversion cycle of `pulses` total clock pulses.
    ///
    /// Returns `None` outside 25–27; the chip treats such a cycle as a
    /// serial communication error.
    #[must_use]
    pub const fn from_total_pulses(pulses: u8) -> Option<Self> {
        match pulses {
            25 => Some(Self::ChannelA128),
            26 => Some(Self::ChannelB32),
            27 => Some(Self::ChannelA64),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Gain {
    type Error = InvalidGain;

    /// Parse a numeric gain factor (128, 64 or 32).
    fn try_from(factor: u8) -> Result<Self, Self::Error> {
        match factor {
            128 => Ok(Self::ChannelA128),
            64 => Ok(Self::ChannelA64),
            32 => Ok(Self::ChannelB32),
            other => Err(InvalidGain(other)),
        }
    }
}

impl From<Gain> for u8 {
    fn from(gain: Gain) -> Self {
        gain.factor()
    }
}
