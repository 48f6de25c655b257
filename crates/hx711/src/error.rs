//! Driver error type
//!
//! The HX711 protocol itself has no failure signalling: no checksum, no
//! acknowledge, no retry. A read taken before DOUT goes low, or with the host
//! violating the hold times, returns a plausible but wrong number. The only
//! errors the driver can observe are faults reported by the GPIO layer.

/// Driver errors
///
/// `CE` is the clock pin's error type, `DE` the data pin's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<CE, DE> {
    /// Driving PD_SCK failed
    Clock(CE),
    /// Sampling DOUT failed
    Data(DE),
}

#[cfg(feature = "std")]
impl<CE: core::fmt::Debug, DE: core::fmt::Debug> std::error::Error for Error<CE, DE> {}

#[allow(clippy::use_debug)] // HAL pin errors only guarantee Debug
impl<CE: core::fmt::Debug, DE: core::fmt::Debug> core::fmt::Display for Error<CE, DE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Clock(e) => write!(f, "HX711 clock pin (PD_SCK) error: {e:?}"),
            Self::Data(e) => write!(f, "HX711 data pin (DOUT) error: {e:?}"),
        }
    }
}
