//! Raw conversion values.
//!
//! The chip reports a 24-bit two's-complement code. Out-of-range bridge input
//! is not flagged by any status bit: the code simply sits on one of the rails
//! below.

/// Smallest raw reading (`0x800000` sign-extended), returned for input
/// at or below negative full scale.
pub const RAW_MIN: i32 = -0x80_0000;

/// Largest raw reading (`0x7FFFFF`), returned for input at or above
/// positive full scale.
pub const RAW_MAX: i32 = 0x7F_FFFF;

/// Mask of the 24 data bits.
pub const RAW_MASK: u32 = 0x00FF_FFFF;

/// Sign-extend a 24-bit two's-complement code to `i32`.
///
/// Bits above bit 23 are ignored. The code is placed in the high 24 bits and
/// shifted back with an arithmetic shift, so negative codes come out as
/// `raw - 2^24` (truncating division by 256 would round them toward zero).
#[inline]
#[must_use]
#[allow(clippy::arithmetic_side_effects)] // fixed 8-bit shifts on a u32/i32
#[allow(clippy::cast_possible_wrap)] // bit 23 becomes the i32 sign bit on purpose
pub const fn sign_extend_24(raw: u32) -> i32 {
    ((raw << 8) as i32) >> 8
}

/// Shift one data bit into the accumulator, MSB first.
#[inline]
#[must_use]
#[allow(clippy::arithmetic_side_effects)] // at most 24 shifts; bits above 23 are masked
pub(crate) const fn shift_in(acc: u32, bit: bool) -> u32 {
    ((acc << 1) | bit as u32) & RAW_MASK
}

/// Whether `value` sits on either rail ([`RAW_MIN`] or [`RAW_MAX`]).
#[inline]
#[must_use]
pub const fn is_saturated(value: i32) -> bool {
    value == RAW_MIN || value == RAW_MAX
}
