// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Overflow-checked fixed-point nanosecond counts.
//!
//! [`FixedPointNanos`] is the single numeric representation underneath both
//! [`Duration`](crate::Duration) and [`Instant`](crate::Instant). It stores a
//! signed nanosecond count in an `i128`, but the representable range is
//! deliberately narrower than `i128`:
//!
//! ```text
//! MIN = i64::MIN seconds
//! MAX = i64::MAX seconds + 999_999_999 nanoseconds
//! ```
//!
//! so that every `i64` count of seconds (and therefore of milliseconds,
//! microseconds and nanoseconds) fits, and `-MIN` is the one value whose
//! negation does not. Every operation that would leave that range returns
//! [`Error::Overflow`] instead of wrapping.

use crate::error::Error;

pub(crate) const NANOS_PER_MICRO: i128 = 1_000;
pub(crate) const NANOS_PER_MILLI: i128 = 1_000_000;
pub(crate) const NANOS_PER_SECOND: i128 = 1_000_000_000;
pub(crate) const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND;
pub(crate) const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;
pub(crate) const NANOS_PER_DAY: i128 = 24 * NANOS_PER_HOUR;

/// A signed nanosecond count with a fixed, checked range.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FixedPointNanos {
    nanos: i128,
}

impl FixedPointNanos {
    /// Smallest representable value: `i64::MIN` whole seconds.
    pub const MIN: Self = Self {
        nanos: i64::MIN as i128 * NANOS_PER_SECOND,
    };

    /// Largest representable value: `i64::MAX` seconds plus 999 999 999 ns.
    pub const MAX: Self = Self {
        nanos: i64::MAX as i128 * NANOS_PER_SECOND + (NANOS_PER_SECOND - 1),
    };

    /// The additive identity.
    pub const ZERO: Self = Self { nanos: 0 };

    /// Build from a nanosecond count, failing outside of `MIN..=MAX`.
    #[inline]
    pub fn from_nanos(nanos: i128) -> Result<Self, Error> {
        if nanos < Self::MIN.nanos || nanos > Self::MAX.nanos {
            return Err(Error::overflow("nanosecond count outside of representable range"));
        }
        Ok(Self { nanos })
    }

    /// Build from an `i64` count of `unit_nanos`-sized units.
    ///
    /// Any unit up to one second always fits.
    #[inline]
    pub(crate) fn from_units_i64(count: i64, unit_nanos: i128) -> Result<Self, Error> {
        Self::from_nanos(count as i128 * unit_nanos)
    }

    /// Build from an `i64` count of a unit no longer than one second.
    ///
    /// `MIN..=MAX` spans every `i64` second, so this is always in range.
    #[inline]
    pub(crate) const fn from_subsecond_units(count: i64, unit_nanos: i128) -> Self {
        debug_assert!(unit_nanos <= NANOS_PER_SECOND);
        Self {
            nanos: count as i128 * unit_nanos,
        }
    }

    /// Build from whole seconds plus a sub-second nanosecond count.
    ///
    /// Always in range for `nanos < 1_000_000_000`.
    #[inline]
    pub(crate) const fn from_seconds_and_nanos(seconds: i64, nanos: u32) -> Self {
        debug_assert!((nanos as i128) < NANOS_PER_SECOND);
        Self {
            nanos: seconds as i128 * NANOS_PER_SECOND + nanos as i128,
        }
    }

    /// The nanosecond count.
    #[inline]
    pub const fn nanos(&self) -> i128 {
        self.nanos
    }

    /// `self + other`, or `Overflow`.
    #[inline]
    pub fn checked_add(self, other: Self) -> Result<Self, Error> {
        // Both operands are bounded far inside i128, so the raw sum cannot
        // wrap; only the range check can fail.
        Self::from_nanos(self.nanos + other.nanos)
    }

    /// `self - other`, or `Overflow`.
    #[inline]
    pub fn checked_sub(self, other: Self) -> Result<Self, Error> {
        Self::from_nanos(self.nanos - other.nanos)
    }

    /// `-self`, or `Overflow` for [`FixedPointNanos::MIN`].
    #[inline]
    pub fn checked_neg(self) -> Result<Self, Error> {
        Self::from_nanos(-self.nanos)
    }

    /// `self * factor`, or `Overflow`.
    #[inline]
    pub fn checked_mul(self, factor: i64) -> Result<Self, Error> {
        match self.nanos.checked_mul(factor as i128) {
            Some(nanos) => Self::from_nanos(nanos),
            None => Err(Error::overflow("scaling a nanosecond count")),
        }
    }

    /// Split into whole `unit_nanos` units and a remainder, rounding toward
    /// negative infinity so the remainder is always in `0..unit_nanos`.
    #[inline]
    pub(crate) const fn div_rem_floor(self, unit_nanos: i128) -> (i128, i128) {
        (
            self.nanos.div_euclid(unit_nanos),
            self.nanos.rem_euclid(unit_nanos),
        )
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.nanos < 0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.nanos == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_every_i64_second() {
        assert!(FixedPointNanos::from_units_i64(i64::MAX, NANOS_PER_SECOND).is_ok());
        assert!(FixedPointNanos::from_units_i64(i64::MIN, NANOS_PER_SECOND).is_ok());
        assert_eq!(
            FixedPointNanos::from_units_i64(i64::MIN, NANOS_PER_SECOND).unwrap(),
            FixedPointNanos::MIN
        );
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!(FixedPointNanos::from_nanos(FixedPointNanos::MAX.nanos() + 1).is_err());
        assert!(FixedPointNanos::from_nanos(FixedPointNanos::MIN.nanos() - 1).is_err());
        assert!(FixedPointNanos::from_units_i64(i64::MAX, NANOS_PER_MINUTE).is_err());
    }

    #[test]
    fn arithmetic_fails_instead_of_wrapping() {
        let one = FixedPointNanos::from_nanos(1).unwrap();
        assert_eq!(
            FixedPointNanos::MAX.checked_add(one),
            Err(Error::overflow("nanosecond count outside of representable range"))
        );
        assert!(FixedPointNanos::MIN.checked_sub(one).is_err());
        assert!(FixedPointNanos::MAX.checked_mul(2).is_err());
        assert!(FixedPointNanos::MAX.checked_mul(i64::MIN).is_err());
    }

    #[test]
    fn negation_fails_only_at_min() {
        assert!(FixedPointNanos::MIN.checked_neg().is_err());
        let neg_max = FixedPointNanos::MAX.checked_neg().unwrap();
        assert_eq!(neg_max.nanos(), FixedPointNanos::MIN.nanos() + 1);
        assert_eq!(FixedPointNanos::ZERO.checked_neg().unwrap(), FixedPointNanos::ZERO);
    }

    #[test]
    fn div_rem_floor_rounds_toward_negative_infinity() {
        let v = FixedPointNanos::from_nanos(-1).unwrap();
        assert_eq!(v.div_rem_floor(NANOS_PER_SECOND), (-1, 999_999_999));
        let v = FixedPointNanos::from_nanos(2_500_000_000).unwrap();
        assert_eq!(v.div_rem_floor(NANOS_PER_SECOND), (2, 500_000_000));
    }
}
