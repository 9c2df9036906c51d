// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Signed elapsed time with nanosecond resolution.
//!
//! A [`Duration`] is a length of time independent of any calendar or zone.
//! It can only be built from a number through a constructor that names the
//! unit (`from_seconds`, `from_millis`, …), and it can only be turned back
//! into a number through an export that names both the unit and, where
//! precision may be lost, the rounding (`to_seconds_floor`, …).
//!
//! Arithmetic never wraps: every operation that could leave the range of
//! [`FixedPointNanos`] returns [`Error::Overflow`].

use crate::error::Error;
use crate::fixed::{
    FixedPointNanos, NANOS_PER_HOUR, NANOS_PER_MICRO, NANOS_PER_MILLI, NANOS_PER_MINUTE,
    NANOS_PER_SECOND,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ═══════════════════════════════════════════════════════════════════════════
// TimeUnit
// ═══════════════════════════════════════════════════════════════════════════

/// A fixed-length unit used to decompose a [`Duration`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
}

impl TimeUnit {
    /// Length of one unit in nanoseconds.
    #[inline]
    pub const fn nanos(self) -> i128 {
        match self {
            TimeUnit::Nanosecond => 1,
            TimeUnit::Microsecond => NANOS_PER_MICRO,
            TimeUnit::Millisecond => NANOS_PER_MILLI,
            TimeUnit::Second => NANOS_PER_SECOND,
            TimeUnit::Minute => NANOS_PER_MINUTE,
            TimeUnit::Hour => NANOS_PER_HOUR,
        }
    }

    /// Lower-case plural name, used in error messages.
    pub const fn label(self) -> &'static str {
        match self {
            TimeUnit::Nanosecond => "nanoseconds",
            TimeUnit::Microsecond => "microseconds",
            TimeUnit::Millisecond => "milliseconds",
            TimeUnit::Second => "seconds",
            TimeUnit::Minute => "minutes",
            TimeUnit::Hour => "hours",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Duration
// ═══════════════════════════════════════════════════════════════════════════

/// A signed span of time.
///
/// `Duration::ZERO` is the additive identity. Ordering and equality follow
/// the numeric magnitude, so `-1s < 0s < 1s`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration {
    span: FixedPointNanos,
}

impl Duration {
    pub const ZERO: Self = Self {
        span: FixedPointNanos::ZERO,
    };

    /// The most negative duration. Its negation overflows.
    pub const MIN: Self = Self {
        span: FixedPointNanos::MIN,
    };

    pub const MAX: Self = Self {
        span: FixedPointNanos::MAX,
    };

    #[inline]
    pub(crate) const fn from_fixed(span: FixedPointNanos) -> Self {
        Self { span }
    }

    /// The underlying fixed-point nanosecond count.
    #[inline]
    pub const fn as_fixed(&self) -> FixedPointNanos {
        self.span
    }

    // ── constructors ──────────────────────────────────────────────────

    /// Whole nanoseconds.
    #[inline]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self::from_fixed_units(nanos, 1)
    }

    /// Whole microseconds.
    #[inline]
    pub const fn from_micros(micros: i64) -> Self {
        Self::from_fixed_units(micros, NANOS_PER_MICRO)
    }

    /// Whole milliseconds.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Self::from_fixed_units(millis, NANOS_PER_MILLI)
    }

    /// Whole seconds.
    #[inline]
    pub const fn from_seconds(seconds: i64) -> Self {
        Self::from_fixed_units(seconds, NANOS_PER_SECOND)
    }

    /// Whole minutes. Fails when the result leaves the representable range.
    pub fn from_minutes(minutes: i64) -> Result<Self, Error> {
        FixedPointNanos::from_units_i64(minutes, NANOS_PER_MINUTE).map(Self::from_fixed)
    }

    /// Whole hours. Fails when the result leaves the representable range.
    pub fn from_hours(hours: i64) -> Result<Self, Error> {
        FixedPointNanos::from_units_i64(hours, NANOS_PER_HOUR).map(Self::from_fixed)
    }

    /// A nanosecond count wider than `i64`.
    pub fn from_nanos_i128(nanos: i128) -> Result<Self, Error> {
        FixedPointNanos::from_nanos(nanos).map(Self::from_fixed)
    }

    #[inline]
    const fn from_fixed_units(count: i64, unit_nanos: i128) -> Self {
        Self {
            span: FixedPointNanos::from_subsecond_units(count, unit_nanos),
        }
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// `self + other`.
    #[inline]
    pub fn checked_add(self, other: Self) -> Result<Self, Error> {
        self.span.checked_add(other.span).map(Self::from_fixed)
    }

    /// `self - other`.
    #[inline]
    pub fn checked_sub(self, other: Self) -> Result<Self, Error> {
        self.span.checked_sub(other.span).map(Self::from_fixed)
    }

    /// `-self`. Fails only for [`Duration::MIN`].
    #[inline]
    pub fn checked_neg(self) -> Result<Self, Error> {
        self.span.checked_neg().map(Self::from_fixed)
    }

    /// `self * factor`.
    #[inline]
    pub fn checked_mul(self, factor: i64) -> Result<Self, Error> {
        self.span.checked_mul(factor).map(Self::from_fixed)
    }

    /// `|self|`. Fails only for [`Duration::MIN`].
    pub fn checked_abs(self) -> Result<Self, Error> {
        if self.is_negative() {
            self.checked_neg()
        } else {
            Ok(self)
        }
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.span.is_zero()
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.span.is_negative()
    }

    /// `-1`, `0` or `1`.
    #[inline]
    pub const fn signum(&self) -> i8 {
        if self.span.is_negative() {
            -1
        } else if self.span.is_zero() {
            0
        } else {
            1
        }
    }

    // ── decomposition and exports ─────────────────────────────────────

    /// Split into `(whole_units, remainder_nanos)` for `unit`.
    ///
    /// Rounds toward negative infinity: the remainder is always in
    /// `0..unit`, so `-1ns` decomposes into seconds as `(-1, 999_999_999)`.
    /// Fails with `Overflow` only when the whole-unit count does not fit an
    /// `i64` (possible for sub-second units).
    pub fn decompose(&self, unit: TimeUnit) -> Result<(i64, u64), Error> {
        let (whole, remainder) = self.span.div_rem_floor(unit.nanos());
        let whole = i64::try_from(whole).map_err(|_| Error::overflow(unit.label()))?;
        // remainder < 3.6e12 ns for the largest unit
        Ok((whole, remainder as u64))
    }

    /// Whole seconds, rounding toward negative infinity. Always fits.
    pub fn to_seconds_floor(&self) -> i64 {
        self.span.div_rem_floor(NANOS_PER_SECOND).0 as i64
    }

    /// Whole milliseconds, rounding toward negative infinity.
    pub fn to_millis_floor(&self) -> Result<i64, Error> {
        self.decompose(TimeUnit::Millisecond).map(|(whole, _)| whole)
    }

    /// Whole microseconds, rounding toward negative infinity.
    pub fn to_micros_floor(&self) -> Result<i64, Error> {
        self.decompose(TimeUnit::Microsecond).map(|(whole, _)| whole)
    }

    /// Nanoseconds as an `i64` (exact; fails beyond ±292 years).
    pub fn to_nanos(&self) -> Result<i64, Error> {
        self.decompose(TimeUnit::Nanosecond).map(|(whole, _)| whole)
    }

    /// The full nanosecond count.
    #[inline]
    pub const fn to_nanos_i128(&self) -> i128 {
        self.span.nanos()
    }

    /// Whole `unit`s, failing with `PrecisionLoss` if there is a remainder.
    pub fn to_units_exact(&self, unit: TimeUnit) -> Result<i64, Error> {
        let (whole, remainder) = self.decompose(unit)?;
        if remainder != 0 {
            return Err(Error::PrecisionLoss {
                unit: unit.label(),
                remainder_nanos: remainder as i64,
            });
        }
        Ok(whole)
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct RawDuration {
    secs: i64,
    nanos: u32,
}

#[cfg(feature = "serde")]
impl Serialize for Duration {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let (secs, nanos) = self.span.div_rem_floor(NANOS_PER_SECOND);
        RawDuration {
            secs: secs as i64,
            nanos: nanos as u32,
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawDuration::deserialize(deserializer)?;
        if i128::from(raw.nanos) >= NANOS_PER_SECOND {
            return Err(serde::de::Error::custom("nanos must be below one second"));
        }
        Duration::from_seconds(raw.secs)
            .checked_add(Duration::from_nanos(i64::from(raw.nanos)))
            .map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unit_constructors_scale_correctly() {
        assert_eq!(Duration::from_micros(3).to_nanos_i128(), 3_000);
        assert_eq!(Duration::from_millis(-2).to_nanos_i128(), -2_000_000);
        assert_eq!(Duration::from_seconds(5).to_nanos_i128(), 5_000_000_000);
        assert_eq!(
            Duration::from_minutes(2).unwrap(),
            Duration::from_seconds(120)
        );
        assert_eq!(
            Duration::from_hours(-1).unwrap(),
            Duration::from_seconds(-3_600)
        );
    }

    #[test]
    fn large_minute_and_hour_counts_overflow() {
        assert!(matches!(
            Duration::from_minutes(i64::MAX),
            Err(Error::Overflow { .. })
        ));
        assert!(Duration::from_hours(i64::MIN).is_err());
    }

    #[test]
    fn zero_is_additive_identity() {
        let d = Duration::from_millis(1_234);
        assert_eq!(d.checked_add(Duration::ZERO).unwrap(), d);
        assert_eq!(Duration::ZERO.checked_add(d).unwrap(), d);
        assert_eq!(Duration::default(), Duration::ZERO);
    }

    #[test]
    fn overflow_is_reported() {
        let one = Duration::from_nanos(1);
        assert!(Duration::MAX.checked_add(one).is_err());
        assert!(Duration::MIN.checked_sub(one).is_err());
        assert!(Duration::MAX.checked_mul(-2).is_err());
    }

    #[test]
    fn negation_is_total_except_at_min() {
        assert!(Duration::MIN.checked_neg().is_err());
        assert!(Duration::MIN.checked_abs().is_err());
        assert_eq!(
            Duration::from_seconds(-4).checked_abs().unwrap(),
            Duration::from_seconds(4)
        );
        assert!(Duration::MAX.checked_neg().is_ok());
    }

    #[test]
    fn decompose_floors_negative_values() {
        let d = Duration::from_nanos(-1);
        assert_eq!(d.decompose(TimeUnit::Second).unwrap(), (-1, 999_999_999));
        let d = Duration::from_millis(90_500);
        assert_eq!(d.decompose(TimeUnit::Minute).unwrap(), (1, 30_500_000_000));
        assert_eq!(d.decompose(TimeUnit::Second).unwrap(), (90, 500_000_000));
    }

    #[test]
    fn exports_name_the_truncation() {
        let d = Duration::from_millis(-1_500);
        assert_eq!(d.to_seconds_floor(), -2);
        assert_eq!(d.to_millis_floor().unwrap(), -1_500);
        assert_eq!(d.to_micros_floor().unwrap(), -1_500_000);
        assert_eq!(d.to_nanos().unwrap(), -1_500_000_000);
        assert!(Duration::MAX.to_nanos().is_err());
        assert_eq!(Duration::MAX.to_seconds_floor(), i64::MAX);
        assert_eq!(Duration::MIN.to_seconds_floor(), i64::MIN);
    }

    #[test]
    fn exact_exports_refuse_to_truncate() {
        let d = Duration::from_millis(1_500);
        assert_eq!(
            d.to_units_exact(TimeUnit::Second),
            Err(Error::PrecisionLoss {
                unit: "seconds",
                remainder_nanos: 500_000_000
            })
        );
        assert_eq!(d.to_units_exact(TimeUnit::Millisecond).unwrap(), 1_500);
    }

    #[test]
    fn ordering_follows_magnitude() {
        let mut v = vec![
            Duration::from_seconds(1),
            Duration::from_nanos(-5),
            Duration::ZERO,
            Duration::MIN,
        ];
        v.sort();
        assert_eq!(
            v,
            vec![
                Duration::MIN,
                Duration::from_nanos(-5),
                Duration::ZERO,
                Duration::from_seconds(1)
            ]
        );
        assert_eq!(Duration::from_nanos(-5).signum(), -1);
        assert_eq!(Duration::ZERO.signum(), 0);
    }

    fn any_duration() -> impl Strategy<Value = Duration> {
        // A third of the full range, so sums of three never overflow.
        let bound = FixedPointNanos::MAX.nanos() / 3;
        (-bound..bound).prop_map(|n| Duration::from_nanos_i128(n).unwrap())
    }

    proptest! {
        #[test]
        fn addition_is_commutative(a in any_duration(), b in any_duration()) {
            prop_assert_eq!(a.checked_add(b).unwrap(), b.checked_add(a).unwrap());
        }

        #[test]
        fn addition_is_associative(a in any_duration(), b in any_duration(), c in any_duration()) {
            let left = a.checked_add(b).unwrap().checked_add(c).unwrap();
            let right = a.checked_add(b.checked_add(c).unwrap()).unwrap();
            prop_assert_eq!(left, right);
        }

        #[test]
        fn adding_zero_is_a_no_op(a in any_duration()) {
            prop_assert_eq!(a.checked_add(Duration::ZERO).unwrap(), a);
        }

        #[test]
        fn decompose_reassembles(a in any_duration()) {
            let (whole, rem) = a.decompose(TimeUnit::Second).unwrap();
            prop_assert!(rem < 1_000_000_000);
            prop_assert_eq!(whole as i128 * NANOS_PER_SECOND + rem as i128, a.to_nanos_i128());
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_floor_seconds_and_nanos() {
        let d = Duration::from_millis(-1_500);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#"{"secs":-2,"nanos":500000000}"#);
        let back: Duration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d);
        assert!(serde_json::from_str::<Duration>(r#"{"secs":0,"nanos":1000000000}"#).is_err());
    }
}
