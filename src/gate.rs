// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The conversion gate: every sanctioned crossing between the crate's types
//! and plain numbers, text, `chrono` and `qtty`.
//!
//! Each crossing names its unit and epoch, and each export that can lose
//! precision names its rounding:
//!
//! | Crossing | In | Out |
//! |---|---|---|
//! | Unix seconds | [`Instant::from_unix_seconds`] | [`Instant::to_unix_seconds_floor`], [`Instant::to_unix_seconds_exact`] |
//! | Unix milliseconds | [`Instant::from_unix_millis`] | [`Instant::to_unix_millis_floor`], [`Instant::to_unix_millis_exact`] |
//! | Unix microseconds | [`Instant::from_unix_micros`] | [`Instant::to_unix_micros_floor`], [`Instant::to_unix_micros_exact`] |
//! | Unix nanoseconds | [`Instant::from_unix_nanos`] | [`Instant::to_unix_nanos`] |
//! | RFC 3339 | [`Instant::from_rfc3339`] | [`Instant::to_rfc3339`] |
//! | ISO 8601 civil | [`CivilDateTime::from_iso8601`] | [`CivilDateTime::to_iso8601`] |
//! | RFC 9557 zoned | [`ZonedDateTime::from_rfc9557`] | [`ZonedDateTime::to_rfc9557`] |
//! | chrono | `from_chrono`, `from_naive`, `from_time_delta` | `to_chrono`, `to_naive`, `to_time_delta` |
//! | qtty | [`Duration::from_seconds_quantity`] | `to_seconds_quantity`, `to_days_quantity`, [`Instant::to_julian_day`] |
//!
//! Floor exports round toward negative infinity, so `-1ns` is second `-1`.
//! The `*_exact` exports fail with [`Error::PrecisionLoss`] instead.
//! Every integer import is total: the representable range spans every
//! `i64` count of seconds.

use crate::civil::CivilDateTime;
use crate::duration::{Duration, TimeUnit};
use crate::error::Error;
use crate::fixed::{FixedPointNanos, NANOS_PER_MICRO, NANOS_PER_MILLI, NANOS_PER_SECOND};
use crate::instant::Instant;
use crate::offset::UtcOffset;
use crate::rfc3339;
use crate::tz::RuleSet;
use crate::zoned::ZonedDateTime;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Utc};
use qtty::{Day, Days, Seconds};

/// Julian Day number of 1970-01-01T00:00:00Z.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

// ═══════════════════════════════════════════════════════════════════════════
// Unix numbers
// ═══════════════════════════════════════════════════════════════════════════

impl Instant {
    /// `seconds` whole seconds after 1970-01-01T00:00:00Z.
    #[inline]
    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self::from_fixed(FixedPointNanos::from_subsecond_units(seconds, NANOS_PER_SECOND))
    }

    #[inline]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self::from_fixed(FixedPointNanos::from_subsecond_units(millis, NANOS_PER_MILLI))
    }

    #[inline]
    pub const fn from_unix_micros(micros: i64) -> Self {
        Self::from_fixed(FixedPointNanos::from_subsecond_units(micros, NANOS_PER_MICRO))
    }

    #[inline]
    pub const fn from_unix_nanos(nanos: i64) -> Self {
        Self::from_fixed(FixedPointNanos::from_subsecond_units(nanos, 1))
    }

    /// Whole Unix seconds, rounding toward negative infinity. Total.
    #[inline]
    pub fn to_unix_seconds_floor(&self) -> i64 {
        self.since_unix_epoch().to_seconds_floor()
    }

    /// Whole Unix milliseconds, rounding toward negative infinity.
    ///
    /// Fails with `Overflow` beyond roughly ±292 million years.
    pub fn to_unix_millis_floor(&self) -> Result<i64, Error> {
        self.since_unix_epoch().to_millis_floor()
    }

    /// Whole Unix microseconds, rounding toward negative infinity.
    pub fn to_unix_micros_floor(&self) -> Result<i64, Error> {
        self.since_unix_epoch().to_micros_floor()
    }

    /// Unix nanoseconds. Exact, but fails with `Overflow` outside
    /// 1677-09-21..2262-04-11.
    pub fn to_unix_nanos(&self) -> Result<i64, Error> {
        self.since_unix_epoch().to_nanos()
    }

    pub fn to_unix_seconds_exact(&self) -> Result<i64, Error> {
        self.since_unix_epoch().to_units_exact(TimeUnit::Second)
    }

    pub fn to_unix_millis_exact(&self) -> Result<i64, Error> {
        self.since_unix_epoch().to_units_exact(TimeUnit::Millisecond)
    }

    pub fn to_unix_micros_exact(&self) -> Result<i64, Error> {
        self.since_unix_epoch().to_units_exact(TimeUnit::Microsecond)
    }
}

/// `seconds` whole seconds after the Unix epoch.
pub const fn instant_from_unix_seconds(seconds: i64) -> Instant {
    Instant::from_unix_seconds(seconds)
}

/// Whole Unix seconds of `instant`, rounding toward negative infinity.
pub fn instant_to_unix_seconds(instant: Instant) -> i64 {
    instant.to_unix_seconds_floor()
}

pub const fn instant_from_unix_millis(millis: i64) -> Instant {
    Instant::from_unix_millis(millis)
}

/// Whole Unix milliseconds of `instant`, rounding toward negative infinity.
pub fn instant_to_unix_millis(instant: Instant) -> Result<i64, Error> {
    instant.to_unix_millis_floor()
}

pub const fn instant_from_unix_micros(micros: i64) -> Instant {
    Instant::from_unix_micros(micros)
}

/// Whole Unix microseconds of `instant`, rounding toward negative infinity.
pub fn instant_to_unix_micros(instant: Instant) -> Result<i64, Error> {
    instant.to_unix_micros_floor()
}

pub const fn instant_from_unix_nanos(nanos: i64) -> Instant {
    Instant::from_unix_nanos(nanos)
}

pub fn instant_to_unix_nanos(instant: Instant) -> Result<i64, Error> {
    instant.to_unix_nanos()
}

// ═══════════════════════════════════════════════════════════════════════════
// Text
// ═══════════════════════════════════════════════════════════════════════════

impl Instant {
    /// RFC 3339 text in UTC, e.g. `2024-02-29T12:34:56.5Z`.
    pub fn to_rfc3339(&self) -> String {
        rfc3339::format_instant(*self)
    }

    /// Parse RFC 3339 text with a `Z` or numeric offset.
    pub fn from_rfc3339(text: &str) -> Result<Self, Error> {
        rfc3339::parse_instant(text)
    }
}

impl CivilDateTime {
    /// ISO 8601 date-time with no offset, e.g. `2024-02-29T12:34:56`.
    pub fn to_iso8601(&self) -> String {
        rfc3339::format_civil(self)
    }

    /// Parse an ISO 8601 date-time. Any offset or zone suffix is an error.
    pub fn from_iso8601(text: &str) -> Result<Self, Error> {
        rfc3339::parse_civil(text)
    }
}

impl UtcOffset {
    /// `±HH:MM`, with seconds and a fraction only when non-zero.
    pub fn to_iso8601(&self) -> String {
        rfc3339::format_offset(*self)
    }

    pub fn from_iso8601(text: &str) -> Result<Self, Error> {
        rfc3339::parse_offset(text)
    }
}

impl ZonedDateTime {
    /// RFC 9557 text, e.g. `2026-02-04T20:25:35.094+01:00[Europe/Berlin]`.
    pub fn to_rfc9557(&self) -> String {
        rfc3339::format_zoned(&self.civil(), self.offset(), self.zone().as_str())
    }

    /// Parse RFC 9557 text against `rules`.
    ///
    /// The numeric offset pins the instant, so overlapping readings need no
    /// policy. The offset must be the one the zone actually uses at that
    /// instant, otherwise the text is rejected with `OffsetMismatch`. A `Z`
    /// offset means the reading is UTC and the zone's offset is looked up.
    pub fn from_rfc9557(text: &str, rules: &RuleSet) -> Result<Self, Error> {
        let (civil, offset, name) = rfc3339::parse_zoned(text)?;
        let zone = rules.zone(name)?;
        let instant = civil.instant_at(offset.unwrap_or(UtcOffset::UTC))?;
        let zoned = ZonedDateTime::from_instant(instant, &zone, rules)?;
        match offset {
            Some(offset) if offset != zoned.offset() => Err(Error::OffsetMismatch {
                offset: offset.to_iso8601(),
                zone: name.to_owned(),
                local: civil.to_iso8601(),
            }),
            _ => Ok(zoned),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// chrono
// ═══════════════════════════════════════════════════════════════════════════

impl Instant {
    /// From a `chrono::DateTime<Utc>`.
    ///
    /// chrono can represent a leap second as a nanosecond count above one
    /// second; it is clamped to the last nanosecond of the preceding second.
    pub fn from_chrono(datetime: DateTime<Utc>) -> Self {
        let nanos = datetime.timestamp_subsec_nanos().min(999_999_999);
        Self::from_fixed(FixedPointNanos::from_seconds_and_nanos(
            datetime.timestamp(),
            nanos,
        ))
    }

    /// To a `chrono::DateTime<Utc>`, failing outside chrono's range
    /// (about ±262 000 years).
    pub fn to_chrono(&self) -> Result<DateTime<Utc>, Error> {
        let (seconds, nanos) = self.since_unix_epoch().decompose(TimeUnit::Second)?;
        DateTime::<Utc>::from_timestamp(seconds, nanos as u32)
            .ok_or(Error::overflow("instant outside of chrono's range"))
    }
}

impl CivilDateTime {
    /// From a `chrono::NaiveDateTime`. A leap-second reading is rejected
    /// with `InvalidCivilField`.
    pub fn from_naive(naive: NaiveDateTime) -> Result<Self, Error> {
        CivilDateTime::new(
            i64::from(naive.year()),
            naive.month() as u8,
            naive.day() as u8,
            naive.hour() as u8,
            naive.minute() as u8,
            naive.second() as u8,
            naive.nanosecond(),
        )
    }

    /// To a `chrono::NaiveDateTime`, failing outside chrono's year range.
    pub fn to_naive(&self) -> Result<NaiveDateTime, Error> {
        let year =
            i32::try_from(self.year()).map_err(|_| Error::overflow("year outside of chrono's range"))?;
        NaiveDate::from_ymd_opt(year, u32::from(self.month()), u32::from(self.day()))
            .and_then(|date| {
                date.and_hms_nano_opt(
                    u32::from(self.hour()),
                    u32::from(self.minute()),
                    u32::from(self.second()),
                    self.nanosecond(),
                )
            })
            .ok_or(Error::overflow("year outside of chrono's range"))
    }
}

impl Duration {
    pub fn from_time_delta(delta: TimeDelta) -> Result<Self, Error> {
        // subsec_nanos carries the sign of the whole delta
        Duration::from_nanos_i128(
            i128::from(delta.num_seconds()) * NANOS_PER_SECOND + i128::from(delta.subsec_nanos()),
        )
    }

    /// To a `chrono::TimeDelta`, failing beyond its ±`i64::MAX` ms range.
    pub fn to_time_delta(&self) -> Result<TimeDelta, Error> {
        let (seconds, nanos) = self.decompose(TimeUnit::Second)?;
        TimeDelta::new(seconds, nanos as u32)
            .ok_or(Error::overflow("duration outside of chrono's range"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// qtty
// ═══════════════════════════════════════════════════════════════════════════

impl Duration {
    /// Length in seconds as an `f64` quantity. Lossy for spans longer than
    /// about 104 days at nanosecond resolution.
    pub fn to_seconds_quantity(&self) -> Seconds {
        Seconds::new(self.to_nanos_i128() as f64 / NANOS_PER_SECOND as f64)
    }

    /// Length in days as an `f64` quantity. Lossy.
    pub fn to_days_quantity(&self) -> Days {
        self.to_seconds_quantity().to::<Day>()
    }

    /// From a seconds quantity, rounded to the nearest nanosecond.
    ///
    /// Fails with `Overflow` for NaN, infinities and values out of range.
    pub fn from_seconds_quantity(seconds: Seconds) -> Result<Self, Error> {
        let nanos = (seconds.value() * NANOS_PER_SECOND as f64).round();
        if !nanos.is_finite()
            || nanos < Duration::MIN.to_nanos_i128() as f64
            || nanos > Duration::MAX.to_nanos_i128() as f64
        {
            return Err(Error::overflow("seconds quantity out of range"));
        }
        Duration::from_nanos_i128(nanos as i128)
    }
}

impl Instant {
    /// Julian Day (UTC, no leap seconds) as an `f64` quantity. Lossy:
    /// resolution is about 20 µs for present-day dates.
    pub fn to_julian_day(&self) -> Days {
        Days::new(UNIX_EPOCH_JD) + self.since_unix_epoch().to_days_quantity()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn unix_imports_name_their_unit() {
        assert_eq!(
            Instant::from_unix_millis(1_500),
            Instant::from_unix_seconds(1)
                .checked_add(Duration::from_millis(500))
                .unwrap()
        );
        assert_eq!(
            Instant::from_unix_micros(-1),
            Instant::from_unix_nanos(-1_000)
        );
        assert_eq!(instant_from_unix_seconds(i64::MIN), Instant::MIN);
    }

    #[test]
    fn floor_exports_round_down() {
        let t = Instant::from_unix_nanos(-1);
        assert_eq!(t.to_unix_seconds_floor(), -1);
        assert_eq!(t.to_unix_millis_floor().unwrap(), -1);
        assert_eq!(t.to_unix_micros_floor().unwrap(), -1);
        assert_eq!(t.to_unix_nanos().unwrap(), -1);

        let t = Instant::from_unix_millis(1_999);
        assert_eq!(instant_to_unix_seconds(t), 1);
        assert_eq!(instant_to_unix_millis(t).unwrap(), 1_999);
    }

    #[test]
    fn exact_exports_refuse_to_truncate() {
        let t = Instant::from_unix_millis(1_500);
        assert_eq!(
            t.to_unix_seconds_exact(),
            Err(Error::PrecisionLoss {
                unit: "seconds",
                remainder_nanos: 500_000_000,
            })
        );
        assert_eq!(t.to_unix_millis_exact().unwrap(), 1_500);
        assert_eq!(t.to_unix_micros_exact().unwrap(), 1_500_000);
    }

    #[test]
    fn wide_exports_overflow() {
        assert!(Instant::MAX.to_unix_nanos().is_err());
        assert!(instant_to_unix_millis(Instant::MIN).is_err());
        assert!(instant_to_unix_micros(Instant::MAX).is_err());
        assert_eq!(Instant::MAX.to_unix_seconds_floor(), i64::MAX);
        assert_eq!(
            instant_to_unix_nanos(instant_from_unix_nanos(i64::MIN)).unwrap(),
            i64::MIN
        );
    }

    #[test]
    fn chrono_instants() {
        let dt = Utc.with_ymd_and_hms(2024, 2, 29, 12, 34, 56).unwrap();
        let t = Instant::from_chrono(dt);
        assert_eq!(t.to_unix_seconds_floor(), 1_709_210_096);
        assert_eq!(t.to_chrono().unwrap(), dt);
        assert!(Instant::MAX.to_chrono().is_err());
    }

    #[test]
    fn chrono_naive_readings() {
        let naive = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_nano_opt(23, 59, 59, 123)
            .unwrap();
        let civil = CivilDateTime::from_naive(naive).unwrap();
        assert_eq!(civil, CivilDateTime::new(2024, 2, 29, 23, 59, 59, 123).unwrap());
        assert_eq!(civil.to_naive().unwrap(), naive);

        let leap_second = NaiveDate::from_ymd_opt(2016, 12, 31)
            .unwrap()
            .and_hms_nano_opt(23, 59, 59, 1_500_000_000)
            .unwrap();
        assert!(matches!(
            CivilDateTime::from_naive(leap_second),
            Err(Error::InvalidCivilField { field: "nanosecond", .. })
        ));

        let far = CivilDateTime::from_date(1_000_000, 1, 1).unwrap();
        assert!(far.to_naive().is_err());
    }

    #[test]
    fn chrono_time_deltas() {
        let delta = TimeDelta::milliseconds(-1_500);
        let d = Duration::from_time_delta(delta).unwrap();
        assert_eq!(d, Duration::from_millis(-1_500));
        assert_eq!(d.to_time_delta().unwrap(), delta);
        assert!(Duration::MAX.to_time_delta().is_err());
    }

    #[test]
    fn qtty_quantities() {
        let d = Duration::from_hours(36).unwrap();
        assert_eq!(d.to_seconds_quantity().value(), 129_600.0);
        assert!((d.to_days_quantity().value() - 1.5).abs() < 1e-12);

        let back = Duration::from_seconds_quantity(Seconds::new(1.25)).unwrap();
        assert_eq!(back, Duration::from_millis(1_250));
        let rounded = Duration::from_seconds_quantity(Seconds::new(1e-10)).unwrap();
        assert_eq!(rounded, Duration::ZERO);

        assert!(Duration::from_seconds_quantity(Seconds::new(f64::NAN)).is_err());
        assert!(Duration::from_seconds_quantity(Seconds::new(f64::INFINITY)).is_err());
        assert!(Duration::from_seconds_quantity(Seconds::new(1e30)).is_err());
    }

    #[test]
    fn julian_days() {
        assert_eq!(Instant::UNIX_EPOCH.to_julian_day().value(), UNIX_EPOCH_JD);
        let j2000 = Instant::from_rfc3339("2000-01-01T12:00:00Z").unwrap();
        assert!((j2000.to_julian_day().value() - 2_451_545.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn unix_seconds_round_trip(seconds in any::<i64>()) {
            prop_assert_eq!(
                instant_to_unix_seconds(instant_from_unix_seconds(seconds)),
                seconds
            );
        }

        #[test]
        fn unix_nanos_round_trip(nanos in any::<i64>()) {
            prop_assert_eq!(
                Instant::from_unix_nanos(nanos).to_unix_nanos().unwrap(),
                nanos
            );
        }

        #[test]
        fn rfc3339_round_trips(nanos in any::<i64>(), seconds in -62_135_596_800i64..253_402_300_799) {
            let t = Instant::from_unix_seconds(seconds)
                .checked_add(Duration::from_nanos(nanos.rem_euclid(1_000_000_000)))
                .unwrap();
            prop_assert_eq!(Instant::from_rfc3339(&t.to_rfc3339()).unwrap(), t);
        }

        #[test]
        fn rfc3339_round_trips_with_expanded_years(
            seconds in any::<i64>(),
            nanos in 0i64..1_000_000_000,
        ) {
            let t = Instant::from_unix_seconds(seconds)
                .checked_add(Duration::from_nanos(nanos))
                .unwrap();
            prop_assert_eq!(Instant::from_rfc3339(&t.to_rfc3339()).unwrap(), t);
        }
    }

    #[test]
    fn extreme_instants_use_expanded_years() {
        let max = Instant::MAX.to_rfc3339();
        assert!(max.starts_with("+292277026596-"), "{max}");
        assert!(max.ends_with(".999999999Z"), "{max}");
        assert_eq!(Instant::from_rfc3339(&max).unwrap(), Instant::MAX);

        let min = Instant::MIN.to_rfc3339();
        assert!(min.starts_with("-292277022657-"), "{min}");
        assert_eq!(Instant::from_rfc3339(&min).unwrap(), Instant::MIN);
    }
}
