// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Zone-free calendar readings and proleptic Gregorian calendar math.
//!
//! A [`CivilDateTime`] is what a wall clock and a wall calendar show: year,
//! month, day, hour, minute, second and nanosecond. It carries no zone and no
//! offset, so it names no particular instant; pairing it with a zone is the
//! job of [`ZonedDateTime`](crate::ZonedDateTime).
//!
//! Every constructor validates all fields jointly, so a `CivilDateTime` that
//! exists is always a real calendar reading. Leap seconds are not modelled,
//! so `second` is at most 59.
//!
//! Years are astronomical: year 0 is 1 BCE, year -1 is 2 BCE. The supported
//! range is [`MIN_YEAR`]`..=`[`MAX_YEAR`], which contains the civil reading of
//! every representable [`Instant`](crate::Instant) at every valid offset.

use crate::duration::Duration;
use crate::error::Error;
use crate::fixed::{NANOS_PER_DAY, NANOS_PER_HOUR, NANOS_PER_MINUTE, NANOS_PER_SECOND};
use crate::instant::Instant;
use crate::offset::UtcOffset;
use chrono::Weekday;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Earliest supported year.
pub const MIN_YEAR: i64 = -999_999_999_999;

/// Latest supported year.
pub const MAX_YEAR: i64 = 999_999_999_999;

// Days from 1970-01-01 to the first and last supported dates.
const MIN_EPOCH_DAY: i64 = days_from_civil(MIN_YEAR, 1, 1);
const MAX_EPOCH_DAY: i64 = days_from_civil(MAX_YEAR, 12, 31);

// ═══════════════════════════════════════════════════════════════════════════
// Calendar algorithms
// ═══════════════════════════════════════════════════════════════════════════

/// Whether `year` has 366 days.
///
/// A year is a leap year iff it is divisible by 4, and either not divisible
/// by 100 or divisible by 400.
#[inline]
pub const fn is_leap_year(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in `month` of `year`.
pub fn days_in_month(year: i64, month: u8) -> Result<u8, Error> {
    if !(1..=12).contains(&month) {
        return Err(Error::civil_field("month", i64::from(month), 1, 12));
    }
    Ok(month_length(year, month))
}

#[inline]
const fn month_length(year: i64, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Days since 1970-01-01 for a valid proleptic Gregorian date.
///
/// This is Howard Hinnant's `days_from_civil`, computed on 400-year eras so
/// it holds for negative years too.
pub(crate) const fn days_from_civil(year: i64, month: u8, day: u8) -> i64 {
    let (month, day) = (month as i64, day as i64);
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let month_from_march = (month + 9) % 12;
    let day_of_year = (153 * month_from_march + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

/// Inverse of [`days_from_civil`].
pub(crate) const fn civil_from_days(epoch_day: i64) -> (i64, u8, u8) {
    let z = epoch_day + 719_468;
    let era = z.div_euclid(146_097);
    let day_of_era = z - era * 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1_460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let month_from_march = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * month_from_march + 2) / 5 + 1;
    let month = if month_from_march < 10 {
        month_from_march + 3
    } else {
        month_from_march - 9
    };
    let year = year_of_era + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month as u8, day as u8)
}

const WEEKDAYS_FROM_MONDAY: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

// ═══════════════════════════════════════════════════════════════════════════
// CivilDateTime
// ═══════════════════════════════════════════════════════════════════════════

/// Units for month- and year-granularity calendar arithmetic.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CalendarUnit {
    Years,
    Months,
}

/// A calendar date and wall-clock time with no zone attached.
///
/// Ordering is field-wise (year first), which is the chronological order of
/// readings taken in one and the same offset. It is *not* comparable to an
/// [`Instant`](crate::Instant).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDateTime {
    year: i64,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: u32,
}

impl CivilDateTime {
    // ── constructors ──────────────────────────────────────────────────

    /// Validate and build a civil reading.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidCivilField`] naming the first field out of range,
    /// including a day past the end of its month (February 29 in a common
    /// year, April 31, …).
    pub fn new(
        year: i64,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
    ) -> Result<Self, Error> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Error::civil_field("year", year, MIN_YEAR, MAX_YEAR));
        }
        let last_day = days_in_month(year, month)?;
        if !(1..=last_day).contains(&day) {
            return Err(Error::civil_field(
                "day",
                i64::from(day),
                1,
                i64::from(last_day),
            ));
        }
        if hour > 23 {
            return Err(Error::civil_field("hour", i64::from(hour), 0, 23));
        }
        if minute > 59 {
            return Err(Error::civil_field("minute", i64::from(minute), 0, 59));
        }
        if second > 59 {
            return Err(Error::civil_field("second", i64::from(second), 0, 59));
        }
        if nanosecond > 999_999_999 {
            return Err(Error::civil_field(
                "nanosecond",
                i64::from(nanosecond),
                0,
                999_999_999,
            ));
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanosecond,
        })
    }

    /// Midnight at the start of the given date.
    pub fn from_date(year: i64, month: u8, day: u8) -> Result<Self, Error> {
        Self::new(year, month, day, 0, 0, 0, 0)
    }

    // ── accessors ─────────────────────────────────────────────────────

    #[inline]
    pub const fn year(&self) -> i64 {
        self.year
    }

    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    #[inline]
    pub const fn day(&self) -> u8 {
        self.day
    }

    #[inline]
    pub const fn hour(&self) -> u8 {
        self.hour
    }

    #[inline]
    pub const fn minute(&self) -> u8 {
        self.minute
    }

    #[inline]
    pub const fn second(&self) -> u8 {
        self.second
    }

    #[inline]
    pub const fn nanosecond(&self) -> u32 {
        self.nanosecond
    }

    /// Day of the week of the date.
    pub fn day_of_week(&self) -> Weekday {
        let epoch_day = days_from_civil(self.year, self.month, self.day);
        // 1970-01-01 was a Thursday.
        WEEKDAYS_FROM_MONDAY[(epoch_day + 3).rem_euclid(7) as usize]
    }

    /// Ordinal day within the year, starting at 1.
    pub fn day_of_year(&self) -> u16 {
        let start = days_from_civil(self.year, 1, 1);
        (days_from_civil(self.year, self.month, self.day) - start + 1) as u16
    }

    // ── calendar arithmetic ───────────────────────────────────────────

    /// Move by whole years or months, keeping the time of day.
    ///
    /// When the day of month does not exist in the target month it is
    /// clamped to the month's last day: January 31 plus one month is
    /// February 28 (or 29), never March 2 and never an error. The clamp
    /// applies once, to the final result, so adding one month twice can
    /// differ from adding two months.
    pub fn add_calendar_unit(&self, unit: CalendarUnit, amount: i64) -> Result<Self, Error> {
        let (year, month) = match unit {
            CalendarUnit::Years => {
                let year = self
                    .year
                    .checked_add(amount)
                    .ok_or(Error::overflow("adding years"))?;
                (year, self.month)
            }
            CalendarUnit::Months => {
                let months = i128::from(self.year) * 12
                    + i128::from(self.month - 1)
                    + i128::from(amount);
                let year = i64::try_from(months.div_euclid(12))
                    .map_err(|_| Error::overflow("adding months"))?;
                (year, months.rem_euclid(12) as u8 + 1)
            }
        };
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Error::overflow("calendar arithmetic left the supported years"));
        }
        let day = self.day.min(month_length(year, month));
        Ok(Self {
            year,
            month,
            day,
            ..*self
        })
    }

    /// Move by an exact elapsed duration, as if the reading were on a clock
    /// that never changes offset.
    pub fn checked_add_duration(&self, duration: Duration) -> Result<Self, Error> {
        Self::from_local_nanos(self.to_local_nanos() + duration.to_nanos_i128())
    }

    /// Elapsed time from `self` to `later` on a clock that never changes
    /// offset.
    pub fn duration_until(&self, later: &Self) -> Result<Duration, Error> {
        Duration::from_nanos_i128(later.to_local_nanos() - self.to_local_nanos())
    }

    // ── local-timeline helpers ────────────────────────────────────────

    /// Nanoseconds from 1970-01-01T00:00:00 to this reading, both read on
    /// the same clock.
    pub(crate) fn to_local_nanos(&self) -> i128 {
        let days = i128::from(days_from_civil(self.year, self.month, self.day));
        days * NANOS_PER_DAY
            + i128::from(self.hour) * NANOS_PER_HOUR
            + i128::from(self.minute) * NANOS_PER_MINUTE
            + i128::from(self.second) * NANOS_PER_SECOND
            + i128::from(self.nanosecond)
    }

    /// Inverse of [`CivilDateTime::to_local_nanos`].
    pub(crate) fn from_local_nanos(local_nanos: i128) -> Result<Self, Error> {
        let days = local_nanos.div_euclid(NANOS_PER_DAY);
        if days < i128::from(MIN_EPOCH_DAY) || days > i128::from(MAX_EPOCH_DAY) {
            return Err(Error::overflow("civil reading outside of the supported years"));
        }
        Ok(Self::split_local_nanos(local_nanos))
    }

    /// The reading a wall clock set to `offset` shows at `instant`.
    ///
    /// Total: the supported years contain every instant at every offset.
    pub(crate) fn wall_clock(instant: Instant, offset: UtcOffset) -> Self {
        Self::split_local_nanos(instant.since_unix_epoch().to_nanos_i128() + offset.nanos())
    }

    /// The instant at which a wall clock set to `offset` shows `self`.
    pub(crate) fn instant_at(&self, offset: UtcOffset) -> Result<Instant, Error> {
        let nanos = self.to_local_nanos() - offset.nanos();
        Duration::from_nanos_i128(nanos).map(Instant::from_unix_epoch_offset)
    }

    fn split_local_nanos(local_nanos: i128) -> Self {
        let days = local_nanos.div_euclid(NANOS_PER_DAY);
        let (year, month, day) = civil_from_days(days as i64);
        let mut rest = local_nanos.rem_euclid(NANOS_PER_DAY);
        let hour = (rest / NANOS_PER_HOUR) as u8;
        rest %= NANOS_PER_HOUR;
        let minute = (rest / NANOS_PER_MINUTE) as u8;
        rest %= NANOS_PER_MINUTE;
        let second = (rest / NANOS_PER_SECOND) as u8;
        let nanosecond = (rest % NANOS_PER_SECOND) as u32;
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanosecond,
        }
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for CivilDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_iso8601())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for CivilDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        CivilDateTime::from_iso8601(&text).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
