// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! UTC offsets.
//!
//! A [`UtcOffset`] is the signed difference `local wall clock - UTC` in
//! effect for a zone at some instant. It has the same nanosecond precision
//! as [`Duration`], but is bounded to ±26 hours so that malformed rule data
//! is caught where it enters the crate.

use crate::duration::Duration;
use crate::error::Error;
use crate::fixed::{NANOS_PER_HOUR, NANOS_PER_SECOND};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const MAX_OFFSET_NANOS: i128 = 26 * NANOS_PER_HOUR;

/// Signed offset from UTC, within ±26 hours.
///
/// Ordered by magnitude: `-05:00 < +00:00 < +01:00`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UtcOffset {
    nanos: i64,
}

impl UtcOffset {
    pub const UTC: Self = Self { nanos: 0 };

    /// Build from whole seconds east of Greenwich.
    pub fn from_seconds(seconds: i32) -> Result<Self, Error> {
        Self::from_nanos_i128(i128::from(seconds) * NANOS_PER_SECOND)
    }

    /// Build from hours and minutes east of Greenwich; both carry the sign
    /// (`-3, -30` is `-03:30`).
    pub fn from_hours_minutes(hours: i8, minutes: i8) -> Result<Self, Error> {
        Self::from_seconds(i32::from(hours) * 3_600 + i32::from(minutes) * 60)
    }

    pub fn from_duration(duration: Duration) -> Result<Self, Error> {
        Self::from_nanos_i128(duration.to_nanos_i128())
    }

    pub(crate) fn from_nanos_i128(nanos: i128) -> Result<Self, Error> {
        if nanos.abs() > MAX_OFFSET_NANOS {
            return Err(Error::OffsetOutOfRange { nanos });
        }
        Ok(Self { nanos: nanos as i64 })
    }

    /// The offset as a [`Duration`].
    #[inline]
    pub const fn to_duration(&self) -> Duration {
        Duration::from_nanos(self.nanos)
    }

    /// Whole seconds, rounding toward negative infinity.
    #[inline]
    pub fn to_seconds_floor(&self) -> i32 {
        self.nanos.div_euclid(NANOS_PER_SECOND as i64) as i32
    }

    #[inline]
    pub(crate) const fn nanos(&self) -> i128 {
        self.nanos as i128
    }

    #[inline]
    pub const fn is_utc(&self) -> bool {
        self.nanos == 0
    }
}

#[cfg(feature = "serde")]
impl Serialize for UtcOffset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_iso8601())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for UtcOffset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        UtcOffset::from_iso8601(&text).map_err(serde::de::Error::custom)
    }
}
