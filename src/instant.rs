// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Absolute points on the global timeline.
//!
//! [`Instant`] stores a [`FixedPointNanos`] count of nanoseconds since the
//! Unix epoch (1970-01-01T00:00:00Z). Leap seconds are not modelled: every
//! day is 86 400 seconds long, matching POSIX time and smeared NTP clocks.
//!
//! An `Instant` has no implicit numeric value. Arithmetic is only defined
//! against [`Duration`], and crossing to or from a plain number or a string
//! goes through an export that names the unit and epoch (see
//! [`gate`](crate::gate)).
//!
//! The current time is read through the [`Clock`] trait, which is the only
//! I/O boundary of this module.

use crate::duration::Duration;
use crate::error::Error;
use crate::fixed::FixedPointNanos;
use std::cell::Cell;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ═══════════════════════════════════════════════════════════════════════════
// Instant
// ═══════════════════════════════════════════════════════════════════════════

/// A point in time, independent of calendar and zone.
///
/// Ordering is chronological. The struct is `Copy` and layout-identical to
/// an `i128`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    since_epoch: FixedPointNanos,
}

impl Instant {
    /// 1970-01-01T00:00:00Z.
    pub const UNIX_EPOCH: Self = Self {
        since_epoch: FixedPointNanos::ZERO,
    };

    /// The earliest representable instant (`i64::MIN` Unix seconds).
    pub const MIN: Self = Self {
        since_epoch: FixedPointNanos::MIN,
    };

    /// The latest representable instant.
    pub const MAX: Self = Self {
        since_epoch: FixedPointNanos::MAX,
    };

    #[inline]
    pub(crate) const fn from_fixed(since_epoch: FixedPointNanos) -> Self {
        Self { since_epoch }
    }

    /// Elapsed time since the Unix epoch (negative before it).
    #[inline]
    pub const fn since_unix_epoch(&self) -> Duration {
        Duration::from_fixed(self.since_epoch)
    }

    /// The instant `offset` after the Unix epoch.
    #[inline]
    pub const fn from_unix_epoch_offset(offset: Duration) -> Self {
        Self::from_fixed(offset.as_fixed())
    }

    // ── current time ──────────────────────────────────────────────────

    /// Read the system clock.
    ///
    /// Successive calls on the same thread never go backwards: if the wall
    /// clock is stepped back, the last value returned on this thread is
    /// returned again until the clock catches up. Calls on different threads
    /// are not ordered with respect to each other.
    pub fn now() -> Self {
        thread_local! {
            static LAST_NOW: Cell<Option<Instant>> = const { Cell::new(None) };
        }
        let read = SystemClock.read_current_instant();
        LAST_NOW.with(|last| {
            let now = match last.get() {
                Some(previous) if previous > read => previous,
                _ => read,
            };
            last.set(Some(now));
            now
        })
    }

    /// Read an arbitrary clock, without the per-thread clamp of [`Instant::now`].
    #[inline]
    pub fn now_from<C: Clock + ?Sized>(clock: &C) -> Self {
        clock.read_current_instant()
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// `self + duration`.
    #[inline]
    pub fn checked_add(self, duration: Duration) -> Result<Self, Error> {
        self.since_epoch
            .checked_add(duration.as_fixed())
            .map(Self::from_fixed)
    }

    /// `self - duration`.
    #[inline]
    pub fn checked_sub(self, duration: Duration) -> Result<Self, Error> {
        self.since_epoch
            .checked_sub(duration.as_fixed())
            .map(Self::from_fixed)
    }

    /// `self - earlier`: positive when `self` is later.
    ///
    /// Fails only when the two instants are further apart than
    /// [`Duration::MAX`].
    #[inline]
    pub fn duration_since(self, earlier: Self) -> Result<Duration, Error> {
        self.since_epoch
            .checked_sub(earlier.since_epoch)
            .map(Duration::from_fixed)
    }

    // ── min / max ─────────────────────────────────────────────────────

    /// The earlier of two instants.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        std::cmp::min(self, other)
    }

    /// The later of two instants.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        std::cmp::max(self, other)
    }
}

/// `later - earlier` as a [`Duration`].
pub fn difference(later: Instant, earlier: Instant) -> Result<Duration, Error> {
    later.duration_since(earlier)
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl Serialize for Instant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Instant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Instant::from_rfc3339(&text).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Clock trait
// ═══════════════════════════════════════════════════════════════════════════

/// A source of the current time, supplied by the host environment.
pub trait Clock: Send + Sync {
    /// The instant the clock reads right now.
    fn read_current_instant(&self) -> Instant;
}

/// The operating system's wall clock, read through `chrono::Utc::now`.
#[derive(Debug, Copy, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn read_current_instant(&self) -> Instant {
        Instant::from_chrono(chrono::Utc::now())
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedClock(pub Instant);

impl Clock for FixedClock {
    #[inline]
    fn read_current_instant(&self) -> Instant {
        self.0
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
