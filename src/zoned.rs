// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil readings pinned to a time zone.
//!
//! A [`ZonedDateTime`] is built either from an [`Instant`] (always exactly
//! one answer) or from a [`CivilDateTime`] plus a [`DisambiguationPolicy`]
//! (which may be needed to pick between zero or two answers). Either way
//! the result stores the resolved instant, the offset in effect at that
//! instant and the civil reading a wall clock in the zone shows then, so
//! [`ZonedDateTime::to_instant`] never fails.
//!
//! Every constructor takes the [`RuleSet`] to resolve against, so one
//! operation sees one rule-set version from start to finish. Take a
//! snapshot with [`TimeZoneRules::snapshot`](crate::TimeZoneRules::snapshot)
//! first.

use crate::civil::{CalendarUnit, CivilDateTime};
use crate::duration::Duration;
use crate::error::Error;
use crate::instant::Instant;
use crate::offset::UtcOffset;
use crate::tz::{
    Disambiguation, DisambiguationPolicy, GapPolicy, OverlapPolicy, Resolution, RuleSet,
    TimeZoneIdentifier,
};
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

/// A point in time together with the zone it is read in.
///
/// Equality and hashing compare the instant, offset, civil reading and
/// zone; how the offset was chosen ([`ZonedDateTime::disambiguation`]) is
/// not part of the value.
#[derive(Debug, Clone)]
pub struct ZonedDateTime {
    instant: Instant,
    offset: UtcOffset,
    civil: CivilDateTime,
    zone: TimeZoneIdentifier,
    disambiguation: Disambiguation,
}

impl ZonedDateTime {
    /// The reading of `zone` at `instant`.
    ///
    /// Fails only if `zone` is not part of `rules`.
    pub fn from_instant(
        instant: Instant,
        zone: &TimeZoneIdentifier,
        rules: &RuleSet,
    ) -> Result<Self, Error> {
        let table = rules.rules_for(zone)?;
        let offset = table.offset_for_instant(instant);
        let civil = CivilDateTime::wall_clock(instant, offset);
        let disambiguation = match table.offset_for_civil(&civil) {
            Resolution::Overlap { earlier, .. } if offset == earlier => {
                Disambiguation::OverlapEarlier
            }
            Resolution::Overlap { .. } => Disambiguation::OverlapLater,
            _ => Disambiguation::Unique,
        };
        Ok(Self {
            instant,
            offset,
            civil,
            zone: zone.clone(),
            disambiguation,
        })
    }

    /// Resolve `civil` in `zone`.
    ///
    /// Gap readings are interpreted with the offset the policy selects and
    /// then normalised: the stored civil reading is the one the wall clock
    /// actually showed at the resulting instant (02:30 in a 02:00 → 03:00
    /// gap becomes 03:30 with [`GapPolicy::EarlierOffset`]).
    ///
    /// # Errors
    ///
    /// * `SkippedLocalTime` for a gap under [`GapPolicy::RejectGap`];
    /// * `AmbiguousLocalTime` for an overlap under
    ///   [`OverlapPolicy::RejectOverlap`];
    /// * `UnknownZone` if `zone` is not part of `rules`;
    /// * `Overflow` if the reading lies outside the representable instants.
    pub fn from_civil(
        civil: CivilDateTime,
        zone: &TimeZoneIdentifier,
        policy: DisambiguationPolicy,
        rules: &RuleSet,
    ) -> Result<Self, Error> {
        let table = rules.rules_for(zone)?;
        let (assumed, disambiguation) = match table.offset_for_civil(&civil) {
            Resolution::Unique(offset) => (offset, Disambiguation::Unique),
            Resolution::Gap { before, after, .. } => match policy.gap {
                GapPolicy::EarlierOffset => (before, Disambiguation::GapEarlierOffset),
                GapPolicy::LaterOffset => (after, Disambiguation::GapLaterOffset),
                GapPolicy::RejectGap => {
                    return Err(Error::SkippedLocalTime {
                        local: civil.to_iso8601(),
                        zone: zone.as_str().to_owned(),
                    })
                }
            },
            Resolution::Overlap { earlier, later, .. } => match policy.overlap {
                OverlapPolicy::PreferEarlier => (earlier, Disambiguation::OverlapEarlier),
                OverlapPolicy::PreferLater => (later, Disambiguation::OverlapLater),
                OverlapPolicy::RejectOverlap => {
                    return Err(Error::AmbiguousLocalTime {
                        local: civil.to_iso8601(),
                        zone: zone.as_str().to_owned(),
                    })
                }
            },
        };

        let instant = civil.instant_at(assumed)?;
        let offset = table.offset_for_instant(instant);
        Ok(Self {
            instant,
            offset,
            civil: CivilDateTime::wall_clock(instant, offset),
            zone: zone.clone(),
            disambiguation,
        })
    }

    // ── accessors ─────────────────────────────────────────────────────

    /// The absolute instant. Total.
    #[inline]
    pub fn to_instant(&self) -> Instant {
        self.instant
    }

    #[inline]
    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// The wall-clock reading in [`ZonedDateTime::zone`].
    #[inline]
    pub fn civil(&self) -> CivilDateTime {
        self.civil
    }

    #[inline]
    pub fn zone(&self) -> &TimeZoneIdentifier {
        &self.zone
    }

    #[inline]
    pub fn disambiguation(&self) -> Disambiguation {
        self.disambiguation
    }

    // ── derived values ────────────────────────────────────────────────

    /// The same instant read in another zone.
    pub fn with_zone(&self, zone: &TimeZoneIdentifier, rules: &RuleSet) -> Result<Self, Error> {
        Self::from_instant(self.instant, zone, rules)
    }

    /// Move by exact elapsed time. Across a transition the wall clock may
    /// move by more or less than `duration`.
    pub fn checked_add_duration(&self, duration: Duration, rules: &RuleSet) -> Result<Self, Error> {
        let instant = self.instant.checked_add(duration)?;
        Self::from_instant(instant, &self.zone, rules)
    }

    /// Move the civil reading by whole years or months (clamping the day
    /// of month) and resolve the result again with `policy`.
    pub fn add_calendar_unit(
        &self,
        unit: CalendarUnit,
        amount: i64,
        policy: DisambiguationPolicy,
        rules: &RuleSet,
    ) -> Result<Self, Error> {
        let civil = self.civil.add_calendar_unit(unit, amount)?;
        Self::from_civil(civil, &self.zone, policy, rules)
    }
}

impl PartialEq for ZonedDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
            && self.offset == other.offset
            && self.civil == other.civil
            && self.zone == other.zone
    }
}

impl Eq for ZonedDateTime {}

impl Hash for ZonedDateTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.instant.hash(state);
        self.offset.hash(state);
        self.civil.hash(state);
        self.zone.hash(state);
    }
}

#[cfg(feature = "serde")]
impl Serialize for ZonedDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_rfc9557())
    }
}

/// Deserialized against [`TimeZoneRules::global`](crate::TimeZoneRules::global).
#[cfg(all(feature = "serde", feature = "tzdb"))]
impl<'de> serde::Deserialize<'de> for ZonedDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;
        use serde::Deserialize as _;

        let text = String::deserialize(deserializer)?;
        let rules = crate::TimeZoneRules::global().map_err(D::Error::custom)?;
        ZonedDateTime::from_rfc9557(&text, &rules.snapshot()).map_err(D::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
