// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-zone rules and civil-time disambiguation.
//!
//! The rule database is an external collaborator: a [`RuleSource`] hands
//! the crate one transition table ([`ZoneRules`]) per zone, and those tables
//! are assembled into an immutable, versioned [`RuleSet`]. A
//! [`TimeZoneRules`] holder publishes one `RuleSet` at a time and swaps in a
//! new one wholesale on reload.
//!
//! Mapping an instant to an offset always has exactly one answer. Mapping a
//! civil reading to an offset does not: around a transition the reading may
//! never occur (a [`Resolution::Gap`]) or occur twice (a
//! [`Resolution::Overlap`]). Callers resolve those cases with an explicit
//! [`DisambiguationPolicy`]; there is no default.

mod rules;
mod source;

pub use rules::{RuleSet, TimeZoneRules, Transition, ZoneRules};
pub use source::{MemorySource, RuleSource};

#[cfg(feature = "tzdb")]
pub use source::TzdbSource;

use crate::instant::Instant;
use crate::offset::UtcOffset;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

/// A zone name that has been checked against a [`RuleSet`].
///
/// Only [`RuleSet::zone`] and [`TimeZoneRules::zone`] create identifiers, so
/// an unknown name fails when the identifier is built rather than at first
/// use. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeZoneIdentifier {
    name: Arc<str>,
}

impl TimeZoneIdentifier {
    pub(crate) fn new(name: &str) -> Self {
        Self { name: name.into() }
    }

    /// The IANA-style name, e.g. `Europe/Berlin`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

#[cfg(feature = "serde")]
impl Serialize for TimeZoneIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.name)
    }
}

/// The offset(s) a zone may use for one civil reading.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The reading occurs exactly once.
    Unique(UtcOffset),
    /// The reading was skipped by a forward transition at `transition`.
    Gap {
        before: UtcOffset,
        after: UtcOffset,
        transition: Instant,
    },
    /// The reading occurs twice because of a backward transition at
    /// `transition`; `earlier` is the offset of the first occurrence.
    Overlap {
        earlier: UtcOffset,
        later: UtcOffset,
        transition: Instant,
    },
}

/// How to resolve a civil reading that falls in a gap.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GapPolicy {
    /// Interpret the reading with the offset in effect before the
    /// transition. The resulting instant lies after the transition.
    EarlierOffset,
    /// Interpret the reading with the offset in effect after the
    /// transition. The resulting instant lies before the transition.
    LaterOffset,
    /// Fail with [`Error::SkippedLocalTime`](crate::Error::SkippedLocalTime).
    RejectGap,
}

/// How to resolve a civil reading that falls in an overlap.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OverlapPolicy {
    /// The first occurrence (the pre-transition offset).
    PreferEarlier,
    /// The second occurrence (the post-transition offset).
    PreferLater,
    /// Fail with [`Error::AmbiguousLocalTime`](crate::Error::AmbiguousLocalTime).
    RejectOverlap,
}

/// The pair of choices every civil-to-instant conversion must be given.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DisambiguationPolicy {
    pub gap: GapPolicy,
    pub overlap: OverlapPolicy,
}

impl DisambiguationPolicy {
    pub const fn new(gap: GapPolicy, overlap: OverlapPolicy) -> Self {
        Self { gap, overlap }
    }

    /// Refuse both gaps and overlaps.
    pub const fn strict() -> Self {
        Self::new(GapPolicy::RejectGap, OverlapPolicy::RejectOverlap)
    }
}

/// How a [`ZonedDateTime`](crate::ZonedDateTime)'s offset was chosen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Disambiguation {
    /// Only one offset was possible.
    Unique,
    /// Gap resolved with [`GapPolicy::EarlierOffset`].
    GapEarlierOffset,
    /// Gap resolved with [`GapPolicy::LaterOffset`].
    GapLaterOffset,
    /// First occurrence of an overlapping reading.
    OverlapEarlier,
    /// Second occurrence of an overlapping reading.
    OverlapLater,
}
