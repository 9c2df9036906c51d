// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Transition tables, versioned rule sets and the shared snapshot holder.

use super::{Resolution, RuleSource, TimeZoneIdentifier};
use crate::civil::CivilDateTime;
use crate::error::Error;
use crate::instant::Instant;
use crate::offset::UtcOffset;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

// ═══════════════════════════════════════════════════════════════════════════
// ZoneRules
// ═══════════════════════════════════════════════════════════════════════════

/// From `at` onwards the zone uses `offset`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    pub at: Instant,
    pub offset: UtcOffset,
}

impl Transition {
    pub const fn new(at: Instant, offset: UtcOffset) -> Self {
        Self { at, offset }
    }
}

/// Half-open range of local nanoseconds that is skipped or repeated around
/// one transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct LocalWindow {
    start: i128,
    end: i128,
}

/// Zone names must survive the bracketed RFC 9557 suffix unchanged.
fn checked_name(name: String) -> Result<String, Error> {
    if name.is_empty() {
        return Err(Error::rule_data(&name, "empty zone name"));
    }
    if name.starts_with('!') {
        return Err(Error::rule_data(&name, "zone name starts with '!'"));
    }
    if let Some(bad) = name
        .chars()
        .find(|&c| matches!(c, '[' | ']' | '=') || c.is_whitespace() || c.is_control())
    {
        return Err(Error::rule_data(&name, format!("zone name contains {bad:?}")));
    }
    Ok(name)
}

/// The offset history of one zone.
///
/// Before the first transition the zone uses `initial`; each [`Transition`]
/// switches to a new offset from its instant onwards. Tables are validated
/// on construction:
///
/// * the name is non-empty, does not start with `!`, and holds no `[`,
///   `]`, `=`, whitespace or control characters;
/// * transition instants are strictly increasing;
/// * transitions that do not change the offset are dropped;
/// * the local-time windows skipped or repeated by consecutive transitions
///   do not overlap, so every civil reading is affected by at most one
///   transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRules {
    name: String,
    initial: UtcOffset,
    transitions: Vec<Transition>,
    windows: Vec<LocalWindow>,
}

impl ZoneRules {
    /// Validate and build a transition table.
    pub fn new(
        name: impl Into<String>,
        initial: UtcOffset,
        transitions: impl IntoIterator<Item = Transition>,
    ) -> Result<Self, Error> {
        let name = checked_name(name.into())?;
        let mut kept: Vec<Transition> = Vec::new();
        let mut windows: Vec<LocalWindow> = Vec::new();
        let mut previous_at: Option<Instant> = None;
        let mut previous = initial;

        for transition in transitions {
            if previous_at.is_some_and(|at| transition.at <= at) {
                return Err(Error::rule_data(
                    &name,
                    format!(
                        "transition at {} is not after the previous one",
                        transition.at.to_rfc3339()
                    ),
                ));
            }
            previous_at = Some(transition.at);
            if transition.offset == previous {
                continue;
            }

            let at = transition.at.since_unix_epoch().to_nanos_i128();
            let window = LocalWindow {
                start: at + previous.nanos().min(transition.offset.nanos()),
                end: at + previous.nanos().max(transition.offset.nanos()),
            };
            if windows.last().is_some_and(|last| window.start < last.end) {
                return Err(Error::rule_data(
                    &name,
                    format!(
                        "transition at {} overlaps the previous one in local time",
                        transition.at.to_rfc3339()
                    ),
                ));
            }
            windows.push(window);
            kept.push(transition);
            previous = transition.offset;
        }

        Ok(Self {
            name,
            initial,
            transitions: kept,
            windows,
        })
    }

    /// A zone that has always used `offset`.
    pub fn fixed(name: impl Into<String>, offset: UtcOffset) -> Result<Self, Error> {
        Ok(Self {
            name: checked_name(name.into())?,
            initial: offset,
            transitions: Vec::new(),
            windows: Vec::new(),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Offset in effect before the first transition.
    #[inline]
    pub fn initial_offset(&self) -> UtcOffset {
        self.initial
    }

    /// The validated transitions, in time order.
    #[inline]
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Offset in effect at `instant`. Always exactly one.
    pub fn offset_for_instant(&self, instant: Instant) -> UtcOffset {
        let after = self.transitions.partition_point(|t| t.at <= instant);
        self.offset_before(after)
    }

    /// Classify `civil` as unique, skipped or repeated in this zone.
    pub fn offset_for_civil(&self, civil: &CivilDateTime) -> Resolution {
        let local = civil.to_local_nanos();
        let index = self.windows.partition_point(|w| w.end <= local);
        let before = self.offset_before(index);
        match (self.windows.get(index), self.transitions.get(index)) {
            (Some(window), Some(transition)) if window.start <= local => {
                if transition.offset > before {
                    Resolution::Gap {
                        before,
                        after: transition.offset,
                        transition: transition.at,
                    }
                } else {
                    Resolution::Overlap {
                        earlier: before,
                        later: transition.offset,
                        transition: transition.at,
                    }
                }
            }
            _ => Resolution::Unique(before),
        }
    }

    /// Offset in effect just before transition `index`.
    fn offset_before(&self, index: usize) -> UtcOffset {
        match index.checked_sub(1).and_then(|i| self.transitions.get(i)) {
            Some(previous) => previous.offset,
            None => self.initial,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// RuleSet
// ═══════════════════════════════════════════════════════════════════════════

/// An immutable, versioned collection of zone tables.
///
/// Every lookup made through one `RuleSet` sees the same rules, however
/// many reloads happen meanwhile in the [`TimeZoneRules`] it came from.
#[derive(Debug, Clone)]
pub struct RuleSet {
    version: String,
    zones: HashMap<String, ZoneRules>,
}

impl RuleSet {
    /// Assemble a rule set. A later table replaces an earlier one with the
    /// same name.
    pub fn new(version: impl Into<String>, zones: impl IntoIterator<Item = ZoneRules>) -> Self {
        Self {
            version: version.into(),
            zones: zones
                .into_iter()
                .map(|rules| (rules.name.clone(), rules))
                .collect(),
        }
    }

    /// Load every zone `source` offers. Fails on the first zone that cannot
    /// be loaded.
    pub fn from_source<S: RuleSource + ?Sized>(source: &S) -> Result<Self, Error> {
        let version = source.version();
        let mut zones = HashMap::new();
        for name in source.zone_names() {
            let rules = source.load_zone(&name)?;
            debug!(
                zone = %name,
                transitions = rules.transitions.len(),
                "loaded zone rules"
            );
            zones.insert(rules.name.clone(), rules);
        }
        info!(version = %version, zones = zones.len(), "built time-zone rule set");
        Ok(Self { version, zones })
    }

    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.zones.contains_key(name)
    }

    /// Zone names in no particular order.
    pub fn zone_names(&self) -> impl Iterator<Item = &str> {
        self.zones.keys().map(String::as_str)
    }

    /// Validate `name` and return its identifier.
    pub fn zone(&self, name: &str) -> Result<TimeZoneIdentifier, Error> {
        match self.zones.get_key_value(name) {
            Some((key, _)) => Ok(TimeZoneIdentifier::new(key)),
            None => Err(Error::UnknownZone {
                name: name.to_owned(),
            }),
        }
    }

    /// The table for `zone`.
    ///
    /// Fails with `UnknownZone` only when `zone` was validated against a
    /// different rule set that still had it.
    pub fn rules_for(&self, zone: &TimeZoneIdentifier) -> Result<&ZoneRules, Error> {
        self.zones
            .get(zone.as_str())
            .ok_or_else(|| Error::UnknownZone {
                name: zone.as_str().to_owned(),
            })
    }

    pub fn offset_for_instant(
        &self,
        zone: &TimeZoneIdentifier,
        instant: Instant,
    ) -> Result<UtcOffset, Error> {
        Ok(self.rules_for(zone)?.offset_for_instant(instant))
    }

    pub fn offset_for_civil(
        &self,
        zone: &TimeZoneIdentifier,
        civil: &CivilDateTime,
    ) -> Result<Resolution, Error> {
        Ok(self.rules_for(zone)?.offset_for_civil(civil))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TimeZoneRules
// ═══════════════════════════════════════════════════════════════════════════

/// Publishes the current [`RuleSet`] to any number of threads.
///
/// Readers call [`TimeZoneRules::snapshot`], which clones an `Arc` under a
/// read lock that is released before the lookup runs. A reload builds the
/// new rule set completely and then swaps the `Arc` under the write lock,
/// so a reader sees either the old set or the new one, never a mixture.
#[derive(Debug)]
pub struct TimeZoneRules {
    current: RwLock<Arc<RuleSet>>,
}

impl TimeZoneRules {
    pub fn new(set: RuleSet) -> Self {
        info!(
            version = %set.version,
            zones = set.len(),
            "publishing time-zone rule set"
        );
        Self {
            current: RwLock::new(Arc::new(set)),
        }
    }

    pub fn from_source<S: RuleSource + ?Sized>(source: &S) -> Result<Self, Error> {
        RuleSet::from_source(source).map(Self::new)
    }

    /// The rule set in effect right now.
    #[inline]
    pub fn snapshot(&self) -> Arc<RuleSet> {
        Arc::clone(&self.current.read())
    }

    /// Publish `set`, returning the set it replaces.
    pub fn replace(&self, set: RuleSet) -> Arc<RuleSet> {
        let new = Arc::new(set);
        let old = std::mem::replace(&mut *self.current.write(), Arc::clone(&new));
        info!(
            old_version = %old.version,
            new_version = %new.version,
            zones = new.len(),
            "replaced time-zone rule set"
        );
        old
    }

    /// Rebuild from `source` and publish the result. On failure the current
    /// set stays in place.
    pub fn reload<S: RuleSource + ?Sized>(&self, source: &S) -> Result<Arc<RuleSet>, Error> {
        let set = RuleSet::from_source(source)?;
        Ok(self.replace(set))
    }

    pub fn version(&self) -> String {
        self.snapshot().version.clone()
    }

    pub fn zone(&self, name: &str) -> Result<TimeZoneIdentifier, Error> {
        self.snapshot().zone(name)
    }

    pub fn offset_for_instant(
        &self,
        zone: &TimeZoneIdentifier,
        instant: Instant,
    ) -> Result<UtcOffset, Error> {
        self.snapshot().offset_for_instant(zone, instant)
    }

    pub fn offset_for_civil(
        &self,
        zone: &TimeZoneIdentifier,
        civil: &CivilDateTime,
    ) -> Result<Resolution, Error> {
        self.snapshot().offset_for_civil(zone, civil)
    }

    /// Process-wide rules loaded once from the bundled IANA database.
    ///
    /// The first call derives every zone from chrono-tz, which takes a
    /// while; later calls return the same holder. A failed load is cached
    /// and returned to every caller.
    ///
    /// The holder uses [`TzdbSource::new`](super::TzdbSource::new), which
    /// derives transitions for the years 1970 through 2100 only. Instants
    /// outside that window get the offset in effect at its nearer edge, so
    /// zone history before 1970 is flattened. Build a [`TimeZoneRules`]
    /// from a source configured with `with_years` when older history
    /// matters.
    #[cfg(feature = "tzdb")]
    pub fn global() -> Result<&'static TimeZoneRules, Error> {
        use std::sync::OnceLock;

        static GLOBAL: OnceLock<Result<TimeZoneRules, Error>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| TimeZoneRules::from_source(&super::TzdbSource::new()))
            .as_ref()
            .map_err(Clone::clone)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
