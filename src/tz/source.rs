// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Rule sources: where transition tables come from.

use super::ZoneRules;
use crate::error::Error;

/// The external time-zone rule database.
///
/// A source is queried only while a [`RuleSet`](super::RuleSet) is being
/// built; lookups never reach it.
pub trait RuleSource {
    /// Label for the rule-set version this source produces.
    fn version(&self) -> String;

    /// Every zone name the source can load.
    fn zone_names(&self) -> Vec<String>;

    /// The transition table for `name`.
    fn load_zone(&self, name: &str) -> Result<ZoneRules, Error>;
}

/// Tables held in memory, supplied by the host.
#[derive(Debug, Clone)]
pub struct MemorySource {
    version: String,
    zones: Vec<ZoneRules>,
}

impl MemorySource {
    pub fn new(version: impl Into<String>, zones: impl IntoIterator<Item = ZoneRules>) -> Self {
        Self {
            version: version.into(),
            zones: zones.into_iter().collect(),
        }
    }
}

impl RuleSource for MemorySource {
    fn version(&self) -> String {
        self.version.clone()
    }

    fn zone_names(&self) -> Vec<String> {
        self.zones.iter().map(|z| z.name().to_owned()).collect()
    }

    fn load_zone(&self, name: &str) -> Result<ZoneRules, Error> {
        self.zones
            .iter()
            .find(|z| z.name() == name)
            .cloned()
            .ok_or_else(|| Error::UnknownZone {
                name: name.to_owned(),
            })
    }
}

#[cfg(feature = "tzdb")]
pub use tzdb::TzdbSource;

#[cfg(feature = "tzdb")]
mod tzdb {
    use super::RuleSource;
    use crate::civil::{days_from_civil, MAX_YEAR, MIN_YEAR};
    use crate::error::Error;
    use crate::instant::Instant;
    use crate::offset::UtcOffset;
    use crate::tz::{Transition, ZoneRules};
    use chrono::{DateTime, Offset, TimeZone, Utc};
    use chrono_tz::{Tz, TZ_VARIANTS};
    use std::ops::RangeInclusive;
    use tracing::debug;

    const SECONDS_PER_DAY: i64 = 86_400;

    /// Rules derived from the IANA database bundled with `chrono-tz`.
    ///
    /// chrono-tz answers "what offset applies at this instant" but does not
    /// expose its transition list, so each zone is probed along the UTC
    /// timeline once a day across a window of years, and every change is
    /// bisected down to the exact second. Changes that revert within a
    /// single day are not seen. Outside the window the zone keeps the
    /// offset it had at the window's edge.
    ///
    /// ```no_run
    /// use safetime::{TimeZoneRules, TzdbSource};
    ///
    /// let source = TzdbSource::new()
    ///     .with_years(2000..=2040)
    ///     .with_zones(["Europe/Berlin", "America/New_York"]);
    /// let rules = TimeZoneRules::from_source(&source)?;
    /// # Ok::<(), safetime::Error>(())
    /// ```
    #[derive(Debug, Clone)]
    pub struct TzdbSource {
        years: RangeInclusive<i64>,
        zones: Option<Vec<String>>,
        version: String,
    }

    impl Default for TzdbSource {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TzdbSource {
        /// Every zone, probed over 1970..=2100.
        pub fn new() -> Self {
            Self {
                years: 1970..=2100,
                zones: None,
                version: "chrono-tz".to_owned(),
            }
        }

        /// Probe only the given years.
        pub fn with_years(mut self, years: RangeInclusive<i64>) -> Self {
            self.years = years;
            self
        }

        /// Offer only the named zones.
        pub fn with_zones<I, S>(mut self, zones: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.zones = Some(zones.into_iter().map(Into::into).collect());
            self
        }

        /// Version label of the resulting rule set.
        pub fn with_version(mut self, version: impl Into<String>) -> Self {
            self.version = version.into();
            self
        }

        fn probe(tz: Tz, seconds: i64) -> Result<UtcOffset, Error> {
            let utc = DateTime::<Utc>::from_timestamp(seconds, 0)
                .ok_or(Error::overflow("probe instant outside of chrono's range"))?;
            let fixed = tz.offset_from_utc_datetime(&utc.naive_utc()).fix();
            UtcOffset::from_seconds(fixed.local_minus_utc())
        }
    }

    impl RuleSource for TzdbSource {
        fn version(&self) -> String {
            self.version.clone()
        }

        fn zone_names(&self) -> Vec<String> {
            match &self.zones {
                Some(zones) => zones.clone(),
                None => TZ_VARIANTS.iter().map(|tz| tz.name().to_owned()).collect(),
            }
        }

        fn load_zone(&self, name: &str) -> Result<ZoneRules, Error> {
            let tz: Tz = name.parse().map_err(|_| Error::UnknownZone {
                name: name.to_owned(),
            })?;

            let (first, last) = (*self.years.start(), *self.years.end());
            for year in [first, last] {
                if !(MIN_YEAR..MAX_YEAR).contains(&year) {
                    return Err(Error::civil_field("year", year, MIN_YEAR, MAX_YEAR - 1));
                }
            }
            let start = days_from_civil(first, 1, 1)
                .checked_mul(SECONDS_PER_DAY)
                .ok_or(Error::overflow("probe window start"))?;
            let end = days_from_civil(last + 1, 1, 1)
                .checked_mul(SECONDS_PER_DAY)
                .ok_or(Error::overflow("probe window end"))?;

            let initial = Self::probe(tz, start)?;
            let mut transitions = Vec::new();
            let mut day_start = start;
            let mut current = initial;

            while day_start < end {
                let day_end = (day_start + SECONDS_PER_DAY).min(end);
                let target = Self::probe(tz, day_end)?;

                // Bisect until the day's closing offset is reached; handles
                // more than one change inside the day.
                let mut lo = day_start;
                while current != target {
                    let mut hi = day_end;
                    while hi - lo > 1 {
                        let mid = lo + (hi - lo) / 2;
                        if Self::probe(tz, mid)? == current {
                            lo = mid;
                        } else {
                            hi = mid;
                        }
                    }
                    current = Self::probe(tz, hi)?;
                    transitions.push(Transition::new(Instant::from_unix_seconds(hi), current));
                    lo = hi;
                }
                day_start = day_end;
            }

            debug!(
                zone = name,
                transitions = transitions.len(),
                "derived transitions from chrono-tz"
            );
            ZoneRules::new(name, initial, transitions)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offset::UtcOffset;

    #[test]
    fn memory_source_offers_its_tables() {
        let source = MemorySource::new(
            "host-1",
            [
                ZoneRules::fixed("Etc/UTC", UtcOffset::UTC).unwrap(),
                ZoneRules::fixed("Etc/GMT-3", UtcOffset::from_hours_minutes(3, 0).unwrap()).unwrap(),
            ],
        );
        assert_eq!(source.version(), "host-1");
        assert_eq!(source.zone_names(), vec!["Etc/UTC", "Etc/GMT-3"]);
        assert_eq!(
            source.load_zone("Etc/GMT-3").unwrap().initial_offset(),
            UtcOffset::from_seconds(10_800).unwrap()
        );
        assert!(matches!(
            source.load_zone("Etc/GMT-4"),
            Err(Error::UnknownZone { .. })
        ));
    }

    #[cfg(feature = "tzdb")]
    mod tzdb {
        use super::super::TzdbSource;
        use crate::instant::Instant;
        use crate::offset::UtcOffset;
        use crate::tz::{RuleSource, Transition};
        use crate::Error;

        fn hours(h: i8) -> UtcOffset {
            UtcOffset::from_hours_minutes(h, 0).unwrap()
        }

        fn transitions_in(zone: &str, year: i64) -> Vec<Transition> {
            TzdbSource::new()
                .with_years(year..=year)
                .load_zone(zone)
                .unwrap()
                .transitions()
                .to_vec()
        }

        #[test]
        fn berlin_2026_transitions_are_exact() {
            assert_eq!(
                transitions_in("Europe/Berlin", 2026),
                vec![
                    Transition::new(Instant::from_unix_seconds(1_774_746_000), hours(2)),
                    Transition::new(Instant::from_unix_seconds(1_792_890_000), hours(1)),
                ]
            );
        }

        #[test]
        fn new_york_2024_transitions_are_exact() {
            assert_eq!(
                transitions_in("America/New_York", 2024),
                vec![
                    Transition::new(Instant::from_unix_seconds(1_710_054_000), hours(-4)),
                    Transition::new(Instant::from_unix_seconds(1_730_613_600), hours(-5)),
                ]
            );
        }

        #[test]
        fn zones_without_dst_have_no_transitions() {
            let rules = TzdbSource::new()
                .with_years(2020..=2024)
                .load_zone("Asia/Tokyo")
                .unwrap();
            assert!(rules.transitions().is_empty());
            assert_eq!(rules.initial_offset(), hours(9));
        }

        #[test]
        fn unknown_names_are_reported() {
            assert!(matches!(
                TzdbSource::new().load_zone("Mars/Olympus_Mons"),
                Err(Error::UnknownZone { .. })
            ));
        }

        #[test]
        fn builder_restricts_names_and_labels_the_version() {
            let source = TzdbSource::new()
                .with_zones(["Europe/Berlin"])
                .with_version("test-2026");
            assert_eq!(source.zone_names(), vec!["Europe/Berlin".to_owned()]);
            assert_eq!(source.version(), "test-2026");
            assert!(TzdbSource::new().zone_names().len() > 300);
        }
    }
}
