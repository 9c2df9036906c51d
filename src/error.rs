// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error type shared by every fallible operation in the crate.
//!
//! Each variant is a distinct, named failure condition so that a host can
//! react to, say, an ambiguous local time differently from an unknown time
//! zone. Nothing in the crate logs, retries or substitutes a default value
//! when one of these is produced: the error is handed straight back to the
//! caller.

use thiserror::Error;

/// Failure conditions reported by `safetime`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Arithmetic left the representable range.
    #[error("arithmetic overflow: {what}")]
    Overflow {
        /// The operation that overflowed.
        what: &'static str,
    },

    /// A calendar or clock field is out of range, or the fields do not form
    /// a real date (e.g. February 29 in a common year).
    #[error("invalid civil field {field}: {value} is not in {min}..={max}")]
    InvalidCivilField {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// The time-zone identifier is not present in the rule set.
    #[error("unknown time zone: {name:?}")]
    UnknownZone { name: String },

    /// The local time occurs twice in the zone and the caller asked for
    /// overlaps to be rejected.
    #[error("local time {local} occurs twice in {zone}")]
    AmbiguousLocalTime { local: String, zone: String },

    /// The local time never occurs in the zone and the caller asked for gaps
    /// to be rejected.
    #[error("local time {local} does not exist in {zone}")]
    SkippedLocalTime { local: String, zone: String },

    /// Interchange text could not be parsed.
    #[error("malformed text {input:?}: {reason}")]
    MalformedText { input: String, reason: String },

    /// An exact export was requested but the value has finer precision than
    /// the target unit.
    #[error("precision loss converting to {unit}: remainder of {remainder_nanos}ns")]
    PrecisionLoss {
        unit: &'static str,
        remainder_nanos: i64,
    },

    /// A UTC offset outside of ±26 hours.
    #[error("UTC offset of {nanos}ns is outside of ±26 hours")]
    OffsetOutOfRange { nanos: i128 },

    /// A parsed offset is not the one the zone uses at that instant.
    #[error("offset {offset} is not used by {zone} at local time {local}")]
    OffsetMismatch {
        offset: String,
        zone: String,
        local: String,
    },

    /// A rule source produced a transition table that cannot be used.
    #[error("invalid rule data for {zone}: {reason}")]
    InvalidRuleData { zone: String, reason: String },
}

impl Error {
    pub(crate) const fn overflow(what: &'static str) -> Self {
        Error::Overflow { what }
    }

    pub(crate) fn civil_field(field: &'static str, value: i64, min: i64, max: i64) -> Self {
        Error::InvalidCivilField {
            field,
            value,
            min,
            max,
        }
    }

    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Error::MalformedText {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn rule_data(zone: &str, reason: impl Into<String>) -> Self {
        Error::InvalidRuleData {
            zone: zone.to_owned(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = Error::civil_field("day", 29, 1, 28);
        assert_eq!(
            err.to_string(),
            "invalid civil field day: 29 is not in 1..=28"
        );

        let err = Error::UnknownZone {
            name: "Mars/Olympus_Mons".into(),
        };
        assert!(err.to_string().contains("Mars/Olympus_Mons"));
    }

    #[test]
    fn distinct_conditions_do_not_compare_equal() {
        let skipped = Error::SkippedLocalTime {
            local: "2024-03-10T02:30:00".into(),
            zone: "America/New_York".into(),
        };
        let ambiguous = Error::AmbiguousLocalTime {
            local: "2024-03-10T02:30:00".into(),
            zone: "America/New_York".into(),
        };
        assert_ne!(skipped, ambiguous);
    }
}
