// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Misuse-resistant time values.
//!
//! This crate keeps three ideas apart that are easy to conflate: a point on
//! the global timeline, a span of elapsed time, and what a wall clock in
//! some zone shows. Crossings between them, and between them and plain
//! numbers or text, are explicit and named.
//!
//! # Core types
//!
//! - [`Instant`]: an absolute point in time, nanoseconds since the Unix
//!   epoch (leap seconds are not modelled).
//! - [`Duration`]: a signed elapsed span of time.
//! - [`CivilDateTime`]: a validated calendar and clock reading with no zone.
//! - [`UtcOffset`]: the `local - UTC` difference in effect somewhere.
//! - [`ZonedDateTime`]: an instant read in a named time zone.
//! - [`TimeZoneRules`]: the shared, atomically replaceable rule snapshot.
//!
//! Underneath `Instant` and `Duration` sits [`FixedPointNanos`], an `i128`
//! nanosecond count bounded to every `i64` count of seconds. Arithmetic that
//! would leave that range fails with [`Error::Overflow`].
//!
//! # Time zones and disambiguation
//!
//! Turning a civil reading into an instant may have no answer (a
//! spring-forward gap) or two (a fall-back overlap). Every such conversion
//! takes a [`DisambiguationPolicy`]; nothing is picked silently.
//!
//! ```
//! use safetime::{
//!     CivilDateTime, DisambiguationPolicy, GapPolicy, OverlapPolicy, RuleSet, Transition,
//!     UtcOffset, ZoneRules, ZonedDateTime, Instant,
//! };
//!
//! let est = UtcOffset::from_hours_minutes(-5, 0)?;
//! let edt = UtcOffset::from_hours_minutes(-4, 0)?;
//! let zone = ZoneRules::new(
//!     "Example/Eastern",
//!     est,
//!     [Transition::new(Instant::from_unix_seconds(1_710_054_000), edt)],
//! )?;
//! let rules = RuleSet::new("example", [zone]);
//! let eastern = rules.zone("Example/Eastern")?;
//!
//! let skipped = CivilDateTime::new(2024, 3, 10, 2, 30, 0, 0)?;
//! let strict = DisambiguationPolicy::strict();
//! assert!(ZonedDateTime::from_civil(skipped, &eastern, strict, &rules).is_err());
//!
//! let lenient = DisambiguationPolicy::new(GapPolicy::EarlierOffset, OverlapPolicy::PreferEarlier);
//! let zoned = ZonedDateTime::from_civil(skipped, &eastern, lenient, &rules)?;
//! assert_eq!(zoned.to_rfc9557(), "2024-03-10T03:30:00-04:00[Example/Eastern]");
//! # Ok::<(), safetime::Error>(())
//! ```
//!
//! # Features
//!
//! | Feature | Default | Adds |
//! |---------|---------|------|
//! | `tzdb` | yes | [`TzdbSource`] and [`TimeZoneRules::global`], backed by `chrono-tz` |
//! | `serde` | no | `Serialize`/`Deserialize` using the canonical text forms |

mod civil;
mod duration;
mod error;
mod fixed;
pub mod gate;
mod instant;
mod offset;
mod rfc3339;
pub mod tz;
mod zoned;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use civil::{days_in_month, is_leap_year, CalendarUnit, CivilDateTime, MAX_YEAR, MIN_YEAR};
pub use duration::{Duration, TimeUnit};
pub use error::Error;
pub use fixed::FixedPointNanos;
pub use gate::{
    instant_from_unix_micros, instant_from_unix_millis, instant_from_unix_nanos,
    instant_from_unix_seconds, instant_to_unix_micros, instant_to_unix_millis,
    instant_to_unix_nanos, instant_to_unix_seconds,
};
pub use instant::{difference, Clock, FixedClock, Instant, SystemClock};
pub use offset::UtcOffset;
pub use tz::{
    Disambiguation, DisambiguationPolicy, GapPolicy, MemorySource, OverlapPolicy, Resolution,
    RuleSet, RuleSource, TimeZoneIdentifier, TimeZoneRules, Transition, ZoneRules,
};
pub use zoned::ZonedDateTime;

#[cfg(feature = "tzdb")]
pub use tz::TzdbSource;
