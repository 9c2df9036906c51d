// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Parser and printer for the canonical interchange text.
//!
//! ```text
//! civil   = date "T" time
//! date    = year "-" MM "-" DD
//! year    = 4DIGIT / ("+" / "-") 6*12DIGIT
//! time    = hh ":" mm ":" ss [("." / ",") 1*9DIGIT]
//! offset  = "Z" / ("+" / "-") hh ":" mm [":" ss [("." / ",") 1*9DIGIT]]
//! instant = civil offset
//! zoned   = civil offset "[" ["!"] zone-name "]"
//! ```
//!
//! `T` and `Z` may be lower case on input. Printing always uses upper case,
//! drops trailing zeros from the fraction and omits a zero fraction, so the
//! printed text is unique for each value. Structural problems are reported
//! as `MalformedText`; a well-formed date that does not exist is reported by
//! the [`CivilDateTime`] validation as `InvalidCivilField`.

use crate::civil::CivilDateTime;
use crate::error::Error;
use crate::fixed::{NANOS_PER_HOUR, NANOS_PER_MINUTE, NANOS_PER_SECOND};
use crate::instant::Instant;
use crate::offset::UtcOffset;

const MAX_FRACTION_DIGITS: usize = 9;
const MAX_EXPANDED_YEAR_DIGITS: usize = 12;

// ═══════════════════════════════════════════════════════════════════════════
// Parsing
// ═══════════════════════════════════════════════════════════════════════════

/// A cursor over the input bytes that remembers the full text for errors.
struct Parser<'i> {
    text: &'i str,
    input: &'i [u8],
}

impl<'i> Parser<'i> {
    fn new(text: &'i str) -> Self {
        Self {
            text,
            input: text.as_bytes(),
        }
    }

    fn fail(&self, reason: impl Into<String>) -> Error {
        Error::malformed(self.text, reason)
    }

    fn peek(&self) -> Option<u8> {
        self.input.first().copied()
    }

    fn bump(&mut self) {
        self.input = self.input.get(1..).unwrap_or_default();
    }

    fn expect(&mut self, accepted: &[u8], what: &str) -> Result<u8, Error> {
        match self.peek() {
            Some(byte) if accepted.contains(&byte) => {
                self.bump();
                Ok(byte)
            }
            Some(byte) => Err(self.fail(format!(
                "expected {what}, found {:?}",
                char::from(byte)
            ))),
            None => Err(self.fail(format!("expected {what}, found end of input"))),
        }
    }

    fn count_digits(&self) -> usize {
        self.input.iter().take_while(|b| b.is_ascii_digit()).count()
    }

    /// Exactly `count` ASCII digits.
    fn fixed_digits(&mut self, count: usize, what: &str) -> Result<u64, Error> {
        if self.count_digits() < count {
            return Err(self.fail(format!("expected {count}-digit {what}")));
        }
        let (digits, rest) = self.input.split_at(count);
        self.input = rest;
        Ok(digits
            .iter()
            .fold(0u64, |acc, d| acc * 10 + u64::from(d - b'0')))
    }

    fn two_digits(&mut self, what: &str) -> Result<u8, Error> {
        // at most 99
        self.fixed_digits(2, what).map(|v| v as u8)
    }

    fn year(&mut self) -> Result<i64, Error> {
        let sign = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return self.fixed_digits(4, "year").map(|y| y as i64),
        };
        self.bump();
        let digits = self.count_digits();
        if !(6..=MAX_EXPANDED_YEAR_DIGITS).contains(&digits) {
            return Err(self.fail("expanded year must have 6 to 12 digits"));
        }
        let year = self.fixed_digits(digits, "year")? as i64;
        if year == 0 && sign < 0 {
            return Err(self.fail("year zero must not be written with a minus sign"));
        }
        Ok(sign * year)
    }

    /// Optional `.fff` / `,fff`, scaled to nanoseconds.
    fn fraction(&mut self) -> Result<u32, Error> {
        if !matches!(self.peek(), Some(b'.' | b',')) {
            return Ok(0);
        }
        self.bump();
        let digits = self.count_digits();
        if digits == 0 {
            return Err(self.fail("expected digits after the decimal separator"));
        }
        if digits > MAX_FRACTION_DIGITS {
            return Err(self.fail("more than 9 fractional digits"));
        }
        let value = self.fixed_digits(digits, "fraction")?;
        let scale = 10u64.pow((MAX_FRACTION_DIGITS - digits) as u32);
        Ok((value * scale) as u32)
    }

    fn civil(&mut self) -> Result<CivilDateTime, Error> {
        let year = self.year()?;
        self.expect(b"-", "'-' after year")?;
        let month = self.two_digits("month")?;
        self.expect(b"-", "'-' after month")?;
        let day = self.two_digits("day")?;
        self.expect(b"Tt", "'T' between date and time")?;
        let hour = self.two_digits("hour")?;
        self.expect(b":", "':' after hour")?;
        let minute = self.two_digits("minute")?;
        self.expect(b":", "':' after minute")?;
        let second = self.two_digits("second")?;
        let nanosecond = self.fraction()?;
        CivilDateTime::new(year, month, day, hour, minute, second, nanosecond)
    }

    fn offset(&mut self, allow_zulu: bool) -> Result<UtcOffset, Error> {
        if allow_zulu && matches!(self.peek(), Some(b'Z' | b'z')) {
            self.bump();
            return Ok(UtcOffset::UTC);
        }
        let negative = self.expect(b"+-", "UTC offset sign")? == b'-';
        let hours = self.two_digits("offset hours")?;
        self.expect(b":", "':' in UTC offset")?;
        let minutes = self.two_digits("offset minutes")?;
        let (seconds, nanos) = if self.peek() == Some(b':') {
            self.bump();
            let seconds = self.two_digits("offset seconds")?;
            (seconds, self.fraction()?)
        } else {
            (0, 0)
        };
        if minutes > 59 || seconds > 59 {
            return Err(self.fail("offset minutes and seconds must be below 60"));
        }
        let magnitude = i128::from(hours) * NANOS_PER_HOUR
            + i128::from(minutes) * NANOS_PER_MINUTE
            + i128::from(seconds) * NANOS_PER_SECOND
            + i128::from(nanos);
        UtcOffset::from_nanos_i128(if negative { -magnitude } else { magnitude })
    }

    fn bracketed_zone(&mut self) -> Result<&'i str, Error> {
        self.expect(b"[", "'[' before the time-zone name")?;
        if self.peek() == Some(b'!') {
            self.bump();
        }
        let len = self.input.iter().take_while(|&&b| b != b']').count();
        if len == 0 {
            return Err(self.fail("empty time-zone name"));
        }
        let (name, rest) = self.input.split_at(len);
        if name.contains(&b'=') {
            return Err(self.fail("key=value annotations are not supported"));
        }
        self.input = rest;
        self.expect(b"]", "']' after the time-zone name")?;
        std::str::from_utf8(name).map_err(|_| self.fail("time-zone name is not UTF-8"))
    }

    fn finish(&self) -> Result<(), Error> {
        if self.input.is_empty() {
            Ok(())
        } else {
            Err(self.fail(format!(
                "unexpected trailing text {:?}",
                String::from_utf8_lossy(self.input)
            )))
        }
    }
}

/// `civil offset`, as an instant.
pub(crate) fn parse_instant(text: &str) -> Result<Instant, Error> {
    let mut parser = Parser::new(text);
    let civil = parser.civil()?;
    let offset = parser.offset(true)?;
    parser.finish()?;
    civil.instant_at(offset)
}

/// `civil` with nothing after it.
pub(crate) fn parse_civil(text: &str) -> Result<CivilDateTime, Error> {
    let mut parser = Parser::new(text);
    let civil = parser.civil()?;
    if !parser.input.is_empty() {
        return Err(parser.fail("a civil date-time takes no offset or zone suffix"));
    }
    Ok(civil)
}

/// A bare offset such as `+05:30` (no `Z`).
pub(crate) fn parse_offset(text: &str) -> Result<UtcOffset, Error> {
    let mut parser = Parser::new(text);
    let offset = parser.offset(false)?;
    parser.finish()?;
    Ok(offset)
}

/// `civil offset [zone]`, split into its parts; the caller checks them
/// against the zone's rules. A `Z` offset comes back as `None`: the
/// reading is UTC and the zone's own offset is still to be looked up.
pub(crate) fn parse_zoned(
    text: &str,
) -> Result<(CivilDateTime, Option<UtcOffset>, &str), Error> {
    let mut parser = Parser::new(text);
    let civil = parser.civil()?;
    let offset = if matches!(parser.peek(), Some(b'Z' | b'z')) {
        parser.bump();
        None
    } else {
        Some(parser.offset(false)?)
    };
    let zone = parser.bracketed_zone()?;
    parser.finish()?;
    Ok((civil, offset, zone))
}

// ═══════════════════════════════════════════════════════════════════════════
// Printing
// ═══════════════════════════════════════════════════════════════════════════

fn year_text(year: i64) -> String {
    if (0..=9999).contains(&year) {
        format!("{year:04}")
    } else if year < 0 {
        format!("-{:06}", year.unsigned_abs())
    } else {
        format!("+{year:06}")
    }
}

fn fraction_text(nanos: u32) -> String {
    if nanos == 0 {
        return String::new();
    }
    let digits = format!("{nanos:09}");
    format!(".{}", digits.trim_end_matches('0'))
}

pub(crate) fn format_civil(civil: &CivilDateTime) -> String {
    format!(
        "{}-{:02}-{:02}T{:02}:{:02}:{:02}{}",
        year_text(civil.year()),
        civil.month(),
        civil.day(),
        civil.hour(),
        civil.minute(),
        civil.second(),
        fraction_text(civil.nanosecond()),
    )
}

pub(crate) fn format_offset(offset: UtcOffset) -> String {
    let sign = if offset.nanos() < 0 { '-' } else { '+' };
    let magnitude = offset.nanos().unsigned_abs();
    let hours = magnitude / NANOS_PER_HOUR as u128;
    let minutes = magnitude % NANOS_PER_HOUR as u128 / NANOS_PER_MINUTE as u128;
    let seconds = magnitude % NANOS_PER_MINUTE as u128 / NANOS_PER_SECOND as u128;
    let nanos = (magnitude % NANOS_PER_SECOND as u128) as u32;
    if seconds == 0 && nanos == 0 {
        format!("{sign}{hours:02}:{minutes:02}")
    } else {
        format!(
            "{sign}{hours:02}:{minutes:02}:{seconds:02}{}",
            fraction_text(nanos)
        )
    }
}

pub(crate) fn format_instant(instant: Instant) -> String {
    let civil = CivilDateTime::wall_clock(instant, UtcOffset::UTC);
    format!("{}Z", format_civil(&civil))
}

pub(crate) fn format_zoned(civil: &CivilDateTime, offset: UtcOffset, zone: &str) -> String {
    format!("{}{}[{zone}]", format_civil(civil), format_offset(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn civil(y: i64, mo: u8, d: u8, h: u8, mi: u8, s: u8, ns: u32) -> CivilDateTime {
        CivilDateTime::new(y, mo, d, h, mi, s, ns).unwrap()
    }

    #[test]
    fn instants_print_in_utc() {
        let leap_day = Instant::from_unix_seconds(1_709_210_096);
        assert_eq!(format_instant(leap_day), "2024-02-29T12:34:56Z");
        assert_eq!(
            format_instant(Instant::from_unix_nanos(-1)),
            "1969-12-31T23:59:59.999999999Z"
        );
        assert_eq!(
            format_instant(Instant::from_unix_millis(1_500)),
            "1970-01-01T00:00:01.5Z"
        );
    }

    #[test]
    fn instants_parse_with_any_offset() {
        let expected = Instant::from_unix_seconds(946_684_800);
        assert_eq!(parse_instant("2000-01-01T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_instant("2000-01-01t00:00:00z").unwrap(), expected);
        assert_eq!(parse_instant("2000-01-01T01:00:00+01:00").unwrap(), expected);
        assert_eq!(parse_instant("1999-12-31T19:00:00-05:00").unwrap(), expected);
        assert_eq!(
            parse_instant("2000-01-01T00:00:00,25Z").unwrap(),
            Instant::from_unix_millis(946_684_800_250)
        );
    }

    #[test]
    fn expanded_years() {
        assert_eq!(year_text(-1), "-000001");
        assert_eq!(year_text(10_000), "+010000");
        assert_eq!(year_text(0), "0000");
        let ancient = civil(-44, 3, 15, 12, 0, 0, 0);
        assert_eq!(format_civil(&ancient), "-000044-03-15T12:00:00");
        assert_eq!(parse_civil("-000044-03-15T12:00:00").unwrap(), ancient);
        assert_eq!(
            parse_civil("+275760-09-13T00:00:00").unwrap(),
            civil(275_760, 9, 13, 0, 0, 0, 0)
        );
        assert!(matches!(
            parse_civil("-000000-01-01T00:00:00"),
            Err(Error::MalformedText { .. })
        ));
        assert!(parse_civil("+12345-01-01T00:00:00").is_err());
    }

    #[test]
    fn fractions_are_trimmed_and_bounded() {
        assert_eq!(fraction_text(0), "");
        assert_eq!(fraction_text(120_000_000), ".12");
        assert_eq!(fraction_text(1), ".000000001");
        assert_eq!(
            parse_civil("2024-01-01T00:00:00.123456789").unwrap().nanosecond(),
            123_456_789
        );
        assert!(parse_civil("2024-01-01T00:00:00.1234567891").is_err());
        assert!(parse_civil("2024-01-01T00:00:00.").is_err());
    }

    #[test]
    fn civil_text_refuses_a_suffix() {
        let err = parse_civil("2024-03-10T02:30:00Z").unwrap_err();
        assert!(matches!(err, Error::MalformedText { .. }));
        assert!(parse_civil("2024-03-10T02:30:00+01:00").is_err());
        assert!(parse_civil("2024-03-10T02:30:00[Europe/Berlin]").is_err());
    }

    #[test]
    fn impossible_dates_are_field_errors() {
        assert!(matches!(
            parse_civil("2023-02-29T00:00:00"),
            Err(Error::InvalidCivilField { field: "day", .. })
        ));
        assert!(matches!(
            parse_instant("2016-12-31T23:59:60Z"),
            Err(Error::InvalidCivilField { field: "second", .. })
        ));
    }

    #[test]
    fn structural_errors_are_malformed() {
        for text in [
            "",
            "2024",
            "2024-1-01T00:00:00Z",
            "2024-01-01 00:00:00Z",
            "2024-01-01T00:00Z",
            "2024-01-01T00:00:00",
            "2024-01-01T00:00:00+0100",
            "2024-01-01T00:00:00Z trailing",
        ] {
            assert!(
                matches!(parse_instant(text), Err(Error::MalformedText { .. })),
                "{text:?} should be malformed"
            );
        }
    }

    #[test]
    fn offsets() {
        let ist = UtcOffset::from_hours_minutes(5, 30).unwrap();
        assert_eq!(format_offset(ist), "+05:30");
        assert_eq!(parse_offset("+05:30").unwrap(), ist);
        assert_eq!(format_offset(UtcOffset::UTC), "+00:00");
        let odd = UtcOffset::from_seconds(-(3_600 + 58)).unwrap();
        assert_eq!(format_offset(odd), "-01:00:58");
        assert_eq!(parse_offset("-01:00:58").unwrap(), odd);
        assert!(matches!(
            parse_offset("+27:00"),
            Err(Error::OffsetOutOfRange { .. })
        ));
        assert!(parse_offset("Z").is_err());
        assert!(parse_offset("+01:60").is_err());
    }

    #[test]
    fn zoned_text_splits_into_parts() {
        let (c, offset, zone) = parse_zoned("2026-02-04T20:25:35.094+01:00[Europe/Berlin]").unwrap();
        assert_eq!(c, civil(2026, 2, 4, 20, 25, 35, 94_000_000));
        let offset = offset.unwrap();
        assert_eq!(offset, UtcOffset::from_hours_minutes(1, 0).unwrap());
        assert_eq!(zone, "Europe/Berlin");

        let (_, utc, zone) = parse_zoned("2026-02-04T19:25:35Z[!Etc/UTC]").unwrap();
        assert_eq!(utc, None);
        assert_eq!(zone, "Etc/UTC");

        assert!(parse_zoned("2026-02-04T20:25:35+01:00").is_err());
        assert!(parse_zoned("2026-02-04T20:25:35+01:00[]").is_err());
        assert!(parse_zoned("2026-02-04T20:25:35+01:00[u-ca=iso8601]").is_err());
        assert_eq!(
            format_zoned(&c, offset, zone),
            "2026-02-04T20:25:35.094+01:00[Etc/UTC]"
        );
    }
}
