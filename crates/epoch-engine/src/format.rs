//! Pattern/timezone resolution into a configured formatter.
//!
//! A [`DateFormat`] is constructed per call and never cached: it owns the
//! translated strftime pattern plus the zone the value is interpreted in.
//! Zone binding follows a fixed precedence:
//!
//! 1. an explicit timezone override, when supplied, always wins;
//! 2. else, a pattern consisting solely of zone-designator tokens leaves
//!    the formatter unbound so the offset comes from the parsed text;
//! 3. else, UTC.
//!
//! Parsing is lenient about *missing* calendar fields — a date-only
//! pattern yields midnight, a time-only pattern lands on 1970-01-01 — but
//! strict about text that does not match the pattern, which is a
//! [`EpochError::MalformedDate`].

use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::{FixedOffset, Locale, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{EpochError, Result};
use crate::pattern;

/// Pattern substituted when the caller passes none.
pub const DEFAULT_PATTERN: &str = "yyyy-MM-dd HH:mm:ss";

/// The zone a [`DateFormat`] interprets wall-clock text in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ZoneBinding {
    Utc,
    Named(Tz),
    Fixed(FixedOffset),
    /// No zone bound; the offset is read from the parsed text itself.
    FromText,
}

/// A configured formatter/parser: translated pattern + zone binding.
#[derive(Debug, Clone)]
pub struct DateFormat {
    strftime: String,
    zone: ZoneBinding,
}

impl DateFormat {
    /// Resolve an optional pattern and optional timezone override into a
    /// configured formatter.
    ///
    /// An empty or absent pattern becomes [`DEFAULT_PATTERN`]. An explicit
    /// non-empty `timezone` must resolve (IANA name or `±HH:MM` offset) or
    /// this returns [`EpochError::UnknownTimezone`].
    pub fn resolve(pattern: Option<&str>, timezone: Option<&str>) -> Result<DateFormat> {
        let pattern = match pattern {
            Some(p) if !p.is_empty() => p,
            _ => DEFAULT_PATTERN,
        };
        let zone = match timezone {
            Some(tz) if !tz.is_empty() => resolve_zone(tz)?,
            _ if pattern::is_zone_pattern(pattern) => ZoneBinding::FromText,
            _ => ZoneBinding::Utc,
        };
        Ok(DateFormat {
            strftime: pattern::to_strftime(pattern),
            zone,
        })
    }

    /// Parse date text to epoch milliseconds.
    pub fn parse_millis(&self, text: &str) -> Result<i64> {
        let parsed = self.parse_raw(text)?;
        let naive = assemble_naive(&parsed).ok_or_else(|| {
            EpochError::MalformedDate(format!("'{text}' resolves to no valid calendar date"))
        })?;

        // An offset in the text always pins the instant; otherwise the
        // bound zone interprets the wall-clock value.
        match (parsed.offset(), self.zone) {
            (Some(secs), _) => {
                let offset = FixedOffset::east_opt(secs).ok_or_else(|| {
                    EpochError::MalformedDate(format!("'{text}': offset out of range"))
                })?;
                instant_millis(&offset, &naive, text)
            }
            (None, ZoneBinding::Named(tz)) => instant_millis(&tz, &naive, text),
            (None, ZoneBinding::Fixed(offset)) => instant_millis(&offset, &naive, text),
            (None, ZoneBinding::Utc) | (None, ZoneBinding::FromText) => {
                Ok(Utc.from_utc_datetime(&naive).timestamp_millis())
            }
        }
    }

    /// Format an epoch-millisecond timestamp as date text.
    pub fn format_millis(&self, millis: i64) -> Result<String> {
        let utc = Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| EpochError::OutOfRange(format!("timestamp {millis} ms")))?;
        let locale = formatting_locale();
        let rendered = match self.zone {
            // Zone-unbound formatting has no text to take an offset from;
            // render in UTC.
            ZoneBinding::Utc | ZoneBinding::FromText => {
                utc.format_localized(&self.strftime, locale).to_string()
            }
            ZoneBinding::Named(tz) => utc
                .with_timezone(&tz)
                .format_localized(&self.strftime, locale)
                .to_string(),
            ZoneBinding::Fixed(offset) => utc
                .with_timezone(&offset)
                .format_localized(&self.strftime, locale)
                .to_string(),
        };
        Ok(rendered)
    }

    /// Parse date text against the pattern without resolving it to an
    /// instant, keeping exactly the fields the text provided.
    pub(crate) fn parse_raw(&self, text: &str) -> Result<Parsed> {
        let mut parsed = Parsed::new();
        parse(&mut parsed, text, StrftimeItems::new(&self.strftime))
            .map_err(|e| EpochError::MalformedDate(format!("'{text}': {e}")))?;
        Ok(parsed)
    }
}

/// Resolve a timezone string: `UTC`/`Z`, a `±HH:MM`-style fixed offset, or
/// an IANA zone name.
pub(crate) fn resolve_zone(timezone: &str) -> Result<ZoneBinding> {
    let tz = timezone.trim();
    if tz.eq_ignore_ascii_case("utc") || tz == "Z" {
        return Ok(ZoneBinding::Utc);
    }
    if tz.starts_with('+') || tz.starts_with('-') {
        return parse_fixed_offset(tz).map(ZoneBinding::Fixed);
    }
    tz.parse::<Tz>()
        .map(ZoneBinding::Named)
        .map_err(|_| EpochError::UnknownTimezone(format!("'{tz}'")))
}

/// Parse `±HH`, `±HHMM`, or `±HH:MM` into a fixed offset.
fn parse_fixed_offset(s: &str) -> Result<FixedOffset> {
    let unknown = || EpochError::UnknownTimezone(format!("'{s}'"));
    let sign: i32 = if s.starts_with('-') { -1 } else { 1 };
    let digits: String = s[1..].chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(unknown());
    }
    let (hours, minutes): (i32, i32) = match digits.len() {
        2 => (digits.parse().map_err(|_| unknown())?, 0),
        4 => (
            digits[..2].parse().map_err(|_| unknown())?,
            digits[2..].parse().map_err(|_| unknown())?,
        ),
        _ => return Err(unknown()),
    };
    if hours > 23 || minutes > 59 {
        return Err(unknown());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(unknown)
}

/// Fill unparsed calendar fields with the epoch defaults (1970-01-01
/// midnight) and assemble a naive datetime.
fn assemble_naive(parsed: &Parsed) -> Option<NaiveDateTime> {
    let year = parsed.year().unwrap_or(1970);
    let month = parsed.month().unwrap_or(1);
    let day = parsed.day().unwrap_or(1);
    let hour = match (parsed.hour_div_12(), parsed.hour_mod_12()) {
        (Some(div), Some(rem)) => div * 12 + rem,
        _ => 0,
    };
    let minute = parsed.minute().unwrap_or(0);
    let second = parsed.second().unwrap_or(0);
    let nano = parsed.nanosecond().unwrap_or(0);
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_nano_opt(hour, minute, second, nano)
}

/// Map a wall-clock value into the zone, rejecting DST gaps and overlaps.
fn instant_millis<T: TimeZone>(zone: &T, naive: &NaiveDateTime, text: &str) -> Result<i64> {
    zone.from_local_datetime(naive)
        .single()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| {
            EpochError::MalformedDate(format!(
                "'{text}' is ambiguous or nonexistent in its timezone"
            ))
        })
}

/// Locale used when a pattern renders textual month or weekday names.
fn formatting_locale() -> Locale {
    let tag = std::env::var("LC_ALL")
        .or_else(|_| std::env::var("LC_TIME"))
        .or_else(|_| std::env::var("LANG"))
        .unwrap_or_default();
    let tag = tag.split('.').next().unwrap_or("");
    pin_locale(Locale::try_from(tag).unwrap_or(Locale::en_US))
}

/// Pinned compatibility shim, kept intentionally: UK-English locale data
/// abbreviates some month and weekday names differently from generic
/// English ("Sept" vs "Sep"), which breaks stable field extraction and
/// round-trips. Substitute generic English whenever UK English resolves.
fn pin_locale(locale: Locale) -> Locale {
    if matches!(locale, Locale::en_GB) {
        Locale::en_US
    } else {
        locale
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn millis_utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_parse_default_pattern_assumes_utc() {
        let fmt = DateFormat::resolve(None, None).unwrap();
        let parsed = fmt.parse_millis("2024-03-15 12:30:45").unwrap();
        assert_eq!(parsed, millis_utc(2024, 3, 15, 12, 30, 45));
    }

    #[test]
    fn test_empty_pattern_uses_default() {
        let fmt = DateFormat::resolve(Some(""), None).unwrap();
        let parsed = fmt.parse_millis("2024-03-15 12:30:45").unwrap();
        assert_eq!(parsed, millis_utc(2024, 3, 15, 12, 30, 45));
    }

    #[test]
    fn test_explicit_timezone_overrides_utc_default() {
        // Midnight in New York (EST, UTC-5 in January) is 05:00 UTC.
        let fmt = DateFormat::resolve(None, Some("America/New_York")).unwrap();
        let parsed = fmt.parse_millis("2024-01-15 00:00:00").unwrap();
        assert_eq!(parsed, millis_utc(2024, 1, 15, 5, 0, 0));
    }

    #[test]
    fn test_explicit_fixed_offset_timezone() {
        let fmt = DateFormat::resolve(None, Some("+02:00")).unwrap();
        let parsed = fmt.parse_millis("2024-01-15 02:00:00").unwrap();
        assert_eq!(parsed, millis_utc(2024, 1, 15, 0, 0, 0));
    }

    #[test]
    fn test_offset_in_text_pins_the_instant() {
        let fmt = DateFormat::resolve(Some("yyyy-MM-dd HH:mm:ssXXX"), None).unwrap();
        let parsed = fmt.parse_millis("2024-01-15 10:00:00+02:00").unwrap();
        assert_eq!(parsed, millis_utc(2024, 1, 15, 8, 0, 0));
    }

    #[test]
    fn test_zone_only_pattern_is_unbound() {
        // Pattern is purely a zone designator: the parsed offset applies to
        // the epoch defaults.
        let fmt = DateFormat::resolve(Some("XXX"), None).unwrap();
        let parsed = fmt.parse_millis("+05:30").unwrap();
        assert_eq!(parsed, -(5 * 3600 + 30 * 60) * 1000);
    }

    #[test]
    fn test_date_only_pattern_defaults_to_midnight() {
        let fmt = DateFormat::resolve(Some("yyyy-MM-dd"), None).unwrap();
        let parsed = fmt.parse_millis("2012-12-23").unwrap();
        assert_eq!(parsed, millis_utc(2012, 12, 23, 0, 0, 0));
    }

    #[test]
    fn test_year_month_pattern_defaults_to_first_of_month() {
        let fmt = DateFormat::resolve(Some("yyyy-MM"), None).unwrap();
        let parsed = fmt.parse_millis("2012-12").unwrap();
        assert_eq!(parsed, millis_utc(2012, 12, 1, 0, 0, 0));
    }

    #[test]
    fn test_time_only_pattern_lands_on_epoch_day() {
        let fmt = DateFormat::resolve(Some("HH:mm"), None).unwrap();
        let parsed = fmt.parse_millis("12:30").unwrap();
        assert_eq!(parsed, (12 * 3600 + 30 * 60) * 1000);
    }

    #[test]
    fn test_parse_rejects_text_not_matching_pattern() {
        let fmt = DateFormat::resolve(None, None).unwrap();
        let err = fmt.parse_millis("2024-03-15").unwrap_err();
        assert!(matches!(err, EpochError::MalformedDate(_)), "got: {err}");

        let err = fmt.parse_millis("not a date").unwrap_err();
        assert!(matches!(err, EpochError::MalformedDate(_)), "got: {err}");
    }

    #[test]
    fn test_parse_rejects_invalid_calendar_date() {
        let fmt = DateFormat::resolve(Some("yyyy-MM-dd"), None).unwrap();
        let err = fmt.parse_millis("2021-02-30").unwrap_err();
        assert!(matches!(err, EpochError::MalformedDate(_)), "got: {err}");
    }

    #[test]
    fn test_parse_rejects_ambiguous_local_time() {
        // 01:30 on 2021-11-07 happens twice in New York (DST fall-back).
        let fmt = DateFormat::resolve(None, Some("America/New_York")).unwrap();
        let err = fmt.parse_millis("2021-11-07 01:30:00").unwrap_err();
        assert!(matches!(err, EpochError::MalformedDate(_)), "got: {err}");
    }

    #[test]
    fn test_unknown_timezone_is_an_error() {
        let err = DateFormat::resolve(None, Some("Nowhere/Special")).unwrap_err();
        assert!(matches!(err, EpochError::UnknownTimezone(_)), "got: {err}");

        let err = DateFormat::resolve(None, Some("+99:99")).unwrap_err();
        assert!(matches!(err, EpochError::UnknownTimezone(_)), "got: {err}");
    }

    #[test]
    fn test_format_epoch_in_utc() {
        let fmt = DateFormat::resolve(None, None).unwrap();
        assert_eq!(fmt.format_millis(0).unwrap(), "1970-01-01 00:00:00");
    }

    #[test]
    fn test_format_respects_timezone_override() {
        let fmt = DateFormat::resolve(None, Some("+02:00")).unwrap();
        assert_eq!(fmt.format_millis(0).unwrap(), "1970-01-01 02:00:00");
    }

    #[test]
    fn test_format_named_zone_winter_offset() {
        let fmt = DateFormat::resolve(None, Some("America/New_York")).unwrap();
        let t = millis_utc(2024, 1, 15, 5, 0, 0);
        assert_eq!(fmt.format_millis(t).unwrap(), "2024-01-15 00:00:00");
    }

    #[test]
    fn test_millisecond_pattern_round_trips() {
        let fmt = DateFormat::resolve(Some("yyyy-MM-dd HH:mm:ss.SSS"), None).unwrap();
        let t = 1_700_000_123_456;
        let text = fmt.format_millis(t).unwrap();
        assert_eq!(fmt.parse_millis(&text).unwrap(), t);
    }

    #[test]
    fn test_textual_month_formats_in_generic_english() {
        let fmt = DateFormat::resolve(Some("dd MMM yyyy"), None).unwrap();
        let t = millis_utc(2024, 9, 5, 0, 0, 0);
        assert_eq!(fmt.format_millis(t).unwrap(), "05 Sep 2024");
    }

    #[test]
    fn test_pin_locale_substitutes_uk_english() {
        assert!(matches!(pin_locale(Locale::en_GB), Locale::en_US));
        assert!(matches!(pin_locale(Locale::fr_FR), Locale::fr_FR));
    }
}
