//! Structured calendar-field extraction.
//!
//! [`extract_fields`] decomposes parsed date text into the fixed probe set
//! (year, month, weekday, day, hour, minute, second, zone) without ever
//! resolving it to an instant: a field appears in the result only when the
//! text actually provided it. That distinction matters because zero is a
//! legitimate value for every time field — "absent" is expressed by the
//! key missing from the ordered map, never by a zero placeholder.

use chrono::format::Parsed;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc, Weekday};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{EpochError, Result};
use crate::format::{resolve_zone, DateFormat, ZoneBinding};

/// Decomposition of parsed date text into calendar fields.
///
/// The map holds only the fields the source text supported, in probe order
/// (`years`, `months`, `weekdays`, `days`, `hours`, `minutes`, `seconds`,
/// `zoneid`). The named scalars mirror the map for convenient access but
/// default to `0` — callers that must distinguish "absent" from "zero"
/// consult the map.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldResult {
    pub value: Map<String, Value>,
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub weekdays: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub zoneid: Option<String>,
}

impl FieldResult {
    /// The ordered field map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.value
    }

    fn put(&mut self, key: &str, value: i64) {
        self.value.insert(key.to_string(), Value::from(value));
    }
}

/// Decompose date text parsed with `pattern` into a [`FieldResult`].
///
/// Absent or empty text yields an empty result, not an error. Weekday uses
/// ISO numbering (Monday = 1 … Sunday = 7) and counts as supported when it
/// was parsed directly or can be derived from a complete date.
pub fn extract_fields(text: Option<&str>, pattern: Option<&str>) -> Result<FieldResult> {
    let mut result = FieldResult::default();
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return Ok(result);
    };

    let format = DateFormat::resolve(pattern, None)?;
    let parsed = format.parse_raw(text)?;

    if let Some(year) = parsed.year() {
        result.years = year as i64;
        result.put("years", year as i64);
    }
    if let Some(month) = parsed.month() {
        result.months = month as i64;
        result.put("months", month as i64);
    }
    if let Some(weekday) = supported_weekday(&parsed) {
        let iso = weekday.number_from_monday() as i64;
        result.weekdays = iso;
        result.put("weekdays", iso);
    }
    if let Some(day) = parsed.day() {
        result.days = day as i64;
        result.put("days", day as i64);
    }
    if let Some(hour) = supported_hour(&parsed) {
        result.hours = hour as i64;
        result.put("hours", hour as i64);
    }
    if let Some(minute) = parsed.minute() {
        result.minutes = minute as i64;
        result.put("minutes", minute as i64);
    }
    if let Some(second) = parsed.second() {
        result.seconds = second as i64;
        result.put("seconds", second as i64);
    }
    if let Some(offset) = parsed.offset() {
        let name = zone_display_name(offset);
        result.zoneid = Some(name.clone());
        result.value.insert("zoneid".to_string(), Value::from(name));
    }

    Ok(result)
}

/// Extract a single calendar field from an epoch-millisecond instant viewed
/// in `timezone`.
///
/// Field units follow the same alias table as elsewhere, extended with
/// `month`/`year`; unrecognized names fall back to the year field.
pub fn calendar_field(time: i64, unit: &str, timezone: &str) -> Result<i64> {
    let utc = Utc
        .timestamp_millis_opt(time)
        .single()
        .ok_or_else(|| EpochError::OutOfRange(format!("timestamp {time} ms")))?;
    let value = match resolve_zone(timezone)? {
        ZoneBinding::Named(tz) => field_of(&utc.with_timezone(&tz), unit),
        ZoneBinding::Fixed(offset) => field_of(&utc.with_timezone(&offset), unit),
        ZoneBinding::Utc | ZoneBinding::FromText => field_of(&utc, unit),
    };
    Ok(value)
}

fn field_of<T: TimeZone>(dt: &DateTime<T>, unit: &str) -> i64 {
    match unit.trim().to_ascii_lowercase().as_str() {
        "ms" | "milli" | "millis" | "milliseconds" => dt.timestamp_subsec_millis() as i64,
        "s" | "second" | "seconds" => dt.second() as i64,
        "m" | "minute" | "minutes" => dt.minute() as i64,
        "h" | "hour" | "hours" => dt.hour() as i64,
        "d" | "day" | "days" => dt.day() as i64,
        "month" | "months" => dt.month() as i64,
        _ => dt.year() as i64,
    }
}

/// Weekday parsed from the text, or derived when the text pinned down a
/// complete date.
fn supported_weekday(parsed: &Parsed) -> Option<Weekday> {
    parsed.weekday().or_else(|| {
        let date = NaiveDate::from_ymd_opt(parsed.year()?, parsed.month()?, parsed.day()?)?;
        Some(date.weekday())
    })
}

/// Hour of day, supported only when the text carried enough to fix it.
fn supported_hour(parsed: &Parsed) -> Option<u32> {
    match (parsed.hour_div_12(), parsed.hour_mod_12()) {
        (Some(div), Some(rem)) => Some(div * 12 + rem),
        _ => None,
    }
}

/// Locale-invariant short display name for a parsed zone offset.
fn zone_display_name(offset_secs: i32) -> String {
    if offset_secs == 0 {
        return "UTC".to_string();
    }
    let sign = if offset_secs >= 0 { "+" } else { "-" };
    let abs = offset_secs.unsigned_abs();
    format!("{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_text_yields_empty_result() {
        let result = extract_fields(None, Some("yyyy-MM-dd")).unwrap();
        assert!(result.as_map().is_empty());
        assert_eq!(result.years, 0);
        assert_eq!(result.zoneid, None);

        let result = extract_fields(Some(""), None).unwrap();
        assert!(result.as_map().is_empty());
    }

    #[test]
    fn test_date_only_pattern_fields() {
        let result = extract_fields(Some("2012-12-23"), Some("yyyy-MM-dd")).unwrap();
        assert_eq!(result.years, 2012);
        assert_eq!(result.months, 12);
        assert_eq!(result.days, 23);
        // 2012-12-23 was a Sunday.
        assert_eq!(result.weekdays, 7);

        let keys: Vec<&str> = result.as_map().keys().map(String::as_str).collect();
        assert_eq!(keys, ["years", "months", "weekdays", "days"]);
        assert!(!result.as_map().contains_key("hours"));
        assert!(!result.as_map().contains_key("zoneid"));
    }

    #[test]
    fn test_full_datetime_fields() {
        let result =
            extract_fields(Some("2021-06-15 08:05:30"), Some("yyyy-MM-dd HH:mm:ss")).unwrap();
        assert_eq!(result.years, 2021);
        assert_eq!(result.months, 6);
        // 2021-06-15 was a Tuesday.
        assert_eq!(result.weekdays, 2);
        assert_eq!(result.days, 15);
        assert_eq!(result.hours, 8);
        assert_eq!(result.minutes, 5);
        assert_eq!(result.seconds, 30);

        let keys: Vec<&str> = result.as_map().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["years", "months", "weekdays", "days", "hours", "minutes", "seconds"]
        );
    }

    #[test]
    fn test_partial_pattern_omits_unsupported_fields() {
        let result = extract_fields(Some("2012-12"), Some("yyyy-MM")).unwrap();
        let keys: Vec<&str> = result.as_map().keys().map(String::as_str).collect();
        assert_eq!(keys, ["years", "months"]);
        // No complete date, so no derivable weekday.
        assert!(!result.as_map().contains_key("weekdays"));
        assert!(!result.as_map().contains_key("days"));
    }

    #[test]
    fn test_zero_valued_field_is_still_present() {
        let result = extract_fields(Some("00:00"), Some("HH:mm")).unwrap();
        assert_eq!(result.hours, 0);
        assert_eq!(result.minutes, 0);
        let keys: Vec<&str> = result.as_map().keys().map(String::as_str).collect();
        // Present with value zero, distinguishable from absent.
        assert_eq!(keys, ["hours", "minutes"]);
        assert!(!result.as_map().contains_key("seconds"));
    }

    #[test]
    fn test_zone_offset_recorded_as_zoneid() {
        let result = extract_fields(
            Some("2012-12-23 10:00:00+05:30"),
            Some("yyyy-MM-dd HH:mm:ssXXX"),
        )
        .unwrap();
        assert_eq!(result.zoneid.as_deref(), Some("+05:30"));
        assert_eq!(
            result.as_map().get("zoneid"),
            Some(&Value::from("+05:30"))
        );
    }

    #[test]
    fn test_zero_offset_displays_as_utc() {
        let result = extract_fields(
            Some("2012-12-23 10:00:00+00:00"),
            Some("yyyy-MM-dd HH:mm:ssXXX"),
        )
        .unwrap();
        assert_eq!(result.zoneid.as_deref(), Some("UTC"));
    }

    #[test]
    fn test_malformed_text_is_an_error() {
        let err = extract_fields(Some("not-a-date"), Some("yyyy-MM-dd")).unwrap_err();
        assert!(matches!(err, EpochError::MalformedDate(_)), "got: {err}");
    }

    #[test]
    fn test_calendar_field_in_utc() {
        let t = Utc
            .with_ymd_and_hms(2021, 6, 15, 10, 30, 45)
            .unwrap()
            .timestamp_millis()
            + 123;
        assert_eq!(calendar_field(t, "year", "UTC").unwrap(), 2021);
        assert_eq!(calendar_field(t, "month", "UTC").unwrap(), 6);
        assert_eq!(calendar_field(t, "d", "UTC").unwrap(), 15);
        assert_eq!(calendar_field(t, "h", "UTC").unwrap(), 10);
        assert_eq!(calendar_field(t, "m", "UTC").unwrap(), 30);
        assert_eq!(calendar_field(t, "s", "UTC").unwrap(), 45);
        assert_eq!(calendar_field(t, "ms", "UTC").unwrap(), 123);
    }

    #[test]
    fn test_calendar_field_respects_timezone() {
        // 02:00 UTC on June 15 is still June 14, 22:00 in New York (EDT).
        let t = Utc
            .with_ymd_and_hms(2021, 6, 15, 2, 0, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(calendar_field(t, "d", "America/New_York").unwrap(), 14);
        assert_eq!(calendar_field(t, "h", "America/New_York").unwrap(), 22);
        assert_eq!(calendar_field(t, "d", "UTC").unwrap(), 15);
    }

    #[test]
    fn test_calendar_field_unknown_unit_falls_back_to_year() {
        let t = Utc
            .with_ymd_and_hms(2021, 6, 15, 2, 0, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(calendar_field(t, "era", "UTC").unwrap(), 2021);
    }

    #[test]
    fn test_calendar_field_unknown_timezone_is_an_error() {
        let err = calendar_field(0, "d", "Nowhere/Special").unwrap_err();
        assert!(matches!(err, EpochError::UnknownTimezone(_)), "got: {err}");
    }
}
