//! Timestamp conversion entry points.
//!
//! Everything here is a pure function of its arguments except the clock
//! read, which sits behind the [`Clock`] seam so hosts and tests can inject
//! a fixed instant. Formatters are resolved fresh per call ([`DateFormat`])
//! and unit names go through the permissive resolver in [`crate::unit`].

use chrono::Utc;

use crate::error::{EpochError, Result};
use crate::format::DateFormat;
use crate::unit::{self, TimeUnit};

/// Milliseconds in an average 365-day year.
///
/// [`to_years`] deliberately ignores leap years; callers depend on the
/// exact 365-day constant, so it must not be "corrected".
pub const AVERAGE_YEAR_MILLIS: f64 = 365.0 * 24.0 * 3600.0 * 1000.0;

// ── Clock seam ──────────────────────────────────────────────────────────────

/// Source of "now", the one external effect in this crate.
pub trait Clock {
    /// Current instant as epoch milliseconds.
    fn now_millis(&self) -> i64;
}

/// Wall-clock [`Clock`] backed by the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Current wall-clock time as epoch milliseconds.
pub fn current_timestamp_millis() -> i64 {
    SystemClock.now_millis()
}

// ── Parsing and formatting ──────────────────────────────────────────────────

/// Parse date text to epoch milliseconds.
///
/// Absent or empty `text` skips parsing and returns `Ok(None)`; text that
/// does not match the pattern is [`EpochError::MalformedDate`].
pub fn parse_to_millis(
    text: Option<&str>,
    pattern: Option<&str>,
    timezone: Option<&str>,
) -> Result<Option<i64>> {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let format = DateFormat::resolve(pattern, timezone)?;
    format.parse_millis(text).map(Some)
}

/// Parse date text into the given target unit (truncating toward zero).
///
/// # Examples
///
/// ```
/// use epoch_engine::parse_to_unit;
///
/// let days = parse_to_unit(Some("2012-12-23"), "d", Some("yyyy-MM-dd"), None).unwrap();
/// assert_eq!(days, Some(15697));
/// ```
pub fn parse_to_unit(
    text: Option<&str>,
    to_unit: &str,
    pattern: Option<&str>,
    timezone: Option<&str>,
) -> Result<Option<i64>> {
    let Some(millis) = parse_to_millis(text, pattern, timezone)? else {
        return Ok(None);
    };
    let to = TimeUnit::resolve(to_unit);
    Ok(Some(unit::convert(millis, TimeUnit::Millisecond, to)))
}

/// Format an epoch-millisecond timestamp as date text.
pub fn format_millis(millis: i64, pattern: Option<&str>, timezone: Option<&str>) -> Result<String> {
    DateFormat::resolve(pattern, timezone)?.format_millis(millis)
}

/// Format a timestamp expressed in `source_unit` as date text.
///
/// `time` is first converted to milliseconds by fixed ratio, then formatted
/// with the resolved pattern and zone.
pub fn format_timestamp(
    time: i64,
    source_unit: &str,
    pattern: Option<&str>,
    timezone: Option<&str>,
) -> Result<String> {
    let source = TimeUnit::resolve(source_unit);
    format_millis(unit::convert(time, source, TimeUnit::Millisecond), pattern, timezone)
}

// ── Pure unit conversion ────────────────────────────────────────────────────

/// Convert a timestamp between two fixed-duration units by name.
///
/// Never fails: unrecognized unit names resolve to milliseconds (see
/// [`TimeUnit::resolve`]) and integer division truncates toward zero.
pub fn convert(time: i64, from_unit: &str, to_unit: &str) -> i64 {
    unit::convert(
        time,
        TimeUnit::resolve(from_unit),
        TimeUnit::resolve(to_unit),
    )
}

// ── Years approximation ─────────────────────────────────────────────────────

/// Input to [`to_years`]: either an epoch-millisecond count or date text.
#[derive(Debug, Clone, Copy)]
pub enum YearsValue<'a> {
    Millis(i64),
    Text(&'a str),
}

/// Express a timestamp as floating-point years.
///
/// A numeric input is a span: `millis / 365 days`. A textual input is an
/// absolute date: `1970 + millis / 365 days` after parsing with `pattern`
/// (UTC, no zone override). Both use [`AVERAGE_YEAR_MILLIS`] and inherit
/// its leap-year blindness.
pub fn to_years(value: YearsValue<'_>, pattern: Option<&str>) -> Result<f64> {
    match value {
        YearsValue::Millis(millis) => Ok(millis as f64 / AVERAGE_YEAR_MILLIS),
        YearsValue::Text(text) => {
            let millis = parse_to_millis(Some(text), pattern, None)?
                .ok_or_else(|| EpochError::MalformedDate("empty date text".to_string()))?;
            Ok(1970.0 + millis as f64 / AVERAGE_YEAR_MILLIS)
        }
    }
}

// ── TTL value computation ───────────────────────────────────────────────────

/// Absolute expiry instant for a timestamp expressed in `unit`, as epoch
/// milliseconds. The host attaches the returned value (and its own TTL
/// marker) to its records; this crate only computes the number.
pub fn expiry_millis(time: i64, unit: &str) -> i64 {
    unit::convert(time, TimeUnit::resolve(unit), TimeUnit::Millisecond)
}

/// Expiry instant a delta from now, as epoch milliseconds.
pub fn expiry_in_millis(clock: &impl Clock, delta: i64, unit: &str) -> i64 {
    clock.now_millis() + expiry_millis(delta, unit)
}

// ── System zone ─────────────────────────────────────────────────────────────

/// The host platform's IANA timezone id (e.g. `"Europe/Berlin"`).
pub fn system_timezone_id() -> Result<String> {
    iana_time_zone::get_timezone()
        .map_err(|e| EpochError::UnknownTimezone(format!("system default: {e}")))
}

// ── Tests ───────────────────────────────────────────────────────────────────
