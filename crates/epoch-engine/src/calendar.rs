//! Calendar-aware timestamp arithmetic.
//!
//! Month and year deltas have no fixed millisecond duration, so they are
//! applied through real calendar rollover; every other unit is a fixed
//! ratio and adds directly. The rollover policy is chrono's [`Months`]
//! arithmetic — the single swappable dependency behind [`add_months`] and
//! [`add_years`] — which clamps to the last valid day of the target month:
//! Jan 31 + 1 month = Feb 28 (or Feb 29 in a leap year).

use chrono::{DateTime, Months, TimeZone, Utc};

use crate::error::{EpochError, Result};
use crate::unit::{self, CalendarUnit, TimeUnit};

/// Add a signed `delta`, expressed in `delta_unit`, to an epoch-millisecond
/// timestamp.
///
/// When `delta_unit` names a calendar unit (`month`/`year`, singular or
/// plural, case-insensitive), the timestamp is converted to a UTC calendar
/// date, rolled forward or back by whole months or years, and converted
/// back.
///
/// Otherwise `delta` is converted from `delta_unit` into `unit` by fixed
/// ratio and added to `time` directly. `unit` serves *only* as the target
/// unit for interpreting `delta` — `time` is treated as milliseconds
/// either way. Callers depend on that asymmetry; it is part of the
/// contract.
///
/// # Examples
///
/// ```
/// use epoch_engine::add_to_timestamp;
///
/// // Jan 31 + 1 month clamps to the last day of February
/// let jan31 = 1_612_051_200_000; // 2021-01-31T00:00:00Z
/// let feb28 = add_to_timestamp(jan31, "ms", 1, "month").unwrap();
/// assert_eq!(feb28, 1_614_470_400_000); // 2021-02-28T00:00:00Z
/// ```
pub fn add_to_timestamp(time: i64, unit: &str, delta: i64, delta_unit: &str) -> Result<i64> {
    if let Some(calendar_unit) = CalendarUnit::resolve(delta_unit) {
        let dt = Utc
            .timestamp_millis_opt(time)
            .single()
            .ok_or_else(|| EpochError::OutOfRange(format!("timestamp {time} ms")))?;
        let shifted = match calendar_unit {
            CalendarUnit::Month => add_months(dt, delta)?,
            CalendarUnit::Year => add_years(dt, delta)?,
        };
        Ok(shifted.timestamp_millis())
    } else {
        let to = TimeUnit::resolve(unit);
        let from = TimeUnit::resolve(delta_unit);
        Ok(time + unit::convert(delta, from, to))
    }
}

/// Shift a datetime by `n` whole months with end-of-month clamping.
pub fn add_months(dt: DateTime<Utc>, n: i64) -> Result<DateTime<Utc>> {
    let magnitude = u32::try_from(n.unsigned_abs())
        .map_err(|_| EpochError::OutOfRange(format!("{n} months")))?;
    let months = Months::new(magnitude);
    let shifted = if n >= 0 {
        dt.checked_add_months(months)
    } else {
        dt.checked_sub_months(months)
    };
    shifted.ok_or_else(|| EpochError::OutOfRange(format!("adding {n} months to {dt}")))
}

/// Shift a datetime by `n` whole years; Feb 29 clamps to Feb 28 in
/// non-leap target years.
pub fn add_years(dt: DateTime<Utc>, n: i64) -> Result<DateTime<Utc>> {
    let months = n
        .checked_mul(12)
        .ok_or_else(|| EpochError::OutOfRange(format!("{n} years")))?;
    add_months(dt, months)
}

// ── Tests ───────────────────────────────────────────────────────────────────
