//! Time-unit resolution and fixed-ratio conversion.
//!
//! Two kinds of unit exist and they never mix: [`TimeUnit`]s have a constant
//! millisecond ratio and convert by integer arithmetic; [`CalendarUnit`]s
//! (month, year) have no fixed duration and must go through calendar
//! arithmetic (see [`crate::calendar`]). Callers that accept a free-form
//! unit name check [`CalendarUnit::resolve`] first — [`TimeUnit::resolve`]
//! would otherwise quietly read `"year"` as milliseconds.

/// A fixed-duration time unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeUnit {
    #[default]
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    /// Length of one unit in milliseconds.
    pub const fn millis(self) -> i64 {
        match self {
            TimeUnit::Millisecond => 1,
            TimeUnit::Second => 1_000,
            TimeUnit::Minute => 60_000,
            TimeUnit::Hour => 3_600_000,
            TimeUnit::Day => 86_400_000,
        }
    }

    /// Resolve a free-form unit name, case-insensitively.
    ///
    /// Every alias maps to exactly one unit. Anything unrecognized —
    /// including the empty string and calendar-unit names like `"year"` —
    /// resolves to [`TimeUnit::Millisecond`]. That permissiveness is the
    /// contract, not an oversight: unit names come from loosely-typed
    /// procedure arguments and must never fail, so the fallback lives in
    /// this one `match` where it can be audited.
    pub fn resolve(name: &str) -> TimeUnit {
        match name.trim().to_ascii_lowercase().as_str() {
            "ms" | "milli" | "millis" | "milliseconds" => TimeUnit::Millisecond,
            "s" | "second" | "seconds" => TimeUnit::Second,
            "m" | "minute" | "minutes" => TimeUnit::Minute,
            "h" | "hour" | "hours" => TimeUnit::Hour,
            "d" | "day" | "days" => TimeUnit::Day,
            _ => TimeUnit::Millisecond,
        }
    }
}

/// A calendar-relative unit with no fixed millisecond ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarUnit {
    Month,
    Year,
}

impl CalendarUnit {
    /// Detect a calendar unit name (singular or plural, case-insensitive).
    ///
    /// Returns `None` for everything else, so callers can fall through to
    /// [`TimeUnit::resolve`] for fixed-duration names.
    pub fn resolve(name: &str) -> Option<CalendarUnit> {
        match name.trim().to_ascii_lowercase().as_str() {
            "month" | "months" => Some(CalendarUnit::Month),
            "year" | "years" => Some(CalendarUnit::Year),
            _ => None,
        }
    }
}

/// Convert `value` from one fixed-duration unit to another.
///
/// Narrowing (e.g. milliseconds → days) divides and truncates toward zero,
/// matching standard duration-conversion semantics. Widening saturates at
/// the `i64` bounds instead of wrapping.
pub fn convert(value: i64, from: TimeUnit, to: TimeUnit) -> i64 {
    let from_ms = from.millis();
    let to_ms = to.millis();
    if from_ms >= to_ms {
        value.saturating_mul(from_ms / to_ms)
    } else {
        value / (to_ms / from_ms)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
