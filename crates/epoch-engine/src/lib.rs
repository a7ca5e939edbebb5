//! # epoch-engine
//!
//! Deterministic date/time conversion for database procedure layers.
//!
//! The engine converts between textual date representations, epoch
//! timestamps in configurable time units, decomposed calendar fields, and
//! timezone-adjusted values. The host hands in plain numbers and strings
//! and gets plain values (or a typed error) back; records, labels, and
//! transactions stay on the host's side of the boundary.
//!
//! ## Modules
//!
//! - [`unit`] — unit-name resolution and fixed-ratio conversion
//! - [`pattern`] — `SimpleDateFormat`-style pattern translation
//! - [`format`] — pattern/timezone resolution into a configured formatter
//! - [`convert`] — parse/format entry points, unit conversion, TTL values
//! - [`fields`] — structured calendar-field extraction
//! - [`calendar`] — calendar-aware month/year arithmetic
//! - [`error`] — error types
//!
//! ## Zone-default policy
//!
//! Parsing and formatting assume UTC unless the caller overrides the zone
//! explicitly or the pattern consists solely of zone-designator tokens (in
//! which case the offset embedded in the text wins). See
//! [`format::DateFormat::resolve`].
//!
//! All operations are synchronous and stateless; formatters are built per
//! call, so every function is safe to invoke concurrently. The single
//! external effect is the clock read behind [`convert::Clock`].

pub mod calendar;
pub mod convert;
pub mod error;
pub mod fields;
pub mod format;
pub mod pattern;
pub mod unit;

pub use calendar::{add_months, add_years, add_to_timestamp};
pub use convert::{
    convert, current_timestamp_millis, expiry_in_millis, expiry_millis, format_millis,
    format_timestamp, parse_to_millis, parse_to_unit, system_timezone_id, to_years, Clock,
    SystemClock, YearsValue, AVERAGE_YEAR_MILLIS,
};
pub use error::EpochError;
pub use fields::{calendar_field, extract_fields, FieldResult};
pub use format::{DateFormat, DEFAULT_PATTERN};
pub use unit::{CalendarUnit, TimeUnit};
