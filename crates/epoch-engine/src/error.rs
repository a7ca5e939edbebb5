//! Error types for epoch-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EpochError {
    /// Date text does not match the supplied pattern, or resolves to an
    /// instant that does not exist (invalid calendar date, DST gap, or an
    /// ambiguous local wall-clock time in the bound zone).
    #[error("Malformed date: {0}")]
    MalformedDate(String),

    /// An explicit timezone override does not resolve to a known IANA zone
    /// or fixed offset.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// A timestamp or calendar delta falls outside the representable range.
    #[error("Out of range: {0}")]
    OutOfRange(String),
}

pub type Result<T> = std::result::Result<T, EpochError>;
