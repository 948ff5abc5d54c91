use crate::ephemeris::EphemerisError;
use chrono::NaiveDateTime;
use thiserror::Error;

/// Failures while turning a local wall-clock reading into a UTC instant.
///
/// These are never resolved inside the engine; callers must pick an explicit
/// DST preference (ambiguous) or a different time (nonexistent).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Local time {local} does not exist in {timezone} (skipped by a daylight-saving transition)")]
    NonexistentLocalTime {
        local: NaiveDateTime,
        timezone: String,
    },
    #[error("Local time {local} is ambiguous in {timezone} ({candidates} possible offsets); pass an explicit daylight-saving flag")]
    AmbiguousLocalTime {
        local: NaiveDateTime,
        timezone: String,
        candidates: usize,
    },
}

/// Top-level error for every chart operation.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("Invalid time '{0}': expected HH:mm")]
    InvalidTime(String),
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
    #[error("Invalid location: lat={lat}, lon={lon}")]
    InvalidLocation { lat: f64, lon: f64 },
    #[error("City not found: {city}, {country}")]
    CityNotFound { city: String, country: String },
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Range of {days} days exceeds the limit of {limit} days")]
    RangeTooLarge { days: i64, limit: i64 },
    #[error("Chart has no house cusps")]
    MissingHouses,
    #[error("Chart has no longitude for {0}")]
    MissingPoint(String),
    #[error(transparent)]
    Temporal(#[from] TemporalError),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
}
