//! Julian dates, sidereal time and obliquity.
//!
//! Instants are treated as UT; the difference between UT and TT (delta T) is
//! ignored, which is well inside the accuracy of the analytic ephemeris.

use chrono::{DateTime, TimeZone, Utc};

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

const UNIX_EPOCH_JD: f64 = 2_440_587.5;
const MS_PER_DAY: f64 = 86_400_000.0;
const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Julian Date of a UTC instant, at millisecond resolution.
pub fn julian_day(instant: DateTime<Utc>) -> f64 {
    UNIX_EPOCH_JD + instant.timestamp_millis() as f64 / MS_PER_DAY
}

/// Inverse of [`julian_day`], rounded to the nearest millisecond.
pub fn instant_from_julian_day(jd: f64) -> Option<DateTime<Utc>> {
    let ms = ((jd - UNIX_EPOCH_JD) * MS_PER_DAY).round() as i64;
    Utc.timestamp_millis_opt(ms).single()
}

/// Julian centuries since J2000.0.
pub fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}

/// Greenwich mean sidereal time in degrees [0, 360).
///
/// Meeus, *Astronomical Algorithms*, eq. 12.4.
pub fn greenwich_sidereal_time_deg(jd: f64) -> f64 {
    let d = jd - J2000_JD;
    let t = d / DAYS_PER_CENTURY;
    let theta = 280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;
    crate::zodiac::normalize_degrees(theta)
}

/// Local sidereal time in degrees for an observer at east longitude `lon_deg`.
pub fn local_sidereal_time_deg(jd: f64, lon_deg: f64) -> f64 {
    crate::zodiac::normalize_degrees(greenwich_sidereal_time_deg(jd) + lon_deg)
}

/// Mean obliquity of the ecliptic in degrees (Meeus eq. 22.2).
pub fn mean_obliquity_deg(t: f64) -> f64 {
    23.439_291_111 - 0.013_004_167 * t - 0.000_000_164 * t * t + 0.000_000_504 * t * t * t
}
