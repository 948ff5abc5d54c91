//! Ascendant and Midheaven from sidereal time, obliquity and latitude.

use crate::ephemeris::GeoLocation;
use crate::time::{julian_centuries, julian_day, local_sidereal_time_deg, mean_obliquity_deg};
use crate::zodiac::normalize_degrees;
use chrono::{DateTime, Utc};

/// Chart angles at one instant and place, in ecliptic degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSet {
    pub ascendant: f64,
    pub midheaven: f64,
    /// Local sidereal time (RAMC), degrees
    pub sidereal_time: f64,
    /// Obliquity of the ecliptic, degrees
    pub obliquity: f64,
}

impl AngleSet {
    pub fn descendant(&self) -> f64 {
        normalize_degrees(self.ascendant + 180.0)
    }

    pub fn imum_coeli(&self) -> f64 {
        normalize_degrees(self.midheaven + 180.0)
    }
}

/// Solve the angles for `instant` at `location`.
pub fn solve_angles(instant: DateTime<Utc>, location: GeoLocation) -> AngleSet {
    let jd = julian_day(instant);
    let obliquity = mean_obliquity_deg(julian_centuries(jd));
    let sidereal_time = local_sidereal_time_deg(jd, location.lon);

    AngleSet {
        ascendant: ascendant_deg(sidereal_time, obliquity, location.lat),
        midheaven: midheaven_deg(sidereal_time, obliquity),
        sidereal_time,
        obliquity,
    }
}

/// Ecliptic longitude rising on the eastern horizon.
pub fn ascendant_deg(sidereal_time: f64, obliquity: f64, latitude: f64) -> f64 {
    let theta = sidereal_time.to_radians();
    let eps = obliquity.to_radians();
    let phi = latitude.to_radians();

    let y = theta.cos();
    let x = -(theta.sin() * eps.cos() + phi.tan() * eps.sin());
    normalize_degrees(y.atan2(x).to_degrees())
}

/// Ecliptic longitude on the upper meridian.
pub fn midheaven_deg(sidereal_time: f64, obliquity: f64) -> f64 {
    let theta = sidereal_time.to_radians();
    let eps = obliquity.to_radians();
    normalize_degrees(theta.sin().atan2(theta.cos() * eps.cos()).to_degrees())
}
