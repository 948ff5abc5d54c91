//! Terrestrial longitudes where each chart point becomes angular.
//!
//! Points are treated as lying on the equator of date (longitude used as
//! right ascension), so lines are meridians with no latitude dependence.

use crate::chart::{ChartPoint, ChartResult, ChartSettings};
use crate::time::greenwich_sidereal_time_deg;
use crate::zodiac::signed_degrees;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleLine {
    Mc,
    Ic,
    Asc,
    Dsc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstroLine {
    pub point: ChartPoint,
    pub angle: AngleLine,
    /// Degrees east, in [-180, 180)
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AstrocartographyResult {
    pub lines: Vec<AstroLine>,
    pub gmst: f64,
    pub settings_hash: String,
}

/// Meridian on which `longitude` culminates at Greenwich sidereal time `gmst`.
pub fn mc_longitude(longitude: f64, gmst: f64) -> f64 {
    signed_degrees(longitude - gmst)
}

pub fn generate_astrocartography(base: &ChartResult, settings: &ChartSettings) -> AstrocartographyResult {
    let gmst = greenwich_sidereal_time_deg(base.normalized.julian_day);
    let mut lines = Vec::new();

    for (point, placement) in &base.planets {
        let Some(longitude) = placement.longitude else {
            continue;
        };
        let mc = mc_longitude(longitude, gmst);
        for (angle, shift) in [
            (AngleLine::Mc, 0.0),
            (AngleLine::Ic, 180.0),
            (AngleLine::Asc, 90.0),
            (AngleLine::Dsc, -90.0),
        ] {
            lines.push(AstroLine {
                point: *point,
                angle,
                longitude: signed_degrees(mc + shift),
            });
        }
    }

    AstrocartographyResult {
        lines,
        gmst,
        settings_hash: settings.fingerprint(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mc_longitude_wraps() {
        assert_eq!(mc_longitude(10.0, 20.0), -10.0);
        assert_eq!(mc_longitude(350.0, 10.0), -20.0);
        assert_eq!(mc_longitude(200.0, 10.0), -170.0);
        assert_eq!(mc_longitude(100.0, 100.0), 0.0);
    }
}
