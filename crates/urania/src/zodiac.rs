//! Zodiac signs and angle normalization.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

pub const SIGNS: [ZodiacSign; 12] = [
    ZodiacSign::Aries,
    ZodiacSign::Taurus,
    ZodiacSign::Gemini,
    ZodiacSign::Cancer,
    ZodiacSign::Leo,
    ZodiacSign::Virgo,
    ZodiacSign::Libra,
    ZodiacSign::Scorpio,
    ZodiacSign::Sagittarius,
    ZodiacSign::Capricorn,
    ZodiacSign::Aquarius,
    ZodiacSign::Pisces,
];

impl ZodiacSign {
    pub fn from_index(index: usize) -> Self {
        SIGNS[index % 12]
    }

    pub fn from_longitude(longitude: f64) -> Self {
        Self::from_index(sign_index(longitude))
    }

    /// 0 for Aries through 11 for Pisces.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const MAX_DEGREE_IN_SIGN: f64 = 29.999_999_999_999;

/// Normalize an angle to [0, 360).
pub fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Normalize an angle to [-180, 180).
pub fn signed_degrees(deg: f64) -> f64 {
    let r = normalize_degrees(deg);
    if r >= 180.0 {
        r - 360.0
    } else {
        r
    }
}

/// Sign index (0-11) of a longitude.
pub fn sign_index(longitude: f64) -> usize {
    ((normalize_degrees(longitude) / 30.0).floor() as usize).min(11)
}

/// Degree within the sign, in [0, 30).
pub fn degree_in_sign(longitude: f64) -> f64 {
    let lon = normalize_degrees(longitude);
    let degree = lon - sign_index(lon) as f64 * 30.0;
    degree.clamp(0.0, MAX_DEGREE_IN_SIGN)
}

/// Display form such as `15°32' Aries`. Rounding is for display only.
pub fn format_longitude(longitude: f64) -> String {
    let sign = ZodiacSign::from_longitude(longitude);
    let total_minutes = (degree_in_sign(longitude) * 60.0).floor() as u32;
    format!("{}°{:02}' {}", total_minutes / 60, total_minutes % 60, sign)
}
