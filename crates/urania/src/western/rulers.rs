//! Sign rulers.
//!
//! Maps zodiac signs to their planetary rulers (traditional and modern).

use crate::chart::ChartPoint;
use crate::zodiac::ZodiacSign;

const TRADITIONAL_RULERS: [ChartPoint; 12] = [
    ChartPoint::Mars,    // Aries
    ChartPoint::Venus,   // Taurus
    ChartPoint::Mercury, // Gemini
    ChartPoint::Moon,    // Cancer
    ChartPoint::Sun,     // Leo
    ChartPoint::Mercury, // Virgo
    ChartPoint::Venus,   // Libra
    ChartPoint::Mars,    // Scorpio
    ChartPoint::Jupiter, // Sagittarius
    ChartPoint::Saturn,  // Capricorn
    ChartPoint::Saturn,  // Aquarius
    ChartPoint::Jupiter, // Pisces
];

const MODERN_RULERS: [ChartPoint; 12] = [
    ChartPoint::Mars,
    ChartPoint::Venus,
    ChartPoint::Mercury,
    ChartPoint::Moon,
    ChartPoint::Sun,
    ChartPoint::Mercury,
    ChartPoint::Venus,
    ChartPoint::Pluto,   // Scorpio (modern)
    ChartPoint::Jupiter,
    ChartPoint::Saturn,
    ChartPoint::Uranus,  // Aquarius (modern)
    ChartPoint::Neptune, // Pisces (modern)
];

/// Ruler of `sign`; `modern` swaps in the outer planets.
pub fn sign_ruler(sign: ZodiacSign, modern: bool) -> ChartPoint {
    if modern {
        MODERN_RULERS[sign.index()]
    } else {
        TRADITIONAL_RULERS[sign.index()]
    }
}

/// Ruler of the sign holding `longitude`.
pub fn sign_ruler_from_longitude(longitude: f64, modern: bool) -> ChartPoint {
    sign_ruler(ZodiacSign::from_longitude(longitude), modern)
}
