//! Analytic ephemeris.
//!
//! Planets use the Keplerian mean elements of Standish ("Approximate
//! Positions of the Planets", JPL, valid 1800-2050) referred to the J2000
//! ecliptic and precessed to the equinox of date. The Moon uses the main
//! periodic terms of the ELP-2000/82 series as tabulated by Meeus,
//! *Astronomical Algorithms*, chapter 47. Accuracy is of the order of an
//! arcminute, which is below the resolution astrological techniques use.

use crate::ephemeris::adapter::{EphemerisAdapter, EphemerisError};
use crate::ephemeris::types::Body;
use crate::time::{julian_centuries, julian_day};
use crate::zodiac::normalize_degrees;
use chrono::{DateTime, Utc};

/// General precession in longitude, degrees per Julian century.
const PRECESSION_DEG_PER_CENTURY: f64 = 1.396_971_28;

/// a (au), e, I, L, long. perihelion, long. ascending node (deg) and their
/// rates per century.
type Elements = [[f64; 6]; 2];

#[rustfmt::skip]
const MERCURY: Elements = [
    [0.387_099_27, 0.205_635_93, 7.004_979_02, 252.250_323_50, 77.457_796_28, 48.330_765_93],
    [0.000_000_37, 0.000_019_06, -0.005_947_49, 149_472.674_111_75, 0.160_476_89, -0.125_340_81],
];
#[rustfmt::skip]
const VENUS: Elements = [
    [0.723_335_66, 0.006_776_72, 3.394_676_05, 181.979_099_50, 131.602_467_18, 76.679_842_55],
    [0.000_003_90, -0.000_041_07, -0.000_788_90, 58_517.815_387_29, 0.002_683_29, -0.277_694_18],
];
#[rustfmt::skip]
const EARTH_MOON_BARYCENTER: Elements = [
    [1.000_002_61, 0.016_711_23, -0.000_015_31, 100.464_571_66, 102.937_681_93, 0.0],
    [0.000_005_62, -0.000_043_92, -0.012_946_68, 35_999.372_449_81, 0.323_273_64, 0.0],
];
#[rustfmt::skip]
const MARS: Elements = [
    [1.523_710_34, 0.093_394_10, 1.849_691_42, -4.553_432_05, -23.943_629_59, 49.559_538_91],
    [0.000_018_47, 0.000_078_82, -0.008_131_31, 19_140.302_684_99, 0.444_410_88, -0.292_573_43],
];
#[rustfmt::skip]
const JUPITER: Elements = [
    [5.202_887_00, 0.048_386_24, 1.304_396_95, 34.396_440_51, 14.728_479_83, 100.473_909_09],
    [-0.000_116_07, -0.000_132_53, -0.001_837_14, 3_034.746_127_75, 0.212_526_68, 0.204_691_06],
];
#[rustfmt::skip]
const SATURN: Elements = [
    [9.536_675_94, 0.053_861_79, 2.485_991_87, 49.954_244_23, 92.598_878_31, 113.662_424_48],
    [-0.001_250_60, -0.000_509_91, 0.001_936_09, 1_222.493_622_01, -0.418_972_16, -0.288_677_94],
];
#[rustfmt::skip]
const URANUS: Elements = [
    [19.189_164_64, 0.047_257_44, 0.772_637_83, 313.238_104_51, 170.954_276_30, 74.016_925_03],
    [-0.001_961_76, -0.000_043_97, -0.002_429_39, 428.482_027_85, 0.408_052_81, 0.042_405_89],
];
#[rustfmt::skip]
const NEPTUNE: Elements = [
    [30.069_922_76, 0.008_590_48, 1.770_043_47, -55.120_029_69, 44.964_762_27, 131.784_225_74],
    [0.000_262_91, 0.000_051_05, 0.000_353_72, 218.459_453_25, -0.322_414_64, -0.005_086_64],
];
#[rustfmt::skip]
const PLUTO: Elements = [
    [39.482_116_75, 0.248_827_30, 17.140_012_06, 238.929_038_33, 224.068_916_29, 110.303_936_84],
    [-0.000_315_96, 0.000_051_70, 0.000_048_18, 145.207_805_15, -0.040_629_42, -0.011_834_82],
];

/// Lunar longitude terms: multiples of D, M, M', F and the sine coefficient
/// in millionths of a degree (Meeus table 47.A).
#[rustfmt::skip]
const MOON_LONGITUDE_TERMS: [(f64, f64, f64, f64, f64); 34] = [
    (0.0,  0.0,  1.0,  0.0,  6_288_774.0),
    (2.0,  0.0, -1.0,  0.0,  1_274_027.0),
    (2.0,  0.0,  0.0,  0.0,    658_314.0),
    (0.0,  0.0,  2.0,  0.0,    213_618.0),
    (0.0,  1.0,  0.0,  0.0,   -185_116.0),
    (0.0,  0.0,  0.0,  2.0,   -114_332.0),
    (2.0,  0.0, -2.0,  0.0,     58_793.0),
    (2.0, -1.0, -1.0,  0.0,     57_066.0),
    (2.0,  0.0,  1.0,  0.0,     53_322.0),
    (2.0, -1.0,  0.0,  0.0,     45_758.0),
    (0.0,  1.0, -1.0,  0.0,    -40_923.0),
    (1.0,  0.0,  0.0,  0.0,    -34_720.0),
    (0.0,  1.0,  1.0,  0.0,    -30_383.0),
    (2.0,  0.0,  0.0, -2.0,     15_327.0),
    (0.0,  0.0,  1.0,  2.0,    -12_528.0),
    (0.0,  0.0,  1.0, -2.0,     10_980.0),
    (4.0,  0.0, -1.0,  0.0,     10_675.0),
    (0.0,  0.0,  3.0,  0.0,     10_034.0),
    (4.0,  0.0, -2.0,  0.0,      8_548.0),
    (2.0,  1.0, -1.0,  0.0,     -7_888.0),
    (2.0,  1.0,  0.0,  0.0,     -6_766.0),
    (1.0,  0.0, -1.0,  0.0,     -5_163.0),
    (1.0,  1.0,  0.0,  0.0,      4_987.0),
    (2.0, -1.0,  1.0,  0.0,      4_036.0),
    (2.0,  0.0,  2.0,  0.0,      3_994.0),
    (4.0,  0.0,  0.0,  0.0,      3_861.0),
    (2.0,  0.0, -3.0,  0.0,      3_665.0),
    (0.0,  1.0, -2.0,  0.0,     -2_689.0),
    (2.0,  0.0, -1.0,  2.0,     -2_602.0),
    (2.0, -1.0, -2.0,  0.0,      2_390.0),
    (1.0,  0.0,  1.0,  0.0,     -2_348.0),
    (2.0, -2.0,  0.0,  0.0,      2_236.0),
    (0.0,  1.0,  2.0,  0.0,     -2_120.0),
    (0.0,  2.0,  0.0,  0.0,     -2_069.0),
];

/// Authoritative ephemeris backend; pure Rust, no data files.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self
    }
}

impl EphemerisAdapter for AnalyticEphemeris {
    fn name(&self) -> &str {
        "analytic"
    }

    fn longitude_of(&self, body: Body, instant: DateTime<Utc>) -> Result<f64, EphemerisError> {
        let t = julian_centuries(julian_day(instant));
        let lon = match body {
            Body::Moon => moon_longitude(t),
            Body::Sun => {
                let earth = heliocentric(&EARTH_MOON_BARYCENTER, t);
                precessed_longitude(-earth[1], -earth[0], t)
            }
            planet => {
                let elements = match planet {
                    Body::Mercury => &MERCURY,
                    Body::Venus => &VENUS,
                    Body::Mars => &MARS,
                    Body::Jupiter => &JUPITER,
                    Body::Saturn => &SATURN,
                    Body::Uranus => &URANUS,
                    Body::Neptune => &NEPTUNE,
                    _ => &PLUTO,
                };
                let p = heliocentric(elements, t);
                let earth = heliocentric(&EARTH_MOON_BARYCENTER, t);
                precessed_longitude(p[1] - earth[1], p[0] - earth[0], t)
            }
        };

        if lon.is_finite() {
            Ok(lon)
        } else {
            Err(EphemerisError::CalculationFailed {
                body: body.id().to_string(),
                datetime: instant,
                message: "non-finite longitude".to_string(),
            })
        }
    }
}

fn precessed_longitude(y: f64, x: f64, t: f64) -> f64 {
    normalize_degrees(y.atan2(x).to_degrees() + PRECESSION_DEG_PER_CENTURY * t)
}

/// Heliocentric ecliptic J2000 coordinates (au) of a body at `t` centuries.
fn heliocentric(elements: &Elements, t: f64) -> [f64; 3] {
    let [base, rate] = elements;
    let at = |i: usize| base[i] + rate[i] * t;

    let a = at(0);
    let e = at(1);
    let incl = at(2).to_radians();
    let mean_longitude = at(3);
    let perihelion = at(4);
    let node = at(5);

    let omega = (perihelion - node).to_radians();
    let node = node.to_radians();
    let mean_anomaly = crate::zodiac::signed_degrees(mean_longitude - perihelion).to_radians();
    let ecc_anomaly = solve_kepler(mean_anomaly, e);

    let xp = a * (ecc_anomaly.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * ecc_anomaly.sin();

    let (so, co) = omega.sin_cos();
    let (sn, cn) = node.sin_cos();
    let (si, ci) = incl.sin_cos();

    [
        (co * cn - so * sn * ci) * xp + (-so * cn - co * sn * ci) * yp,
        (co * sn + so * cn * ci) * xp + (-so * sn + co * cn * ci) * yp,
        (so * si) * xp + (co * si) * yp,
    ]
}

/// Eccentric anomaly (radians) by Newton iteration.
fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc = mean_anomaly + e * mean_anomaly.sin();
    for _ in 0..30 {
        let delta = (ecc - e * ecc.sin() - mean_anomaly) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ecc
}

/// Geocentric lunar longitude (mean equinox of date), degrees.
fn moon_longitude(t: f64) -> f64 {
    let mean_longitude = 218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t * t;
    let d = (297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t * t).to_radians();
    let m = (357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t * t).to_radians();
    let mp = (134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t * t).to_radians();
    let f = (93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t * t).to_radians();
    let ecc = 1.0 - 0.002_516 * t - 0.000_007_4 * t * t;

    let mut sum: f64 = MOON_LONGITUDE_TERMS
        .iter()
        .map(|&(cd, cm, cmp, cf, coeff)| {
            let scale = match cm.abs() as u8 {
                1 => ecc,
                2 => ecc * ecc,
                _ => 1.0,
            };
            coeff * scale * (cd * d + cm * m + cmp * mp + cf * f).sin()
        })
        .sum();

    // Venus, Jupiter and flattening perturbations
    let a1 = (119.75 + 131.849 * t).to_radians();
    let a2 = (53.09 + 479_264.29 * t).to_radians();
    sum += 3_958.0 * a1.sin()
        + 1_962.0 * (mean_longitude.to_radians() - f).sin()
        + 318.0 * a2.sin();

    normalize_degrees(mean_longitude + sum / 1_000_000.0)
}
