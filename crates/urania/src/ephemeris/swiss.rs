//! Swiss Ephemeris backend (feature `swisseph`).

use crate::ephemeris::adapter::{EphemerisAdapter, EphemerisError};
use crate::ephemeris::types::Body;
use crate::zodiac::normalize_degrees;
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::env;
use std::path::PathBuf;
use swisseph::swe::{calc_ut, julday, set_ephe_path};

// Swiss Ephemeris body numbers
const BODY_IDS: &[(Body, u32)] = &[
    (Body::Sun, 0),
    (Body::Moon, 1),
    (Body::Mercury, 2),
    (Body::Venus, 3),
    (Body::Mars, 4),
    (Body::Jupiter, 5),
    (Body::Saturn, 6),
    (Body::Uranus, 7),
    (Body::Neptune, 8),
    (Body::Pluto, 9),
];

// FLG_SWIEPH
const FLAGS: u32 = 2;

/// Swiss Ephemeris adapter. Building one points the library at its data files.
#[derive(Debug)]
pub struct SwissEphemerisAdapter {
    _private: (),
}

impl SwissEphemerisAdapter {
    /// Use `ephemeris_path`, else `$SWISS_EPHEMERIS_PATH`, else the system default.
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = resolve_path(ephemeris_path);
        if !path.exists() {
            return Err(unavailable(format!(
                "ephemeris path {} does not exist; install the Swiss Ephemeris data files",
                path.display()
            )));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| unavailable(format!("ephemeris path {} is not valid UTF-8", path.display())))?;

        set_ephe_path(path_str);
        log::info!("Swiss Ephemeris data files at {}", path.display());
        Ok(Self { _private: () })
    }
}

fn resolve_path(ephemeris_path: Option<PathBuf>) -> PathBuf {
    ephemeris_path.unwrap_or_else(|| {
        env::var("SWISS_EPHEMERIS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/usr/local/share/swisseph"))
    })
}

fn unavailable(message: String) -> EphemerisError {
    EphemerisError::Unavailable {
        backend: "swiss".to_string(),
        message,
    }
}

impl EphemerisAdapter for SwissEphemerisAdapter {
    fn name(&self) -> &str {
        "swiss"
    }

    fn longitude_of(&self, body: Body, instant: DateTime<Utc>) -> Result<f64, EphemerisError> {
        let code = BODY_IDS
            .iter()
            .find(|(b, _)| *b == body)
            .map(|(_, code)| *code)
            .ok_or_else(|| EphemerisError::UnsupportedBody {
                body: body.id().to_string(),
                backend: "swiss".to_string(),
            })?;

        let result = calc_ut(datetime_to_julian_day(instant), code, FLAGS).map_err(|e| {
            EphemerisError::CalculationFailed {
                body: body.id().to_string(),
                datetime: instant,
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;

        Ok(normalize_degrees(result.out[0]))
    }
}

/// Convert UTC datetime to Julian Day
fn datetime_to_julian_day(dt: DateTime<Utc>) -> f64 {
    let hour_decimal = dt.hour() as f64
        + dt.minute() as f64 / 60.0
        + (dt.second() as f64 + dt.nanosecond() as f64 / 1e9) / 3600.0;

    // GREG_CAL = 1
    julday(dt.year(), dt.month() as i32, dt.day() as i32, hour_decimal, 1)
}
