//! Saturn return tracking over ages 27 to 32.

use crate::aspects::angular_separation;
use crate::chart::{ChartComposer, ChartPoint, ChartResult};
use crate::ephemeris::Body;
use crate::error::ChartError;
use crate::temporal::progression::DAYS_PER_YEAR;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const WINDOW_START_AGE: f64 = 27.0;
pub const WINDOW_END_AGE: f64 = 32.0;
/// Days with Saturn this close to its natal longitude are flagged.
pub const RETURN_ORB: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaturnReturnDay {
    pub date: NaiveDate,
    pub instant: DateTime<Utc>,
    pub longitude: f64,
    pub orb: f64,
}

/// A run of consecutive flagged days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaturnReturnPass {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub closest: NaiveDate,
    pub min_orb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaturnReturnResult {
    pub natal_longitude: f64,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub hits: Vec<SaturnReturnDay>,
    pub passes: Vec<SaturnReturnPass>,
}

pub fn saturn_return(composer: &ChartComposer, base: &ChartResult) -> Result<SaturnReturnResult, ChartError> {
    let natal_longitude = base
        .longitude_of(ChartPoint::Saturn)
        .ok_or_else(|| ChartError::MissingPoint(ChartPoint::Saturn.id().to_string()))?;
    let site = crate::chart::Site::of_chart(base)?;
    let birth = base.normalized.utc_date_time;
    let window_start = birth + years(WINDOW_START_AGE);
    let window_end = birth + years(WINDOW_END_AGE);
    log::debug!("Saturn return scan {} to {}", window_start, window_end);

    let mut hits = Vec::new();
    let mut instant = window_start;
    while instant <= window_end {
        let longitude = composer.longitude_of(Body::Saturn, instant)?;
        let orb = angular_separation(longitude, natal_longitude);
        if orb <= RETURN_ORB {
            hits.push(SaturnReturnDay {
                date: instant.with_timezone(&site.timezone).date_naive(),
                instant,
                longitude,
                orb,
            });
        }
        instant += Duration::days(1);
    }

    let passes = group_passes(&hits);
    Ok(SaturnReturnResult {
        natal_longitude,
        window_start,
        window_end,
        hits,
        passes,
    })
}

fn years(count: f64) -> Duration {
    Duration::milliseconds((count * DAYS_PER_YEAR * 86_400_000.0).round() as i64)
}

/// Split flagged days into passes at every gap of more than one day.
pub fn group_passes(hits: &[SaturnReturnDay]) -> Vec<SaturnReturnPass> {
    let mut passes: Vec<SaturnReturnPass> = Vec::new();
    let mut previous: Option<NaiveDate> = None;

    for hit in hits {
        let contiguous = previous.map_or(false, |p| (hit.date - p).num_days() <= 1);
        match passes.last_mut() {
            Some(pass) if contiguous => {
                pass.end = hit.date;
                if hit.orb < pass.min_orb {
                    pass.min_orb = hit.orb;
                    pass.closest = hit.date;
                }
            }
            _ => passes.push(SaturnReturnPass {
                start: hit.date,
                end: hit.date,
                closest: hit.date,
                min_orb: hit.orb,
            }),
        }
        previous = Some(hit.date);
    }
    passes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32, orb: f64) -> SaturnReturnDay {
        let date = NaiveDate::from_ymd_opt(2020, 1, d).unwrap();
        SaturnReturnDay {
            date,
            instant: Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap()),
            longitude: 300.0,
            orb,
        }
    }

    #[test]
    fn test_group_passes() {
        let hits = vec![day(1, 1.5), day(2, 0.4), day(3, 0.9), day(10, 1.9), day(11, 1.2)];
        let passes = group_passes(&hits);
        assert_eq!(passes.len(), 2);
        assert_eq!(passes[0].start.to_string(), "2020-01-01");
        assert_eq!(passes[0].end.to_string(), "2020-01-03");
        assert_eq!(passes[0].closest.to_string(), "2020-01-02");
        assert_eq!(passes[1].min_orb, 1.2);
        assert!(group_passes(&[]).is_empty());
    }
}
