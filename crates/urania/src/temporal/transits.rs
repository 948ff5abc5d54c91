//! Day-by-day transits against a natal chart.

use crate::aspects::{AspectType, LabelledLongitude};
use crate::chart::{ChartComposer, ChartPoint, ChartResult, ChartSettings, Site};
use crate::error::ChartError;
use crate::time::DstPreference;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Longest range a single call may scan, in days.
pub const MAX_RANGE_DAYS: i64 = 3_660;
pub const STRONGEST_HITS_PER_DAY: usize = 6;
/// Orb at or below which a hit counts as exact.
pub const EXACT_ORB: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl TransitRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, ChartError> {
        if from > to {
            return Err(ChartError::InvalidRange(format!("{from} is after {to}")));
        }
        let days = (to - from).num_days() + 1;
        if days > MAX_RANGE_DAYS {
            return Err(ChartError::RangeTooLarge {
                days,
                limit: MAX_RANGE_DAYS,
            });
        }
        Ok(Self { from, to })
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.from.iter_days().take_while(move |d| *d <= self.to)
    }
}

/// A transiting body in aspect to a natal point on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitHit {
    pub date: NaiveDate,
    pub transiting: ChartPoint,
    pub natal: String,
    #[serde(rename = "type")]
    pub aspect_type: AspectType,
    pub orb: f64,
    pub transiting_longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitDay {
    pub date: NaiveDate,
    /// At most six, tightest first
    pub strongest_hits: Vec<TransitHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitRangeResult {
    pub days: Vec<TransitDay>,
    /// Hits with orb <= 0.4 across the range, by date then orb
    pub exact_hits: Vec<TransitHit>,
    pub settings_hash: String,
    pub warnings: Vec<String>,
}

pub fn generate_transits(
    composer: &ChartComposer,
    base: &ChartResult,
    range: TransitRange,
    settings: &ChartSettings,
) -> Result<TransitRangeResult, ChartError> {
    let range = TransitRange::new(range.from, range.to)?;
    let site = Site::of_chart(base)?;
    let natal = base.aspectable_points();
    let calculator = settings.aspect_calculator();
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
    log::debug!("Scanning transits {} to {}", range.from, range.to);

    let mut days = Vec::new();
    let mut exact_hits = Vec::new();
    let mut warnings = Vec::new();

    for date in range.days() {
        let resolved = composer.resolver().resolve(
            date,
            noon,
            site.timezone,
            DstPreference::Auto,
        )?;
        let chart = composer.chart_at_instant(resolved.utc, site, settings, Vec::new())?;
        for warning in &chart.meta.warnings {
            if !warnings.contains(warning) {
                warnings.push(warning.clone());
            }
        }

        let transiting: Vec<LabelledLongitude> = chart
            .planets
            .iter()
            .filter(|(point, _)| point.body().is_some())
            .filter_map(|(point, p)| p.longitude.map(|lon| LabelledLongitude::new(point.id(), lon)))
            .collect();

        let mut hits: Vec<TransitHit> = calculator
            .find_cross_aspects(&transiting, &natal)
            .into_iter()
            .filter_map(|aspect| {
                let point = ChartPoint::from_id(&aspect.point_a)?;
                Some(TransitHit {
                    date,
                    transiting: point,
                    natal: aspect.point_b,
                    aspect_type: aspect.aspect_type,
                    orb: aspect.orb,
                    transiting_longitude: chart.longitude_of(point).unwrap_or_default(),
                })
            })
            .collect();

        exact_hits.extend(hits.iter().filter(|h| h.orb <= EXACT_ORB).cloned());
        hits.truncate(STRONGEST_HITS_PER_DAY);
        days.push(TransitDay {
            date,
            strongest_hits: hits,
        });
    }

    // stable: same-date, same-orb hits keep scan order
    exact_hits.sort_by(|a, b| a.date.cmp(&b.date).then(a.orb.total_cmp(&b.orb)));

    Ok(TransitRangeResult {
        days,
        exact_hits,
        settings_hash: settings.fingerprint(),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_validation() {
        assert!(TransitRange::new(date(2024, 1, 2), date(2024, 1, 1)).is_err());
        assert!(matches!(
            TransitRange::new(date(2000, 1, 1), date(2024, 1, 1)),
            Err(ChartError::RangeTooLarge { .. })
        ));
        let range = TransitRange::new(date(2024, 1, 30), date(2024, 2, 2)).unwrap();
        assert_eq!(range.days().count(), 4);
        let single = TransitRange::new(date(2024, 1, 1), date(2024, 1, 1)).unwrap();
        assert_eq!(single.days().count(), 1);
    }
}
