//! Secondary progressions: one day after birth for each year of life.

use crate::chart::{ChartComposer, ChartResult, ChartSettings, Site};
use crate::error::ChartError;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionResult {
    /// Local calendar date of the progressed instant, in the natal zone
    pub progressed_date: NaiveDate,
    pub age_years: f64,
    pub progressed_chart: ChartResult,
}

/// Progress `base` to `target`.
///
/// Elapsed time is measured from the birth's local clock reading to the same
/// clock reading on `target`.
pub fn generate_progression(
    composer: &ChartComposer,
    base: &ChartResult,
    target: NaiveDate,
    settings: &ChartSettings,
) -> Result<ProgressionResult, ChartError> {
    let birth_local = base.normalized.local_date_time;
    if target < birth_local.date() {
        return Err(ChartError::InvalidRange(format!(
            "progression target {target} is before birth {}",
            birth_local.date()
        )));
    }

    let target_local = target.and_time(birth_local.time());
    let elapsed_days = (target_local - birth_local).num_milliseconds() as f64 / 86_400_000.0;
    let age_years = elapsed_days / DAYS_PER_YEAR;

    // one day of motion per year of life
    let offset = Duration::milliseconds((age_years * 86_400_000.0).round() as i64);
    let progressed_utc = base.normalized.utc_date_time + offset;
    let site = Site::of_chart(base)?;

    log::debug!(
        "Progressing to {} (age {:.3}): instant {}",
        target,
        age_years,
        progressed_utc
    );

    let progressed_chart = composer.chart_at_instant(progressed_utc, site, settings, Vec::new())?;
    Ok(ProgressionResult {
        progressed_date: progressed_chart.normalized.local_date_time.date(),
        age_years,
        progressed_chart,
    })
}
