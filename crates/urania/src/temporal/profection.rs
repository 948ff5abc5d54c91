//! Annual profections: one house per year of age.

use crate::chart::{ChartPoint, ChartResult};
use crate::error::ChartError;
use crate::western::sign_ruler_from_longitude;
use crate::zodiac::ZodiacSign;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfectionResult {
    pub date: NaiveDate,
    pub age: u32,
    /// 1-12
    pub house: u8,
    pub sign: ZodiacSign,
    pub cusp_longitude: f64,
    /// Ruler of the profected sign, traditional unless modern rulers were asked for
    pub lord_of_year: ChartPoint,
}

/// Completed years from `birth` to `on`, counting a birthday only once reached.
pub fn age_on(birth: NaiveDate, on: NaiveDate) -> Option<u32> {
    if on < birth {
        return None;
    }
    let mut age = on.year() - birth.year();
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

/// Profection with the traditional lord of the year.
pub fn annual_profection(base: &ChartResult, on: NaiveDate) -> Result<ProfectionResult, ChartError> {
    annual_profection_with(base, on, false)
}

/// Profection; `modern` gives Scorpio, Aquarius and Pisces their outer-planet rulers.
pub fn annual_profection_with(
    base: &ChartResult,
    on: NaiveDate,
    modern: bool,
) -> Result<ProfectionResult, ChartError> {
    let birth = base.normalized.local_date_time.date();
    let age = age_on(birth, on)
        .ok_or_else(|| ChartError::InvalidRange(format!("{on} is before birth {birth}")))?;
    let houses = base.houses.as_ref().ok_or(ChartError::MissingHouses)?;

    // age % 12 < 12, so the cast and index are in range
    let house = (age % 12) as u8 + 1;
    let cusp = houses
        .iter()
        .find(|h| h.house == house)
        .ok_or(ChartError::MissingHouses)?;

    Ok(ProfectionResult {
        date: on,
        age,
        house,
        sign: cusp.sign,
        cusp_longitude: cusp.longitude,
        lord_of_year: sign_ruler_from_longitude(cusp.longitude, modern),
    })
}
