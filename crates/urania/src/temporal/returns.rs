//! Solar and lunar returns: when a body comes back to its natal longitude.

use crate::aspects::angular_separation;
use crate::chart::{ChartComposer, ChartPoint, ChartResult, ChartSettings, Coordinates, Site};
use crate::ephemeris::Body;
use crate::error::ChartError;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const SOLAR_WINDOW_DAYS: i64 = 3;
const LUNAR_MARGIN_DAYS: i64 = 1;
const FINE_SPAN_MINUTES: i64 = 90;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnResult {
    pub exact_instant: DateTime<Utc>,
    /// Remaining angular distance from the natal longitude at `exact_instant`
    pub separation: f64,
    pub chart: ChartResult,
}

/// Coarse-then-fine scan bounds for one return search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub coarse_step: Duration,
    pub fine_step: Duration,
    pub fine_span: Duration,
}

impl SearchWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            coarse_step: Duration::hours(1),
            fine_step: Duration::minutes(1),
            fine_span: Duration::minutes(FINE_SPAN_MINUTES),
        }
    }
}

/// Instant in `window` where `body` is closest to `target` longitude.
///
/// Returns the best candidate and its distance; ties keep the earliest.
pub fn find_return(
    composer: &ChartComposer,
    body: Body,
    target: f64,
    window: SearchWindow,
) -> Result<(DateTime<Utc>, f64), ChartError> {
    let coarse = best_of(&samples(composer, body, target, window.start, window.end, window.coarse_step)?);
    refine(composer, body, target, coarse.0, window)
}

/// Every return inside `window`, refined and in chronological order.
///
/// A return is an interior local minimum of the coarse distance curve.
pub fn find_returns(
    composer: &ChartComposer,
    body: Body,
    target: f64,
    window: SearchWindow,
) -> Result<Vec<(DateTime<Utc>, f64)>, ChartError> {
    let coarse = samples(composer, body, target, window.start, window.end, window.coarse_step)?;
    let mut found = Vec::new();
    for i in 1..coarse.len().saturating_sub(1) {
        let distance = coarse[i].1;
        if distance <= coarse[i - 1].1 && distance < coarse[i + 1].1 {
            found.push(refine(composer, body, target, coarse[i].0, window)?);
        }
    }
    Ok(found)
}

fn refine(
    composer: &ChartComposer,
    body: Body,
    target: f64,
    around: DateTime<Utc>,
    window: SearchWindow,
) -> Result<(DateTime<Utc>, f64), ChartError> {
    let fine = samples(
        composer,
        body,
        target,
        around - window.fine_span,
        around + window.fine_span,
        window.fine_step,
    )?;
    Ok(best_of(&fine))
}

fn samples(
    composer: &ChartComposer,
    body: Body,
    target: f64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
) -> Result<Vec<(DateTime<Utc>, f64)>, ChartError> {
    let mut out = Vec::new();
    let mut instant = start;
    while instant <= end {
        out.push((instant, angular_separation(composer.longitude_of(body, instant)?, target)));
        instant += step;
    }
    Ok(out)
}

/// Lowest distance; strict `<` keeps the earliest of equal candidates.
fn best_of(samples: &[(DateTime<Utc>, f64)]) -> (DateTime<Utc>, f64) {
    let mut best = samples.first().copied().unwrap_or((DateTime::<Utc>::MIN_UTC, f64::INFINITY));
    for &(instant, distance) in samples {
        if distance < best.1 {
            best = (instant, distance);
        }
    }
    best
}

/// Solar return for `year`, cast at `location` or the natal place.
pub fn solar_return(
    composer: &ChartComposer,
    base: &ChartResult,
    year: i32,
    location: Option<&Coordinates>,
    settings: &ChartSettings,
) -> Result<ReturnResult, ChartError> {
    let natal_sun = natal_longitude(base, ChartPoint::Sun)?;
    let birth = base.normalized.local_date_time;
    let birthday = NaiveDate::from_ymd_opt(year, birth.month(), birth.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, birth.month(), birth.day() - 1))
        .ok_or_else(|| ChartError::InvalidDate(format!("{year}-{:02}-{:02}", birth.month(), birth.day())))?;

    let center = approximate_utc(base, birthday.and_time(birth.time()));
    let window = SearchWindow::new(
        center - Duration::days(SOLAR_WINDOW_DAYS),
        center + Duration::days(SOLAR_WINDOW_DAYS),
    );
    log::debug!("Solar return search {} to {}", window.start, window.end);

    let (instant, separation) = find_return(composer, Body::Sun, natal_sun, window)?;
    cast_return(composer, base, instant, separation, location, settings)
}

/// Lunar return within calendar `month` of `year` (natal zone).
///
/// The earliest return whose local date falls in the month wins. Only when
/// the month holds none does the closest instant of the padded window count.
pub fn lunar_return(
    composer: &ChartComposer,
    base: &ChartResult,
    year: i32,
    month: u32,
    location: Option<&Coordinates>,
    settings: &ChartSettings,
) -> Result<ReturnResult, ChartError> {
    let natal_moon = natal_longitude(base, ChartPoint::Moon)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ChartError::InvalidDate(format!("{year}-{month:02}")))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| ChartError::InvalidDate(format!("{year}-{month:02}")))?;

    let window = SearchWindow::new(
        approximate_utc(base, first.and_time(NaiveTime::MIN)) - Duration::days(LUNAR_MARGIN_DAYS),
        approximate_utc(base, next.and_time(NaiveTime::MIN)) + Duration::days(LUNAR_MARGIN_DAYS),
    );
    log::debug!("Lunar return search {} to {}", window.start, window.end);

    let zone = Site::of_chart(base)?.timezone;
    let in_month = |instant: &DateTime<Utc>| {
        let local = instant.with_timezone(&zone).date_naive();
        local.year() == year && local.month() == month
    };
    let in_month_return = find_returns(composer, Body::Moon, natal_moon, window)?
        .into_iter()
        .find(|(instant, _)| in_month(instant));

    let (instant, separation) = match in_month_return {
        Some(found) => found,
        None => {
            log::warn!("No lunar return inside {year}-{month:02}; using the closest instant");
            find_return(composer, Body::Moon, natal_moon, window)?
        }
    };
    cast_return(composer, base, instant, separation, location, settings)
}

fn natal_longitude(base: &ChartResult, point: ChartPoint) -> Result<f64, ChartError> {
    base.longitude_of(point)
        .ok_or_else(|| ChartError::MissingPoint(point.id().to_string()))
}

/// Local reading to UTC using the natal offset; only used to bound searches.
fn approximate_utc(base: &ChartResult, local: NaiveDateTime) -> DateTime<Utc> {
    let utc = local + Duration::minutes(i64::from(base.normalized.offset_minutes));
    Utc.from_utc_datetime(&utc)
}

fn cast_return(
    composer: &ChartComposer,
    base: &ChartResult,
    instant: DateTime<Utc>,
    separation: f64,
    location: Option<&Coordinates>,
    settings: &ChartSettings,
) -> Result<ReturnResult, ChartError> {
    let site = match location {
        Some(coordinates) => Site::from_coordinates(coordinates)?,
        None => Site::of_chart(base)?,
    };
    let chart = composer.chart_at_instant(instant, site, settings, Vec::new())?;
    Ok(ReturnResult {
        exact_instant: instant,
        separation,
        chart,
    })
}
