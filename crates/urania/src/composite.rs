//! Relationship charts built from two natal charts.

use crate::chart::composer::{assign_houses, Warnings};
use crate::chart::{
    aspectable_points, Angles, BodyPlacement, ChartComposer, ChartInput, ChartMeta, ChartResult,
    ChartSettings, Site, ENGINE_NAME,
};
use crate::ephemeris::GeoLocation;
use crate::error::ChartError;
use crate::houses::{build_houses, HOUSE_FALLBACK_SUFFIX};
use crate::time::DstPreference;
use crate::zodiac::{normalize_degrees, signed_degrees};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const NOMINAL_TIME_WARNING: &str =
    "Composite time and location are nominal (Davison midpoints of the two charts)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMethod {
    #[default]
    Midpoint,
    Davison,
}

impl std::str::FromStr for CompositeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "midpoint" => Ok(CompositeMethod::Midpoint),
            "davison" => Ok(CompositeMethod::Davison),
            other => Err(format!("Unknown composite method: {other}")),
        }
    }
}

/// Midpoint on the shorter arc between two longitudes.
///
/// Same direction as the vector sum of the two unit vectors; exact
/// oppositions resolve to `a + 90`.
pub fn circular_midpoint(a: f64, b: f64) -> f64 {
    let arc = signed_degrees(b - a);
    if arc.abs() >= 180.0 {
        return normalize_degrees(a + 90.0);
    }
    normalize_degrees(a + arc / 2.0)
}

pub fn generate_composite(
    composer: &ChartComposer,
    chart_a: &ChartResult,
    chart_b: &ChartResult,
    method: CompositeMethod,
    settings: &ChartSettings,
) -> Result<ChartResult, ChartError> {
    log::debug!("Building {:?} composite", method);
    let mut extra = Vec::new();
    if chart_a.meta.settings_hash != chart_b.meta.settings_hash {
        extra.push(settings_drift_warning(chart_a, chart_b));
    }

    let (utc, site) = davison_midpoint(chart_a, chart_b)?;
    match method {
        CompositeMethod::Davison => {
            let mut chart = composer.chart_at_instant(utc, site, settings, extra)?;
            chart.input = composite_input(chart_a, chart_b, &chart.input);
            Ok(chart)
        }
        CompositeMethod::Midpoint => {
            midpoint_composite(composer, chart_a, chart_b, utc, site, settings, extra)
        }
    }
}

pub(crate) fn settings_drift_warning(chart_a: &ChartResult, chart_b: &ChartResult) -> String {
    let warning = format!(
        "Charts were generated with different settings ({} vs {})",
        chart_a.meta.settings_hash, chart_b.meta.settings_hash
    );
    log::warn!("{}", warning);
    warning
}

/// Epoch-millisecond midpoint of the two instants and mean of the two
/// locations, in chart A's zone.
fn davison_midpoint(
    chart_a: &ChartResult,
    chart_b: &ChartResult,
) -> Result<(chrono::DateTime<Utc>, Site), ChartError> {
    let a_ms = chart_a.normalized.utc_date_time.timestamp_millis();
    let b_ms = chart_b.normalized.utc_date_time.timestamp_millis();
    let mid_ms = a_ms + (b_ms - a_ms) / 2;
    let utc = Utc
        .timestamp_millis_opt(mid_ms)
        .single()
        .ok_or_else(|| ChartError::InvalidRange(format!("no instant at {mid_ms} ms")))?;

    let zone = Site::of_chart(chart_a)?;
    let a = chart_a.normalized.location;
    let b = chart_b.normalized.location;
    let site = Site {
        location: GeoLocation {
            lat: (a.lat + b.lat) / 2.0,
            lon: (a.lon + b.lon) / 2.0,
        },
        timezone: zone.timezone,
    };
    Ok((utc, site))
}

fn midpoint_composite(
    composer: &ChartComposer,
    chart_a: &ChartResult,
    chart_b: &ChartResult,
    utc: chrono::DateTime<Utc>,
    site: Site,
    settings: &ChartSettings,
    extra: Vec<String>,
) -> Result<ChartResult, ChartError> {
    let mut warnings = Warnings::default();
    for warning in chart_a.meta.warnings.iter().chain(&chart_b.meta.warnings) {
        // house fallbacks are re-derived below for these settings
        if !warning.ends_with(HOUSE_FALLBACK_SUFFIX) {
            warnings.push(warning.clone());
        }
    }
    for warning in extra {
        warnings.push(warning);
    }
    warnings.push(NOMINAL_TIME_WARNING.to_string());

    let mut planets = BTreeMap::new();
    for (point, placement_a) in &chart_a.planets {
        let lon_a = placement_a.longitude;
        let lon_b = chart_b.planets.get(point).and_then(|p| p.longitude);
        if let (Some(lon_a), Some(lon_b)) = (lon_a, lon_b) {
            planets.insert(*point, BodyPlacement::from_longitude(circular_midpoint(lon_a, lon_b)));
        }
    }

    let angles = match (&chart_a.angles, &chart_b.angles) {
        (Some(a), Some(b)) => {
            let midpoint = |x: &BodyPlacement, y: &BodyPlacement| {
                x.longitude.zip(y.longitude).map(|(x, y)| circular_midpoint(x, y))
            };
            match (
                midpoint(&a.ascendant, &b.ascendant),
                midpoint(&a.midheaven, &b.midheaven),
                midpoint(&a.vertex, &b.vertex),
            ) {
                (Some(asc), Some(mc), Some(vertex)) => Some(Angles::from_longitudes(asc, mc, vertex)),
                _ => None,
            }
        }
        _ => None,
    };

    let houses = match angles.as_ref().and_then(|a| a.ascendant.longitude) {
        Some(ascendant) => {
            let house_set = build_houses(settings.house_system, ascendant);
            for warning in house_set.warnings {
                warnings.push(warning);
            }
            assign_houses(&mut planets, &house_set.cusps);
            Some(house_set.cusps)
        }
        None => None,
    };

    let aspects = settings
        .aspect_calculator()
        .find_aspects(&aspectable_points(&planets, angles.as_ref()));
    let normalized = composer.normalize(utc, site);
    let local = normalized.local_date_time;

    Ok(ChartResult {
        input: composite_input(
            chart_a,
            chart_b,
            &ChartInput {
                date: local.format("%Y-%m-%d").to_string(),
                time: local.format("%H:%M:%S").to_string(),
                city: String::new(),
                country: String::new(),
                coordinates: Some(site.coordinates()),
                daylight_saving: DstPreference::Explicit(normalized.daylight_saving),
            },
        ),
        settings: *settings,
        normalized,
        planets,
        angles,
        houses,
        aspects,
        meta: ChartMeta {
            engine: ENGINE_NAME.to_string(),
            ephemeris: chart_a.meta.ephemeris.clone(),
            settings_hash: settings.fingerprint(),
            warnings: warnings.into_vec(),
        },
    })
}

/// Input record naming both source charts' places.
fn composite_input(chart_a: &ChartResult, chart_b: &ChartResult, base: &ChartInput) -> ChartInput {
    let join = |a: &str, b: &str| {
        if a.is_empty() && b.is_empty() {
            String::new()
        } else {
            format!("{} / {}", a, b)
        }
    };
    ChartInput {
        city: join(&chart_a.input.city, &chart_b.input.city),
        country: join(&chart_a.input.country, &chart_b.input.country),
        ..base.clone()
    }
}
