use crate::angles::solve_angles;
use crate::chart::gazetteer::{City, Gazetteer};
use crate::chart::settings::ChartSettings;
use crate::chart::types::{
    aspectable_points, Angles, BodyPlacement, ChartInput, ChartMeta, ChartPoint, ChartResult,
    Coordinates, NormalizedTime,
};
use crate::derived::{estimate, DerivedInputs};
use crate::ephemeris::{
    Body, EphemerisAdapter, EphemerisError, EphemerisOptions, EphemerisRegistry, GeoLocation,
    SelectedEphemeris,
};
use crate::error::ChartError;
use crate::houses::{build_houses, house_of};
use crate::time::{
    julian_centuries, julian_day, parse_timezone, DstPreference, ResolvedInstant, TimeResolver,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Engine identity recorded in every chart.
pub const ENGINE_NAME: &str = concat!("urania/", env!("CARGO_PKG_VERSION"));

/// Construction-time configuration for a [`ChartComposer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineOptions {
    pub ephemeris: EphemerisOptions,
    /// Gazetteer entries consulted before the built-in table
    pub cities: Vec<City>,
}

/// A resolved place: coordinates plus IANA zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    pub location: GeoLocation,
    pub timezone: Tz,
}

impl Site {
    pub fn from_coordinates(coordinates: &Coordinates) -> Result<Self, ChartError> {
        let location = GeoLocation {
            lat: coordinates.lat,
            lon: coordinates.lon,
        };
        if !location.is_valid() {
            return Err(ChartError::InvalidLocation {
                lat: coordinates.lat,
                lon: coordinates.lon,
            });
        }
        let timezone = parse_timezone(&coordinates.timezone)
            .ok_or_else(|| ChartError::UnknownTimezone(coordinates.timezone.clone()))?;
        Ok(Self { location, timezone })
    }

    /// The place a chart was cast for.
    pub fn of_chart(chart: &ChartResult) -> Result<Self, ChartError> {
        let timezone = parse_timezone(&chart.normalized.timezone)
            .ok_or_else(|| ChartError::UnknownTimezone(chart.normalized.timezone.clone()))?;
        Ok(Self {
            location: chart.normalized.location,
            timezone,
        })
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.location.lat,
            lon: self.location.lon,
            timezone: self.timezone.name().to_string(),
        }
    }
}

/// Turns chart requests into [`ChartResult`]s.
///
/// Holds the time resolver (and its offset cache), the selected ephemeris and
/// the gazetteer. Nothing here depends on earlier requests.
pub struct ChartComposer {
    resolver: TimeResolver,
    ephemeris: SelectedEphemeris,
    gazetteer: Gazetteer,
}

impl ChartComposer {
    pub fn new(options: EngineOptions) -> Self {
        let registry = EphemerisRegistry::with_options(&options.ephemeris);
        let ephemeris = registry.select(&options.ephemeris.backend);
        log::info!(
            "Chart composer using '{}' ephemeris ({} gazetteer extras)",
            ephemeris.adapter.name(),
            options.cities.len()
        );

        Self {
            resolver: TimeResolver::new(),
            ephemeris,
            gazetteer: Gazetteer::with_cities(options.cities),
        }
    }

    /// Composer over a specific adapter, with the built-in gazetteer.
    pub fn with_adapter(adapter: Arc<dyn EphemerisAdapter>) -> Self {
        let warnings = adapter.approximations();
        Self {
            resolver: TimeResolver::new(),
            ephemeris: SelectedEphemeris { adapter, warnings },
            gazetteer: Gazetteer::new(),
        }
    }

    pub fn resolver(&self) -> &TimeResolver {
        &self.resolver
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    pub fn ephemeris_name(&self) -> &str {
        self.ephemeris.adapter.name()
    }

    pub fn longitude_of(&self, body: Body, instant: DateTime<Utc>) -> Result<f64, EphemerisError> {
        self.ephemeris.adapter.longitude_of(body, instant)
    }

    /// Explicit coordinates win; otherwise the gazetteer.
    pub fn resolve_site(&self, input: &ChartInput) -> Result<Site, ChartError> {
        if let Some(coordinates) = &input.coordinates {
            return Site::from_coordinates(coordinates);
        }

        let city = self
            .gazetteer
            .lookup(&input.city, &input.country)
            .ok_or_else(|| ChartError::CityNotFound {
                city: input.city.clone(),
                country: input.country.clone(),
            })?;
        Site::from_coordinates(&Coordinates {
            lat: city.lat,
            lon: city.lon,
            timezone: city.timezone.clone(),
        })
    }

    /// Cast a chart from a raw request.
    pub fn generate_chart(
        &self,
        input: &ChartInput,
        settings: &ChartSettings,
    ) -> Result<ChartResult, ChartError> {
        let date = parse_date(&input.date)?;
        let time = parse_time(&input.time)?;
        let site = self.resolve_site(input)?;
        let resolved = self
            .resolver
            .resolve(date, time, site.timezone, input.daylight_saving)?;

        log::debug!(
            "Resolved {} {} in {} to {} (dst: {})",
            input.date,
            input.time,
            site.timezone.name(),
            resolved.utc,
            resolved.daylight_saving
        );

        self.compose(input.clone(), &resolved, site, settings, Vec::new())
    }

    /// Cast a chart for an already-known UTC instant, localized to `site`.
    pub fn chart_at_instant(
        &self,
        utc: DateTime<Utc>,
        site: Site,
        settings: &ChartSettings,
        warnings: Vec<String>,
    ) -> Result<ChartResult, ChartError> {
        let resolved = self.resolver.localize(utc, site.timezone);
        let input = derived_input(&resolved, &site);
        self.compose(input, &resolved, site, settings, warnings)
    }

    /// Time block for an instant at a site.
    pub fn normalize(&self, utc: DateTime<Utc>, site: Site) -> NormalizedTime {
        normalized_time(&self.resolver.localize(utc, site.timezone), &site)
    }

    fn compose(
        &self,
        input: ChartInput,
        resolved: &ResolvedInstant,
        site: Site,
        settings: &ChartSettings,
        extra_warnings: Vec<String>,
    ) -> Result<ChartResult, ChartError> {
        let utc = resolved.utc;
        let mut warnings = Warnings::default();
        for warning in &self.ephemeris.warnings {
            warnings.push(warning.clone());
        }
        for warning in extra_warnings {
            warnings.push(warning);
        }

        let mut planets = BTreeMap::new();
        for body in Body::ALL {
            let position = self.ephemeris.adapter.position_of(body, utc)?;
            planets.insert(
                ChartPoint::from(body),
                BodyPlacement::from_longitude(position.lon).with_retrograde(position.retrograde),
            );
        }

        let angle_set = solve_angles(utc, site.location);
        let house_set = build_houses(settings.house_system, angle_set.ascendant);
        for warning in &house_set.warnings {
            warnings.push(warning.clone());
        }

        let longitude = |point: ChartPoint| {
            planets
                .get(&point)
                .and_then(|p: &BodyPlacement| p.longitude)
                .unwrap_or_default()
        };
        let derived = estimate(DerivedInputs {
            t: julian_centuries(julian_day(utc)),
            sun: longitude(ChartPoint::Sun),
            moon: longitude(ChartPoint::Moon),
            saturn: longitude(ChartPoint::Saturn),
            ascendant: angle_set.ascendant,
        });
        for warning in &derived.warnings {
            warnings.push(warning.clone());
        }

        for (point, lon) in [
            (ChartPoint::NorthNode, derived.north_node),
            (ChartPoint::SouthNode, derived.south_node),
            (ChartPoint::Lilith, derived.lilith),
            (ChartPoint::Chiron, derived.chiron),
            (ChartPoint::PartOfFortune, derived.part_of_fortune),
            (ChartPoint::Vertex, derived.vertex),
        ] {
            planets.insert(point, BodyPlacement::from_longitude(lon));
        }
        assign_houses(&mut planets, &house_set.cusps);

        let angles = Angles::from_longitudes(angle_set.ascendant, angle_set.midheaven, derived.vertex);
        let aspects = settings
            .aspect_calculator()
            .find_aspects(&aspectable_points(&planets, Some(&angles)));

        Ok(ChartResult {
            input,
            settings: *settings,
            normalized: normalized_time(resolved, &site),
            planets,
            angles: Some(angles),
            houses: Some(house_set.cusps),
            aspects,
            meta: ChartMeta {
                engine: ENGINE_NAME.to_string(),
                ephemeris: self.ephemeris_name().to_string(),
                settings_hash: settings.fingerprint(),
                warnings: warnings.into_vec(),
            },
        })
    }
}

impl Default for ChartComposer {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

/// Set each placement's house from `cusps`.
pub(crate) fn assign_houses(
    planets: &mut BTreeMap<ChartPoint, BodyPlacement>,
    cusps: &[crate::houses::HousePlacement],
) {
    for placement in planets.values_mut() {
        placement.house = placement.longitude.and_then(|lon| house_of(cusps, lon));
    }
}

pub(crate) fn normalized_time(resolved: &ResolvedInstant, site: &Site) -> NormalizedTime {
    NormalizedTime {
        local_date_time: resolved.local,
        utc_date_time: resolved.utc,
        offset_minutes: resolved.offset_minutes(),
        daylight_saving: resolved.daylight_saving,
        timezone: site.timezone.name().to_string(),
        location: site.location,
        julian_day: julian_day(resolved.utc),
    }
}

/// Request record for a chart cast at a computed instant.
fn derived_input(resolved: &ResolvedInstant, site: &Site) -> ChartInput {
    ChartInput {
        date: resolved.local.format("%Y-%m-%d").to_string(),
        time: resolved.local.format("%H:%M:%S").to_string(),
        city: String::new(),
        country: String::new(),
        coordinates: Some(site.coordinates()),
        daylight_saving: DstPreference::Explicit(resolved.daylight_saving),
    }
}

/// Insertion-ordered, duplicate-free warning list.
#[derive(Debug, Default)]
pub(crate) struct Warnings(Vec<String>);

impl Warnings {
    pub(crate) fn push(&mut self, warning: String) {
        if !self.0.contains(&warning) {
            self.0.push(warning);
        }
    }

    pub(crate) fn into_vec(self) -> Vec<String> {
        self.0
    }
}

lazy_static::lazy_static! {
    static ref DATE_PATTERN: Option<Regex> = Regex::new(r"^\d{4}-\d{2}-\d{2}$").ok();
    static ref TIME_PATTERN: Option<Regex> = Regex::new(r"^\d{1,2}:\d{2}(:\d{2})?$").ok();
}

fn shaped_like(pattern: &Option<Regex>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|p| p.is_match(value))
}

pub fn parse_date(value: &str) -> Result<NaiveDate, ChartError> {
    let value = value.trim();
    if !shaped_like(&DATE_PATTERN, value) {
        return Err(ChartError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ChartError::InvalidDate(value.to_string()))
}

pub fn parse_time(value: &str) -> Result<NaiveTime, ChartError> {
    let value = value.trim();
    if !shaped_like(&TIME_PATTERN, value) {
        return Err(ChartError::InvalidTime(value.to_string()));
    }
    let format = if value.len() > 5 { "%H:%M:%S" } else { "%H:%M" };
    NaiveTime::parse_from_str(value, format).map_err(|_| ChartError::InvalidTime(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TemporalError;
    use crate::houses::HouseSystem;

    fn input(date: &str, time: &str) -> ChartInput {
        ChartInput {
            date: date.to_string(),
            time: time.to_string(),
            city: "New York".to_string(),
            country: "US".to_string(),
            coordinates: None,
            daylight_saving: DstPreference::Auto,
        }
    }

    #[test]
    fn test_parse_date_and_time() {
        assert_eq!(parse_date("2024-01-15").unwrap(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert!(matches!(parse_date("2024-02-30"), Err(ChartError::InvalidDate(_))));
        assert!(matches!(parse_date("15/01/2024"), Err(ChartError::InvalidDate(_))));
        assert_eq!(parse_time("9:05").unwrap(), NaiveTime::from_hms_opt(9, 5, 0).unwrap());
        assert_eq!(parse_time("23:59:30").unwrap(), NaiveTime::from_hms_opt(23, 59, 30).unwrap());
        assert!(matches!(parse_time("24:00"), Err(ChartError::InvalidTime(_))));
        assert!(matches!(parse_time("noon"), Err(ChartError::InvalidTime(_))));
    }

    #[test]
    fn test_date_and_time_patterns_are_shared() {
        assert!(DATE_PATTERN.is_some());
        assert!(TIME_PATTERN.is_some());
        for _ in 0..3 {
            assert_eq!(parse_date(" 1990-12-16 ").unwrap(), NaiveDate::from_ymd_opt(1990, 12, 16).unwrap());
            assert_eq!(parse_time(" 07:30 ").unwrap(), NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        }
        assert!(matches!(parse_date("1990-12-16T00:00"), Err(ChartError::InvalidDate(_))));
        assert!(matches!(parse_time("7:30pm"), Err(ChartError::InvalidTime(_))));
    }

    #[test]
    fn test_city_not_found() {
        let composer = ChartComposer::default();
        let mut request = input("2024-01-15", "12:00");
        request.city = "Atlantis".to_string();
        let err = composer.generate_chart(&request, &ChartSettings::default()).unwrap_err();
        assert!(matches!(err, ChartError::CityNotFound { .. }));
    }

    #[test]
    fn test_explicit_coordinates_validated() {
        let composer = ChartComposer::default();
        let mut request = input("2024-01-15", "12:00");
        request.coordinates = Some(Coordinates {
            lat: 95.0,
            lon: 0.0,
            timezone: "UTC".to_string(),
        });
        assert!(matches!(
            composer.generate_chart(&request, &ChartSettings::default()),
            Err(ChartError::InvalidLocation { .. })
        ));

        request.coordinates = Some(Coordinates {
            lat: 10.0,
            lon: 0.0,
            timezone: "Mars/Olympus_Mons".to_string(),
        });
        assert!(matches!(
            composer.generate_chart(&request, &ChartSettings::default()),
            Err(ChartError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn test_temporal_errors_propagate() {
        let composer = ChartComposer::default();
        let err = composer
            .generate_chart(&input("2024-03-10", "02:30"), &ChartSettings::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ChartError::Temporal(TemporalError::NonexistentLocalTime { .. })
        ));
    }

    #[test]
    fn test_chart_shape() {
        let composer = ChartComposer::default();
        let settings = ChartSettings {
            house_system: HouseSystem::Placidus,
            ..ChartSettings::default()
        };
        let chart = composer.generate_chart(&input("2024-01-15", "12:00"), &settings).unwrap();

        assert_eq!(chart.planets.len(), ChartPoint::ALL.len());
        assert_eq!(chart.houses.as_ref().map(Vec::len), Some(12));
        assert!(chart.planets.values().all(|p| p.house.is_some()));
        assert_eq!(chart.meta.engine, ENGINE_NAME);
        assert_eq!(chart.meta.ephemeris, "analytic");
        assert!(chart.meta.warnings.iter().any(|w| w.contains("Placidus")));
        for window in chart.aspects.windows(2) {
            assert!(window[0].orb <= window[1].orb);
        }
    }

    #[test]
    fn test_chart_at_instant_localizes() {
        let composer = ChartComposer::default();
        let site = Site::from_coordinates(&Coordinates {
            lat: 40.7128,
            lon: -74.006,
            timezone: "America/New_York".to_string(),
        })
        .unwrap();
        let utc = chrono::TimeZone::with_ymd_and_hms(&Utc, 2024, 7, 1, 16, 0, 0).unwrap();
        let chart = composer
            .chart_at_instant(utc, site, &ChartSettings::default(), vec!["note".to_string()])
            .unwrap();
        assert_eq!(chart.input.date, "2024-07-01");
        assert_eq!(chart.input.time, "12:00:00");
        assert_eq!(chart.normalized.offset_minutes, 240);
        assert!(chart.meta.warnings.contains(&"note".to_string()));
    }
}
