use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use urania::chart::{ChartComposer, ChartInput, ChartPoint, ChartSettings, Coordinates, EngineOptions};
use urania::ephemeris::{AnalyticEphemeris, EphemerisError};
use urania::{Body, DstPreference, EphemerisAdapter, EphemerisOptions, EphemerisRegistry};

/// Every body sits at a fixed longitude that creeps forward one degree a day.
struct FixedEphemeris;

impl EphemerisAdapter for FixedEphemeris {
    fn name(&self) -> &str {
        "fixed"
    }

    fn longitude_of(&self, body: Body, instant: DateTime<Utc>) -> Result<f64, EphemerisError> {
        if body == Body::Pluto {
            return Err(EphemerisError::UnsupportedBody {
                body: body.id().to_string(),
                backend: self.name().to_string(),
            });
        }
        let index = Body::ALL.iter().position(|b| *b == body).unwrap_or(0) as f64;
        let days = instant.timestamp() as f64 / 86_400.0;
        Ok((index * 30.0 + days).rem_euclid(360.0))
    }

    fn approximations(&self) -> Vec<String> {
        vec!["fixed test positions".to_string()]
    }
}

fn input() -> ChartInput {
    ChartInput {
        date: "2024-01-15".to_string(),
        time: "12:00".to_string(),
        city: "London".to_string(),
        country: "GB".to_string(),
        coordinates: None,
        daylight_saving: DstPreference::Auto,
    }
}

#[test]
fn test_analytic_longitudes_in_range() {
    let ephemeris = AnalyticEphemeris::new();
    let instant = Utc.with_ymd_and_hms(1999, 8, 11, 11, 0, 0).unwrap();
    for body in Body::ALL {
        let lon = ephemeris.longitude_of(body, instant).unwrap();
        assert!((0.0..360.0).contains(&lon), "{body:?} at {lon}");
    }
}

#[test]
fn test_sun_near_equinox() {
    let ephemeris = AnalyticEphemeris::new();
    let equinox = Utc.with_ymd_and_hms(2024, 3, 20, 3, 6, 0).unwrap();
    let lon = ephemeris.longitude_of(Body::Sun, equinox).unwrap();
    assert!(lon < 0.1 || lon > 359.9, "sun at {lon}");
}

#[test]
fn test_registry_falls_back_to_analytic() {
    let registry = EphemerisRegistry::new();
    assert!(registry.names().contains(&"analytic"));

    let selected = registry.select("analytic");
    assert_eq!(selected.adapter.name(), "analytic");

    let fallback = registry.select("jpl-de441");
    assert_eq!(fallback.adapter.name(), "analytic");
    assert!(fallback.warnings[0].contains("jpl-de441"));
}

#[cfg(not(feature = "swisseph"))]
#[test]
fn test_swiss_request_without_feature_warns_in_chart() {
    let composer = ChartComposer::new(EngineOptions {
        ephemeris: EphemerisOptions {
            backend: "swiss".to_string(),
            swiss_ephemeris_path: None,
        },
        cities: Vec::new(),
    });
    assert_eq!(composer.ephemeris_name(), "analytic");

    let chart = composer.generate_chart(&input(), &ChartSettings::default()).unwrap();
    assert_eq!(chart.meta.ephemeris, "analytic");
    assert!(chart.meta.warnings[0].contains("Swiss Ephemeris unavailable"));
}

#[test]
fn test_custom_adapter_feeds_chart() {
    struct NoPluto;
    impl EphemerisAdapter for NoPluto {
        fn name(&self) -> &str {
            "no-pluto"
        }
        fn longitude_of(&self, body: Body, instant: DateTime<Utc>) -> Result<f64, EphemerisError> {
            FixedEphemeris.longitude_of(body, instant)
        }
    }

    let composer = ChartComposer::with_adapter(Arc::new(NoPluto));
    let err = composer.generate_chart(&input(), &ChartSettings::default()).unwrap_err();
    assert!(err.to_string().contains("pluto"));
}

#[test]
fn test_adapter_approximations_become_warnings() {
    struct AllBodies;
    impl EphemerisAdapter for AllBodies {
        fn name(&self) -> &str {
            "fixed"
        }
        fn longitude_of(&self, body: Body, instant: DateTime<Utc>) -> Result<f64, EphemerisError> {
            let body = if body == Body::Pluto { Body::Neptune } else { body };
            FixedEphemeris.longitude_of(body, instant)
        }
        fn approximations(&self) -> Vec<String> {
            FixedEphemeris.approximations()
        }
    }

    let composer = ChartComposer::with_adapter(Arc::new(AllBodies));
    let chart = composer.generate_chart(&input(), &ChartSettings::default()).unwrap();
    assert_eq!(chart.meta.ephemeris, "fixed");
    assert_eq!(chart.meta.warnings[0], "fixed test positions");

    let sun = chart.planets[&ChartPoint::Sun].clone();
    let moon = chart.planets[&ChartPoint::Moon].clone();
    assert!(!sun.retrograde);
    let gap = (moon.longitude.unwrap() - sun.longitude.unwrap()).rem_euclid(360.0);
    assert!((gap - 30.0).abs() < 1e-6);
}

#[test]
fn test_explicit_coordinates_override_gazetteer() {
    let composer = ChartComposer::default();
    let mut request = input();
    request.city = "Nowhere".to_string();
    request.coordinates = Some(Coordinates {
        lat: -33.8688,
        lon: 151.2093,
        timezone: "Australia/Sydney".to_string(),
    });
    let chart = composer.generate_chart(&request, &ChartSettings::default()).unwrap();
    assert_eq!(chart.normalized.timezone, "Australia/Sydney");
    // Sydney is east of UTC, so the offset west of UTC is negative
    assert_eq!(chart.normalized.offset_minutes, -660);
}
