use urania::chart::{ChartComposer, ChartInput, ChartPoint, ChartSettings, Coordinates};
use urania::houses::HouseSystem;
use urania::zodiac::normalize_degrees;
use urania::{AspectProfile, ChartError, DstPreference, OrbMode, TemporalError};

fn new_york(date: &str, time: &str, dst: DstPreference) -> ChartInput {
    ChartInput {
        date: date.to_string(),
        time: time.to_string(),
        city: "New York".to_string(),
        country: "United States".to_string(),
        coordinates: Some(Coordinates {
            lat: 40.7128,
            lon: -74.006,
            timezone: "America/New_York".to_string(),
        }),
        daylight_saving: dst,
    }
}

#[test]
fn test_new_york_winter_and_summer() {
    let composer = ChartComposer::default();
    let settings = ChartSettings::default();

    let winter = composer
        .generate_chart(&new_york("2024-01-15", "12:00", DstPreference::Auto), &settings)
        .unwrap();
    assert_eq!(winter.normalized.offset_minutes, 300);
    assert!(!winter.normalized.daylight_saving);
    let json = serde_json::to_value(&winter).unwrap();
    assert_eq!(json["normalized"]["utcDateTime"], "2024-01-15T17:00:00Z");
    assert_eq!(json["normalized"]["offsetMinutes"], 300);
    assert_eq!(json["normalized"]["daylightSaving"], false);

    let summer = composer
        .generate_chart(&new_york("2024-07-01", "12:00", DstPreference::Auto), &settings)
        .unwrap();
    assert_eq!(summer.normalized.offset_minutes, 240);
    assert!(summer.normalized.daylight_saving);
    let json = serde_json::to_value(&summer).unwrap();
    assert_eq!(json["normalized"]["utcDateTime"], "2024-07-01T16:00:00Z");
}

#[test]
fn test_gazetteer_lookup_matches_explicit_coordinates() {
    let composer = ChartComposer::default();
    let settings = ChartSettings::default();
    let explicit = composer
        .generate_chart(&new_york("2024-01-15", "12:00", DstPreference::Auto), &settings)
        .unwrap();

    let mut by_city = new_york("2024-01-15", "12:00", DstPreference::Auto);
    by_city.coordinates = None;
    let looked_up = composer.generate_chart(&by_city, &settings).unwrap();

    assert_eq!(looked_up.normalized.utc_date_time, explicit.normalized.utc_date_time);
    assert_eq!(looked_up.planets, explicit.planets);
}

#[test]
fn test_spring_forward_gap_is_rejected() {
    let composer = ChartComposer::default();
    let err = composer
        .generate_chart(&new_york("2024-03-10", "02:30", DstPreference::Auto), &ChartSettings::default())
        .unwrap_err();
    assert!(matches!(
        err,
        ChartError::Temporal(TemporalError::NonexistentLocalTime { .. })
    ));
}

#[test]
fn test_fall_back_overlap_requires_explicit_choice() {
    let composer = ChartComposer::default();
    let settings = ChartSettings::default();

    let err = composer
        .generate_chart(&new_york("2024-11-03", "01:30", DstPreference::Auto), &settings)
        .unwrap_err();
    assert!(matches!(
        err,
        ChartError::Temporal(TemporalError::AmbiguousLocalTime { .. })
    ));

    let dst = composer
        .generate_chart(&new_york("2024-11-03", "01:30", DstPreference::Explicit(true)), &settings)
        .unwrap();
    let standard = composer
        .generate_chart(&new_york("2024-11-03", "01:30", DstPreference::Explicit(false)), &settings)
        .unwrap();
    assert!(dst.normalized.daylight_saving);
    assert!(!standard.normalized.daylight_saving);
    assert_eq!(
        standard.normalized.utc_date_time - dst.normalized.utc_date_time,
        chrono::Duration::hours(1)
    );
}

#[test]
fn test_generation_is_idempotent() {
    let composer = ChartComposer::default();
    let settings = ChartSettings {
        aspect_profile: AspectProfile::Expanded,
        include_minor_aspects: true,
        ..ChartSettings::default()
    };
    let input = new_york("1990-12-16", "08:45", DstPreference::Auto);

    let first = composer.generate_chart(&input, &settings).unwrap();
    let second = composer.generate_chart(&input, &settings).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );

    // a fresh composer has an empty offset cache
    let third = ChartComposer::default().generate_chart(&input, &settings).unwrap();
    assert_eq!(first, third);
}

#[test]
fn test_settings_hash_tracks_settings() {
    let composer = ChartComposer::default();
    let input = new_york("2024-01-15", "12:00", DstPreference::Auto);
    let standard = composer.generate_chart(&input, &ChartSettings::default()).unwrap();
    let wide = composer
        .generate_chart(
            &input,
            &ChartSettings {
                orb_mode: OrbMode::Wide,
                ..ChartSettings::default()
            },
        )
        .unwrap();
    let again = composer.generate_chart(&input, &ChartSettings::default()).unwrap();

    assert_ne!(standard.meta.settings_hash, wide.meta.settings_hash);
    assert_eq!(standard.meta.settings_hash, again.meta.settings_hash);
    assert!(wide.aspects.len() >= standard.aspects.len());
}

#[test]
fn test_house_cusps_thirty_degrees_apart() {
    let composer = ChartComposer::default();
    let input = new_york("2024-01-15", "12:00", DstPreference::Auto);

    for system in [HouseSystem::Equal, HouseSystem::WholeSign] {
        let chart = composer
            .generate_chart(
                &input,
                &ChartSettings {
                    house_system: system,
                    ..ChartSettings::default()
                },
            )
            .unwrap();
        let houses = chart.houses.as_ref().unwrap();
        let ascendant = chart.ascendant().unwrap();

        for i in 0..11 {
            let step = normalize_degrees(houses[i + 1].longitude - houses[i].longitude);
            assert!((step - 30.0).abs() < 1e-9);
        }
        match system {
            HouseSystem::Equal => assert_eq!(houses[0].longitude, ascendant),
            _ => assert_eq!(houses[0].longitude, (ascendant / 30.0).floor() * 30.0),
        }
    }
}

#[test]
fn test_aspects_respect_orb_limits() {
    let composer = ChartComposer::default();
    for orb_mode in [OrbMode::Tight, OrbMode::Standard, OrbMode::Wide] {
        let settings = ChartSettings {
            orb_mode,
            aspect_profile: AspectProfile::Expanded,
            include_minor_aspects: true,
            ..ChartSettings::default()
        };
        let chart = composer
            .generate_chart(&new_york("1985-06-21", "06:10", DstPreference::Auto), &settings)
            .unwrap();
        let catalogue = settings.catalogue();

        for aspect in &chart.aspects {
            let limit = catalogue.max_orb_of(aspect.aspect_type).unwrap() * orb_mode.multiplier();
            assert!(aspect.orb >= 0.0 && aspect.orb <= limit, "{aspect:?}");
            assert!((aspect.orb - (aspect.separation - aspect.exact_angle).abs()).abs() < 1e-12);
            assert_ne!(aspect.point_a, aspect.point_b);
            assert_ne!(aspect.point_a, "south_node");
            assert_ne!(aspect.point_b, "part_of_fortune");
        }
        for window in chart.aspects.windows(2) {
            assert!(window[0].orb <= window[1].orb);
        }
    }
}

#[test]
fn test_derived_points_and_warnings() {
    let composer = ChartComposer::default();
    let chart = composer
        .generate_chart(&new_york("2024-01-15", "12:00", DstPreference::Auto), &ChartSettings::default())
        .unwrap();

    let sun = chart.longitude_of(ChartPoint::Sun).unwrap();
    let moon = chart.longitude_of(ChartPoint::Moon).unwrap();
    let asc = chart.ascendant().unwrap();
    let fortune = chart.longitude_of(ChartPoint::PartOfFortune).unwrap();
    assert!((fortune - normalize_degrees(asc + moon - sun)).abs() < 1e-9);

    let north = chart.longitude_of(ChartPoint::NorthNode).unwrap();
    let south = chart.longitude_of(ChartPoint::SouthNode).unwrap();
    assert!((normalize_degrees(south - north) - 180.0).abs() < 1e-9);

    let angles = chart.angles.as_ref().unwrap();
    assert_eq!(angles.vertex.longitude, chart.longitude_of(ChartPoint::Vertex));
    for needle in ["mean lunar node", "Lilith", "Chiron", "Vertex"] {
        assert!(
            chart.meta.warnings.iter().any(|w| w.contains(needle)),
            "missing warning for {needle}"
        );
    }
}

#[test]
fn test_placements_consistent_with_longitude() {
    let composer = ChartComposer::default();
    let chart = composer
        .generate_chart(&new_york("2001-09-09", "23:59:59", DstPreference::Auto), &ChartSettings::default())
        .unwrap();
    for placement in chart.planets.values() {
        let lon = placement.longitude.unwrap();
        assert!((0.0..360.0).contains(&lon));
        assert!((0.0..30.0).contains(&placement.degree));
        assert_eq!(placement.sign.index(), (lon / 30.0).floor() as usize);
    }
}

#[test]
fn test_chart_survives_json_round_trip() {
    let composer = ChartComposer::default();
    let settings = ChartSettings {
        aspect_profile: AspectProfile::Expanded,
        include_minor_aspects: true,
        ..ChartSettings::default()
    };

    for year in (1950..2030).step_by(3) {
        for (date, time) in [("01-15", "12:00"), ("04-20", "06:30"), ("07-04", "18:45"), ("10-31", "23:59")] {
            let input = new_york(&format!("{year}-{date}"), time, DstPreference::Auto);
            let chart = composer.generate_chart(&input, &settings).unwrap();
            let text = serde_json::to_string(&chart).unwrap();
            let back: urania::ChartResult = serde_json::from_str(&text).unwrap();
            assert_eq!(back, chart, "{year}-{date} {time}");
        }
    }
}

#[test]
fn test_malformed_input_rejected_before_computation() {
    let composer = ChartComposer::default();
    let mut input = new_york("2024-13-01", "12:00", DstPreference::Auto);
    assert!(matches!(
        composer.generate_chart(&input, &ChartSettings::default()),
        Err(ChartError::InvalidDate(_))
    ));
    input.date = "2024-01-15".to_string();
    input.time = "12h00".to_string();
    assert!(matches!(
        composer.generate_chart(&input, &ChartSettings::default()),
        Err(ChartError::InvalidTime(_))
    ));
}
