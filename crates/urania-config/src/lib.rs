use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use urania::aspects::{AspectProfile, OrbMode};
use urania::chart::{City, EngineOptions};
use urania::ephemeris::{EphemerisOptions, EphemerisRegistry};
use urania::{ChartSettings, HouseSystem};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "URANIA_CONFIG";

/// Everything `configs/urania.toml` can set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UraniaConfig {
    pub engine: EngineOptions,
    pub settings: ChartSettings,
}

#[derive(Debug, Clone, Deserialize)]
struct EngineToml {
    #[serde(default = "default_ephemeris")]
    ephemeris: String,
    #[serde(default)]
    swiss_ephemeris_path: Option<PathBuf>,
}

fn default_ephemeris() -> String {
    EphemerisRegistry::AUTHORITATIVE.to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SettingsToml {
    #[serde(default)]
    house_system: HouseSystem,
    #[serde(default)]
    aspect_profile: AspectProfile,
    #[serde(default)]
    orb_mode: OrbMode,
    #[serde(default)]
    include_minor_aspects: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    engine: Option<EngineToml>,
    #[serde(default)]
    settings: Option<SettingsToml>,
    #[serde(default)]
    cities: Vec<City>,
}

/// Try `$URANIA_CONFIG`, then the usual relative paths for `configs/urania.toml`.
pub fn read_config_text() -> anyhow::Result<String> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return fs::read_to_string(&path).with_context(|| format!("Failed to read {CONFIG_ENV}={path}"));
    }
    let paths = ["configs/urania.toml", "../../configs/urania.toml"];
    for p in &paths {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok(c);
        }
    }
    anyhow::bail!("Could not load urania.toml from {:?}", paths);
}

pub fn parse_config(text: &str) -> anyhow::Result<UraniaConfig> {
    let root: RootConfigToml =
        toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse urania.toml: {e}"))?;

    let engine = root.engine.unwrap_or_else(|| EngineToml {
        ephemeris: default_ephemeris(),
        swiss_ephemeris_path: None,
    });
    let settings = root.settings.unwrap_or_default();

    for city in &root.cities {
        if !(-90.0..=90.0).contains(&city.lat) || !(-180.0..=180.0).contains(&city.lon) {
            anyhow::bail!(
                "City {} ({}) has coordinates out of range: {}, {}",
                city.name,
                city.country,
                city.lat,
                city.lon
            );
        }
        if urania::time::parse_timezone(&city.timezone).is_none() {
            anyhow::bail!("City {} ({}) has unknown timezone {:?}", city.name, city.country, city.timezone);
        }
    }

    Ok(UraniaConfig {
        engine: EngineOptions {
            ephemeris: EphemerisOptions {
                backend: engine.ephemeris,
                swiss_ephemeris_path: engine.swiss_ephemeris_path,
            },
            cities: root.cities,
        },
        settings: ChartSettings {
            house_system: settings.house_system,
            aspect_profile: settings.aspect_profile,
            orb_mode: settings.orb_mode,
            include_minor_aspects: settings.include_minor_aspects,
        },
    })
}

/// Config file if one is found, defaults otherwise. Parse errors still fail.
pub fn load_or_default() -> anyhow::Result<UraniaConfig> {
    match read_config_text() {
        Ok(text) => parse_config(&text),
        Err(_) if std::env::var(CONFIG_ENV).is_err() => Ok(UraniaConfig::default()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), UraniaConfig::default());
    }

    #[test]
    fn test_full_config() {
        let text = r#"
[engine]
ephemeris = "swiss"
swiss_ephemeris_path = "/usr/share/sweph"

[settings]
house_system = "equal"
aspect_profile = "expanded"
orb_mode = "wide"
include_minor_aspects = true

[[cities]]
name = "Reykjavik"
country = "Iceland"
country_code = "IS"
lat = 64.1466
lon = -21.9426
timezone = "Atlantic/Reykjavik"
"#;
        let config = parse_config(text).unwrap();
        assert_eq!(config.engine.ephemeris.backend, "swiss");
        assert_eq!(
            config.engine.ephemeris.swiss_ephemeris_path,
            Some(PathBuf::from("/usr/share/sweph"))
        );
        assert_eq!(config.settings.house_system, HouseSystem::Equal);
        assert_eq!(config.settings.aspect_profile, AspectProfile::Expanded);
        assert_eq!(config.settings.orb_mode, OrbMode::Wide);
        assert!(config.settings.include_minor_aspects);
        assert_eq!(config.engine.cities.len(), 1);
        assert_eq!(config.engine.cities[0].country_code, "IS");
    }

    #[test]
    fn test_partial_settings_keep_defaults() {
        let config = parse_config("[settings]\norb_mode = \"tight\"\n").unwrap();
        assert_eq!(config.settings.orb_mode, OrbMode::Tight);
        assert_eq!(config.settings.house_system, HouseSystem::WholeSign);
        assert_eq!(config.engine.ephemeris.backend, "analytic");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse_config("[settings]\nhouse_system = \"campanus\"\n").is_err());

        let bad_city = r#"
[[cities]]
name = "Nowhere"
country = "Atlantis"
lat = 95.0
lon = 0.0
timezone = "UTC"
"#;
        let err = parse_config(bad_city).unwrap_err();
        assert!(err.to_string().contains("Nowhere"));
    }

    #[test]
    fn test_rejects_unknown_city_timezone() {
        let misspelled = r#"
[[cities]]
name = "Croydon"
country = "United Kingdom"
lat = 51.3762
lon = -0.0982
timezone = "Europe/Lonodn"
"#;
        let err = parse_config(misspelled).unwrap_err().to_string();
        assert!(err.contains("Croydon"), "{err}");
        assert!(err.contains("Europe/Lonodn"), "{err}");
    }
}
