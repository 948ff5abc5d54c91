use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use urania::aspects::{AspectProfile, OrbMode};
use urania::chart::{ChartInput, ChartSettings, Coordinates};
use urania::{CompositeMethod, DstPreference, HouseSystem};

#[derive(Parser, Debug)]
#[command(author, version, about = "Cast astrological charts and print them as JSON")]
pub(crate) struct Cli {
    /// Config file (otherwise $URANIA_CONFIG or configs/urania.toml, if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Natal chart.
    Chart {
        #[command(flatten)]
        birth: BirthArgs,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Composite of two charts given as ChartInput JSON files.
    Composite {
        first: PathBuf,
        second: PathBuf,
        #[arg(long, default_value = "midpoint")]
        method: CompositeMethod,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Cross-chart aspects of two charts given as ChartInput JSON files.
    Synastry {
        first: PathBuf,
        second: PathBuf,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Daily transits to the natal chart, `from` to `to` inclusive.
    Transits {
        #[command(flatten)]
        birth: BirthArgs,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Secondary progression to a target date.
    Progression {
        #[command(flatten)]
        birth: BirthArgs,
        #[arg(long)]
        target: NaiveDate,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Solar return for a year.
    SolarReturn {
        #[command(flatten)]
        birth: BirthArgs,
        #[arg(long)]
        year: i32,
        #[command(flatten)]
        location: RelocationArgs,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Lunar return within a calendar month.
    LunarReturn {
        #[command(flatten)]
        birth: BirthArgs,
        #[arg(long)]
        year: i32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        #[command(flatten)]
        location: RelocationArgs,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// Annual profection on a date.
    Profection {
        #[command(flatten)]
        birth: BirthArgs,
        #[arg(long)]
        on: NaiveDate,
        /// Outer-planet rulers for Scorpio, Aquarius and Pisces.
        #[arg(long)]
        modern_rulers: bool,
    },
    /// Saturn return passes between ages 27 and 32.
    SaturnReturn {
        #[command(flatten)]
        birth: BirthArgs,
    },
    /// Angular lines for every chart point.
    Astrocartography {
        #[command(flatten)]
        birth: BirthArgs,
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

/// Birth data. Coordinates need all of --lat, --lon and --tz.
#[derive(Args, Debug, Clone)]
pub(crate) struct BirthArgs {
    /// YYYY-MM-DD
    #[arg(long)]
    pub date: String,
    /// HH:MM or HH:MM:SS, local clock
    #[arg(long)]
    pub time: String,
    #[arg(long, default_value = "")]
    pub city: String,
    #[arg(long, default_value = "")]
    pub country: String,
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,
    /// IANA zone, e.g. America/New_York
    #[arg(long)]
    pub tz: Option<String>,
    /// auto, true (daylight time) or false (standard time)
    #[arg(long, default_value = "auto")]
    pub dst: DstPreference,
}

impl BirthArgs {
    pub fn to_input(&self) -> anyhow::Result<ChartInput> {
        let coordinates = coordinates(self.lat, self.lon, self.tz.as_deref())?;
        if coordinates.is_none() && self.city.is_empty() {
            anyhow::bail!("Either --city/--country or --lat/--lon/--tz is required");
        }
        Ok(ChartInput {
            date: self.date.clone(),
            time: self.time.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            coordinates,
            daylight_saving: self.dst,
        })
    }
}

/// Optional place to cast a return chart for instead of the birthplace.
#[derive(Args, Debug, Clone)]
pub(crate) struct RelocationArgs {
    #[arg(id = "at_lat", long = "at-lat", allow_hyphen_values = true)]
    pub lat: Option<f64>,
    #[arg(id = "at_lon", long = "at-lon", allow_hyphen_values = true)]
    pub lon: Option<f64>,
    #[arg(id = "at_tz", long = "at-tz")]
    pub tz: Option<String>,
}

impl RelocationArgs {
    pub fn coordinates(&self) -> anyhow::Result<Option<Coordinates>> {
        coordinates(self.lat, self.lon, self.tz.as_deref())
    }
}

fn coordinates(lat: Option<f64>, lon: Option<f64>, tz: Option<&str>) -> anyhow::Result<Option<Coordinates>> {
    match (lat, lon, tz) {
        (Some(lat), Some(lon), Some(tz)) => Ok(Some(Coordinates {
            lat,
            lon,
            timezone: tz.to_string(),
        })),
        (None, None, None) => Ok(None),
        _ => anyhow::bail!("Latitude, longitude and timezone must be given together"),
    }
}

/// Per-command overrides of the configured chart settings.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct SettingsArgs {
    /// placidus, koch, whole_sign or equal
    #[arg(long)]
    pub house_system: Option<HouseSystem>,
    /// major or expanded
    #[arg(long, value_parser = parse_aspect_profile)]
    pub aspect_profile: Option<AspectProfile>,
    /// tight, standard or wide
    #[arg(long, value_parser = parse_orb_mode)]
    pub orb_mode: Option<OrbMode>,
    /// Include minor aspects in the expanded profile.
    #[arg(long)]
    pub minor_aspects: bool,
}

impl SettingsArgs {
    pub fn apply(&self, defaults: ChartSettings) -> ChartSettings {
        ChartSettings {
            house_system: self.house_system.unwrap_or(defaults.house_system),
            aspect_profile: self.aspect_profile.unwrap_or(defaults.aspect_profile),
            orb_mode: self.orb_mode.unwrap_or(defaults.orb_mode),
            include_minor_aspects: self.minor_aspects || defaults.include_minor_aspects,
        }
    }
}

fn parse_aspect_profile(s: &str) -> Result<AspectProfile, String> {
    match s.trim().to_lowercase().as_str() {
        "major" => Ok(AspectProfile::Major),
        "expanded" => Ok(AspectProfile::Expanded),
        other => Err(format!("Unknown aspect profile: {other}")),
    }
}

fn parse_orb_mode(s: &str) -> Result<OrbMode, String> {
    match s.trim().to_lowercase().as_str() {
        "tight" => Ok(OrbMode::Tight),
        "standard" => Ok(OrbMode::Standard),
        "wide" => Ok(OrbMode::Wide),
        other => Err(format!("Unknown orb mode: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_command() {
        let cli = Cli::try_parse_from([
            "urania", "chart", "--date", "2024-01-15", "--time", "12:00", "--lat", "40.7128", "--lon",
            "-74.006", "--tz", "America/New_York", "--house-system", "equal", "--orb-mode", "wide",
        ])
        .unwrap();

        let Command::Chart { birth, settings } = cli.command else {
            panic!("expected chart command");
        };
        let input = birth.to_input().unwrap();
        assert_eq!(input.coordinates.unwrap().lon, -74.006);
        assert_eq!(input.daylight_saving, DstPreference::Auto);

        let settings = settings.apply(ChartSettings::default());
        assert_eq!(settings.house_system, HouseSystem::Equal);
        assert_eq!(settings.orb_mode, OrbMode::Wide);
        assert_eq!(settings.aspect_profile, AspectProfile::Major);
    }

    #[test]
    fn test_partial_coordinates_rejected() {
        let cli = Cli::try_parse_from([
            "urania", "chart", "--date", "2024-01-15", "--time", "12:00", "--lat", "40.7",
        ])
        .unwrap();
        let Command::Chart { birth, .. } = cli.command else {
            panic!("expected chart command");
        };
        assert!(birth.to_input().is_err());
    }

    #[test]
    fn test_dst_and_month_validation() {
        assert!(Cli::try_parse_from([
            "urania", "chart", "--date", "2024-11-03", "--time", "01:30", "--city", "New York",
            "--country", "US", "--dst", "maybe",
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "urania", "lunar-return", "--date", "1990-12-16", "--time", "12:00", "--city", "London",
            "--country", "GB", "--year", "2024", "--month", "13",
        ])
        .is_err());
    }

    #[test]
    fn test_profection_modern_flag() {
        let cli = Cli::try_parse_from([
            "urania", "profection", "--date", "1990-12-16", "--time", "12:00", "--city", "New York",
            "--country", "US", "--on", "2026-12-15", "--modern-rulers",
        ])
        .unwrap();
        let Command::Profection { on, modern_rulers, .. } = cli.command else {
            panic!("expected profection command");
        };
        assert!(modern_rulers);
        assert_eq!(on.to_string(), "2026-12-15");
    }

    #[test]
    fn test_settings_fall_back_to_config() {
        let configured = ChartSettings {
            house_system: HouseSystem::Equal,
            include_minor_aspects: true,
            ..ChartSettings::default()
        };
        assert_eq!(SettingsArgs::default().apply(configured), configured);
    }
}
