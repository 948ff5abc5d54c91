use crate::ephemeris::analytic::AnalyticEphemeris;
use crate::ephemeris::types::{Body, PlanetPosition};
use crate::zodiac::{normalize_degrees, signed_degrees};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during ephemeris calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("Ephemeris backend '{backend}' is unavailable: {message}")]
    Unavailable { backend: String, message: String },
    #[error("Body {body} is not supported by the '{backend}' ephemeris")]
    UnsupportedBody { body: String, backend: String },
    #[error("Failed to calculate position for {body} at {datetime}: {message}")]
    CalculationFailed {
        body: String,
        datetime: DateTime<Utc>,
        message: String,
    },
}

/// A source of geocentric tropical ecliptic longitudes.
pub trait EphemerisAdapter: Send + Sync {
    /// Registry name of this backend.
    fn name(&self) -> &str;

    /// Longitude of `body` at `instant`, in degrees [0, 360).
    fn longitude_of(&self, body: Body, instant: DateTime<Utc>) -> Result<f64, EphemerisError>;

    /// Approximations this backend introduces, surfaced as chart warnings.
    fn approximations(&self) -> Vec<String> {
        Vec::new()
    }

    /// Longitude plus daily motion from a symmetric one-day difference.
    fn position_of(&self, body: Body, instant: DateTime<Utc>) -> Result<PlanetPosition, EphemerisError> {
        let lon = self.longitude_of(body, instant)?;
        let before = self.longitude_of(body, instant - Duration::hours(12))?;
        let after = self.longitude_of(body, instant + Duration::hours(12))?;
        let speed_lon = signed_degrees(after - before);

        Ok(PlanetPosition {
            lon: normalize_degrees(lon),
            speed_lon,
            retrograde: speed_lon < 0.0,
        })
    }
}

/// Backend selection handed to the chart composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EphemerisOptions {
    /// Registry name: "analytic" or "swiss"
    pub backend: String,
    /// Swiss Ephemeris data directory
    pub swiss_ephemeris_path: Option<PathBuf>,
}

impl Default for EphemerisOptions {
    fn default() -> Self {
        Self {
            backend: EphemerisRegistry::AUTHORITATIVE.to_string(),
            swiss_ephemeris_path: None,
        }
    }
}

/// An adapter picked from the registry, with any fallback warning.
#[derive(Clone)]
pub struct SelectedEphemeris {
    pub adapter: Arc<dyn EphemerisAdapter>,
    pub warnings: Vec<String>,
}

impl std::fmt::Debug for SelectedEphemeris {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedEphemeris")
            .field("adapter", &self.adapter.name())
            .field("warnings", &self.warnings)
            .finish()
    }
}

/// Named ephemeris backends. The analytic backend is always present and is
/// the authoritative one.
pub struct EphemerisRegistry {
    adapters: BTreeMap<String, Arc<dyn EphemerisAdapter>>,
}

impl EphemerisRegistry {
    pub const AUTHORITATIVE: &'static str = "analytic";
    pub const SWISS: &'static str = "swiss";

    pub fn new() -> Self {
        let mut adapters: BTreeMap<String, Arc<dyn EphemerisAdapter>> = BTreeMap::new();
        adapters.insert(Self::AUTHORITATIVE.to_string(), Arc::new(AnalyticEphemeris::new()));
        Self { adapters }
    }

    /// Registry with every backend the options and build allow.
    pub fn with_options(options: &EphemerisOptions) -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "swisseph")]
        {
            match crate::ephemeris::swiss::SwissEphemerisAdapter::new(options.swiss_ephemeris_path.clone()) {
                Ok(adapter) => registry.register(Arc::new(adapter)),
                Err(e) => log::warn!("Swiss Ephemeris not registered: {}", e),
            }
        }
        #[cfg(not(feature = "swisseph"))]
        {
            if options.backend == Self::SWISS {
                log::warn!("Swiss Ephemeris requested but urania was built without the swisseph feature");
            }
        }

        registry
    }

    pub fn register(&mut self, adapter: Arc<dyn EphemerisAdapter>) {
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    pub fn names(&self) -> Vec<&str> {
        self.adapters.keys().map(|k| k.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn EphemerisAdapter>> {
        self.adapters.get(name).cloned()
    }

    /// Look up `name`, falling back to the authoritative backend with a warning.
    pub fn select(&self, name: &str) -> SelectedEphemeris {
        let name = name.trim().to_lowercase();
        if let Some(adapter) = self.get(&name) {
            let warnings = adapter.approximations();
            return SelectedEphemeris { adapter, warnings };
        }

        let warning = if name == Self::SWISS {
            "Swiss Ephemeris unavailable; positions computed with the analytic ephemeris".to_string()
        } else {
            format!("Unknown ephemeris '{}'; positions computed with the analytic ephemeris", name)
        };
        log::warn!("{}", warning);

        let adapter: Arc<dyn EphemerisAdapter> = match self.get(Self::AUTHORITATIVE) {
            Some(adapter) => adapter,
            None => Arc::new(AnalyticEphemeris::new()),
        };
        let mut warnings = vec![warning];
        warnings.extend(adapter.approximations());
        SelectedEphemeris { adapter, warnings }
    }
}

impl Default for EphemerisRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEphemeris;

    impl EphemerisAdapter for FixedEphemeris {
        fn name(&self) -> &str {
            "fixed"
        }

        fn longitude_of(&self, body: Body, _instant: DateTime<Utc>) -> Result<f64, EphemerisError> {
            Ok(body as usize as f64 * 30.0)
        }

        fn approximations(&self) -> Vec<String> {
            vec!["Fixed test positions".to_string()]
        }
    }

    #[test]
    fn test_registry_has_authoritative_backend() {
        let registry = EphemerisRegistry::new();
        assert_eq!(registry.names(), vec!["analytic"]);
        let selected = registry.select("analytic");
        assert_eq!(selected.adapter.name(), "analytic");
        assert!(selected.warnings.is_empty());
    }

    #[cfg(not(feature = "swisseph"))]
    #[test]
    fn test_swiss_falls_back_with_warning() {
        let registry = EphemerisRegistry::with_options(&EphemerisOptions {
            backend: "swiss".to_string(),
            swiss_ephemeris_path: None,
        });
        let selected = registry.select("swiss");
        assert_eq!(selected.adapter.name(), "analytic");
        assert_eq!(selected.warnings.len(), 1);
        assert!(selected.warnings[0].contains("Swiss Ephemeris unavailable"));
    }

    #[test]
    fn test_registered_alternate_reports_approximations() {
        let mut registry = EphemerisRegistry::new();
        registry.register(Arc::new(FixedEphemeris));
        let selected = registry.select("fixed");
        assert_eq!(selected.adapter.name(), "fixed");
        assert_eq!(selected.warnings, vec!["Fixed test positions".to_string()]);
    }

    #[test]
    fn test_position_of_reports_motion() {
        let adapter = AnalyticEphemeris::new();
        let instant = chrono::TimeZone::with_ymd_and_hms(&Utc, 2024, 1, 15, 12, 0, 0).unwrap();
        let sun = adapter.position_of(Body::Sun, instant).unwrap();
        assert!(sun.speed_lon > 0.9 && sun.speed_lon < 1.1);
        assert!(!sun.retrograde);
    }
}
