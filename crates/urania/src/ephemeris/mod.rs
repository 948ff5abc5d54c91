pub mod adapter;
pub mod analytic;
#[cfg(feature = "swisseph")]
pub mod swiss;
pub mod types;

pub use adapter::{
    EphemerisAdapter, EphemerisError, EphemerisOptions, EphemerisRegistry, SelectedEphemeris,
};
pub use analytic::AnalyticEphemeris;
#[cfg(feature = "swisseph")]
pub use swiss::SwissEphemerisAdapter;
pub use types::{Body, GeoLocation, PlanetPosition};
