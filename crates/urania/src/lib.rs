//! Astrological chart engine.
//!
//! [`ChartComposer::generate_chart`] turns a local date, time and place into a
//! [`ChartResult`]. Composites, synastry, transits, progressions, returns,
//! profections, Saturn returns and astrocartography build on those results.

pub mod angles;
pub mod aspects;
pub mod astrocartography;
pub mod chart;
pub mod composite;
pub mod derived;
pub mod ephemeris;
pub mod error;
pub mod houses;
pub mod synastry;
pub mod temporal;
pub mod time;
pub mod western;
pub mod zodiac;

pub use aspects::{Aspect, AspectCalculator, AspectProfile, AspectType, OrbMode};
pub use astrocartography::{generate_astrocartography, AngleLine, AstroLine, AstrocartographyResult};
pub use chart::{
    ChartComposer, ChartInput, ChartPoint, ChartResult, ChartSettings, Coordinates, EngineOptions,
};
pub use composite::{circular_midpoint, generate_composite, CompositeMethod};
pub use ephemeris::{Body, EphemerisAdapter, EphemerisOptions, EphemerisRegistry};
pub use error::{ChartError, TemporalError};
pub use houses::{HousePlacement, HouseSystem};
pub use synastry::{generate_synastry, SynastryResult};
pub use temporal::{
    annual_profection, annual_profection_with, generate_progression, generate_transits,
    lunar_return, saturn_return, solar_return, TransitRange,
};
pub use time::DstPreference;
pub use zodiac::{format_longitude, ZodiacSign};
