pub mod calculator;
pub mod types;

pub use calculator::{angular_separation, AspectCalculator, AspectMatch};
pub use types::{
    Aspect, AspectCatalogue, AspectProfile, AspectType, CatalogueEntry, LabelledLongitude, OrbMode,
};
