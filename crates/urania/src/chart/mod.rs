pub mod composer;
pub mod gazetteer;
pub mod settings;
pub mod types;

pub use composer::{parse_date, parse_time, ChartComposer, EngineOptions, Site, ENGINE_NAME};
pub use gazetteer::{City, Gazetteer};
pub use settings::ChartSettings;
pub use types::{
    aspectable_points, Angles, BodyPlacement, ChartInput, ChartMeta, ChartPoint, ChartResult,
    Coordinates, NormalizedTime, ASCENDANT_LABEL, MIDHEAVEN_LABEL,
};
