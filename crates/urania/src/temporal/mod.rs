//! Time-series techniques over a natal chart.

pub mod profection;
pub mod progression;
pub mod returns;
pub mod saturn;
pub mod transits;

pub use profection::{age_on, annual_profection, annual_profection_with, ProfectionResult};
pub use progression::{generate_progression, ProgressionResult, DAYS_PER_YEAR};
pub use returns::{find_return, find_returns, lunar_return, solar_return, ReturnResult, SearchWindow};
pub use saturn::{group_passes, saturn_return, SaturnReturnDay, SaturnReturnPass, SaturnReturnResult};
pub use transits::{
    generate_transits, TransitDay, TransitHit, TransitRange, TransitRangeResult, EXACT_ORB,
    MAX_RANGE_DAYS, STRONGEST_HITS_PER_DAY,
};
