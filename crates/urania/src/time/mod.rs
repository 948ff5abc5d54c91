pub mod julian;
pub mod resolver;

pub use julian::{
    greenwich_sidereal_time_deg, instant_from_julian_day, julian_centuries, julian_day,
    local_sidereal_time_deg, mean_obliquity_deg, J2000_JD,
};
pub use resolver::{parse_timezone, DstPreference, OffsetProfile, ResolvedInstant, TimeResolver};
