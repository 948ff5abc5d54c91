//! House cusps.

use crate::zodiac::{degree_in_sign, normalize_degrees, ZodiacSign};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    Placidus,
    Koch,
    #[default]
    WholeSign,
    Equal,
}

impl HouseSystem {
    pub fn name(self) -> &'static str {
        match self {
            HouseSystem::Placidus => "Placidus",
            HouseSystem::Koch => "Koch",
            HouseSystem::WholeSign => "Whole Sign",
            HouseSystem::Equal => "Equal",
        }
    }
}

impl fmt::Display for HouseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for HouseSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "placidus" => Ok(HouseSystem::Placidus),
            "koch" => Ok(HouseSystem::Koch),
            "whole_sign" | "wholesign" => Ok(HouseSystem::WholeSign),
            "equal" => Ok(HouseSystem::Equal),
            other => Err(format!("Unknown house system: {other}")),
        }
    }
}

pub const HOUSE_FALLBACK_SUFFIX: &str = "houses are not supported; Equal houses used instead";

/// One house cusp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HousePlacement {
    pub house: u8,
    pub sign: ZodiacSign,
    pub degree: f64,
    pub longitude: f64,
    /// System the cusps were actually built with
    pub system: HouseSystem,
}

/// Twelve cusps plus any fidelity warning.
#[derive(Debug, Clone, PartialEq)]
pub struct HouseSet {
    pub cusps: Vec<HousePlacement>,
    pub warnings: Vec<String>,
}

/// Build the cusps for `system` from the Ascendant.
///
/// Placidus and Koch are built as Equal houses and say so in `warnings`.
pub fn build_houses(system: HouseSystem, ascendant: f64) -> HouseSet {
    let mut warnings = Vec::new();
    let (effective, first_cusp) = match system {
        HouseSystem::Equal => (HouseSystem::Equal, normalize_degrees(ascendant)),
        HouseSystem::WholeSign => (
            HouseSystem::WholeSign,
            (normalize_degrees(ascendant) / 30.0).floor() * 30.0,
        ),
        HouseSystem::Placidus | HouseSystem::Koch => {
            let warning = format!("{} {}", system.name(), HOUSE_FALLBACK_SUFFIX);
            log::warn!("{}", warning);
            warnings.push(warning);
            (HouseSystem::Equal, normalize_degrees(ascendant))
        }
    };

    let cusps = (0..12u8)
        .map(|i| {
            let longitude = normalize_degrees(first_cusp + f64::from(i) * 30.0);
            HousePlacement {
                house: i + 1,
                sign: ZodiacSign::from_longitude(longitude),
                degree: degree_in_sign(longitude),
                longitude,
                system: effective,
            }
        })
        .collect();

    HouseSet { cusps, warnings }
}

/// House (1-12) containing `longitude`, given 12 ordered cusps.
pub fn house_of(cusps: &[HousePlacement], longitude: f64) -> Option<u8> {
    if cusps.len() != 12 {
        return None;
    }
    let lon = normalize_degrees(longitude);
    cusps.iter().enumerate().find_map(|(i, cusp)| {
        let next = &cusps[(i + 1) % 12];
        let span = normalize_degrees(next.longitude - cusp.longitude);
        let offset = normalize_degrees(lon - cusp.longitude);
        (offset < span).then_some(cusp.house)
    })
}
