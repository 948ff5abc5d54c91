use serde::{Deserialize, Serialize};
use std::fmt;

/// Geometric relationship between two ecliptic longitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectType {
    Conjunction,
    Opposition,
    Trine,
    Square,
    Sextile,
    Quincunx,
    SemiSextile,
    SemiSquare,
    Sesquiquadrate,
    Quintile,
}

impl AspectType {
    /// Exact angle for this aspect, degrees
    pub fn exact_angle(self) -> f64 {
        match self {
            AspectType::Conjunction => 0.0,
            AspectType::Opposition => 180.0,
            AspectType::Trine => 120.0,
            AspectType::Square => 90.0,
            AspectType::Sextile => 60.0,
            AspectType::Quincunx => 150.0,
            AspectType::SemiSextile => 30.0,
            AspectType::SemiSquare => 45.0,
            AspectType::Sesquiquadrate => 135.0,
            AspectType::Quintile => 72.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AspectType::Conjunction => "conjunction",
            AspectType::Opposition => "opposition",
            AspectType::Trine => "trine",
            AspectType::Square => "square",
            AspectType::Sextile => "sextile",
            AspectType::Quincunx => "quincunx",
            AspectType::SemiSextile => "semi_sextile",
            AspectType::SemiSquare => "semi_square",
            AspectType::Sesquiquadrate => "sesquiquadrate",
            AspectType::Quintile => "quintile",
        }
    }

    pub fn is_major(self) -> bool {
        matches!(
            self,
            AspectType::Conjunction
                | AspectType::Opposition
                | AspectType::Trine
                | AspectType::Square
                | AspectType::Sextile
        )
    }
}

impl fmt::Display for AspectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which aspects a chart looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectProfile {
    #[default]
    Major,
    Expanded,
}

/// Orb tolerance applied on top of the catalogue's base orbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbMode {
    Tight,
    #[default]
    Standard,
    Wide,
}

impl OrbMode {
    pub fn multiplier(self) -> f64 {
        match self {
            OrbMode::Tight => 0.8,
            OrbMode::Standard => 1.0,
            OrbMode::Wide => 1.2,
        }
    }
}

/// One catalogue row: aspect type, exact angle and base maximum orb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogueEntry {
    pub aspect_type: AspectType,
    pub exact_angle: f64,
    pub max_orb: f64,
}

impl CatalogueEntry {
    pub fn new(aspect_type: AspectType, max_orb: f64) -> Self {
        Self {
            aspect_type,
            exact_angle: aspect_type.exact_angle(),
            max_orb,
        }
    }
}

/// Ordered set of aspects to test for.
#[derive(Debug, Clone, PartialEq)]
pub struct AspectCatalogue {
    pub entries: Vec<CatalogueEntry>,
}

impl AspectCatalogue {
    /// Conjunction, opposition, trine, square and sextile.
    pub fn major() -> Self {
        Self {
            entries: vec![
                CatalogueEntry::new(AspectType::Conjunction, 8.0),
                CatalogueEntry::new(AspectType::Opposition, 8.0),
                CatalogueEntry::new(AspectType::Trine, 7.0),
                CatalogueEntry::new(AspectType::Square, 6.0),
                CatalogueEntry::new(AspectType::Sextile, 4.0),
            ],
        }
    }

    pub fn for_profile(profile: AspectProfile, include_minor: bool) -> Self {
        let mut catalogue = Self::major();
        if profile == AspectProfile::Expanded {
            catalogue.entries.push(CatalogueEntry::new(AspectType::Quincunx, 3.0));
            catalogue.entries.push(CatalogueEntry::new(AspectType::SemiSextile, 2.0));
        }
        if include_minor {
            catalogue.entries.push(CatalogueEntry::new(AspectType::SemiSquare, 2.0));
            catalogue.entries.push(CatalogueEntry::new(AspectType::Sesquiquadrate, 2.0));
            catalogue.entries.push(CatalogueEntry::new(AspectType::Quintile, 2.0));
        }
        catalogue
    }

    pub fn max_orb_of(&self, aspect_type: AspectType) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.aspect_type == aspect_type)
            .map(|e| e.max_orb)
    }
}

impl Default for AspectCatalogue {
    fn default() -> Self {
        Self::major()
    }
}

/// A detected aspect between two labelled points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aspect {
    pub point_a: String,
    pub point_b: String,
    #[serde(rename = "type")]
    pub aspect_type: AspectType,
    pub exact_angle: f64,
    /// Angular separation in [0, 180]
    pub separation: f64,
    /// |separation - exact angle|
    pub orb: f64,
}

/// A point fed to the aspect engine.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledLongitude {
    pub label: String,
    pub longitude: f64,
}

impl LabelledLongitude {
    pub fn new(label: impl Into<String>, longitude: f64) -> Self {
        Self {
            label: label.into(),
            longitude,
        }
    }
}
