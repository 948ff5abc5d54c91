use crate::aspects::{Aspect, LabelledLongitude};
use crate::chart::settings::ChartSettings;
use crate::ephemeris::{Body, GeoLocation};
use crate::houses::HousePlacement;
use crate::time::DstPreference;
use crate::zodiac::{degree_in_sign, normalize_degrees, ZodiacSign};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Every named point a chart can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartPoint {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    NorthNode,
    SouthNode,
    Lilith,
    Chiron,
    PartOfFortune,
    Vertex,
}

impl ChartPoint {
    pub const ALL: [ChartPoint; 16] = [
        ChartPoint::Sun,
        ChartPoint::Moon,
        ChartPoint::Mercury,
        ChartPoint::Venus,
        ChartPoint::Mars,
        ChartPoint::Jupiter,
        ChartPoint::Saturn,
        ChartPoint::Uranus,
        ChartPoint::Neptune,
        ChartPoint::Pluto,
        ChartPoint::NorthNode,
        ChartPoint::SouthNode,
        ChartPoint::Lilith,
        ChartPoint::Chiron,
        ChartPoint::PartOfFortune,
        ChartPoint::Vertex,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ChartPoint::NorthNode => "north_node",
            ChartPoint::SouthNode => "south_node",
            ChartPoint::Lilith => "lilith",
            ChartPoint::Chiron => "chiron",
            ChartPoint::PartOfFortune => "part_of_fortune",
            ChartPoint::Vertex => "vertex",
            other => other.body().map_or("", Body::id),
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.id() == id)
    }

    /// Ephemeris body behind this point, if it is not derived.
    pub fn body(self) -> Option<Body> {
        match self {
            ChartPoint::Sun => Some(Body::Sun),
            ChartPoint::Moon => Some(Body::Moon),
            ChartPoint::Mercury => Some(Body::Mercury),
            ChartPoint::Venus => Some(Body::Venus),
            ChartPoint::Mars => Some(Body::Mars),
            ChartPoint::Jupiter => Some(Body::Jupiter),
            ChartPoint::Saturn => Some(Body::Saturn),
            ChartPoint::Uranus => Some(Body::Uranus),
            ChartPoint::Neptune => Some(Body::Neptune),
            ChartPoint::Pluto => Some(Body::Pluto),
            _ => None,
        }
    }

    /// Whether natal and cross-chart aspects consider this point.
    pub fn is_aspectable(self) -> bool {
        self.body().is_some()
            || matches!(self, ChartPoint::NorthNode | ChartPoint::Chiron | ChartPoint::Lilith)
    }
}

impl From<Body> for ChartPoint {
    fn from(body: Body) -> Self {
        match body {
            Body::Sun => ChartPoint::Sun,
            Body::Moon => ChartPoint::Moon,
            Body::Mercury => ChartPoint::Mercury,
            Body::Venus => ChartPoint::Venus,
            Body::Mars => ChartPoint::Mars,
            Body::Jupiter => ChartPoint::Jupiter,
            Body::Saturn => ChartPoint::Saturn,
            Body::Uranus => ChartPoint::Uranus,
            Body::Neptune => ChartPoint::Neptune,
            Body::Pluto => ChartPoint::Pluto,
        }
    }
}

impl fmt::Display for ChartPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

pub const ASCENDANT_LABEL: &str = "ascendant";
pub const MIDHEAVEN_LABEL: &str = "midheaven";

/// Where a point sits. Sign and degree are always derived from `longitude`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPlacement {
    pub sign: ZodiacSign,
    pub degree: f64,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub retrograde: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house: Option<u8>,
}

impl BodyPlacement {
    pub fn from_longitude(longitude: f64) -> Self {
        let longitude = normalize_degrees(longitude);
        Self {
            sign: ZodiacSign::from_longitude(longitude),
            degree: degree_in_sign(longitude),
            longitude: Some(longitude),
            retrograde: false,
            house: None,
        }
    }

    pub fn with_retrograde(mut self, retrograde: bool) -> Self {
        self.retrograde = retrograde;
        self
    }

    pub fn with_house(mut self, house: Option<u8>) -> Self {
        self.house = house;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Angles {
    pub ascendant: BodyPlacement,
    pub descendant: BodyPlacement,
    pub midheaven: BodyPlacement,
    pub imum_coeli: BodyPlacement,
    pub vertex: BodyPlacement,
}

impl Angles {
    /// Angles from an Ascendant, Midheaven and Vertex longitude.
    pub fn from_longitudes(ascendant: f64, midheaven: f64, vertex: f64) -> Self {
        Self {
            ascendant: BodyPlacement::from_longitude(ascendant),
            descendant: BodyPlacement::from_longitude(ascendant + 180.0),
            midheaven: BodyPlacement::from_longitude(midheaven),
            imum_coeli: BodyPlacement::from_longitude(midheaven + 180.0),
            vertex: BodyPlacement::from_longitude(vertex),
        }
    }
}

/// The moment and place a chart is cast for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTime {
    pub local_date_time: NaiveDateTime,
    pub utc_date_time: DateTime<Utc>,
    /// UTC minus local time, in minutes
    pub offset_minutes: i32,
    pub daylight_saving: bool,
    pub timezone: String,
    pub location: GeoLocation,
    pub julian_day: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub engine: String,
    pub ephemeris: String,
    pub settings_hash: String,
    pub warnings: Vec<String>,
}

/// Explicit location, bypassing the gazetteer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
}

/// Raw chart request as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartInput {
    /// YYYY-MM-DD
    pub date: String,
    /// HH:mm or HH:mm:ss
    pub time: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub daylight_saving: DstPreference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartResult {
    pub input: ChartInput,
    pub settings: ChartSettings,
    pub normalized: NormalizedTime,
    pub planets: BTreeMap<ChartPoint, BodyPlacement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angles: Option<Angles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub houses: Option<Vec<HousePlacement>>,
    pub aspects: Vec<Aspect>,
    pub meta: ChartMeta,
}

impl ChartResult {
    pub fn longitude_of(&self, point: ChartPoint) -> Option<f64> {
        self.planets.get(&point).and_then(|p| p.longitude)
    }

    pub fn ascendant(&self) -> Option<f64> {
        self.angles.as_ref().and_then(|a| a.ascendant.longitude)
    }

    pub fn midheaven(&self) -> Option<f64> {
        self.angles.as_ref().and_then(|a| a.midheaven.longitude)
    }

    /// Points the aspect engine looks at, in a fixed order.
    pub fn aspectable_points(&self) -> Vec<LabelledLongitude> {
        aspectable_points(&self.planets, self.angles.as_ref())
    }
}

/// Aspectable points of a placement map plus the Ascendant and Midheaven.
pub fn aspectable_points(
    planets: &BTreeMap<ChartPoint, BodyPlacement>,
    angles: Option<&Angles>,
) -> Vec<LabelledLongitude> {
    let mut points: Vec<LabelledLongitude> = planets
        .iter()
        .filter(|(point, _)| point.is_aspectable())
        .filter_map(|(point, placement)| {
            placement
                .longitude
                .map(|lon| LabelledLongitude::new(point.id(), lon))
        })
        .collect();

    if let Some(angles) = angles {
        if let Some(lon) = angles.ascendant.longitude {
            points.push(LabelledLongitude::new(ASCENDANT_LABEL, lon));
        }
        if let Some(lon) = angles.midheaven.longitude {
            points.push(LabelledLongitude::new(MIDHEAVEN_LABEL, lon));
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_ids_match_serde() {
        for point in ChartPoint::ALL {
            let json = serde_json::to_string(&point).unwrap();
            assert_eq!(json, format!("\"{}\"", point.id()));
        }
    }

    #[test]
    fn test_aspectable_set() {
        let aspectable: Vec<_> = ChartPoint::ALL.iter().filter(|p| p.is_aspectable()).collect();
        assert_eq!(aspectable.len(), 13);
        assert!(!ChartPoint::SouthNode.is_aspectable());
        assert!(!ChartPoint::PartOfFortune.is_aspectable());
        assert!(!ChartPoint::Vertex.is_aspectable());
    }

    #[test]
    fn test_placement_consistent_with_longitude() {
        let placement = BodyPlacement::from_longitude(-15.25);
        assert_eq!(placement.longitude, Some(344.75));
        assert_eq!(placement.sign, ZodiacSign::Pisces);
        assert!((placement.degree - 14.75).abs() < 1e-12);
    }

    #[test]
    fn test_angles_oppositions() {
        let angles = Angles::from_longitudes(200.0, 110.0, 290.0);
        assert_eq!(angles.descendant.longitude, Some(20.0));
        assert_eq!(angles.imum_coeli.longitude, Some(290.0));
    }
}
