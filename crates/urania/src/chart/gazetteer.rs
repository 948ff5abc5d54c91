//! City lookup for chart requests without explicit coordinates.

use serde::{Deserialize, Serialize};

/// A named place with its IANA zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub country: String,
    /// ISO 3166-1 alpha-2
    #[serde(default)]
    pub country_code: String,
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
}

impl City {
    fn matches(&self, city: &str, country: &str) -> bool {
        let city = city.trim();
        let country = country.trim();
        self.name.eq_ignore_ascii_case(city)
            && (self.country.eq_ignore_ascii_case(country)
                || (!self.country_code.is_empty() && self.country_code.eq_ignore_ascii_case(country)))
    }
}

// (name, country, code, lat, lon, zone)
const BUILTIN: &[(&str, &str, &str, f64, f64, &str)] = &[
    ("New York", "United States", "US", 40.7128, -74.0060, "America/New_York"),
    ("Los Angeles", "United States", "US", 34.0522, -118.2437, "America/Los_Angeles"),
    ("Chicago", "United States", "US", 41.8781, -87.6298, "America/Chicago"),
    ("Houston", "United States", "US", 29.7604, -95.3698, "America/Chicago"),
    ("Denver", "United States", "US", 39.7392, -104.9903, "America/Denver"),
    ("Phoenix", "United States", "US", 33.4484, -112.0740, "America/Phoenix"),
    ("Seattle", "United States", "US", 47.6062, -122.3321, "America/Los_Angeles"),
    ("San Francisco", "United States", "US", 37.7749, -122.4194, "America/Los_Angeles"),
    ("Miami", "United States", "US", 25.7617, -80.1918, "America/New_York"),
    ("Washington", "United States", "US", 38.9072, -77.0369, "America/New_York"),
    ("Boston", "United States", "US", 42.3601, -71.0589, "America/New_York"),
    ("Honolulu", "United States", "US", 21.3069, -157.8583, "Pacific/Honolulu"),
    ("Toronto", "Canada", "CA", 43.6532, -79.3832, "America/Toronto"),
    ("Vancouver", "Canada", "CA", 49.2827, -123.1207, "America/Vancouver"),
    ("Montreal", "Canada", "CA", 45.5017, -73.5673, "America/Toronto"),
    ("Mexico City", "Mexico", "MX", 19.4326, -99.1332, "America/Mexico_City"),
    ("Sao Paulo", "Brazil", "BR", -23.5505, -46.6333, "America/Sao_Paulo"),
    ("Rio de Janeiro", "Brazil", "BR", -22.9068, -43.1729, "America/Sao_Paulo"),
    ("Buenos Aires", "Argentina", "AR", -34.6037, -58.3816, "America/Argentina/Buenos_Aires"),
    ("Santiago", "Chile", "CL", -33.4489, -70.6693, "America/Santiago"),
    ("Lima", "Peru", "PE", -12.0464, -77.0428, "America/Lima"),
    ("Bogota", "Colombia", "CO", 4.7110, -74.0721, "America/Bogota"),
    ("London", "United Kingdom", "GB", 51.5074, -0.1278, "Europe/London"),
    ("Dublin", "Ireland", "IE", 53.3498, -6.2603, "Europe/Dublin"),
    ("Paris", "France", "FR", 48.8566, 2.3522, "Europe/Paris"),
    ("Berlin", "Germany", "DE", 52.5200, 13.4050, "Europe/Berlin"),
    ("Munich", "Germany", "DE", 48.1351, 11.5820, "Europe/Berlin"),
    ("Madrid", "Spain", "ES", 40.4168, -3.7038, "Europe/Madrid"),
    ("Barcelona", "Spain", "ES", 41.3851, 2.1734, "Europe/Madrid"),
    ("Lisbon", "Portugal", "PT", 38.7223, -9.1393, "Europe/Lisbon"),
    ("Rome", "Italy", "IT", 41.9028, 12.4964, "Europe/Rome"),
    ("Milan", "Italy", "IT", 45.4642, 9.1900, "Europe/Rome"),
    ("Amsterdam", "Netherlands", "NL", 52.3676, 4.9041, "Europe/Amsterdam"),
    ("Brussels", "Belgium", "BE", 50.8503, 4.3517, "Europe/Brussels"),
    ("Zurich", "Switzerland", "CH", 47.3769, 8.5417, "Europe/Zurich"),
    ("Vienna", "Austria", "AT", 48.2082, 16.3738, "Europe/Vienna"),
    ("Stockholm", "Sweden", "SE", 59.3293, 18.0686, "Europe/Stockholm"),
    ("Oslo", "Norway", "NO", 59.9139, 10.7522, "Europe/Oslo"),
    ("Copenhagen", "Denmark", "DK", 55.6761, 12.5683, "Europe/Copenhagen"),
    ("Helsinki", "Finland", "FI", 60.1699, 24.9384, "Europe/Helsinki"),
    ("Warsaw", "Poland", "PL", 52.2297, 21.0122, "Europe/Warsaw"),
    ("Prague", "Czechia", "CZ", 50.0755, 14.4378, "Europe/Prague"),
    ("Athens", "Greece", "GR", 37.9838, 23.7275, "Europe/Athens"),
    ("Istanbul", "Turkey", "TR", 41.0082, 28.9784, "Europe/Istanbul"),
    ("Moscow", "Russia", "RU", 55.7558, 37.6173, "Europe/Moscow"),
    ("Cairo", "Egypt", "EG", 30.0444, 31.2357, "Africa/Cairo"),
    ("Lagos", "Nigeria", "NG", 6.5244, 3.3792, "Africa/Lagos"),
    ("Nairobi", "Kenya", "KE", -1.2921, 36.8219, "Africa/Nairobi"),
    ("Johannesburg", "South Africa", "ZA", -26.2041, 28.0473, "Africa/Johannesburg"),
    ("Cape Town", "South Africa", "ZA", -33.9249, 18.4241, "Africa/Johannesburg"),
    ("Dubai", "United Arab Emirates", "AE", 25.2048, 55.2708, "Asia/Dubai"),
    ("Tehran", "Iran", "IR", 35.6892, 51.3890, "Asia/Tehran"),
    ("Mumbai", "India", "IN", 19.0760, 72.8777, "Asia/Kolkata"),
    ("Delhi", "India", "IN", 28.7041, 77.1025, "Asia/Kolkata"),
    ("Kathmandu", "Nepal", "NP", 27.7172, 85.3240, "Asia/Kathmandu"),
    ("Bangkok", "Thailand", "TH", 13.7563, 100.5018, "Asia/Bangkok"),
    ("Singapore", "Singapore", "SG", 1.3521, 103.8198, "Asia/Singapore"),
    ("Jakarta", "Indonesia", "ID", -6.2088, 106.8456, "Asia/Jakarta"),
    ("Manila", "Philippines", "PH", 14.5995, 120.9842, "Asia/Manila"),
    ("Hong Kong", "China", "CN", 22.3193, 114.1694, "Asia/Hong_Kong"),
    ("Beijing", "China", "CN", 39.9042, 116.4074, "Asia/Shanghai"),
    ("Shanghai", "China", "CN", 31.2304, 121.4737, "Asia/Shanghai"),
    ("Seoul", "South Korea", "KR", 37.5665, 126.9780, "Asia/Seoul"),
    ("Tokyo", "Japan", "JP", 35.6762, 139.6503, "Asia/Tokyo"),
    ("Sydney", "Australia", "AU", -33.8688, 151.2093, "Australia/Sydney"),
    ("Melbourne", "Australia", "AU", -37.8136, 144.9631, "Australia/Melbourne"),
    ("Perth", "Australia", "AU", -31.9505, 115.8605, "Australia/Perth"),
    ("Auckland", "New Zealand", "NZ", -36.8485, 174.7633, "Pacific/Auckland"),
];

lazy_static::lazy_static! {
    static ref BUILTIN_CITIES: Vec<City> = BUILTIN
        .iter()
        .map(|&(name, country, code, lat, lon, timezone)| City {
            name: name.to_string(),
            country: country.to_string(),
            country_code: code.to_string(),
            lat,
            lon,
            timezone: timezone.to_string(),
        })
        .collect();
}

/// Built-in cities plus caller-supplied extras, extras first.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    extra: Vec<City>,
}

impl Gazetteer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cities(extra: Vec<City>) -> Self {
        Self { extra }
    }

    pub fn lookup(&self, city: &str, country: &str) -> Option<&City> {
        self.extra
            .iter()
            .chain(BUILTIN_CITIES.iter())
            .find(|c| c.matches(city, country))
    }

    pub fn len(&self) -> usize {
        self.extra.len() + BUILTIN_CITIES.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_timezone;

    #[test]
    fn test_lookup_by_name_or_code() {
        let gazetteer = Gazetteer::new();
        let by_name = gazetteer.lookup("new york", "United States").unwrap();
        let by_code = gazetteer.lookup("  New York ", "us").unwrap();
        assert_eq!(by_name, by_code);
        assert_eq!(by_name.timezone, "America/New_York");
        assert!(gazetteer.lookup("New York", "Canada").is_none());
        assert!(gazetteer.lookup("Atlantis", "Greece").is_none());
    }

    #[test]
    fn test_extra_cities_take_precedence() {
        let gazetteer = Gazetteer::with_cities(vec![City {
            name: "London".to_string(),
            country: "Canada".to_string(),
            country_code: "CA".to_string(),
            lat: 42.9849,
            lon: -81.2453,
            timezone: "America/Toronto".to_string(),
        }]);
        assert_eq!(gazetteer.lookup("London", "CA").unwrap().lat, 42.9849);
        assert_eq!(gazetteer.lookup("London", "GB").unwrap().timezone, "Europe/London");
    }

    #[test]
    fn test_builtin_zones_parse() {
        for city in BUILTIN_CITIES.iter() {
            assert!(parse_timezone(&city.timezone).is_some(), "{}", city.timezone);
            assert!((-90.0..=90.0).contains(&city.lat));
            assert!((-180.0..=180.0).contains(&city.lon));
        }
    }
}
