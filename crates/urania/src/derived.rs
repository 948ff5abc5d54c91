//! Derived points: lunar nodes, Lilith, Part of Fortune, Vertex and Chiron.
//!
//! Only the nodes and Lilith come from an actual model (mean elements as
//! polynomials in Julian centuries). Vertex and Chiron are fixed offsets from
//! other chart points. Every approximate point carries a warning.

use crate::zodiac::normalize_degrees;

pub const NODE_WARNING: &str = "North and South Node use the mean lunar node; the true node is not computed";
pub const LILITH_WARNING: &str = "Lilith uses the mean lunar apogee";
pub const CHIRON_WARNING: &str = "Chiron is approximated as Saturn + 120°";
pub const VERTEX_WARNING: &str = "Vertex is approximated as Ascendant + 90°";

/// Chart values the derived points are computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedInputs {
    /// Julian centuries since J2000.0
    pub t: f64,
    pub sun: f64,
    pub moon: f64,
    pub saturn: f64,
    pub ascendant: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedPoints {
    pub north_node: f64,
    pub south_node: f64,
    pub lilith: f64,
    pub chiron: f64,
    pub part_of_fortune: f64,
    pub vertex: f64,
    pub warnings: Vec<String>,
}

/// Mean longitude of the Moon's ascending node (Meeus eq. 47.7).
pub fn mean_node_deg(t: f64) -> f64 {
    normalize_degrees(
        125.044_547_9 - 1_934.136_289_1 * t + 0.002_075_4 * t * t + t * t * t / 467_441.0
            - t * t * t * t / 60_616_000.0,
    )
}

/// Mean longitude of the lunar apogee, "Black Moon" Lilith.
pub fn mean_lilith_deg(t: f64) -> f64 {
    normalize_degrees(
        263.353_246_5 + 4_069.013_728_7 * t - 0.010_32 * t * t - t * t * t / 80_053.0
            + t * t * t * t / 18_999_000.0,
    )
}

/// Part of Fortune, Ascendant + Moon - Sun.
pub fn part_of_fortune_deg(ascendant: f64, moon: f64, sun: f64) -> f64 {
    normalize_degrees(ascendant + moon - sun)
}

pub fn estimate(inputs: DerivedInputs) -> DerivedPoints {
    let north_node = mean_node_deg(inputs.t);
    let warnings = vec![
        NODE_WARNING.to_string(),
        LILITH_WARNING.to_string(),
        CHIRON_WARNING.to_string(),
        VERTEX_WARNING.to_string(),
    ];

    DerivedPoints {
        north_node,
        south_node: normalize_degrees(north_node + 180.0),
        lilith: mean_lilith_deg(inputs.t),
        chiron: normalize_degrees(inputs.saturn + 120.0),
        part_of_fortune: part_of_fortune_deg(inputs.ascendant, inputs.moon, inputs.sun),
        vertex: normalize_degrees(inputs.ascendant + 90.0),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_node_at_j2000() {
        assert!((mean_node_deg(0.0) - 125.0445479).abs() < 1e-9);
        // retrograde, about 19.3 degrees per year
        let a = mean_node_deg(0.0);
        let b = mean_node_deg(0.01);
        assert!((normalize_degrees(a - b) - 19.341).abs() < 0.01);
    }

    #[test]
    fn test_mean_node_meeus_example() {
        // Meeus example 47.a, 1992-04-12 0h TD: T = -0.077221081451
        let t = -0.077_221_081_451;
        assert!((mean_node_deg(t) - 274.400656).abs() < 1e-3);
    }

    #[test]
    fn test_lilith_advances() {
        let a = mean_lilith_deg(0.0);
        assert!((a - 263.3532465).abs() < 1e-9);
        // about 40.7 degrees per year
        let b = mean_lilith_deg(0.01);
        assert!((normalize_degrees(b - a) - 40.69).abs() < 0.01);
    }

    #[test]
    fn test_estimate() {
        let points = estimate(DerivedInputs {
            t: 0.24,
            sun: 300.0,
            moon: 20.0,
            saturn: 300.0,
            ascendant: 350.0,
        });
        assert!((points.part_of_fortune - 70.0).abs() < 1e-9);
        assert!((points.vertex - 80.0).abs() < 1e-9);
        assert!((points.chiron - 60.0).abs() < 1e-9);
        assert!((normalize_degrees(points.south_node - points.north_node) - 180.0).abs() < 1e-9);
        assert_eq!(points.warnings.len(), 4);
    }
}
