use crate::aspects::types::{Aspect, AspectCatalogue, AspectType, LabelledLongitude, OrbMode};
use crate::zodiac::normalize_degrees;

/// Shortest arc between two longitudes, in [0, 180].
pub fn angular_separation(a: f64, b: f64) -> f64 {
    let raw_diff = (normalize_degrees(a) - normalize_degrees(b)).abs();
    if raw_diff > 180.0 {
        360.0 - raw_diff
    } else {
        raw_diff
    }
}

/// Best catalogue match for one separation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectMatch {
    pub aspect_type: AspectType,
    pub exact_angle: f64,
    pub separation: f64,
    pub orb: f64,
}

/// Aspect detection over lists of labelled longitudes.
#[derive(Debug, Clone)]
pub struct AspectCalculator {
    catalogue: AspectCatalogue,
    multiplier: f64,
}

impl AspectCalculator {
    pub fn new(catalogue: AspectCatalogue, orb_mode: OrbMode) -> Self {
        Self {
            catalogue,
            multiplier: orb_mode.multiplier(),
        }
    }

    pub fn catalogue(&self) -> &AspectCatalogue {
        &self.catalogue
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Lowest-orb catalogue entry within its allowed orb, if any.
    ///
    /// Ties keep the earlier catalogue entry.
    pub fn calculate_aspect(&self, lon1: f64, lon2: f64) -> Option<AspectMatch> {
        let separation = angular_separation(lon1, lon2);
        let mut best: Option<AspectMatch> = None;

        for entry in &self.catalogue.entries {
            let orb = (separation - entry.exact_angle).abs();
            if orb > entry.max_orb * self.multiplier {
                continue;
            }
            if best.map_or(true, |b| orb < b.orb) {
                best = Some(AspectMatch {
                    aspect_type: entry.aspect_type,
                    exact_angle: entry.exact_angle,
                    separation,
                    orb,
                });
            }
        }

        best
    }

    /// Aspects among the points of one chart (each unordered pair once).
    pub fn find_aspects(&self, points: &[LabelledLongitude]) -> Vec<Aspect> {
        let mut aspects = Vec::new();
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                if let Some(aspect) = self.pair(&points[i], &points[j]) {
                    aspects.push(aspect);
                }
            }
        }
        sort_by_orb(&mut aspects);
        aspects
    }

    /// Aspects from every point of `left` to every point of `right`.
    ///
    /// Same-labelled pairs are kept: they are different charts' points.
    pub fn find_cross_aspects(
        &self,
        left: &[LabelledLongitude],
        right: &[LabelledLongitude],
    ) -> Vec<Aspect> {
        let mut aspects = Vec::new();
        for a in left {
            for b in right {
                if let Some(aspect) = self.pair(a, b) {
                    aspects.push(aspect);
                }
            }
        }
        sort_by_orb(&mut aspects);
        aspects
    }

    fn pair(&self, a: &LabelledLongitude, b: &LabelledLongitude) -> Option<Aspect> {
        self.calculate_aspect(a.longitude, b.longitude)
            .map(|m| Aspect {
                point_a: a.label.clone(),
                point_b: b.label.clone(),
                aspect_type: m.aspect_type,
                exact_angle: m.exact_angle,
                separation: m.separation,
                orb: m.orb,
            })
    }
}

impl Default for AspectCalculator {
    fn default() -> Self {
        Self::new(AspectCatalogue::major(), OrbMode::Standard)
    }
}

/// Ascending by orb; stable, so equal orbs keep discovery order.
pub(crate) fn sort_by_orb(aspects: &mut [Aspect]) {
    aspects.sort_by(|a, b| a.orb.total_cmp(&b.orb));
}
