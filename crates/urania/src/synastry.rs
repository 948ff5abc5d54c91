//! Cross-chart aspects between two natal charts.

use crate::aspects::Aspect;
use crate::chart::{ChartResult, ChartSettings};
use crate::composite::settings_drift_warning;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynastryResult {
    /// `pointA` belongs to the first chart, `pointB` to the second
    pub aspects: Vec<Aspect>,
    /// The two charts were cast with different settings
    pub settings_drift: bool,
    pub settings_hash: String,
    pub warnings: Vec<String>,
}

pub fn generate_synastry(
    chart_a: &ChartResult,
    chart_b: &ChartResult,
    settings: &ChartSettings,
) -> SynastryResult {
    let settings_drift = chart_a.meta.settings_hash != chart_b.meta.settings_hash;
    let mut warnings = Vec::new();
    if settings_drift {
        warnings.push(settings_drift_warning(chart_a, chart_b));
    }

    let aspects = settings
        .aspect_calculator()
        .find_cross_aspects(&chart_a.aspectable_points(), &chart_b.aspectable_points());
    log::debug!("Synastry found {} aspects", aspects.len());

    SynastryResult {
        aspects,
        settings_drift,
        settings_hash: settings.fingerprint(),
        warnings,
    }
}
