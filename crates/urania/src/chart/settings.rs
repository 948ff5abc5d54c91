use crate::aspects::{AspectCalculator, AspectCatalogue, AspectProfile, OrbMode};
use crate::houses::HouseSystem;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const FINGERPRINT_LEN: usize = 16;

/// Options that change a chart's numeric output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSettings {
    #[serde(default)]
    pub house_system: HouseSystem,
    #[serde(default)]
    pub aspect_profile: AspectProfile,
    #[serde(default)]
    pub orb_mode: OrbMode,
    #[serde(default)]
    pub include_minor_aspects: bool,
}

impl ChartSettings {
    pub fn catalogue(&self) -> AspectCatalogue {
        AspectCatalogue::for_profile(self.aspect_profile, self.include_minor_aspects)
    }

    pub fn aspect_calculator(&self) -> AspectCalculator {
        AspectCalculator::new(self.catalogue(), self.orb_mode)
    }

    /// SHA-256 of the canonical JSON form, first 16 hex digits.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_else(|_| format!("{:?}", self).into_bytes());
        let digest = Sha256::digest(&canonical);
        let mut hash = hex::encode(digest);
        hash.truncate(FINGERPRINT_LEN);
        hash
    }
}
