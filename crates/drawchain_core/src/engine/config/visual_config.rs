//! Pixel differencing, density and coherence thresholds.

use serde::{Deserialize, Serialize};

use super::{check_non_negative, check_range};
use crate::error::{Result, ScoringError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// RGBA distance above which a pixel counts as modified (default: 30)
    pub difference_threshold: f64,
    /// Side of the square density blocks in pixels (default: 20)
    pub block_size: u32,

    // === Destruction ===
    /// Modification % above which the drawing is considered destroyed (default: 70)
    pub destruction_pct: f64,
    /// Density below which wide change counts as painting over (default: 0.3)
    pub diffuse_density_max: f64,
    /// Modification % paired with `diffuse_density_max` (default: 50)
    pub diffuse_pct: f64,

    // === Coherence ===
    /// Modification % above which editing is chaotic (default: 40)
    pub chaotic_pct: f64,
    pub chaotic_penalty: f64,
    /// Coherence gained per unit of density (default: 0.3)
    pub density_bonus_weight: f64,
    /// Inclusive sweet spot of modification % (default: 5..=30)
    pub sweet_spot_min_pct: f64,
    pub sweet_spot_max_pct: f64,
    pub sweet_spot_bonus: f64,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            difference_threshold: 30.0,
            block_size: 20,
            destruction_pct: 70.0,
            diffuse_density_max: 0.3,
            diffuse_pct: 50.0,
            chaotic_pct: 40.0,
            chaotic_penalty: 0.5,
            density_bonus_weight: 0.3,
            sweet_spot_min_pct: 5.0,
            sweet_spot_max_pct: 30.0,
            sweet_spot_bonus: 0.2,
        }
    }
}

impl VisualConfig {
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(ScoringError::InvalidConfig("visual.block_size must be > 0".into()));
        }
        if self.sweet_spot_min_pct > self.sweet_spot_max_pct {
            return Err(ScoringError::InvalidConfig(format!(
                "visual sweet spot is inverted: {} > {}",
                self.sweet_spot_min_pct, self.sweet_spot_max_pct
            )));
        }
        check_non_negative("visual.difference_threshold", self.difference_threshold)?;
        for (field, pct) in [
            ("visual.destruction_pct", self.destruction_pct),
            ("visual.diffuse_pct", self.diffuse_pct),
            ("visual.chaotic_pct", self.chaotic_pct),
            ("visual.sweet_spot_min_pct", self.sweet_spot_min_pct),
            ("visual.sweet_spot_max_pct", self.sweet_spot_max_pct),
        ] {
            check_range(field, pct, 0.0, 100.0)?;
        }
        check_range("visual.diffuse_density_max", self.diffuse_density_max, 0.0, 1.0)?;
        check_non_negative("visual.chaotic_penalty", self.chaotic_penalty)?;
        check_non_negative("visual.density_bonus_weight", self.density_bonus_weight)?;
        check_non_negative("visual.sweet_spot_bonus", self.sweet_spot_bonus)
    }
}
