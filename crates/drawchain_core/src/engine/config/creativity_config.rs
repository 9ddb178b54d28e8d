//! Creativity scoring and chaos classification thresholds.

use serde::{Deserialize, Serialize};

use super::{check_non_negative, check_range};
use crate::error::{Result, ScoringError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CreativityConfig {
    pub base_score: f64,

    /// Exclusive modification % window for meaningful change (default: 10..40)
    pub moderate_min_pct: f64,
    pub moderate_max_pct: f64,
    pub moderate_bonus: f64,

    /// Density above which the edit counts as detail work (default: 0.6)
    pub detail_density_min: f64,
    pub detail_bonus: f64,

    // === Twist ===
    pub twist_min_pct: f64,
    pub twist_min_coherence: f64,
    pub twist_bonus: f64,

    pub destruction_penalty: f64,

    // === Chaos classification ===
    pub fun_chaos_min_pct: f64,
    pub fun_chaos_min_density: f64,
    pub destructive_chaos_min_pct: f64,
    pub destructive_chaos_max_density: f64,
}

impl Default for CreativityConfig {
    fn default() -> Self {
        Self {
            base_score: 0.5,
            moderate_min_pct: 10.0,
            moderate_max_pct: 40.0,
            moderate_bonus: 0.3,
            detail_density_min: 0.6,
            detail_bonus: 0.2,
            twist_min_pct: 25.0,
            twist_min_coherence: 0.5,
            twist_bonus: 0.3,
            destruction_penalty: 0.5,
            fun_chaos_min_pct: 40.0,
            fun_chaos_min_density: 0.5,
            destructive_chaos_min_pct: 60.0,
            destructive_chaos_max_density: 0.3,
        }
    }
}

impl CreativityConfig {
    pub fn validate(&self) -> Result<()> {
        check_range("creativity.base_score", self.base_score, 0.0, 1.0)?;
        for (field, pct) in [
            ("creativity.moderate_min_pct", self.moderate_min_pct),
            ("creativity.moderate_max_pct", self.moderate_max_pct),
            ("creativity.twist_min_pct", self.twist_min_pct),
            ("creativity.fun_chaos_min_pct", self.fun_chaos_min_pct),
            ("creativity.destructive_chaos_min_pct", self.destructive_chaos_min_pct),
        ] {
            check_range(field, pct, 0.0, 100.0)?;
        }
        for (field, unit) in [
            ("creativity.detail_density_min", self.detail_density_min),
            ("creativity.twist_min_coherence", self.twist_min_coherence),
            ("creativity.fun_chaos_min_density", self.fun_chaos_min_density),
            ("creativity.destructive_chaos_max_density", self.destructive_chaos_max_density),
        ] {
            check_range(field, unit, 0.0, 1.0)?;
        }
        for (field, amount) in [
            ("creativity.moderate_bonus", self.moderate_bonus),
            ("creativity.detail_bonus", self.detail_bonus),
            ("creativity.twist_bonus", self.twist_bonus),
            ("creativity.destruction_penalty", self.destruction_penalty),
        ] {
            check_non_negative(field, amount)?;
        }
        if self.moderate_min_pct >= self.moderate_max_pct {
            return Err(ScoringError::InvalidConfig(format!(
                "creativity moderate window is empty: {}..{}",
                self.moderate_min_pct, self.moderate_max_pct
            )));
        }
        Ok(())
    }
}
