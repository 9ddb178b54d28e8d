//! Stroke fluidity thresholds.

use serde::{Deserialize, Serialize};

use super::{check_non_negative, check_range};
use crate::error::{Result, ScoringError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    // === Pauses ===
    /// Gap between samples counted as a pause (ms) (default: 150)
    pub pause_threshold_ms: f64,
    /// Fluidity lost per pause (default: 0.05)
    pub pause_penalty: f64,
    /// Cap on the total pause penalty (default: 0.3)
    pub pause_penalty_cap: f64,

    // === Engagement ===
    /// Path length that earns the full length bonus is `divisor * cap` (default: 5000)
    pub length_bonus_divisor: f64,
    /// Cap on the length bonus (default: 0.2)
    pub length_bonus_cap: f64,

    // === Speed consistency ===
    /// Weight of avg/max speed ratio (default: 0.3)
    pub speed_consistency_weight: f64,

    // === Composite ===
    /// Share of kinematic fluidity in the category score (default: 0.7)
    pub fluidity_weight: f64,
    /// Share of angular variability in the category score (default: 0.3)
    pub variability_weight: f64,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            pause_threshold_ms: 150.0,
            pause_penalty: 0.05,
            pause_penalty_cap: 0.3,
            length_bonus_divisor: 5000.0,
            length_bonus_cap: 0.2,
            speed_consistency_weight: 0.3,
            fluidity_weight: 0.7,
            variability_weight: 0.3,
        }
    }
}

impl TraceConfig {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("trace.pause_threshold_ms", self.pause_threshold_ms)?;
        check_non_negative("trace.pause_penalty", self.pause_penalty)?;
        check_non_negative("trace.pause_penalty_cap", self.pause_penalty_cap)?;
        check_non_negative("trace.length_bonus_cap", self.length_bonus_cap)?;
        check_non_negative("trace.speed_consistency_weight", self.speed_consistency_weight)?;
        check_range("trace.fluidity_weight", self.fluidity_weight, 0.0, 1.0)?;
        check_range("trace.variability_weight", self.variability_weight, 0.0, 1.0)?;
        if !(self.length_bonus_divisor.is_finite() && self.length_bonus_divisor > 0.0) {
            return Err(ScoringError::InvalidConfig(
                "trace.length_bonus_divisor must be > 0".into(),
            ));
        }
        let weights = self.fluidity_weight + self.variability_weight;
        if (weights - 1.0).abs() > 1e-9 {
            return Err(ScoringError::InvalidConfig(format!(
                "trace fluidity/variability weights must sum to 1, got {weights}"
            )));
        }
        Ok(())
    }
}
