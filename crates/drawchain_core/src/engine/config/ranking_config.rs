//! End-of-match badge thresholds.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Category average needed for a category badge (default: 0.8)
    pub badge_category_min: f64,
    /// Summed category averages needed for the golden link badge (default: 3.5)
    pub badge_total_min: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self { badge_category_min: 0.8, badge_total_min: 3.5 }
    }
}

impl RankingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.badge_category_min) {
            return Err(ScoringError::InvalidConfig(
                "ranking.badge_category_min must be within [0, 1]".into(),
            ));
        }
        if !(0.0..=4.0).contains(&self.badge_total_min) {
            return Err(ScoringError::InvalidConfig(
                "ranking.badge_total_min must be within [0, 4]".into(),
            ));
        }
        Ok(())
    }
}
