//! # Scoring Configuration
//!
//! Every tuning constant of the analyzers lives here instead of inline in the
//! scoring code.
//!
//! ## Usage
//! ```rust
//! use drawchain_core::engine::config::ScoringConfig;
//!
//! let config = ScoringConfig::default();
//! assert_eq!(config.visual.block_size, 20);
//! ```
//!
//! ## Environment Variables
//!
//! - `DRAWCHAIN_SCORING_CONFIG`: path to a YAML or JSON file overriding the defaults.
//!   Sections and fields left out keep their default values.

mod creativity_config;
mod ranking_config;
mod theme_config;
mod trace_config;
mod visual_config;

pub use creativity_config::CreativityConfig;
pub use ranking_config::RankingConfig;
pub use theme_config::{ChannelRange, ColorRule, FeatureRule, ThemeConfig, ThemeRegistry};
pub use trace_config::TraceConfig;
pub use visual_config::VisualConfig;

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, ScoringError};

pub const CONFIG_ENV_VAR: &str = "DRAWCHAIN_SCORING_CONFIG";

/// Full analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringConfig {
    /// Stroke fluidity
    pub trace: TraceConfig,
    /// Pixel differencing and coherence
    pub visual: VisualConfig,
    /// Theme fidelity and keyword registry
    pub theme: ThemeConfig,
    /// Creativity and chaos
    pub creativity: CreativityConfig,
    /// End-of-match badges
    pub ranking: RankingConfig,
}

impl ScoringConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` file, or YAML for any other extension.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    /// Load from `DRAWCHAIN_SCORING_CONFIG` or fall back to defaults.
    pub fn from_env_or_default() -> Self {
        match env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => match Self::load(Path::new(&path)) {
                Ok(config) => {
                    info!(path = %path, "loaded scoring config");
                    config
                }
                Err(err) => {
                    warn!(path = %path, error = %err, "failed to load scoring config, using defaults");
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.trace.validate()?;
        self.visual.validate()?;
        self.theme.validate()?;
        self.creativity.validate()?;
        self.ranking.validate()
    }
}

/// `value` must lie within `[min, max]`. NaN never does.
pub(crate) fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ScoringError::InvalidConfig(format!(
            "{field} must be within [{min}, {max}], got {value}"
        )))
    }
}

/// `value` must be a finite number >= 0.
pub(crate) fn check_non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ScoringError::InvalidConfig(format!("{field} must be a finite number >= 0, got {value}")))
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let cfg = ScoringConfig::default();
        assert!((cfg.trace.pause_threshold_ms - 150.0).abs() < f64::EPSILON);
        assert!((cfg.visual.difference_threshold - 30.0).abs() < f64::EPSILON);
        assert_eq!(cfg.theme.dominant_color_count, 3);
        assert!((cfg.creativity.base_score - 0.5).abs() < f64::EPSILON);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let cfg = ScoringConfig::from_yaml_str("visual:\n  block_size: 10\n").unwrap();
        assert_eq!(cfg.visual.block_size, 10);
        assert!((cfg.visual.destruction_pct - 70.0).abs() < f64::EPSILON);
        assert!(cfg.theme.registry.feature_rule("chat").is_some());
    }

    #[test]
    fn test_invalid_yaml_config_rejected() {
        let err = ScoringConfig::from_yaml_str("visual:\n  block_size: 0\n").unwrap_err();
        assert!(err.to_string().contains("block_size"));
    }

    #[test]
    fn test_out_of_range_thresholds_rejected() {
        let cases = [
            "visual:\n  destruction_pct: 120.0\n",
            "visual:\n  diffuse_density_max: 1.5\n",
            "visual:\n  chaotic_penalty: -0.5\n",
            "visual:\n  difference_threshold: .nan\n",
            "trace:\n  pause_penalty: -0.05\n",
            "trace:\n  fluidity_weight: .nan\n",
            "creativity:\n  twist_bonus: -0.3\n",
            "creativity:\n  detail_density_min: 2.0\n",
            "creativity:\n  destructive_chaos_min_pct: 150.0\n",
            "theme:\n  keyword_bonus: -0.15\n",
        ];
        for yaml in cases {
            let err = ScoringConfig::from_yaml_str(yaml).unwrap_err();
            assert!(matches!(err, ScoringError::InvalidConfig(_)), "{yaml:?} gave {err}");
        }
    }

    #[test]
    fn test_range_helpers() {
        assert!(check_range("x", 0.0, 0.0, 1.0).is_ok());
        assert!(check_range("x", f64::NAN, 0.0, 1.0).is_err());
        assert!(check_non_negative("x", f64::INFINITY).is_err());
        let err = check_range("visual.destruction_pct", 101.0, 0.0, 100.0).unwrap_err();
        assert!(err.to_string().contains("visual.destruction_pct"));
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"trace": {{"pause_threshold_ms": 200.0}}}}"#).unwrap();
        let cfg = ScoringConfig::load(file.path()).unwrap();
        assert!((cfg.trace.pause_threshold_ms - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "ranking:\n  badge_total_min: 3.0").unwrap();
        let cfg = ScoringConfig::load(file.path()).unwrap();
        assert!((cfg.ranking.badge_total_min - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_yaml_round_trip_of_defaults() {
        let yaml = serde_yaml::to_string(&ScoringConfig::default()).unwrap();
        let back = ScoringConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(back.theme.registry, ThemeRegistry::default());
    }
}
