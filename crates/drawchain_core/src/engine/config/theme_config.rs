//! Theme fidelity settings and the keyword rule registry.
//!
//! The registry maps theme keywords to cheap visual predicates:
//!
//! | Rule | Tested against |
//! |------|----------------|
//! | [`FeatureRule`] | ink density / color density of the after-image |
//! | [`ColorRule`] | each dominant quantized color |
//!
//! Rules are plain data so they can be extended from a config file:
//!
//! ```yaml
//! theme:
//!   registry:
//!     feature_rules:
//!       - { keyword: dragon, min_ink_density: 0.25 }
//!     color_rules:
//!       - { keyword: dragon, red: { above: 150 }, green: { below: 80 }, blue: { below: 80 } }
//! ```

use serde::{Deserialize, Serialize};

use super::{check_non_negative, check_range};
use crate::error::{Result, ScoringError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Neutral score for themes nothing matches (default: 0.5)
    pub base_score: f64,
    /// Added per matching keyword feature rule (default: 0.15)
    pub keyword_bonus: f64,
    /// Added once when a color rule matches (default: 0.2)
    pub color_bonus: f64,
    /// Number of dominant colors to extract (default: 3)
    pub dominant_color_count: usize,
    /// Channel bucket width for color quantization (default: 50)
    pub color_quantum: u8,
    /// Alpha strictly above this is visible (default: 128)
    pub visible_alpha_min: u8,
    /// All channels at or above this is near-white (default: 240)
    pub near_white_min: u8,
    /// All channels strictly below this is near-black (default: 50)
    pub near_black_max: u8,
    pub registry: ThemeRegistry,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            base_score: 0.5,
            keyword_bonus: 0.15,
            color_bonus: 0.2,
            dominant_color_count: 3,
            color_quantum: 50,
            visible_alpha_min: 128,
            near_white_min: 240,
            near_black_max: 50,
            registry: ThemeRegistry::default(),
        }
    }
}

impl ThemeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.color_quantum == 0 {
            return Err(ScoringError::InvalidConfig("theme.color_quantum must be > 0".into()));
        }
        check_range("theme.base_score", self.base_score, 0.0, 1.0)?;
        check_non_negative("theme.keyword_bonus", self.keyword_bonus)?;
        check_non_negative("theme.color_bonus", self.color_bonus)?;
        self.registry.validate()
    }
}

/// Keyword predicate over the after-image's ink and color densities.
///
/// Every bound that is set must hold (strictly greater).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRule {
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_ink_density: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_color_density: Option<f64>,
}

impl FeatureRule {
    pub fn ink(keyword: &str, min: f64) -> Self {
        Self { keyword: keyword.to_lowercase(), min_ink_density: Some(min), min_color_density: None }
    }

    pub fn color(keyword: &str, min: f64) -> Self {
        Self { keyword: keyword.to_lowercase(), min_ink_density: None, min_color_density: Some(min) }
    }

    pub fn holds(&self, ink_density: f64, color_density: f64) -> bool {
        self.min_ink_density.map_or(true, |min| ink_density > min)
            && self.min_color_density.map_or(true, |min| color_density > min)
    }
}

/// Open interval on one channel; unset sides are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub above: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub below: Option<u8>,
}

impl ChannelRange {
    pub const ANY: ChannelRange = ChannelRange { above: None, below: None };

    pub fn above(value: u8) -> Self {
        Self { above: Some(value), below: None }
    }

    pub fn below(value: u8) -> Self {
        Self { above: None, below: Some(value) }
    }

    pub fn contains(&self, channel: u8) -> bool {
        self.above.map_or(true, |a| channel > a) && self.below.map_or(true, |b| channel < b)
    }
}

/// Keyword affinity for a color region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRule {
    pub keyword: String,
    #[serde(default)]
    pub red: ChannelRange,
    #[serde(default)]
    pub green: ChannelRange,
    #[serde(default)]
    pub blue: ChannelRange,
}

impl ColorRule {
    pub fn new(keyword: &str, red: ChannelRange, green: ChannelRange, blue: ChannelRange) -> Self {
        Self { keyword: keyword.to_lowercase(), red, green, blue }
    }

    pub fn accepts(&self, r: u8, g: u8, b: u8) -> bool {
        self.red.contains(r) && self.green.contains(g) && self.blue.contains(b)
    }
}

/// Ordered keyword rules. Lookups are case-insensitive; the first rule
/// registered for a keyword wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeRegistry {
    #[serde(default)]
    pub feature_rules: Vec<FeatureRule>,
    #[serde(default)]
    pub color_rules: Vec<ColorRule>,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        let yellow = |kw: &str| {
            ColorRule::new(kw, ChannelRange::above(200), ChannelRange::above(150), ChannelRange::below(100))
        };
        let blue = |kw: &str| {
            ColorRule::new(kw, ChannelRange::below(100), ChannelRange::above(100), ChannelRange::above(200))
        };
        let green = |kw: &str| {
            ColorRule::new(kw, ChannelRange::below(150), ChannelRange::above(100), ChannelRange::below(150))
        };
        let dark = |kw: &str| {
            ColorRule::new(kw, ChannelRange::below(50), ChannelRange::below(50), ChannelRange::below(100))
        };

        Self {
            feature_rules: vec![
                FeatureRule::ink("chat", 0.1),
                FeatureRule::color("soleil", 0.05),
                FeatureRule::ink("maison", 0.15),
                FeatureRule::ink("arbre", 0.2),
                FeatureRule::ink("cat", 0.1),
                FeatureRule::color("sun", 0.05),
                FeatureRule::ink("house", 0.15),
                FeatureRule::ink("tree", 0.2),
            ],
            color_rules: vec![
                yellow("soleil"),
                blue("ciel"),
                green("arbre"),
                dark("nuit"),
                yellow("sun"),
                blue("sky"),
                green("tree"),
                dark("night"),
            ],
        }
    }
}

impl ThemeRegistry {
    pub fn empty() -> Self {
        Self { feature_rules: Vec::new(), color_rules: Vec::new() }
    }

    pub fn register_feature_rule(&mut self, mut rule: FeatureRule) {
        rule.keyword = rule.keyword.to_lowercase();
        self.feature_rules.push(rule);
    }

    pub fn register_color_rule(&mut self, mut rule: ColorRule) {
        rule.keyword = rule.keyword.to_lowercase();
        self.color_rules.push(rule);
    }

    pub fn feature_rule(&self, token: &str) -> Option<&FeatureRule> {
        self.feature_rules.iter().find(|r| keyword_matches(&r.keyword, token))
    }

    /// First color rule (in registration order) whose keyword occurs anywhere
    /// in the case-folded theme, so "arc-en-ciel" and "l'arbre" match too.
    pub fn color_rule_for(&self, theme: &str) -> Option<&ColorRule> {
        let theme = theme.to_lowercase();
        self.color_rules
            .iter()
            .find(|r| !r.keyword.is_empty() && theme.contains(&r.keyword.to_lowercase()))
    }

    pub fn validate(&self) -> Result<()> {
        for rule in &self.feature_rules {
            if rule.keyword.trim().is_empty() {
                return Err(ScoringError::InvalidConfig("feature rule with empty keyword".into()));
            }
            if rule.min_ink_density.is_none() && rule.min_color_density.is_none() {
                return Err(ScoringError::InvalidConfig(format!(
                    "feature rule '{}' has no density bound",
                    rule.keyword
                )));
            }
        }
        for rule in &self.color_rules {
            if rule.keyword.trim().is_empty() {
                return Err(ScoringError::InvalidConfig("color rule with empty keyword".into()));
            }
        }
        Ok(())
    }
}

fn keyword_matches(keyword: &str, token: &str) -> bool {
    keyword.to_lowercase() == token.to_lowercase()
}
