//! # Theme Fidelity
//!
//! Heuristic stand-in for real image understanding. The score starts neutral
//! and moves only when a theme keyword has a registered rule:
//!
//! - keyword feature rules test ink / color density of the after-image
//! - one color rule tests the dominant quantized colors
//!
//! Themes nothing matches keep the neutral base score. This is a weak signal
//! by construction and says nothing about what was actually drawn.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::engine::config::ThemeConfig;
use crate::models::{clamp_unit, Raster};

/// Cheap whole-image features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageFeatures {
    /// Share of visible, non-near-white pixels
    pub ink_density: f64,
    /// Share of visible pixels that are neither near-white nor near-black
    pub color_density: f64,
}

/// Quantized color and how many pixels fell into its bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DominantColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub count: u64,
}

/// Case-folded whitespace tokens of a theme.
pub fn tokenize(theme: &str) -> Vec<String> {
    theme.split_whitespace().map(str::to_lowercase).collect()
}

#[inline]
fn is_visible(px: &[u8], config: &ThemeConfig) -> bool {
    px[3] > config.visible_alpha_min
}

#[inline]
fn is_near_white(px: &[u8], config: &ThemeConfig) -> bool {
    px[..3].iter().all(|&c| c >= config.near_white_min)
}

#[inline]
fn is_near_black(px: &[u8], config: &ThemeConfig) -> bool {
    px[..3].iter().all(|&c| c < config.near_black_max)
}

pub fn extract_features(image: &Raster, config: &ThemeConfig) -> ImageFeatures {
    let total = image.pixel_count();
    if total == 0 {
        return ImageFeatures::default();
    }

    let mut ink = 0u64;
    let mut colored = 0u64;
    for px in image.pixels() {
        if is_visible(px, config) && !is_near_white(px, config) {
            ink += 1;
            if !is_near_black(px, config) {
                colored += 1;
            }
        }
    }

    ImageFeatures {
        ink_density: ink as f64 / total as f64,
        color_density: colored as f64 / total as f64,
    }
}

/// Most frequent quantized colors among visible, non-near-white pixels.
///
/// Equal counts are ordered by (r, g, b) so the result is deterministic.
pub fn dominant_colors(image: &Raster, config: &ThemeConfig) -> Vec<DominantColor> {
    let q = config.color_quantum.max(1);
    let mut counts: HashMap<(u8, u8, u8), u64> = HashMap::new();

    for px in image.pixels() {
        if is_visible(px, config) && !is_near_white(px, config) {
            let key = (px[0] / q * q, px[1] / q * q, px[2] / q * q);
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    let mut colors: Vec<DominantColor> = counts
        .into_iter()
        .map(|((r, g, b), count)| DominantColor { r, g, b, count })
        .collect();
    colors.sort_by(|a, b| b.count.cmp(&a.count).then((a.r, a.g, a.b).cmp(&(b.r, b.g, b.b))));
    colors.truncate(config.dominant_color_count);
    colors
}

/// Theme fidelity in [0, 1].
pub fn theme_fidelity(image: &Raster, theme: &str, config: &ThemeConfig) -> f64 {
    let tokens = tokenize(theme);
    if tokens.is_empty() {
        return clamp_unit(config.base_score);
    }

    let registry = &config.registry;
    let mut score = config.base_score;

    let features = extract_features(image, config);
    for token in &tokens {
        if let Some(rule) = registry.feature_rule(token) {
            if rule.holds(features.ink_density, features.color_density) {
                score += config.keyword_bonus;
            }
        }
    }

    if let Some(rule) = registry.color_rule_for(theme) {
        let colors = dominant_colors(image, config);
        if colors.iter().any(|c| rule.accepts(c.r, c.g, c.b)) {
            score += config.color_bonus;
        }
    }

    clamp_unit(score)
}
