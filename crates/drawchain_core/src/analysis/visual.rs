//! # Visual Comparison
//!
//! Before/after pixel differencing for one contribution.
//!
//! ## Pipeline
//!
//! ```text
//! before ─┐
//!         ├─► per-pixel RGBA distance ─► modified mask ─┬─► modification %
//! after  ─┘                                            └─► block density
//!                                                            │
//!                          destruction flag ◄────────────────┤
//!                          coherence score  ◄────────────────┘
//! ```
//!
//! Density is the mean fill ratio of the blocks that contain at least one
//! modified pixel: one tight edit gives a high density, sparse speckles all
//! over the canvas give a low one.

use serde::{Deserialize, Serialize};

use crate::engine::config::VisualConfig;
use crate::error::{Result, ScoringError};
use crate::models::{clamp_unit, Raster};

/// Raw comparison of a before/after pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageComparison {
    pub modified_pixels: u64,
    pub total_pixels: u64,
    /// 0-100
    pub modification_pct: f64,
    /// Mean active-block intensity, 0-1
    pub density: f64,
    pub active_blocks: usize,
}

/// Comparison plus the verdicts derived from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualAnalysis {
    pub comparison: ImageComparison,
    pub destruction: bool,
    pub coherence: f64,
}

/// Euclidean distance between two RGBA pixels.
#[inline]
pub fn pixel_difference(a: &[u8], b: &[u8]) -> f64 {
    a.iter()
        .zip(b)
        .take(4)
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Per-pixel modified flags, row-major.
fn modified_mask(before: &Raster, after: &Raster, threshold: f64) -> Vec<bool> {
    before
        .pixels()
        .zip(after.pixels())
        .map(|(b, a)| pixel_difference(b, a) > threshold)
        .collect()
}

/// Mean intensity over blocks with at least one modified pixel.
///
/// Edge blocks are measured against their in-bounds area.
fn block_density(mask: &[bool], width: u32, height: u32, block_size: u32) -> (f64, usize) {
    let (w, h, bs) = (width as usize, height as usize, block_size.max(1) as usize);
    let mut intensity_sum = 0.0;
    let mut active = 0usize;

    for by in (0..h).step_by(bs) {
        let y_end = (by + bs).min(h);
        for bx in (0..w).step_by(bs) {
            let x_end = (bx + bs).min(w);
            let mut modified = 0usize;
            for y in by..y_end {
                let row = &mask[y * w + bx..y * w + x_end];
                modified += row.iter().filter(|&&m| m).count();
            }
            if modified > 0 {
                let area = (y_end - by) * (x_end - bx);
                intensity_sum += modified as f64 / area as f64;
                active += 1;
            }
        }
    }

    if active == 0 {
        (0.0, 0)
    } else {
        (intensity_sum / active as f64, active)
    }
}

/// Compare two same-size rasters.
///
/// Mismatched dimensions are rejected; nothing is cropped or resized.
pub fn compare_images(
    before: &Raster,
    after: &Raster,
    config: &VisualConfig,
) -> Result<ImageComparison> {
    if !before.same_dimensions(after) {
        return Err(ScoringError::DimensionMismatch {
            before_width: before.width(),
            before_height: before.height(),
            after_width: after.width(),
            after_height: after.height(),
        });
    }

    let total_pixels = before.pixel_count() as u64;
    if total_pixels == 0 {
        return Ok(ImageComparison::default());
    }

    let mask = modified_mask(before, after, config.difference_threshold);
    let modified_pixels = mask.iter().filter(|&&m| m).count() as u64;
    let (density, active_blocks) =
        block_density(&mask, before.width(), before.height(), config.block_size);

    Ok(ImageComparison {
        modified_pixels,
        total_pixels,
        modification_pct: modified_pixels as f64 / total_pixels as f64 * 100.0,
        density,
        active_blocks,
    })
}

/// Whether the previous drawing was erased or painted over.
pub fn detect_destruction(cmp: &ImageComparison, config: &VisualConfig) -> bool {
    if cmp.modification_pct > config.destruction_pct {
        return true;
    }
    // Wide, thin change over the canvas
    cmp.density < config.diffuse_density_max && cmp.modification_pct > config.diffuse_pct
}

/// Coherence in [0, 1]. Destruction forces 0.
pub fn coherence_score(cmp: &ImageComparison, destruction: bool, config: &VisualConfig) -> f64 {
    if destruction {
        return 0.0;
    }

    let mut score = 1.0;
    if cmp.modification_pct > config.chaotic_pct {
        score -= config.chaotic_penalty;
    }
    score += cmp.density * config.density_bonus_weight;
    if (config.sweet_spot_min_pct..=config.sweet_spot_max_pct).contains(&cmp.modification_pct) {
        score += config.sweet_spot_bonus;
    }

    clamp_unit(score)
}

/// Full visual pass: comparison, destruction, coherence.
pub fn analyze(before: &Raster, after: &Raster, config: &VisualConfig) -> Result<VisualAnalysis> {
    let comparison = compare_images(before, after, config)?;
    let destruction = detect_destruction(&comparison, config);
    let coherence = coherence_score(&comparison, destruction, config);
    Ok(VisualAnalysis { comparison, destruction, coherence })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::raster::BLACK;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn cfg() -> VisualConfig {
        VisualConfig::default()
    }

    #[test]
    fn test_identical_images() {
        let canvas = Raster::blank(100, 100);
        let analysis = analyze(&canvas, &canvas, &cfg()).unwrap();
        assert_eq!(analysis.comparison.modified_pixels, 0);
        assert_eq!(analysis.comparison.modification_pct, 0.0);
        assert_eq!(analysis.comparison.density, 0.0);
        assert!(!analysis.destruction);
        assert_eq!(analysis.coherence, 1.0);
    }

    #[test]
    fn test_black_block_on_white() {
        let before = Raster::blank(100, 100);
        let after = before.with_rect(40, 40, 20, 20, BLACK);
        let analysis = analyze(&before, &after, &cfg()).unwrap();

        assert_eq!(analysis.comparison.modified_pixels, 400);
        assert!((analysis.comparison.modification_pct - 4.0).abs() < 1e-9);
        assert_eq!(analysis.comparison.active_blocks, 1);
        assert!((analysis.comparison.density - 1.0).abs() < 1e-12);
        assert!(!analysis.destruction);
        assert_eq!(analysis.coherence, 1.0);
    }

    #[test]
    fn test_unaligned_block_spreads_over_four_blocks() {
        let before = Raster::blank(100, 100);
        let after = before.with_rect(30, 30, 20, 20, BLACK);
        let cmp = compare_images(&before, &after, &cfg()).unwrap();
        assert_eq!(cmp.modified_pixels, 400);
        assert_eq!(cmp.active_blocks, 4);
        assert!((cmp.density - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_edge_blocks_use_in_bounds_area() {
        // 30x30 canvas: blocks are 20x20, 10x20, 20x10, 10x10
        let before = Raster::blank(30, 30);
        let after = before.with_rect(20, 20, 10, 10, BLACK);
        let cmp = compare_images(&before, &after, &cfg()).unwrap();
        assert_eq!(cmp.active_blocks, 1);
        assert!((cmp.density - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_small_difference_below_threshold() {
        let before = Raster::filled(10, 10, [100, 100, 100, 255]);
        // sqrt(3 * 17^2) ~ 29.4
        let after = Raster::filled(10, 10, [117, 117, 117, 255]);
        let cmp = compare_images(&before, &after, &cfg()).unwrap();
        assert_eq!(cmp.modified_pixels, 0);
    }

    #[test]
    fn test_alpha_change_counts() {
        let before = Raster::filled(4, 4, [255, 255, 255, 255]);
        let after = Raster::filled(4, 4, [255, 255, 255, 200]);
        let cmp = compare_images(&before, &after, &cfg()).unwrap();
        assert_eq!(cmp.modified_pixels, 16);
    }

    #[test]
    fn test_dimension_mismatch_is_input_error() {
        let err = analyze(&Raster::blank(10, 10), &Raster::blank(10, 11), &cfg()).unwrap_err();
        assert!(matches!(err, ScoringError::DimensionMismatch { after_height: 11, .. }));
    }

    #[test]
    fn test_empty_canvas() {
        let empty = Raster::blank(0, 0);
        let analysis = analyze(&empty, &empty, &cfg()).unwrap();
        assert_eq!(analysis.comparison.total_pixels, 0);
        assert!(!analysis.destruction);
    }

    #[test]
    fn test_random_dispersed_change_is_destruction() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let before = Raster::blank(120, 120);
        let after = Raster::from_fn(120, 120, |_, _| {
            if rng.gen_bool(0.85) {
                [rng.gen_range(0..100), rng.gen_range(0..100), rng.gen_range(0..100), 255]
            } else {
                [255, 255, 255, 255]
            }
        });
        let analysis = analyze(&before, &after, &cfg()).unwrap();
        assert!(analysis.comparison.modification_pct > 80.0);
        assert!(analysis.destruction);
        assert_eq!(analysis.coherence, 0.0);
    }

    #[test]
    fn test_diffuse_half_canvas_is_destruction() {
        let cmp = ImageComparison { modification_pct: 55.0, density: 0.2, ..Default::default() };
        assert!(detect_destruction(&cmp, &cfg()));
        let dense = ImageComparison { modification_pct: 55.0, density: 0.9, ..Default::default() };
        assert!(!detect_destruction(&dense, &cfg()));
    }

    #[test]
    fn test_coherence_penalizes_heavy_edit() {
        let cmp = ImageComparison { modification_pct: 45.0, density: 0.5, ..Default::default() };
        // 1.0 - 0.5 + 0.15
        assert!((coherence_score(&cmp, false, &cfg()) - 0.65).abs() < 1e-12);
    }

    #[test]
    fn test_sweet_spot_is_inclusive() {
        let at_min = ImageComparison { modification_pct: 5.0, density: 0.0, ..Default::default() };
        let below = ImageComparison { modification_pct: 4.9, density: 0.0, ..Default::default() };
        // From a 1.0 base both clamp to 1.0, so keep the chaos penalty in play
        let heavy = VisualConfig { chaotic_pct: 0.0, ..cfg() };
        assert!((coherence_score(&at_min, false, &heavy) - 0.7).abs() < 1e-12);
        assert!((coherence_score(&below, false, &heavy) - 0.5).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_coherence_zero_when_destroyed(pct in 0.0f64..100.0, density in 0.0f64..1.0) {
            let cmp = ImageComparison { modification_pct: pct, density, ..Default::default() };
            let destruction = detect_destruction(&cmp, &cfg());
            let coherence = coherence_score(&cmp, destruction, &cfg());
            prop_assert!((0.0..=1.0).contains(&coherence));
            if destruction {
                prop_assert_eq!(coherence, 0.0);
            }
        }

        #[test]
        fn prop_modification_monotonic(n in 0u32..400, extra in 1u32..100) {
            let before = Raster::blank(20, 25);
            let paint = |count: u32| {
                Raster::from_fn(20, 25, |x, y| if y * 20 + x < count { BLACK } else { [255, 255, 255, 255] })
            };
            let fewer = compare_images(&before, &paint(n), &cfg()).unwrap();
            let more = compare_images(&before, &paint(n + extra), &cfg()).unwrap();
            prop_assert!(more.modification_pct > fewer.modification_pct);
        }
    }
}
