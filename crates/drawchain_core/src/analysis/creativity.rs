//! # Creativity
//!
//! Rewards meaningful, focused change to the incoming drawing and the rare
//! "twist": a large reinterpretation that still reads coherently. Erasing the
//! previous work is penalized.
//!
//! Chaos classification rides along for display and never feeds the score.

use crate::analysis::visual::{ImageComparison, VisualAnalysis};
use crate::engine::config::CreativityConfig;
use crate::models::{clamp_unit, ChaosKind, Contribution};

/// Large, coherent, non-destructive change over an existing drawing.
///
/// Without earlier contributions there is nothing to reinterpret, so an empty
/// history never yields a twist.
pub fn detect_twist(
    visual: &VisualAnalysis,
    history: &[Contribution],
    config: &CreativityConfig,
) -> bool {
    !history.is_empty()
        && visual.comparison.modification_pct > config.twist_min_pct
        && !visual.destruction
        && visual.coherence > config.twist_min_coherence
}

/// Creativity in [0, 1].
pub fn creativity_score(
    visual: &VisualAnalysis,
    history: &[Contribution],
    config: &CreativityConfig,
) -> f64 {
    let pct = visual.comparison.modification_pct;
    let mut score = config.base_score;

    if pct > config.moderate_min_pct && pct < config.moderate_max_pct {
        score += config.moderate_bonus;
    }
    if visual.comparison.density > config.detail_density_min {
        score += config.detail_bonus;
    }
    if detect_twist(visual, history, config) {
        score += config.twist_bonus;
    }
    if visual.destruction {
        score -= config.destruction_penalty;
    }

    clamp_unit(score)
}

pub fn classify_chaos(cmp: &ImageComparison, config: &CreativityConfig) -> ChaosKind {
    if cmp.modification_pct > config.fun_chaos_min_pct && cmp.density > config.fun_chaos_min_density {
        ChaosKind::Fun
    } else if cmp.modification_pct > config.destructive_chaos_min_pct
        && cmp.density < config.destructive_chaos_max_density
    {
        ChaosKind::Destructive
    } else {
        ChaosKind::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contribution::test_support::scored_contribution;
    use proptest::prelude::*;

    fn visual(pct: f64, density: f64, destruction: bool, coherence: f64) -> VisualAnalysis {
        VisualAnalysis {
            comparison: ImageComparison {
                modification_pct: pct,
                density,
                ..Default::default()
            },
            destruction,
            coherence,
        }
    }

    fn history() -> Vec<Contribution> {
        vec![scored_contribution("p0", 1, [0.5; 4], 10.0)]
    }

    #[test]
    fn test_untouched_canvas_is_base_score() {
        let cfg = CreativityConfig::default();
        assert_eq!(creativity_score(&visual(0.0, 0.0, false, 1.0), &[], &cfg), 0.5);
    }

    #[test]
    fn test_moderate_dense_edit() {
        let cfg = CreativityConfig::default();
        // 0.5 + 0.3 + 0.2
        let score = creativity_score(&visual(20.0, 0.9, false, 1.0), &[], &cfg);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_moderate_window_is_exclusive() {
        let cfg = CreativityConfig::default();
        assert_eq!(creativity_score(&visual(10.0, 0.0, false, 1.0), &[], &cfg), 0.5);
        assert_eq!(creativity_score(&visual(40.0, 0.0, false, 1.0), &[], &cfg), 0.5);
    }

    #[test]
    fn test_twist_needs_history() {
        let cfg = CreativityConfig::default();
        let v = visual(45.0, 0.5, false, 0.65);
        assert!(!detect_twist(&v, &[], &cfg));
        assert!(detect_twist(&v, &history(), &cfg));
        assert_eq!(creativity_score(&v, &[], &cfg), 0.5);
        assert!((creativity_score(&v, &history(), &cfg) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_incoherent_change_is_no_twist() {
        let cfg = CreativityConfig::default();
        assert!(!detect_twist(&visual(45.0, 0.5, false, 0.5), &history(), &cfg));
    }

    #[test]
    fn test_destruction_penalized() {
        let cfg = CreativityConfig::default();
        let v = visual(90.0, 0.1, true, 0.0);
        assert!(!detect_twist(&v, &history(), &cfg));
        assert_eq!(creativity_score(&v, &history(), &cfg), 0.0);
    }

    #[test]
    fn test_chaos_classification() {
        let cfg = CreativityConfig::default();
        let cmp = |pct, density| ImageComparison { modification_pct: pct, density, ..Default::default() };
        assert_eq!(classify_chaos(&cmp(45.0, 0.8), &cfg), ChaosKind::Fun);
        assert_eq!(classify_chaos(&cmp(75.0, 0.1), &cfg), ChaosKind::Destructive);
        assert_eq!(classify_chaos(&cmp(45.0, 0.4), &cfg), ChaosKind::Normal);
        assert_eq!(classify_chaos(&cmp(5.0, 1.0), &cfg), ChaosKind::Normal);
    }

    proptest! {
        #[test]
        fn prop_creativity_in_unit_range(
            pct in 0.0f64..=100.0,
            density in 0.0f64..=1.0,
            destruction in any::<bool>(),
            coherence in 0.0f64..=1.0,
            with_history in any::<bool>(),
        ) {
            let cfg = CreativityConfig::default();
            let hist = if with_history { history() } else { Vec::new() };
            let score = creativity_score(&visual(pct, density, destruction, coherence), &hist, &cfg);
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }
}
