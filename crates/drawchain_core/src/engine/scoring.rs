//! # Contribution Scoring
//!
//! Runs the four analyzers over one contribution and folds the result into
//! its player.
//!
//! ```text
//! trace ──► fluidity + variability ──► composite fluidity ─┐
//! before/after ──► visual ──► coherence ───────────────────┤
//! after + theme ──► theme fidelity ────────────────────────┼─► CategoryScores
//! visual + history ──► creativity, chaos ──────────────────┘
//! ```
//!
//! Analysis is pure ([`ScoringEngine::analyze`]) so batches can run it in
//! parallel. Nothing is written until the whole score vector exists, so a
//! failed analysis leaves the contribution and its player untouched.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::{creativity, theme, trace, visual, VisualAnalysis};
use crate::engine::config::ScoringConfig;
use crate::error::{Result, ScoringError};
use crate::models::{AnalysisMetadata, CategoryScores, ChaosKind, Contribution, Player, Raster, Trace};

/// Everything the analyzers derived from one contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionAnalysis {
    pub trace: Trace,
    pub variability: f64,
    pub visual: VisualAnalysis,
    pub chaos: ChaosKind,
    pub scores: CategoryScores,
}

impl ContributionAnalysis {
    pub fn metadata(&self) -> AnalysisMetadata {
        let cmp = &self.visual.comparison;
        AnalysisMetadata {
            modified_pixels: cmp.modified_pixels,
            modification_pct: cmp.modification_pct,
            destruction: self.visual.destruction,
            density: cmp.density,
            chaos: self.chaos,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Analyze a contribution without mutating anything.
    ///
    /// `history` holds the contributions drawn before this one; it only
    /// matters for twist detection.
    pub fn analyze(
        &self,
        contribution: &Contribution,
        before: &Raster,
        after: &Raster,
        history: &[Contribution],
    ) -> Result<ContributionAnalysis> {
        let cfg = &self.config;

        let visual = visual::analyze(before, after, &cfg.visual)?;

        let points = contribution.trace().points.clone();
        let metrics = trace::measure(&points, &cfg.trace);
        let variability = trace::variability_score(&points);
        let fluidity = trace::composite_fluidity(metrics.fluidity, variability, &cfg.trace);

        let theme_score = theme::theme_fidelity(after, contribution.theme(), &cfg.theme);
        let creativity_score = creativity::creativity_score(&visual, history, &cfg.creativity);
        let chaos = creativity::classify_chaos(&visual.comparison, &cfg.creativity);

        let scores = CategoryScores::new(fluidity, visual.coherence, theme_score, creativity_score);

        debug!(
            contribution_id = contribution.id(),
            player_id = contribution.player_id(),
            round = contribution.round(),
            modification_pct = visual.comparison.modification_pct,
            density = visual.comparison.density,
            destruction = visual.destruction,
            ?chaos,
            "contribution analyzed"
        );

        Ok(ContributionAnalysis { trace: Trace { points, metrics }, variability, visual, chaos, scores })
    }

    /// Score a contribution and append it to its player.
    pub fn score_contribution(
        &self,
        contribution: &mut Contribution,
        player: &mut Player,
        before: impl Into<Arc<Raster>>,
        after: impl Into<Arc<Raster>>,
        history: &[Contribution],
    ) -> Result<()> {
        check_scorable(contribution, player)?;
        let (before, after) = (before.into(), after.into());
        let analysis = self.analyze(contribution, &before, &after, history)?;
        apply_analysis(contribution, player, analysis, before, after);
        Ok(())
    }
}

/// Reject contributions that were scored already or belong to someone else.
pub(crate) fn check_scorable(contribution: &Contribution, player: &Player) -> Result<()> {
    if contribution.is_scored() {
        return Err(ScoringError::AlreadyScored { contribution_id: contribution.id().to_string() });
    }
    if contribution.player_id() != player.id() {
        return Err(ScoringError::PlayerMismatch {
            contribution_id: contribution.id().to_string(),
            expected: contribution.player_id().to_string(),
            found: player.id().to_string(),
        });
    }
    Ok(())
}

/// Persist a finished analysis. Infallible by construction.
pub(crate) fn apply_analysis(
    contribution: &mut Contribution,
    player: &mut Player,
    analysis: ContributionAnalysis,
    before: Arc<Raster>,
    after: Arc<Raster>,
) {
    let metadata = analysis.metadata();
    let scores = analysis.scores;
    contribution.record_scoring(analysis.trace, metadata, scores, before, after);
    player.add_contribution(contribution.clone());

    info!(
        contribution_id = contribution.id(),
        player_id = player.id(),
        round = contribution.round(),
        fluidity = scores.fluidity(),
        coherence = scores.coherence(),
        theme = scores.theme(),
        creativity = scores.creativity(),
        total = scores.total(),
        player_total = player.score_total(),
        "contribution scored"
    );
}
