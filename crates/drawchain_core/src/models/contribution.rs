//! One player's submission for one round, with its analysis and scores.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::raster::Raster;
use super::trace::{Trace, TraceEvent, TracePoint};

/// Chaos flavour of a contribution. Informational only, never scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChaosKind {
    /// Heavy but concentrated change
    Fun,
    /// Heavy change scattered over the canvas
    Destructive,
    #[default]
    Normal,
}

/// Pixel-level findings of the visual comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub modified_pixels: u64,
    /// Share of modified pixels, 0-100
    pub modification_pct: f64,
    pub destruction: bool,
    /// Mean modified-pixel intensity over active blocks, 0-1
    pub density: f64,
    pub chaos: ChaosKind,
}

/// Four category scores in [0, 1] and their sum in [0, 4].
///
/// Fields are only reachable through [`CategoryScores::new`], so `total`
/// can never drift from the categories. Deserialization goes through `new`
/// as well and ignores any incoming `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CategoryScoresRecord")]
pub struct CategoryScores {
    fluidity: f64,
    coherence: f64,
    theme: f64,
    creativity: f64,
    total: f64,
}

impl CategoryScores {
    pub fn new(fluidity: f64, coherence: f64, theme: f64, creativity: f64) -> Self {
        let fluidity = clamp_unit(fluidity);
        let coherence = clamp_unit(coherence);
        let theme = clamp_unit(theme);
        let creativity = clamp_unit(creativity);
        Self {
            fluidity,
            coherence,
            theme,
            creativity,
            total: fluidity + coherence + theme + creativity,
        }
    }

    pub fn fluidity(&self) -> f64 {
        self.fluidity
    }

    pub fn coherence(&self) -> f64 {
        self.coherence
    }

    pub fn theme(&self) -> f64 {
        self.theme
    }

    pub fn creativity(&self) -> f64 {
        self.creativity
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}

#[derive(Deserialize)]
struct CategoryScoresRecord {
    fluidity: f64,
    coherence: f64,
    theme: f64,
    creativity: f64,
}

impl From<CategoryScoresRecord> for CategoryScores {
    fn from(r: CategoryScoresRecord) -> Self {
        CategoryScores::new(r.fluidity, r.coherence, r.theme, r.creativity)
    }
}

/// Clamp into [0, 1]; NaN collapses to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    id: String,
    player_id: String,
    round: u32,
    theme: String,
    created_at: DateTime<Utc>,
    #[serde(skip)]
    before_image: Option<Arc<Raster>>,
    #[serde(skip)]
    after_image: Option<Arc<Raster>>,
    trace: Trace,
    analysis: AnalysisMetadata,
    scores: CategoryScores,
    scored: bool,
}

impl Contribution {
    pub fn new(
        id: impl Into<String>,
        player_id: impl Into<String>,
        round: u32,
        theme: impl Into<String>,
        created_at: DateTime<Utc>,
        events: &[TraceEvent],
    ) -> Self {
        Self {
            id: id.into(),
            player_id: player_id.into(),
            round,
            theme: theme.into(),
            created_at,
            before_image: None,
            after_image: None,
            trace: Trace {
                points: events.iter().map(TracePoint::from).collect(),
                ..Trace::default()
            },
            analysis: AnalysisMetadata::default(),
            scores: CategoryScores::default(),
            scored: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn analysis(&self) -> &AnalysisMetadata {
        &self.analysis
    }

    pub fn scores(&self) -> &CategoryScores {
        &self.scores
    }

    pub fn is_scored(&self) -> bool {
        self.scored
    }

    pub fn before_image(&self) -> Option<&Raster> {
        self.before_image.as_deref()
    }

    pub fn after_image(&self) -> Option<&Raster> {
        self.after_image.as_deref()
    }

    /// Store the finished score vector. Called once by the scoring engine.
    pub(crate) fn record_scoring(
        &mut self,
        trace: Trace,
        analysis: AnalysisMetadata,
        scores: CategoryScores,
        before: Arc<Raster>,
        after: Arc<Raster>,
    ) {
        self.trace = trace;
        self.analysis = analysis;
        self.scores = scores;
        self.before_image = Some(before);
        self.after_image = Some(after);
        self.scored = true;
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_sum_of_clamped_categories() {
        let scores = CategoryScores::new(1.4, 0.5, -0.2, 0.25);
        assert_eq!(scores.fluidity(), 1.0);
        assert_eq!(scores.theme(), 0.0);
        assert!((scores.total() - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_deserialized_scores_are_clamped_and_resummed() {
        let json = r#"{"fluidity":2.0,"coherence":0.5,"theme":0.5,"creativity":0.5,"total":9.0}"#;
        let scores: CategoryScores = serde_json::from_str(json).unwrap();
        assert_eq!(scores.fluidity(), 1.0);
        assert!((scores.total() - 2.5).abs() < 1e-12);

        let round_trip: CategoryScores =
            serde_json::from_str(&serde_json::to_string(&scores).unwrap()).unwrap();
        assert_eq!(round_trip, scores);
    }

    #[test]
    fn test_nan_category_clamps_to_zero() {
        let scores = CategoryScores::new(f64::NAN, 1.0, 1.0, 1.0);
        assert_eq!(scores.fluidity(), 0.0);
        assert_eq!(scores.total(), 3.0);
    }

    #[test]
    fn test_new_contribution_is_unscored() {
        let events = [TraceEvent::new(0.0, 0.0, 0.0), TraceEvent::new(3.0, 4.0, 10.0)];
        let c = Contribution::new("c1", "p1", 1, "un chat", Utc::now(), &events);
        assert!(!c.is_scored());
        assert_eq!(c.trace().len(), 2);
        assert_eq!(c.trace().points[1].pressure, 1.0);
        assert!(c.after_image().is_none());
    }

    #[test]
    fn test_serialized_contribution_omits_pixels() {
        let c = Contribution::new("c1", "p1", 1, "", Utc::now(), &[]);
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("before_image").is_none());
        assert_eq!(json["scored"], false);
        assert_eq!(json["analysis"]["chaos"], "normal");
    }
}
