//! Data model shared by the analyzers, the scoring engine and the session layer.

pub mod contribution;
pub mod match_result;
pub mod player;
pub mod raster;
pub mod trace;

pub use contribution::{clamp_unit, AnalysisMetadata, CategoryScores, ChaosKind, Contribution};
pub use match_result::{
    Badge, MatchResult, MatchStandings, RankedPlayer, Title, TitleAssignment,
};
pub use player::{
    recompute_aggregate, CategoryAverages, Player, PlayerAggregate, PlayerSnapshot,
};
pub use raster::{Raster, RasterData};
pub use trace::{Trace, TraceEvent, TraceMetrics, TracePoint};
