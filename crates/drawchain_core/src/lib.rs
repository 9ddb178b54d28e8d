//! # drawchain_core - Relay Drawing Contribution Scoring Engine
//!
//! Scores player contributions in a relay-style collaborative drawing game.
//! Each player receives a partially drawn canvas, modifies it, and the change
//! is graded on four axes:
//!
//! - Fluidity: kinematics of the pointer trace
//! - Coherence: how the before/after pixels changed
//! - Theme: keyword and color heuristics against the prompt
//! - Creativity: meaningful change, twists, destruction
//!
//! Category scores are in [0, 1] and add up to a total in [0, 4]. Totals fold
//! into per-player aggregates, and at match end players are ranked and
//! awarded titles and badges.
//!
//! ## Features
//! - Pure analyzers, parallel per-round analysis
//! - Configurable thresholds and theme registry (YAML / JSON)
//! - Deterministic ranking with a documented tie-break
//! - JSON API for easy integration with game servers

pub mod analysis;
pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod session;

// Re-export main API functions
pub use api::{evaluate_match_json, score_contribution_json, EvaluateRequest, SCHEMA_VERSION};
pub use error::{Result, ScoringError};

pub use engine::{finalize_match, ScoringConfig, ScoringEngine};
pub use models::{
    CategoryScores, Contribution, MatchResult, Player, PlayerSnapshot, Raster, Title, TraceEvent,
};
pub use session::{MatchSession, RoundOutcome, SessionConfig, Submission, ThemeRotation};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
