//! # Scoring Engine
//!
//! Orchestration on top of the pure analyzers:
//!
//! - `config` - Tunable thresholds and the theme keyword registry
//! - `scoring` - One contribution: analyze, compose, fold into its player
//! - `ranking` - Match end: leaderboard, titles, badges
//! - `ids` - Injected id and clock providers

pub mod config;
pub mod ids;
pub mod ranking;
pub mod scoring;

pub use config::ScoringConfig;
pub use ids::{Clock, FixedClock, IdProvider, SequentialIds, SystemClock, UuidIds};
pub use ranking::{badges_for, finalize_match};
pub use scoring::{ContributionAnalysis, ScoringEngine};
