//! # Session Module
//!
//! Match lifecycle on top of the scoring engine: player registration, rounds,
//! theme rotation, final results.

pub mod match_session;
pub mod theme_pool;

pub use match_session::{
    MatchSession, MatchState, RoundOutcome, SessionConfig, Submission, DEFAULT_MAX_ROUNDS,
};
pub use theme_pool::{ThemePool, ThemeRotation, DEFAULT_PROMPTS};
