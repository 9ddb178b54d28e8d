use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::config::ScoringConfig;
use crate::engine::ids::{Clock, IdProvider, SystemClock, UuidIds};
use crate::engine::ScoringEngine;
use crate::models::{Contribution, Player, Raster, TraceEvent};
use crate::session::{MatchSession, SessionConfig, Submission, DEFAULT_MAX_ROUNDS};

pub const SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub schema_version: u8,
    #[serde(default)]
    pub theme: String,
    /// Round limit; defaults to 3
    #[serde(default)]
    pub max_rounds: Option<u32>,
    pub players: Vec<PlayerData>,
    pub rounds: Vec<RoundData>,
    /// Overrides the defaults (and `DRAWCHAIN_SCORING_CONFIG`) when present
    #[serde(default)]
    pub config: Option<ScoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerData {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundData {
    /// Theme for this round; the previous one is kept when absent
    #[serde(default)]
    pub theme: Option<String>,
    pub submissions: Vec<SubmissionData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionData {
    pub player_id: String,
    #[serde(default)]
    pub trace: Vec<TraceEvent>,
    pub before: Raster,
    pub after: Raster,
}

/// Stand-alone scoring of a single submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionRequest {
    pub schema_version: u8,
    #[serde(default)]
    pub theme: String,
    #[serde(default = "default_player_id")]
    pub player_id: String,
    #[serde(default = "default_round")]
    pub round: u32,
    #[serde(default)]
    pub trace: Vec<TraceEvent>,
    pub before: Raster,
    pub after: Raster,
    #[serde(default)]
    pub config: Option<ScoringConfig>,
}

fn default_player_id() -> String {
    "player".to_string()
}

fn default_round() -> u32 {
    1
}

fn check_schema(version: u8) -> Result<(), String> {
    if version != SCHEMA_VERSION {
        return Err(format!("Unsupported schema version: {}", version));
    }
    Ok(())
}

fn resolve_config(config: Option<ScoringConfig>) -> Result<ScoringConfig, String> {
    match config {
        Some(config) => {
            config.validate().map_err(|e| format!("Invalid config: {}", e))?;
            Ok(config)
        }
        None => Ok(ScoringConfig::from_env_or_default()),
    }
}

/// Evaluate a whole match and return the serialized `MatchResult`.
pub fn evaluate_match_json(request_json: &str) -> Result<String, String> {
    let request: EvaluateRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {}", e))?;
    check_schema(request.schema_version)?;

    let EvaluateRequest { theme, max_rounds, players, rounds, config, .. } = request;
    let config = resolve_config(config)?;

    let max_rounds = max_rounds.unwrap_or(DEFAULT_MAX_ROUNDS);
    if rounds.len() > max_rounds as usize {
        return Err(format!(
            "Request has {} rounds but max_rounds is {}",
            rounds.len(),
            max_rounds
        ));
    }

    let players = players.into_iter().map(|p| Player::new(p.id, p.name)).collect();
    let mut session = MatchSession::new(config, players, theme)
        .map_err(|e| format!("Invalid match setup: {}", e))?
        .with_session_config(SessionConfig { max_rounds, ..Default::default() });

    for (idx, round) in rounds.into_iter().enumerate() {
        if idx > 0 {
            session.end_round().map_err(|e| format!("Cannot start round {}: {}", idx + 1, e))?;
        }
        if let Some(theme) = round.theme {
            session.set_theme(theme);
        }

        let submissions: Vec<Submission> = round
            .submissions
            .into_iter()
            .map(|s| Submission::new(s.player_id, s.trace, s.before, s.after))
            .collect();
        for result in session.score_round(submissions) {
            result.map_err(|e| format!("Round {} rejected a submission: {}", idx + 1, e))?;
        }
    }

    let result = session.final_results().map_err(|e| format!("Cannot finalize match: {}", e))?;
    debug!(winner = %result.winner, rounds = result.rounds_played, "match evaluated");

    serde_json::to_string(&result).map_err(|e| format!("Failed to serialize result: {}", e))
}

/// Score one submission outside of a match and return the scored contribution.
pub fn score_contribution_json(request_json: &str) -> Result<String, String> {
    score_contribution_with(request_json, &UuidIds, &SystemClock)
}

fn score_contribution_with(
    request_json: &str,
    ids: &dyn IdProvider,
    clock: &dyn Clock,
) -> Result<String, String> {
    let request: ContributionRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid JSON request: {}", e))?;
    check_schema(request.schema_version)?;

    let engine = ScoringEngine::new(resolve_config(request.config)?);
    let mut player = Player::new(request.player_id.clone(), request.player_id.clone());
    let mut contribution = Contribution::new(
        ids.next_id(),
        request.player_id,
        request.round,
        request.theme,
        clock.now(),
        &request.trace,
    );

    engine
        .score_contribution(&mut contribution, &mut player, request.before, request.after, &[])
        .map_err(|e| format!("Scoring failed: {}", e))?;

    serde_json::to_string(&contribution).map_err(|e| format!("Failed to serialize result: {}", e))
}
