//! # Match Session
//!
//! In-memory bookkeeping of one relay match: registered players, the current
//! round and theme, and the ordered contribution log.
//!
//! ## Round flow
//!
//! ```text
//! new ──► submit / score_round ──► end_round ──► NextRound ──► ...
//!                                      └──────► Finished ──► final_results
//! ```
//!
//! Players keep their registration order for the whole match; it is the
//! tie-break order used by the ranking.

use std::collections::HashSet;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::theme_pool::{ThemePool, ThemeRotation};
use crate::engine::config::ScoringConfig;
use crate::engine::ids::{Clock, IdProvider, SystemClock, UuidIds};
use crate::engine::ranking::finalize_match;
use crate::engine::scoring::{apply_analysis, ContributionAnalysis, ScoringEngine};
use crate::error::{Result, ScoringError};
use crate::models::{Contribution, MatchResult, Player, PlayerSnapshot, Raster, TraceEvent};

pub const DEFAULT_MAX_ROUNDS: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub max_rounds: u32,
    pub rotation: ThemeRotation,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { max_rounds: DEFAULT_MAX_ROUNDS, rotation: ThemeRotation::Fixed }
    }
}

/// One player's drawing for the current round.
#[derive(Debug, Clone)]
pub struct Submission {
    pub player_id: String,
    pub events: Vec<TraceEvent>,
    pub before: Arc<Raster>,
    pub after: Arc<Raster>,
}

impl Submission {
    pub fn new(
        player_id: impl Into<String>,
        events: Vec<TraceEvent>,
        before: impl Into<Arc<Raster>>,
        after: impl Into<Arc<Raster>>,
    ) -> Self {
        Self { player_id: player_id.into(), events, before: before.into(), after: after.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RoundOutcome {
    NextRound { round: u32, theme: String },
    Finished,
}

/// Match state: theme, round counter, players, contribution log.
#[derive(Debug, Clone, Serialize)]
pub struct MatchState {
    pub theme: String,
    pub current_round: u32,
    pub max_rounds: u32,
    /// Registration order
    pub players: Vec<Player>,
    /// Every scored contribution, in scoring order
    pub contributions: Vec<Contribution>,
    pub finished: bool,
}

impl MatchState {
    fn player_index(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id() == player_id)
    }
}

/// Contribution ready for analysis.
struct Pending {
    player_idx: usize,
    contribution: Contribution,
    before: Arc<Raster>,
    after: Arc<Raster>,
}

pub struct MatchSession {
    state: MatchState,
    engine: ScoringEngine,
    ids: Box<dyn IdProvider>,
    clock: Box<dyn Clock>,
    theme_pool: Option<ThemePool>,
    /// Players already scored this round
    submitted: HashSet<String>,
    /// Log index where the current round starts
    round_start: usize,
}

impl MatchSession {
    pub fn new(config: ScoringConfig, players: Vec<Player>, theme: impl Into<String>) -> Result<Self> {
        if players.is_empty() {
            return Err(ScoringError::NoPlayers);
        }
        let mut seen = HashSet::new();
        for player in &players {
            if !seen.insert(player.id().to_string()) {
                return Err(ScoringError::DuplicatePlayer { player_id: player.id().to_string() });
            }
        }

        let theme = theme.into();
        info!(players = players.len(), theme = %theme, "match session created");

        Ok(Self {
            state: MatchState {
                theme,
                current_round: 1,
                max_rounds: DEFAULT_MAX_ROUNDS,
                players,
                contributions: Vec::new(),
                finished: false,
            },
            engine: ScoringEngine::new(config),
            ids: Box::new(UuidIds),
            clock: Box::new(SystemClock),
            theme_pool: None,
            submitted: HashSet::new(),
            round_start: 0,
        })
    }

    /// `Fixed` rotation leaves any pool set by [`Self::with_theme_pool`] in place.
    pub fn with_session_config(mut self, config: SessionConfig) -> Self {
        self.state.max_rounds = config.max_rounds.max(1);
        if let ThemeRotation::Random { seed } = config.rotation {
            self.theme_pool = Some(ThemePool::new(seed));
        }
        self
    }

    pub fn with_theme_pool(mut self, pool: ThemePool) -> Self {
        self.theme_pool = Some(pool);
        self
    }

    pub fn with_ids(mut self, ids: impl IdProvider + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn theme(&self) -> &str {
        &self.state.theme
    }

    pub fn current_round(&self) -> u32 {
        self.state.current_round
    }

    pub fn max_rounds(&self) -> u32 {
        self.state.max_rounds
    }

    pub fn is_finished(&self) -> bool {
        self.state.finished
    }

    pub fn players(&self) -> &[Player] {
        &self.state.players
    }

    pub fn contributions(&self) -> &[Contribution] {
        &self.state.contributions
    }

    /// Override the current round's prompt.
    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.state.theme = theme.into();
        debug!(round = self.state.current_round, theme = %self.state.theme, "theme set");
    }

    fn prepare(&self, submission: Submission, claimed: &mut HashSet<String>) -> Result<Pending> {
        if self.state.finished {
            return Err(ScoringError::MatchFinished { max_rounds: self.state.max_rounds });
        }
        let player_idx = self
            .state
            .player_index(&submission.player_id)
            .ok_or_else(|| ScoringError::UnknownPlayer { player_id: submission.player_id.clone() })?;
        if self.submitted.contains(&submission.player_id) || !claimed.insert(submission.player_id.clone()) {
            return Err(ScoringError::DuplicateSubmission {
                player_id: submission.player_id,
                round: self.state.current_round,
            });
        }

        let contribution = Contribution::new(
            self.ids.next_id(),
            submission.player_id,
            self.state.current_round,
            self.state.theme.clone(),
            self.clock.now(),
            &submission.events,
        );
        Ok(Pending { player_idx, contribution, before: submission.before, after: submission.after })
    }

    /// Earlier rounds' contributions.
    fn history(&self) -> &[Contribution] {
        &self.state.contributions[..self.round_start]
    }

    fn commit(&mut self, pending: Pending, analysis: ContributionAnalysis) -> Contribution {
        let Pending { player_idx, mut contribution, before, after } = pending;
        apply_analysis(&mut contribution, &mut self.state.players[player_idx], analysis, before, after);
        self.submitted.insert(contribution.player_id().to_string());
        self.state.contributions.push(contribution.clone());
        contribution
    }

    /// Score one submission for the current round.
    pub fn submit(
        &mut self,
        player_id: &str,
        events: &[TraceEvent],
        before: impl Into<Arc<Raster>>,
        after: impl Into<Arc<Raster>>,
    ) -> Result<Contribution> {
        let submission = Submission::new(player_id, events.to_vec(), before, after);
        let pending = self.prepare(submission, &mut HashSet::new())?;
        let analysis =
            self.engine.analyze(&pending.contribution, &pending.before, &pending.after, self.history())?;
        Ok(self.commit(pending, analysis))
    }

    /// Score a batch of submissions for the current round.
    ///
    /// Analysis runs in parallel; results fold into players in submission
    /// order. Each entry of the returned vector belongs to the submission at
    /// the same index, and a failed submission leaves the others untouched.
    pub fn score_round(&mut self, submissions: Vec<Submission>) -> Vec<Result<Contribution>> {
        let total = submissions.len();
        let mut claimed = HashSet::new();
        let pending: Vec<Result<Pending>> =
            submissions.into_iter().map(|s| self.prepare(s, &mut claimed)).collect();

        let engine = &self.engine;
        let history = self.history();
        let analyzed: Vec<Result<(Pending, ContributionAnalysis)>> = pending
            .into_par_iter()
            .map(|p| -> Result<(Pending, ContributionAnalysis)> {
                let p = p?;
                let analysis = engine.analyze(&p.contribution, &p.before, &p.after, history)?;
                Ok((p, analysis))
            })
            .collect();

        let results: Vec<Result<Contribution>> = analyzed
            .into_iter()
            .map(|entry| entry.map(|(p, analysis)| self.commit(p, analysis)))
            .collect();

        let scored = results.iter().filter(|r| r.is_ok()).count();
        info!(round = self.state.current_round, submissions = total, scored, "round scored");
        if scored < total {
            warn!(round = self.state.current_round, failed = total - scored, "some submissions were rejected");
        }
        results
    }

    /// Every registered player has a scored contribution this round.
    pub fn round_complete(&self) -> bool {
        self.state.players.iter().all(|p| self.submitted.contains(p.id()))
    }

    /// Close the current round.
    pub fn end_round(&mut self) -> Result<RoundOutcome> {
        if self.state.finished {
            return Err(ScoringError::MatchFinished { max_rounds: self.state.max_rounds });
        }
        if !self.round_complete() {
            warn!(
                round = self.state.current_round,
                submitted = self.submitted.len(),
                players = self.state.players.len(),
                "round closed before every player submitted"
            );
        }

        if self.state.current_round >= self.state.max_rounds {
            self.state.finished = true;
            info!(rounds = self.state.current_round, "match finished");
            return Ok(RoundOutcome::Finished);
        }

        self.state.current_round += 1;
        self.round_start = self.state.contributions.len();
        self.submitted.clear();
        if let Some(pool) = self.theme_pool.as_mut() {
            self.state.theme = pool.draw();
        }

        info!(round = self.state.current_round, theme = %self.state.theme, "round started");
        Ok(RoundOutcome::NextRound {
            round: self.state.current_round,
            theme: self.state.theme.clone(),
        })
    }

    pub fn player_snapshot(&self, player_id: &str) -> Result<PlayerSnapshot> {
        self.state
            .player_index(player_id)
            .map(|idx| self.state.players[idx].snapshot())
            .ok_or_else(|| ScoringError::UnknownPlayer { player_id: player_id.to_string() })
    }

    /// Live leaderboard: total descending, registration order on ties.
    pub fn standings(&self) -> Vec<PlayerSnapshot> {
        let mut snapshots: Vec<PlayerSnapshot> = self.state.players.iter().map(Player::snapshot).collect();
        snapshots.sort_by(|a, b| b.score_total.total_cmp(&a.score_total));
        snapshots
    }

    /// Rank the match and write titles and badges back onto the players.
    ///
    /// Can be called again; later calls replace earlier awards.
    pub fn final_results(&mut self) -> Result<MatchResult> {
        let standings = finalize_match(&self.state.players, &self.engine.config().ranking)?;

        for ranked in &standings.ranked_players {
            if let Some(idx) = self.state.player_index(&ranked.player.id) {
                self.state.players[idx].set_awards(ranked.titles.clone(), ranked.badges.clone());
            }
        }

        let rounds_played = self.state.contributions.iter().map(Contribution::round).max().unwrap_or(0);
        Ok(MatchResult::from_standings(standings, self.state.contributions.clone(), rounds_played))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ids::{FixedClock, SequentialIds};
    use crate::models::raster::BLACK;
    use crate::models::Title;
    use chrono::{TimeZone, Utc};

    fn session(ids: &[&str]) -> MatchSession {
        let players = ids.iter().map(|id| Player::new(*id, id.to_uppercase())).collect();
        MatchSession::new(ScoringConfig::default(), players, "Un robot qui danse")
            .unwrap()
            .with_ids(SequentialIds::new())
            .with_clock(FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()))
    }

    fn stroke() -> Vec<TraceEvent> {
        (0..20).map(|i| TraceEvent::new(i as f64 * 2.0, 10.0, i as f64 * 16.0)).collect()
    }

    fn canvas() -> Raster {
        Raster::blank(60, 60)
    }

    fn edit(x: u32) -> Raster {
        canvas().with_rect(x, 0, 20, 20, BLACK)
    }

    #[test]
    fn test_new_rejects_duplicates_and_empty() {
        let dup = vec![Player::new("a", "A"), Player::new("a", "A2")];
        assert!(matches!(
            MatchSession::new(ScoringConfig::default(), dup, "").err(),
            Some(ScoringError::DuplicatePlayer { .. })
        ));
        assert!(matches!(
            MatchSession::new(ScoringConfig::default(), Vec::new(), "").err(),
            Some(ScoringError::NoPlayers)
        ));
    }

    #[test]
    fn test_submit_scores_and_logs() {
        let mut s = session(&["a", "b"]);
        let c = s.submit("a", &stroke(), canvas(), edit(0)).unwrap();
        assert_eq!(c.id(), "contrib_1");
        assert_eq!(c.round(), 1);
        assert_eq!(c.theme(), "Un robot qui danse");
        assert!(c.is_scored());
        assert_eq!(s.contributions().len(), 1);
        assert_eq!(s.player_snapshot("a").unwrap().contribution_count, 1);
        assert!(!s.round_complete());
    }

    #[test]
    fn test_submit_errors() {
        let mut s = session(&["a"]);
        assert!(matches!(
            s.submit("zz", &[], canvas(), canvas()).unwrap_err(),
            ScoringError::UnknownPlayer { .. }
        ));
        s.submit("a", &[], canvas(), canvas()).unwrap();
        assert!(matches!(
            s.submit("a", &[], canvas(), canvas()).unwrap_err(),
            ScoringError::DuplicateSubmission { round: 1, .. }
        ));
    }

    #[test]
    fn test_failed_submission_can_be_retried() {
        let mut s = session(&["a"]);
        let err = s.submit("a", &[], canvas(), Raster::blank(10, 10)).unwrap_err();
        assert!(err.is_input_error());
        assert_eq!(s.player_snapshot("a").unwrap().contribution_count, 0);
        assert!(s.submit("a", &[], canvas(), edit(0)).is_ok());
    }

    #[test]
    fn test_rounds_advance_until_finished() {
        let mut s = session(&["a"]).with_session_config(SessionConfig { max_rounds: 2, ..Default::default() });
        s.submit("a", &stroke(), canvas(), edit(0)).unwrap();
        assert!(s.round_complete());
        assert_eq!(
            s.end_round().unwrap(),
            RoundOutcome::NextRound { round: 2, theme: "Un robot qui danse".into() }
        );
        assert!(!s.round_complete());
        s.submit("a", &stroke(), edit(0), edit(20)).unwrap();
        assert_eq!(s.end_round().unwrap(), RoundOutcome::Finished);
        assert!(s.is_finished());
        assert!(matches!(
            s.submit("a", &[], canvas(), canvas()).unwrap_err(),
            ScoringError::MatchFinished { max_rounds: 2 }
        ));
        assert!(s.end_round().is_err());
    }

    #[test]
    fn test_random_rotation_is_seeded() {
        let config = SessionConfig { max_rounds: 4, rotation: ThemeRotation::Random { seed: 9 } };
        let themes = |mut s: MatchSession| {
            (0..3)
                .map(|_| match s.end_round().unwrap() {
                    RoundOutcome::NextRound { theme, .. } => theme,
                    RoundOutcome::Finished => String::new(),
                })
                .collect::<Vec<_>>()
        };
        let first = themes(session(&["a"]).with_session_config(config.clone()));
        let second = themes(session(&["a"]).with_session_config(config));
        assert_eq!(first, second);
        assert!(first.iter().all(|t| !t.is_empty()));
    }

    #[test]
    fn test_fixed_rotation_keeps_custom_pool() {
        let pool = ThemePool::with_prompts(vec!["Un dragon".to_string()], 1);
        let mut s = session(&["a"])
            .with_theme_pool(pool)
            .with_session_config(SessionConfig { max_rounds: 3, rotation: ThemeRotation::Fixed });

        assert_eq!(s.max_rounds(), 3);
        match s.end_round().unwrap() {
            RoundOutcome::NextRound { round, theme } => {
                assert_eq!(round, 2);
                assert_eq!(theme, "Un dragon");
            }
            RoundOutcome::Finished => panic!("match ended after one of three rounds"),
        }
    }

    #[test]
    fn test_set_theme_applies_to_next_submission() {
        let mut s = session(&["a"]);
        s.set_theme("Un chat dans l'espace");
        let c = s.submit("a", &[], canvas(), edit(0)).unwrap();
        assert_eq!(c.theme(), "Un chat dans l'espace");
    }

    #[test]
    fn test_twist_only_after_first_round() {
        let config = SessionConfig { max_rounds: 2, ..Default::default() };
        let mut s = session(&["a", "b"]).with_session_config(config);
        let before = Raster::blank(100, 100);
        let big = before.with_rect(0, 0, 100, 45, [200, 30, 30, 255]);

        let first = s.submit("a", &[], before.clone(), big.clone()).unwrap();
        s.submit("b", &[], before.clone(), edit(0)).unwrap();
        s.end_round().unwrap();
        let second = s.submit("a", &[], before, big).unwrap();

        assert!((second.scores().creativity() - first.scores().creativity() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_score_round_keeps_submission_order() {
        let mut s = session(&["a", "b", "c"]);
        let batch = vec![
            Submission::new("c", stroke(), canvas(), edit(40)),
            Submission::new("a", stroke(), canvas(), edit(0)),
            Submission::new("ghost", stroke(), canvas(), edit(0)),
            Submission::new("a", stroke(), canvas(), edit(20)),
            Submission::new("b", stroke(), canvas(), Raster::blank(5, 5)),
        ];
        let results = s.score_round(batch);

        assert_eq!(results.len(), 5);
        assert_eq!(results[0].as_ref().unwrap().player_id(), "c");
        assert_eq!(results[1].as_ref().unwrap().player_id(), "a");
        assert!(matches!(results[2], Err(ScoringError::UnknownPlayer { .. })));
        assert!(matches!(results[3], Err(ScoringError::DuplicateSubmission { .. })));
        assert!(matches!(results[4], Err(ScoringError::DimensionMismatch { .. })));

        let logged: Vec<&str> = s.contributions().iter().map(|c| c.player_id()).collect();
        assert_eq!(logged, vec!["c", "a"]);
        assert!(!s.round_complete());
        assert!(s.submit("b", &[], canvas(), edit(0)).is_ok());
        assert!(s.round_complete());
    }

    #[test]
    fn test_standings_order() {
        let mut s = session(&["a", "b"]);
        s.submit("a", &[], canvas(), canvas()).unwrap();
        s.submit("b", &stroke(), canvas(), edit(0)).unwrap();
        let standings = s.standings();
        assert_eq!(standings.len(), 2);
        assert!(standings[0].score_total >= standings[1].score_total);
    }

    #[test]
    fn test_final_results_write_awards_back() {
        let mut s = session(&["a", "b"]);
        s.submit("a", &stroke(), canvas(), edit(0)).unwrap();
        s.submit("b", &[], canvas(), canvas()).unwrap();

        let result = s.final_results().unwrap();
        assert_eq!(result.rounds_played, 1);
        assert_eq!(result.all_contributions.len(), 2);
        assert_eq!(result.ranked_players.len(), 2);

        let winner = s.players().iter().find(|p| p.id() == result.winner).unwrap();
        assert!(winner.titles().contains(&Title::TopScorer));

        let again = s.final_results().unwrap();
        assert_eq!(again.title_assignments, result.title_assignments);
        let titles: usize = s.players().iter().map(|p| p.titles().len()).sum();
        assert_eq!(titles, Title::ALL.len());
    }
}
