//! # Match Ranking
//!
//! Leaderboard, exclusive titles and threshold badges at match end.
//!
//! ## Tie-break
//!
//! The slice handed to [`finalize_match`] is the registration order.
//! - Ranking: `score_total` descending; equal totals keep registration order.
//! - Titles: among players sharing the best value, the earliest registered wins.
//!
//! Values compare with [`f64::total_cmp`], so results never depend on
//! iteration order or hashing.

use std::cmp::Ordering;

use tracing::info;

use crate::engine::config::RankingConfig;
use crate::error::{Result, ScoringError};
use crate::models::{Badge, MatchStandings, Player, RankedPlayer, Title, TitleAssignment};

fn title_value(title: Title, player: &Player) -> f64 {
    match title {
        Title::TopScorer => player.score_total(),
        Title::BestFluidity => player.averages().fluidity,
        Title::ThemeMaster => player.averages().theme,
        Title::ChaosLord => player.aggregate().cumulative_modification_pct,
    }
}

/// Index and value of the first player holding the maximum.
fn first_max(players: &[Player], value: impl Fn(&Player) -> f64) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, player) in players.iter().enumerate() {
        let v = value(player);
        match best {
            Some((_, b)) if v.total_cmp(&b) != Ordering::Greater => {}
            _ => best = Some((idx, v)),
        }
    }
    best
}

pub fn badges_for(player: &Player, config: &RankingConfig) -> Vec<Badge> {
    let avg = player.averages();
    let mut badges = Vec::new();
    if player.contributions().is_empty() {
        return badges;
    }

    let category_badges = [
        (avg.fluidity, Badge::SwipeMaster),
        (avg.coherence, Badge::CoherentArtist),
        (avg.theme, Badge::ThemeGenius),
        (avg.creativity, Badge::OriginalCreator),
    ];
    for (value, badge) in category_badges {
        if value >= config.badge_category_min {
            badges.push(badge);
        }
    }
    if avg.sum() >= config.badge_total_min {
        badges.push(Badge::GoldenLink);
    }
    badges
}

/// Rank players and assign titles and badges.
///
/// Pure function of the players' state; calling it again gives the same
/// standings.
pub fn finalize_match(players: &[Player], config: &RankingConfig) -> Result<MatchStandings> {
    if players.is_empty() {
        return Err(ScoringError::NoPlayers);
    }

    let title_assignments: Vec<TitleAssignment> = Title::ALL
        .iter()
        .filter_map(|&title| {
            first_max(players, |p| title_value(title, p)).map(|(idx, value)| TitleAssignment {
                title,
                player_id: players[idx].id().to_string(),
                value,
            })
        })
        .collect();

    let mut order: Vec<usize> = (0..players.len()).collect();
    // Stable sort keeps registration order for equal totals
    order.sort_by(|&a, &b| players[b].score_total().total_cmp(&players[a].score_total()));

    let mut standings = MatchStandings {
        winner: players[order[0]].id().to_string(),
        ranked_players: Vec::with_capacity(players.len()),
        title_assignments,
    };

    for (pos, &idx) in order.iter().enumerate() {
        let player = &players[idx];
        standings.ranked_players.push(RankedPlayer {
            rank: pos + 1,
            player: player.snapshot(),
            titles: standings.titles_of(player.id()),
            badges: badges_for(player, config),
        });
    }

    info!(
        winner = %standings.winner,
        players = players.len(),
        winning_total = players[order[0]].score_total(),
        "match finalized"
    );
    Ok(standings)
}
