//! End-of-match output: ranking, exclusive titles, threshold badges.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::contribution::Contribution;
use super::player::PlayerSnapshot;

/// Exclusive award: exactly one holder per match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Title {
    /// Highest total score (the winner)
    TopScorer,
    /// Highest average fluidity
    BestFluidity,
    /// Highest average theme fidelity
    ThemeMaster,
    /// Highest cumulative modification percentage
    ChaosLord,
}

impl Title {
    pub const ALL: [Title; 4] =
        [Title::TopScorer, Title::BestFluidity, Title::ThemeMaster, Title::ChaosLord];

    pub fn label(&self) -> &'static str {
        match self {
            Title::TopScorer => "Top Scorer",
            Title::BestFluidity => "Best Fluidity",
            Title::ThemeMaster => "Theme Master",
            Title::ChaosLord => "Chaos Lord",
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Threshold achievement; any number of players may hold one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Badge {
    /// Fluidity average at or above the badge threshold
    SwipeMaster,
    CoherentArtist,
    ThemeGenius,
    OriginalCreator,
    /// Summed category averages at or above the total threshold
    GoldenLink,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::SwipeMaster => "Swipe Master",
            Badge::CoherentArtist => "Coherent Artist",
            Badge::ThemeGenius => "Theme Genius",
            Badge::OriginalCreator => "Original Creator",
            Badge::GoldenLink => "Golden Link",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleAssignment {
    pub title: Title,
    pub player_id: String,
    /// Value that won the title (score, average or cumulative percentage)
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlayer {
    /// 1-based; tied players get consecutive ranks in registration order
    pub rank: usize,
    #[serde(flatten)]
    pub player: PlayerSnapshot,
    pub titles: Vec<Title>,
    pub badges: Vec<Badge>,
}

/// Result of ranking a set of players. Pure function of their state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStandings {
    pub winner: String,
    pub ranked_players: Vec<RankedPlayer>,
    pub title_assignments: Vec<TitleAssignment>,
}

impl MatchStandings {
    pub fn holder_of(&self, title: Title) -> Option<&str> {
        self.title_assignments
            .iter()
            .find(|a| a.title == title)
            .map(|a| a.player_id.as_str())
    }

    pub fn titles_of(&self, player_id: &str) -> Vec<Title> {
        self.title_assignments
            .iter()
            .filter(|a| a.player_id == player_id)
            .map(|a| a.title)
            .collect()
    }
}

/// Full match outcome handed to the room layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: String,
    pub ranked_players: Vec<RankedPlayer>,
    pub title_assignments: Vec<TitleAssignment>,
    pub all_contributions: Vec<Contribution>,
    pub rounds_played: u32,
}

impl MatchResult {
    pub fn from_standings(
        standings: MatchStandings,
        all_contributions: Vec<Contribution>,
        rounds_played: u32,
    ) -> Self {
        Self {
            winner: standings.winner,
            ranked_players: standings.ranked_players,
            title_assignments: standings.title_assignments,
            all_contributions,
            rounds_played,
        }
    }
}
