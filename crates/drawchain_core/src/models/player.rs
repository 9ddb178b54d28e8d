//! Match participant and the aggregate folded from their contributions.

use serde::{Deserialize, Serialize};

use super::contribution::Contribution;
use super::match_result::{Badge, Title};

/// Per-category means across a player's contributions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryAverages {
    pub fluidity: f64,
    pub coherence: f64,
    pub theme: f64,
    pub creativity: f64,
}

impl CategoryAverages {
    pub fn sum(&self) -> f64 {
        self.fluidity + self.coherence + self.theme + self.creativity
    }
}

/// Running totals of a player. Always rebuilt from the full contribution list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerAggregate {
    pub score_total: f64,
    pub averages: CategoryAverages,
    /// Sum of modification percentages over every round
    pub cumulative_modification_pct: f64,
    pub contribution_count: usize,
}

/// Fold a contribution list into its aggregate.
pub fn recompute_aggregate(contributions: &[Contribution]) -> PlayerAggregate {
    let count = contributions.len();
    if count == 0 {
        return PlayerAggregate::default();
    }

    let mut aggregate = PlayerAggregate { contribution_count: count, ..Default::default() };
    let mut sums = CategoryAverages::default();
    for c in contributions {
        let scores = c.scores();
        aggregate.score_total += scores.total();
        aggregate.cumulative_modification_pct += c.analysis().modification_pct;
        sums.fluidity += scores.fluidity();
        sums.coherence += scores.coherence();
        sums.theme += scores.theme();
        sums.creativity += scores.creativity();
    }

    let n = count as f64;
    aggregate.averages = CategoryAverages {
        fluidity: sums.fluidity / n,
        coherence: sums.coherence / n,
        theme: sums.theme / n,
        creativity: sums.creativity / n,
    };
    aggregate
}

/// The serialized `aggregate` is ignored on input and folded again from
/// the contribution list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "PlayerRecord")]
pub struct Player {
    id: String,
    name: String,
    contributions: Vec<Contribution>,
    aggregate: PlayerAggregate,
    titles: Vec<Title>,
    badges: Vec<Badge>,
}

#[derive(Deserialize)]
struct PlayerRecord {
    id: String,
    name: String,
    #[serde(default)]
    contributions: Vec<Contribution>,
    #[serde(default)]
    titles: Vec<Title>,
    #[serde(default)]
    badges: Vec<Badge>,
}

impl From<PlayerRecord> for Player {
    fn from(r: PlayerRecord) -> Self {
        let aggregate = recompute_aggregate(&r.contributions);
        Self {
            id: r.id,
            name: r.name,
            contributions: r.contributions,
            aggregate,
            titles: r.titles,
            badges: r.badges,
        }
    }
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            contributions: Vec::new(),
            aggregate: PlayerAggregate::default(),
            titles: Vec::new(),
            badges: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contributions in submission order.
    pub fn contributions(&self) -> &[Contribution] {
        &self.contributions
    }

    pub fn aggregate(&self) -> &PlayerAggregate {
        &self.aggregate
    }

    pub fn score_total(&self) -> f64 {
        self.aggregate.score_total
    }

    pub fn averages(&self) -> &CategoryAverages {
        &self.aggregate.averages
    }

    pub fn titles(&self) -> &[Title] {
        &self.titles
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            score_total: self.aggregate.score_total,
            category_averages: self.aggregate.averages,
            contribution_count: self.contributions.len(),
        }
    }

    pub(crate) fn add_contribution(&mut self, contribution: Contribution) {
        self.contributions.push(contribution);
        self.aggregate = recompute_aggregate(&self.contributions);
    }

    /// Replace end-of-match awards; re-finalizing gives the same result.
    pub(crate) fn set_awards(&mut self, titles: Vec<Title>, badges: Vec<Badge>) {
        self.titles = titles;
        self.badges = badges;
    }
}

/// Live standings entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: String,
    pub name: String,
    pub score_total: f64,
    pub category_averages: CategoryAverages,
    pub contribution_count: usize,
}
