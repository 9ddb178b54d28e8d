//! Drawing Chain CLI Library
//!
//! Request file → match evaluation → result JSON
//! Effective scoring configuration → YAML / JSON

use anyhow::{Context, Result};
use drawchain_core::{MatchResult, ScoringConfig};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Output of one `evaluate` run.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Result JSON as written (pretty or compact)
    pub json: String,
    pub result: MatchResult,
}

impl Evaluation {
    /// One line per ranked player: rank, name, total, titles.
    pub fn leaderboard(&self) -> Vec<String> {
        self.result
            .ranked_players
            .iter()
            .map(|r| {
                let titles: Vec<&str> = r.titles.iter().map(|t| t.label()).collect();
                format!(
                    "{:>2}. {:<16} {:>5.2}  {}",
                    r.rank,
                    r.player.name,
                    r.player.score_total,
                    titles.join(", ")
                )
            })
            .collect()
    }
}

/// Evaluate a match request file.
///
/// # Arguments
///
/// * `input` - request JSON (see `drawchain_core::EvaluateRequest`)
/// * `output` - optional path to write the result JSON to
/// * `pretty` - pretty-print the result
pub fn evaluate_file(input: &Path, output: Option<&Path>, pretty: bool) -> Result<Evaluation> {
    let request = fs::read_to_string(input)
        .with_context(|| format!("Failed to read request file: {}", input.display()))?;

    let compact = drawchain_core::evaluate_match_json(&request)
        .map_err(anyhow::Error::msg)
        .context("Match evaluation failed")?;
    let result: MatchResult =
        serde_json::from_str(&compact).context("Failed to parse evaluation result")?;

    let json = if pretty {
        serde_json::to_string_pretty(&result).context("Failed to render result")?
    } else {
        compact
    };

    if let Some(path) = output {
        fs::write(path, &json)
            .with_context(|| format!("Failed to write result file: {}", path.display()))?;
        info!(path = %path.display(), bytes = json.len(), "result written");
    }

    Ok(Evaluation { json, result })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    #[default]
    Yaml,
    Json,
}

impl FromStr for ConfigFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "json" => Ok(ConfigFormat::Json),
            other => Err(format!("unknown format '{other}', expected yaml or json")),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Json => "json",
        })
    }
}

pub fn render_config(config: &ScoringConfig, format: ConfigFormat) -> Result<String> {
    let text = match format {
        ConfigFormat::Yaml => serde_yaml::to_string(config).context("Failed to render YAML")?,
        ConfigFormat::Json => {
            serde_json::to_string_pretty(config).context("Failed to render JSON")?
        }
    };
    Ok(text)
}
