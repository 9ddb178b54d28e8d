//! Prompt pool for themes drawn between rounds.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Built-in drawing prompts.
pub const DEFAULT_PROMPTS: [&str; 10] = [
    "Un chat dans l'espace",
    "Un robot qui danse",
    "Une licorne arc-en-ciel",
    "Un pirate alien",
    "Un dragon endormi",
    "Une maison volante",
    "Un arbre magique",
    "Un poisson astronaute",
    "Une voiture du futur",
    "Un monstre gentil",
];

/// How the theme changes from one round to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum ThemeRotation {
    /// Keep the current theme
    #[default]
    Fixed,
    /// Draw from the prompt pool; same seed, same sequence
    Random { seed: u64 },
}

#[derive(Debug, Clone)]
pub struct ThemePool {
    prompts: Vec<String>,
    rng: ChaCha8Rng,
}

impl ThemePool {
    pub fn new(seed: u64) -> Self {
        Self::with_prompts(DEFAULT_PROMPTS.iter().map(|p| p.to_string()).collect(), seed)
    }

    /// Custom prompts. An empty list falls back to the built-in prompts.
    pub fn with_prompts(prompts: Vec<String>, seed: u64) -> Self {
        let prompts = if prompts.is_empty() {
            DEFAULT_PROMPTS.iter().map(|p| p.to_string()).collect()
        } else {
            prompts
        };
        Self { prompts, rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn draw(&mut self) -> String {
        let idx = self.rng.gen_range(0..self.prompts.len());
        self.prompts[idx].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = ThemePool::new(42);
        let mut b = ThemePool::new(42);
        let seq_a: Vec<String> = (0..8).map(|_| a.draw()).collect();
        let seq_b: Vec<String> = (0..8).map(|_| b.draw()).collect();
        assert_eq!(seq_a, seq_b);
        assert!(seq_a.iter().all(|t| DEFAULT_PROMPTS.contains(&t.as_str())));
    }

    #[test]
    fn test_custom_prompts() {
        let mut pool = ThemePool::with_prompts(vec!["Le soleil".into()], 1);
        assert_eq!(pool.draw(), "Le soleil");
        assert_eq!(ThemePool::with_prompts(Vec::new(), 1).prompts().len(), DEFAULT_PROMPTS.len());
    }

    #[test]
    fn test_rotation_serde() {
        let json = serde_json::to_string(&ThemeRotation::Random { seed: 7 }).unwrap();
        assert_eq!(json, r#"{"mode":"random","seed":7}"#);
        let fixed: ThemeRotation = serde_json::from_str(r#"{"mode":"fixed"}"#).unwrap();
        assert_eq!(fixed, ThemeRotation::Fixed);
    }
}
