//! Game configuration: AI strength and pacing

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::ai::{MinimaxAI, SEARCH_DEPTH};
use crate::eval::Heuristics;

/// AI configuration for computer players
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Plies searched, leaf included
    pub depth: u32,
    /// Random seed for candidate shuffling (None = fixed default)
    pub seed: Option<u64>,
    /// Enable alpha-beta cut-offs
    pub prune: bool,
    /// Enable the corner penalty heuristic
    pub corner_penalty: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            depth: SEARCH_DEPTH,
            seed: None,
            prune: false,
            corner_penalty: false,
        }
    }
}

impl AiConfig {
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn heuristics(&self) -> Heuristics {
        Heuristics::default().with_corner_penalty(self.corner_penalty)
    }

    /// Build an AI; `offset` decorrelates the two sides when they share a seed
    pub fn build(&self, offset: u64) -> MinimaxAI {
        let ai = match self.seed {
            Some(seed) => MinimaxAI::with_seed(self.depth, self.heuristics(), seed.wrapping_add(offset)),
            None => MinimaxAI::new(self.depth, self.heuristics()),
        };
        ai.with_pruning(self.prune)
    }
}

/// Delays the host waits before running scheduled tasks
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    /// Computer "think time" before it plays
    pub think_ms: u64,
    /// Gap between long-move steps
    pub step_ms: u64,
    /// Gap after a step that crossed an arc
    pub loop_step_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            think_ms: 200,
            step_ms: 500,
            loop_step_ms: 800,
        }
    }
}

impl Pacing {
    /// No delays at all
    pub fn instant() -> Self {
        Self {
            think_ms: 0,
            step_ms: 0,
            loop_step_ms: 0,
        }
    }

    pub fn think(&self) -> Duration {
        Duration::from_millis(self.think_ms)
    }

    pub fn after_step(&self, via_arc: bool) -> Duration {
        Duration::from_millis(if via_arc { self.loop_step_ms } else { self.step_ms })
    }
}

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub ai: AiConfig,
    pub pacing: Pacing,
}

impl GameConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.ai.depth, 4);
        assert!(!config.ai.prune);
        assert!(!config.ai.corner_penalty);
        assert_eq!(config.pacing.think(), Duration::from_millis(200));
        assert_eq!(config.pacing.after_step(false), Duration::from_millis(500));
        assert_eq!(config.pacing.after_step(true), Duration::from_millis(800));
    }

    #[test]
    fn test_partial_json() {
        let config = GameConfig::from_json(r#"{ "ai": { "depth": 3, "seed": 7 } }"#).unwrap();
        assert_eq!(config.ai.depth, 3);
        assert_eq!(config.ai.seed, Some(7));
        assert_eq!(config.pacing, Pacing::default());
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(GameConfig::from_json("{ \"ai\": 3 }").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = GameConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
