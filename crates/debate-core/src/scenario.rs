//! Scenarios
//!
//! A scripted game for the CLI: per turn, the legal moves the rules engine
//! would supply, an optional forced pick, and what the opponent answered.
//! Positions follow from the moves played unless a turn pins its own FEN.

use debate_events::InteractionType;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::board::Board;
use crate::config::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    /// Position the line-up is built from
    #[serde(default = "default_fen")]
    pub start_fen: String,
    #[serde(default)]
    pub turns: Vec<ScenarioTurn>,
}

fn default_fen() -> String {
    Board::STARTING_FEN.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioTurn {
    /// Overrides the position reached by the previous turn
    #[serde(default)]
    pub fen: Option<String>,
    pub moves: Vec<String>,
    /// Index of the proposal to play instead of asking the selection policy
    #[serde(default)]
    pub pick: Option<usize>,
    #[serde(default)]
    pub opponent: Option<OpponentReply>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpponentReply {
    #[serde(rename = "move")]
    pub move_uci: String,
    /// Our agents the reply touches
    #[serde(default)]
    pub affected: Vec<String>,
    #[serde(default = "default_interaction")]
    pub interaction: InteractionType,
}

fn default_interaction() -> InteractionType {
    InteractionType::Threat
}

impl Scenario {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
