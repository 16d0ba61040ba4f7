//! Interaction Types
//!
//! Records of something that happened between two agents, or between an agent
//! and an opposing piece. Interactions are append-only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix used for identifiers of opposing pieces (`opp:e5`).
pub const OPPONENT_PREFIX: &str = "opp:";

/// Builds the identifier for the opposing piece standing on `square`.
pub fn opponent_id(square: &str) -> String {
    format!("{}{}", OPPONENT_PREFIX, square)
}

/// True when the identifier names an opposing piece rather than one of our agents.
pub fn is_opponent_id(id: &str) -> bool {
    id.len() > OPPONENT_PREFIX.len() && id.starts_with(OPPONENT_PREFIX)
}

/// Kinds of interaction between pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    /// One piece protects another
    Support,
    /// Pieces working together in a tactic
    Cooperation,
    /// One piece given up for another's gain
    Sacrifice,
    /// One piece left another vulnerable
    Abandonment,
    /// One piece saved another from capture
    Rescue,
    /// Pieces argued for different plans
    Competition,
    /// An opposing piece threatens one of ours
    Threat,
    /// Loss or near-loss inflicted by the opponent
    Trauma,
    /// Opposing piece shadowing one of ours
    Stalking,
    /// Opponent blocking our piece in
    Blockade,
    /// Long-running opposition between two pieces
    Rivalry,
}

impl InteractionType {
    /// Returns all interaction type variants.
    pub fn all() -> &'static [InteractionType] {
        &[
            InteractionType::Support,
            InteractionType::Cooperation,
            InteractionType::Sacrifice,
            InteractionType::Abandonment,
            InteractionType::Rescue,
            InteractionType::Competition,
            InteractionType::Threat,
            InteractionType::Trauma,
            InteractionType::Stalking,
            InteractionType::Blockade,
            InteractionType::Rivalry,
        ]
    }

    /// Snake-case name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Support => "support",
            InteractionType::Cooperation => "cooperation",
            InteractionType::Sacrifice => "sacrifice",
            InteractionType::Abandonment => "abandonment",
            InteractionType::Rescue => "rescue",
            InteractionType::Competition => "competition",
            InteractionType::Threat => "threat",
            InteractionType::Trauma => "trauma",
            InteractionType::Stalking => "stalking",
            InteractionType::Blockade => "blockade",
            InteractionType::Rivalry => "rivalry",
        }
    }

    /// Interactions that count toward recent cooperation between a pair.
    pub fn is_cooperative(&self) -> bool {
        matches!(self, InteractionType::Cooperation | InteractionType::Support)
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown interaction type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseInteractionTypeError(pub String);

impl fmt::Display for ParseInteractionTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown interaction type: {}", self.0)
    }
}

impl std::error::Error for ParseInteractionTypeError {}

impl FromStr for InteractionType {
    type Err = ParseInteractionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        InteractionType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ParseInteractionTypeError(s.to_string()))
    }
}

/// A recorded event between two agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Acting (or affected) agent
    pub agent1_id: String,
    /// Counterpart agent, or an `opp:` identifier for an opposing piece
    pub agent2_id: String,
    #[serde(rename = "type")]
    pub interaction_type: InteractionType,
    pub turn: u32,
    /// UCI move that caused the interaction
    #[serde(rename = "move")]
    pub move_uci: String,
    /// Signed relationship impact in [-1, 1]
    pub impact: f32,
    /// Human-readable description
    #[serde(default)]
    pub context: String,
}

impl Interaction {
    /// Creates an interaction. The impact is clamped into [-1, 1].
    pub fn new(
        agent1_id: impl Into<String>,
        agent2_id: impl Into<String>,
        interaction_type: InteractionType,
        turn: u32,
        move_uci: impl Into<String>,
        impact: f32,
    ) -> Self {
        let impact = if impact.is_finite() {
            impact.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        Self {
            agent1_id: agent1_id.into(),
            agent2_id: agent2_id.into(),
            interaction_type,
            turn,
            move_uci: move_uci.into(),
            impact,
            context: String::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// True when this interaction is between `a` and `b`, in either order.
    pub fn involves_pair(&self, a: &str, b: &str) -> bool {
        (self.agent1_id == a && self.agent2_id == b) || (self.agent1_id == b && self.agent2_id == a)
    }

    /// True when `agent_id` takes part in this interaction.
    pub fn involves(&self, agent_id: &str) -> bool {
        self.agent1_id == agent_id || self.agent2_id == agent_id
    }
}
