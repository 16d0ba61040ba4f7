//! Event Records
//!
//! The tagged record written once per line to the JSONL event log.

use serde::{Deserialize, Serialize};

use crate::{GameMoment, Interaction, InteractionType, PieceKind, PsychologySnapshot};

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}

/// Summary of one proposal inside a debate record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub agent_id: String,
    pub piece: PieceKind,
    #[serde(rename = "move")]
    pub move_uci: String,
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_type: Option<InteractionType>,
}

/// Summary of one debate round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateRecord {
    pub turn: u32,
    pub position: String,
    pub proposals: Vec<ProposalRecord>,
    pub consensus: bool,
    /// Index of the winning proposal; absent when nobody could move
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<usize>,
}

/// Anything worth writing to the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEvent {
    Debate(DebateRecord),
    Interaction(Interaction),
    Moment(GameMoment),
    Psychology(PsychologySnapshot),
}

/// A log line: sequential id, turn, and the event payload.
///
/// Debate, interaction and moment payloads carry their own `turn`, so the
/// line's turn is written as `log_turn` to keep the flattened keys unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub event_id: String,
    #[serde(rename = "log_turn")]
    pub turn: u32,
    #[serde(flatten)]
    pub event: SimEvent,
}

impl LoggedEvent {
    /// Serialize to a single JSONL line (no trailing newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from a single JSONL line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
