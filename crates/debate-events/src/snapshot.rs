//! Snapshot Types
//!
//! Serialization structs for agent, team and relationship state.
//!
//! Snapshots are plain copies: nothing in here aliases live simulation state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Color, Interaction, PieceKind};

/// An agent's four emotional scalars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionSnapshot {
    pub confidence: f32,
    pub morale: f32,
    pub trust: f32,
    pub aggression: f32,
}

impl EmotionSnapshot {
    /// The strongest emotion and its value. Ties keep the earlier field.
    pub fn dominant(&self) -> (&'static str, f32) {
        let fields = [
            ("confidence", self.confidence),
            ("morale", self.morale),
            ("trust", self.trust),
            ("aggression", self.aggression),
        ];
        fields
            .into_iter()
            .fold(("confidence", f32::MIN), |best, cur| if cur.1 > best.1 { cur } else { best })
    }
}

/// Team-wide psychological metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsychologySnapshot {
    pub cohesion: f32,
    pub morale: f32,
    pub coordination: f32,
    pub leadership: f32,
}

/// One directed trust entry, as written to the trust matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustEntry {
    pub from: String,
    pub to: String,
    pub trust: f32,
}

/// Trust matrix plus the recent interaction window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSnapshot {
    pub trust: Vec<TrustEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recent_interactions: Vec<Interaction>,
}

/// One agent, as seen from outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub agent_id: String,
    pub name: String,
    pub piece: PieceKind,
    pub color: Color,
    pub square: String,
    pub captured: bool,
    pub emotions: EmotionSnapshot,
}

/// Complete simulation state at a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub snapshot_id: String,
    pub game_id: Uuid,
    pub turn: u32,
    pub psychology: PsychologySnapshot,
    pub relationships: RelationshipSnapshot,
    pub agents: Vec<AgentSnapshot>,
}

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominant_emotion() {
        let e = EmotionSnapshot {
            confidence: 0.2,
            morale: 0.9,
            trust: 0.5,
            aggression: 0.9,
        };
        assert_eq!(e.dominant(), ("morale", 0.9));
    }

    #[test]
    fn test_snapshot_ids() {
        assert_eq!(generate_snapshot_id(7), "snap_000007");
    }
}
