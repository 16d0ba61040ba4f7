//! Shared data types for the debate chess simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod interaction;
pub mod moment;
pub mod narrative;
pub mod piece;
pub mod record;
pub mod snapshot;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

pub use interaction::{
    is_opponent_id, opponent_id, Interaction, InteractionType, ParseInteractionTypeError,
    OPPONENT_PREFIX,
};
pub use moment::{generate_moment_id, max_magnitude, GameMoment, ImpactMap, Metric, Trigger};
pub use narrative::{ArgumentContext, ArgumentGenerator, MomentContext};
pub use piece::{Color, PieceKind};
pub use record::{generate_event_id, DebateRecord, LoggedEvent, ProposalRecord, SimEvent};
pub use snapshot::{
    generate_snapshot_id, AgentSnapshot, EmotionSnapshot, GameSnapshot, PsychologySnapshot,
    RelationshipSnapshot, TrustEntry,
};
