//! Narrative Seam
//!
//! Argument and narrative text is flavor: it never feeds back into scoring or
//! state. The engine hands a structured context to an [`ArgumentGenerator`] and
//! stores whatever string comes back.

use crate::{EmotionSnapshot, InteractionType, PieceKind};

/// Everything a generator may use to phrase a proposal's argument.
#[derive(Debug, Clone)]
pub struct ArgumentContext<'a> {
    /// Display name of the proposing agent (e.g. "Sir Galahop")
    pub speaker: &'a str,
    pub piece: PieceKind,
    pub move_uci: &'a str,
    pub score: f32,
    /// Composite score of the external evaluation
    pub composite_eval: f32,
    pub emotions: EmotionSnapshot,
    /// Names of the tactical flags that are set (capture, fork, ...)
    pub tactics: &'a [String],
    /// Descriptions of detected tactical opportunities, best first
    pub opportunities: &'a [String],
    /// Persona line for the piece in its current mood
    pub voice: &'a str,
    /// A remembered moment the current position brings back
    pub memory_hint: Option<&'a str>,
}

/// Context for the one-line narrative appended to an agent's thread.
#[derive(Debug, Clone)]
pub struct MomentContext<'a> {
    pub speaker: &'a str,
    pub move_uci: &'a str,
    pub turn: u32,
    pub interaction_type: Option<InteractionType>,
    pub significance: f32,
}

/// Produces human-readable prose from structured context.
pub trait ArgumentGenerator: Send + Sync {
    /// Argument for a single proposal.
    fn argument(&self, ctx: &ArgumentContext<'_>) -> String;

    /// One-line narrative for a recorded moment.
    fn moment_line(&self, ctx: &MomentContext<'_>) -> String;
}
