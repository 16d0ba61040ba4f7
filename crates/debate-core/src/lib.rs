//! Debate Chess Simulation Engine
//!
//! Every piece of a side is an agent with a personality, an emotional state
//! and a voice. Each turn the agents debate candidate moves; the winner is
//! played and the outcome ripples through relationships, team psychology and
//! long-term memory.
//!
//! # Modules
//!
//! - [`moderator`]: Debate rounds, winner selection and outcome propagation
//! - [`agent`] / [`persona`] / [`personality`]: Agents and how they score moves
//! - [`emotion`] / [`psychology`] / [`relationship`]: Agent, team and pair state
//! - [`mediator`] / [`observer`] / [`memory`]: Event fan-out and game memory
//! - [`board`] / [`position`] / [`evaluation`] / [`tactics`]: Board geometry and
//!   the evaluation seam
//! - [`config`] / [`log`] / [`scenario`]: Tuning, JSONL event log, CLI scripts

pub mod agent;
pub mod board;
pub mod config;
pub mod emotion;
pub mod error;
pub mod evaluation;
pub mod log;
pub mod mediator;
pub mod memory;
pub mod moderator;
pub mod observer;
pub mod persona;
pub mod personality;
pub mod position;
pub mod psychology;
pub mod relationship;
pub mod roster;
pub mod scenario;
pub mod selection;
pub mod tactics;

pub use agent::{agent_id, weighted_score, Agent, MoveProposal, ProposalContext};
pub use board::{Board, BoardError, Piece, Square, UciMove};
pub use config::{ConfigError, SimConfig};
pub use emotion::EmotionalState;
pub use error::DebateError;
pub use evaluation::{Evaluation, EvaluationError, MaterialEvaluator, PositionEvaluator};
pub use log::EventLog;
pub use mediator::{InteractionMediator, OpponentImpact};
pub use memory::GameMemory;
pub use moderator::{rank_proposals, DebateModerator, DebateOutcome, DebatePhase, DebateRound};
pub use observer::{AgentObserver, InteractionObserver, TeamObserver, TeamState};
pub use persona::Persona;
pub use personality::{PersonalityFactory, PersonalityError, PersonalityProfile, Theme};
pub use position::Position;
pub use psychology::PsychologicalState;
pub use relationship::RelationshipNetwork;
pub use roster::AgentRoster;
pub use scenario::Scenario;
pub use selection::{HighestScore, PolicyKind, SelectionPolicy, WeightedRandom};
