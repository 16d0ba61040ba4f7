//! Debate Errors
//!
//! Errors surfaced to callers of the moderator. Evaluation failures are not
//! in here: they are absorbed at the gathering boundary and never abort a round.

use crate::board::BoardError;
use crate::personality::PersonalityError;

#[derive(Debug, thiserror::Error)]
pub enum DebateError {
    /// A winner was requested before any debate was conducted
    #[error("no debate round is awaiting a winner")]
    NoPendingRound,

    /// The current round already has a winner
    #[error("winner already selected for turn {turn}")]
    WinnerAlreadySelected { turn: u32 },

    /// Winner index outside the proposal list
    #[error("invalid selection index {index} for {len} proposals")]
    InvalidSelection { index: usize, len: usize },

    #[error("invalid position: {0}")]
    Position(#[from] BoardError),

    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    #[error("personality error: {0}")]
    Personality(#[from] PersonalityError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DebateError::InvalidSelection { index: 5, len: 3 };
        assert_eq!(err.to_string(), "invalid selection index 5 for 3 proposals");
        assert_eq!(
            DebateError::WinnerAlreadySelected { turn: 2 }.to_string(),
            "winner already selected for turn 2"
        );
    }
}
