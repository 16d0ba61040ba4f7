//! Position Token
//!
//! A FEN string plus the moves that led to it, as handed over by the rules
//! engine.

use debate_events::Color;
use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardError, UciMove};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub fen: String,
    #[serde(default)]
    pub move_history: Vec<String>,
}

impl Position {
    pub fn new(fen: impl Into<String>) -> Self {
        Self {
            fen: fen.into(),
            move_history: Vec::new(),
        }
    }

    pub fn starting() -> Self {
        Self::new(Board::STARTING_FEN)
    }

    pub fn with_history(mut self, moves: Vec<String>) -> Self {
        self.move_history = moves;
        self
    }

    pub fn board(&self) -> Result<Board, BoardError> {
        Board::from_fen(&self.fen)
    }

    /// Side to move from the FEN's second field (white when absent).
    pub fn side_to_move(&self) -> Color {
        match self.fen.split_whitespace().nth(1) {
            Some("b") => Color::Black,
            _ => Color::White,
        }
    }

    pub fn is_white_to_move(&self) -> bool {
        self.side_to_move() == Color::White
    }

    /// Piece placement only. Triggers match on this.
    pub fn pattern(&self) -> &str {
        self.fen.split_whitespace().next().unwrap_or("")
    }

    /// The position after `uci`, with the move appended to the history.
    pub fn apply(&self, uci: &str) -> Result<Position, BoardError> {
        let mv: UciMove = uci.parse()?;
        let next = self.board()?.after_move(&mv)?;
        let mut history = self.move_history.clone();
        history.push(uci.to_string());
        Ok(Position {
            fen: next.to_fen(),
            move_history: history,
        })
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_to_move() {
        assert!(Position::starting().is_white_to_move());
        let black = Position::new("8/8/8/8/8/8/8/K6k b - - 0 1");
        assert_eq!(black.side_to_move(), Color::Black);
    }

    #[test]
    fn test_pattern_is_placement() {
        assert_eq!(
            Position::starting().pattern(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
        assert_eq!(Position::new("").pattern(), "");
    }

    #[test]
    fn test_apply_records_history() {
        let next = Position::starting().apply("g1f3").unwrap();
        assert_eq!(next.move_history, vec!["g1f3".to_string()]);
        assert!(!next.is_white_to_move());
        assert!(Position::starting().apply("zz").is_err());
    }
}
