//! Position Evaluation
//!
//! The seam to whatever engine scores positions. Agents only ever see the
//! structured [`Evaluation`]; an engine that is down or returns garbage
//! produces an [`EvaluationError`] and the agent sits the round out.

use debate_events::Color;
use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardError, Square, UciMove};
use crate::position::Position;

/// Structured evaluation. Positive numbers favour the side that moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub material: f32,
    pub mobility: f32,
    pub positional: f32,
    pub center_control: f32,
    pub king_safety: f32,
    /// Engine's overall verdict
    pub composite: f32,
}

impl Evaluation {
    /// Rejects evaluations carrying NaN or infinite components.
    pub fn validate(self) -> Result<Self, EvaluationError> {
        let fields = [
            ("material", self.material),
            ("mobility", self.mobility),
            ("positional", self.positional),
            ("center_control", self.center_control),
            ("king_safety", self.king_safety),
            ("composite", self.composite),
        ];
        match fields.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, v)) => Err(EvaluationError::Malformed(format!("{} = {}", name, v))),
            None => Ok(self),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    /// Engine could not be reached or timed out
    #[error("evaluation unavailable: {0}")]
    Unavailable(String),
    #[error("malformed evaluation: {0}")]
    Malformed(String),
    #[error("cannot evaluate position: {0}")]
    Position(#[from] BoardError),
}

/// Anything that can score a position, optionally after a candidate move.
///
/// Implementations are called from the rayon pool during proposal gathering,
/// one call per candidate, each against its own copy of the position.
pub trait PositionEvaluator: Send + Sync {
    fn evaluate(&self, position: &Position, uci: Option<&str>) -> Result<Evaluation, EvaluationError>;
}

/// A static evaluator over the board geometry.
///
/// Good enough to drive the CLI and tests; real engines plug in through
/// [`PositionEvaluator`].
#[derive(Debug, Clone, Default)]
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    pub fn new() -> Self {
        Self
    }

    fn score(board: &Board, us: Color) -> Evaluation {
        let them = us.opposite();

        let material_of = |c: Color| -> f32 {
            board.pieces(c).map(|(_, p)| p.kind.value() as f32).sum()
        };
        let material = material_of(us) - material_of(them);

        let reach_of = |c: Color| -> Vec<Square> {
            board.pieces(c).flat_map(|(sq, _)| board.attacks(sq)).collect()
        };
        let ours = reach_of(us);
        let theirs = reach_of(them);
        let mobility = (ours.len() as f32 - theirs.len() as f32) * 0.05;

        let center = |squares: &[Square]| squares.iter().filter(|s| s.is_center()).count() as f32;
        let center_control = (center(&ours) - center(&theirs)) * 0.1;

        let positional = development(board, us) - development(board, them);

        let king_safety = king_pressure(board, them, &ours) - king_pressure(board, us, &theirs);

        let composite = material + mobility + positional + center_control + king_safety;
        Evaluation {
            material,
            mobility,
            positional,
            center_control,
            king_safety,
            composite,
        }
    }
}

/// Minor pieces off the back rank and pawns pushed forward.
fn development(board: &Board, color: Color) -> f32 {
    board
        .pieces(color)
        .map(|(sq, p)| {
            use debate_events::PieceKind::*;
            match p.kind {
                Knight | Bishop if sq.rank() != color.back_rank() => 0.15,
                Pawn => {
                    let start = if color == Color::White { 1 } else { 6 };
                    sq.rank().abs_diff(start) as f32 * 0.02
                }
                _ => 0.0,
            }
        })
        .sum()
}

/// Pressure on `victim`'s king zone from the given attacked squares.
fn king_pressure(board: &Board, victim: Color, attacked: &[Square]) -> f32 {
    let Some(king) = board.king_square(victim) else {
        return 0.0;
    };
    let zone = attacked
        .iter()
        .filter(|s| s.file().abs_diff(king.file()) <= 1 && s.rank().abs_diff(king.rank()) <= 1)
        .count() as f32;
    zone * 0.1
}

impl PositionEvaluator for MaterialEvaluator {
    fn evaluate(&self, position: &Position, uci: Option<&str>) -> Result<Evaluation, EvaluationError> {
        let board = position.board()?;
        let us = board.side_to_move();
        let board = match uci {
            Some(mv) => board.after_move(&mv.parse::<UciMove>()?)?,
            None => board,
        };
        Self::score(&board, us).validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position_is_balanced() {
        let eval = MaterialEvaluator::new()
            .evaluate(&Position::starting(), None)
            .unwrap();
        assert_eq!(eval.material, 0.0);
        assert!(eval.composite.abs() < 1e-6, "symmetric position: {:?}", eval);
    }

    #[test]
    fn test_capture_gains_material() {
        let position = Position::new("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");
        let eval = MaterialEvaluator::new()
            .evaluate(&position, Some("e4d5"))
            .unwrap();
        assert_eq!(eval.material, 1.0);
    }

    #[test]
    fn test_developing_move_scores_better_than_nothing() {
        let evaluator = MaterialEvaluator::new();
        let start = Position::starting();
        let quiet = evaluator.evaluate(&start, Some("g1f3")).unwrap();
        let rim = evaluator.evaluate(&start, Some("a2a3")).unwrap();
        assert!(quiet.composite > rim.composite);
    }

    #[test]
    fn test_bad_input_is_an_error() {
        let evaluator = MaterialEvaluator::new();
        assert!(evaluator.evaluate(&Position::new("garbage"), None).is_err());
        assert!(matches!(
            evaluator.evaluate(&Position::starting(), Some("e4e5")),
            Err(EvaluationError::Position(BoardError::EmptySquare(_)))
        ));
    }

    #[test]
    fn test_non_finite_is_malformed() {
        let eval = Evaluation {
            composite: f32::NAN,
            ..Evaluation::default()
        };
        assert!(matches!(eval.validate(), Err(EvaluationError::Malformed(_))));
    }
}
