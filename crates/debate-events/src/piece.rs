//! Piece Types
//!
//! Piece kinds and colours shared by every crate in the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The six kinds of chess piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Returns all piece kinds in conventional order.
    pub fn all() -> &'static [PieceKind] {
        &[
            PieceKind::Pawn,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
            PieceKind::King,
        ]
    }

    /// Parses a piece letter, ignoring case (`'n'` and `'N'` are both knights).
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Uppercase piece letter.
    pub fn symbol(&self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Standard material value (kings are not counted).
    pub fn value(&self) -> u32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight | PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 0,
        }
    }

    /// Lowercase English name.
    pub fn name(&self) -> &'static str {
        match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        }
    }

    /// Bishops, rooks and queens attack along rays.
    pub fn is_slider(&self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Side to move / piece owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank index (0-based) of this side's back rank.
    pub fn back_rank(&self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// +1 for white (pawns move up the board), -1 for black.
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_kind_round_trips_symbols() {
        for kind in PieceKind::all() {
            assert_eq!(PieceKind::from_char(kind.symbol()), Some(*kind));
            assert_eq!(
                PieceKind::from_char(kind.symbol().to_ascii_lowercase()),
                Some(*kind)
            );
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }

    #[test]
    fn test_standard_values() {
        assert_eq!(PieceKind::Pawn.value(), 1);
        assert_eq!(PieceKind::Knight.value(), 3);
        assert_eq!(PieceKind::Bishop.value(), 3);
        assert_eq!(PieceKind::Rook.value(), 5);
        assert_eq!(PieceKind::Queen.value(), 9);
        assert_eq!(PieceKind::King.value(), 0);
    }

    #[test]
    fn test_color_helpers() {
        assert_eq!(Color::White.opposite(), Color::Black);
        assert_eq!(Color::Black.back_rank(), 7);
        assert_eq!(Color::Black.forward(), -1);
    }
}
