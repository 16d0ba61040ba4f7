//! Board Geometry
//!
//! Just enough board representation to locate pieces, compute attacked
//! squares and replay a move. Legality (pins, checks, castling rights) belongs
//! to the external rules engine and is not checked here.

use debate_events::{Color, PieceKind};
use std::fmt;
use std::str::FromStr;

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];
const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Errors from parsing board notation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoardError {
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },
    #[error("invalid square '{0}'")]
    InvalidSquare(String),
    #[error("invalid move '{0}'")]
    InvalidMove(String),
    #[error("no piece on {0}")]
    EmptySquare(Square),
}

/// A board square, 0 = a1 .. 63 = h8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        (file < 8 && rank < 8).then(|| Square(rank * 8 + file))
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn file(&self) -> u8 {
        self.0 % 8
    }

    pub fn rank(&self) -> u8 {
        self.0 / 8
    }

    /// The square `(df, dr)` away, if it is on the board.
    pub fn offset(&self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file() as i8 + df;
        let rank = self.rank() as i8 + dr;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Square::new(file as u8, rank as u8)
        } else {
            None
        }
    }

    /// One of the four central squares (d4, e4, d5, e5).
    pub fn is_center(&self) -> bool {
        (3..=4).contains(&self.file()) && (3..=4).contains(&self.rank())
    }

    /// Light or dark, as a bishop would care.
    pub fn is_light(&self) -> bool {
        (self.file() + self.rank()) % 2 == 1
    }

    fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}

impl FromStr for Square {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(BoardError::InvalidSquare(s.to_string()));
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        Square::new(file, rank).ok_or_else(|| BoardError::InvalidSquare(s.to_string()))
    }
}

/// A move in coordinate notation (`e2e4`, `e7e8q`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl FromStr for UciMove {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BoardError::InvalidMove(s.to_string());
        if !(4..=5).contains(&s.len()) || !s.is_ascii() {
            return Err(invalid());
        }
        let from = s[0..2].parse().map_err(|_| invalid())?;
        let to = s[2..4].parse().map_err(|_| invalid())?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match PieceKind::from_char(c) {
                Some(k) if !matches!(k, PieceKind::Pawn | PieceKind::King) => Some(k),
                _ => return Err(invalid()),
            },
        };
        Ok(UciMove {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(p) = self.promotion {
            write!(f, "{}", p.symbol().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// FEN letter: uppercase for white.
    pub fn fen_char(&self) -> char {
        match self.color {
            Color::White => self.kind.symbol(),
            Color::Black => self.kind.symbol().to_ascii_lowercase(),
        }
    }
}

/// Piece placement plus the FEN state fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    side_to_move: Color,
    castling: String,
    en_passant: Option<Square>,
    halfmove: u32,
    fullmove: u32,
}

impl Board {
    pub const STARTING_FEN: &'static str =
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    pub fn starting() -> Self {
        // The constant is well formed; fall back to an empty board regardless.
        Self::from_fen(Self::STARTING_FEN).unwrap_or_else(|_| Self::empty(Color::White))
    }

    pub fn empty(side_to_move: Color) -> Self {
        Self {
            squares: [None; 64],
            side_to_move,
            castling: "-".to_string(),
            en_passant: None,
            halfmove: 0,
            fullmove: 1,
        }
    }

    /// Parses a FEN string. Only the placement field is required.
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let bad = |reason: &str| BoardError::InvalidFen {
            fen: fen.to_string(),
            reason: reason.to_string(),
        };
        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or_else(|| bad("empty"))?;

        let mut board = Self::empty(Color::White);
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(bad("expected 8 ranks"));
        }
        for (i, row) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file = u8::try_from(skip)
                        .ok()
                        .filter(|s| (1..=8).contains(s))
                        .and_then(|s| file.checked_add(s))
                        .filter(|f| *f <= 8)
                        .ok_or_else(|| bad("rank does not cover 8 files"))?;
                    continue;
                }
                let kind = PieceKind::from_char(c).ok_or_else(|| bad("unknown piece letter"))?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let sq = Square::new(file, rank).ok_or_else(|| bad("rank too long"))?;
                board.squares[sq.index()] = Some(Piece::new(kind, color));
                file += 1;
            }
            if file != 8 {
                return Err(bad("rank does not cover 8 files"));
            }
        }

        board.side_to_move = match fields.next() {
            None | Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(_) => return Err(bad("side to move must be w or b")),
        };
        if let Some(castling) = fields.next() {
            board.castling = castling.to_string();
        }
        board.en_passant = match fields.next() {
            None | Some("-") => None,
            Some(sq) => Some(sq.parse().map_err(|_| bad("bad en passant square"))?),
        };
        if let Some(n) = fields.next() {
            board.halfmove = n.parse().map_err(|_| bad("bad halfmove clock"))?;
        }
        if let Some(n) = fields.next() {
            board.fullmove = n.parse().map_err(|_| bad("bad fullmove number"))?;
        }
        Ok(board)
    }

    /// Just the piece placement field, used for pattern matching.
    pub fn placement(&self) -> String {
        let mut out = String::new();
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match Square::new(file, rank).and_then(|sq| self.piece_at(sq)) {
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }

    pub fn to_fen(&self) -> String {
        let side = match self.side_to_move {
            Color::White => "w",
            Color::Black => "b",
        };
        let ep = self
            .en_passant
            .map(|sq| sq.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} {} {} {} {} {}",
            self.placement(),
            side,
            self.castling,
            ep,
            self.halfmove,
            self.fullmove
        )
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    pub fn set_piece(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.index()] = piece;
    }

    /// Every occupied square of one colour, a1 first.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| {
            self.piece_at(sq)
                .filter(|p| p.color == color)
                .map(|p| (sq, p))
        })
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Squares attacked by the piece standing on `from`.
    pub fn attacks(&self, from: Square) -> Vec<Square> {
        let Some(piece) = self.piece_at(from) else {
            return Vec::new();
        };
        match piece.kind {
            PieceKind::Pawn => {
                let dr = piece.color.forward();
                [-1, 1]
                    .iter()
                    .filter_map(|&df| from.offset(df, dr))
                    .collect()
            }
            PieceKind::Knight => KNIGHT_STEPS
                .iter()
                .filter_map(|&(df, dr)| from.offset(df, dr))
                .collect(),
            PieceKind::King => KING_STEPS
                .iter()
                .filter_map(|&(df, dr)| from.offset(df, dr))
                .collect(),
            PieceKind::Bishop => self.rays(from, &DIAGONAL),
            PieceKind::Rook => self.rays(from, &ORTHOGONAL),
            PieceKind::Queen => {
                let mut squares = self.rays(from, &ORTHOGONAL);
                squares.extend(self.rays(from, &DIAGONAL));
                squares
            }
        }
    }

    fn rays(&self, from: Square, directions: &[(i8, i8)]) -> Vec<Square> {
        let mut out = Vec::new();
        for &(df, dr) in directions {
            let mut cur = from;
            while let Some(next) = cur.offset(df, dr) {
                out.push(next);
                if self.piece_at(next).is_some() {
                    break;
                }
                cur = next;
            }
        }
        out
    }

    /// Squares of `color`'s pieces attacking `target`.
    pub fn attackers(&self, color: Color, target: Square) -> Vec<Square> {
        self.pieces(color)
            .filter(|(sq, _)| self.attacks(*sq).contains(&target))
            .map(|(sq, _)| sq)
            .collect()
    }

    pub fn is_attacked_by(&self, color: Color, target: Square) -> bool {
        !self.attackers(color, target).is_empty()
    }

    /// True when `color`'s king is attacked.
    pub fn in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .map(|k| self.is_attacked_by(color.opposite(), k))
            .unwrap_or(false)
    }

    /// Number of empty squares a piece on `from` sees along `directions`.
    pub fn open_lines(&self, from: Square, directions: &[(i8, i8)]) -> usize {
        self.rays(from, directions)
            .into_iter()
            .filter(|sq| self.piece_at(*sq).is_none())
            .count()
    }

    /// Returns the board after playing `mv`, handling castling, en passant
    /// and promotion.
    pub fn after_move(&self, mv: &UciMove) -> Result<Board, BoardError> {
        let piece = self.piece_at(mv.from).ok_or(BoardError::EmptySquare(mv.from))?;
        let mut next = self.clone();
        let captured = self.piece_at(mv.to);

        next.set_piece(mv.from, None);
        let placed = match (piece.kind, mv.promotion) {
            (PieceKind::Pawn, Some(kind)) => Piece::new(kind, piece.color),
            _ => piece,
        };
        next.set_piece(mv.to, Some(placed));

        if piece.kind == PieceKind::King && mv.from.file().abs_diff(mv.to.file()) == 2 {
            let (rook_from, rook_to) = if mv.to.file() > mv.from.file() {
                (7, 5)
            } else {
                (0, 3)
            };
            let rank = mv.from.rank();
            if let (Some(rf), Some(rt)) = (Square::new(rook_from, rank), Square::new(rook_to, rank)) {
                let rook = next.piece_at(rf);
                next.set_piece(rf, None);
                next.set_piece(rt, rook);
            }
        }

        if piece.kind == PieceKind::Pawn
            && captured.is_none()
            && mv.from.file() != mv.to.file()
            && Some(mv.to) == self.en_passant
        {
            if let Some(victim) = Square::new(mv.to.file(), mv.from.rank()) {
                next.set_piece(victim, None);
            }
        }

        next.en_passant = if piece.kind == PieceKind::Pawn
            && mv.from.rank().abs_diff(mv.to.rank()) == 2
        {
            Square::new(mv.from.file(), (mv.from.rank() + mv.to.rank()) / 2)
        } else {
            None
        };

        next.halfmove = if piece.kind == PieceKind::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove + 1
        };
        if piece.color == Color::Black {
            next.fullmove = self.fullmove + 1;
        }
        next.side_to_move = piece.color.opposite();
        next.castling = strip_castling(&self.castling, piece, mv);
        Ok(next)
    }
}

impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_fen(s)
    }
}

fn strip_castling(rights: &str, piece: Piece, mv: &UciMove) -> String {
    let touched = |sq: Square, letter: char| -> bool {
        let (file, rank, color_upper) = match letter {
            'K' => (7, 0, true),
            'Q' => (0, 0, true),
            'k' => (7, 7, false),
            'q' => (0, 7, false),
            _ => return false,
        };
        let king_moved = piece.kind == PieceKind::King
            && (piece.color == Color::White) == color_upper;
        king_moved || Square::new(file, rank) == Some(sq)
    };
    let kept: String = rights
        .chars()
        .filter(|&c| c != '-' && !touched(mv.from, c) && !touched(mv.to, c))
        .collect();
    if kept.is_empty() {
        "-".to_string()
    } else {
        kept
    }
}

/// Directions a slider of this kind moves along.
pub fn slider_directions(kind: PieceKind) -> &'static [(i8, i8)] {
    match kind {
        PieceKind::Bishop => &DIAGONAL,
        PieceKind::Rook => &ORTHOGONAL,
        PieceKind::Queen => &[
            (0, 1),
            (1, 0),
            (0, -1),
            (-1, 0),
            (1, 1),
            (1, -1),
            (-1, -1),
            (-1, 1),
        ],
        _ => &[],
    }
}
