//! Tactics Detection
//!
//! Forks, discovered attacks and the per-move flags (capture, check,
//! promotion, sacrifice, support) that end up in a proposal's tactical
//! context.

use debate_events::{Color, PieceKind};
use std::collections::BTreeMap;
use std::fmt;

use crate::board::{Board, BoardError, Square, UciMove};

/// Multiplier when the acting piece is itself under attack after the move.
const ACTOR_ATTACKED_DISCOUNT: f32 = 0.7;
/// Multiplier per target the opponent defends.
const TARGET_DEFENDED_DISCOUNT: f32 = 0.8;
const MIN_CONFIDENCE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TacticKind {
    /// One piece attacking two or more enemy pieces
    Fork,
    /// Moving a piece out of a friendly slider's line
    DiscoveredAttack,
}

impl TacticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TacticKind::Fork => "fork",
            TacticKind::DiscoveredAttack => "discovered_attack",
        }
    }
}

impl fmt::Display for TacticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TacticalOpportunity {
    pub kind: TacticKind,
    /// Square of the attacking piece after the move
    pub actor: Square,
    pub actor_kind: PieceKind,
    pub target_squares: Vec<Square>,
    pub target_pieces: Vec<PieceKind>,
    /// Sum of the targets' material values
    pub value: f32,
    /// How sure we are it works, in [0.1, 1]
    pub confidence: f32,
    pub description: String,
}

impl TacticalOpportunity {
    /// Ranking key: value weighted by confidence.
    pub fn weight(&self) -> f32 {
        self.value * self.confidence
    }
}

/// Boolean flags describing a candidate move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TacticalFlags {
    pub capture: bool,
    pub check: bool,
    pub fork: bool,
    pub discovered_attack: bool,
    pub promotion: bool,
    pub sacrifice: bool,
    pub support: bool,
}

impl TacticalFlags {
    pub fn to_map(&self) -> BTreeMap<String, bool> {
        [
            ("capture", self.capture),
            ("check", self.check),
            ("fork", self.fork),
            ("discovered_attack", self.discovered_attack),
            ("promotion", self.promotion),
            ("sacrifice", self.sacrifice),
            ("support", self.support),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    /// Names of the flags that are set.
    pub fn active(&self) -> Vec<String> {
        self.to_map()
            .into_iter()
            .filter(|(_, v)| *v)
            .map(|(k, _)| k)
            .collect()
    }
}

/// Everything detected about one candidate move.
#[derive(Debug, Clone)]
pub struct MoveTactics {
    pub flags: TacticalFlags,
    /// Best first
    pub opportunities: Vec<TacticalOpportunity>,
    /// Own pieces under attack that the moved piece now defends
    pub supported: Vec<Square>,
    pub board_after: Board,
}

/// Analyzes `mv` played by the side to move on `before`.
///
/// `confidence` is the acting agent's confidence, the starting point for
/// every opportunity's confidence.
pub fn analyze_move(before: &Board, mv: &UciMove, confidence: f32) -> Result<MoveTactics, BoardError> {
    let mover = before.piece_at(mv.from).ok_or(BoardError::EmptySquare(mv.from))?;
    let us = mover.color;
    let them = us.opposite();
    let after = before.after_move(mv)?;

    let captured = before.piece_at(mv.to).filter(|p| p.color == them);
    let en_passant = mover.kind == PieceKind::Pawn
        && mv.from.file() != mv.to.file()
        && before.piece_at(mv.to).is_none();

    let mut opportunities = Vec::new();
    if let Some(fork) = detect_fork(&after, mv.to, us, confidence) {
        opportunities.push(fork);
    }
    opportunities.extend(detect_discovered(before, &after, mv, us, confidence));
    opportunities.sort_by(|a, b| b.weight().total_cmp(&a.weight()));

    let landed_attacked = after.is_attacked_by(them, mv.to);
    let landed_value = after.piece_at(mv.to).map(|p| p.kind.value()).unwrap_or(0);
    let captured_value = captured.map(|p| p.kind.value()).unwrap_or(0);

    let reach = after.attacks(mv.to);
    let supported: Vec<Square> = after
        .pieces(us)
        .filter(|(sq, _)| *sq != mv.to && reach.contains(sq) && after.is_attacked_by(them, *sq))
        .map(|(sq, _)| sq)
        .collect();

    let flags = TacticalFlags {
        capture: captured.is_some() || en_passant,
        check: after.in_check(them),
        fork: opportunities.iter().any(|o| o.kind == TacticKind::Fork),
        discovered_attack: opportunities
            .iter()
            .any(|o| o.kind == TacticKind::DiscoveredAttack),
        promotion: mv.promotion.is_some(),
        sacrifice: landed_attacked
            && !after.is_attacked_by(us, mv.to)
            && landed_value > captured_value,
        support: !supported.is_empty(),
    };

    Ok(MoveTactics {
        flags,
        opportunities,
        supported,
        board_after: after,
    })
}

fn enemy_targets(board: &Board, from: Square, them: Color) -> Vec<(Square, PieceKind)> {
    board
        .attacks(from)
        .into_iter()
        .filter_map(|sq| {
            board
                .piece_at(sq)
                .filter(|p| p.color == them)
                .map(|p| (sq, p.kind))
        })
        .collect()
}

fn discounted_confidence(board: &Board, actor: Square, targets: &[Square], them: Color, base: f32) -> f32 {
    let mut confidence = base;
    if board.is_attacked_by(them, actor) {
        confidence *= ACTOR_ATTACKED_DISCOUNT;
    }
    for target in targets {
        // The opponent defends its own piece when it attacks the target square.
        if board.is_attacked_by(them, *target) {
            confidence *= TARGET_DEFENDED_DISCOUNT;
        }
    }
    confidence.clamp(MIN_CONFIDENCE, 1.0)
}

fn names(pieces: &[PieceKind]) -> String {
    pieces
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(" and ")
}

fn detect_fork(after: &Board, to: Square, us: Color, confidence: f32) -> Option<TacticalOpportunity> {
    let them = us.opposite();
    let actor_kind = after.piece_at(to)?.kind;
    let targets = enemy_targets(after, to, them);
    if targets.len() < 2 {
        return None;
    }
    let target_squares: Vec<Square> = targets.iter().map(|(sq, _)| *sq).collect();
    let target_pieces: Vec<PieceKind> = targets.iter().map(|(_, k)| *k).collect();
    let value = target_pieces.iter().map(|k| k.value() as f32).sum::<f32>();
    let confidence = discounted_confidence(after, to, &target_squares, them, confidence);
    let description = format!("fork against {} ({:.1})", names(&target_pieces), value);
    Some(TacticalOpportunity {
        kind: TacticKind::Fork,
        actor: to,
        actor_kind,
        target_squares,
        target_pieces,
        value,
        confidence,
        description,
    })
}

fn detect_discovered(
    before: &Board,
    after: &Board,
    mv: &UciMove,
    us: Color,
    confidence: f32,
) -> Vec<TacticalOpportunity> {
    let them = us.opposite();
    after
        .pieces(us)
        .filter(|(sq, p)| *sq != mv.to && p.kind.is_slider())
        .filter_map(|(sq, piece)| {
            let seen_before = before.attacks(sq);
            let fresh: Vec<(Square, PieceKind)> = enemy_targets(after, sq, them)
                .into_iter()
                .filter(|(t, _)| !seen_before.contains(t))
                .collect();
            if fresh.is_empty() {
                return None;
            }
            let target_squares: Vec<Square> = fresh.iter().map(|(t, _)| *t).collect();
            let target_pieces: Vec<PieceKind> = fresh.iter().map(|(_, k)| *k).collect();
            let value = target_pieces.iter().map(|k| k.value() as f32).sum::<f32>();
            let confidence = discounted_confidence(after, sq, &target_squares, them, confidence);
            let description = format!(
                "discovered attack by our {} on their {} ({:.1})",
                piece.kind.name(),
                names(&target_pieces),
                value
            );
            Some(TacticalOpportunity {
                kind: TacticKind::DiscoveredAttack,
                actor: sq,
                actor_kind: piece.kind,
                target_squares,
                target_pieces,
                value,
                confidence,
                description,
            })
        })
        .collect()
}
