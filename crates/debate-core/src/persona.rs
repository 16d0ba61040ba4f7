//! Piece Personas
//!
//! Per-kind scoring bonuses and voice lines. Every piece shares the same
//! scoring arithmetic in [`Agent`](crate::agent::Agent); the persona only adds
//! a kind-specific bonus before the risk adjustment and flavours the argument.

use debate_events::{Color, PieceKind};

use crate::board::{slider_directions, Board, Square, UciMove};
use crate::emotion::EmotionalState;
use crate::personality::InteractionProfile;
use crate::tactics::{TacticKind, TacticalOpportunity};

/// Rooks above this aggression go berserk.
const BERSERK_AGGRESSION: f32 = 0.8;

/// What a persona hook gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct PersonaContext<'a> {
    pub before: &'a Board,
    pub after: &'a Board,
    pub mv: &'a UciMove,
    pub color: Color,
    pub emotions: &'a EmotionalState,
}

impl PersonaContext<'_> {
    fn enemy_targets(&self) -> usize {
        let them = self.color.opposite();
        self.after
            .attacks(self.mv.to)
            .into_iter()
            .filter(|sq| self.after.piece_at(*sq).map(|p| p.color == them).unwrap_or(false))
            .count()
    }

    fn friendly_neighbours(&self) -> usize {
        (-1..=1)
            .flat_map(|df| (-1..=1).map(move |dr| (df, dr)))
            .filter(|&(df, dr)| (df, dr) != (0, 0))
            .filter_map(|(df, dr)| self.mv.to.offset(df, dr))
            .filter(|sq| self.after.piece_at(*sq).map(|p| p.color == self.color).unwrap_or(false))
            .count()
    }
}

/// Per-kind behaviour, dispatched by match rather than by trait object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl From<PieceKind> for Persona {
    fn from(kind: PieceKind) -> Self {
        match kind {
            PieceKind::Pawn => Persona::Pawn,
            PieceKind::Knight => Persona::Knight,
            PieceKind::Bishop => Persona::Bishop,
            PieceKind::Rook => Persona::Rook,
            PieceKind::Queen => Persona::Queen,
            PieceKind::King => Persona::King,
        }
    }
}

impl Persona {
    /// Kind-specific bonus added to the weighted evaluation.
    pub fn bonus(&self, ctx: &PersonaContext<'_>) -> f32 {
        match self {
            Persona::Pawn => pawn_bonus(ctx),
            Persona::Knight => knight_bonus(ctx),
            Persona::Bishop => bishop_bonus(ctx),
            Persona::Rook => rook_bonus(ctx),
            Persona::Queen => queen_bonus(ctx),
            Persona::King => king_bonus(ctx),
        }
    }

    /// One line of character, chosen by mood.
    pub fn voice(&self, emotions: &EmotionalState, kind: PieceKind) -> String {
        let profile = InteractionProfile::for_kind(kind);
        let style = if emotions.confidence() >= 0.7 {
            &profile.leadership_style
        } else if emotions.trust() >= 0.6 {
            &profile.cooperation_style
        } else {
            &profile.conflict_style
        };
        let cry = match (self, emotions.confidence() >= 0.5) {
            (Persona::Pawn, true) => "For the cause!",
            (Persona::Pawn, false) => "Someone has to hold the line.",
            (Persona::Knight, true) => "For honour and glory!",
            (Persona::Knight, false) => "Even a knight may feel doubt.",
            (Persona::Bishop, true) => "The diagonals shall carry the word.",
            (Persona::Bishop, false) => "Let us pray this works.",
            (Persona::Rook, true) if emotions.aggression() > BERSERK_AGGRESSION => {
                "NONE ARE SAFE!"
            }
            (Persona::Rook, true) => "The fortress holds.",
            (Persona::Rook, false) => "I would rather stay in my corner.",
            (Persona::Queen, true) => "The stage is mine.",
            (Persona::Queen, false) => "I must prove I'm not just running away...",
            (Persona::King, true) => "As my writings clearly establish, this is sound.",
            (Persona::King, false) => "Theoretically speaking, we are perfectly safe.",
        };
        format!("{} ({})", cry, style.to_lowercase())
    }

    /// Wraps an opportunity's description in the persona's manner.
    pub fn flavor_opportunity(&self, opp: &TacticalOpportunity, emotions: &EmotionalState) -> String {
        let eager = opp.confidence > 0.7 && emotions.confidence() > 0.6;
        let lead = match (self, opp.kind, eager) {
            (Persona::Knight, TacticKind::Fork, true) => "Aha! A brilliant",
            (Persona::Knight, TacticKind::Fork, false) => "I see a possible",
            (Persona::Knight, TacticKind::DiscoveredAttack, true) => "By moving away, I unleash a",
            (Persona::Knight, TacticKind::DiscoveredAttack, false) => "This might create a",
            (Persona::Pawn, TacticKind::Fork, _) => {
                "We shall strike at multiple symbols of oppression at once! A"
            }
            (Persona::Pawn, TacticKind::DiscoveredAttack, _) => {
                "The movement reveals new paths to victory! A"
            }
            (Persona::Bishop, TacticKind::Fork, true) => {
                "The light guides us to spread our message! A"
            }
            (Persona::Bishop, TacticKind::DiscoveredAttack, _) => {
                "By moving aside, we create a divine path. A"
            }
            (Persona::Rook, _, true) => "They thought they were safe! A",
            (Persona::Rook, _, false) => "I... I think I can do this... A",
            (Persona::Queen, _, true) => "Watch as I orchestrate this masterful",
            (Persona::Queen, _, false) => "I hope I don't mess up this",
            (Persona::King, _, true) => "Observe proper technique, as demonstrated: a",
            (Persona::King, _, false) => "According to my latest theoretical analysis, a",
            _ => "A",
        };
        format!("{} {}", lead, opp.description)
    }
}

/// Solidarity with neighbouring pawns, defiance of the pieces behind, and
/// dreams of promotion.
fn pawn_bonus(ctx: &PersonaContext<'_>) -> f32 {
    let e = ctx.emotions;
    let mut collective = 0.0;

    let supported = [-1, 1].iter().any(|&df| {
        ctx.mv
            .to
            .offset(df, -ctx.color.forward())
            .and_then(|sq| ctx.after.piece_at(sq))
            .map(|p| p.kind == PieceKind::Pawn && p.color == ctx.color)
            .unwrap_or(false)
    });
    if supported {
        collective += 0.2 * e.cooperation_bonus();
    }

    let blocking = ctx
        .mv
        .to
        .offset(0, -ctx.color.forward())
        .and_then(|sq| ctx.after.piece_at(sq))
        .map(|p| p.color == ctx.color && p.kind != PieceKind::Pawn)
        .unwrap_or(false);
    if blocking {
        collective += 0.25 * e.aggression();
    }

    let start_rank = if ctx.color == Color::White { 1 } else { 6 };
    let promotion_potential = (ctx.mv.to.rank().abs_diff(start_rank) as f32 / 6.0).min(1.0);
    let mut bonus = 0.0;
    if promotion_potential > 0.5 {
        collective *= 1.0 - promotion_potential * 0.5;
        bonus += promotion_potential * 2.0 * e.confidence();
    }
    bonus + collective
}

/// Knights love squares from which they can reach a lot.
fn knight_bonus(ctx: &PersonaContext<'_>) -> f32 {
    let reach = ctx.after.attacks(ctx.mv.to).len() as f32;
    reach * 0.05 * ctx.emotions.risk_modifier()
}

fn bishop_bonus(ctx: &PersonaContext<'_>) -> f32 {
    let e = ctx.emotions;
    let mut bonus = 0.0;
    let open = ctx.after.open_lines(ctx.mv.to, slider_directions(PieceKind::Bishop));
    if open >= 7 {
        bonus += 0.3 * e.confidence();
    }
    let bishops = ctx
        .after
        .pieces(ctx.color)
        .filter(|(_, p)| p.kind == PieceKind::Bishop)
        .count();
    if bishops >= 2 {
        bonus += 0.2 * e.cooperation_bonus();
    }
    // Enemy pieces within preaching range.
    bonus += ctx.enemy_targets() as f32 * 0.15 * e.morale();
    bonus
}

/// Open files and the enemy back rank tempt the rook; at high aggression it
/// throws caution away, otherwise it longs for home.
fn rook_bonus(ctx: &PersonaContext<'_>) -> f32 {
    let to = ctx.mv.to;
    let own_pawn_on_file = (0..8u8).any(|rank| {
        Square::new(to.file(), rank)
            .and_then(|sq| ctx.after.piece_at(sq))
            .map(|p| p.kind == PieceKind::Pawn && p.color == ctx.color)
            .unwrap_or(false)
    });
    let open_file = if own_pawn_on_file { 0.0 } else { 1.0 };
    let back_rank = if to.rank() == ctx.color.opposite().back_rank() {
        1.0
    } else {
        0.0
    };
    let glory = open_file * 0.5 + back_rank * 0.6 + ctx.enemy_targets() as f32 * 0.2;

    if ctx.emotions.aggression() > BERSERK_AGGRESSION {
        return glory * 1.5;
    }

    let distance_from_home = to.rank().abs_diff(ctx.color.back_rank()) as f32 / 7.0;
    let comfort = (1.0 - distance_from_home) * 0.3 + (ctx.friendly_neighbours().min(4) as f32 / 4.0) * 0.2;
    glory * 0.5 + comfort - 0.25
}

fn queen_bonus(ctx: &PersonaContext<'_>) -> f32 {
    let e = ctx.emotions;
    let center = if ctx.mv.to.is_center() {
        1.0
    } else if (2..=5).contains(&ctx.mv.to.file()) && (2..=5).contains(&ctx.mv.to.rank()) {
        0.5
    } else {
        0.0
    };
    let confident = e.confidence() > 0.5;
    let presence = if confident { 0.4 * center } else { -0.2 * center };
    let per_target = if confident { 0.3 } else { 0.1 };
    presence + ctx.enemy_targets() as f32 * per_target
}

/// Castling and a pawn shield soothe the king; leaving the back rank does not.
fn king_bonus(ctx: &PersonaContext<'_>) -> f32 {
    let e = ctx.emotions;
    let to = ctx.mv.to;
    let mut bonus = 0.0;
    if ctx.mv.from.file().abs_diff(to.file()) == 2 {
        bonus += 0.5;
    }
    let shield = [-1, 0, 1]
        .iter()
        .filter_map(|&df| to.offset(df, ctx.color.forward()))
        .filter(|sq| {
            ctx.after
                .piece_at(*sq)
                .map(|p| p.kind == PieceKind::Pawn && p.color == ctx.color)
                .unwrap_or(false)
        })
        .count();
    bonus += shield as f32 * 0.1;
    if to.rank() != ctx.color.back_rank() {
        bonus -= 0.3 * (1.0 - e.confidence());
    }
    if ctx.before.in_check(ctx.color) && !ctx.after.in_check(ctx.color) {
        bonus += 0.2;
    }
    bonus
}
