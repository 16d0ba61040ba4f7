//! Agents
//!
//! One agent per physical piece. An agent owns its personality and emotional
//! state, knows its square, and turns an external evaluation of a candidate
//! move into a scored [`MoveProposal`].

use debate_events::{
    AgentSnapshot, ArgumentContext, ArgumentGenerator, Color, ImpactMap, Interaction,
    InteractionType, PieceKind,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::board::{Board, Square, UciMove};
use crate::config::ScoringConfig;
use crate::emotion::EmotionalState;
use crate::evaluation::{Evaluation, PositionEvaluator};
use crate::persona::{Persona, PersonaContext};
use crate::personality::{PersonalityProfile, Theme};
use crate::position::Position;
use crate::tactics::{analyze_move, MoveTactics, TacticKind};

/// Agent ID for a piece, from its kind and starting square (e.g. "Ng1").
pub fn agent_id(kind: PieceKind, square: Square) -> String {
    format!("{}{}", kind.symbol(), square)
}

/// A candidate move argued for by one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveProposal {
    pub agent_id: String,
    /// Display name of the proposer
    pub agent_name: String,
    pub piece: PieceKind,
    #[serde(rename = "move")]
    pub move_uci: String,
    pub score: f32,
    /// External evaluation the score was computed from
    pub evaluation: Evaluation,
    pub argument: String,
    pub interaction_type: Option<InteractionType>,
    pub tactical_context: BTreeMap<String, bool>,
    /// Teammates the move directly involves
    pub affected_piece_ids: Vec<String>,
    /// Descriptions of detected opportunities, best first
    pub opportunities: Vec<String>,
}

/// Everything an agent needs to score a candidate move.
pub struct ProposalContext<'a> {
    pub position: &'a Position,
    pub board: &'a Board,
    pub evaluator: &'a dyn PositionEvaluator,
    pub narrator: &'a dyn ArgumentGenerator,
    pub scoring: &'a ScoringConfig,
    /// Agent ID per occupied square of our side
    pub occupants: &'a HashMap<Square, String>,
    /// A remembered moment this position brings back, if any
    pub memory_hint: Option<&'a str>,
}

/// Weighted evaluation plus bonus, then bounded risk adjustment.
///
/// With the default swing of 0.2, risk tolerance moves the score by at most
/// 10% either way.
pub fn weighted_score(
    eval: &Evaluation,
    personality: &PersonalityProfile,
    bonus: f32,
    risk_swing: f32,
) -> f32 {
    let tactical = (eval.material + eval.mobility) * personality.tactical_weight();
    let positional =
        (eval.positional + eval.center_control + eval.king_safety) * personality.positional_weight();
    let base = tactical + positional + bonus;
    let rt = personality.risk_tolerance();
    let risk_factor = if base > 0.0 {
        1.0 + (rt - 0.5) * risk_swing
    } else {
        1.0 + (0.5 - rt) * risk_swing
    };
    base * risk_factor
}

/// Saved agent state at a turn.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentMemento {
    pub turn: u32,
    pub emotional_state: EmotionalState,
    pub square: Square,
    pub piece: PieceKind,
    pub captured: bool,
}

#[derive(Debug, Clone)]
pub struct Agent {
    id: String,
    piece: PieceKind,
    persona: Persona,
    color: Color,
    square: Square,
    personality: PersonalityProfile,
    emotional_state: EmotionalState,
    recent_interactions: VecDeque<Interaction>,
    interaction_window: usize,
    captured: bool,
    snapshots: Vec<AgentMemento>,
}

impl Agent {
    pub fn new(
        id: impl Into<String>,
        piece: PieceKind,
        color: Color,
        square: Square,
        personality: PersonalityProfile,
    ) -> Self {
        Self {
            id: id.into(),
            piece,
            persona: Persona::from(piece),
            color,
            square,
            personality,
            emotional_state: EmotionalState::default_for(piece),
            recent_interactions: VecDeque::new(),
            interaction_window: 10,
            captured: false,
            snapshots: Vec::new(),
        }
    }

    pub fn with_emotional_state(mut self, state: EmotionalState) -> Self {
        self.emotional_state = state;
        self
    }

    pub fn with_interaction_window(mut self, window: usize) -> Self {
        self.interaction_window = window.max(1);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.personality.name()
    }

    pub fn piece(&self) -> PieceKind {
        self.piece
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn square(&self) -> Square {
        self.square
    }

    pub fn personality(&self) -> &PersonalityProfile {
        &self.personality
    }

    pub fn emotional_state(&self) -> &EmotionalState {
        &self.emotional_state
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    pub fn recent_interactions(&self) -> impl Iterator<Item = &Interaction> {
        self.recent_interactions.iter()
    }

    pub fn apply_impact(&mut self, impact: &ImpactMap) {
        self.emotional_state.apply_impact(impact);
    }

    /// Remembers an interaction, dropping the oldest beyond the window.
    pub fn remember(&mut self, interaction: Interaction) {
        self.recent_interactions.push_back(interaction);
        while self.recent_interactions.len() > self.interaction_window {
            self.recent_interactions.pop_front();
        }
    }

    pub(crate) fn move_to(&mut self, square: Square) {
        self.square = square;
    }

    /// A promoted pawn keeps its personality but plays as its new piece.
    pub(crate) fn promote(&mut self, kind: PieceKind) {
        self.piece = kind;
        self.persona = Persona::from(kind);
    }

    /// Swaps in a themed copy of the personality. Only used while a line-up
    /// is being assembled.
    pub(crate) fn retheme(&mut self, theme: Theme) {
        self.personality = self.personality.themed(theme);
    }

    pub(crate) fn mark_captured(&mut self) {
        self.captured = true;
    }

    /// Appends a deep copy of the mutable state for `turn`.
    pub fn save_snapshot(&mut self, turn: u32) {
        self.snapshots.push(AgentMemento {
            turn,
            emotional_state: self.emotional_state,
            square: self.square,
            piece: self.piece,
            captured: self.captured,
        });
    }

    /// Restores the most recently saved snapshot taken at or before `turn`.
    pub fn restore_snapshot(&mut self, turn: u32) -> bool {
        let Some(m) = self.snapshots.iter().rev().find(|m| m.turn <= turn).cloned() else {
            return false;
        };
        self.emotional_state = m.emotional_state;
        self.square = m.square;
        self.captured = m.captured;
        self.promote(m.piece);
        true
    }

    pub fn snapshots(&self) -> &[AgentMemento] {
        &self.snapshots
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            agent_id: self.id.clone(),
            name: self.name().to_string(),
            piece: self.piece,
            color: self.color,
            square: self.square.to_string(),
            captured: self.captured,
            emotions: self.emotional_state.snapshot(),
        }
    }

    /// Scores one candidate move.
    ///
    /// Returns `None` when the move cannot be analyzed or the evaluator fails;
    /// the agent then sits this round out.
    pub fn evaluate(&self, ctx: &ProposalContext<'_>, uci: &str) -> Option<MoveProposal> {
        let mv: UciMove = match uci.parse() {
            Ok(mv) => mv,
            Err(e) => {
                tracing::warn!("{} skipping {}: {}", self.id, uci, e);
                return None;
            }
        };
        let evaluation = match ctx
            .evaluator
            .evaluate(ctx.position, Some(uci))
            .and_then(Evaluation::validate)
        {
            Ok(eval) => eval,
            Err(e) => {
                tracing::warn!("Evaluation failed for {} ({}): {}", self.id, uci, e);
                return None;
            }
        };
        let tactics = match analyze_move(ctx.board, &mv, self.emotional_state.confidence()) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("{} cannot analyze {}: {}", self.id, uci, e);
                return None;
            }
        };

        let persona_ctx = PersonaContext {
            before: ctx.board,
            after: &tactics.board_after,
            mv: &mv,
            color: self.color,
            emotions: &self.emotional_state,
        };
        let opportunity_bonus = tactics
            .opportunities
            .first()
            .map(|o| o.weight() * ctx.scoring.opportunity_scale)
            .unwrap_or(0.0);
        let bonus = self.persona.bonus(&persona_ctx) + opportunity_bonus;
        let score = weighted_score(&evaluation, &self.personality, bonus, ctx.scoring.risk_swing);

        let interaction_type = classify(&tactics);
        let affected_piece_ids = self.affected_ids(&tactics, ctx.occupants);
        let opportunities: Vec<String> = tactics
            .opportunities
            .iter()
            .map(|o| self.persona.flavor_opportunity(o, &self.emotional_state))
            .collect();
        let active = tactics.flags.active();
        let voice = self.persona.voice(&self.emotional_state, self.piece);

        let argument = ctx.narrator.argument(&ArgumentContext {
            speaker: self.name(),
            piece: self.piece,
            move_uci: uci,
            score,
            composite_eval: evaluation.composite,
            emotions: self.emotional_state.snapshot(),
            tactics: &active,
            opportunities: &opportunities,
            voice: &voice,
            memory_hint: ctx.memory_hint,
        });

        Some(MoveProposal {
            agent_id: self.id.clone(),
            agent_name: self.name().to_string(),
            piece: self.piece,
            move_uci: uci.to_string(),
            score,
            evaluation,
            argument,
            interaction_type,
            tactical_context: tactics.flags.to_map(),
            affected_piece_ids,
            opportunities,
        })
    }

    /// Teammates the move defends, plus sliders whose line it opens.
    fn affected_ids(&self, tactics: &MoveTactics, occupants: &HashMap<Square, String>) -> Vec<String> {
        let discovered = tactics
            .opportunities
            .iter()
            .filter(|o| o.kind == TacticKind::DiscoveredAttack)
            .map(|o| o.actor);
        let mut ids: Vec<String> = Vec::new();
        for sq in tactics.supported.iter().copied().chain(discovered) {
            if let Some(id) = occupants.get(&sq) {
                if id != &self.id && !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
        }
        ids
    }
}

/// Interaction type a move implies on its own.
fn classify(tactics: &MoveTactics) -> Option<InteractionType> {
    let flags = &tactics.flags;
    if flags.sacrifice {
        Some(InteractionType::Sacrifice)
    } else if flags.support {
        Some(InteractionType::Support)
    } else if flags.discovered_attack || flags.fork {
        Some(InteractionType::Cooperation)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{EvaluationError, MaterialEvaluator};
    use crate::personality::PersonalityFactory;
    use narrator::TemplateNarrator;

    struct FixedEvaluator(Evaluation);

    impl PositionEvaluator for FixedEvaluator {
        fn evaluate(&self, _: &Position, _: Option<&str>) -> Result<Evaluation, EvaluationError> {
            Ok(self.0)
        }
    }

    struct DownEvaluator;

    impl PositionEvaluator for DownEvaluator {
        fn evaluate(&self, _: &Position, _: Option<&str>) -> Result<Evaluation, EvaluationError> {
            Err(EvaluationError::Unavailable("engine offline".into()))
        }
    }

    fn knight() -> Agent {
        let personality = PersonalityFactory::new().create(PieceKind::Knight, 0).unwrap();
        let sq: Square = "g1".parse().unwrap();
        Agent::new(agent_id(PieceKind::Knight, sq), PieceKind::Knight, Color::White, sq, personality)
    }

    fn eval(material: f32, positional: f32) -> Evaluation {
        Evaluation {
            material,
            positional,
            ..Evaluation::default()
        }
    }

    #[test]
    fn test_weighted_score_formula() {
        let personality = PersonalityFactory::new().create(PieceKind::Knight, 0).unwrap();
        // tactical = 1.0 * 1.2, positional = 0.5 * 0.8, base = 1.6
        // risk factor = 1 + (0.7 - 0.5) * 0.2 = 1.04
        let score = weighted_score(&eval(1.0, 0.5), &personality, 0.0, 0.2);
        assert!((score - 1.6 * 1.04).abs() < 1e-5, "{}", score);
    }

    #[test]
    fn test_negative_base_is_dampened_by_risk_taker() {
        let personality = PersonalityFactory::new().create(PieceKind::Queen, 0).unwrap();
        // base = -1.3, factor = 1 + (0.5 - 0.8) * 0.2 = 0.94
        let score = weighted_score(&eval(-1.0, 0.0), &personality, 0.0, 0.2);
        assert!((score - (-1.3 * 0.94)).abs() < 1e-5, "{}", score);
    }

    #[test]
    fn test_risk_bounded_to_ten_percent() {
        let factory = PersonalityFactory::new();
        for kind in PieceKind::all() {
            let p = factory.create(*kind, 0).unwrap();
            let neutral = eval(2.0, 1.0);
            let raw = (2.0 * p.tactical_weight()) + (1.0 * p.positional_weight());
            let scored = weighted_score(&neutral, &p, 0.0, 0.2);
            assert!((scored / raw - 1.0).abs() <= 0.1 + 1e-6);
        }
    }

    #[test]
    fn test_evaluate_builds_proposal() {
        let agent = knight();
        let position = Position::starting();
        let board = position.board().unwrap();
        let narrator = TemplateNarrator::with_defaults();
        let evaluator = MaterialEvaluator::new();
        let occupants = HashMap::new();
        let scoring = ScoringConfig::default();
        let ctx = ProposalContext {
            position: &position,
            board: &board,
            evaluator: &evaluator,
            narrator: &narrator,
            scoring: &scoring,
            occupants: &occupants,
            memory_hint: None,
        };
        let proposal = agent.evaluate(&ctx, "g1f3").expect("proposal");
        assert_eq!(proposal.agent_id, "Ng1");
        assert_eq!(proposal.agent_name, "Sir Galahop");
        assert_eq!(proposal.move_uci, "g1f3");
        assert!(proposal.score.is_finite());
        assert!(!proposal.argument.is_empty());
        assert_eq!(proposal.tactical_context.len(), 7);
        assert_eq!(proposal.interaction_type, None);
    }

    #[test]
    fn test_evaluator_failure_skips_agent() {
        let agent = knight();
        let position = Position::starting();
        let board = position.board().unwrap();
        let narrator = TemplateNarrator::with_defaults();
        let occupants = HashMap::new();
        let scoring = ScoringConfig::default();
        let ctx = ProposalContext {
            position: &position,
            board: &board,
            evaluator: &DownEvaluator,
            narrator: &narrator,
            scoring: &scoring,
            occupants: &occupants,
            memory_hint: None,
        };
        assert!(agent.evaluate(&ctx, "g1f3").is_none());
    }

    #[test]
    fn test_malformed_evaluation_skips_agent() {
        let agent = knight();
        let position = Position::starting();
        let board = position.board().unwrap();
        let narrator = TemplateNarrator::with_defaults();
        let evaluator = FixedEvaluator(Evaluation {
            mobility: f32::NAN,
            ..Evaluation::default()
        });
        let occupants = HashMap::new();
        let scoring = ScoringConfig::default();
        let ctx = ProposalContext {
            position: &position,
            board: &board,
            evaluator: &evaluator,
            narrator: &narrator,
            scoring: &scoring,
            occupants: &occupants,
            memory_hint: None,
        };
        assert!(agent.evaluate(&ctx, "g1f3").is_none());
    }

    #[test]
    fn test_fixed_evaluation_matches_formula_plus_bonus() {
        let agent = knight();
        let position = Position::starting();
        let board = position.board().unwrap();
        let narrator = TemplateNarrator::with_defaults();
        let evaluator = FixedEvaluator(Evaluation::default());
        let occupants = HashMap::new();
        let scoring = ScoringConfig::default();
        let ctx = ProposalContext {
            position: &position,
            board: &board,
            evaluator: &evaluator,
            narrator: &narrator,
            scoring: &scoring,
            occupants: &occupants,
            memory_hint: None,
        };
        // Only the knight's mobility bonus remains: 8 squares * 0.05 * risk.
        let risk = agent.emotional_state().risk_modifier();
        let expected = 8.0 * 0.05 * risk * 1.04;
        let proposal = agent.evaluate(&ctx, "g1f3").unwrap();
        assert!((proposal.score - expected).abs() < 1e-5, "{} vs {}", proposal.score, expected);
    }

    #[test]
    fn test_snapshot_restore_by_turn() {
        let mut agent = knight();
        agent.save_snapshot(1);
        agent.apply_impact(&ImpactMap::from([(debate_events::Metric::Confidence, -0.5)]));
        agent.move_to("f3".parse().unwrap());
        agent.save_snapshot(3);
        agent.apply_impact(&ImpactMap::from([(debate_events::Metric::Morale, -0.5)]));

        assert!(agent.restore_snapshot(2), "turn 2 falls back to turn 1");
        assert_eq!(agent.emotional_state().confidence(), 0.7);
        assert_eq!(agent.square().to_string(), "g1");

        assert!(agent.restore_snapshot(10));
        assert!((agent.emotional_state().confidence() - 0.2).abs() < 1e-6);
        assert_eq!(agent.square().to_string(), "f3");
        assert_eq!(agent.emotional_state().morale(), 0.8);

        assert!(!agent.restore_snapshot(0));
    }

    #[test]
    fn test_recent_interactions_bounded() {
        let mut agent = knight().with_interaction_window(2);
        for turn in 0..5 {
            agent.remember(Interaction::new("Ng1", "Pe2", InteractionType::Support, turn, "g1f3", 0.1));
        }
        let turns: Vec<u32> = agent.recent_interactions().map(|i| i.turn).collect();
        assert_eq!(turns, vec![3, 4]);
    }
}
