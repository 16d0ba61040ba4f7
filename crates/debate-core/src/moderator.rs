//! Debate Moderator
//!
//! Runs one debate per turn: every agent whose piece can move argues for its
//! candidate moves, proposals are ranked, consensus is checked and a winner is
//! chosen. The outcome then ripples through relationships, team psychology,
//! agent emotions and game memory.
//!
//! Proposal gathering is the only parallel phase. Every mutation happens after
//! the join, on the caller's thread.

use debate_events::{
    generate_snapshot_id, ArgumentGenerator, Color, DebateRecord, GameMoment, GameSnapshot,
    ImpactMap, Interaction, InteractionType, Metric, MomentContext, PieceKind, ProposalRecord,
    PsychologySnapshot, RelationshipSnapshot, SimEvent,
};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use uuid::Uuid;

use crate::agent::{Agent, MoveProposal, ProposalContext};
use crate::board::{Board, BoardError, Square, UciMove};
use crate::config::SimConfig;
use crate::error::DebateError;
use crate::evaluation::PositionEvaluator;
use crate::log::PendingEvents;
use crate::mediator::{InteractionMediator, OpponentImpact};
use crate::memory::GameMemory;
use crate::observer::{AgentObserver, TeamObserver, TeamState};
use crate::personality::{PersonalityFactory, Theme};
use crate::position::Position;
use crate::psychology::PsychologicalState;
use crate::relationship::RelationshipNetwork;
use crate::roster::AgentRoster;
use crate::selection::{HighestScore, SelectionPolicy};

/// Where the moderator is within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebatePhase {
    Idle,
    GatheringProposals,
    Ranking,
    ConsensusCheck,
    WinnerSelected,
    ImpactApplied,
}

impl fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DebatePhase::Idle => "idle",
            DebatePhase::GatheringProposals => "gathering_proposals",
            DebatePhase::Ranking => "ranking",
            DebatePhase::ConsensusCheck => "consensus_check",
            DebatePhase::WinnerSelected => "winner_selected",
            DebatePhase::ImpactApplied => "impact_applied",
        };
        f.write_str(name)
    }
}

/// One turn's ranked proposals and, once chosen, its winner.
#[derive(Debug, Clone)]
pub struct DebateRound {
    turn: u32,
    position: Position,
    proposals: Vec<MoveProposal>,
    winner: Option<usize>,
    consensus_margin: f32,
}

impl DebateRound {
    /// `proposals` must already be ranked best first.
    pub fn new(turn: u32, position: Position, proposals: Vec<MoveProposal>, consensus_margin: f32) -> Self {
        Self {
            turn,
            position,
            proposals,
            winner: None,
            consensus_margin,
        }
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn proposals(&self) -> &[MoveProposal] {
        &self.proposals
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    /// Fewer than two proposals, or the top two closer than the margin.
    pub fn has_consensus(&self) -> bool {
        match self.proposals.as_slice() {
            [first, second, ..] => (first.score - second.score).abs() < self.consensus_margin,
            _ => true,
        }
    }

    pub fn winner_index(&self) -> Option<usize> {
        self.winner
    }

    pub fn winning_proposal(&self) -> Option<&MoveProposal> {
        self.winner.and_then(|i| self.proposals.get(i))
    }

    pub fn record(&self) -> DebateRecord {
        DebateRecord {
            turn: self.turn,
            position: self.position.fen.clone(),
            proposals: self
                .proposals
                .iter()
                .map(|p| ProposalRecord {
                    agent_id: p.agent_id.clone(),
                    piece: p.piece,
                    move_uci: p.move_uci.clone(),
                    score: p.score,
                    interaction_type: p.interaction_type,
                })
                .collect(),
            consensus: self.has_consensus(),
            winner: self.winner,
        }
    }
}

/// How a round ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DebateOutcome {
    Winner(MoveProposal),
    /// Nobody could propose a move; the caller decides what that means for the game
    NoProposals,
}

/// Stable descending sort by score. Equal scores keep their input order.
pub fn rank_proposals(proposals: &mut [MoveProposal]) {
    proposals.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

/// Team impact of a chosen proposal, from its classification and tactics.
pub fn outcome_impact(interaction_type: InteractionType, tactics: &BTreeMap<String, bool>) -> ImpactMap {
    let mut impact = ImpactMap::new();
    let mut add = |metric: Metric, delta: f32| *impact.entry(metric).or_insert(0.0) += delta;
    match interaction_type {
        InteractionType::Sacrifice => {
            add(Metric::Morale, 0.1);
            add(Metric::Cohesion, 0.15);
        }
        InteractionType::Competition => {
            add(Metric::Morale, -0.05);
            add(Metric::Cohesion, -0.1);
        }
        InteractionType::Cooperation => {
            add(Metric::Coordination, 0.1);
            add(Metric::Cohesion, 0.1);
        }
        InteractionType::Support => {
            add(Metric::Morale, 0.1);
            add(Metric::Leadership, 0.05);
        }
        _ => {}
    }
    let flag = |name: &str| tactics.get(name).copied().unwrap_or(false);
    if flag("check") {
        add(Metric::Confidence, 0.1);
    }
    if flag("discovered_attack") {
        add(Metric::Coordination, 0.15);
    }
    if flag("promotion") {
        add(Metric::Morale, 0.2);
    }
    impact
}

pub struct DebateModerator {
    color: Color,
    game_id: Uuid,
    team: TeamState,
    mediator: InteractionMediator,
    memory: GameMemory,
    history: Vec<DebateRound>,
    phase: DebatePhase,
    evaluator: Box<dyn PositionEvaluator>,
    narrator: Box<dyn ArgumentGenerator>,
    policy: Box<dyn SelectionPolicy>,
    config: SimConfig,
    events: PendingEvents,
}

impl DebateModerator {
    /// A moderator over an existing roster. Every agent gets an observer,
    /// followed by the team observer.
    pub fn new(
        roster: AgentRoster,
        color: Color,
        evaluator: Box<dyn PositionEvaluator>,
        narrator: Box<dyn ArgumentGenerator>,
        config: SimConfig,
    ) -> Self {
        let mut mediator = InteractionMediator::new(config.opponent.clone());
        for agent in roster.iter() {
            mediator.register(Box::new(AgentObserver::new(agent.id())));
        }
        mediator.register(Box::new(TeamObserver::new(config.psychology.clone())));
        tracing::debug!("{} observers registered", mediator.observer_count());

        Self {
            color,
            game_id: Uuid::new_v4(),
            team: TeamState::new(roster, config.relationships.clone()),
            mediator,
            memory: GameMemory::new(config.memory.clone()),
            history: Vec::new(),
            phase: DebatePhase::Idle,
            evaluator,
            narrator,
            policy: Box::new(HighestScore),
            config,
            events: PendingEvents::default(),
        }
    }

    /// One agent per piece of the side to move in `fen`, with the built-in
    /// personalities.
    pub fn standard_lineup(
        fen: &str,
        evaluator: Box<dyn PositionEvaluator>,
        narrator: Box<dyn ArgumentGenerator>,
        config: SimConfig,
    ) -> Result<Self, DebateError> {
        Self::lineup_with(fen, &PersonalityFactory::new(), evaluator, narrator, config)
    }

    pub fn lineup_with(
        fen: &str,
        factory: &PersonalityFactory,
        evaluator: Box<dyn PositionEvaluator>,
        narrator: Box<dyn ArgumentGenerator>,
        config: SimConfig,
    ) -> Result<Self, DebateError> {
        let board = Board::from_fen(fen)?;
        let color = board.side_to_move();
        let roster = AgentRoster::lineup(&board, color, factory, None, config.relationships.agent_window)?;
        Ok(Self::new(roster, color, evaluator, narrator, config))
    }

    /// Applies a theme to every personality.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        for agent in self.team.roster.iter_mut() {
            agent.retheme(theme);
        }
        self
    }

    pub fn with_policy(mut self, policy: Box<dyn SelectionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_game_id(mut self, game_id: Uuid) -> Self {
        self.game_id = game_id;
        self
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    pub fn phase(&self) -> DebatePhase {
        self.phase
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn roster(&self) -> &AgentRoster {
        &self.team.roster
    }

    pub fn agent(&self, id: &str) -> Option<&Agent> {
        self.team.roster.get(id)
    }

    pub fn memory(&self) -> &GameMemory {
        &self.memory
    }

    pub fn history(&self) -> &[DebateRound] {
        &self.history
    }

    pub fn current_round(&self) -> Option<&DebateRound> {
        self.history.last()
    }

    /// Turn number of the latest round (0 before the first debate).
    pub fn turn(&self) -> u32 {
        self.history.len() as u32
    }

    pub fn psychology(&self) -> &PsychologicalState {
        &self.team.psychology
    }

    pub fn psychological_state(&self) -> PsychologySnapshot {
        self.team.psychology.snapshot()
    }

    pub fn relationship_network(&self) -> &RelationshipNetwork {
        &self.team.relationships
    }

    pub fn relationship_snapshot(&self) -> RelationshipSnapshot {
        self.team.relationships.snapshot()
    }

    /// Events produced since the last drain, for the event log.
    pub fn drain_events(&mut self) -> Vec<(u32, SimEvent)> {
        self.events.drain()
    }

    fn enter(&mut self, phase: DebatePhase) {
        tracing::debug!("Turn {}: {} -> {}", self.turn(), self.phase, phase);
        self.phase = phase;
    }

    /// Runs gathering, ranking and the consensus check for a new turn. The
    /// returned round has no winner yet.
    pub fn conduct_debate(&mut self, position: &Position, legal_moves: &[String]) -> Result<&DebateRound, DebateError> {
        let board = position.board()?;
        if let Some(open) = self.history.last().filter(|r| r.winner.is_none() && !r.is_empty()) {
            tracing::warn!("Turn {} closed without a winner", open.turn);
        }
        let turn = self.turn() + 1;

        self.enter(DebatePhase::GatheringProposals);
        let mut proposals = self.gather_proposals(position, &board, legal_moves);
        self.replay_triggers(position, &proposals);

        self.enter(DebatePhase::Ranking);
        rank_proposals(&mut proposals);

        self.enter(DebatePhase::ConsensusCheck);
        let round = DebateRound::new(turn, position.clone(), proposals, self.config.debate.consensus_margin);
        tracing::info!(
            "Turn {}: {} proposals, consensus: {}",
            turn,
            round.proposals.len(),
            round.has_consensus()
        );
        self.history.push(round);
        self.history.last().ok_or(DebateError::NoPendingRound)
    }

    /// One proposal per legal move whose origin square holds one of our
    /// agents and whose evaluation succeeded, in legal-move order.
    fn gather_proposals(&self, position: &Position, board: &Board, legal_moves: &[String]) -> Vec<MoveProposal> {
        let mut tasks: Vec<(&Agent, &str)> = Vec::new();
        for uci in legal_moves {
            let Some(agent) = uci
                .get(0..2)
                .and_then(|s| s.parse::<Square>().ok())
                .and_then(|sq| self.team.roster.at_square(sq))
            else {
                tracing::debug!("No agent owns the origin of {}", uci);
                continue;
            };
            tasks.push((agent, uci.as_str()));
        }

        let hints: HashMap<&str, String> = tasks
            .iter()
            .filter_map(|(agent, _)| {
                self.memory
                    .matching_triggers(agent.id(), &position.fen)
                    .first()
                    .map(|t| (agent.id(), t.narrative.clone()))
            })
            .collect();
        let occupants = self.team.roster.occupants();
        let evaluator = self.evaluator.as_ref();
        let narrator = self.narrator.as_ref();
        let scoring = &self.config.scoring;

        let evaluate = |(agent, uci): &(&Agent, &str)| {
            let ctx = ProposalContext {
                position,
                board,
                evaluator,
                narrator,
                scoring,
                occupants: &occupants,
                memory_hint: hints.get(agent.id()).map(String::as_str),
            };
            agent.evaluate(&ctx, uci)
        };

        let proposals: Vec<MoveProposal> = if self.config.debate.parallel_evaluation {
            tasks.par_iter().filter_map(evaluate).collect()
        } else {
            tasks.iter().filter_map(evaluate).collect()
        };
        if proposals.len() < tasks.len() {
            tracing::warn!(
                "{} of {} candidate moves produced no proposal",
                tasks.len() - proposals.len(),
                tasks.len()
            );
        }
        proposals
    }

    /// Re-lives remembered moments for agents that spoke up in a familiar
    /// position.
    fn replay_triggers(&mut self, position: &Position, proposals: &[MoveProposal]) {
        let scale = self.config.debate.trigger_replay_scale;
        let speakers: BTreeSet<&str> = proposals.iter().map(|p| p.agent_id.as_str()).collect();
        for id in speakers {
            let replay: Vec<ImpactMap> = self
                .memory
                .matching_triggers(id, &position.fen)
                .iter()
                .map(|t| t.impacts.iter().map(|(m, v)| (*m, v * scale)).collect())
                .collect();
            if let Some(agent) = self.team.roster.get_mut(id) {
                for impact in &replay {
                    tracing::debug!("{} relives an old memory", id);
                    agent.apply_impact(impact);
                }
            }
        }
    }

    /// Marks the proposal at `index` as the winner and applies its impact.
    ///
    /// An index outside the proposal list is an error and leaves the round
    /// without a winner.
    pub fn select_winning_proposal(&mut self, index: usize) -> Result<MoveProposal, DebateError> {
        let round = self.history.last_mut().ok_or(DebateError::NoPendingRound)?;
        if round.winner.is_some() {
            return Err(DebateError::WinnerAlreadySelected { turn: round.turn });
        }
        let len = round.proposals.len();
        let winner = round
            .proposals
            .get(index)
            .cloned()
            .ok_or(DebateError::InvalidSelection { index, len })?;
        round.winner = Some(index);

        self.enter(DebatePhase::WinnerSelected);
        tracing::info!(
            "Turn {}: {} wins with {} ({:.2})",
            self.turn(),
            winner.agent_name,
            winner.move_uci,
            winner.score
        );
        self.apply_outcome(index)?;
        self.enter(DebatePhase::ImpactApplied);
        self.enter(DebatePhase::Idle);
        Ok(winner)
    }

    /// Picks the winner with the configured policy.
    pub fn choose_winning_proposal(&mut self) -> Result<DebateOutcome, DebateError> {
        let round = self.history.last().ok_or(DebateError::NoPendingRound)?;
        if round.winner.is_some() {
            return Err(DebateError::WinnerAlreadySelected { turn: round.turn });
        }
        let Some(index) = self.policy.choose(&round.proposals) else {
            tracing::info!("Turn {}: no proposals, no winner", round.turn);
            let (turn, record) = (round.turn, round.record());
            self.events.push(turn, SimEvent::Debate(record));
            self.enter(DebatePhase::Idle);
            return Ok(DebateOutcome::NoProposals);
        };
        self.select_winning_proposal(index).map(DebateOutcome::Winner)
    }

    /// Debates, chooses and plays the winning move on our roster.
    pub fn play_turn(&mut self, position: &Position, legal_moves: &[String]) -> Result<DebateOutcome, DebateError> {
        self.conduct_debate(position, legal_moves)?;
        let outcome = self.choose_winning_proposal()?;
        if let DebateOutcome::Winner(ref winner) = outcome {
            self.apply_own_move(&winner.move_uci)?;
        }
        Ok(outcome)
    }

    fn apply_outcome(&mut self, index: usize) -> Result<(), DebateError> {
        let round = self.history.last().ok_or(DebateError::NoPendingRound)?;
        let turn = round.turn;
        let fen = round.position.fen.clone();
        let consensus = round.has_consensus();
        let record = round.record();
        let winner = round.proposals[index].clone();
        let counterpart = round
            .proposals
            .iter()
            .find(|p| p.agent_id != winner.agent_id)
            .map(|p| p.agent_id.clone());
        let mut others: Vec<String> = Vec::new();
        for p in &round.proposals {
            if p.agent_id != winner.agent_id && !others.contains(&p.agent_id) {
                others.push(p.agent_id.clone());
            }
        }

        let debate = &self.config.debate;
        let interaction_type = self.config.classification.classify(index, winner.interaction_type);
        if let Some(counterpart) = &counterpart {
            let impact = if index == 0 {
                debate.top_pick_impact
            } else {
                debate.other_pick_impact
            };
            let interaction = Interaction::new(
                winner.agent_id.clone(),
                counterpart.clone(),
                interaction_type,
                turn,
                winner.move_uci.clone(),
                impact,
            )
            .with_context(format!("{}'s {} carried the debate", winner.agent_name, winner.move_uci));
            if self.mediator.register_interaction(interaction.clone(), &mut self.team) {
                self.events.push(turn, SimEvent::Interaction(interaction));
            }
        }

        if consensus {
            tracing::debug!("Turn {}: consensus lifts the team", turn);
            let bonus = self.config.debate.consensus_impact();
            self.team.psychology.on_consensus(&bonus);
        }

        self.scale_confidence(&winner.agent_id, self.config.debate.winner_confidence_scale);
        for id in &others {
            self.scale_confidence(id, self.config.debate.loser_confidence_scale);
        }

        let moment = self.outcome_moment(&winner, interaction_type, counterpart, &fen, turn);
        self.mediator.notify_moment(&moment, &mut self.team);
        self.memory.record_moment(&winner.agent_id, moment);
        if let Some(recorded) = self.memory.moments().last() {
            self.events.push(turn, SimEvent::Moment(recorded.clone()));
        }

        self.events.push(turn, SimEvent::Debate(record));
        self.events.push(turn, SimEvent::Psychology(self.team.psychology.snapshot()));
        self.team.roster.save_snapshots(turn);
        Ok(())
    }

    fn scale_confidence(&mut self, id: &str, factor: f32) {
        if let Some(agent) = self.team.roster.get_mut(id) {
            let delta = agent.emotional_state().confidence_scaling(factor);
            agent.apply_impact(&delta);
        }
    }

    fn outcome_moment(
        &self,
        winner: &MoveProposal,
        interaction_type: InteractionType,
        counterpart: Option<String>,
        fen: &str,
        turn: u32,
    ) -> GameMoment {
        let mut participants = vec![winner.agent_id.clone()];
        for id in counterpart.into_iter().chain(winner.affected_piece_ids.iter().cloned()) {
            if !participants.contains(&id) {
                participants.push(id);
            }
        }
        let mut moment = GameMoment {
            moment_id: String::new(),
            position: fen.to_string(),
            move_uci: winner.move_uci.clone(),
            impact: BTreeMap::from([(
                winner.agent_id.clone(),
                outcome_impact(interaction_type, &winner.tactical_context),
            )]),
            turn,
            narrative: String::new(),
            participants,
            interaction_type: Some(interaction_type),
        };
        moment.narrative = self.narrator.moment_line(&MomentContext {
            speaker: &winner.agent_name,
            move_uci: &winner.move_uci,
            turn,
            interaction_type: Some(interaction_type),
            significance: moment.significance(),
        });
        moment
    }

    /// Moves our agent along with the move just played, including the rook
    /// when castling and the new piece kind on promotion.
    pub fn apply_own_move(&mut self, uci: &str) -> Result<(), DebateError> {
        let mv: UciMove = uci.parse()?;
        let agent = self
            .team
            .roster
            .at_square(mv.from)
            .ok_or_else(|| DebateError::UnknownAgent(mv.from.to_string()))?;
        let castling = agent.piece() == PieceKind::King && mv.from.file().abs_diff(mv.to.file()) == 2;

        self.team.roster.relocate(mv.from, mv.to);
        if castling {
            let rank = mv.from.rank();
            let (rook_from, rook_to) = if mv.to.file() > mv.from.file() { (7, 5) } else { (0, 3) };
            if let (Some(from), Some(to)) = (Square::new(rook_from, rank), Square::new(rook_to, rank)) {
                self.team.roster.relocate(from, to);
            }
        }
        if let Some(kind) = mv.promotion {
            self.team.roster.promote(mv.to, kind);
        }
        self.team.roster.save_snapshots(self.turn());
        Ok(())
    }

    /// Applies an opposing move played from `before`. Returns the ID of any
    /// agent it captured.
    pub fn apply_opponent_move(&mut self, before: &Position, uci: &str) -> Result<Option<String>, DebateError> {
        let board = before.board()?;
        let mv: UciMove = uci.parse()?;
        let mover = board.piece_at(mv.from).ok_or(BoardError::EmptySquare(mv.from))?;
        let en_passant = mover.kind == PieceKind::Pawn
            && mv.from.file() != mv.to.file()
            && board.piece_at(mv.to).is_none();
        let target = if en_passant {
            Square::new(mv.to.file(), mv.from.rank()).unwrap_or(mv.to)
        } else {
            mv.to
        };
        let captured = self.team.roster.capture_at(target);
        self.team.roster.save_snapshots(self.turn());
        Ok(captured)
    }

    /// Registers what an opposing move did to our agents and remembers the
    /// resulting moments.
    pub fn register_opponent_action(
        &mut self,
        position: &Position,
        move_uci: &str,
        affected: &[String],
        interaction_type: InteractionType,
    ) -> OpponentImpact {
        let turn = self.turn();
        let report = self.mediator.register_opponent_action(
            &position.fen,
            move_uci,
            affected,
            interaction_type,
            turn,
            &mut self.team,
        );
        for interaction in &report.interactions {
            self.events.push(turn, SimEvent::Interaction(interaction.clone()));
        }
        for moment in &report.moments {
            let mover = moment.participants.first().cloned().unwrap_or_default();
            self.memory.record_moment(&mover, moment.clone());
            if let Some(recorded) = self.memory.moments().last() {
                self.events.push(turn, SimEvent::Moment(recorded.clone()));
            }
        }
        if !report.interactions.is_empty() {
            self.events.push(turn, SimEvent::Psychology(self.team.psychology.snapshot()));
            self.team.roster.save_snapshots(turn);
        }
        report
    }

    /// Records an interaction between two agents.
    pub fn register_interaction(&mut self, interaction: Interaction) -> bool {
        let turn = interaction.turn;
        let accepted = self.mediator.register_interaction(interaction.clone(), &mut self.team);
        if accepted {
            self.events.push(turn, SimEvent::Interaction(interaction));
        }
        accepted
    }

    /// Rolls every agent back to its state at the end of `turn`.
    pub fn restore_turn(&mut self, turn: u32) -> usize {
        let restored = self.team.roster.restore_snapshots(turn);
        tracing::info!("Restored {} agents to turn {}", restored, turn);
        restored
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            snapshot_id: generate_snapshot_id(self.turn() as u64),
            game_id: self.game_id,
            turn: self.turn(),
            psychology: self.team.psychology.snapshot(),
            relationships: self.team.relationships.snapshot(),
            agents: self.team.roster.snapshot(),
        }
    }

    /// Numbered proposals with their arguments, then the winner.
    pub fn summarize_round(&self, round: &DebateRound) -> String {
        let mut parts: Vec<String> = round
            .proposals
            .iter()
            .enumerate()
            .map(|(i, p)| {
                format!(
                    "{}. {}'s proposal (score: {:.2}):\n{}\n",
                    i + 1,
                    p.agent_name,
                    p.score,
                    p.argument
                )
            })
            .collect();
        if let Some(winner) = round.winning_proposal() {
            parts.push(format!("\nWinning move: {}'s proposal", winner.agent_name));
        }
        parts.join("\n")
    }

    pub fn debate_history_summaries(&self) -> Vec<String> {
        self.history
            .iter()
            .enumerate()
            .map(|(i, round)| format!("Turn {}:\n{}", i + 1, self.summarize_round(round)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::Evaluation;

    fn proposal(agent: &str, uci: &str, score: f32) -> MoveProposal {
        MoveProposal {
            agent_id: agent.into(),
            agent_name: agent.into(),
            piece: PieceKind::Pawn,
            move_uci: uci.into(),
            score,
            evaluation: Evaluation::default(),
            argument: format!("{} argues for {}", agent, uci),
            interaction_type: None,
            tactical_context: BTreeMap::new(),
            affected_piece_ids: Vec::new(),
            opportunities: Vec::new(),
        }
    }

    fn round(scores: &[f32]) -> DebateRound {
        let proposals = scores
            .iter()
            .enumerate()
            .map(|(i, s)| proposal(&format!("P{}", i), "e2e4", *s))
            .collect();
        DebateRound::new(1, Position::starting(), proposals, 0.2)
    }

    #[test]
    fn test_rank_is_stable() {
        let mut proposals = vec![
            proposal("A", "a2a3", 3.0),
            proposal("B", "b2b3", 3.0),
            proposal("C", "c2c3", 1.0),
        ];
        rank_proposals(&mut proposals);
        let order: Vec<&str> = proposals.iter().map(|p| p.agent_id.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);

        let mut proposals = vec![
            proposal("C", "c2c3", 1.0),
            proposal("A", "a2a3", 3.0),
            proposal("B", "b2b3", 3.0),
        ];
        rank_proposals(&mut proposals);
        let order: Vec<&str> = proposals.iter().map(|p| p.agent_id.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);

        // Signed zeros compare equal and keep their input order
        let mut proposals = vec![proposal("A", "a2a3", -0.0), proposal("B", "b2b3", 0.0)];
        rank_proposals(&mut proposals);
        let order: Vec<&str> = proposals.iter().map(|p| p.agent_id.as_str()).collect();
        assert_eq!(order, vec!["A", "B"]);
    }

    #[test]
    fn test_consensus_boundary() {
        assert!(round(&[]).has_consensus());
        assert!(round(&[5.0]).has_consensus());
        assert!(round(&[1.0, 0.9]).has_consensus());
        assert!(!round(&[1.5, 1.0]).has_consensus());
        // Exactly the margin apart is not a consensus.
        assert!(!round(&[0.2, 0.0]).has_consensus());
        assert!(!round(&[2.0, 1.75]).has_consensus());
    }

    #[test]
    fn test_outcome_impact_combines_tactics() {
        let tactics = BTreeMap::from([
            ("check".to_string(), true),
            ("discovered_attack".to_string(), true),
            ("promotion".to_string(), false),
        ]);
        let impact = outcome_impact(InteractionType::Cooperation, &tactics);
        assert!((impact[&Metric::Coordination] - 0.25).abs() < 1e-6);
        assert!((impact[&Metric::Cohesion] - 0.1).abs() < 1e-6);
        assert!((impact[&Metric::Confidence] - 0.1).abs() < 1e-6);
        assert!(!impact.contains_key(&Metric::Morale));

        let competition = outcome_impact(InteractionType::Competition, &BTreeMap::new());
        assert!(competition.values().all(|v| *v < 0.0));
        let sacrifice = outcome_impact(InteractionType::Sacrifice, &BTreeMap::new());
        assert!(sacrifice[&Metric::Morale] > 0.0 && sacrifice[&Metric::Cohesion] > 0.0);
    }

    #[test]
    fn test_round_record() {
        let mut r = round(&[2.0, 1.0]);
        r.winner = Some(1);
        let record = r.record();
        assert_eq!(record.proposals.len(), 2);
        assert!(!record.consensus);
        assert_eq!(record.winner, Some(1));
        assert_eq!(r.winning_proposal().unwrap().agent_id, "P1");
    }
}
