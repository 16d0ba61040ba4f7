//! Agent Roster
//!
//! Every agent of the simulated side, active or captured, plus the lookup
//! from occupied square to agent. Captured agents stay in the roster so their
//! identity survives in memory and relationship history.

use debate_events::{AgentSnapshot, Color, PieceKind};
use std::collections::{BTreeMap, HashMap};

use crate::agent::{agent_id, Agent};
use crate::board::{Board, Square};
use crate::personality::{PersonalityFactory, PersonalityError, Theme};

#[derive(Debug, Clone, Default)]
pub struct AgentRoster {
    agents: Vec<Agent>,
    by_square: HashMap<Square, usize>,
}

impl AgentRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// One agent per piece of `color` on the board.
    ///
    /// Pieces of the same kind are numbered in board order, so the second
    /// pawn is "Pawn Pioneer 2".
    pub fn lineup(
        board: &Board,
        color: Color,
        factory: &PersonalityFactory,
        theme: Option<Theme>,
        interaction_window: usize,
    ) -> Result<Self, PersonalityError> {
        let mut roster = Self::new();
        let mut counts: BTreeMap<PieceKind, usize> = BTreeMap::new();
        for (square, piece) in board.pieces(color) {
            let index = counts.entry(piece.kind).or_insert(0);
            let mut personality = factory.create(piece.kind, *index)?;
            if let Some(theme) = theme {
                personality = personality.themed(theme);
            }
            *index += 1;
            let agent = Agent::new(agent_id(piece.kind, square), piece.kind, color, square, personality)
                .with_interaction_window(interaction_window);
            roster.insert(agent);
        }
        tracing::debug!("Lined up {} agents for {:?}", roster.len(), color);
        Ok(roster)
    }

    /// Adds an agent; it takes over its square from any previous occupant.
    pub fn insert(&mut self, agent: Agent) {
        let idx = self.agents.len();
        if !agent.is_captured() {
            self.by_square.insert(agent.square(), idx);
        }
        self.agents.push(agent);
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.agents.iter().any(|a| a.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id() == id)
    }

    /// The active agent standing on `square`.
    pub fn at_square(&self, square: Square) -> Option<&Agent> {
        self.by_square.get(&square).map(|&i| &self.agents[i])
    }

    /// All agents in line-up order, captured ones included.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.iter_mut()
    }

    pub fn active(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| !a.is_captured())
    }

    /// Square to agent ID for every active agent.
    pub fn occupants(&self) -> HashMap<Square, String> {
        self.by_square
            .iter()
            .map(|(sq, &i)| (*sq, self.agents[i].id().to_string()))
            .collect()
    }

    /// Moves the agent on `from` to `to`. Returns its ID.
    pub fn relocate(&mut self, from: Square, to: Square) -> Option<String> {
        let idx = self.by_square.remove(&from)?;
        self.by_square.insert(to, idx);
        let agent = &mut self.agents[idx];
        agent.move_to(to);
        Some(agent.id().to_string())
    }

    pub fn promote(&mut self, square: Square, kind: PieceKind) -> Option<String> {
        let idx = *self.by_square.get(&square)?;
        let agent = &mut self.agents[idx];
        agent.promote(kind);
        Some(agent.id().to_string())
    }

    /// Captures the agent on `square`, removing it from the active set.
    pub fn capture_at(&mut self, square: Square) -> Option<String> {
        let idx = self.by_square.remove(&square)?;
        let agent = &mut self.agents[idx];
        agent.mark_captured();
        tracing::info!("{} ({}) was captured on {}", agent.name(), agent.id(), square);
        Some(agent.id().to_string())
    }

    pub fn save_snapshots(&mut self, turn: u32) {
        for agent in &mut self.agents {
            agent.save_snapshot(turn);
        }
    }

    /// Restores every agent to its latest snapshot at or before `turn` and
    /// rebuilds the square lookup. Returns how many agents were restored.
    pub fn restore_snapshots(&mut self, turn: u32) -> usize {
        let restored = self
            .agents
            .iter_mut()
            .map(|a| a.restore_snapshot(turn))
            .filter(|r| *r)
            .count();
        self.by_square = self
            .agents
            .iter()
            .enumerate()
            .filter(|(_, a)| !a.is_captured())
            .map(|(i, a)| (a.square(), i))
            .collect();
        restored
    }

    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        self.agents.iter().map(Agent::snapshot).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starting_roster() -> AgentRoster {
        AgentRoster::lineup(&Board::starting(), Color::White, &PersonalityFactory::new(), None, 10).unwrap()
    }

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_lineup_one_agent_per_piece() {
        let roster = starting_roster();
        assert_eq!(roster.len(), 16);
        assert_eq!(roster.at_square(sq("g1")).unwrap().id(), "Ng1");
        assert_eq!(roster.at_square(sq("e1")).unwrap().name(), "King Prudence");
        let pawn_names: Vec<&str> = roster
            .iter()
            .filter(|a| a.piece() == PieceKind::Pawn)
            .map(|a| a.name())
            .collect();
        assert_eq!(pawn_names.len(), 8);
        assert!(pawn_names.contains(&"Pawn Pioneer"));
        assert!(pawn_names.contains(&"Pawn Pioneer 8"));
    }

    #[test]
    fn test_themed_lineup() {
        let roster = AgentRoster::lineup(
            &Board::starting(),
            Color::White,
            &PersonalityFactory::new(),
            Some(Theme::Aggressive),
            10,
        )
        .unwrap();
        let queen = roster.get("Qd1").unwrap();
        assert_eq!(queen.personality().risk_tolerance(), 1.0);
    }

    #[test]
    fn test_relocate_and_capture() {
        let mut roster = starting_roster();
        assert_eq!(roster.relocate(sq("g1"), sq("f3")).as_deref(), Some("Ng1"));
        assert!(roster.at_square(sq("g1")).is_none());
        assert_eq!(roster.get("Ng1").unwrap().square(), sq("f3"));

        assert_eq!(roster.capture_at(sq("f3")).as_deref(), Some("Ng1"));
        assert!(roster.at_square(sq("f3")).is_none());
        assert!(roster.contains("Ng1"), "identity persists after capture");
        assert_eq!(roster.active().count(), 15);
        assert!(roster.capture_at(sq("f3")).is_none());
    }

    #[test]
    fn test_restore_rebuilds_squares() {
        let mut roster = starting_roster();
        roster.save_snapshots(1);
        roster.relocate(sq("g1"), sq("f3"));
        roster.capture_at(sq("f3"));
        assert_eq!(roster.restore_snapshots(1), 16);
        assert_eq!(roster.at_square(sq("g1")).unwrap().id(), "Ng1");
        assert!(!roster.get("Ng1").unwrap().is_captured());
    }
}
