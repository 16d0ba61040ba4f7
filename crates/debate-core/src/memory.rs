//! Game Memory
//!
//! Append-only log of significant moments, a narrative thread per agent, and
//! the emotional triggers strong moments leave behind.

use debate_events::{generate_moment_id, max_magnitude, GameMoment, InteractionType, Trigger};
use std::collections::BTreeMap;

use crate::config::MemoryConfig;

#[derive(Debug, Clone, Default)]
pub struct GameMemory {
    moments: Vec<GameMoment>,
    threads: BTreeMap<String, Vec<String>>,
    triggers: BTreeMap<String, Vec<Trigger>>,
    config: MemoryConfig,
}

/// Placement field of a FEN, the part a trigger matches against.
fn placement_of(fen: &str) -> &str {
    fen.split_whitespace().next().unwrap_or("")
}

impl GameMemory {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// ID for the next recorded moment.
    pub fn next_moment_id(&self) -> String {
        generate_moment_id(self.moments.len() as u64 + 1)
    }

    /// Records a moment caused by `mover` and assigns its ID.
    ///
    /// The moment's narrative joins the mover's thread. When the mover's
    /// largest delta exceeds the trigger threshold, the position becomes a
    /// trigger for that agent. Returns true when a trigger was stored.
    pub fn record_moment(&mut self, mover: &str, mut moment: GameMoment) -> bool {
        moment.moment_id = self.next_moment_id();
        self.threads
            .entry(mover.to_string())
            .or_default()
            .push(moment.narrative.clone());

        let impacts = moment.impact_for(mover).cloned().unwrap_or_default();
        let triggered = max_magnitude(&impacts) > self.config.trigger_threshold;
        if triggered {
            tracing::debug!("{} now remembers {} (turn {})", mover, moment.move_uci, moment.turn);
            self.triggers.entry(mover.to_string()).or_default().push(Trigger {
                pattern: placement_of(&moment.position).to_string(),
                impacts,
                narrative: moment.narrative.clone(),
                turn: moment.turn,
            });
        }
        self.moments.push(moment);
        triggered
    }

    pub fn moments(&self) -> &[GameMoment] {
        &self.moments
    }

    pub fn thread(&self, agent_id: &str) -> &[String] {
        self.threads.get(agent_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn triggers(&self, agent_id: &str) -> &[Trigger] {
        self.triggers.get(agent_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The agent's triggers that match the given position.
    pub fn matching_triggers(&self, agent_id: &str, fen: &str) -> Vec<&Trigger> {
        let placement = placement_of(fen);
        self.triggers(agent_id)
            .iter()
            .filter(|t| t.matches(placement))
            .collect()
    }

    /// Moments involving the agent, optionally of one interaction type,
    /// most significant first.
    pub fn relevant_moments(
        &self,
        agent_id: &str,
        interaction_type: Option<InteractionType>,
    ) -> Vec<&GameMoment> {
        let mut found: Vec<&GameMoment> = self
            .moments
            .iter()
            .filter(|m| m.involves(agent_id))
            .filter(|m| interaction_type.is_none() || m.interaction_type == interaction_type)
            .collect();
        found.sort_by(|a, b| b.significance().total_cmp(&a.significance()));
        found
    }
}
