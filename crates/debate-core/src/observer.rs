//! Observers
//!
//! Subscribers to the interaction mediator. The shared team state is handed
//! to each observer in turn, so observers never hold references into it.

use debate_events::{is_opponent_id, GameMoment, ImpactMap, InteractionType, Metric};

use crate::config::{PsychologyConfig, RelationshipConfig};
use crate::psychology::PsychologicalState;
use crate::relationship::RelationshipNetwork;
use crate::roster::AgentRoster;

/// State shared by the whole side for the length of a game.
#[derive(Debug, Clone, Default)]
pub struct TeamState {
    pub roster: AgentRoster,
    pub psychology: PsychologicalState,
    pub relationships: RelationshipNetwork,
}

impl TeamState {
    pub fn new(roster: AgentRoster, relationships: RelationshipConfig) -> Self {
        Self {
            roster,
            psychology: PsychologicalState::default(),
            relationships: RelationshipNetwork::new(relationships),
        }
    }
}

/// Receives moments and relationship changes, synchronously and in
/// registration order.
pub trait InteractionObserver: Send {
    fn on_game_moment(&mut self, moment: &GameMoment, team: &mut TeamState);

    fn on_relationship_change(&mut self, agent_a: &str, agent_b: &str, delta: f32, team: &mut TeamState);
}

/// Keeps one agent's emotional state in step with events that concern it.
#[derive(Debug, Clone)]
pub struct AgentObserver {
    agent_id: String,
}

impl AgentObserver {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }
}

impl InteractionObserver for AgentObserver {
    fn on_game_moment(&mut self, moment: &GameMoment, team: &mut TeamState) {
        let Some(impact) = moment.impact_for(&self.agent_id) else {
            return;
        };
        if let Some(agent) = team.roster.get_mut(&self.agent_id) {
            agent.apply_impact(impact);
        }
    }

    fn on_relationship_change(&mut self, agent_a: &str, agent_b: &str, delta: f32, team: &mut TeamState) {
        if agent_a != self.agent_id && agent_b != self.agent_id {
            return;
        }
        if let Some(agent) = team.roster.get_mut(&self.agent_id) {
            agent.apply_impact(&ImpactMap::from([(Metric::Trust, delta)]));
        }
    }
}

/// Keeps the team's psychological state in step with significant events.
#[derive(Debug, Clone, Default)]
pub struct TeamObserver {
    config: PsychologyConfig,
}

impl TeamObserver {
    pub fn new(config: PsychologyConfig) -> Self {
        Self { config }
    }
}

impl InteractionObserver for TeamObserver {
    fn on_game_moment(&mut self, moment: &GameMoment, team: &mut TeamState) {
        match moment.interaction_type {
            Some(InteractionType::Trauma) => team.psychology.on_trauma(&self.config),
            Some(InteractionType::Threat) => team.psychology.on_threat(&self.config),
            _ => {
                for impact in moment.impact.values() {
                    team.psychology.apply_team_impact(impact);
                }
            }
        }
    }

    fn on_relationship_change(&mut self, agent_a: &str, agent_b: &str, delta: f32, team: &mut TeamState) {
        // Only bonds inside the team move team psychology.
        if is_opponent_id(agent_a) || is_opponent_id(agent_b) {
            return;
        }
        if team.psychology.on_relationship_change(delta, &self.config) {
            tracing::debug!("Bond {}-{} shifted team by {:+.3}", agent_a, agent_b, delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::personality::PersonalityFactory;
    use debate_events::fixtures::sample_moment;
    use debate_events::Color;

    fn team() -> TeamState {
        let roster =
            AgentRoster::lineup(&Board::starting(), Color::White, &PersonalityFactory::new(), None, 10).unwrap();
        TeamState::new(roster, RelationshipConfig::default())
    }

    #[test]
    fn test_agent_observer_applies_own_impact_only() {
        let mut team = team();
        let mut moment = sample_moment();
        moment
            .impact
            .insert("Pe2".into(), ImpactMap::from([(Metric::Confidence, 0.2)]));
        let before = *team.roster.get("Pe2").unwrap().emotional_state();

        AgentObserver::new("Ng1").on_game_moment(&moment, &mut team);
        assert_eq!(*team.roster.get("Pe2").unwrap().emotional_state(), before);

        AgentObserver::new("Pe2").on_game_moment(&moment, &mut team);
        let after = team.roster.get("Pe2").unwrap().emotional_state().confidence();
        assert!((after - (before.confidence() + 0.2)).abs() < 1e-6);
    }

    #[test]
    fn test_agent_observer_tracks_trust() {
        let mut team = team();
        let before = team.roster.get("Ng1").unwrap().emotional_state().trust();
        let mut observer = AgentObserver::new("Ng1");
        observer.on_relationship_change("Pe2", "Ng1", -0.15, &mut team);
        let after = team.roster.get("Ng1").unwrap().emotional_state().trust();
        assert!((after - (before - 0.15)).abs() < 1e-6);
        observer.on_relationship_change("Pe2", "Pd2", -0.15, &mut team);
        assert_eq!(team.roster.get("Ng1").unwrap().emotional_state().trust(), after);
    }

    #[test]
    fn test_team_observer_ignores_opponent_bonds() {
        let mut team = team();
        let mut observer = TeamObserver::default();
        observer.on_relationship_change("Ng1", "opp:f3", -0.15, &mut team);
        assert_eq!(team.psychology, PsychologicalState::default());
        observer.on_relationship_change("Ng1", "Pe2", 0.06, &mut team);
        assert!((team.psychology.cohesion() - 0.53).abs() < 1e-6);
    }

    #[test]
    fn test_team_observer_applies_team_metrics() {
        let mut team = team();
        TeamObserver::default().on_game_moment(&sample_moment(), &mut team);
        assert!((team.psychology.coordination() - 0.6).abs() < 1e-6);
        assert!((team.psychology.cohesion() - 0.55).abs() < 1e-6);
    }
}
