//! Interaction Mediator
//!
//! Publish/subscribe hub between move outcomes and the team's state.
//! Interactions update the relationship network and are fanned out to every
//! observer as a relationship change; moments are fanned out as they are.

use debate_events::{
    is_opponent_id, opponent_id, GameMoment, ImpactMap, Interaction, InteractionType, Metric,
};
use std::collections::BTreeMap;

use crate::config::OpponentConfig;
use crate::observer::{InteractionObserver, TeamState};

/// What an opposing move left behind.
#[derive(Debug, Clone, Default)]
pub struct OpponentImpact {
    /// Interactions that were accepted
    pub interactions: Vec<Interaction>,
    /// Moments for traumas and threats
    pub moments: Vec<GameMoment>,
}

pub struct InteractionMediator {
    observers: Vec<Box<dyn InteractionObserver>>,
    opponent: OpponentConfig,
}

impl InteractionMediator {
    pub fn new(opponent: OpponentConfig) -> Self {
        Self {
            observers: Vec::new(),
            opponent,
        }
    }

    /// Adds an observer. Observers are notified in registration order.
    pub fn register(&mut self, observer: Box<dyn InteractionObserver>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Records an interaction and notifies every observer of the trust change.
    ///
    /// Interactions naming an unknown agent are logged and dropped; returns
    /// false in that case.
    pub fn register_interaction(&mut self, interaction: Interaction, team: &mut TeamState) -> bool {
        let known = |id: &str| team.roster.contains(id);
        if !known(&interaction.agent1_id)
            || !(known(&interaction.agent2_id) || is_opponent_id(&interaction.agent2_id))
        {
            tracing::warn!(
                "Dropping {} interaction with unknown agent: {} -> {}",
                interaction.interaction_type,
                interaction.agent1_id,
                interaction.agent2_id
            );
            return false;
        }

        for id in [&interaction.agent1_id, &interaction.agent2_id] {
            if let Some(agent) = team.roster.get_mut(id) {
                agent.remember(interaction.clone());
            }
        }
        let a = interaction.agent1_id.clone();
        let b = interaction.agent2_id.clone();
        let delta = team.relationships.record(interaction);
        tracing::debug!("Trust {} -> {} set to {:+.3}", a, b, delta);

        for observer in &mut self.observers {
            observer.on_relationship_change(&a, &b, delta, team);
        }
        true
    }

    /// Fans a moment out to every observer; each decides whether it cares.
    pub fn notify_moment(&mut self, moment: &GameMoment, team: &mut TeamState) {
        for observer in &mut self.observers {
            observer.on_game_moment(moment, team);
        }
    }

    /// Records what an opposing move did to our pieces.
    ///
    /// One interaction per affected agent, with the opposing piece named by
    /// its destination square. Traumas and threats also produce a moment
    /// scoped to the affected agent; those moments are notified here and
    /// returned for the caller to remember.
    pub fn register_opponent_action(
        &mut self,
        fen: &str,
        move_uci: &str,
        affected: &[String],
        interaction_type: InteractionType,
        turn: u32,
        team: &mut TeamState,
    ) -> OpponentImpact {
        let impact = self.opponent.base_impact(interaction_type);
        let destination = move_uci.get(2..4).unwrap_or(move_uci);
        let opponent = opponent_id(destination);
        let mut report = OpponentImpact::default();

        for agent_id in affected {
            let context = format!("{} by the opposing piece on {}", interaction_type, destination);
            let interaction = Interaction::new(
                agent_id.clone(),
                opponent.clone(),
                interaction_type,
                turn,
                move_uci,
                impact,
            )
            .with_context(context.clone());
            if !self.register_interaction(interaction.clone(), team) {
                continue;
            }
            report.interactions.push(interaction);

            if !matches!(interaction_type, InteractionType::Trauma | InteractionType::Threat) {
                continue;
            }
            let name = team
                .roster
                .get(agent_id)
                .map(|a| a.name().to_string())
                .unwrap_or_else(|| agent_id.clone());
            let moment = GameMoment {
                moment_id: String::new(),
                position: fen.to_string(),
                move_uci: move_uci.to_string(),
                impact: BTreeMap::from([(
                    agent_id.clone(),
                    ImpactMap::from([
                        (Metric::Confidence, impact * self.opponent.confidence_scale),
                        (Metric::Morale, impact * self.opponent.morale_scale),
                    ]),
                )]),
                turn,
                narrative: format!("{} suffered {}.", name, context),
                participants: vec![agent_id.clone(), opponent.clone()],
                interaction_type: Some(interaction_type),
            };
            self.notify_moment(&moment, team);
            report.moments.push(moment);
        }
        report
    }
}

impl Default for InteractionMediator {
    fn default() -> Self {
        Self::new(OpponentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::config::{PsychologyConfig, RelationshipConfig};
    use crate::observer::{AgentObserver, TeamObserver};
    use crate::personality::PersonalityFactory;
    use crate::psychology::PsychologicalState;
    use crate::roster::AgentRoster;
    use debate_events::Color;
    use std::sync::{Arc, Mutex};

    fn setup() -> (InteractionMediator, TeamState) {
        let roster =
            AgentRoster::lineup(&Board::starting(), Color::White, &PersonalityFactory::new(), None, 10).unwrap();
        let mut mediator = InteractionMediator::default();
        for agent in roster.iter() {
            mediator.register(Box::new(AgentObserver::new(agent.id())));
        }
        mediator.register(Box::new(TeamObserver::new(PsychologyConfig::default())));
        (mediator, TeamState::new(roster, RelationshipConfig::default()))
    }

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl InteractionObserver for Recorder {
        fn on_game_moment(&mut self, moment: &GameMoment, _: &mut TeamState) {
            self.log.lock().unwrap().push(format!("{}:{}", self.label, moment.move_uci));
        }

        fn on_relationship_change(&mut self, a: &str, b: &str, _: f32, _: &mut TeamState) {
            self.log.lock().unwrap().push(format!("{}:{}-{}", self.label, a, b));
        }
    }

    #[test]
    fn test_trust_overwritten_not_summed() {
        let (mut mediator, mut team) = setup();
        // Sixteen agent observers plus the team observer
        assert_eq!(mediator.observer_count(), 17);
        let first = Interaction::new("Ng1", "Pe2", InteractionType::Cooperation, 1, "g1f3", 0.5);
        let second = Interaction::new("Ng1", "Pe2", InteractionType::Competition, 2, "e2e4", -0.5);
        assert!(mediator.register_interaction(first, &mut team));
        assert!(mediator.register_interaction(second, &mut team));
        let trust = team.relationships.trust("Ng1", "Pe2").unwrap();
        assert!((trust + 0.15).abs() < 1e-6, "{}", trust);
    }

    #[test]
    fn test_unknown_agent_dropped() {
        let (mut mediator, mut team) = setup();
        let bad = Interaction::new("Zz9", "Pe2", InteractionType::Support, 1, "e2e4", 0.5);
        assert!(!mediator.register_interaction(bad, &mut team));
        let bad_partner = Interaction::new("Ng1", "ghost", InteractionType::Support, 1, "e2e4", 0.5);
        assert!(!mediator.register_interaction(bad_partner, &mut team));
        assert_eq!(team.relationships.interaction_count(), 0);
        assert!(team.relationships.snapshot().trust.is_empty());
    }

    #[test]
    fn test_observers_called_in_registration_order() {
        let (_, mut team) = setup();
        let mut mediator = InteractionMediator::default();
        let log = Arc::new(Mutex::new(Vec::new()));
        for label in ["first", "second", "third"] {
            mediator.register(Box::new(Recorder {
                label,
                log: Arc::clone(&log),
            }));
        }
        assert_eq!(mediator.observer_count(), 3);
        let interaction = Interaction::new("Ng1", "Pe2", InteractionType::Support, 1, "g1f3", 0.2);
        mediator.register_interaction(interaction, &mut team);
        mediator.notify_moment(&debate_events::fixtures::sample_moment(), &mut team);
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "first:Ng1-Pe2",
                "second:Ng1-Pe2",
                "third:Ng1-Pe2",
                "first:g1f3",
                "second:g1f3",
                "third:g1f3"
            ]
        );
    }

    #[test]
    fn test_trauma_lowers_agent_and_team() {
        let (mut mediator, mut team) = setup();
        let agent = team.roster.get_mut("Ng1").unwrap();
        *agent = agent.clone().with_emotional_state(crate::emotion::EmotionalState::default());

        let report = mediator.register_opponent_action(
            Board::STARTING_FEN,
            "b8c6",
            &["Ng1".to_string()],
            InteractionType::Trauma,
            3,
            &mut team,
        );
        assert_eq!(report.interactions.len(), 1);
        assert_eq!(report.moments.len(), 1);
        assert_eq!(report.moments[0].participants, vec!["Ng1", "opp:c6"]);

        let state = team.roster.get("Ng1").unwrap().emotional_state();
        assert!(state.confidence() < 0.5);
        assert!(state.morale() < 0.5);

        let before = PsychologicalState::default();
        let psych = team.psychology;
        assert!(psych.morale() < before.morale());
        assert!(psych.coordination() < before.coordination());
        assert!(psych.leadership() < before.leadership());
        assert!(psych.cohesion() <= before.cohesion());

        let trust = team.relationships.trust("Ng1", "opp:c6").unwrap();
        assert!((trust + 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_threat_lowers_morale_raises_cohesion() {
        let (mut mediator, mut team) = setup();
        mediator.register_opponent_action(
            Board::STARTING_FEN,
            "d8h4",
            &["Pf2".to_string()],
            InteractionType::Threat,
            4,
            &mut team,
        );
        assert!(team.psychology.morale() < 0.5);
        assert!(team.psychology.cohesion() > 0.5);
    }

    #[test]
    fn test_stalking_records_without_moment() {
        let (mut mediator, mut team) = setup();
        let report = mediator.register_opponent_action(
            Board::STARTING_FEN,
            "g8f6",
            &["Pe2".to_string(), "Pd2".to_string()],
            InteractionType::Stalking,
            2,
            &mut team,
        );
        assert!(report.moments.is_empty());
        assert_eq!(report.interactions.len(), 2);
        assert_eq!(team.relationships.interaction_count(), 2);
        let trust = team.relationships.trust("Pd2", "opp:f6").unwrap();
        assert!((trust + 0.06).abs() < 1e-6);
        assert_eq!(team.psychology, PsychologicalState::default());
    }
}
