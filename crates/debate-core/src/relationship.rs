//! Relationship Network
//!
//! Pairwise trust between agents plus a bounded history of recent
//! interactions. Trust is stored under the exact `(agent1, agent2)` pair it
//! was written with; each interaction overwrites the previous value.

use debate_events::{Interaction, RelationshipSnapshot, TrustEntry};
use std::collections::{BTreeMap, VecDeque};

use crate::config::RelationshipConfig;

#[derive(Debug, Clone)]
pub struct RelationshipNetwork {
    trust: BTreeMap<(String, String), f32>,
    recent_interactions: VecDeque<Interaction>,
    config: RelationshipConfig,
}

impl RelationshipNetwork {
    pub fn new(config: RelationshipConfig) -> Self {
        Self {
            trust: BTreeMap::new(),
            recent_interactions: VecDeque::new(),
            config,
        }
    }

    /// Stored trust for the exact pair, if any.
    pub fn trust(&self, a: &str, b: &str) -> Option<f32> {
        self.trust.get(&(a.to_string(), b.to_string())).copied()
    }

    /// Trust for the pair in either ordering, `(a, b)` first.
    pub fn trust_between(&self, a: &str, b: &str) -> Option<f32> {
        self.trust(a, b).or_else(|| self.trust(b, a))
    }

    /// Records an interaction and returns the trust delta it wrote.
    ///
    /// The trust value is set, not accumulated: the latest interaction for a
    /// pair wins.
    pub fn record(&mut self, interaction: Interaction) -> f32 {
        let delta = interaction.impact * self.config.trust_scale;
        self.trust.insert(
            (interaction.agent1_id.clone(), interaction.agent2_id.clone()),
            delta,
        );
        self.recent_interactions.push_back(interaction);
        while self.recent_interactions.len() > self.config.interaction_window {
            self.recent_interactions.pop_front();
        }
        delta
    }

    /// Mean impact of the pair's last cooperative interactions.
    ///
    /// Looks at the most recent `cooperation_window` interactions between the
    /// pair (either ordering) and averages those typed cooperation or support.
    pub fn recent_cooperation(&self, a: &str, b: &str) -> f32 {
        let cooperative: Vec<f32> = self
            .recent_interactions
            .iter()
            .rev()
            .filter(|i| i.involves_pair(a, b))
            .take(self.config.cooperation_window)
            .filter(|i| i.interaction_type.is_cooperative())
            .map(|i| i.impact)
            .collect();
        if cooperative.is_empty() {
            0.0
        } else {
            cooperative.iter().sum::<f32>() / cooperative.len() as f32
        }
    }

    /// Bonus for two agents working together.
    pub fn support_bonus(&self, a: &str, b: &str) -> f32 {
        let trust = self.trust(a, b).unwrap_or(self.config.default_trust);
        trust * (1.0 + self.recent_cooperation(a, b) * self.config.cooperation_amplification)
    }

    pub fn recent_interactions(&self) -> impl Iterator<Item = &Interaction> {
        self.recent_interactions.iter()
    }

    pub fn interaction_count(&self) -> usize {
        self.recent_interactions.len()
    }

    pub fn snapshot(&self) -> RelationshipSnapshot {
        RelationshipSnapshot {
            trust: self
                .trust
                .iter()
                .map(|((from, to), trust)| TrustEntry {
                    from: from.clone(),
                    to: to.clone(),
                    trust: *trust,
                })
                .collect(),
            recent_interactions: self.recent_interactions.iter().cloned().collect(),
        }
    }
}

impl Default for RelationshipNetwork {
    fn default() -> Self {
        Self::new(RelationshipConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_events::InteractionType;

    fn interaction(kind: InteractionType, impact: f32, turn: u32) -> Interaction {
        Interaction::new("Ng1", "Pe2", kind, turn, "g1f3", impact)
    }

    #[test]
    fn test_trust_is_overwritten() {
        let mut network = RelationshipNetwork::default();
        network.record(interaction(InteractionType::Cooperation, 0.5, 1));
        network.record(interaction(InteractionType::Competition, -0.5, 2));
        let trust = network.trust("Ng1", "Pe2").unwrap();
        assert!((trust + 0.15).abs() < 1e-6, "last write wins: {}", trust);
        assert_eq!(network.interaction_count(), 2);
    }

    #[test]
    fn test_trust_keyed_by_exact_pair() {
        let mut network = RelationshipNetwork::default();
        network.record(interaction(InteractionType::Support, 1.0, 1));
        assert!(network.trust("Pe2", "Ng1").is_none());
        assert!((network.trust_between("Pe2", "Ng1").unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_support_bonus_defaults() {
        let network = RelationshipNetwork::default();
        assert_eq!(network.support_bonus("Ng1", "Pe2"), 0.5);
    }

    #[test]
    fn test_support_bonus_amplified_by_cooperation() {
        let mut network = RelationshipNetwork::default();
        network.record(interaction(InteractionType::Cooperation, 0.4, 1));
        network.record(interaction(InteractionType::Support, 0.8, 2));
        network.record(interaction(InteractionType::Competition, -1.0, 3));
        // Trust -0.3 from the last write; cooperation mean 0.6.
        assert!((network.recent_cooperation("Pe2", "Ng1") - 0.6).abs() < 1e-6);
        let bonus = network.support_bonus("Ng1", "Pe2");
        assert!((bonus - (-0.3 * 1.3)).abs() < 1e-6, "{}", bonus);
    }

    #[test]
    fn test_cooperation_window_limits_lookback() {
        let config = RelationshipConfig {
            cooperation_window: 2,
            ..RelationshipConfig::default()
        };
        let mut network = RelationshipNetwork::new(config);
        network.record(interaction(InteractionType::Cooperation, 1.0, 1));
        network.record(interaction(InteractionType::Rivalry, -0.2, 2));
        network.record(interaction(InteractionType::Support, 0.2, 3));
        assert!((network.recent_cooperation("Ng1", "Pe2") - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_history_bounded() {
        let config = RelationshipConfig {
            interaction_window: 3,
            ..RelationshipConfig::default()
        };
        let mut network = RelationshipNetwork::new(config);
        for turn in 0..6 {
            network.record(interaction(InteractionType::Support, 0.1, turn));
        }
        let turns: Vec<u32> = network.recent_interactions().map(|i| i.turn).collect();
        assert_eq!(turns, vec![3, 4, 5]);
        assert_eq!(network.snapshot().recent_interactions.len(), 3);
    }
}
