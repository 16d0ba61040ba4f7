//! Configuration System
//!
//! Tuning parameters for debates, relationships and team psychology, loadable
//! from TOML. Every section falls back to its defaults, so a partial file is
//! fine.

use debate_events::{ImpactMap, InteractionType, Metric};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete simulation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub debate: DebateConfig,
    /// How a chosen proposal is classified as an interaction
    #[serde(default)]
    pub classification: ClassificationConfig,
    #[serde(default)]
    pub relationships: RelationshipConfig,
    #[serde(default)]
    pub psychology: PsychologyConfig,
    /// Base impacts of opponent actions
    #[serde(default)]
    pub opponent: OpponentConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Debate round settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebateConfig {
    /// Top two scores closer than this (exclusive) are a consensus
    pub consensus_margin: f32,
    /// Team bonus applied when a round reaches consensus
    pub consensus_cohesion: f32,
    pub consensus_morale: f32,
    pub consensus_coordination: f32,
    pub consensus_leadership: f32,
    /// Trust delta recorded when the top-ranked proposal is chosen
    pub top_pick_impact: f32,
    /// Trust delta recorded when any other proposal is chosen
    pub other_pick_impact: f32,
    /// Confidence multiplier for the winning proposer
    pub winner_confidence_scale: f32,
    /// Confidence multiplier for every other proposer
    pub loser_confidence_scale: f32,
    /// Evaluate candidate moves on the rayon pool
    pub parallel_evaluation: bool,
    /// Fraction of a matched trigger's impacts replayed on the agent
    pub trigger_replay_scale: f32,
}

impl Default for DebateConfig {
    fn default() -> Self {
        Self {
            consensus_margin: 0.2,
            consensus_cohesion: 0.1,
            consensus_morale: 0.05,
            consensus_coordination: 0.1,
            consensus_leadership: 0.05,
            top_pick_impact: 0.2,
            other_pick_impact: -0.1,
            winner_confidence_scale: 1.2,
            loser_confidence_scale: 0.95,
            parallel_evaluation: true,
            trigger_replay_scale: 0.5,
        }
    }
}

impl DebateConfig {
    /// The consensus bonus as a team impact map.
    pub fn consensus_impact(&self) -> ImpactMap {
        ImpactMap::from([
            (Metric::Cohesion, self.consensus_cohesion),
            (Metric::Morale, self.consensus_morale),
            (Metric::Coordination, self.consensus_coordination),
            (Metric::Leadership, self.consensus_leadership),
        ])
    }
}

/// Interaction classification of a chosen proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Type recorded when the top-ranked proposal wins
    pub top_pick: InteractionType,
    /// Type recorded when a lower-ranked proposal wins
    pub other_pick: InteractionType,
    /// Let a proposal's own sacrifice/support/rescue classification win
    pub honor_proposal_type: bool,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            top_pick: InteractionType::Cooperation,
            other_pick: InteractionType::Competition,
            honor_proposal_type: true,
        }
    }
}

impl ClassificationConfig {
    /// Classifies the winner chosen at `index` of a ranked round.
    pub fn classify(&self, index: usize, proposal_type: Option<InteractionType>) -> InteractionType {
        if self.honor_proposal_type {
            if let Some(
                t @ (InteractionType::Sacrifice | InteractionType::Support | InteractionType::Rescue),
            ) = proposal_type
            {
                return t;
            }
        }
        if index == 0 {
            self.top_pick
        } else {
            self.other_pick
        }
    }
}

/// Relationship network settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipConfig {
    /// trust = impact * trust_scale
    pub trust_scale: f32,
    /// Trust assumed for a pair that has never interacted
    pub default_trust: f32,
    /// Interactions retained by the network
    pub interaction_window: usize,
    /// Pair interactions considered for recent cooperation
    pub cooperation_window: usize,
    /// How strongly recent cooperation amplifies trust
    pub cooperation_amplification: f32,
    /// Interactions each agent remembers
    pub agent_window: usize,
}

impl Default for RelationshipConfig {
    fn default() -> Self {
        Self {
            trust_scale: 0.3,
            default_trust: 0.5,
            interaction_window: 50,
            cooperation_window: 10,
            cooperation_amplification: 0.5,
            agent_window: 10,
        }
    }
}

/// Team psychology event deltas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PsychologyConfig {
    pub trauma_morale: f32,
    pub trauma_cohesion: f32,
    pub trauma_coordination: f32,
    pub trauma_leadership: f32,
    pub threat_morale: f32,
    /// Adversity can unite the team
    pub threat_cohesion: f32,
    /// Relationship changes smaller than this leave the team untouched
    pub relationship_threshold: f32,
    pub relationship_cohesion_scale: f32,
    pub relationship_coordination_scale: f32,
}

impl Default for PsychologyConfig {
    fn default() -> Self {
        Self {
            trauma_morale: -0.2,
            trauma_cohesion: -0.2,
            trauma_coordination: -0.1,
            trauma_leadership: -0.05,
            threat_morale: -0.1,
            threat_cohesion: 0.1,
            relationship_threshold: 0.05,
            relationship_cohesion_scale: 0.5,
            relationship_coordination_scale: 0.25,
        }
    }
}

/// Opponent action impacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    pub trauma_impact: f32,
    pub threat_impact: f32,
    pub stalking_impact: f32,
    /// Any other interaction type
    pub default_impact: f32,
    /// Scale from base impact to the affected agent's confidence delta
    pub confidence_scale: f32,
    /// Scale from base impact to the affected agent's morale delta
    pub morale_scale: f32,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            trauma_impact: -0.5,
            threat_impact: -0.3,
            stalking_impact: -0.2,
            default_impact: -0.1,
            confidence_scale: 0.05,
            morale_scale: 0.5,
        }
    }
}

impl OpponentConfig {
    pub fn base_impact(&self, interaction_type: InteractionType) -> f32 {
        match interaction_type {
            InteractionType::Trauma => self.trauma_impact,
            InteractionType::Threat => self.threat_impact,
            InteractionType::Stalking => self.stalking_impact,
            _ => self.default_impact,
        }
    }
}

/// Game memory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// A moment whose largest delta exceeds this forms a trigger
    pub trigger_threshold: f32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            trigger_threshold: 0.2,
        }
    }
}

/// Agent scoring settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Total swing of the risk factor (0.2 means at most +/-10%)
    pub risk_swing: f32,
    /// Scale from opportunity value to score bonus
    pub opportunity_scale: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            risk_swing: 0.2,
            opportunity_scale: 0.1,
        }
    }
}

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimConfig::default();
        assert_eq!(config.debate.consensus_margin, 0.2);
        assert_eq!(config.relationships.trust_scale, 0.3);
        assert_eq!(config.opponent.base_impact(InteractionType::Trauma), -0.5);
        assert_eq!(config.opponent.base_impact(InteractionType::Rivalry), -0.1);
        assert_eq!(config.memory.trigger_threshold, 0.2);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
            [debate]
            consensus_margin = 0.5

            [classification]
            other_pick = "rivalry"
        "#;
        let config = SimConfig::from_str(toml).unwrap();
        assert_eq!(config.debate.consensus_margin, 0.5);
        assert_eq!(config.debate.top_pick_impact, 0.2);
        assert_eq!(config.classification.other_pick, InteractionType::Rivalry);
        assert_eq!(config.classification.top_pick, InteractionType::Cooperation);
        assert_eq!(config.relationships.interaction_window, 50);
    }

    #[test]
    fn test_config_to_toml_round_trips() {
        let config = SimConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = SimConfig::from_str(&text).unwrap();
        assert_eq!(parsed.psychology.threat_cohesion, 0.1);
        assert_eq!(parsed.scoring.risk_swing, 0.2);
    }

    #[test]
    fn test_classification_policy() {
        let policy = ClassificationConfig::default();
        assert_eq!(policy.classify(0, None), InteractionType::Cooperation);
        assert_eq!(policy.classify(2, None), InteractionType::Competition);
        assert_eq!(
            policy.classify(1, Some(InteractionType::Sacrifice)),
            InteractionType::Sacrifice
        );
        assert_eq!(
            policy.classify(0, Some(InteractionType::Cooperation)),
            InteractionType::Cooperation
        );

        let strict = ClassificationConfig {
            honor_proposal_type: false,
            ..ClassificationConfig::default()
        };
        assert_eq!(
            strict.classify(1, Some(InteractionType::Support)),
            InteractionType::Competition
        );
    }

    #[test]
    fn test_consensus_impact() {
        let impact = DebateConfig::default().consensus_impact();
        assert_eq!(impact[&Metric::Cohesion], 0.1);
        assert_eq!(impact[&Metric::Leadership], 0.05);
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let err = SimConfig::from_file(Path::new("/nonexistent/debate.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
