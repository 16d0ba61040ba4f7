//! Game Moments
//!
//! Significant moments with emotional impact on one or more agents, plus the
//! triggers they leave behind in long-term memory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::InteractionType;

/// Generates a moment ID with the given sequence number.
pub fn generate_moment_id(sequence: u64) -> String {
    format!("mom_{:06}", sequence)
}

/// A named scalar that impacts can move.
///
/// Confidence, trust and aggression live on individual agents; cohesion,
/// coordination and leadership are team-wide. Morale exists at both levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Confidence,
    Morale,
    Trust,
    Aggression,
    Cohesion,
    Coordination,
    Leadership,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Confidence => "confidence",
            Metric::Morale => "morale",
            Metric::Trust => "trust",
            Metric::Aggression => "aggression",
            Metric::Cohesion => "cohesion",
            Metric::Coordination => "coordination",
            Metric::Leadership => "leadership",
        }
    }

    /// Held by an individual agent's emotional state.
    pub fn is_emotional(&self) -> bool {
        matches!(
            self,
            Metric::Confidence | Metric::Morale | Metric::Trust | Metric::Aggression
        )
    }

    /// Held by the team's psychological state.
    pub fn is_team(&self) -> bool {
        matches!(
            self,
            Metric::Cohesion | Metric::Morale | Metric::Coordination | Metric::Leadership
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deltas keyed by metric. Ordered so iteration (and serialization) is stable.
pub type ImpactMap = BTreeMap<Metric, f32>;

/// Largest absolute delta in an impact map, or 0 when empty.
pub fn max_magnitude(impact: &ImpactMap) -> f32 {
    impact.values().fold(0.0_f32, |acc, v| acc.max(v.abs()))
}

/// A significant moment in the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMoment {
    pub moment_id: String,
    /// Position (FEN) when it happened
    pub position: String,
    /// The move that was played (UCI)
    #[serde(rename = "move")]
    pub move_uci: String,
    /// Emotional impact per agent
    pub impact: BTreeMap<String, ImpactMap>,
    pub turn: u32,
    pub narrative: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_type: Option<InteractionType>,
}

impl GameMoment {
    /// How significant this moment was, in [0, 1].
    ///
    /// The mean absolute delta over every metric entry of every agent,
    /// capped at 1. A moment without entries has no significance.
    pub fn significance(&self) -> f32 {
        let (sum, count) = self
            .impact
            .values()
            .flat_map(|m| m.values())
            .fold((0.0_f32, 0usize), |(s, c), v| (s + v.abs(), c + 1));
        if count == 0 {
            return 0.0;
        }
        (sum / count as f32).min(1.0)
    }

    /// Impact scoped to one agent, if any.
    pub fn impact_for(&self, agent_id: &str) -> Option<&ImpactMap> {
        self.impact.get(agent_id)
    }

    /// True when the agent is listed as a participant or has an impact entry.
    pub fn involves(&self, agent_id: &str) -> bool {
        self.impact.contains_key(agent_id) || self.participants.iter().any(|p| p == agent_id)
    }
}

/// A position pattern that re-awakens an emotional response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    /// Piece placement snapshot the trigger matches against
    pub pattern: String,
    pub impacts: ImpactMap,
    /// What is remembered about the moment
    pub narrative: String,
    pub turn: u32,
}

impl Trigger {
    pub fn matches(&self, placement: &str) -> bool {
        !self.pattern.is_empty() && self.pattern == placement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moment_with(impact: BTreeMap<String, ImpactMap>) -> GameMoment {
        GameMoment {
            moment_id: generate_moment_id(1),
            position: "startpos".to_string(),
            move_uci: "e2e4".to_string(),
            impact,
            turn: 1,
            narrative: String::new(),
            participants: vec![],
            interaction_type: None,
        }
    }

    #[test]
    fn test_significance_is_mean_absolute_delta() {
        let mut impact = BTreeMap::new();
        impact.insert(
            "Qd1".to_string(),
            ImpactMap::from([(Metric::Confidence, 0.3), (Metric::Aggression, -0.1)]),
        );
        impact.insert("Ng1".to_string(), ImpactMap::from([(Metric::Morale, 0.2)]));
        let m = moment_with(impact);
        assert!((m.significance() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_significance_caps_at_one() {
        let mut impact = BTreeMap::new();
        impact.insert("Ke1".to_string(), ImpactMap::from([(Metric::Morale, -3.0)]));
        assert_eq!(moment_with(impact).significance(), 1.0);
    }

    #[test]
    fn test_empty_moment_has_no_significance() {
        assert_eq!(moment_with(BTreeMap::new()).significance(), 0.0);
    }

    #[test]
    fn test_metric_scopes() {
        assert!(Metric::Morale.is_emotional() && Metric::Morale.is_team());
        assert!(Metric::Trust.is_emotional() && !Metric::Trust.is_team());
        assert!(Metric::Cohesion.is_team() && !Metric::Cohesion.is_emotional());
    }

    #[test]
    fn test_max_magnitude() {
        let impact = ImpactMap::from([(Metric::Morale, 0.1), (Metric::Confidence, -0.4)]);
        assert!((max_magnitude(&impact) - 0.4).abs() < 1e-6);
        assert_eq!(max_magnitude(&ImpactMap::new()), 0.0);
    }

    #[test]
    fn test_trigger_matching() {
        let trigger = Trigger {
            pattern: "8/8/8/8/8/8/8/4K3".to_string(),
            impacts: ImpactMap::new(),
            narrative: "alone on the board".to_string(),
            turn: 40,
        };
        assert!(trigger.matches("8/8/8/8/8/8/8/4K3"));
        assert!(!trigger.matches("8/8/8/8/8/8/8/3K4"));
    }
}
