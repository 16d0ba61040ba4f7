//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.

use std::collections::BTreeMap;

use crate::{EmotionSnapshot, GameMoment, ImpactMap, Interaction, InteractionType, Metric};

/// A short sequence of interactions between the opening pieces.
pub fn sample_interactions() -> Vec<Interaction> {
    vec![
        Interaction::new("Pe2", "Pd2", InteractionType::Cooperation, 1, "e2e4", 0.2),
        Interaction::new("Ng1", "Pe2", InteractionType::Support, 2, "g1f3", 0.4),
        Interaction::new("Pd2", "Ng1", InteractionType::Competition, 3, "d2d4", -0.1),
        Interaction::new("Bf1", "opp:c5", InteractionType::Threat, 3, "f8c5", -0.3),
    ]
}

/// A debate-outcome moment for the king's knight.
pub fn sample_moment() -> GameMoment {
    let mut impact = BTreeMap::new();
    impact.insert(
        "Ng1".to_string(),
        ImpactMap::from([(Metric::Coordination, 0.1), (Metric::Cohesion, 0.05)]),
    );
    GameMoment {
        moment_id: crate::generate_moment_id(1),
        position: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string(),
        move_uci: "g1f3".to_string(),
        impact,
        turn: 1,
        narrative: "Sir Galahop rides out to f3.".to_string(),
        participants: vec!["Ng1".to_string()],
        interaction_type: Some(InteractionType::Cooperation),
    }
}

/// A calm, middling emotional state.
pub fn calm_emotions() -> EmotionSnapshot {
    EmotionSnapshot {
        confidence: 0.5,
        morale: 0.5,
        trust: 0.5,
        aggression: 0.5,
    }
}
