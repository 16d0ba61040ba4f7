//! Emotional State
//!
//! Four bounded scalars per agent. Every write path clamps into [0, 1], so
//! neither construction nor a malformed delta can push a field out of range.

use debate_events::{EmotionSnapshot, ImpactMap, Metric, PieceKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionalState {
    /// Drives risk-taking
    confidence: f32,
    /// Drives evaluation weights
    morale: f32,
    /// Drives cooperation bonuses
    trust: f32,
    /// Tactical versus positional leaning
    aggression: f32,
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

impl EmotionalState {
    pub fn new(confidence: f32, morale: f32, trust: f32, aggression: f32) -> Self {
        Self {
            confidence: clamp_unit(confidence),
            morale: clamp_unit(morale),
            trust: clamp_unit(trust),
            aggression: clamp_unit(aggression),
        }
    }

    /// Starting temperament for a piece kind.
    pub fn default_for(kind: PieceKind) -> Self {
        match kind {
            PieceKind::Knight => Self::new(0.7, 0.8, 0.6, 0.7),
            PieceKind::Bishop => Self::new(0.6, 0.7, 0.4, 0.5),
            PieceKind::Rook => Self::new(0.3, 0.5, 0.7, 0.2),
            PieceKind::Queen => Self::new(0.8, 0.6, 0.4, 0.7),
            PieceKind::King => Self::new(0.2, 0.4, 0.5, 0.3),
            PieceKind::Pawn => Self::new(0.5, 0.8, 0.7, 0.6),
        }
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn morale(&self) -> f32 {
        self.morale
    }

    pub fn trust(&self) -> f32 {
        self.trust
    }

    pub fn aggression(&self) -> f32 {
        self.aggression
    }

    /// Adds each emotional delta and clamps. Team-only metrics are ignored;
    /// non-finite deltas are dropped.
    pub fn apply_impact(&mut self, impact: &ImpactMap) {
        for (metric, delta) in impact {
            self.apply_delta(*metric, *delta);
        }
    }

    pub fn apply_delta(&mut self, metric: Metric, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        let field = match metric {
            Metric::Confidence => &mut self.confidence,
            Metric::Morale => &mut self.morale,
            Metric::Trust => &mut self.trust,
            Metric::Aggression => &mut self.aggression,
            _ => return,
        };
        *field = clamp_unit(*field + delta);
    }

    /// Higher trust and morale make for better teamwork.
    pub fn cooperation_bonus(&self) -> f32 {
        (self.trust * self.morale).sqrt()
    }

    /// Confidence and aggression together drive risk-taking.
    pub fn risk_modifier(&self) -> f32 {
        0.7 * self.confidence + 0.3 * self.aggression
    }

    /// Delta that scales confidence by `factor`, clamped like any impact.
    pub fn confidence_scaling(&self, factor: f32) -> ImpactMap {
        let target = clamp_unit(self.confidence * factor);
        ImpactMap::from([(Metric::Confidence, target - self.confidence)])
    }

    pub fn snapshot(&self) -> EmotionSnapshot {
        EmotionSnapshot {
            confidence: self.confidence,
            morale: self.morale,
            trust: self.trust,
            aggression: self.aggression,
        }
    }
}

impl Default for EmotionalState {
    fn default() -> Self {
        Self::new(0.5, 0.5, 0.5, 0.5)
    }
}

impl From<EmotionSnapshot> for EmotionalState {
    fn from(s: EmotionSnapshot) -> Self {
        Self::new(s.confidence, s.morale, s.trust, s.aggression)
    }
}
