//! Team Psychology
//!
//! Team-wide cohesion, morale, coordination and leadership. Changed only by
//! the named event handlers below; every field stays in [0, 1].

use debate_events::{ImpactMap, Metric, PsychologySnapshot};

use crate::config::PsychologyConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PsychologicalState {
    cohesion: f32,
    morale: f32,
    coordination: f32,
    leadership: f32,
}

fn clamped(current: f32, delta: f32) -> f32 {
    if !delta.is_finite() {
        return current;
    }
    (current + delta).clamp(0.0, 1.0)
}

impl PsychologicalState {
    pub fn new(cohesion: f32, morale: f32, coordination: f32, leadership: f32) -> Self {
        let unit = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            cohesion: unit(cohesion),
            morale: unit(morale),
            coordination: unit(coordination),
            leadership: unit(leadership),
        }
    }

    pub fn cohesion(&self) -> f32 {
        self.cohesion
    }

    pub fn morale(&self) -> f32 {
        self.morale
    }

    pub fn coordination(&self) -> f32 {
        self.coordination
    }

    pub fn leadership(&self) -> f32 {
        self.leadership
    }

    fn apply(&mut self, metric: Metric, delta: f32) {
        let field = match metric {
            Metric::Cohesion => &mut self.cohesion,
            Metric::Morale => &mut self.morale,
            Metric::Coordination => &mut self.coordination,
            Metric::Leadership => &mut self.leadership,
            _ => return,
        };
        *field = clamped(*field, delta);
    }

    /// Applies the team-scope entries of an impact map. Morale counts for the
    /// team as well as for individual agents.
    pub fn apply_team_impact(&mut self, impact: &ImpactMap) {
        for (metric, delta) in impact {
            self.apply(*metric, *delta);
        }
    }

    /// The top proposals agreed.
    pub fn on_consensus(&mut self, bonus: &ImpactMap) {
        self.apply_team_impact(bonus);
    }

    /// A piece suffered at the opponent's hands.
    pub fn on_trauma(&mut self, config: &PsychologyConfig) {
        self.apply(Metric::Morale, config.trauma_morale);
        self.apply(Metric::Cohesion, config.trauma_cohesion);
        self.apply(Metric::Coordination, config.trauma_coordination);
        self.apply(Metric::Leadership, config.trauma_leadership);
    }

    /// A piece is under threat. Morale drops, but the team closes ranks.
    pub fn on_threat(&mut self, config: &PsychologyConfig) {
        self.apply(Metric::Morale, config.threat_morale);
        self.apply(Metric::Cohesion, config.threat_cohesion);
    }

    /// Trust between two teammates moved by `delta`. Returns whether the
    /// change was large enough to register.
    pub fn on_relationship_change(&mut self, delta: f32, config: &PsychologyConfig) -> bool {
        if !delta.is_finite() || delta.abs() < config.relationship_threshold {
            return false;
        }
        self.apply(Metric::Cohesion, delta * config.relationship_cohesion_scale);
        self.apply(Metric::Coordination, delta * config.relationship_coordination_scale);
        true
    }

    pub fn snapshot(&self) -> PsychologySnapshot {
        PsychologySnapshot {
            cohesion: self.cohesion,
            morale: self.morale,
            coordination: self.coordination,
            leadership: self.leadership,
        }
    }
}

impl Default for PsychologicalState {
    fn default() -> Self {
        Self::new(0.5, 0.5, 0.5, 0.5)
    }
}
