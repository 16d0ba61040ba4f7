//! Selection Policies
//!
//! Strategies for picking the winner of a ranked debate round. The moderator
//! only sees the trait, so policies swap without touching it.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;

use crate::agent::MoveProposal;

/// Weight every proposal keeps on top of its score margin.
const WEIGHT_FLOOR: f32 = 0.1;

pub trait SelectionPolicy: Send {
    fn name(&self) -> &'static str;

    /// Index of the winner among `proposals` (ranked best first), or `None`
    /// when there is nothing to choose.
    fn choose(&mut self, proposals: &[MoveProposal]) -> Option<usize>;
}

/// Always the top-ranked proposal.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestScore;

impl SelectionPolicy for HighestScore {
    fn name(&self) -> &'static str {
        "highest"
    }

    fn choose(&mut self, proposals: &[MoveProposal]) -> Option<usize> {
        (!proposals.is_empty()).then_some(0)
    }
}

/// Random pick weighted by how far each score sits above the lowest one.
#[derive(Debug, Clone)]
pub struct WeightedRandom {
    rng: SmallRng,
}

impl WeightedRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

/// Selection weights for ranked proposals.
pub fn score_weights(proposals: &[MoveProposal]) -> Vec<f32> {
    let min = proposals
        .iter()
        .map(|p| p.score)
        .filter(|s| s.is_finite())
        .fold(f32::INFINITY, f32::min);
    proposals
        .iter()
        .map(|p| {
            if p.score.is_finite() {
                p.score - min + WEIGHT_FLOOR
            } else {
                WEIGHT_FLOOR
            }
        })
        .collect()
}

fn weighted_select(rng: &mut SmallRng, weights: &[f32]) -> usize {
    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return 0;
    }
    let r: f32 = rng.gen::<f32>() * total;
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if r < cumulative {
            return i;
        }
    }
    weights.len() - 1
}

impl SelectionPolicy for WeightedRandom {
    fn name(&self) -> &'static str {
        "weighted"
    }

    fn choose(&mut self, proposals: &[MoveProposal]) -> Option<usize> {
        if proposals.is_empty() {
            return None;
        }
        Some(weighted_select(&mut self.rng, &score_weights(proposals)))
    }
}

/// Policy names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Highest,
    Weighted,
}

impl PolicyKind {
    pub fn build(self, seed: u64) -> Box<dyn SelectionPolicy> {
        match self {
            PolicyKind::Highest => Box::new(HighestScore),
            PolicyKind::Weighted => Box::new(WeightedRandom::new(seed)),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::Highest => f.write_str("highest"),
            PolicyKind::Weighted => f.write_str("weighted"),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "highest" => Ok(PolicyKind::Highest),
            "weighted" => Ok(PolicyKind::Weighted),
            other => Err(format!("unknown selection policy: {}", other)),
        }
    }
}
