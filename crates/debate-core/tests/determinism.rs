//! Determinism verification tests
//!
//! The same scenario, seed and configuration must replay to the same games,
//! whether proposals are gathered on the rayon pool or serially.

use std::path::Path;

use debate_core::{
    DebateModerator, DebateOutcome, MaterialEvaluator, PolicyKind, Position, Scenario, SimConfig,
};
use debate_events::PsychologySnapshot;
use narrator::TemplateNarrator;

struct Replay {
    moves: Vec<String>,
    scores: Vec<Vec<f32>>,
    psychology: PsychologySnapshot,
}

fn bundled_scenario() -> Scenario {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/italian.toml");
    Scenario::from_file(&path).unwrap()
}

fn replay(scenario: &Scenario, policy: PolicyKind, seed: u64, parallel: bool) -> Replay {
    let mut config = SimConfig::default();
    config.debate.parallel_evaluation = parallel;
    let mut moderator = DebateModerator::standard_lineup(
        &scenario.start_fen,
        Box::new(MaterialEvaluator::new()),
        Box::new(TemplateNarrator::with_defaults()),
        config,
    )
    .unwrap()
    .with_policy(policy.build(seed));

    let mut position = Position::new(scenario.start_fen.clone());
    let mut moves = Vec::new();
    let mut scores = Vec::new();
    for turn in &scenario.turns {
        if let Some(fen) = &turn.fen {
            position = Position::new(fen.clone());
        }
        let round = moderator.conduct_debate(&position, &turn.moves).unwrap();
        scores.push(round.proposals().iter().map(|p| p.score).collect());

        let winner = match turn.pick {
            Some(index) => moderator.select_winning_proposal(index).unwrap(),
            None => match moderator.choose_winning_proposal().unwrap() {
                DebateOutcome::Winner(p) => p,
                DebateOutcome::NoProposals => break,
            },
        };
        moderator.apply_own_move(&winner.move_uci).unwrap();
        position = position.apply(&winner.move_uci).unwrap();
        moves.push(winner.move_uci);

        if let Some(reply) = &turn.opponent {
            let before = position.clone();
            moderator.register_opponent_action(&before, &reply.move_uci, &reply.affected, reply.interaction);
            moderator.apply_opponent_move(&before, &reply.move_uci).unwrap();
            position = before.apply(&reply.move_uci).unwrap();
        }
    }

    Replay {
        moves,
        scores,
        psychology: moderator.psychological_state(),
    }
}

/// Test that the bundled scenario replays identically with the same seed
#[test]
fn test_weighted_replay_determinism() {
    let scenario = bundled_scenario();
    let first = replay(&scenario, PolicyKind::Weighted, 42, true);
    let second = replay(&scenario, PolicyKind::Weighted, 42, true);

    assert_eq!(first.moves, second.moves, "Same seed should play the same moves");
    assert_eq!(first.scores, second.scores);
    assert_eq!(first.psychology, second.psychology);
    assert_eq!(first.moves.len(), scenario.turns.len());
}

/// Test that parallel and serial gathering agree
#[test]
fn test_parallel_matches_serial() {
    let scenario = bundled_scenario();
    let parallel = replay(&scenario, PolicyKind::Highest, 0, true);
    let serial = replay(&scenario, PolicyKind::Highest, 0, false);

    assert_eq!(parallel.moves, serial.moves);
    assert_eq!(parallel.scores, serial.scores);
    assert_eq!(parallel.psychology, serial.psychology);
}

/// Test that forced picks are honoured regardless of policy
#[test]
fn test_forced_picks_ignore_policy() {
    let scenario = bundled_scenario();
    let highest = replay(&scenario, PolicyKind::Highest, 0, true);
    let weighted = replay(&scenario, PolicyKind::Weighted, 7, true);

    for (i, turn) in scenario.turns.iter().enumerate() {
        if turn.pick.is_some() {
            assert_eq!(highest.moves[i], weighted.moves[i], "turn {} was forced", i + 1);
        }
    }
}
