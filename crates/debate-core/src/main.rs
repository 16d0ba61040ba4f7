//! Debate Chess CLI
//!
//! Replays a scenario: each turn the agents debate the listed moves, the
//! winner is played, and the opponent's scripted reply lands on the team.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use debate_core::{
    DebateModerator, DebateOutcome, EventLog, MaterialEvaluator, PersonalityFactory, PolicyKind,
    Position, Scenario, SimConfig, Theme,
};
use narrator::TemplateNarrator;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "debate_sim")]
#[command(about = "Chess pieces debate their moves")]
struct Args {
    /// Scenario TOML to replay
    #[arg(long, default_value = "crates/debate-core/scenarios/italian.toml")]
    scenario: PathBuf,

    /// Simulation configuration TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Personality template overrides TOML
    #[arg(long)]
    personalities: Option<PathBuf>,

    /// Argument template TOML
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Personality theme: aggressive, defensive or creative
    #[arg(long)]
    theme: Option<Theme>,

    /// Winner selection policy: highest or weighted
    #[arg(long, default_value = "highest")]
    policy: PolicyKind,

    /// Random seed for the weighted policy
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write the JSONL event log here
    #[arg(long)]
    events_out: Option<PathBuf>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();

    if args.print_config {
        print!("{}", SimConfig::default().to_toml()?);
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };
    let factory = match &args.personalities {
        Some(path) => PersonalityFactory::from_file(path)?,
        None => PersonalityFactory::new(),
    };
    let narrator = match &args.templates {
        Some(path) => TemplateNarrator::from_template_file(path)?,
        None => TemplateNarrator::with_defaults(),
    };
    let scenario = Scenario::from_file(&args.scenario)?;

    let mut moderator = DebateModerator::lineup_with(
        &scenario.start_fen,
        &factory,
        Box::new(MaterialEvaluator::new()),
        Box::new(narrator),
        config,
    )?
    .with_policy(args.policy.build(args.seed));
    if let Some(theme) = args.theme {
        moderator = moderator.with_theme(theme);
    }

    let mut log = match &args.events_out {
        Some(path) => EventLog::new(path)?,
        None => EventLog::null(),
    };

    info!(
        "Scenario '{}': {} turns, {} agents, policy {}",
        scenario.name,
        scenario.turns.len(),
        moderator.roster().len(),
        moderator.policy_name()
    );

    let mut position = Position::new(scenario.start_fen.clone());
    for turn in &scenario.turns {
        if let Some(fen) = &turn.fen {
            position = Position::new(fen.clone());
        }

        let round = moderator.conduct_debate(&position, &turn.moves)?;
        println!("\n=== Turn {} ===", round.turn());
        for (i, p) in round.proposals().iter().enumerate() {
            println!("{}. {} {} ({:.2})", i + 1, p.agent_name, p.move_uci, p.score);
            println!("   {}", p.argument);
        }

        let outcome = match turn.pick {
            Some(index) => DebateOutcome::Winner(moderator.select_winning_proposal(index)?),
            None => moderator.choose_winning_proposal()?,
        };
        let DebateOutcome::Winner(winner) = outcome else {
            println!("No agent could move. The debate falls silent.");
            log.log_batch(moderator.drain_events())?;
            break;
        };
        println!("Winner: {} plays {}", winner.agent_name, winner.move_uci);
        moderator.apply_own_move(&winner.move_uci)?;
        position = position.apply(&winner.move_uci)?;

        if let Some(reply) = &turn.opponent {
            println!("Opponent answers {}", reply.move_uci);
            let before = position.clone();
            moderator.register_opponent_action(&before, &reply.move_uci, &reply.affected, reply.interaction);
            if let Some(captured) = moderator.apply_opponent_move(&before, &reply.move_uci)? {
                println!("{} has fallen.", captured);
            }
            position = before.apply(&reply.move_uci)?;
        }

        let psych = moderator.psychological_state();
        println!(
            "Team: cohesion {:.2}, morale {:.2}, coordination {:.2}, leadership {:.2}",
            psych.cohesion, psych.morale, psych.coordination, psych.leadership
        );
        log.log_batch(moderator.drain_events())?;
    }

    println!("\n=== Debate history ===");
    for summary in moderator.debate_history_summaries() {
        println!("{}\n", summary);
    }

    log.flush()?;
    info!("Done: {} events logged", log.event_count());
    Ok(())
}
