//! Alien Invasion
//!
//! Mad aliens are about to invade the earth. Reads a world map, unleashes
//! the aliens, and reports every destroyed location until the invasion ends.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fs;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use invasion_core::config::DEFAULT_CONFIG_PATH;
use invasion_core::events::EventLogger;
use invasion_core::report::{conclusion_sentence, snapshot};
use invasion_core::{run_to_completion, Invasion, InvasionConfig, InvasionError, WorldMap};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "alien_invasion")]
#[command(about = "Mad aliens are about to invade the earth and this program simulates the invasion")]
struct Cli {
    /// Log round-by-round detail to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Invade a world
    Invade(InvadeArgs),
}

#[derive(Args, Debug)]
struct InvadeArgs {
    /// World map file, one location per line
    world_file: PathBuf,

    /// Number of aliens to unleash
    #[arg(long, short = 'a', default_value_t = 0)]
    aliens: u32,

    /// Random seed for reproducibility (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Rounds before the invasion is called off (overrides the config file)
    #[arg(long)]
    max_moves: Option<u32>,

    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Write battles and the outcome to this JSONL file
    #[arg(long)]
    events: Option<PathBuf>,

    /// Write the surviving map to this JSON file
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Invade(args) => invade(args),
    }
}

/// Reject arguments that cannot start an invasion
fn validate(args: &InvadeArgs) -> Result<(), InvasionError> {
    if args.world_file.as_os_str().is_empty() {
        return Err(InvasionError::InvalidFileName {
            path: args.world_file.clone(),
        });
    }
    if args.aliens == 0 {
        return Err(InvasionError::InvalidAgentCount { count: args.aliens });
    }
    Ok(())
}

fn invade(args: InvadeArgs) -> anyhow::Result<()> {
    validate(&args)?;

    let config = InvasionConfig::load_or_default(&args.config);
    let seed = args
        .seed
        .or(config.simulation.seed)
        .unwrap_or_else(rand::random);
    let max_moves = args.max_moves.unwrap_or(config.simulation.max_moves);
    info!("Seed: {}, max moves: {}", seed, max_moves);

    let map = WorldMap::load(&args.world_file)?;
    info!(
        "Loaded {} locations from {}",
        map.location_count(),
        args.world_file.display()
    );

    let mut invasion = Invasion::new(map, args.aliens, SmallRng::seed_from_u64(seed))?
        .with_max_moves(max_moves);

    if config.output.print_initial_map {
        println!("Initial world:");
        print!("{}", invasion.map());
        println!();
    }

    let mut logger = match &args.events {
        Some(path) => EventLogger::new(path)
            .with_context(|| format!("cannot create event log {}", path.display()))?,
        None => EventLogger::null(),
    };

    let summary = run_to_completion(&mut invasion, &mut logger, |_, battle| {
        println!("{}", battle);
    })?;

    if config.output.print_final_map {
        println!();
        println!("Remaining world:");
        print!("{}", invasion.map());
    }
    println!();
    println!("{}", conclusion_sentence(&summary.conclusion, summary.rounds));

    if let Some(path) = &args.snapshot {
        let state = snapshot(invasion.map(), summary.rounds, Some(summary.conclusion.outcome()));
        fs::write(path, state.to_json_pretty()?)
            .with_context(|| format!("cannot write snapshot {}", path.display()))?;
        info!("Wrote snapshot to {}", path.display());
    }

    Ok(())
}
