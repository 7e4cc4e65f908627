//! Batch game generation CLI.
//!
//! Plays many games on one map and outputs a JSONL record per game.
//!
//! Usage:
//!   cargo run --release --bin batch -- [OPTIONS]

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use conquest::batch::{self, BatchConfig};
use conquest::protocol::Scenario;

#[derive(Debug, Parser)]
#[command(name = "batch", about = "Play many conquest games and record the outcomes as JSONL")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Number of parallel threads
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Random seed, 0 for entropy
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Losers of a war are absorbed whole
    #[arg(long)]
    total_losses: bool,

    /// Turn cap per game
    #[arg(long)]
    max_turns: Option<u64>,

    /// Scenario JSON file (defaults to the built-in European map)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Suppress progress and summary output
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("conquest=info")),
        )
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::builtin()?,
    };
    let world = scenario.build_world()?;

    let mut config = BatchConfig {
        num_games: args.games,
        threads: args.threads,
        seed: args.seed,
        total_losses: args.total_losses,
        quiet: args.quiet,
        ..BatchConfig::default()
    };
    if let Some(max) = args.max_turns {
        config.max_turns = max;
    }

    if !config.quiet {
        tracing::info!(
            "Batch: {} games, {} threads, {} losses",
            config.num_games,
            config.threads,
            if config.total_losses { "total" } else { "partial" }
        );
    }

    let start = Instant::now();
    let games = batch::run_batch(&world, &config);
    let elapsed = start.elapsed();

    if !config.quiet {
        tracing::info!(
            "Completed {} games in {:.1}s",
            games.len(),
            elapsed.as_secs_f64()
        );
        batch::print_summary(&games);
    }

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            batch::write_jsonl(&games, &mut writer)?;
            if !config.quiet {
                tracing::info!("Wrote {} games to {}", games.len(), path.display());
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            batch::write_jsonl(&games, &mut writer)?;
        }
    }
    Ok(())
}
