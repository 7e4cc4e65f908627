//! Conquest -- plays one game on a map and narrates it.
//!
//! Each turn's announcements are written to stdout, followed by the winner.
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG` to adjust.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use conquest::engine::{closing_message, Engine};
use conquest::protocol::{Frame, JsonlPresenter, Presenter, Scenario, ScenarioError};

#[derive(Debug, Parser)]
#[command(name = "conquest", about = "Simulate a territorial conquest until one nation remains")]
struct Args {
    /// Scenario JSON file (defaults to the built-in European map)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Losers of a war are absorbed whole instead of losing one territory
    #[arg(long)]
    total_losses: bool,

    /// Turns shown per second; 0 runs as fast as possible
    #[arg(long)]
    turns_per_sec: Option<u32>,

    /// Stop without a winner after this many turns
    #[arg(long)]
    max_turns: Option<u64>,

    /// Random seed, 0 for entropy
    #[arg(long)]
    seed: Option<u64>,

    /// Write a JSON frame per turn to this file
    #[arg(long)]
    frames: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("conquest=warn")),
        )
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load(args: &Args) -> Result<Engine, ScenarioError> {
    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::builtin()?,
    };
    let mut config = scenario.config.clone().unwrap_or_default();
    config.total_losses |= args.total_losses;
    if let Some(tps) = args.turns_per_sec {
        config.turns_per_sec = tps;
    }
    if let Some(max) = args.max_turns {
        config.max_turns = max;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Engine::from_scenario(&scenario, Some(config))
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = load(&args)?;
    let mut frames: Box<dyn Presenter> = match &args.frames {
        Some(path) => Box::new(JsonlPresenter::new(BufWriter::new(File::create(path)?))),
        None => Box::new(|_: &Frame| {}),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let pace = match engine.config().turns_per_sec {
        0 => None,
        tps => Some(Duration::from_secs_f64(1.0 / f64::from(tps))),
    };

    frames.render(&engine.frame());
    let mut last = Instant::now();
    while let Some(report) = engine.run_turn() {
        for message in report.messages() {
            writeln!(out, "{}", message)?;
        }
        frames.render(&engine.frame());
        if let Some(pace) = pace {
            out.flush()?;
            let elapsed = last.elapsed();
            if elapsed < pace {
                thread::sleep(pace - elapsed);
            }
            last = Instant::now();
        }
    }

    let result = engine.result();
    writeln!(out)?;
    writeln!(out, "{}", closing_message(&result))?;
    out.flush()?;
    Ok(())
}
