//! Batch game generation.
//!
//! Plays many independent games from the same starting world and records
//! how each one ended. Games share nothing but the starting world, so they
//! run concurrently on a rayon pool when more than one thread is requested.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::info;

use crate::board::World;
use crate::engine::{Engine, GameResult, SimConfig};

/// Configuration for batch game generation.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy). Game `i` uses `seed + i`.
    pub seed: u64,
    /// Losers of a war are absorbed whole.
    pub total_losses: bool,
    /// Turn cap per game.
    pub max_turns: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        let sim = SimConfig::default();
        BatchConfig {
            num_games: 10,
            threads: 4,
            seed: 0,
            total_losses: sim.total_losses,
            max_turns: sim.max_turns,
            quiet: false,
        }
    }
}

impl BatchConfig {
    fn sim_config(&self) -> SimConfig {
        SimConfig {
            total_losses: self.total_losses,
            max_turns: self.max_turns,
            seed: self.seed,
            ..SimConfig::default()
        }
    }

    fn rng_for(&self, game_id: usize) -> SmallRng {
        if self.seed != 0 {
            SmallRng::seed_from_u64(self.seed.wrapping_add(game_id as u64))
        } else {
            SmallRng::from_entropy()
        }
    }
}

/// A completed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    /// Sequential game ID.
    pub game_id: usize,
    #[serde(flatten)]
    pub result: GameResult,
}

/// Plays a single game from `world` and returns its record.
pub fn play_game(world: &World, config: &BatchConfig, game_id: usize) -> GameRecord {
    let mut engine = Engine::with_rng(world.clone(), config.sim_config(), config.rng_for(game_id));
    let result = engine.run(&mut |_: &crate::protocol::Frame| {});
    GameRecord { game_id, result }
}

/// Runs batch generation, producing one record per game.
///
/// Records arrive in completion order, which differs from game order when
/// games run in parallel.
pub fn run_batch(world: &World, config: &BatchConfig) -> Vec<GameRecord> {
    let mut games = Vec::with_capacity(config.num_games);
    run_batch_with_callback(world, config, |game| {
        games.push(game);
    });
    games
}

/// Runs batch generation, calling `on_game` with each completed record.
pub fn run_batch_with_callback<F>(world: &World, config: &BatchConfig, on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    if config.threads > 1 {
        run_batch_parallel(world, config, on_game);
    } else {
        run_batch_sequential(world, config, on_game);
    }
}

fn run_batch_sequential<F>(world: &World, config: &BatchConfig, mut on_game: F)
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let game_start = Instant::now();
        let game = play_game(world, config, i);
        if !config.quiet {
            log_progress(i + 1, config.num_games, &game, game_start);
        }
        on_game(game);
    }
}

/// Plays games on a rayon pool and delivers them to the callback on the
/// calling thread through a channel.
fn run_batch_parallel<F>(world: &World, config: &BatchConfig, mut on_game: F)
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<GameRecord>();

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!("failed to build thread pool ({e}), playing sequentially");
            return run_batch_sequential(world, config, on_game);
        }
    };

    std::thread::scope(|scope| {
        scope.spawn(|| {
            pool.install(|| {
                (0..config.num_games)
                    .into_par_iter()
                    .for_each_with(tx, |tx, i| {
                        let game_start = Instant::now();
                        let game = play_game(world, config, i);
                        if !config.quiet {
                            let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                            log_progress(n, config.num_games, &game, game_start);
                        }
                        let _ = tx.send(game);
                    });
            });
        });

        for game in rx {
            on_game(game);
        }
    });
}

fn log_progress(n: usize, total: usize, game: &GameRecord, started: Instant) {
    let outcome = match &game.result.winner {
        Some(w) => format!("{w} wins"),
        None => "no winner".to_string(),
    };
    info!(
        "Game {}/{}: {} in {} turns ({:.2}s)",
        n,
        total,
        outcome,
        game.result.turns,
        started.elapsed().as_secs_f64()
    );
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Counts wins per nation, most wins first. Games without a winner are
/// counted under `None`.
pub fn win_counts(games: &[GameRecord]) -> Vec<(Option<String>, usize)> {
    let mut counts: BTreeMap<Option<String>, usize> = BTreeMap::new();
    for game in games {
        *counts.entry(game.result.winner.clone()).or_default() += 1;
    }
    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// Logs a summary of win counts and average game length.
pub fn print_summary(games: &[GameRecord]) {
    if games.is_empty() {
        return;
    }
    let total_turns: u64 = games.iter().map(|g| g.result.turns).sum();
    info!(
        "{} games, average length {:.1} turns",
        games.len(),
        total_turns as f64 / games.len() as f64
    );
    for (winner, count) in win_counts(games) {
        let name = winner.unwrap_or_else(|| "(no winner)".to_string());
        info!(
            "  {:<32} {:>5} ({:.1}%)",
            name,
            count,
            100.0 * count as f64 / games.len() as f64
        );
    }
}
