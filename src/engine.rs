//! Engine state management.
//!
//! Owns the world, the turn log, the random source, and the configuration
//! for one game. Each call to `run_turn` schedules an action, picks the
//! acting nation, resolves the action, and reports what happened.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{NationId, World};
use crate::protocol::frame::{Frame, Presenter};
use crate::protocol::scenario::{Scenario, ScenarioError};
use crate::resolve::{dispatch, LossMode, Outcome};
use crate::schedule::{next_action, Action, TurnLog};

/// Default number of turns shown per second by paced front ends.
const DEFAULT_TURNS_PER_SEC: u32 = 5;

/// Default turn cap for a single game.
const DEFAULT_MAX_TURNS: u64 = 100_000;

/// Configuration for a single game.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Losers of a war are absorbed whole instead of losing one territory.
    pub total_losses: bool,
    /// Pacing for front ends that animate the game. Ignored by the engine.
    pub turns_per_sec: u32,
    /// The game stops without a winner after this many turns.
    pub max_turns: u64,
    /// Random seed (0 = use entropy).
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            total_losses: false,
            turns_per_sec: DEFAULT_TURNS_PER_SEC,
            max_turns: DEFAULT_MAX_TURNS,
            seed: 0,
        }
    }
}

impl SimConfig {
    pub fn loss_mode(&self) -> LossMode {
        LossMode::from_total_losses(self.total_losses)
    }
}

/// What happened on one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    /// 1-based turn number.
    pub turn: u64,
    pub action: Action,
    pub actor: NationId,
    /// Display name of the acting nation at the start of the turn.
    pub actor_name: String,
    pub outcome: Outcome,
}

impl TurnReport {
    pub fn messages(&self) -> Vec<String> {
        self.outcome.messages()
    }
}

/// A nation leaving the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Elimination {
    pub turn: u64,
    pub nation: String,
}

/// Summary of a finished (or capped) game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub winner: Option<String>,
    pub turns: u64,
    /// How often each action was scheduled: war, alliance, ideology.
    pub action_counts: [usize; 3],
    pub eliminations: Vec<Elimination>,
}

/// Runs one game from a starting world to a single survivor.
pub struct Engine {
    world: World,
    log: TurnLog,
    config: SimConfig,
    rng: SmallRng,
    turn: u64,
    eliminations: Vec<Elimination>,
}

impl Engine {
    /// Creates an engine seeded from `config.seed`, or from entropy if it is 0.
    pub fn new(world: World, config: SimConfig) -> Self {
        let rng = if config.seed != 0 {
            SmallRng::seed_from_u64(config.seed)
        } else {
            SmallRng::from_entropy()
        };
        Engine::with_rng(world, config, rng)
    }

    /// Creates an engine that draws from the given random source.
    pub fn with_rng(world: World, config: SimConfig, rng: SmallRng) -> Self {
        Engine {
            world,
            log: TurnLog::new(),
            config,
            rng,
            turn: 0,
            eliminations: Vec::new(),
        }
    }

    /// Builds the world described by `scenario`. The scenario's own config is
    /// used unless `config` is given.
    pub fn from_scenario(
        scenario: &Scenario,
        config: Option<SimConfig>,
    ) -> Result<Self, ScenarioError> {
        let world = scenario.build_world()?;
        let config = config.or_else(|| scenario.config.clone()).unwrap_or_default();
        Ok(Engine::new(world, config))
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn log(&self) -> &TurnLog {
        &self.log
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Returns the number of turns played so far.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Returns true once at most one nation remains.
    pub fn is_over(&self) -> bool {
        self.world.nation_count() <= 1
    }

    /// Returns true if the turn cap has been reached.
    pub fn is_capped(&self) -> bool {
        self.turn >= self.config.max_turns
    }

    /// Captures the current map for the presentation layer.
    pub fn frame(&self) -> Frame {
        Frame::capture(&self.world, self.turn)
    }

    /// Plays one turn. Returns None if the game is over or capped.
    pub fn run_turn(&mut self) -> Option<TurnReport> {
        if self.is_over() || self.is_capped() {
            return None;
        }

        let action = next_action(&mut self.log, &mut self.rng);
        let nations = self.world.nations();
        let acting = &nations[self.rng.gen_range(0..nations.len())];
        let actor = acting.id;
        let actor_name = acting.name.clone();

        let outcome = dispatch(
            action,
            actor,
            &mut self.world,
            self.config.loss_mode(),
            &mut self.rng,
        );
        self.turn += 1;

        if let Some(name) = outcome.eliminated() {
            self.eliminations.push(Elimination {
                turn: self.turn,
                nation: name.to_string(),
            });
        }

        let report = TurnReport {
            turn: self.turn,
            action,
            actor,
            actor_name,
            outcome,
        };
        for message in report.messages() {
            debug!(
                turn = report.turn,
                action = ?report.action,
                actor = %report.actor_name,
                "{}",
                message
            );
        }
        Some(report)
    }

    /// Plays until one nation remains or the turn cap is hit, rendering a
    /// frame after setup and after every turn.
    pub fn run<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> GameResult {
        presenter.render(&self.frame());
        while self.run_turn().is_some() {
            presenter.render(&self.frame());
        }
        self.result()
    }

    /// Summarises the game so far.
    pub fn result(&self) -> GameResult {
        let winner = self.world.winner().map(|n| n.name.clone());
        match &winner {
            Some(name) => info!(turns = self.turn, "{} has won the game!", name),
            None if self.is_capped() => {
                info!(turns = self.turn, "no winner after {} turns", self.turn)
            }
            None => {}
        }
        GameResult {
            winner,
            turns: self.turn,
            action_counts: self.log.counts(),
            eliminations: self.eliminations.clone(),
        }
    }
}

/// Formats the closing announcement for a game.
pub fn closing_message(result: &GameResult) -> String {
    match &result.winner {
        Some(name) => format!("{name} has won the game!"),
        None => format!("No winner after {} turns.", result.turns),
    }
}
