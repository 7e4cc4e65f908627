//! Turn scheduling.
//!
//! Each turn draws one of three actions uniformly, then corrects the draw
//! against recent history so games keep moving: a window without any war
//! forces a war, and an action that already dominates the window is swapped
//! for one of the other two.

use rand::Rng;
use serde::Serialize;

/// The number of recent turns the scheduler inspects.
pub const ANTI_STALL_WINDOW: usize = 5;

/// The scheduler leaves the draw alone until this many turns have been logged.
pub const ANTI_STALL_MIN_TURNS: usize = 3;

/// An action drawn this often within the window is replaced.
pub const REPEAT_LIMIT: usize = 3;

/// The kind of action a nation takes on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    War,
    Alliance,
    Ideology,
}

/// All actions in draw order.
pub const ALL_ACTIONS: [Action; 3] = [Action::War, Action::Alliance, Action::Ideology];

impl Action {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Append-only history of the actions chosen each turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnLog {
    actions: Vec<Action>,
}

impl TurnLog {
    pub fn new() -> Self {
        TurnLog::default()
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns up to the last `n` actions, oldest first.
    pub fn recent(&self, n: usize) -> &[Action] {
        &self.actions[self.actions.len().saturating_sub(n)..]
    }

    /// Counts how often each action has been chosen, indexed by `Action::index`.
    pub fn counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for a in &self.actions {
            counts[a.index()] += 1;
        }
        counts
    }
}

/// Draws an action uniformly at random.
pub fn draw_action<R: Rng + ?Sized>(rng: &mut R) -> Action {
    ALL_ACTIONS[rng.gen_range(0..ALL_ACTIONS.len())]
}

/// Corrects a drawn action against the recent history in `log`.
pub fn anti_stall<R: Rng + ?Sized>(candidate: Action, log: &TurnLog, rng: &mut R) -> Action {
    if log.len() < ANTI_STALL_MIN_TURNS {
        return candidate;
    }
    let window = log.recent(ANTI_STALL_WINDOW);
    if !window.contains(&Action::War) {
        return Action::War;
    }
    let repeats = window.iter().filter(|a| **a == candidate).count();
    if repeats >= REPEAT_LIMIT {
        let others: Vec<Action> = ALL_ACTIONS.into_iter().filter(|a| *a != candidate).collect();
        return others[rng.gen_range(0..others.len())];
    }
    candidate
}

/// Draws the next action, applies the anti-stall correction, and logs it.
pub fn next_action<R: Rng + ?Sized>(log: &mut TurnLog, rng: &mut R) -> Action {
    let candidate = draw_action(rng);
    let action = anti_stall(candidate, log, rng);
    log.push(action);
    action
}
