//! Action resolution.
//!
//! One resolver per action kind. `dispatch` maps a scheduled `Action` onto
//! its resolver and wraps the result in an `Outcome`.

pub mod alliance;
pub mod ideology;
pub mod war;

use rand::Rng;

use crate::board::{NationId, World};
use crate::schedule::Action;

pub use alliance::{propose_alliance, resolve_alliance, AllianceOutcome};
pub use ideology::{change_ideology, resolve_ideology, IdeologyOutcome};
pub use war::{apply_war, draw_victor, find_target, resolve_war, LossMode, Side, WarOutcome};

/// What happened when a nation acted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    War(WarOutcome),
    Alliance(AllianceOutcome),
    Ideology(IdeologyOutcome),
    /// The action had no effect (nobody to fight or ally with, or the drawn
    /// ideology was already held).
    Idle,
}

impl Outcome {
    /// Returns the announcements produced by this outcome, in order.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Outcome::War(w) => {
                let mut out = vec![w.message.clone()];
                if let Some(name) = &w.eliminated {
                    out.push(format!("{name} has been eliminated."));
                }
                out
            }
            Outcome::Alliance(a) => vec![a.message.clone()],
            Outcome::Ideology(i) => vec![i.message.clone()],
            Outcome::Idle => Vec::new(),
        }
    }

    /// Returns the display name of the nation eliminated by this outcome.
    pub fn eliminated(&self) -> Option<&str> {
        match self {
            Outcome::War(w) => w.eliminated.as_deref(),
            _ => None,
        }
    }
}

/// Runs the resolver for `action` with `actor` as the acting nation.
pub fn dispatch<R: Rng + ?Sized>(
    action: Action,
    actor: NationId,
    world: &mut World,
    mode: LossMode,
    rng: &mut R,
) -> Outcome {
    match action {
        Action::War => resolve_war(world, actor, mode, rng).map_or(Outcome::Idle, Outcome::War),
        Action::Alliance => {
            resolve_alliance(world, actor, rng).map_or(Outcome::Idle, Outcome::Alliance)
        }
        Action::Ideology => {
            resolve_ideology(world, actor, rng).map_or(Outcome::Idle, Outcome::Ideology)
        }
    }
}
