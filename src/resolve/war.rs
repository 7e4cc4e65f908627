//! War resolution.
//!
//! A war runs in three steps: find a foreign-owned territory next to the
//! attacker's home, draw the victor from a lottery weighted by allied
//! strength, then apply losses according to the configured `LossMode`.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::board::{NationId, Territory, TerritoryId, World, ALL_DIRECTIONS};

/// Number of home-neighborhood samples tried before falling back to a scan
/// of the whole map.
pub const MAX_TARGET_ATTEMPTS: usize = 64;

/// How severe the consequences of losing a war are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LossMode {
    /// The loser gives up one strength point and the contested territory.
    #[default]
    Partial,
    /// The loser is absorbed whole by the victor.
    Total,
}

impl LossMode {
    pub const fn from_total_losses(total_losses: bool) -> LossMode {
        if total_losses {
            LossMode::Total
        } else {
            LossMode::Partial
        }
    }
}

/// Which side of a war won the strength lottery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Attacker,
    Defender,
}

/// The result of one war.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarOutcome {
    pub attacker: NationId,
    pub defender: NationId,
    /// The territory that was fought over.
    pub target: TerritoryId,
    pub victor: NationId,
    pub loser: NationId,
    /// Display name of the loser if it was removed from the game.
    pub eliminated: Option<String>,
    pub message: String,
}

/// Picks a territory for `attacker` to fight over.
///
/// A home territory held by someone else is always the target. Otherwise
/// the home's neighbor slots are sampled until a foreign-owned neighbor
/// turns up, up to `MAX_TARGET_ATTEMPTS` times. If that fails, any
/// foreign-owned territory bordering the attacker's land is chosen, then any
/// foreign-owned territory at all. Returns None if the attacker owns the
/// whole map.
pub fn find_target<R: Rng + ?Sized>(
    world: &World,
    attacker: NationId,
    rng: &mut R,
) -> Option<TerritoryId> {
    let nation = world.nation(attacker)?;
    let home = world.graph.get(nation.home);
    if home.owner != attacker {
        return Some(home.id);
    }

    let reachable = home.adjacent().any(|(_, t)| world.owner(t) != attacker);
    if reachable {
        for _ in 0..MAX_TARGET_ATTEMPTS {
            if let Some(t) = sample_neighbor(home, rng) {
                if world.owner(t) != attacker {
                    return Some(t);
                }
            }
        }
    }

    debug!(nation = %nation.name, "home neighborhood exhausted, scanning the map");
    fallback_target(world, attacker, rng)
}

/// Samples neighbor slots without replacement until a present neighbor is found.
fn sample_neighbor<R: Rng + ?Sized>(territory: &Territory, rng: &mut R) -> Option<TerritoryId> {
    let mut remaining = ALL_DIRECTIONS.to_vec();
    while !remaining.is_empty() {
        let dir = remaining.swap_remove(rng.gen_range(0..remaining.len()));
        if let Some(t) = territory.neighbor(dir) {
            return Some(t);
        }
    }
    None
}

fn fallback_target<R: Rng + ?Sized>(
    world: &World,
    attacker: NationId,
    rng: &mut R,
) -> Option<TerritoryId> {
    let frontier: BTreeSet<TerritoryId> = world
        .graph
        .owned_by(attacker)
        .flat_map(|t| t.adjacent().map(|(_, n)| n))
        .filter(|n| world.owner(*n) != attacker)
        .collect();

    let pool: Vec<TerritoryId> = if frontier.is_empty() {
        world
            .graph
            .territories()
            .iter()
            .filter(|t| t.owner != attacker)
            .map(|t| t.id)
            .collect()
    } else {
        frontier.into_iter().collect()
    };
    pool.choose(rng).copied()
}

/// Draws the victor from a pool holding `attacker_strength` attacker entries
/// and `defender_strength` defender entries.
pub fn draw_victor<R: Rng + ?Sized>(
    attacker_strength: u32,
    defender_strength: u32,
    rng: &mut R,
) -> Side {
    let pool = attacker_strength + defender_strength;
    if pool == 0 {
        return if rng.gen_bool(0.5) {
            Side::Attacker
        } else {
            Side::Defender
        };
    }
    if rng.gen_range(0..pool) < attacker_strength {
        Side::Attacker
    } else {
        Side::Defender
    }
}

/// Applies the result of a war over `target` once the victor is known.
pub fn apply_war(
    world: &mut World,
    attacker: NationId,
    target: TerritoryId,
    side: Side,
    mode: LossMode,
) -> WarOutcome {
    let defender = world.owner(target);
    debug_assert_ne!(attacker, defender, "a nation cannot fight itself");
    let (victor, loser) = match side {
        Side::Attacker => (attacker, defender),
        Side::Defender => (defender, attacker),
    };

    let message = format!(
        "{} declared war against {}, {} won the battle.",
        world.name(attacker),
        world.name(defender),
        world.stem(victor)
    );

    let eliminate = match mode {
        LossMode::Total => {
            let spoils = world.nation(loser).map_or(0, |n| n.strength);
            world.add_strength(victor, spoils);
            true
        }
        LossMode::Partial => {
            world.add_strength(victor, 1);
            world.add_strength(loser, -1);
            world.graph.transfer(target, victor);
            world.graph.count_owned(loser) == 0
                || world.nation(loser).is_some_and(|n| n.strength <= 0)
        }
    };

    let eliminated = if eliminate {
        world.eliminate(loser, victor).map(|n| n.name)
    } else {
        None
    };

    WarOutcome {
        attacker,
        defender,
        target,
        victor,
        loser,
        eliminated,
        message,
    }
}

/// Runs a full war for `attacker`. Returns None if there is nobody to fight.
pub fn resolve_war<R: Rng + ?Sized>(
    world: &mut World,
    attacker: NationId,
    mode: LossMode,
    rng: &mut R,
) -> Option<WarOutcome> {
    let target = find_target(world, attacker, rng)?;
    let defender = world.owner(target);
    if defender == attacker || !world.is_active(defender) {
        return None;
    }
    let side = draw_victor(world.war_strength(attacker), world.war_strength(defender), rng);
    Some(apply_war(world, attacker, target, side, mode))
}
