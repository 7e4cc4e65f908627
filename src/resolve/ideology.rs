//! Ideology resolution.
//!
//! Adopting a new ideology renames the nation, grants one strength point,
//! and breaks every alliance with a nation whose ideology is set and
//! different.

use rand::Rng;

use crate::board::{Ideology, NationId, World, ALL_IDEOLOGIES};

/// The result of an ideology change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeologyOutcome {
    pub nation: NationId,
    pub ideology: Ideology,
    /// Allies lost because their ideology no longer matches.
    pub dissolved: Vec<NationId>,
    pub message: String,
}

/// Switches `nation` to `ideology`. Returns None if it already holds it.
pub fn change_ideology(
    world: &mut World,
    nation: NationId,
    ideology: Ideology,
) -> Option<IdeologyOutcome> {
    let acting = world.nation_mut(nation)?;
    if acting.ideology == Some(ideology) {
        return None;
    }
    acting.name = ideology.title(&acting.stem);
    acting.ideology = Some(ideology);
    acting.strength += 1;
    let mut message = ideology.announcement(&acting.stem);
    let allies: Vec<NationId> = acting.allies.iter().copied().collect();

    let mut dissolved = Vec::new();
    let mut lost_names = Vec::new();
    for ally in allies {
        let Some(other) = world.nation(ally) else {
            continue;
        };
        if other.ideology.is_some_and(|i| i != ideology) {
            lost_names.push(other.name.clone());
            dissolved.push(ally);
        }
    }
    for &ally in &dissolved {
        world.dissolve_alliance(nation, ally);
    }

    if !lost_names.is_empty() {
        message.push_str(&format!(" They have lost favor with {}!", lost_names.join(", ")));
    }

    Some(IdeologyOutcome {
        nation,
        ideology,
        dissolved,
        message,
    })
}

/// Draws a random ideology for `nation` and adopts it if it is new.
pub fn resolve_ideology<R: Rng + ?Sized>(
    world: &mut World,
    nation: NationId,
    rng: &mut R,
) -> Option<IdeologyOutcome> {
    let ideology = ALL_IDEOLOGIES[rng.gen_range(0..ALL_IDEOLOGIES.len())];
    change_ideology(world, nation, ideology)
}
