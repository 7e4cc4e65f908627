//! Alliance resolution.
//!
//! Alliances are not limited by geography: any active nation the proposer is
//! not already allied with may be approached. Two nations with set, differing
//! ideologies never agree.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{compatible, NationId, World};

/// The result of an alliance proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllianceOutcome {
    pub proposer: NationId,
    pub partner: NationId,
    pub formed: bool,
    pub message: String,
}

/// Returns the nations `proposer` could approach, in registry order.
pub fn candidates(world: &World, proposer: NationId) -> Vec<NationId> {
    let Some(nation) = world.nation(proposer) else {
        return Vec::new();
    };
    world
        .nations()
        .iter()
        .filter(|n| n.id != proposer && !nation.is_allied_with(n.id))
        .map(|n| n.id)
        .collect()
}

/// Proposes an alliance between two specific nations.
pub fn propose_alliance(
    world: &mut World,
    proposer: NationId,
    partner: NationId,
) -> AllianceOutcome {
    let a = world.nation(proposer).and_then(|n| n.ideology);
    let b = world.nation(partner).and_then(|n| n.ideology);

    if !compatible(a, b) {
        let message = format!(
            "{} tried to form an alliance with {}, but negotiations failed.",
            world.name(proposer),
            world.name(partner)
        );
        return AllianceOutcome {
            proposer,
            partner,
            formed: false,
            message,
        };
    }

    world.form_alliance(proposer, partner);
    AllianceOutcome {
        proposer,
        partner,
        formed: true,
        message: format!(
            "{} and {} have formed an alliance.",
            world.name(proposer),
            world.name(partner)
        ),
    }
}

/// Picks a random candidate and proposes to it. Returns None if the proposer
/// is already allied with every other nation.
pub fn resolve_alliance<R: Rng + ?Sized>(
    world: &mut World,
    proposer: NationId,
    rng: &mut R,
) -> Option<AllianceOutcome> {
    let partner = *candidates(world, proposer).choose(rng)?;
    Some(propose_alliance(world, proposer, partner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Ideology, Nation, TerritoryId, DIRECTION_COUNT};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn world_of(n: usize) -> World {
        let mut world = World::new();
        for i in 0..n {
            let id = NationId(i as u16);
            let home: TerritoryId = world.graph.construct(id, "", (0, 0), [None; DIRECTION_COUNT]);
            world.add_nation(Nation::new(id, format!("Nation{i}"), 1, home));
        }
        world
    }

    #[test]
    fn candidates_exclude_self_and_allies() {
        let mut world = world_of(4);
        world.form_alliance(NationId(0), NationId(2));
        assert_eq!(
            candidates(&world, NationId(0)),
            vec![NationId(1), NationId(3)]
        );
    }

    #[test]
    fn alliance_forms_symmetrically() {
        let mut world = world_of(2);
        let out = propose_alliance(&mut world, NationId(0), NationId(1));
        assert!(out.formed);
        assert_eq!(out.message, "Nation0 and Nation1 have formed an alliance.");
        assert!(world.nation(NationId(1)).unwrap().is_allied_with(NationId(0)));
        assert!(world.alliances_symmetric());
    }

    #[test]
    fn differing_ideologies_fail_without_change() {
        let mut world = world_of(2);
        world.nation_mut(NationId(0)).unwrap().ideology = Some(Ideology::Democratic);
        world.nation_mut(NationId(1)).unwrap().ideology = Some(Ideology::Fascist);
        let before = world.clone();

        let out = propose_alliance(&mut world, NationId(0), NationId(1));
        assert!(!out.formed);
        assert_eq!(
            out.message,
            "Nation0 tried to form an alliance with Nation1, but negotiations failed."
        );
        assert_eq!(world, before);
    }

    #[test]
    fn unset_ideology_never_blocks() {
        let mut world = world_of(2);
        world.nation_mut(NationId(1)).unwrap().ideology = Some(Ideology::Monarchist);
        assert!(propose_alliance(&mut world, NationId(0), NationId(1)).formed);
    }

    #[test]
    fn full_alliance_is_a_no_op() {
        let mut world = world_of(3);
        world.form_alliance(NationId(0), NationId(1));
        world.form_alliance(NationId(0), NationId(2));
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(resolve_alliance(&mut world, NationId(0), &mut rng).is_none());
    }

    #[test]
    fn random_proposals_keep_symmetry() {
        let mut world = world_of(6);
        let mut rng = SmallRng::seed_from_u64(17);
        for i in 0..30 {
            let proposer = NationId((i % 6) as u16);
            if let Some(out) = resolve_alliance(&mut world, proposer, &mut rng) {
                assert_ne!(out.partner, proposer);
            }
            assert!(world.alliances_symmetric());
        }
    }
}
