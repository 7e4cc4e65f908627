//! World state: the territory graph plus the registry of active nations.
//!
//! All resolvers mutate the world through the methods here, which keep the
//! alliance relation symmetric and strip an eliminated nation from every
//! remaining ally before it leaves the registry.

use super::nation::{Nation, NationId};
use super::territory::{TerritoryGraph, TerritoryId};

/// Complete game state at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct World {
    pub graph: TerritoryGraph,
    nations: Vec<Nation>,
}

impl World {
    /// Creates an empty world.
    pub fn new() -> Self {
        World::default()
    }

    /// Adds a nation to the registry.
    pub fn add_nation(&mut self, nation: Nation) {
        self.nations.push(nation);
    }

    /// Returns the active nations in registration order.
    pub fn nations(&self) -> &[Nation] {
        &self.nations
    }

    /// Returns the number of active nations.
    pub fn nation_count(&self) -> usize {
        self.nations.len()
    }

    pub fn nation(&self, id: NationId) -> Option<&Nation> {
        self.nations.iter().find(|n| n.id == id)
    }

    pub fn nation_mut(&mut self, id: NationId) -> Option<&mut Nation> {
        self.nations.iter_mut().find(|n| n.id == id)
    }

    /// Returns true if the nation is still in the registry.
    pub fn is_active(&self, id: NationId) -> bool {
        self.nation(id).is_some()
    }

    /// Returns the nation's display name, or an empty string if it is gone.
    pub fn name(&self, id: NationId) -> &str {
        self.nation(id).map_or("", |n| n.name.as_str())
    }

    /// Returns the nation's short name, or an empty string if it is gone.
    pub fn stem(&self, id: NationId) -> &str {
        self.nation(id).map_or("", |n| n.stem.as_str())
    }

    /// Returns the owner of a territory.
    pub fn owner(&self, territory: TerritoryId) -> NationId {
        self.graph.get(territory).owner
    }

    /// Returns the nation's strength plus the strength of all its allies.
    pub fn war_strength(&self, id: NationId) -> u32 {
        let Some(nation) = self.nation(id) else {
            return 0;
        };
        let allied: i32 = nation
            .allies
            .iter()
            .filter_map(|a| self.nation(*a))
            .map(|a| a.strength)
            .sum();
        (nation.strength + allied).max(0) as u32
    }

    /// Adjusts a nation's strength by `delta`.
    pub fn add_strength(&mut self, id: NationId, delta: i32) {
        if let Some(n) = self.nation_mut(id) {
            n.strength += delta;
        }
    }

    /// Records an alliance in both directions.
    pub fn form_alliance(&mut self, a: NationId, b: NationId) {
        if a == b || !self.is_active(a) || !self.is_active(b) {
            return;
        }
        if let Some(n) = self.nation_mut(a) {
            n.allies.insert(b);
        }
        if let Some(n) = self.nation_mut(b) {
            n.allies.insert(a);
        }
    }

    /// Removes an alliance in both directions.
    pub fn dissolve_alliance(&mut self, a: NationId, b: NationId) {
        if let Some(n) = self.nation_mut(a) {
            n.allies.remove(&b);
        }
        if let Some(n) = self.nation_mut(b) {
            n.allies.remove(&a);
        }
    }

    /// Removes `loser` from the game: every territory it still holds goes to
    /// `victor`, every remaining nation forgets the alliance, and the nation
    /// leaves the registry. Returns the removed nation.
    pub fn eliminate(&mut self, loser: NationId, victor: NationId) -> Option<Nation> {
        let pos = self.nations.iter().position(|n| n.id == loser)?;
        self.graph.transfer_all(loser, victor);
        for n in self.nations.iter_mut() {
            n.allies.remove(&loser);
        }
        Some(self.nations.remove(pos))
    }

    /// Returns the territory a nation's badge is drawn on: its home if it still
    /// holds it, otherwise the first territory it owns.
    pub fn badge_anchor(&self, id: NationId) -> Option<TerritoryId> {
        let nation = self.nation(id)?;
        if self.owner(nation.home) == id {
            return Some(nation.home);
        }
        self.graph.owned_by(id).next().map(|t| t.id)
    }

    /// Returns the last nation standing, if exactly one remains.
    pub fn winner(&self) -> Option<&Nation> {
        match self.nations.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Returns true if every alliance is recorded on both sides and points at
    /// an active nation.
    pub fn alliances_symmetric(&self) -> bool {
        self.nations.iter().all(|n| {
            n.allies.iter().all(|a| {
                *a != n.id && self.nation(*a).is_some_and(|other| other.allies.contains(&n.id))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::direction::{Direction, DIRECTION_COUNT};

    /// Three nations in a row: A - B - C.
    fn row_of_three() -> (World, [NationId; 3]) {
        let mut world = World::new();
        let ids = [NationId(0), NationId(1), NationId(2)];
        let mut prev: Option<TerritoryId> = None;
        for (i, &id) in ids.iter().enumerate() {
            let mut slots = [None; DIRECTION_COUNT];
            slots[Direction::West.index()] = prev;
            let home = world.graph.construct(id, "", (i as i32, 0), slots);
            world.add_nation(Nation::new(id, format!("N{i}"), 1 + i as i32, home));
            prev = Some(home);
        }
        (world, ids)
    }

    #[test]
    fn war_strength_includes_allies() {
        let (mut world, [a, b, c]) = row_of_three();
        assert_eq!(world.war_strength(a), 1);
        world.form_alliance(a, c);
        assert_eq!(world.war_strength(a), 4);
        assert_eq!(world.war_strength(c), 4);
        assert_eq!(world.war_strength(b), 2);
    }

    #[test]
    fn alliances_are_symmetric() {
        let (mut world, [a, b, c]) = row_of_three();
        world.form_alliance(a, b);
        world.form_alliance(b, c);
        assert!(world.alliances_symmetric());
        assert!(world.nation(b).unwrap().is_allied_with(a));

        world.dissolve_alliance(b, a);
        assert!(!world.nation(a).unwrap().is_allied_with(b));
        assert!(world.alliances_symmetric());
    }

    #[test]
    fn self_alliance_is_rejected() {
        let (mut world, [a, _, _]) = row_of_three();
        world.form_alliance(a, a);
        assert!(world.nation(a).unwrap().allies.is_empty());
    }

    #[test]
    fn eliminate_transfers_land_and_cleans_alliances() {
        let (mut world, [a, b, c]) = row_of_three();
        world.form_alliance(a, b);
        world.form_alliance(b, c);

        let removed = world.eliminate(b, c).unwrap();
        assert_eq!(removed.id, b);
        assert_eq!(world.nation_count(), 2);
        assert_eq!(world.graph.count_owned(b), 0);
        assert_eq!(world.graph.count_owned(c), 2);
        assert!(world.nation(a).unwrap().allies.is_empty());
        assert!(world.nation(c).unwrap().allies.is_empty());
        assert!(world.alliances_symmetric());
        assert!(world.eliminate(b, c).is_none());
    }

    #[test]
    fn badge_anchor_moves_off_lost_home() {
        let (mut world, [a, b, _]) = row_of_three();
        let home_a = world.nation(a).unwrap().home;
        let home_b = world.nation(b).unwrap().home;
        assert_eq!(world.badge_anchor(a), Some(home_a));

        world.graph.transfer(home_b, a);
        world.graph.transfer(home_a, b);
        assert_eq!(world.badge_anchor(a), Some(home_b));
    }

    #[test]
    fn winner_only_when_one_left() {
        let (mut world, [a, b, c]) = row_of_three();
        assert!(world.winner().is_none());
        world.eliminate(a, b);
        world.eliminate(c, b);
        assert_eq!(world.winner().map(|n| n.id), Some(b));
    }
}
