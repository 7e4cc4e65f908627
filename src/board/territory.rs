//! Territory arena and the eight-directional adjacency graph.
//!
//! Territories live in a flat arena and refer to each other by
//! `TerritoryId`. Adjacency is kept symmetric at all times: if A's neighbor
//! in direction D is B, then B's neighbor in `D.opposite()` is A. Territories
//! are never removed; only their owner changes over a game.

use serde::{Deserialize, Serialize};

use super::direction::{Direction, ALL_DIRECTIONS, DIRECTION_COUNT};
use super::nation::NationId;

/// Stable handle to a territory in a `TerritoryGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TerritoryId(pub u16);

impl TerritoryId {
    /// Returns the arena index for this territory.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A unit of map area with fixed neighbors and a mutable owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Territory {
    pub id: TerritoryId,
    pub owner: NationId,
    /// Image asset drawn for this territory by the presentation layer.
    pub image: String,
    /// Top-left position of the image on the map.
    pub coords: (i32, i32),
    neighbors: [Option<TerritoryId>; DIRECTION_COUNT],
}

impl Territory {
    /// Returns the neighbor in the given direction, if any.
    pub const fn neighbor(&self, dir: Direction) -> Option<TerritoryId> {
        self.neighbors[dir.index()]
    }

    /// Returns all eight neighbor slots in direction order.
    pub const fn neighbors(&self) -> [Option<TerritoryId>; DIRECTION_COUNT] {
        self.neighbors
    }

    /// Iterates over the present neighbors together with their direction.
    pub fn adjacent(&self) -> impl Iterator<Item = (Direction, TerritoryId)> + '_ {
        ALL_DIRECTIONS
            .iter()
            .filter_map(move |&d| self.neighbors[d.index()].map(|t| (d, t)))
    }
}

/// Arena of all territories on the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerritoryGraph {
    territories: Vec<Territory>,
}

impl TerritoryGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        TerritoryGraph {
            territories: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.territories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    /// Returns the territory for a handle issued by this graph.
    ///
    /// Panics if the handle came from a different graph.
    pub fn get(&self, id: TerritoryId) -> &Territory {
        &self.territories[id.index()]
    }

    /// Returns all territories in construction order.
    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    /// Creates a territory and back-fills the opposite slot of every given neighbor.
    ///
    /// Neighbor slots are applied in direction order through `link`, so a
    /// neighbor that was previously linked elsewhere in the opposite slot is
    /// detached from its old partner first.
    pub fn construct(
        &mut self,
        owner: NationId,
        image: impl Into<String>,
        coords: (i32, i32),
        neighbors: [Option<TerritoryId>; DIRECTION_COUNT],
    ) -> TerritoryId {
        let id = TerritoryId(self.territories.len() as u16);
        self.territories.push(Territory {
            id,
            owner,
            image: image.into(),
            coords,
            neighbors: [None; DIRECTION_COUNT],
        });
        for dir in ALL_DIRECTIONS {
            if let Some(other) = neighbors[dir.index()] {
                self.link(id, dir, other);
            }
        }
        id
    }

    /// Makes `b` the neighbor of `a` in direction `dir`, and `a` the neighbor of
    /// `b` in the opposite direction.
    ///
    /// Any territory previously occupying either slot loses its back-link, so
    /// the graph stays symmetric. Self-links are ignored.
    pub fn link(&mut self, a: TerritoryId, dir: Direction, b: TerritoryId) {
        if a == b {
            return;
        }
        let back = dir.opposite();
        if let Some(old) = self.territories[a.index()].neighbors[dir.index()] {
            if old != b {
                self.unlink_slot(old, back, a);
            }
        }
        if let Some(old) = self.territories[b.index()].neighbors[back.index()] {
            if old != a {
                self.unlink_slot(old, dir, b);
            }
        }
        self.territories[a.index()].neighbors[dir.index()] = Some(b);
        self.territories[b.index()].neighbors[back.index()] = Some(a);
    }

    /// Clears `t`'s slot in `dir` if it still points at `expected`.
    fn unlink_slot(&mut self, t: TerritoryId, dir: Direction, expected: TerritoryId) {
        let slot = &mut self.territories[t.index()].neighbors[dir.index()];
        if *slot == Some(expected) {
            *slot = None;
        }
    }

    /// Returns true if every neighbor link has a matching back-link.
    pub fn is_symmetric(&self) -> bool {
        self.territories.iter().all(|t| {
            t.adjacent()
                .all(|(d, n)| self.get(n).neighbor(d.opposite()) == Some(t.id))
        })
    }

    /// Reassigns a territory to a new owner.
    pub fn transfer(&mut self, id: TerritoryId, owner: NationId) {
        self.territories[id.index()].owner = owner;
    }

    /// Reassigns every territory owned by `from` to `to`. Returns how many moved.
    pub fn transfer_all(&mut self, from: NationId, to: NationId) -> usize {
        let mut moved = 0;
        for t in self.territories.iter_mut().filter(|t| t.owner == from) {
            t.owner = to;
            moved += 1;
        }
        moved
    }

    /// Iterates over the territories owned by a nation.
    pub fn owned_by(&self, nation: NationId) -> impl Iterator<Item = &Territory> + '_ {
        self.territories.iter().filter(move |t| t.owner == nation)
    }

    /// Counts the territories owned by a nation.
    pub fn count_owned(&self, nation: NationId) -> usize {
        self.owned_by(nation).count()
    }
}
