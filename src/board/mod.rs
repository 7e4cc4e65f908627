//! Board representation and game-state types.
//!
//! Contains the territory adjacency graph, nations and ideologies, and the
//! world state that ties them together.

pub mod direction;
pub mod nation;
pub mod territory;
pub mod world;

pub use direction::{Direction, ALL_DIRECTIONS, DIRECTION_COUNT};
pub use nation::{
    asset_stem, compatible, Ideology, Nation, NationId, ALL_IDEOLOGIES, IDEOLOGY_COUNT,
};
pub use territory::{Territory, TerritoryGraph, TerritoryId};
pub use world::World;
