//! Compass directions used for territory adjacency.
//!
//! Every territory has eight neighbor slots, one per cardinal and ordinal
//! direction. Variants are ordered counter-clockwise starting at north-east so
//! that the opposite of slot `i` is always slot `(i + 4) % 8`.

use serde::{Deserialize, Serialize};

/// The number of neighbor slots on a territory.
pub const DIRECTION_COUNT: usize = 8;

/// A compass direction naming one of a territory's neighbor slots.
///
/// The `#[repr(u8)]` attribute enables use as an array index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    #[serde(rename = "ne")]
    NorthEast = 0,
    #[serde(rename = "n")]
    North = 1,
    #[serde(rename = "nw")]
    NorthWest = 2,
    #[serde(rename = "w")]
    West = 3,
    #[serde(rename = "sw")]
    SouthWest = 4,
    #[serde(rename = "s")]
    South = 5,
    #[serde(rename = "se")]
    SouthEast = 6,
    #[serde(rename = "e")]
    East = 7,
}

/// All directions in slot order.
pub const ALL_DIRECTIONS: [Direction; DIRECTION_COUNT] = [
    Direction::NorthEast,
    Direction::North,
    Direction::NorthWest,
    Direction::West,
    Direction::SouthWest,
    Direction::South,
    Direction::SouthEast,
    Direction::East,
];

impl Direction {
    /// Returns the slot index for this direction.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the direction pointing the other way.
    pub const fn opposite(self) -> Direction {
        ALL_DIRECTIONS[(self as usize + DIRECTION_COUNT / 2) % DIRECTION_COUNT]
    }
}
