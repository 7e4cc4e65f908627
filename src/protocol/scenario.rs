//! Scenario loading.
//!
//! A scenario is a JSON document listing the starting nations in order. Each
//! record names the nation, its starting strength (1-3), where its home
//! territory sits on the map, and the names of the nations bordering it in
//! up to eight directions:
//!
//! ```json
//! {
//!   "config": { "total_losses": false },
//!   "nations": [
//!     { "name": "France", "strength": 3, "coords": [60, 270],
//!       "neighbors": { "n": "Ireland", "e": "Belgium" } }
//!   ]
//! }
//! ```
//!
//! Records may name neighbors that appear later in the list. Such forward
//! references are linked once the named nation's territory exists, unless
//! its own record already filled the slot.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::{asset_stem, Direction, Nation, NationId, TerritoryId, World, DIRECTION_COUNT};
use crate::engine::SimConfig;

/// The built-in 16-nation European map.
pub const DEFAULT_SCENARIO: &str = include_str!("../../scenarios/europe.json");

/// Lowest starting strength a nation may have.
pub const MIN_STRENGTH: i32 = 1;
/// Highest starting strength a nation may have.
pub const MAX_STRENGTH: i32 = 3;

/// Errors that abort setup before any turn runs.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scenario lists no nations")]
    Empty,

    #[error("scenario lists {0} nations, more than can be addressed")]
    TooManyNations(usize),

    #[error("duplicate nation name: '{0}'")]
    DuplicateNation(String),

    #[error("nation '{nation}' has strength {strength}, expected 1-3")]
    InvalidStrength { nation: String, strength: i32 },

    #[error("nation '{0}' lists itself as a neighbor")]
    SelfNeighbor(String),

    #[error("nation '{nation}' lists unknown neighbor '{neighbor}'")]
    UnknownNeighbor { nation: String, neighbor: String },
}

/// One starting nation as it appears in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NationRecord {
    pub name: String,
    pub strength: i32,
    pub coords: (i32, i32),
    /// Territory image; defaults to `nation_images/<name>.png`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub neighbors: BTreeMap<Direction, String>,
}

impl NationRecord {
    /// Returns the territory image, derived from the name if not given.
    pub fn image(&self) -> String {
        self.image
            .clone()
            .unwrap_or_else(|| format!("nation_images/{}.png", asset_stem(&self.name)))
    }
}

/// A parsed, not yet validated, scenario document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: Option<SimConfig>,
    pub nations: Vec<NationRecord>,
}

impl Scenario {
    /// Parses a scenario from JSON text.
    pub fn parse(json: &str) -> Result<Scenario, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a scenario file.
    pub fn load(path: impl AsRef<Path>) -> Result<Scenario, ScenarioError> {
        let text = fs::read_to_string(path)?;
        Scenario::parse(&text)
    }

    /// Returns the built-in map.
    pub fn builtin() -> Result<Scenario, ScenarioError> {
        Scenario::parse(DEFAULT_SCENARIO)
    }

    /// Checks the records for problems that would make the map unusable.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.nations.is_empty() {
            return Err(ScenarioError::Empty);
        }
        if self.nations.len() > u16::MAX as usize {
            return Err(ScenarioError::TooManyNations(self.nations.len()));
        }

        let mut names = HashSet::new();
        for rec in &self.nations {
            if !names.insert(rec.name.as_str()) {
                return Err(ScenarioError::DuplicateNation(rec.name.clone()));
            }
            if !(MIN_STRENGTH..=MAX_STRENGTH).contains(&rec.strength) {
                return Err(ScenarioError::InvalidStrength {
                    nation: rec.name.clone(),
                    strength: rec.strength,
                });
            }
        }

        for rec in &self.nations {
            for neighbor in rec.neighbors.values() {
                if *neighbor == rec.name {
                    return Err(ScenarioError::SelfNeighbor(rec.name.clone()));
                }
                if !names.contains(neighbor.as_str()) {
                    return Err(ScenarioError::UnknownNeighbor {
                        nation: rec.name.clone(),
                        neighbor: neighbor.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Validates the records and builds the starting world, one home
    /// territory per nation, in record order.
    pub fn build_world(&self) -> Result<World, ScenarioError> {
        self.validate()?;

        let mut world = World::new();
        let mut homes: HashMap<&str, TerritoryId> = HashMap::new();
        let mut pending: Vec<(TerritoryId, Direction, &str)> = Vec::new();

        for (i, rec) in self.nations.iter().enumerate() {
            let id = NationId(i as u16);
            let mut slots = [None; DIRECTION_COUNT];
            let mut forward = Vec::new();
            for (&dir, neighbor) in &rec.neighbors {
                match homes.get(neighbor.as_str()) {
                    Some(&t) => slots[dir.index()] = Some(t),
                    None => forward.push((dir, neighbor.as_str())),
                }
            }

            let home = world.graph.construct(id, rec.image(), rec.coords, slots);
            homes.insert(rec.name.as_str(), home);

            // Earlier records that named this nation before it existed.
            pending.retain(|&(from, dir, target)| {
                if target != rec.name {
                    return true;
                }
                let from_territory = world.graph.get(from);
                let adjacent = from_territory.adjacent().any(|(_, t)| t == home);
                let from_free = from_territory.neighbor(dir).is_none();
                let home_free = world.graph.get(home).neighbor(dir.opposite()).is_none();
                if !adjacent && from_free && home_free {
                    world.graph.link(from, dir, home);
                }
                false
            });
            pending.extend(forward.into_iter().map(|(dir, name)| (home, dir, name)));

            world.add_nation(Nation::new(id, rec.name.clone(), rec.strength, home));
        }

        debug_assert!(world.graph.is_symmetric());
        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, strength: i32, neighbors: &[(Direction, &str)]) -> NationRecord {
        NationRecord {
            name: name.to_string(),
            strength,
            coords: (0, 0),
            image: None,
            neighbors: neighbors
                .iter()
                .map(|(d, n)| (*d, n.to_string()))
                .collect(),
        }
    }

    fn scenario(nations: Vec<NationRecord>) -> Scenario {
        Scenario {
            config: None,
            nations,
        }
    }

    #[test]
    fn builtin_map_is_valid_and_symmetric() {
        let s = Scenario::builtin().unwrap();
        let world = s.build_world().unwrap();
        assert_eq!(world.nation_count(), 16);
        assert_eq!(world.graph.len(), 16);
        assert!(world.graph.is_symmetric());
        // Interior grid cells have all eight neighbors.
        let germany = world.nations().iter().find(|n| n.name == "Germany").unwrap();
        assert_eq!(world.graph.get(germany.home).adjacent().count(), 8);
    }

    #[test]
    fn parse_minimal_json() {
        let json = r#"{
            "nations": [
                { "name": "Left", "strength": 2, "coords": [0, 0], "neighbors": { "e": "Right" } },
                { "name": "Right", "strength": 1, "coords": [100, 0], "image": "right.png" }
            ]
        }"#;
        let s = Scenario::parse(json).unwrap();
        assert!(s.config.is_none());
        assert_eq!(s.nations[0].neighbors.get(&Direction::East).unwrap(), "Right");
        assert_eq!(s.nations[0].image(), "nation_images/left.png");
        assert_eq!(s.nations[1].image(), "right.png");
    }

    #[test]
    fn forward_reference_is_linked_later() {
        let s = scenario(vec![
            record("Left", 1, &[(Direction::East, "Right")]),
            record("Right", 1, &[]),
        ]);
        let world = s.build_world().unwrap();
        let left = world.nations()[0].home;
        let right = world.nations()[1].home;
        assert_eq!(world.graph.get(left).neighbor(Direction::East), Some(right));
        assert_eq!(world.graph.get(right).neighbor(Direction::West), Some(left));
    }

    #[test]
    fn later_declaration_wins_over_forward_reference() {
        // Top says Bottom is south of it; Bottom says Top is its north-west.
        let s = scenario(vec![
            record("Top", 1, &[(Direction::South, "Bottom")]),
            record("Bottom", 1, &[(Direction::NorthWest, "Top")]),
        ]);
        let world = s.build_world().unwrap();
        let top = world.nations()[0].home;
        let bottom = world.nations()[1].home;
        assert_eq!(world.graph.get(top).neighbor(Direction::SouthEast), Some(bottom));
        assert_eq!(world.graph.get(top).neighbor(Direction::South), None);
        assert!(world.graph.is_symmetric());
    }

    #[test]
    fn rejects_empty_roster() {
        assert!(matches!(
            scenario(vec![]).build_world(),
            Err(ScenarioError::Empty)
        ));
    }

    #[test]
    fn rejects_duplicate_names() {
        let s = scenario(vec![record("A", 1, &[]), record("A", 2, &[])]);
        assert!(matches!(
            s.build_world(),
            Err(ScenarioError::DuplicateNation(name)) if name == "A"
        ));
    }

    #[test]
    fn rejects_unknown_neighbor() {
        let s = scenario(vec![record("A", 1, &[(Direction::North, "Atlantis")])]);
        let err = s.build_world().unwrap_err();
        assert_eq!(err.to_string(), "nation 'A' lists unknown neighbor 'Atlantis'");
    }

    #[test]
    fn rejects_self_neighbor() {
        let s = scenario(vec![record("A", 1, &[(Direction::North, "A")])]);
        assert!(matches!(s.build_world(), Err(ScenarioError::SelfNeighbor(_))));
    }

    #[test]
    fn rejects_out_of_range_strength() {
        let s = scenario(vec![record("A", 4, &[])]);
        assert!(matches!(
            s.build_world(),
            Err(ScenarioError::InvalidStrength { strength: 4, .. })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Scenario::parse("{ \"nations\": 3 }"),
            Err(ScenarioError::Json(_))
        ));
    }

    #[test]
    fn rejects_roster_beyond_id_range() {
        let s = scenario(vec![record("A", 1, &[]); u16::MAX as usize + 1]);
        assert!(matches!(
            s.build_world(),
            Err(ScenarioError::TooManyNations(65536))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("conquest-no-such-scenario.json");
        let err = Scenario::load(&path).unwrap_err();
        assert!(matches!(err, ScenarioError::Io(_)));
        assert!(err.to_string().starts_with("failed to read scenario: "));
    }

    #[test]
    fn nations_start_on_their_own_territory() {
        let world = Scenario::builtin().unwrap().build_world().unwrap();
        for n in world.nations() {
            assert_eq!(world.owner(n.home), n.id);
            assert_eq!(world.graph.count_owned(n.id), 1);
            assert!(n.ideology.is_none());
        }
    }
}
