//! Nations and ideologies.
//!
//! A nation carries its combat strength, an optional ideology, the set of
//! nations it is allied with, and the territory it started the game on.
//! Ideology text and badge assets are fixed tables keyed by `Ideology`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::territory::TerritoryId;

/// Stable handle to a nation. Survives the removal of other nations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NationId(pub u16);

/// The number of ideologies a nation can adopt.
pub const IDEOLOGY_COUNT: usize = 4;

/// A political alignment. Nations with differing ideologies cannot ally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ideology {
    Democratic,
    Communist,
    Monarchist,
    Fascist,
}

/// All ideologies in selection order.
pub const ALL_IDEOLOGIES: [Ideology; IDEOLOGY_COUNT] = [
    Ideology::Democratic,
    Ideology::Communist,
    Ideology::Monarchist,
    Ideology::Fascist,
];

impl Ideology {
    /// Returns the formal name a nation takes on adopting this ideology.
    pub fn title(self, stem: &str) -> String {
        match self {
            Ideology::Democratic => format!("The Republic of {stem}"),
            Ideology::Communist => format!("The Workers' Union of {stem}"),
            Ideology::Monarchist => format!("The Kingdom of {stem}"),
            Ideology::Fascist => format!("The Fascist State of {stem}"),
        }
    }

    /// Returns the announcement made when a nation adopts this ideology.
    pub fn announcement(self, stem: &str) -> String {
        match self {
            Ideology::Democratic => format!(
                "The people of {stem} have gained political freedom, as {stem} becomes a Democracy!"
            ),
            Ideology::Communist => format!(
                "The workers of {stem} have broken their chains, as {stem} becomes Communist!"
            ),
            Ideology::Monarchist => format!(
                "{stem} has returned to Feudalism, as {stem} becomes Monarchist!"
            ),
            Ideology::Fascist => format!(
                "A dictator has risen to power in {stem}, as {stem} becomes Fascist!"
            ),
        }
    }

    /// Returns the badge asset drawn over territories of nations with this ideology.
    pub const fn badge(self) -> &'static str {
        match self {
            Ideology::Democratic => "logos/democracy.png",
            Ideology::Communist => "logos/communism.png",
            Ideology::Monarchist => "logos/monarchy.png",
            Ideology::Fascist => "logos/fascism.png",
        }
    }
}

/// Returns true if two (possibly unset) ideologies allow an alliance.
///
/// Only two set, differing ideologies are incompatible.
pub fn compatible(a: Option<Ideology>, b: Option<Ideology>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => x == y,
        _ => true,
    }
}

/// Lowercases a name and replaces spaces with underscores, for asset paths.
pub fn asset_stem(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// A player entity on the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nation {
    pub id: NationId,
    /// Display name; replaced by the ideology title on an ideology change.
    pub name: String,
    /// Short name used in announcements. Never changes.
    pub stem: String,
    /// Flag asset used to fill this nation's territories.
    pub flag: String,
    pub strength: i32,
    pub ideology: Option<Ideology>,
    pub allies: BTreeSet<NationId>,
    pub home: TerritoryId,
}

impl Nation {
    /// Creates a nation with no ideology and no allies.
    pub fn new(id: NationId, name: impl Into<String>, strength: i32, home: TerritoryId) -> Self {
        let name = name.into();
        Nation {
            id,
            flag: format!("flags/{}.png", asset_stem(&name)),
            stem: name.clone(),
            name,
            strength,
            ideology: None,
            allies: BTreeSet::new(),
            home,
        }
    }

    /// Returns the badge asset for this nation's ideology, if it has one.
    pub fn badge(&self) -> Option<&'static str> {
        self.ideology.map(Ideology::badge)
    }

    pub fn is_allied_with(&self, other: NationId) -> bool {
        self.allies.contains(&other)
    }
}
