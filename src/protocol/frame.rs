//! Presentation frames.
//!
//! A `Frame` is a read-only snapshot of what the map looks like after a
//! turn: who owns each territory and where ideology badges are drawn. The
//! engine hands one to a `Presenter` after setup and after every turn.

use std::io::Write;

use serde::Serialize;
use tracing::warn;

use crate::board::{TerritoryId, World};

/// One territory as the presentation layer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerritoryFrame {
    pub id: TerritoryId,
    pub owner: String,
    /// Flag of the owner, used to fill the territory image.
    pub flag: String,
    pub image: String,
    pub coords: (i32, i32),
}

/// An ideology badge and the territory it is centred on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeFrame {
    pub nation: String,
    pub badge: &'static str,
    pub anchor: TerritoryId,
}

/// Snapshot of the map after a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub turn: u64,
    pub territories: Vec<TerritoryFrame>,
    pub badges: Vec<BadgeFrame>,
}

impl Frame {
    /// Captures the current state of `world`.
    pub fn capture(world: &World, turn: u64) -> Frame {
        let territories = world
            .graph
            .territories()
            .iter()
            .map(|t| {
                let owner = world.nation(t.owner);
                TerritoryFrame {
                    id: t.id,
                    owner: owner.map(|n| n.name.clone()).unwrap_or_default(),
                    flag: owner.map(|n| n.flag.clone()).unwrap_or_default(),
                    image: t.image.clone(),
                    coords: t.coords,
                }
            })
            .collect();

        let badges = world
            .nations()
            .iter()
            .filter_map(|n| {
                Some(BadgeFrame {
                    nation: n.name.clone(),
                    badge: n.badge()?,
                    anchor: world.badge_anchor(n.id)?,
                })
            })
            .collect();

        Frame {
            turn,
            territories,
            badges,
        }
    }
}

/// Receives a frame after setup and after every turn.
pub trait Presenter {
    fn render(&mut self, frame: &Frame);
}

impl<F: FnMut(&Frame)> Presenter for F {
    fn render(&mut self, frame: &Frame) {
        self(frame)
    }
}

/// Writes every frame as one JSON object per line.
pub struct JsonlPresenter<W: Write> {
    out: W,
}

impl<W: Write> JsonlPresenter<W> {
    pub fn new(out: W) -> Self {
        JsonlPresenter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonlPresenter<W> {
    fn render(&mut self, frame: &Frame) {
        let result = serde_json::to_writer(&mut self.out, frame)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(self.out))
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            warn!("failed to write frame {}: {}", frame.turn, e);
        }
    }
}
