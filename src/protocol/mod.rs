//! External interfaces of the engine.
//!
//! - `scenario`: the JSON initial-state feed and its validation.
//! - `frame`: snapshots handed to the presentation layer each turn.

pub mod frame;
pub mod scenario;

pub use frame::{BadgeFrame, Frame, JsonlPresenter, Presenter, TerritoryFrame};
pub use scenario::{NationRecord, Scenario, ScenarioError, DEFAULT_SCENARIO};
