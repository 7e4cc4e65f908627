//! Conquest simulator library.
//!
//! Exposes the territory graph, the action resolvers, the turn scheduler,
//! and the scenario/frame interfaces for use by integration tests and the
//! binary entry points.

pub mod batch;
pub mod board;
pub mod engine;
pub mod protocol;
pub mod resolve;
pub mod schedule;
