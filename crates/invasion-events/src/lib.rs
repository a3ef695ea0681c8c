//! Shared event and snapshot types for the alien invasion simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! Everything here is keyed by plain strings so it can be written to disk
//! and read back without the engine.

pub mod event;
pub mod snapshot;

pub use event::{generate_event_id, InvasionEvent, Outcome};
pub use snapshot::{AgentSnapshot, LocationSnapshot, MapSnapshot};
