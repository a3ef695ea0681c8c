//! Alien Invasion Simulation Library
//!
//! Public API for the world map and the invasion engine.

pub mod config;
pub mod error;
pub mod events;
pub mod invasion;
pub mod report;
pub mod runner;
pub mod world;

pub use config::{ConfigError, InvasionConfig};
pub use error::{ErrorKind, InvasionError};
pub use invasion::{Battle, Conclusion, Invasion, DEFAULT_MAX_MOVES};
pub use runner::{run_to_completion, RunSummary};
pub use world::{AgentId, Direction, LocationId, WorldMap};
