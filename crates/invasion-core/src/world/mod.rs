//! World model
//!
//! The map being invaded and the identities of what lives on it.

pub mod agent;
pub mod direction;
pub mod map;

pub use agent::{AgentId, LocationId};
pub use direction::{Direction, ParseDirectionError};
pub use map::WorldMap;
