//! Event Types
//!
//! Records emitted while an invasion runs. The event log stores one per line.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    ExceedsMaximumMoves,
    AllLocationsDestroyed,
    AllAgentsDied,
    AgentWon { agent: String },
    AllAgentsTrapped,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::ExceedsMaximumMoves => write!(f, "exceeds maximum moves"),
            Outcome::AllLocationsDestroyed => write!(f, "all locations destroyed"),
            Outcome::AllAgentsDied => write!(f, "all agents died"),
            Outcome::AgentWon { agent } => write!(f, "{} won", agent),
            Outcome::AllAgentsTrapped => write!(f, "all agents trapped"),
        }
    }
}

/// A single entry in the event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvasionEvent {
    /// A location was destroyed together with every agent fighting in it
    Battle {
        event_id: String,
        round: u32,
        location: String,
        agents: Vec<String>,
    },
    /// The run reached a terminal state
    Concluded {
        event_id: String,
        round: u32,
        outcome: Outcome,
    },
}

impl InvasionEvent {
    pub fn event_id(&self) -> &str {
        match self {
            InvasionEvent::Battle { event_id, .. } => event_id,
            InvasionEvent::Concluded { event_id, .. } => event_id,
        }
    }

    pub fn round(&self) -> u32 {
        match self {
            InvasionEvent::Battle { round, .. } => *round,
            InvasionEvent::Concluded { round, .. } => *round,
        }
    }

    /// Serializes the event to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}
