//! Snapshot Types
//!
//! Serialization structs for the state of the world map at a point in time,
//! used to inspect what survived an invasion.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Outcome;

/// A surviving location and its remaining links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    pub name: String,
    /// direction -> neighbor name
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

impl LocationSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            links: BTreeMap::new(),
        }
    }

    pub fn with_link(mut self, direction: impl Into<String>, neighbor: impl Into<String>) -> Self {
        self.links.insert(direction.into(), neighbor.into());
        self
    }

    /// A location with no links left traps whoever stands on it
    pub fn is_isolated(&self) -> bool {
        self.links.is_empty()
    }
}

/// A living agent and where it stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub agent: String,
    pub location: String,
}

/// Complete map state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub round: u32,
    pub locations: Vec<LocationSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<AgentSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl MapSnapshot {
    pub fn location(&self, name: &str) -> Option<&LocationSnapshot> {
        self.locations.iter().find(|l| l.name == name)
    }

    pub fn agents_at(&self, location: &str) -> Vec<&str> {
        self.agents
            .iter()
            .filter(|a| a.location == location)
            .map(|a| a.agent.as_str())
            .collect()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
