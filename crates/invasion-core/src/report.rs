//! Report
//!
//! Human-readable sentences and serializable snapshots of an invasion.

use invasion_events::{AgentSnapshot, LocationSnapshot, MapSnapshot, Outcome};

use crate::invasion::Conclusion;
use crate::world::{AgentId, Direction, WorldMap};

/// Join agent names for a sentence.
///
/// `[a, b]` becomes "a and b", `[a, b, c]` becomes "a, b, and c".
pub fn pretty_join_agents(agents: &[AgentId]) -> String {
    match agents {
        [] => String::new(),
        [only] => only.to_string(),
        [first, second] => format!("{} and {}", first, second),
        [rest @ .., last] => {
            let mut out = String::new();
            for agent in rest {
                out.push_str(&format!("{}, ", agent));
            }
            out.push_str(&format!("and {}", last));
            out
        }
    }
}

/// Closing line of a run
pub fn conclusion_sentence(conclusion: &Conclusion, moves: u32) -> String {
    format!("Invasion ended after {} moves: {}.", moves, conclusion)
}

/// Capture the surviving locations and living agents
pub fn snapshot(map: &WorldMap, round: u32, outcome: Option<Outcome>) -> MapSnapshot {
    let locations = map
        .locations()
        .into_iter()
        .map(|id| {
            let mut location = LocationSnapshot::new(map.name(id));
            for direction in Direction::ALL {
                if let Some(neighbor) = map.neighbor(id, direction) {
                    location = location.with_link(direction.as_str(), map.name(neighbor));
                }
            }
            location
        })
        .collect();

    let agents = map
        .agents()
        .into_iter()
        .filter_map(|agent| {
            map.position(agent).map(|location| AgentSnapshot {
                agent: agent.to_string(),
                location: map.name(location).to_string(),
            })
        })
        .collect();

    MapSnapshot {
        round,
        locations,
        agents,
        outcome,
    }
}
