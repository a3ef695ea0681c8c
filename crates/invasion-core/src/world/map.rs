//! World Map
//!
//! Locations, the compass links between them, and where every agent stands.
//!
//! Locations live in an arena addressed by [`LocationId`] and keep their
//! creation order, so every listing below (and every random pick drawn from
//! one) is reproducible under a seeded generator.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use super::{AgentId, Direction, LocationId};
use crate::error::InvasionError;

/// A location slot in the arena
#[derive(Debug, Clone)]
struct Location {
    name: String,
    /// Neighbor per direction, indexed by [`Direction::index`]
    links: [Option<LocationId>; 4],
    destroyed: bool,
}

impl Location {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            links: [None; 4],
            destroyed: false,
        }
    }

    fn link(&self, direction: Direction) -> Option<LocationId> {
        self.links[direction.index()]
    }

    fn directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| self.link(*d).is_some())
            .collect()
    }

    /// One entry per linked direction, so a neighbor reachable two ways appears twice
    fn neighbors(&self) -> Vec<LocationId> {
        self.links.iter().flatten().copied().collect()
    }
}

/// The invaded world: a symmetric, direction-labelled graph plus agent positions
#[derive(Debug, Clone, Default)]
pub struct WorldMap {
    locations: Vec<Location>,
    by_name: HashMap<String, LocationId>,
    agents: BTreeMap<AgentId, LocationId>,
    next_agent: u32,
}

impl WorldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a map file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InvasionError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| InvasionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        content.parse()
    }

    fn parse_line(&mut self, line: &str) -> Result<(), InvasionError> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(());
        };
        let entries: Vec<&str> = tokens.collect();
        if entries.is_empty() {
            return Err(InvasionError::IsolatedLocation {
                location: name.to_string(),
            });
        }

        self.add_location(name);

        for entry in entries {
            let parts: Vec<&str> = entry.split('=').collect();
            let (direction, neighbor) = match parts.as_slice() {
                [d, n] if !d.is_empty() && !n.is_empty() => (*d, *n),
                _ => {
                    return Err(InvasionError::MalformedEntry {
                        location: name.to_string(),
                        entry: entry.to_string(),
                    })
                }
            };
            let direction: Direction =
                direction
                    .parse()
                    .map_err(|_| InvasionError::UnknownDirection {
                        location: name.to_string(),
                        direction: direction.to_string(),
                    })?;
            self.add_link(name, direction, neighbor)?;
        }

        Ok(())
    }

    /// Insert a location, or return the existing one with that name
    pub fn add_location(&mut self, name: &str) -> LocationId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = LocationId::new(self.locations.len());
        self.locations.push(Location::new(name));
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Insert a location that must not exist yet
    pub fn add_location_strict(&mut self, name: &str) -> Result<LocationId, InvasionError> {
        if self.by_name.contains_key(name) {
            return Err(InvasionError::DuplicateLocation {
                location: name.to_string(),
            });
        }
        Ok(self.add_location(name))
    }

    /// Link `from` to `to` in `direction` and `to` back to `from` in the
    /// opposite direction, creating either location if needed.
    ///
    /// Re-adding an identical link is a no-op. A link that contradicts an
    /// existing one at either end is rejected and leaves the map unchanged.
    pub fn add_link(
        &mut self,
        from: &str,
        direction: Direction,
        to: &str,
    ) -> Result<(), InvasionError> {
        if from == to {
            return Err(InvasionError::SelfLoop {
                location: from.to_string(),
            });
        }

        let back = direction.opposite();
        let known_from = self.id_of(from);
        let known_to = self.id_of(to);

        if let Some(existing) = known_from.and_then(|id| self.neighbor(id, direction)) {
            if Some(existing) != known_to {
                return Err(InvasionError::AmbiguousDirection {
                    from: from.to_string(),
                    to: to.to_string(),
                    direction,
                });
            }
        }
        if let Some(existing) = known_to.and_then(|id| self.neighbor(id, back)) {
            if Some(existing) != known_from {
                return Err(InvasionError::AmbiguousDirection {
                    from: to.to_string(),
                    to: from.to_string(),
                    direction: back,
                });
            }
        }

        let from_id = self.add_location(from);
        let to_id = self.add_location(to);
        self.locations[from_id.slot()].links[direction.index()] = Some(to_id);
        self.locations[to_id.slot()].links[back.index()] = Some(from_id);
        Ok(())
    }

    /// Look up a live location by name
    pub fn id_of(&self, name: &str) -> Option<LocationId> {
        self.by_name.get(name).copied()
    }

    /// Name of a location, destroyed or not.
    ///
    /// Panics if `id` was issued by a different map.
    pub fn name(&self, id: LocationId) -> &str {
        &self.locations[id.slot()].name
    }

    /// Check that `id` names a location that has not been destroyed
    pub fn contains(&self, id: LocationId) -> bool {
        self.locations
            .get(id.slot())
            .map(|l| !l.destroyed)
            .unwrap_or(false)
    }

    /// All live locations, in creation order
    pub fn locations(&self) -> Vec<LocationId> {
        self.locations
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.destroyed)
            .map(|(slot, _)| LocationId::new(slot))
            .collect()
    }

    pub fn location_count(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Directions leading out of a location, north/south/east/west order
    pub fn directions(&self, id: LocationId) -> Vec<Direction> {
        self.locations
            .get(id.slot())
            .map(Location::directions)
            .unwrap_or_default()
    }

    pub fn neighbor(&self, id: LocationId, direction: Direction) -> Option<LocationId> {
        self.locations.get(id.slot()).and_then(|l| l.link(direction))
    }

    /// Neighbors of a location, one entry per direction
    pub fn neighbors(&self, id: LocationId) -> Vec<LocationId> {
        self.locations
            .get(id.slot())
            .map(Location::neighbors)
            .unwrap_or_default()
    }

    /// Every link in the map has a matching link back
    pub fn links_are_symmetric(&self) -> bool {
        self.locations().into_iter().all(|id| {
            Direction::ALL.into_iter().all(|direction| {
                match self.neighbor(id, direction) {
                    Some(other) => {
                        other != id
                            && self.contains(other)
                            && self.neighbor(other, direction.opposite()) == Some(id)
                    }
                    None => true,
                }
            })
        })
    }

    /// Living agents, in spawn order
    pub fn agents(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn position(&self, agent: AgentId) -> Option<LocationId> {
        self.agents.get(&agent).copied()
    }

    /// Living agents grouped by where they stand
    pub fn agents_by_location(&self) -> BTreeMap<LocationId, Vec<AgentId>> {
        let mut grouped: BTreeMap<LocationId, Vec<AgentId>> = BTreeMap::new();
        for (agent, location) in &self.agents {
            grouped.entry(*location).or_default().push(*agent);
        }
        grouped
    }

    /// Agents standing somewhere with no way out
    pub fn trapped_agents(&self) -> Vec<AgentId> {
        self.agents
            .iter()
            .filter(|(_, location)| self.directions(**location).is_empty())
            .map(|(agent, _)| *agent)
            .collect()
    }

    pub fn trapped_agent_count(&self) -> usize {
        self.agents
            .values()
            .filter(|location| self.directions(**location).is_empty())
            .count()
    }

    /// Drop `count` new agents onto locations picked uniformly at random.
    ///
    /// Each pick is independent, so agents may share a starting location.
    pub fn spawn_agents<R: Rng>(
        &mut self,
        count: u32,
        rng: &mut R,
    ) -> Result<Vec<AgentId>, InvasionError> {
        let candidates = self.locations();
        if count > 0 && candidates.is_empty() {
            return Err(InvasionError::EmptyMap);
        }

        let mut spawned = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let agent = AgentId::new(self.next_agent);
            self.next_agent += 1;
            let location = candidates[rng.gen_range(0..candidates.len())];
            self.agents.insert(agent, location);
            spawned.push(agent);
        }

        debug!("Spawned {} agents over {} locations", count, candidates.len());
        Ok(spawned)
    }

    /// Move every agent that can move to a random neighbor of where it stands
    pub fn random_walk<R: Rng>(&mut self, rng: &mut R) {
        let locations = &self.locations;
        for position in self.agents.values_mut() {
            let neighbors = locations[position.slot()].neighbors();
            if let Some(next) = neighbors.choose(rng) {
                *position = *next;
            }
        }
    }

    /// Remove a location and every link leading to it.
    ///
    /// Agents standing there are left in place; see [`WorldMap::kill_agents`].
    /// Returns false if the location was already gone.
    pub fn destroy_location(&mut self, id: LocationId) -> bool {
        let Some(location) = self.locations.get_mut(id.slot()) else {
            return false;
        };
        if location.destroyed {
            return false;
        }
        location.destroyed = true;
        let links = std::mem::take(&mut location.links);

        for direction in Direction::ALL {
            if let Some(neighbor) = links[direction.index()] {
                let back = &mut self.locations[neighbor.slot()].links[direction.opposite().index()];
                if *back == Some(id) {
                    *back = None;
                }
            }
        }
        self.by_name.remove(&self.locations[id.slot()].name);

        debug!("Destroyed {}", self.locations[id.slot()].name);
        true
    }

    /// Remove agents from the living set. Unknown ids are ignored.
    pub fn kill_agents(&mut self, agents: &[AgentId]) {
        for agent in agents {
            self.agents.remove(agent);
        }
    }
}

impl FromStr for WorldMap {
    type Err = InvasionError;

    /// Builds a map from `<Name> <dir>=<Neighbor> ...` lines. Blank lines are
    /// skipped; the first bad line aborts the whole parse.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut map = WorldMap::new();
        for (index, line) in input.lines().enumerate() {
            map.parse_line(line).map_err(|e| e.at_line(index + 1))?;
        }
        Ok(map)
    }
}

impl fmt::Display for WorldMap {
    /// One `Name: dir=Neighbor ...` line per surviving location
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for location in self.locations.iter().filter(|l| !l.destroyed) {
            write!(f, "{}:", location.name)?;
            for direction in Direction::ALL {
                if let Some(neighbor) = location.link(direction) {
                    write!(f, " {}={}", direction, self.name(neighbor))?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
