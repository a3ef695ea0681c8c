//! Invasion Engine
//!
//! Owns the world map and drives one round at a time: every agent walks,
//! crowded locations are destroyed along with their occupants, and the run
//! is checked for a terminal state.

use invasion_events::Outcome;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fmt;
use tracing::{debug, info};

use crate::error::InvasionError;
use crate::report::pretty_join_agents;
use crate::world::{AgentId, LocationId, WorldMap};

/// Rounds after which a run is called off
pub const DEFAULT_MAX_MOVES: u32 = 10_000;

/// Why a run stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conclusion {
    ExceedsMaximumMoves,
    AllLocationsDestroyed,
    AllAgentsDied,
    AgentWon(AgentId),
    AllAgentsTrapped,
}

impl Conclusion {
    pub fn outcome(&self) -> Outcome {
        match self {
            Conclusion::ExceedsMaximumMoves => Outcome::ExceedsMaximumMoves,
            Conclusion::AllLocationsDestroyed => Outcome::AllLocationsDestroyed,
            Conclusion::AllAgentsDied => Outcome::AllAgentsDied,
            Conclusion::AgentWon(agent) => Outcome::AgentWon {
                agent: agent.to_string(),
            },
            Conclusion::AllAgentsTrapped => Outcome::AllAgentsTrapped,
        }
    }
}

impl fmt::Display for Conclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conclusion::ExceedsMaximumMoves => write!(f, "exceeds maximum moves"),
            Conclusion::AllLocationsDestroyed => write!(f, "all locations destroyed"),
            Conclusion::AllAgentsDied => write!(f, "all agents died"),
            Conclusion::AgentWon(agent) => write!(f, "{} won", agent),
            Conclusion::AllAgentsTrapped => write!(f, "all agents trapped"),
        }
    }
}

/// A location destroyed in combat and the agents who died with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battle {
    pub location: LocationId,
    pub name: String,
    pub agents: Vec<AgentId>,
}

impl fmt::Display for Battle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} has been destroyed by {}!",
            self.name,
            pretty_join_agents(&self.agents)
        )
    }
}

/// A single invasion run
#[derive(Debug)]
pub struct Invasion {
    map: WorldMap,
    rng: SmallRng,
    moves: u32,
    max_moves: u32,
    conclusion: Option<Conclusion>,
}

impl Invasion {
    /// Spawn `agents` onto `map` and get ready for the first round
    pub fn new(mut map: WorldMap, agents: u32, mut rng: SmallRng) -> Result<Self, InvasionError> {
        map.spawn_agents(agents, &mut rng)?;
        info!(
            "Unleashed {} agents on {} locations",
            agents,
            map.location_count()
        );

        Ok(Self {
            map,
            rng,
            moves: 0,
            max_moves: DEFAULT_MAX_MOVES,
            conclusion: None,
        })
    }

    pub fn seeded(map: WorldMap, agents: u32, seed: u64) -> Result<Self, InvasionError> {
        Self::new(map, agents, SmallRng::seed_from_u64(seed))
    }

    pub fn with_max_moves(mut self, max_moves: u32) -> Self {
        self.max_moves = max_moves;
        self
    }

    pub fn map(&self) -> &WorldMap {
        &self.map
    }

    /// Rounds played so far
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn max_moves(&self) -> u32 {
        self.max_moves
    }

    pub fn conclusion(&self) -> Option<&Conclusion> {
        self.conclusion.as_ref()
    }

    /// Move phase: every agent with somewhere to go takes one step
    pub fn advance(&mut self) {
        self.map.random_walk(&mut self.rng);
        self.moves += 1;
    }

    /// Combat phase: each location holding two or more agents is destroyed
    /// and everyone there dies.
    ///
    /// Occupancy is read once up front; battles come back in location order.
    pub fn resolve(&mut self) -> Vec<Battle> {
        let crowded: Vec<(LocationId, Vec<AgentId>)> = self
            .map
            .agents_by_location()
            .into_iter()
            .filter(|(_, agents)| agents.len() >= 2)
            .collect();

        let mut battles = Vec::with_capacity(crowded.len());
        for (location, agents) in crowded {
            self.map.destroy_location(location);
            self.map.kill_agents(&agents);
            let battle = Battle {
                location,
                name: self.map.name(location).to_string(),
                agents,
            };
            debug!("Round {}: {}", self.moves, battle);
            battles.push(battle);
        }
        battles
    }

    /// Check for a terminal state, recording the first one found.
    ///
    /// Once a conclusion is recorded it never changes.
    pub fn is_finished(&mut self) -> bool {
        self.check().is_some()
    }

    /// Same check as [`Invasion::is_finished`], handing back the conclusion
    pub fn check(&mut self) -> Option<&Conclusion> {
        if self.conclusion.is_none() {
            self.conclusion = self.evaluate();
            if let Some(conclusion) = &self.conclusion {
                info!("Invasion over after {} moves: {}", self.moves, conclusion);
            }
        }
        self.conclusion.as_ref()
    }

    /// Terminal conditions in priority order
    fn evaluate(&self) -> Option<Conclusion> {
        if self.moves >= self.max_moves {
            return Some(Conclusion::ExceedsMaximumMoves);
        }
        if self.map.location_count() == 0 {
            return Some(Conclusion::AllLocationsDestroyed);
        }
        let living = self.map.agents();
        match living.as_slice() {
            [] => Some(Conclusion::AllAgentsDied),
            [survivor] => Some(Conclusion::AgentWon(*survivor)),
            _ if living.len() == self.map.trapped_agent_count() => {
                Some(Conclusion::AllAgentsTrapped)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: &str = "Foo north=Bar west=Baz south=Qu-ux\nBar south=Foo west=Bee\n";

    fn invasion(agents: u32) -> Invasion {
        Invasion::seeded(WORLD.parse().unwrap(), agents, 42).unwrap()
    }

    fn destroy(invasion: &mut Invasion, names: &[&str]) {
        for name in names {
            let id = invasion.map.id_of(name).unwrap();
            invasion.map.destroy_location(id);
        }
    }

    #[test]
    fn test_new_spawns_agents() {
        let invasion = invasion(8);
        assert_eq!(invasion.map().agent_count(), 8);
        assert_eq!(invasion.moves(), 0);
        assert_eq!(invasion.max_moves(), DEFAULT_MAX_MOVES);
        assert!(invasion.conclusion().is_none());
    }

    #[test]
    fn test_new_on_empty_map_fails() {
        let err = Invasion::seeded(WorldMap::new(), 3, 1).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidLocation);
    }

    #[test]
    fn test_advance_counts_moves() {
        let mut invasion = invasion(8);
        invasion.advance();
        assert_eq!(invasion.moves(), 1);
        invasion.advance();
        assert_eq!(invasion.moves(), 2);
        assert_eq!(invasion.map().agent_count(), 8);
    }

    #[test]
    fn test_not_finished_while_agents_roam() {
        let mut invasion = invasion(8);
        // every location still has a link, so nobody is trapped
        assert!(!invasion.is_finished());
        assert!(invasion.conclusion().is_none());
    }

    #[test]
    fn test_exceeding_max_moves_wins_priority() {
        let mut invasion = invasion(8);
        invasion.moves = DEFAULT_MAX_MOVES;
        destroy(&mut invasion, &["Foo", "Bar", "Baz", "Bee", "Qu-ux"]);
        assert!(invasion.is_finished());
        assert_eq!(invasion.conclusion(), Some(&Conclusion::ExceedsMaximumMoves));
    }

    #[test]
    fn test_custom_max_moves() {
        let mut invasion = invasion(8).with_max_moves(3);
        for _ in 0..3 {
            assert!(!invasion.is_finished());
            invasion.advance();
        }
        assert!(invasion.is_finished());
        assert_eq!(invasion.conclusion(), Some(&Conclusion::ExceedsMaximumMoves));
    }

    #[test]
    fn test_all_locations_destroyed() {
        let mut invasion = invasion(8);
        destroy(&mut invasion, &["Foo", "Bar", "Baz", "Bee", "Qu-ux"]);
        assert!(invasion.is_finished());
        assert_eq!(invasion.conclusion(), Some(&Conclusion::AllLocationsDestroyed));
    }

    #[test]
    fn test_all_agents_died() {
        let mut invasion = invasion(8);
        let agents = invasion.map.agents();
        invasion.map.kill_agents(&agents);
        assert!(invasion.is_finished());
        assert_eq!(invasion.conclusion(), Some(&Conclusion::AllAgentsDied));
    }

    #[test]
    fn test_last_agent_wins() {
        let mut invasion = invasion(8);
        let agents = invasion.map.agents();
        invasion.map.kill_agents(&agents[1..]);
        assert!(invasion.is_finished());
        assert_eq!(invasion.conclusion(), Some(&Conclusion::AgentWon(agents[0])));
        assert!(invasion.conclusion().unwrap().to_string().ends_with("won"));
        assert_eq!(invasion.conclusion().unwrap().to_string(), "agent-0 won");
    }

    #[test]
    fn test_all_agents_trapped() {
        let mut invasion = invasion(8);
        destroy(&mut invasion, &["Foo", "Bar", "Baz", "Bee"]);
        assert!(invasion.is_finished());
        assert_eq!(invasion.conclusion(), Some(&Conclusion::AllAgentsTrapped));
    }

    #[test]
    fn test_finished_is_sticky() {
        let mut invasion = invasion(8);
        destroy(&mut invasion, &["Foo", "Bar", "Baz", "Bee"]);
        assert!(invasion.is_finished());

        // Later changes do not rewrite the verdict
        let agents = invasion.map.agents();
        invasion.map.kill_agents(&agents);
        invasion.moves = DEFAULT_MAX_MOVES;
        for _ in 0..3 {
            assert!(invasion.is_finished());
            assert_eq!(invasion.conclusion(), Some(&Conclusion::AllAgentsTrapped));
        }
    }

    #[test]
    fn test_fight_destroys_everything() {
        let mut invasion = Invasion::seeded("Foo north=Bar".parse().unwrap(), 1000, 7).unwrap();
        let battles = invasion.resolve();

        assert_eq!(battles.len(), 2);
        assert_eq!(battles[0].name, "Foo");
        assert_eq!(battles[1].name, "Bar");
        let fallen: usize = battles.iter().map(|b| b.agents.len()).sum();
        assert_eq!(fallen, 1000);
        assert_eq!(invasion.map().agent_count(), 0);
        assert_eq!(invasion.map().location_count(), 0);
        assert!(invasion.is_finished());
        assert_eq!(invasion.conclusion(), Some(&Conclusion::AllLocationsDestroyed));
    }

    #[test]
    fn test_resolve_spares_lone_agents() {
        let mut invasion = invasion(1);
        assert!(invasion.resolve().is_empty());
        assert_eq!(invasion.map().agent_count(), 1);
        assert_eq!(invasion.map().location_count(), 5);
    }

    #[test]
    fn test_resolve_clears_every_crowded_location() {
        for seed in 0..20 {
            let mut invasion = Invasion::seeded(WORLD.parse().unwrap(), 6, seed).unwrap();
            invasion.advance();
            let crowded: Vec<(LocationId, Vec<AgentId>)> = invasion
                .map()
                .agents_by_location()
                .into_iter()
                .filter(|(_, agents)| agents.len() >= 2)
                .collect();

            let battles = invasion.resolve();
            assert_eq!(battles.len(), crowded.len());
            for (location, agents) in crowded {
                assert!(!invasion.map().contains(location));
                for agent in agents {
                    assert!(invasion.map().position(agent).is_none());
                }
            }
            assert!(invasion.map().links_are_symmetric());
        }
    }

    #[test]
    fn test_battle_sentence() {
        let battle = Battle {
            location: LocationId::new(0),
            name: "Foo".to_string(),
            agents: vec![AgentId::new(1), AgentId::new(4)],
        };
        assert_eq!(battle.to_string(), "Foo has been destroyed by agent-1 and agent-4!");
    }

    #[test]
    fn test_conclusion_outcome() {
        assert_eq!(
            Conclusion::AgentWon(AgentId::new(3)).outcome(),
            Outcome::AgentWon { agent: "agent-3".to_string() }
        );
        assert_eq!(Conclusion::AllAgentsTrapped.outcome().to_string(), "all agents trapped");
    }
}
