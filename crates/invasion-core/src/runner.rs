//! Runner
//!
//! Plays rounds until the invasion reaches a conclusion.

use tracing::debug;

use crate::events::EventLogger;
use crate::invasion::{Battle, Conclusion, Invasion};

/// What happened over a whole run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub rounds: u32,
    pub battles: Vec<Battle>,
    pub conclusion: Conclusion,
}

impl RunSummary {
    pub fn destroyed_locations(&self) -> Vec<&str> {
        self.battles.iter().map(|b| b.name.as_str()).collect()
    }
}

/// Advance, resolve and check until the invasion is over.
///
/// `on_battle` sees each battle as it happens, tagged with its round. Every
/// battle and the final conclusion also go to `logger`.
pub fn run_to_completion<F>(
    invasion: &mut Invasion,
    logger: &mut EventLogger,
    mut on_battle: F,
) -> std::io::Result<RunSummary>
where
    F: FnMut(u32, &Battle),
{
    let mut battles = Vec::new();

    let conclusion = loop {
        invasion.advance();
        let round = invasion.moves();

        for battle in invasion.resolve() {
            logger.log_battle(round, &battle)?;
            on_battle(round, &battle);
            battles.push(battle);
        }

        if let Some(conclusion) = invasion.check() {
            break conclusion.clone();
        }

        if round % 1000 == 0 {
            debug!(
                "Round {}: {} agents on {} locations",
                round,
                invasion.map().agent_count(),
                invasion.map().location_count()
            );
        }
    };

    logger.log_conclusion(invasion.moves(), &conclusion)?;
    logger.flush()?;

    Ok(RunSummary {
        rounds: invasion.moves(),
        battles,
        conclusion,
    })
}
