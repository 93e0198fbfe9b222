//! Prompt context for generator requests
//!
//! Snapshots of simulation state shaped for prompt construction. Building
//! these is cheap and keeps the generators free of any knowledge of the
//! controller or store.

use crate::core::types::{Stats, WealthTier};
use crate::life::event::LifeEvent;
use crate::life::profile::Profile;
use crate::life::simulation::Simulation;

/// Everything the event generator needs to produce the next milestone.
#[derive(Debug, Clone)]
pub struct EventContext {
    pub age: u32,
    pub profile: Profile,
    pub stats: Stats,
    pub wealth_tier: WealthTier,
    /// Bounded tail of the history, oldest first.
    pub recent_events: Vec<LifeEvent>,
}

impl EventContext {
    /// Snapshot a simulation at the age the event should be generated for.
    pub fn from_simulation(sim: &Simulation, age: u32, history_window: usize) -> Self {
        let start = sim.life_events.len().saturating_sub(history_window);
        Self {
            age,
            profile: sim.profile.clone(),
            stats: sim.stats,
            wealth_tier: sim.wealth_tier,
            recent_events: sim.life_events[start..].to_vec(),
        }
    }

    /// Compact history line for the user prompt: "age 18: Left home (personal)".
    pub fn history_summary(&self) -> String {
        self.recent_events
            .iter()
            .map(|e| format!("age {}: {} ({:?})", e.age, e.title, e.kind))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Everything the summary generator needs for the terminal narrative.
#[derive(Debug, Clone)]
pub struct SummaryContext {
    pub final_age: u32,
    pub profile: Profile,
    pub stats: Stats,
    pub wealth_tier: WealthTier,
    /// The full event history, oldest first.
    pub events: Vec<LifeEvent>,
}

impl SummaryContext {
    pub fn from_simulation(sim: &Simulation) -> Self {
        Self {
            final_age: sim.current_age(),
            profile: sim.profile.clone(),
            stats: sim.stats,
            wealth_tier: sim.wealth_tier,
            events: sim.life_events.clone(),
        }
    }

    pub fn history_summary(&self) -> String {
        self.events
            .iter()
            .map(|e| format!("age {}: {}", e.age, e.title))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
