//! The Simulation record: one synthetic life
//!
//! Exactly one alive simulation exists per owner. The record is only ever
//! mutated through the state machine in `crate::sim`; everything here is
//! structure plus cheap derived accessors.

use crate::core::config::SimulationConfig;
use crate::core::types::{SimulationId, Stats, WealthTier};
use crate::life::event::LifeEvent;
use crate::life::profile::Profile;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub id: SimulationId,
    pub owner: String,
    pub profile: Profile,

    /// Monotonic virtual clock; advances only via `sim::clock`.
    pub virtual_months_elapsed: u32,
    pub last_updated: Timestamp,

    pub stats: Stats,
    pub wealth_tier: WealthTier,
    pub is_alive: bool,

    /// Terminal narrative, stored verbatim once the life has ended.
    pub summary: Option<String>,

    /// Append-only; insertion order is chronological order.
    pub life_events: Vec<LifeEvent>,
}

impl Simulation {
    /// A fresh life at the configured baseline: 18 years old, default
    /// stats, the bottom of the wealth ladder, no history.
    pub fn new(owner: impl Into<String>, profile: Profile, now: Timestamp, config: &SimulationConfig) -> Self {
        Self {
            id: SimulationId::new(),
            owner: owner.into(),
            profile,
            virtual_months_elapsed: config.baseline_age_years * 12,
            last_updated: now,
            stats: Stats::new(
                config.default_happiness,
                config.default_health,
                config.default_legacy,
            ),
            wealth_tier: WealthTier::Struggling,
            is_alive: true,
            summary: None,
            life_events: Vec::new(),
        }
    }

    /// Current age in whole years.
    pub fn current_age(&self) -> u32 {
        self.virtual_months_elapsed / 12
    }

    /// Months into the current year, for display.
    pub fn months_this_year(&self) -> u32 {
        self.virtual_months_elapsed % 12
    }

    /// The single uncompleted event awaiting a decision, if any.
    pub fn pending_event(&self) -> Option<&LifeEvent> {
        self.life_events.iter().find(|e| !e.completed)
    }

    pub fn pending_event_mut(&mut self) -> Option<&mut LifeEvent> {
        self.life_events.iter_mut().find(|e| !e.completed)
    }

    /// Most recent event, completed or not.
    pub fn latest_event(&self) -> Option<&LifeEvent> {
        self.life_events.last()
    }
}
