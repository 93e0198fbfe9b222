//! Shared value types for the life simulation
//!
//! The wealth ladder and the bounded stat vector live here because every
//! layer (state machine, generator boundary, persistence) speaks them.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identity of one simulated life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationId(pub Uuid);

impl SimulationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SimulationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SimulationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The five-step ordinal wealth ladder, ordered low to high.
///
/// Serialized with the display labels the original UI and leaderboard use,
/// so persisted records read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WealthTier {
    #[serde(rename = "Struggling")]
    Struggling,
    #[serde(rename = "Starting Out")]
    StartingOut,
    #[serde(rename = "Comfortable")]
    Comfortable,
    #[serde(rename = "Wealthy")]
    Wealthy,
    #[serde(rename = "Very Wealthy")]
    VeryWealthy,
}

impl WealthTier {
    pub const LADDER: [WealthTier; 5] = [
        WealthTier::Struggling,
        WealthTier::StartingOut,
        WealthTier::Comfortable,
        WealthTier::Wealthy,
        WealthTier::VeryWealthy,
    ];

    /// Position on the ladder, 0 (Struggling) to 4 (Very Wealthy).
    pub fn index(self) -> usize {
        Self::LADDER.iter().position(|&t| t == self).unwrap_or(0)
    }

    /// One step up, saturating at the top.
    pub fn promoted(self) -> Self {
        let i = self.index();
        Self::LADDER[(i + 1).min(Self::LADDER.len() - 1)]
    }

    /// One step down, saturating at the bottom.
    pub fn demoted(self) -> Self {
        let i = self.index();
        Self::LADDER[i.saturating_sub(1)]
    }

    /// Parse a display label back into a tier ("Starting Out" etc.).
    pub fn from_label(label: &str) -> Option<Self> {
        Self::LADDER.iter().copied().find(|t| t.label() == label)
    }

    pub fn label(self) -> &'static str {
        match self {
            WealthTier::Struggling => "Struggling",
            WealthTier::StartingOut => "Starting Out",
            WealthTier::Comfortable => "Comfortable",
            WealthTier::Wealthy => "Wealthy",
            WealthTier::VeryWealthy => "Very Wealthy",
        }
    }
}

impl fmt::Display for WealthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The bounded well-being vector. Every field stays in [0, 100]; the only
/// way values change is through `sim::stats::apply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub happiness: i32,
    pub health: i32,
    pub legacy: i32,
}

impl Stats {
    pub const MIN: i32 = 0;
    pub const MAX: i32 = 100;

    pub fn new(happiness: i32, health: i32, legacy: i32) -> Self {
        Self {
            happiness: happiness.clamp(Self::MIN, Self::MAX),
            health: health.clamp(Self::MIN, Self::MAX),
            legacy: legacy.clamp(Self::MIN, Self::MAX),
        }
    }

    /// True when every field is inside the documented bounds.
    pub fn in_bounds(&self) -> bool {
        let ok = |v: i32| (Self::MIN..=Self::MAX).contains(&v);
        ok(self.happiness) && ok(self.health) && ok(self.legacy)
    }
}
