//! Simulation configuration with documented constants
//!
//! Every tuning number of the life state machine is collected here with an
//! explanation of what it controls.

use std::time::Duration;

/// Configuration for the life simulation core
///
/// Defaults reproduce the original product behavior; tests override
/// individual fields (most often `next_event_delay`).
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    // === CLOCK ===
    /// Virtual months gained per whole elapsed real day.
    ///
    /// At the default of 2, one real week ages a life by 14 months; a life
    /// started at 18 reaches the 90-year cap after about 432 real days.
    pub months_per_real_day: u32,

    // === LIFECYCLE ===
    /// Age in years at which every new life begins.
    pub baseline_age_years: u32,

    /// Age at which a life ends regardless of health.
    pub max_age_years: u32,

    /// Stats every new life starts with.
    ///
    /// Health starts at the ceiling so early negative health events cannot
    /// end a life immediately; legacy starts at zero because it is the
    /// leaderboard score and must be earned.
    pub default_happiness: i32,
    pub default_health: i32,
    pub default_legacy: i32,

    // === PACING ===
    /// Pause between resolving a choice and requesting the next event.
    ///
    /// Purely presentational breathing room; tests set this to zero.
    pub next_event_delay: Duration,

    /// How many trailing events accompany each generator request.
    ///
    /// Five matches the original prompt; more inflates the prompt without
    /// improving continuity.
    pub history_window: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            months_per_real_day: 2,
            baseline_age_years: 18,
            max_age_years: 90,
            default_happiness: 50,
            default_health: 100,
            default_legacy: 0,
            next_event_delay: Duration::from_millis(1500),
            history_window: 5,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.months_per_real_day == 0 {
            return Err("months_per_real_day must be at least 1".into());
        }
        if self.baseline_age_years >= self.max_age_years {
            return Err(format!(
                "baseline_age_years ({}) must be < max_age_years ({})",
                self.baseline_age_years, self.max_age_years
            ));
        }
        for (name, v) in [
            ("default_happiness", self.default_happiness),
            ("default_health", self.default_health),
            ("default_legacy", self.default_legacy),
        ] {
            if !(0..=100).contains(&v) {
                return Err(format!("{} ({}) must be within [0, 100]", name, v));
            }
        }
        Ok(())
    }
}
