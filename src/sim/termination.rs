//! LifeTerminationEvaluator
//!
//! A life ends when health is exhausted or the age cap is reached. The
//! transition is monotonic and final; there is no resurrection path.

use crate::core::types::Stats;

/// Why a life ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CauseOfDeath {
    HealthExhausted,
    OldAge,
}

/// Evaluate the end conditions after a stat update.
pub fn evaluate(stats: &Stats, age: u32, max_age: u32) -> Option<CauseOfDeath> {
    if stats.health <= 0 {
        Some(CauseOfDeath::HealthExhausted)
    } else if age >= max_age {
        Some(CauseOfDeath::OldAge)
    } else {
        None
    }
}
