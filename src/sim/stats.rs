//! StatAccumulator: clamped application of impact deltas
//!
//! Pure and side-effect-free. The wealth tier is deliberately not touched
//! here; see `sim::wealth`.

use crate::core::types::Stats;
use crate::life::event::EventImpact;

/// Apply an impact's stat deltas, clamping each result to [0, 100].
pub fn apply(current: Stats, impact: &EventImpact) -> Stats {
    Stats {
        happiness: clamp(current.happiness + impact.happiness),
        health: clamp(current.health + impact.health),
        legacy: clamp(current.legacy + impact.legacy),
    }
}

fn clamp(value: i32) -> i32 {
    value.clamp(Stats::MIN, Stats::MAX)
}
