//! WealthTierResolver: ordinal ladder movement
//!
//! A numeric magnitude moves the tier by at most one step per event no
//! matter how large it is; a tier label from the generator is an
//! authoritative override.

use crate::core::types::WealthTier;
use crate::life::event::WealthImpact;

/// Magnitudes strictly beyond this threshold move the ladder one step.
pub const STEP_THRESHOLD: i32 = 10;

/// Resolve the tier after an event's wealth impact.
pub fn resolve(current: WealthTier, impact: WealthImpact) -> WealthTier {
    match impact {
        WealthImpact::Magnitude(m) if m > STEP_THRESHOLD => current.promoted(),
        WealthImpact::Magnitude(m) if m < -STEP_THRESHOLD => current.demoted(),
        WealthImpact::Magnitude(_) => current,
        WealthImpact::Tier(tier) => tier,
    }
}
