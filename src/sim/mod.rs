//! The life-simulation state machine
//!
//! Pure components (clock, milestones, stats, wealth, termination) plus the
//! controller that orchestrates them against the store and the generators.

pub mod clock;
pub mod controller;
pub mod milestones;
pub mod stats;
pub mod termination;
pub mod wealth;
