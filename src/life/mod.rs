//! Domain records: simulations, life events, profiles

pub mod event;
pub mod profile;
pub mod simulation;
