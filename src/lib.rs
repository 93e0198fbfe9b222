//! Parallel Life - Milestone-driven life simulation engine

pub mod core;
pub mod life;
pub mod llm;
pub mod sim;
pub mod store;
