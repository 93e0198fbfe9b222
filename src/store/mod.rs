//! Persistence collaborators
//!
//! The core talks to storage through [`SimulationStore`]; the trait is the
//! whole contract. `MemoryStore` backs tests and `JsonStore` gives the CLI
//! durable state in a single JSON file.

mod json;
mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use crate::core::error::Result;
use crate::life::simulation::Simulation;

pub trait SimulationStore {
    /// The single alive simulation for an owner, if any.
    fn find_alive(&self, owner: &str) -> Result<Option<Simulation>>;

    /// Insert a brand-new simulation record. Fails if the owner already has
    /// an alive simulation or the id is taken.
    fn insert(&mut self, sim: &Simulation) -> Result<()>;

    /// Replace the stored record with the given state, matched by id.
    fn update(&mut self, sim: &Simulation) -> Result<()>;

    /// Terminated simulations ordered by legacy score descending.
    fn leaderboard(&self, limit: usize) -> Result<Vec<Simulation>>;
}
