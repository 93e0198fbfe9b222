//! In-memory store for tests and ephemeral runs

use crate::core::error::{LifeSimError, Result};
use crate::life::simulation::Simulation;
use crate::store::SimulationStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<Simulation>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Shared record logic for both store implementations.
pub(crate) fn find_alive(records: &[Simulation], owner: &str) -> Option<Simulation> {
    records
        .iter()
        .find(|s| s.owner == owner && s.is_alive)
        .cloned()
}

pub(crate) fn insert(records: &mut Vec<Simulation>, sim: &Simulation) -> Result<()> {
    if records.iter().any(|s| s.id == sim.id) {
        return Err(LifeSimError::InvalidOperation(format!(
            "simulation {} already exists",
            sim.id
        )));
    }
    if sim.is_alive && records.iter().any(|s| s.owner == sim.owner && s.is_alive) {
        return Err(LifeSimError::InvalidOperation(format!(
            "owner {} already has an alive simulation",
            sim.owner
        )));
    }
    records.push(sim.clone());
    Ok(())
}

pub(crate) fn update(records: &mut [Simulation], sim: &Simulation) -> Result<()> {
    match records.iter_mut().find(|s| s.id == sim.id) {
        Some(slot) => {
            *slot = sim.clone();
            Ok(())
        }
        None => Err(LifeSimError::InvalidOperation(format!(
            "simulation {} not found",
            sim.id
        ))),
    }
}

pub(crate) fn leaderboard(records: &[Simulation], limit: usize) -> Vec<Simulation> {
    let mut dead: Vec<Simulation> = records.iter().filter(|s| !s.is_alive).cloned().collect();
    dead.sort_by(|a, b| b.stats.legacy.cmp(&a.stats.legacy));
    dead.truncate(limit);
    dead
}

impl SimulationStore for MemoryStore {
    fn find_alive(&self, owner: &str) -> Result<Option<Simulation>> {
        Ok(find_alive(&self.records, owner))
    }

    fn insert(&mut self, sim: &Simulation) -> Result<()> {
        insert(&mut self.records, sim)
    }

    fn update(&mut self, sim: &Simulation) -> Result<()> {
        update(&mut self.records, sim)
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<Simulation>> {
        Ok(leaderboard(&self.records, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::life::profile::Profile;
    use jiff::Timestamp;

    fn sim_for(owner: &str) -> Simulation {
        Simulation::new(
            owner,
            Profile::new("usa", "bachelor", "ambivert", "tech", "medium"),
            Timestamp::UNIX_EPOCH,
            &SimulationConfig::default(),
        )
    }

    #[test]
    fn test_insert_and_find_alive() {
        let mut store = MemoryStore::new();
        let sim = sim_for("alice");
        store.insert(&sim).unwrap();
        let found = store.find_alive("alice").unwrap().unwrap();
        assert_eq!(found.id, sim.id);
        assert!(store.find_alive("bob").unwrap().is_none());
    }

    #[test]
    fn test_second_alive_simulation_rejected() {
        let mut store = MemoryStore::new();
        store.insert(&sim_for("alice")).unwrap();
        assert!(store.insert(&sim_for("alice")).is_err());
    }

    #[test]
    fn test_dead_simulation_frees_the_owner() {
        let mut store = MemoryStore::new();
        let mut sim = sim_for("alice");
        store.insert(&sim).unwrap();
        sim.is_alive = false;
        store.update(&sim).unwrap();
        assert!(store.find_alive("alice").unwrap().is_none());
        store.insert(&sim_for("alice")).unwrap();
    }

    #[test]
    fn test_update_unknown_id_rejected() {
        let mut store = MemoryStore::new();
        assert!(store.update(&sim_for("alice")).is_err());
    }

    #[test]
    fn test_leaderboard_orders_dead_by_legacy() {
        let mut store = MemoryStore::new();
        for (owner, legacy) in [("a", 10), ("b", 80), ("c", 40)] {
            let mut sim = sim_for(owner);
            sim.stats.legacy = legacy;
            sim.is_alive = false;
            store.insert(&sim).unwrap();
        }
        let mut alive = sim_for("d");
        alive.stats.legacy = 99;
        store.insert(&alive).unwrap();

        let top = store.leaderboard(2).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].stats.legacy, 80);
        assert_eq!(top[1].stats.legacy, 40);
    }
}
