//! Durable single-file JSON store
//!
//! All records live in one JSON array on disk. Every mutation rewrites the
//! file through a temp-file-then-rename so a crash mid-write leaves the
//! previous consistent snapshot in place.

use crate::core::error::Result;
use crate::life::simulation::Simulation;
use crate::store::memory;
use crate::store::SimulationStore;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    records: Vec<Simulation>,
}

impl JsonStore {
    /// Open the store at `path`, loading existing records if the file
    /// exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            Vec::new()
        };
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&self.records)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SimulationStore for JsonStore {
    fn find_alive(&self, owner: &str) -> Result<Option<Simulation>> {
        Ok(memory::find_alive(&self.records, owner))
    }

    fn insert(&mut self, sim: &Simulation) -> Result<()> {
        memory::insert(&mut self.records, sim)?;
        self.flush()
    }

    fn update(&mut self, sim: &Simulation) -> Result<()> {
        memory::update(&mut self.records, sim)?;
        self.flush()
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<Simulation>> {
        Ok(memory::leaderboard(&self.records, limit))
    }
}
