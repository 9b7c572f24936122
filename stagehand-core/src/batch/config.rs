//! Configuration of [`BatchEnv`](super::BatchEnv).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`BatchEnv`](super::BatchEnv).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct BatchEnvConfig {
    /// Steps replicas on the rayon thread pool if `true`, one after another otherwise.
    pub parallel: bool,
}

impl Default for BatchEnvConfig {
    fn default() -> Self {
        Self { parallel: false }
    }
}

impl BatchEnvConfig {
    /// Sets if replicas are stepped in parallel.
    pub fn parallel(mut self, v: bool) -> Self {
        self.parallel = v;
        self
    }

    /// Constructs [`BatchEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`BatchEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
