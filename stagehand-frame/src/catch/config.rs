//! Configuration of [`CatchEnv`](super::CatchEnv).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`CatchEnv`](super::CatchEnv).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CatchConfig {
    /// Rows of the board. The paddle moves on the last row.
    pub rows: usize,

    /// Columns of the board.
    pub cols: usize,

    /// Side of a board cell in pixels.
    pub cell_size: usize,

    /// Seed of the random number generator choosing the column of the ball.
    pub seed: u64,
}

impl Default for CatchConfig {
    fn default() -> Self {
        Self {
            rows: 10,
            cols: 5,
            cell_size: 4,
            seed: 42,
        }
    }
}

impl CatchConfig {
    /// Sets the number of rows.
    pub fn rows(mut self, v: usize) -> Self {
        self.rows = v;
        self
    }

    /// Sets the number of columns.
    pub fn cols(mut self, v: usize) -> Self {
        self.cols = v;
        self
    }

    /// Sets the side of a cell in pixels.
    pub fn cell_size(mut self, v: usize) -> Self {
        self.cell_size = v;
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`CatchConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`CatchConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
