//! Stop conditions of the run loop.
use serde::{Deserialize, Serialize};

/// Counters of a running experiment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Transitions made so far.
    pub steps: usize,

    /// Episodes completed so far.
    pub episodes: usize,
}

/// Decides when the run loop halts.
///
/// Checked once per iteration, after the transition and its episode handling.
/// Closures `FnMut(&Progress) -> bool` are stop conditions.
pub trait StopCondition {
    /// Returns `true` to halt the loop.
    fn should_stop(&mut self, progress: &Progress) -> bool;
}

impl<F: FnMut(&Progress) -> bool> StopCondition for F {
    fn should_stop(&mut self, progress: &Progress) -> bool {
        self(progress)
    }
}

/// Halts once the given number of transitions has been made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopAfterStep(pub usize);

impl StopCondition for StopAfterStep {
    fn should_stop(&mut self, progress: &Progress) -> bool {
        progress.steps >= self.0
    }
}

/// Halts once the given number of episodes has been completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopAfterEpisode(pub usize);

impl StopCondition for StopAfterEpisode {
    fn should_stop(&mut self, progress: &Progress) -> bool {
        progress.episodes >= self.0
    }
}
