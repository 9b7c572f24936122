//! Hook trait.
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Lifecycle events of an experiment, in the order they occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Before the first reset.
    PreExperiment,

    /// After a reset, before the first action of the episode.
    PreEpisode,

    /// After an action has been selected, before it is applied.
    PreAct,

    /// After a transition.
    PostAct,

    /// After the transition that ended an episode, before the reset.
    PostEpisode,

    /// After the loop halted.
    PostExperiment,
}

/// Observer of the run loop.
///
/// `step` is the number of transitions made so far in the experiment.
pub trait Hook<P: ?Sized, E: ?Sized> {
    /// Reacts to a lifecycle event.
    fn call(&mut self, stage: Stage, step: usize, policy: &P, env: &E) -> Result<()>;
}

impl<P: ?Sized, E: ?Sized> Hook<P, E> for () {
    fn call(&mut self, _stage: Stage, _step: usize, _policy: &P, _env: &E) -> Result<()> {
        Ok(())
    }
}

impl<P: ?Sized, E: ?Sized, H: Hook<P, E> + ?Sized> Hook<P, E> for Box<H> {
    fn call(&mut self, stage: Stage, step: usize, policy: &P, env: &E) -> Result<()> {
        (**self).call(stage, step, policy, env)
    }
}

impl<P: ?Sized, E: ?Sized, H: Hook<P, E> + ?Sized> Hook<P, E> for &mut H {
    fn call(&mut self, stage: Stage, step: usize, policy: &P, env: &E) -> Result<()> {
        (**self).call(stage, step, policy, env)
    }
}
