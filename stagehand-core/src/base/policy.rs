//! Policy.
use super::Env;
use crate::{hook::Stage, space::Space};
use anyhow::Result;
use rand::Rng;

/// A policy on an environment.
///
/// Policy is a mapping from a state to an action.
/// The mapping can be either of deterministic or stochastic.
/// Learners update themselves in [`Policy::observe`], which the run loop calls at
/// every lifecycle stage before the hooks of that stage.
pub trait Policy<E: Env> {
    /// Selects an action given a state.
    fn select_action(&mut self, state: &E::State) -> Result<E::Act>;

    /// Observes the environment at a lifecycle stage.
    #[allow(unused_variables)]
    fn observe(&mut self, stage: Stage, env: &E) -> Result<()> {
        Ok(())
    }
}

/// A policy drawing actions uniformly from an action space.
pub struct RandomPolicy<S, R> {
    space: S,
    rng: R,
}

impl<S: Space, R: Rng> RandomPolicy<S, R> {
    /// Constructs a random policy on `space` driven by `rng`.
    pub fn new(space: S, rng: R) -> Self {
        Self { space, rng }
    }

    /// The space actions are drawn from.
    pub fn space(&self) -> &S {
        &self.space
    }
}

impl<E, S, R> Policy<E> for RandomPolicy<S, R>
where
    E: Env<Act = S::Value>,
    S: Space,
    R: Rng,
{
    fn select_action(&mut self, _state: &E::State) -> Result<E::Act> {
        Ok(self.space.sample(&mut self.rng))
    }
}
