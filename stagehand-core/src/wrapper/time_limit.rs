//! Wrapper bounding the length of episodes.
use crate::Env;
use anyhow::Result;

/// Ends every episode after at most `max_steps` transitions.
///
/// The episode also ends when the inner environment terminates on its own.
pub struct TimeLimit<E> {
    env: E,
    max_steps: usize,
    steps: usize,
}

impl<E> TimeLimit<E> {
    /// Wraps `env`.
    pub fn new(env: E, max_steps: usize) -> Self {
        Self {
            env,
            max_steps,
            steps: 0,
        }
    }

    /// Transitions since the last reset.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The inner environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// The inner environment.
    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// Unwraps the inner environment.
    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E> Env for TimeLimit<E>
where
    E: Env<Terminal = bool>,
{
    type State = E::State;
    type Act = E::Act;
    type Reward = E::Reward;
    type Terminal = bool;
    type ActSpace = E::ActSpace;
    type StateSpace = E::StateSpace;

    fn state(&self) -> Result<Self::State> {
        self.env.state()
    }

    fn reward(&self) -> Self::Reward {
        self.env.reward()
    }

    fn original_reward(&self) -> Self::Reward {
        self.env.original_reward()
    }

    fn is_terminated(&self) -> bool {
        self.steps >= self.max_steps || self.env.is_terminated()
    }

    fn act(&mut self, act: &Self::Act) -> Result<()> {
        self.env.act(act)?;
        self.steps += 1;
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.steps = 0;
        self.env.reset()
    }

    fn action_space(&self) -> Self::ActSpace {
        self.env.action_space()
    }

    fn state_space(&self) -> Self::StateSpace {
        self.env.state_space()
    }
}
