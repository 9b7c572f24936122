//! Wrapper stacking the most recent frames.
use crate::ImageSpace;
use anyhow::{ensure, Result};
use ndarray::{ArrayD, Axis};
use stagehand_core::{error::StagehandError, Env};

/// Exposes the last `n_stack` states of the inner environment as one array.
///
/// The state has shape `(n_stack, ...)`, where index `0` along the first axis is the
/// most recent frame. Every [`Env::act`] shifts the frames by one position and
/// writes the new inner state at index `0`. [`Env::reset`] fills all positions with
/// the first state of the new episode.
pub struct StackFrames<E, T> {
    env: E,
    n_stack: usize,
    frames: ArrayD<T>,
}

impl<E, T> StackFrames<E, T>
where
    E: Env<State = ArrayD<T>>,
    T: Clone,
{
    /// Wraps `env`, filling the stack with its current state.
    pub fn new(env: E, n_stack: usize) -> Result<Self> {
        if n_stack == 0 {
            return Err(StagehandError::ZeroStack.into());
        }
        let frame = env.state()?;
        let frames = Self::filled(&frame, n_stack)?;
        Ok(Self {
            env,
            n_stack,
            frames,
        })
    }

    /// The number of stacked frames.
    pub fn n_stack(&self) -> usize {
        self.n_stack
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

    fn filled(frame: &ArrayD<T>, n_stack: usize) -> Result<ArrayD<T>> {
        let views = vec![frame.view(); n_stack];
        Ok(ndarray::stack(Axis(0), &views)?)
    }

    /// Shifts frame(j) <- frame(j - 1) for j = n_stack - 1, ..., 1 and writes `frame` at 0.
    fn push(&mut self, frame: &ArrayD<T>) -> Result<()> {
        ensure!(
            frame.shape() == &self.frames.shape()[1..],
            "frame of shape {:?} does not fit a stack of shape {:?}",
            frame.shape(),
            self.frames.shape()
        );
        for j in (1..self.n_stack).rev() {
            let prev = self.frames.index_axis(Axis(0), j - 1).to_owned();
            self.frames.index_axis_mut(Axis(0), j).assign(&prev);
        }
        self.frames.index_axis_mut(Axis(0), 0).assign(frame);
        Ok(())
    }
}

impl<E, T> Env for StackFrames<E, T>
where
    E: Env<State = ArrayD<T>, StateSpace = ImageSpace>,
    T: Clone,
{
    type State = ArrayD<T>;
    type Act = E::Act;
    type Reward = E::Reward;
    type Terminal = E::Terminal;
    type ActSpace = E::ActSpace;
    type StateSpace = ImageSpace;

    fn state(&self) -> Result<ArrayD<T>> {
        Ok(self.frames.clone())
    }

    fn reward(&self) -> Self::Reward {
        self.env.reward()
    }

    fn original_reward(&self) -> Self::Reward {
        self.env.original_reward()
    }

    fn is_terminated(&self) -> Self::Terminal {
        self.env.is_terminated()
    }

    fn act(&mut self, act: &Self::Act) -> Result<()> {
        self.env.act(act)?;
        let frame = self.env.state()?;
        self.push(&frame)
    }

    fn reset(&mut self) -> Result<()> {
        self.env.reset()?;
        let frame = self.env.state()?;
        self.frames = Self::filled(&frame, self.n_stack)?;
        Ok(())
    }

    fn action_space(&self) -> Self::ActSpace {
        self.env.action_space()
    }

    fn state_space(&self) -> ImageSpace {
        let space = self.env.state_space();
        let mut shape = vec![self.n_stack];
        shape.extend_from_slice(space.shape());
        ImageSpace::new(shape, space.low(), space.high())
    }
}
