//! This module is used for tests.
use crate::{error::StagehandError, space::DiscreteSpace, Env};
use anyhow::{anyhow, Result};
use ndarray::{arr1, ArrayD};
use serde::{Deserialize, Serialize};
use std::cell::Cell;

/// Configuration of [`CountingEnv`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountingEnvConfig {
    /// The number of steps of every episode.
    pub episode_len: usize,

    /// The number of actions, `1..=n_actions`.
    pub n_actions: i64,

    /// If set, [`CountingEnv::act`] fails at this global step (1-based).
    pub fail_at: Option<usize>,
}

impl Default for CountingEnvConfig {
    fn default() -> Self {
        Self {
            episode_len: 3,
            n_actions: 2,
            fail_at: None,
        }
    }
}

impl CountingEnvConfig {
    /// Sets the episode length.
    pub fn episode_len(mut self, v: usize) -> Self {
        self.episode_len = v;
        self
    }

    /// Sets the number of actions.
    pub fn n_actions(mut self, v: i64) -> Self {
        self.n_actions = v;
        self
    }

    /// Makes the environment fail at the given global step.
    pub fn fail_at(mut self, v: usize) -> Self {
        self.fail_at = Some(v);
        self
    }
}

/// A deterministic environment counting its steps.
///
/// * The state is `[t, episode]`, where `t` is the step in the current episode.
/// * The reward of a transition is the applied action.
/// * Every episode terminates after `episode_len` steps.
pub struct CountingEnv {
    config: CountingEnvConfig,
    act_space: DiscreteSpace,
    t: usize,
    episode: usize,
    steps: usize,
    reward: f32,
    terminated: bool,
    state_reads: Cell<usize>,
}

impl CountingEnv {
    /// Builds the environment.
    pub fn build(config: &CountingEnvConfig) -> Result<Self> {
        Ok(Self {
            act_space: DiscreteSpace::new(config.n_actions)?,
            config: config.clone(),
            t: 0,
            episode: 0,
            steps: 0,
            reward: 0.0,
            terminated: false,
            state_reads: Cell::new(0),
        })
    }

    /// The number of times [`Env::state`] was called.
    pub fn state_reads(&self) -> usize {
        self.state_reads.get()
    }

    /// The number of finished resets.
    pub fn episode(&self) -> usize {
        self.episode
    }

    /// Step in the current episode.
    pub fn t(&self) -> usize {
        self.t
    }
}

impl Env for CountingEnv {
    type State = ArrayD<f32>;
    type Act = i64;
    type Reward = f32;
    type Terminal = bool;
    type ActSpace = DiscreteSpace;
    type StateSpace = Vec<usize>;

    fn state(&self) -> Result<Self::State> {
        self.state_reads.set(self.state_reads.get() + 1);
        Ok(arr1(&[self.t as f32, self.episode as f32]).into_dyn())
    }

    fn reward(&self) -> f32 {
        self.reward
    }

    fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn act(&mut self, act: &i64) -> Result<()> {
        if self.terminated {
            return Err(StagehandError::EpisodeOver.into());
        }
        if self.config.fail_at == Some(self.steps + 1) {
            return Err(anyhow!("counting env failed at step {}", self.steps + 1));
        }
        self.steps += 1;
        self.t += 1;
        self.reward = *act as f32;
        self.terminated = self.t >= self.config.episode_len;
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.episode += 1;
        self.t = 0;
        self.reward = 0.0;
        self.terminated = false;
        Ok(())
    }

    fn action_space(&self) -> DiscreteSpace {
        self.act_space
    }

    fn state_space(&self) -> Vec<usize> {
        vec![2]
    }
}
