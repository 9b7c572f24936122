//! Batched environment.
use super::BatchEnvConfig;
use crate::{error::StagehandError, space::BatchSpace, Env};
use anyhow::{Context, Result};
use log::{debug, trace};
use ndarray::{ArrayD, Axis};
use rayon::prelude::*;

/// Outcome of a step of a single replica.
struct ReplicaStep {
    reward: f32,
    original_reward: f32,
    terminal: bool,
    reset: Result<()>,
}

/// Applies an action to a replica and resets it if the episode ended.
///
/// Reward and termination are read before the reset, so they describe the
/// transition that was just made. A failing reset does not discard them.
fn step_replica<E>(env: &mut E, act: &E::Act) -> Result<ReplicaStep>
where
    E: Env<Reward = f32, Terminal = bool>,
{
    env.act(act)?;
    let reward = env.reward();
    let original_reward = env.original_reward();
    let terminal = env.is_terminated();
    let reset = if terminal {
        trace!("Replica terminated, starting a new episode");
        env.reset()
    } else {
        Ok(())
    };
    Ok(ReplicaStep {
        reward,
        original_reward,
        terminal,
        reset,
    })
}

/// A fixed-size batch of independent environments exposed as one environment.
///
/// * [`Env::state`] stacks the replica states along a new leading axis.
/// * [`Env::reward`], [`Env::original_reward`] and [`Env::is_terminated`] return one
///   entry per replica, in replica order, describing the last transition of each
///   replica.
/// * [`Env::act`] takes one action per replica. Every replica whose episode ended
///   in that step is reset before the call returns, so the batch can always be
///   stepped again.
///
/// Replicas never share state. With [`BatchEnvConfig::parallel`] they are stepped
/// on the rayon thread pool; results are the same as stepping them one by one.
pub struct BatchEnv<E> {
    envs: Vec<E>,
    rewards: Vec<f32>,
    original_rewards: Vec<f32>,
    terminals: Vec<bool>,
    parallel: bool,
}

impl<E> BatchEnv<E> {
    /// Builds a batch from already configured replicas.
    pub fn build(envs: Vec<E>, config: &BatchEnvConfig) -> Result<Self> {
        if envs.is_empty() {
            return Err(StagehandError::EmptyBatch.into());
        }
        let n = envs.len();
        debug!("Build a batch of {} replicas (parallel = {})", n, config.parallel);

        Ok(Self {
            envs,
            rewards: vec![0.0; n],
            original_rewards: vec![0.0; n],
            terminals: vec![false; n],
            parallel: config.parallel,
        })
    }

    /// The number of replicas.
    pub fn n_replicas(&self) -> usize {
        self.envs.len()
    }

    /// The replicas, in order.
    pub fn replicas(&self) -> &[E] {
        &self.envs
    }

    /// Unwraps the replicas.
    pub fn into_replicas(self) -> Vec<E> {
        self.envs
    }
}

impl<E> BatchEnv<E>
where
    E: Env<Reward = f32, Terminal = bool> + Send,
    E::Act: Sync,
{
    /// Steps every replica with its own action and returns the outcome of each one.
    ///
    /// A failing replica does not prevent the others from being stepped. If its step
    /// fails, its entries in the reward and termination arrays keep their previous
    /// values. If the step succeeds and the following reset fails, the entries describe
    /// that step and the outcome is the reset error. Only a wrong number of actions
    /// fails the call as a whole.
    pub fn act_each(&mut self, acts: &[E::Act]) -> Result<Vec<Result<()>>> {
        if acts.len() != self.envs.len() {
            return Err(StagehandError::ActionCount {
                expected: self.envs.len(),
                got: acts.len(),
            }
            .into());
        }

        let steps: Vec<Result<ReplicaStep>> = if self.parallel {
            self.envs
                .par_iter_mut()
                .zip(acts.par_iter())
                .map(|(env, act)| step_replica(env, act))
                .collect()
        } else {
            self.envs
                .iter_mut()
                .zip(acts.iter())
                .map(|(env, act)| step_replica(env, act))
                .collect()
        };

        Ok(steps
            .into_iter()
            .enumerate()
            .map(|(i, step)| {
                let step = step?;
                self.rewards[i] = step.reward;
                self.original_rewards[i] = step.original_reward;
                self.terminals[i] = step.terminal;
                step.reset
            })
            .collect())
    }
}

impl<E, T> Env for BatchEnv<E>
where
    E: Env<State = ArrayD<T>, Reward = f32, Terminal = bool> + Send,
    E::Act: Sync,
    T: Clone,
{
    type State = ArrayD<T>;
    type Act = Vec<E::Act>;
    type Reward = Vec<f32>;
    type Terminal = Vec<bool>;
    type ActSpace = BatchSpace<E::ActSpace>;
    type StateSpace = BatchSpace<E::StateSpace>;

    fn state(&self) -> Result<Self::State> {
        let states = self
            .envs
            .iter()
            .enumerate()
            .map(|(index, env)| {
                env.state()
                    .with_context(|| StagehandError::Replica { index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let views = states.iter().map(|s| s.view()).collect::<Vec<_>>();
        Ok(ndarray::stack(Axis(0), &views)?)
    }

    fn reward(&self) -> Vec<f32> {
        self.rewards.clone()
    }

    fn original_reward(&self) -> Vec<f32> {
        self.original_rewards.clone()
    }

    fn is_terminated(&self) -> Vec<bool> {
        self.terminals.clone()
    }

    /// Steps every replica; see [`BatchEnv::act_each`].
    ///
    /// Returns the error of the first failing replica after all replicas have been
    /// stepped. The error carries [`StagehandError::Replica`] as context; the error
    /// raised by the replica stays reachable with `downcast_ref`.
    fn act(&mut self, acts: &Vec<E::Act>) -> Result<()> {
        for (index, outcome) in self.act_each(acts)?.into_iter().enumerate() {
            outcome.with_context(|| StagehandError::Replica { index })?;
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        debug!("Reset all {} replicas", self.envs.len());
        for (index, env) in self.envs.iter_mut().enumerate() {
            env.reset()
                .with_context(|| StagehandError::Replica { index })?;
        }
        self.rewards.iter_mut().for_each(|r| *r = 0.0);
        self.original_rewards.iter_mut().for_each(|r| *r = 0.0);
        self.terminals.iter_mut().for_each(|t| *t = false);
        Ok(())
    }

    fn action_space(&self) -> Self::ActSpace {
        BatchSpace::new(self.envs[0].action_space(), self.envs.len())
    }

    fn state_space(&self) -> Self::StateSpace {
        BatchSpace::new(self.envs[0].state_space(), self.envs.len())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        dummy::{CountingEnv, CountingEnvConfig},
        space::Space,
        wrapper::{clip, OverrideReward},
    };
    use ndarray::arr2;
    use test_log::test;

    #[derive(thiserror::Error, Debug)]
    #[error("reset failed")]
    struct ResetFailed;

    /// A counting environment whose resets can be made to fail.
    struct ResetFails {
        env: CountingEnv,
        fail: bool,
    }

    impl ResetFails {
        fn new(episode_len: usize, fail: bool) -> Self {
            let config = CountingEnvConfig::default().episode_len(episode_len);
            Self {
                env: CountingEnv::build(&config).unwrap(),
                fail,
            }
        }
    }

    impl Env for ResetFails {
        type State = ArrayD<f32>;
        type Act = i64;
        type Reward = f32;
        type Terminal = bool;
        type ActSpace = crate::space::DiscreteSpace;
        type StateSpace = Vec<usize>;

        fn state(&self) -> Result<ArrayD<f32>> {
            self.env.state()
        }
        fn reward(&self) -> f32 {
            self.env.reward()
        }
        fn is_terminated(&self) -> bool {
            self.env.is_terminated()
        }
        fn act(&mut self, act: &i64) -> Result<()> {
            self.env.act(act)
        }
        fn reset(&mut self) -> Result<()> {
            if self.fail {
                return Err(ResetFailed.into());
            }
            self.env.reset()
        }
        fn action_space(&self) -> Self::ActSpace {
            self.env.action_space()
        }
        fn state_space(&self) -> Vec<usize> {
            self.env.state_space()
        }
    }

    fn replicas(episode_lens: &[usize]) -> Vec<CountingEnv> {
        episode_lens
            .iter()
            .map(|&n| CountingEnv::build(&CountingEnvConfig::default().episode_len(n)).unwrap())
            .collect()
    }

    fn batch(episode_lens: &[usize], parallel: bool) -> BatchEnv<CountingEnv> {
        let config = BatchEnvConfig::default().parallel(parallel);
        BatchEnv::build(replicas(episode_lens), &config).unwrap()
    }

    fn check_step_and_reset(parallel: bool) -> Result<()> {
        let mut env = batch(&[1, 2, 3], parallel);
        assert_eq!(env.n_replicas(), 3);

        env.act(&vec![1, 2, 1])?;
        assert_eq!(env.reward(), vec![1.0, 2.0, 1.0]);
        assert_eq!(env.is_terminated(), vec![true, false, false]);

        // Replica 0 has been reset: t = 0 in its second episode.
        let state = env.state()?;
        assert_eq!(state.shape(), &[3, 2]);
        assert_eq!(
            state,
            arr2(&[[0.0f32, 1.0], [1.0, 0.0], [1.0, 0.0]]).into_dyn()
        );

        // Every replica is steppable again, including the terminated one.
        env.act(&vec![2, 1, 2])?;
        assert_eq!(env.reward(), vec![2.0, 1.0, 2.0]);
        assert_eq!(env.is_terminated(), vec![true, true, false]);
        assert_eq!(env.replicas()[1].episode(), 1);
        assert_eq!(env.replicas()[2].t(), 2);
        Ok(())
    }

    #[test]
    fn test_step_and_reset_sequential() -> Result<()> {
        check_step_and_reset(false)
    }

    #[test]
    fn test_step_and_reset_parallel() -> Result<()> {
        check_step_and_reset(true)
    }

    #[test]
    fn test_parallel_matches_sequential() -> Result<()> {
        let mut seq = batch(&[2, 3, 5, 7], false);
        let mut par = batch(&[2, 3, 5, 7], true);
        for i in 0..20 {
            let acts = (0..4).map(|j| 1 + ((i + j) % 2) as i64).collect::<Vec<_>>();
            seq.act(&acts)?;
            par.act(&acts)?;
            assert_eq!(seq.reward(), par.reward());
            assert_eq!(seq.is_terminated(), par.is_terminated());
            assert_eq!(seq.state()?, par.state()?);
        }
        Ok(())
    }

    #[test]
    fn test_failing_replica_does_not_abort_the_batch() -> Result<()> {
        let mut envs = replicas(&[5, 5, 5]);
        envs[1] = CountingEnv::build(&CountingEnvConfig::default().episode_len(5).fail_at(1))?;
        let mut env = BatchEnv::build(envs, &BatchEnvConfig::default())?;

        let outcomes = env.act_each(&[2, 2, 2])?;
        assert!(outcomes[0].is_ok());
        assert!(outcomes[1].is_err());
        assert!(outcomes[2].is_ok());
        assert_eq!(env.reward(), vec![2.0, 0.0, 2.0]);

        let err = env.act(&vec![1, 1, 1]).unwrap_err();
        match err.downcast_ref::<StagehandError>() {
            Some(StagehandError::Replica { index, .. }) => assert_eq!(*index, 1),
            e => panic!("unexpected error: {:?}", e),
        }
        assert_eq!(env.replicas()[0].t(), 2);
        assert_eq!(env.replicas()[2].t(), 2);
        Ok(())
    }

    #[test]
    fn test_wrong_number_of_actions() {
        let mut env = batch(&[1, 1, 1], false);
        let err = env.act(&vec![1, 1]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StagehandError>(),
            Some(StagehandError::ActionCount {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let envs: Vec<CountingEnv> = vec![];
        assert!(BatchEnv::build(envs, &BatchEnvConfig::default()).is_err());
    }

    #[test]
    fn test_compound_spaces() {
        let env = batch(&[1, 1, 1], false);
        let space = env.action_space();
        assert_eq!(space.n(), 3);
        assert_eq!(space.len(), 8);
        assert!(space.contains(&vec![1, 2, 1]));
        assert!(!space.contains(&vec![1, 2]));
        assert_eq!(env.state_space().space(), &vec![2]);
    }

    #[test]
    fn test_original_rewards_of_wrapped_replicas() -> Result<()> {
        let envs = replicas(&[4, 4])
            .into_iter()
            .map(|env| OverrideReward::new(env, clip(-1.0, 1.0)))
            .collect();
        let mut env = BatchEnv::build(envs, &BatchEnvConfig::default())?;
        env.act(&vec![2, 1])?;
        assert_eq!(env.reward(), vec![1.0, 1.0]);
        assert_eq!(env.original_reward(), vec![2.0, 1.0]);
        Ok(())
    }

    #[test]
    fn test_reset_clears_the_arrays() -> Result<()> {
        let mut env = batch(&[1, 3], false);
        env.act(&vec![2, 2])?;
        env.reset()?;
        assert_eq!(env.reward(), vec![0.0, 0.0]);
        assert_eq!(env.is_terminated(), vec![false, false]);
        assert_eq!(env.replicas()[1].t(), 0);
        Ok(())
    }

    #[test]
    fn test_failed_reset_keeps_the_step() -> Result<()> {
        let envs = vec![ResetFails::new(1, true)];
        let mut env = BatchEnv::build(envs, &BatchEnvConfig::default())?;

        let outcomes = env.act_each(&[2])?;
        assert!(outcomes[0].as_ref().unwrap_err().is::<ResetFailed>());
        assert_eq!(env.reward(), vec![2.0]);
        assert_eq!(env.original_reward(), vec![2.0]);
        assert_eq!(env.is_terminated(), vec![true]);
        assert_eq!(env.replicas()[0].env.t(), 1);
        Ok(())
    }

    #[test]
    fn test_replica_errors_stay_downcastable() -> Result<()> {
        let envs = vec![ResetFails::new(3, false), ResetFails::new(1, true)];
        let mut env = BatchEnv::build(envs, &BatchEnvConfig::default().parallel(true))?;

        let err = env.act(&vec![1, 1]).unwrap_err();
        assert!(err.downcast_ref::<ResetFailed>().is_some());
        match err.downcast_ref::<StagehandError>() {
            Some(StagehandError::Replica { index }) => assert_eq!(*index, 1),
            e => panic!("unexpected error: {:?}", e),
        }
        assert_eq!(env.is_terminated(), vec![false, true]);
        assert_eq!(env.replicas()[0].env.t(), 1);
        Ok(())
    }
}
