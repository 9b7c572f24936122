//! Hooks recording per-episode statistics.
use super::{Hook, Stage};
use crate::Env;
use anyhow::Result;

/// Running total of the current episode plus the totals of finished episodes.
#[derive(Debug, Clone, Default)]
struct EpisodeTotal {
    total: f32,
    history: Vec<f32>,
}

impl EpisodeTotal {
    fn flush(&mut self) {
        self.history.push(self.total);
        self.total = 0.0;
    }
}

/// Records the sum of [`Env::original_reward`] over every episode.
///
/// The running total is increased at [`Stage::PostAct`], appended to the history
/// and reset to zero at [`Stage::PostEpisode`].
#[derive(Debug, Clone, Default)]
pub struct TotalOriginalRewardPerEpisode(EpisodeTotal);

impl TotalOriginalRewardPerEpisode {
    /// Total of the current episode.
    pub fn total(&self) -> f32 {
        self.0.total
    }

    /// Totals of finished episodes, oldest first.
    pub fn history(&self) -> &[f32] {
        &self.0.history
    }
}

impl<P: ?Sized, E: Env<Reward = f32> + ?Sized> Hook<P, E> for TotalOriginalRewardPerEpisode {
    fn call(&mut self, stage: Stage, _step: usize, _policy: &P, env: &E) -> Result<()> {
        match stage {
            Stage::PostAct => self.0.total += env.original_reward(),
            Stage::PostEpisode => self.0.flush(),
            _ => {}
        }
        Ok(())
    }
}

/// Records the sum of [`Env::reward`] over every episode.
///
/// Same as [`TotalOriginalRewardPerEpisode`], on the reshaped reward.
#[derive(Debug, Clone, Default)]
pub struct TotalRewardPerEpisode(EpisodeTotal);

impl TotalRewardPerEpisode {
    /// Total of the current episode.
    pub fn total(&self) -> f32 {
        self.0.total
    }

    /// Totals of finished episodes, oldest first.
    pub fn history(&self) -> &[f32] {
        &self.0.history
    }
}

impl<P: ?Sized, E: Env<Reward = f32> + ?Sized> Hook<P, E> for TotalRewardPerEpisode {
    fn call(&mut self, stage: Stage, _step: usize, _policy: &P, env: &E) -> Result<()> {
        match stage {
            Stage::PostAct => self.0.total += env.reward(),
            Stage::PostEpisode => self.0.flush(),
            _ => {}
        }
        Ok(())
    }
}

/// Records the sum of original rewards over every episode of every replica of a batch.
///
/// Replicas end their episodes on their own, so a replica's total is flushed right
/// after the [`Stage::PostAct`] in which its terminal flag is set.
#[derive(Debug, Clone, Default)]
pub struct TotalBatchOriginalRewardPerEpisode {
    replicas: Vec<EpisodeTotal>,
}

impl TotalBatchOriginalRewardPerEpisode {
    /// Totals of the current episodes, one per replica.
    pub fn totals(&self) -> Vec<f32> {
        self.replicas.iter().map(|r| r.total).collect()
    }

    /// Totals of the finished episodes of replica `i`, oldest first.
    pub fn history(&self, i: usize) -> &[f32] {
        self.replicas
            .get(i)
            .map(|r| r.history.as_slice())
            .unwrap_or(&[])
    }

    /// The number of finished episodes over all replicas.
    pub fn n_episodes(&self) -> usize {
        self.replicas.iter().map(|r| r.history.len()).sum()
    }
}

impl<P, E> Hook<P, E> for TotalBatchOriginalRewardPerEpisode
where
    P: ?Sized,
    E: Env<Reward = Vec<f32>, Terminal = Vec<bool>> + ?Sized,
{
    fn call(&mut self, stage: Stage, _step: usize, _policy: &P, env: &E) -> Result<()> {
        if stage != Stage::PostAct {
            return Ok(());
        }
        let rewards = env.original_reward();
        let terminals = env.is_terminated();
        if self.replicas.len() < rewards.len() {
            self.replicas.resize_with(rewards.len(), Default::default);
        }
        for (replica, (r, t)) in self.replicas.iter_mut().zip(rewards.iter().zip(terminals)) {
            replica.total += r;
            if t {
                replica.flush();
            }
        }
        Ok(())
    }
}

/// Records the number of transitions of every episode.
#[derive(Debug, Clone, Default)]
pub struct StepsPerEpisode {
    steps: usize,
    history: Vec<usize>,
}

impl StepsPerEpisode {
    /// Steps of the current episode.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Steps of finished episodes, oldest first.
    pub fn history(&self) -> &[usize] {
        &self.history
    }
}

impl<P: ?Sized, E: ?Sized> Hook<P, E> for StepsPerEpisode {
    fn call(&mut self, stage: Stage, _step: usize, _policy: &P, _env: &E) -> Result<()> {
        match stage {
            Stage::PostAct => self.steps += 1,
            Stage::PostEpisode => {
                self.history.push(self.steps);
                self.steps = 0;
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        batch::{BatchEnv, BatchEnvConfig},
        dummy::{CountingEnv, CountingEnvConfig},
        wrapper::{clip, OverrideReward},
    };

    fn counting(episode_len: usize) -> CountingEnv {
        let config = CountingEnvConfig::default()
            .episode_len(episode_len)
            .n_actions(3);
        CountingEnv::build(&config).unwrap()
    }

    #[test]
    fn test_original_and_reshaped_totals() -> Result<()> {
        let mut env = OverrideReward::new(counting(2), clip(-1.0, 1.0));
        let mut original = TotalOriginalRewardPerEpisode::default();
        let mut reshaped = TotalRewardPerEpisode::default();

        for episode in 0..2 {
            for step in 1..=2 {
                env.act(&3)?;
                original.call(Stage::PostAct, step, &(), &env)?;
                reshaped.call(Stage::PostAct, step, &(), &env)?;
            }
            assert_eq!(original.total(), 6.0);
            original.call(Stage::PostEpisode, 2, &(), &env)?;
            reshaped.call(Stage::PostEpisode, 2, &(), &env)?;
            assert_eq!(original.history().len(), episode + 1);
            env.reset()?;
        }

        assert_eq!(original.history(), &[6.0, 6.0]);
        assert_eq!(reshaped.history(), &[2.0, 2.0]);
        assert_eq!(original.total(), 0.0);
        Ok(())
    }

    #[test]
    fn test_other_stages_are_ignored() -> Result<()> {
        let mut env = counting(5);
        let mut tracker = TotalOriginalRewardPerEpisode::default();
        let mut steps = StepsPerEpisode::default();
        env.act(&2)?;
        for stage in [Stage::PreExperiment, Stage::PreEpisode, Stage::PreAct].iter() {
            tracker.call(*stage, 1, &(), &env)?;
            steps.call(*stage, 1, &(), &env)?;
        }
        assert_eq!(tracker.total(), 0.0);
        assert_eq!(steps.steps(), 0);
        assert!(tracker.history().is_empty());
        Ok(())
    }

    #[test]
    fn test_steps_per_episode() -> Result<()> {
        let env = counting(5);
        let mut hook = StepsPerEpisode::default();
        for len in [3, 1, 2].iter() {
            for step in 0..*len {
                hook.call(Stage::PostAct, step, &(), &env)?;
            }
            hook.call(Stage::PostEpisode, *len, &(), &env)?;
        }
        assert_eq!(hook.history(), &[3, 1, 2]);
        Ok(())
    }

    #[test]
    fn test_batch_totals_per_replica() -> Result<()> {
        let envs = vec![counting(1), counting(2)];
        let mut env = BatchEnv::build(envs, &BatchEnvConfig::default())?;
        let mut hook = TotalBatchOriginalRewardPerEpisode::default();

        for step in 1..=4 {
            env.act(&vec![1, 2])?;
            hook.call(Stage::PostAct, step, &(), &env)?;
        }

        assert_eq!(hook.history(0), &[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(hook.history(1), &[4.0, 4.0]);
        assert_eq!(hook.totals(), vec![0.0, 0.0]);
        assert_eq!(hook.n_episodes(), 6);
        assert!(hook.history(2).is_empty());
        Ok(())
    }
}
