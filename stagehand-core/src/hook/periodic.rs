//! Periodic hooks.
use super::{Hook, Stage};
use crate::error::StagehandError;
use anyhow::Result;

/// Calls `f(step, policy, env)` after every `n`-th transition.
///
/// The closure runs at [`Stage::PostAct`] whenever the step count is a multiple
/// of `n`, so it sees the state produced by that transition.
pub struct EveryNSteps<F> {
    n: usize,
    f: F,
}

impl<F> EveryNSteps<F> {
    /// Builds the hook. Fails if `n == 0`.
    pub fn new<P: ?Sized, E: ?Sized>(n: usize, f: F) -> Result<Self>
    where
        F: FnMut(usize, &P, &E) -> Result<()>,
    {
        if n == 0 {
            return Err(StagehandError::ZeroPeriod.into());
        }
        Ok(Self { n, f })
    }

    /// The period.
    pub fn period(&self) -> usize {
        self.n
    }
}

impl<P: ?Sized, E: ?Sized, F> Hook<P, E> for EveryNSteps<F>
where
    F: FnMut(usize, &P, &E) -> Result<()>,
{
    fn call(&mut self, stage: Stage, step: usize, policy: &P, env: &E) -> Result<()> {
        if stage == Stage::PostAct && step % self.n == 0 {
            (self.f)(step, policy, env)?;
        }
        Ok(())
    }
}

/// Calls `f(episode, policy, env)` at the end of every `n`-th episode.
///
/// Episodes are counted from the [`Stage::PostEpisode`] events the hook receives;
/// `episode` is that count.
pub struct EveryNEpisodes<F> {
    n: usize,
    episodes: usize,
    f: F,
}

impl<F> EveryNEpisodes<F> {
    /// Builds the hook. Fails if `n == 0`.
    pub fn new<P: ?Sized, E: ?Sized>(n: usize, f: F) -> Result<Self>
    where
        F: FnMut(usize, &P, &E) -> Result<()>,
    {
        if n == 0 {
            return Err(StagehandError::ZeroPeriod.into());
        }
        Ok(Self { n, episodes: 0, f })
    }

    /// The period.
    pub fn period(&self) -> usize {
        self.n
    }

    /// The number of episodes seen so far.
    pub fn episodes(&self) -> usize {
        self.episodes
    }
}

impl<P: ?Sized, E: ?Sized, F> Hook<P, E> for EveryNEpisodes<F>
where
    F: FnMut(usize, &P, &E) -> Result<()>,
{
    fn call(&mut self, stage: Stage, _step: usize, policy: &P, env: &E) -> Result<()> {
        if stage == Stage::PostEpisode {
            self.episodes += 1;
            if self.episodes % self.n == 0 {
                (self.f)(self.episodes, policy, env)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dummy::{CountingEnv, CountingEnvConfig};

    const STAGES: [Stage; 6] = [
        Stage::PreExperiment,
        Stage::PreEpisode,
        Stage::PreAct,
        Stage::PostAct,
        Stage::PostEpisode,
        Stage::PostExperiment,
    ];

    #[test]
    fn test_every_n_steps_fires_on_multiples() -> Result<()> {
        let env = CountingEnv::build(&CountingEnvConfig::default())?;
        for n in 1..=4 {
            let mut fired = vec![];
            let mut hook = EveryNSteps::new(n, |step, _: &(), _: &CountingEnv| {
                fired.push(step);
                Ok(())
            })?;
            for step in 1..=3 * n {
                for stage in STAGES.iter() {
                    hook.call(*stage, step, &(), &env)?;
                }
            }
            assert_eq!(fired, vec![n, 2 * n, 3 * n]);
        }
        Ok(())
    }

    #[test]
    fn test_every_n_episodes() -> Result<()> {
        let env = CountingEnv::build(&CountingEnvConfig::default())?;
        let mut fired = vec![];
        let mut hook = EveryNEpisodes::new(2, |episode, _: &(), _: &CountingEnv| {
            fired.push(episode);
            Ok(())
        })?;
        for step in 1..=5 {
            hook.call(Stage::PostAct, step, &(), &env)?;
            hook.call(Stage::PostEpisode, step, &(), &env)?;
        }
        assert_eq!(hook.episodes(), 5);
        assert_eq!(fired, vec![2, 4]);
        Ok(())
    }

    #[test]
    fn test_zero_period_is_rejected() {
        let f = |_: usize, _: &(), _: &CountingEnv| Ok(());
        assert!(EveryNSteps::new(0, f).is_err());
        assert!(EveryNEpisodes::new(0, f).is_err());
    }

    #[test]
    fn test_closure_error_propagates() -> Result<()> {
        let env = CountingEnv::build(&CountingEnvConfig::default())?;
        let mut hook = EveryNSteps::new(2, |step, _: &(), _: &CountingEnv| {
            anyhow::ensure!(step < 4, "step {}", step);
            Ok(())
        })?;
        hook.call(Stage::PostAct, 2, &(), &env)?;
        assert!(hook.call(Stage::PostAct, 4, &(), &env).is_err());
        Ok(())
    }
}
