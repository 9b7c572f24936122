//! Wrapper memoizing the state within a step.
use crate::Env;
use anyhow::Result;
use std::cell::RefCell;

/// Remembers the state of the inner environment until the next transition.
///
/// The first [`Env::state`] call after construction, [`Env::act`] or [`Env::reset`]
/// computes the state through the inner environment; later calls return a clone of
/// the remembered value. Results are identical to reading the inner environment
/// directly.
pub struct CacheState<E: Env> {
    env: E,
    cache: RefCell<Option<E::State>>,
}

impl<E: Env> CacheState<E> {
    /// Wraps `env`.
    pub fn new(env: E) -> Self {
        Self {
            env,
            cache: RefCell::new(None),
        }
    }

    /// Returns `true` if a state is remembered.
    pub fn is_cached(&self) -> bool {
        self.cache.borrow().is_some()
    }

    /// The inner environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// The inner environment.
    ///
    /// The remembered state is dropped, as the caller may change the inner state.
    pub fn inner_mut(&mut self) -> &mut E {
        self.cache.get_mut().take();
        &mut self.env
    }

    /// Unwraps the inner environment.
    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E> Env for CacheState<E>
where
    E: Env,
    E::State: Clone,
{
    type State = E::State;
    type Act = E::Act;
    type Reward = E::Reward;
    type Terminal = E::Terminal;
    type ActSpace = E::ActSpace;
    type StateSpace = E::StateSpace;

    fn state(&self) -> Result<Self::State> {
        if let Some(state) = self.cache.borrow().as_ref() {
            return Ok(state.clone());
        }
        let state = self.env.state()?;
        self.cache.replace(Some(state.clone()));
        Ok(state)
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
        self.cache.get_mut().take();
        self.env.act(act)
    }

    fn reset(&mut self) -> Result<()> {
        self.cache.get_mut().take();
        self.env.reset()
    }

    fn action_space(&self) -> Self::ActSpace {
        self.env.action_space()
    }

    fn state_space(&self) -> Self::StateSpace {
        self.env.state_space()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        dummy::{CountingEnv, CountingEnvConfig},
        wrapper::TransformState,
    };
    use ndarray::{arr1, ArrayD};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn env() -> CountingEnv {
        CountingEnv::build(&CountingEnvConfig::default().episode_len(2)).unwrap()
    }

    #[test]
    fn test_state_is_computed_once_per_step() -> Result<()> {
        let n_calls = Arc::new(AtomicUsize::new(0));
        let counter = n_calls.clone();
        let transform = move |s: ArrayD<f32>| -> Result<ArrayD<f32>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(s * 2.0)
        };
        let mut env = CacheState::new(TransformState::new(env(), transform, |_: &Vec<usize>| ()));

        let s1 = env.state()?;
        let s2 = env.state()?;
        assert_eq!(s1, s2);
        assert_eq!(n_calls.load(Ordering::SeqCst), 1);
        assert!(env.is_cached());

        env.act(&1)?;
        assert!(!env.is_cached());
        let s3 = env.state()?;
        assert_eq!(s3, arr1(&[2.0, 0.0]).into_dyn());
        assert_eq!(n_calls.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[test]
    fn test_reset_invalidates_the_cache() -> Result<()> {
        let mut env = CacheState::new(env());
        env.act(&1)?;
        assert_eq!(env.state()?, arr1(&[1.0, 0.0]).into_dyn());
        env.reset()?;
        assert_eq!(env.state()?, arr1(&[0.0, 1.0]).into_dyn());
        assert_eq!(env.inner().state_reads(), 2);
        Ok(())
    }

    #[test]
    fn test_matches_uncached_env() -> Result<()> {
        let mut cached = CacheState::new(env());
        let mut plain = env();
        for a in [1, 2, 1, 2, 2].iter() {
            assert_eq!(cached.state()?, plain.state()?);
            assert_eq!(cached.state()?, plain.state()?);
            if plain.is_terminated() {
                plain.reset()?;
                cached.reset()?;
            }
            plain.act(a)?;
            cached.act(a)?;
            assert_eq!(cached.reward(), plain.reward());
            assert_eq!(cached.is_terminated(), plain.is_terminated());
        }
        Ok(())
    }

    #[test]
    fn test_inner_errors_propagate() -> Result<()> {
        let mut env = CacheState::new(env());
        env.act(&1)?;
        env.act(&1)?;
        assert!(env.act(&1).is_err());
        Ok(())
    }
}
