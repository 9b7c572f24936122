//! Composite hook.
use super::{Hook, Stage};
use anyhow::Result;

/// Dispatches every event to its children, in order.
///
/// Children are either a `Vec` of hooks of one type, or a tuple of up to six hooks
/// of different types. A composite is itself a hook, so composites nest. The first
/// failing child aborts the dispatch and its error is returned.
///
/// ```
/// use stagehand_core::{
///     dummy::{CountingEnv, CountingEnvConfig},
///     hook::{ComposedHook, Hook, Stage, StepsPerEpisode, TotalOriginalRewardPerEpisode},
///     Env,
/// };
///
/// let mut env = CountingEnv::build(&CountingEnvConfig::default().episode_len(1)).unwrap();
/// let mut hook = ComposedHook::new((
///     TotalOriginalRewardPerEpisode::default(),
///     StepsPerEpisode::default(),
/// ));
///
/// env.act(&2).unwrap();
/// hook.call(Stage::PostAct, 1, &(), &env).unwrap();
/// hook.call(Stage::PostEpisode, 1, &(), &env).unwrap();
///
/// let (rewards, steps) = hook.hooks();
/// assert_eq!(rewards.history(), &[2.0]);
/// assert_eq!(steps.history(), &[1]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ComposedHook<T> {
    hooks: T,
}

impl<T> ComposedHook<T> {
    /// Composes `hooks`.
    pub fn new(hooks: T) -> Self {
        Self { hooks }
    }

    /// The children.
    pub fn hooks(&self) -> &T {
        &self.hooks
    }

    /// The children.
    pub fn hooks_mut(&mut self) -> &mut T {
        &mut self.hooks
    }

    /// Unwraps the children.
    pub fn into_inner(self) -> T {
        self.hooks
    }
}

impl<P: ?Sized, E: ?Sized, H: Hook<P, E>> Hook<P, E> for ComposedHook<Vec<H>> {
    fn call(&mut self, stage: Stage, step: usize, policy: &P, env: &E) -> Result<()> {
        for hook in self.hooks.iter_mut() {
            hook.call(stage, step, policy, env)?;
        }
        Ok(())
    }
}

macro_rules! impl_hook_for_tuple {
    ($($h:ident : $i:tt),+) => {
        impl<P: ?Sized, E: ?Sized, $($h: Hook<P, E>),+> Hook<P, E> for ComposedHook<($($h,)+)> {
            fn call(&mut self, stage: Stage, step: usize, policy: &P, env: &E) -> Result<()> {
                $(self.hooks.$i.call(stage, step, policy, env)?;)+
                Ok(())
            }
        }
    };
}

impl_hook_for_tuple!(A: 0);
impl_hook_for_tuple!(A: 0, B: 1);
impl_hook_for_tuple!(A: 0, B: 1, C: 2);
impl_hook_for_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_hook_for_tuple!(A: 0, B: 1, C: 2, D: 3, F: 4);
impl_hook_for_tuple!(A: 0, B: 1, C: 2, D: 3, F: 4, G: 5);
