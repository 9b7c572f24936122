//! Environment.
use crate::space::Space;
use anyhow::Result;

/// Represents an environment, typically an MDP, or a wrapper around one.
///
/// An environment is read through [`Env::state`], [`Env::reward`] and
/// [`Env::is_terminated`], and advanced by exactly one transition with [`Env::act`].
/// Wrappers implement this trait by holding an inner environment and forwarding
/// every operation they do not alter; errors of the inner environment are never
/// caught on the way.
pub trait Env {
    /// State exposed to policies.
    type State;

    /// Action accepted by [`Env::act`].
    type Act;

    /// Reward of the last transition.
    type Reward: Clone;

    /// Termination flag(s) of the last transition.
    type Terminal: Terminal;

    /// Space of legal actions.
    type ActSpace: Space<Value = Self::Act>;

    /// Description of the states. Used for introspection only.
    type StateSpace;

    /// Returns the current state.
    fn state(&self) -> Result<Self::State>;

    /// Returns the reward of the last transition.
    fn reward(&self) -> Self::Reward;

    /// Returns the reward of the last transition before any reshaping.
    ///
    /// Environments that do not reshape rewards return [`Env::reward`].
    fn original_reward(&self) -> Self::Reward {
        self.reward()
    }

    /// Returns if the last transition ended the episode.
    fn is_terminated(&self) -> Self::Terminal;

    /// Applies an action and advances the environment by one transition.
    fn act(&mut self, act: &Self::Act) -> Result<()>;

    /// Starts a fresh episode.
    fn reset(&mut self) -> Result<()>;

    /// Returns the space of legal actions.
    fn action_space(&self) -> Self::ActSpace;

    /// Returns the description of the states.
    fn state_space(&self) -> Self::StateSpace;
}

/// Termination flags as seen by the run loop.
pub trait Terminal {
    /// Returns `true` if the run loop must close the current episode.
    fn ends_episode(&self) -> bool;
}

impl Terminal for bool {
    fn ends_episode(&self) -> bool {
        *self
    }
}

/// Flags of a batch of replicas.
///
/// Replicas of a batch restart their own episodes, so the run loop never closes
/// an episode on behalf of a batch. Per-replica episode ends are observed by hooks
/// through the flags themselves.
impl Terminal for Vec<bool> {
    fn ends_episode(&self) -> bool {
        false
    }
}
