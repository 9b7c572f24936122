//! Wrapper reshaping the reward.
use crate::Env;
use anyhow::Result;

/// Returns a function clamping rewards into `[lo, hi]`.
pub fn clip(lo: f32, hi: f32) -> impl Fn(f32) -> f32 + Clone + Send + Sync {
    move |r| r.max(lo).min(hi)
}

/// Sign of the reward: `-1`, `0` or `1`.
pub fn sign(r: f32) -> f32 {
    if r == 0.0 {
        0.0
    } else {
        r.signum()
    }
}

/// Exposes `reshape(inner.reward())` as the reward.
///
/// [`Env::original_reward`] still returns the untouched reward of the inner
/// environment, so that hooks can observe both signals.
pub struct OverrideReward<E, F> {
    env: E,
    reshape: F,
}

impl<E, F> OverrideReward<E, F> {
    /// Wraps `env`.
    pub fn new(env: E, reshape: F) -> Self {
        Self { env, reshape }
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

impl<E, F> Env for OverrideReward<E, F>
where
    E: Env,
    F: Fn(E::Reward) -> E::Reward,
{
    type State = E::State;
    type Act = E::Act;
    type Reward = E::Reward;
    type Terminal = E::Terminal;
    type ActSpace = E::ActSpace;
    type StateSpace = E::StateSpace;

    fn state(&self) -> Result<Self::State> {
        self.env.state()
    }

    fn reward(&self) -> Self::Reward {
        (self.reshape)(self.env.reward())
    }

    fn original_reward(&self) -> Self::Reward {
        self.env.original_reward()
    }

    fn is_terminated(&self) -> Self::Terminal {
        self.env.is_terminated()
    }

    fn act(&mut self, act: &Self::Act) -> Result<()> {
        self.env.act(act)
    }

    fn reset(&mut self) -> Result<()> {
        self.env.reset()
    }

    fn action_space(&self) -> Self::ActSpace {
        self.env.action_space()
    }

    fn state_space(&self) -> Self::StateSpace {
        self.env.state_space()
    }
}
