//! Wrapper applying a pipeline of pure functions to the state.
use crate::Env;
use anyhow::Result;

/// A pure function on states.
///
/// Closures `Fn(S) -> Result<O>` are transforms. Transforms of different types are
/// chained with [`StateTransformExt::then`]; transforms keeping the type of the
/// state can also be collected in a [`Pipeline`].
pub trait StateTransform<S> {
    /// Output of the transform.
    type Output;

    /// Applies the transform.
    fn apply(&self, state: S) -> Result<Self::Output>;
}

impl<S, O, F> StateTransform<S> for F
where
    F: Fn(S) -> Result<O>,
{
    type Output = O;

    fn apply(&self, state: S) -> Result<O> {
        self(state)
    }
}

/// Two transforms applied one after the other.
#[derive(Debug, Clone)]
pub struct Then<A, B> {
    first: A,
    second: B,
}

impl<S, A, B> StateTransform<S> for Then<A, B>
where
    A: StateTransform<S>,
    B: StateTransform<A::Output>,
{
    type Output = B::Output;

    fn apply(&self, state: S) -> Result<B::Output> {
        self.second.apply(self.first.apply(state)?)
    }
}

/// Chaining of transforms.
pub trait StateTransformExt<S>: StateTransform<S> + Sized {
    /// Applies `next` to the output of this transform.
    fn then<B: StateTransform<Self::Output>>(self, next: B) -> Then<Self, B> {
        Then {
            first: self,
            second: next,
        }
    }
}

impl<S, T: StateTransform<S>> StateTransformExt<S> for T {}

/// An ordered list of transforms keeping the type of the state.
pub struct Pipeline<S> {
    stages: Vec<Box<dyn Fn(S) -> Result<S> + Send + Sync>>,
}

impl<S> Default for Pipeline<S> {
    fn default() -> Self {
        Self { stages: Vec::new() }
    }
}

impl<S> Pipeline<S> {
    /// An empty pipeline, returning states unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage at the end of the pipeline.
    pub fn push(mut self, f: impl Fn(S) -> Result<S> + Send + Sync + 'static) -> Self {
        self.stages.push(Box::new(f));
        self
    }

    /// The number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the pipeline has no stage.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl<S> StateTransform<S> for Pipeline<S> {
    type Output = S;

    fn apply(&self, state: S) -> Result<S> {
        self.stages.iter().try_fold(state, |s, f| f(s))
    }
}

/// Exposes the output of a transform applied to the inner state.
///
/// The transform runs on every [`Env::state`] call; put a
/// [`CacheState`](super::CacheState) above this wrapper to compute it once per step.
/// The declared state space is derived from the inner state space by
/// `state_space_fn` and is not enforced.
pub struct TransformState<E, T, F> {
    env: E,
    transform: T,
    state_space_fn: F,
}

impl<E, T, F> TransformState<E, T, F> {
    /// Wraps `env`.
    pub fn new(env: E, transform: T, state_space_fn: F) -> Self {
        Self {
            env,
            transform,
            state_space_fn,
        }
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

impl<E, T, F, SS> Env for TransformState<E, T, F>
where
    E: Env,
    T: StateTransform<E::State>,
    F: Fn(&E::StateSpace) -> SS,
{
    type State = T::Output;
    type Act = E::Act;
    type Reward = E::Reward;
    type Terminal = E::Terminal;
    type ActSpace = E::ActSpace;
    type StateSpace = SS;

    fn state(&self) -> Result<Self::State> {
        self.transform.apply(self.env.state()?)
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
        self.env.act(act)
    }

    fn reset(&mut self) -> Result<()> {
        self.env.reset()
    }

    fn action_space(&self) -> Self::ActSpace {
        self.env.action_space()
    }

    fn state_space(&self) -> SS {
        (self.state_space_fn)(&self.env.state_space())
    }
}
