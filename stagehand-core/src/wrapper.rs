//! Environment wrappers.
//!
//! A wrapper owns exactly one inner environment and implements [`Env`] itself,
//! altering one aspect of the observable behavior and forwarding the rest.
//! Wrappers are composed by plain construction; the order matters. A typical chain
//! for pixel games is `OverrideReward(CacheState(TransformState(raw)))`,
//! where the cache sits above the transform so that the transformed state is
//! what gets memoized.
//!
//! [`Env`]: crate::Env
mod cache_state;
mod override_reward;
mod time_limit;
mod transform_state;
pub use cache_state::CacheState;
pub use override_reward::{clip, sign, OverrideReward};
pub use time_limit::TimeLimit;
pub use transform_state::{Pipeline, StateTransform, StateTransformExt, Then, TransformState};
