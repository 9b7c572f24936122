//! Observers of the run loop.
//!
//! A [`Hook`] is called by [`Runner`](crate::Runner) at every [`Stage`] of an
//! experiment. Hooks never alter the environment; they read it, keep their own
//! statistics and may fail, which aborts the run.
mod base;
mod composed;
mod periodic;
mod tracker;
pub use base::{Hook, Stage};
pub use composed::ComposedHook;
pub use periodic::{EveryNEpisodes, EveryNSteps};
pub use tracker::{
    StepsPerEpisode, TotalBatchOriginalRewardPerEpisode, TotalOriginalRewardPerEpisode,
    TotalRewardPerEpisode,
};
