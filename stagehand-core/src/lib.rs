#![warn(missing_docs)]
//! Environment composition and hook-driven run loops for reinforcement learning.
//!
//! * [`space`]: domains of legal actions and states.
//! * [`Env`]: the capability every environment and wrapper implements.
//! * [`wrapper`]: decorators altering one aspect of an environment.
//! * [`batch`]: independent replicas stepped as one environment.
//! * [`hook`]: observers reacting to the stages of an experiment.
//! * [`Runner`]: the loop driving a [`Policy`] on an [`Env`].
pub mod batch;
pub mod dummy;
pub mod error;
pub mod hook;
pub mod space;
pub mod wrapper;

mod base;
pub use base::{Env, Policy, RandomPolicy, Terminal};

mod runner;
pub use runner::{
    Progress, Runner, RunnerConfig, StopAfterEpisode, StopAfterStep, StopCondition,
};
