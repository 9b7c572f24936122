#![warn(missing_docs)]
//! Pixel-frame environments and preprocessing for [`stagehand_core`].
//!
//! * [`CatchEnv`]: a small game rendering RGB frames.
//! * [`Grayscale`], [`ResizeFrame`] and [`ToFloat`]: transforms of frames, used
//!   through [`TransformState`](stagehand_core::wrapper::TransformState).
//! * [`StackFrames`]: a wrapper keeping the most recent frames.
//! * [`wrap_frames`]: the standard chain built from a [`FrameConfig`].
//!
//! Here is a batch of catch games played by a random policy.
//!
//! ```
//! use anyhow::Result;
//! use rand::{rngs::SmallRng, SeedableRng};
//! use stagehand_core::{
//!     batch::{BatchEnv, BatchEnvConfig},
//!     hook::TotalBatchOriginalRewardPerEpisode,
//!     Env, RandomPolicy, Runner, RunnerConfig, StopAfterStep,
//! };
//! use stagehand_frame::{wrap_frames, CatchConfig, CatchEnv, FrameConfig};
//!
//! fn main() -> Result<()> {
//!     let frame_config = FrameConfig::default().size(20, 10).n_stack(2);
//!     let replicas = (0..2)
//!         .map(|seed| wrap_frames(CatchEnv::build(&CatchConfig::default().seed(seed))?, &frame_config))
//!         .collect::<Result<Vec<_>>>()?;
//!     let mut env = BatchEnv::build(replicas, &BatchEnvConfig::default())?;
//!     let mut policy = RandomPolicy::new(env.action_space(), SmallRng::seed_from_u64(42));
//!     let mut hook = TotalBatchOriginalRewardPerEpisode::default();
//!
//!     Runner::build(RunnerConfig::default()).run(
//!         &mut policy,
//!         &mut env,
//!         &mut StopAfterStep(18),
//!         &mut hook,
//!     )?;
//!     assert_eq!(hook.history(0).len(), 2);
//!     Ok(())
//! }
//! ```
mod catch;
mod config;
mod space;
mod stack;
mod transform;
pub use catch::{CatchConfig, CatchEnv};
pub use config::{wrap_frames, FrameConfig, FrameEnv, FramePipeline, FrameSpaceFn, RewardFn};
pub use space::ImageSpace;
pub use stack::StackFrames;
pub use transform::{Grayscale, ImageResize, Resize, ResizeFilter, ResizeFrame, ToFloat};
