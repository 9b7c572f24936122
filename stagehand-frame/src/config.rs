//! Standard preprocessing chain of pixel environments.
use crate::{Grayscale, ImageResize, ImageSpace, ResizeFilter, ResizeFrame, StackFrames, ToFloat};
use anyhow::Result;
use log::info;
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use stagehand_core::{
    wrapper::{clip, CacheState, OverrideReward, StateTransformExt, Then, TransformState},
    Env,
};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Transforms applied to every raw frame: grayscale, resize, conversion to `f32`.
pub type FramePipeline = Then<Then<Grayscale, ResizeFrame<ImageResize>>, ToFloat>;

/// Maps the raw state space to the state space after [`FramePipeline`].
pub type FrameSpaceFn = Box<dyn Fn(&ImageSpace) -> ImageSpace + Send + Sync>;

/// Reshapes rewards.
pub type RewardFn = Box<dyn Fn(f32) -> f32 + Send + Sync>;

/// A raw pixel environment wrapped by [`wrap_frames`].
pub type FrameEnv<E> = OverrideReward<
    StackFrames<CacheState<TransformState<E, FramePipeline, FrameSpaceFn>>, f32>,
    RewardFn,
>;

/// Configuration of the preprocessing chain built by [`wrap_frames`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct FrameConfig {
    /// Height of frames after resizing.
    pub height: usize,

    /// Width of frames after resizing.
    pub width: usize,

    /// The number of stacked frames.
    pub n_stack: usize,

    /// Filter used for resizing.
    pub filter: ResizeFilter,

    /// If `true`, rewards are clipped to `[-1, 1]`.
    pub clip_reward: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            height: 84,
            width: 84,
            n_stack: 4,
            filter: ResizeFilter::Triangle,
            clip_reward: true,
        }
    }
}

impl FrameConfig {
    /// Sets the size of frames after resizing.
    pub fn size(mut self, height: usize, width: usize) -> Self {
        self.height = height;
        self.width = width;
        self
    }

    /// Sets the number of stacked frames.
    pub fn n_stack(mut self, v: usize) -> Self {
        self.n_stack = v;
        self
    }

    /// Sets the resize filter.
    pub fn filter(mut self, v: ResizeFilter) -> Self {
        self.filter = v;
        self
    }

    /// Sets if rewards are clipped.
    pub fn clip_reward(mut self, v: bool) -> Self {
        self.clip_reward = v;
        self
    }

    /// Constructs [`FrameConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`FrameConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Wraps a raw RGB environment as
/// `OverrideReward(StackFrames(CacheState(TransformState(env))))`.
///
/// * [`TransformState`] converts every frame to grayscale, resizes it and maps it to
///   `[0, 1]`.
/// * [`CacheState`] runs that pipeline at most once per step.
/// * [`StackFrames`] keeps the last `n_stack` processed frames.
/// * [`OverrideReward`] clips rewards if `clip_reward` is set; the unclipped reward
///   stays available as [`Env::original_reward`].
pub fn wrap_frames<E>(env: E, config: &FrameConfig) -> Result<FrameEnv<E>>
where
    E: Env<State = ArrayD<u8>, Reward = f32, StateSpace = ImageSpace>,
{
    info!(
        "Wrap frames: {}x{}, {} stacked, {:?} filter, clip_reward = {}",
        config.height, config.width, config.n_stack, config.filter, config.clip_reward
    );
    let resize = ResizeFrame::new(ImageResize::new(config.filter), config.height, config.width)?;
    let to_float = ToFloat::default();

    let space_fn: FrameSpaceFn = {
        let resize = resize.clone();
        Box::new(move |space: &ImageSpace| {
            to_float.state_space(&resize.state_space(&Grayscale.state_space(space)))
        })
    };
    let pipeline: FramePipeline = StateTransformExt::<ArrayD<u8>>::then(
        StateTransformExt::<ArrayD<u8>>::then(Grayscale, resize),
        to_float,
    );

    let env = CacheState::new(TransformState::new(env, pipeline, space_fn));
    let env = StackFrames::new(env, config.n_stack)?;
    let reshape: RewardFn = if config.clip_reward {
        Box::new(clip(-1.0, 1.0))
    } else {
        Box::new(|r: f32| r)
    };
    Ok(OverrideReward::new(env, reshape))
}
