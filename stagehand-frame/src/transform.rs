//! State transforms on pixel frames.
//!
//! Transforms implement [`StateTransform`] and are meant to be chained with
//! [`StateTransformExt::then`](stagehand_core::wrapper::StateTransformExt::then)
//! inside a [`TransformState`](stagehand_core::wrapper::TransformState) wrapper.
//! Each transform also maps the declared [`ImageSpace`] of its input to the one of
//! its output.
use crate::ImageSpace;
use anyhow::{anyhow, bail, ensure, Result};
use image::{
    imageops::{grayscale, resize, FilterType},
    ImageBuffer, Luma, Rgb,
};
use ndarray::{Array2, ArrayD};
use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};
use stagehand_core::wrapper::StateTransform;
use std::convert::TryFrom;

/// Converts RGB frames of shape `(h, w, 3)` to luma frames of shape `(h, w)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grayscale;

impl Grayscale {
    /// Drops the channel axis.
    pub fn state_space(&self, space: &ImageSpace) -> ImageSpace {
        let shape = space.shape();
        let shape = &shape[..shape.len().saturating_sub(1)];
        ImageSpace::new(shape.to_vec(), space.low(), space.high())
    }
}

impl StateTransform<ArrayD<u8>> for Grayscale {
    type Output = ArrayD<u8>;

    fn apply(&self, frame: ArrayD<u8>) -> Result<ArrayD<u8>> {
        let (h, w) = match frame.shape() {
            [h, w, 3] => (*h, *w),
            shape => bail!("expected an RGB frame of shape (h, w, 3), got {:?}", shape),
        };
        let data = frame.iter().cloned().collect::<Vec<_>>();
        let img = ImageBuffer::<Rgb<u8>, _>::from_raw(u32::try_from(w)?, u32::try_from(h)?, data)
            .ok_or_else(|| anyhow!("failed to build an image of size {}x{}", w, h))?;
        let img: ImageBuffer<Luma<u8>, Vec<u8>> = grayscale(&img);
        Ok(Array2::from_shape_vec((h, w), img.into_raw())?.into_dyn())
    }
}

/// Resizing of grayscale frames.
///
/// The numerical method is left to the implementation; [`ImageResize`] uses the
/// filters of the `image` crate.
pub trait Resize {
    /// Resizes a frame of shape `(h, w)` to `(height, width)`.
    fn resize(&self, frame: &ArrayD<u8>, height: usize, width: usize) -> Result<ArrayD<u8>>;
}

/// Sampling filters of [`ImageResize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeFilter {
    /// Nearest neighbor.
    Nearest,

    /// Linear.
    Triangle,

    /// Cubic.
    CatmullRom,

    /// Gaussian.
    Gaussian,

    /// Lanczos with window 3.
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// [`Resize`] with [`image::imageops::resize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResize {
    filter: ResizeFilter,
}

impl Default for ImageResize {
    fn default() -> Self {
        Self {
            filter: ResizeFilter::Triangle,
        }
    }
}

impl ImageResize {
    /// Resizes with the given filter.
    pub fn new(filter: ResizeFilter) -> Self {
        Self { filter }
    }
}

impl Resize for ImageResize {
    fn resize(&self, frame: &ArrayD<u8>, height: usize, width: usize) -> Result<ArrayD<u8>> {
        let (h, w) = match frame.shape() {
            [h, w] => (*h, *w),
            shape => bail!("expected a frame of shape (h, w), got {:?}", shape),
        };
        let data = frame.iter().cloned().collect::<Vec<_>>();
        let img = ImageBuffer::<Luma<u8>, _>::from_raw(u32::try_from(w)?, u32::try_from(h)?, data)
            .ok_or_else(|| anyhow!("failed to build an image of size {}x{}", w, h))?;
        let img = resize(
            &img,
            u32::try_from(width)?,
            u32::try_from(height)?,
            self.filter.into(),
        );
        Ok(Array2::from_shape_vec((height, width), img.into_raw())?.into_dyn())
    }
}

/// Resizes frames to a fixed size with an injected [`Resize`].
#[derive(Debug, Clone)]
pub struct ResizeFrame<R> {
    resize: R,
    height: usize,
    width: usize,
}

impl<R: Resize> ResizeFrame<R> {
    /// Resizes to `(height, width)`. Fails if either is zero.
    pub fn new(resize: R, height: usize, width: usize) -> Result<Self> {
        ensure!(
            height > 0 && width > 0,
            "frame size must be positive, got {}x{}",
            height,
            width
        );
        Ok(Self {
            resize,
            height,
            width,
        })
    }

    /// Replaces the shape, keeps the range.
    pub fn state_space(&self, space: &ImageSpace) -> ImageSpace {
        ImageSpace::new(vec![self.height, self.width], space.low(), space.high())
    }
}

impl<R: Resize> StateTransform<ArrayD<u8>> for ResizeFrame<R> {
    type Output = ArrayD<u8>;

    fn apply(&self, frame: ArrayD<u8>) -> Result<ArrayD<u8>> {
        self.resize.resize(&frame, self.height, self.width)
    }
}

/// Converts pixels to `f32`, multiplied by a scale.
///
/// The default scale maps `u8` pixels to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToFloat {
    scale: f32,
}

impl Default for ToFloat {
    fn default() -> Self {
        Self { scale: 1.0 / 255.0 }
    }
}

impl ToFloat {
    /// Multiplies pixels by `scale`.
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    /// Scales the range, keeps the shape.
    pub fn state_space(&self, space: &ImageSpace) -> ImageSpace {
        ImageSpace::new(
            space.shape().to_vec(),
            space.low() * self.scale,
            space.high() * self.scale,
        )
    }
}

impl<T: AsPrimitive<f32>> StateTransform<ArrayD<T>> for ToFloat {
    type Output = ArrayD<f32>;

    fn apply(&self, frame: ArrayD<T>) -> Result<ArrayD<f32>> {
        Ok(frame.mapv(|v| v.as_() * self.scale))
    }
}
