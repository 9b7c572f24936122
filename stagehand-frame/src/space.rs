//! Description of pixel arrays.
use num_traits::AsPrimitive;
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

/// Shape and inclusive value range of a pixel array.
///
/// Used as the state space of frame environments. It only describes states; the
/// run loop never samples it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSpace {
    shape: Vec<usize>,
    low: f32,
    high: f32,
}

impl ImageSpace {
    /// Describes arrays of the given shape with elements in `[low, high]`.
    pub fn new(shape: impl Into<Vec<usize>>, low: f32, high: f32) -> Self {
        Self {
            shape: shape.into(),
            low,
            high,
        }
    }

    /// Shape of the arrays.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Smallest element value.
    pub fn low(&self) -> f32 {
        self.low
    }

    /// Largest element value.
    pub fn high(&self) -> f32 {
        self.high
    }

    /// Returns `true` if `frame` has the described shape and range.
    pub fn contains<T: AsPrimitive<f32>>(&self, frame: &ArrayD<T>) -> bool {
        frame.shape() == self.shape.as_slice()
            && frame.iter().all(|&v| {
                let v: f32 = v.as_();
                self.low <= v && v <= self.high
            })
    }
}
