//! Multi-dimensional discrete space.
use super::Space;
use crate::error::StagehandError;
use anyhow::Result;
use ndarray::{ArrayD, IxDyn, Zip};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// A box of integers with independent inclusive bounds per axis.
///
/// The number of members, `Π(high[i] - low[i] + 1)`, is computed once when the space
/// is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiDiscreteSpace {
    low: ArrayD<i64>,
    high: ArrayD<i64>,
    len: usize,
}

impl MultiDiscreteSpace {
    /// Builds a space from lower and upper bounds of the same shape.
    ///
    /// Fails if the shapes differ, if `low[i] > high[i]` for some element, or if the
    /// number of members overflows `usize`.
    pub fn new(low: ArrayD<i64>, high: ArrayD<i64>) -> Result<Self> {
        if low.shape() != high.shape() {
            return Err(StagehandError::ShapeMismatch {
                low: low.shape().to_vec(),
                high: high.shape().to_vec(),
            }
            .into());
        }

        let mut len = 1usize;
        for (axis, (&l, &h)) in low.iter().zip(high.iter()).enumerate() {
            if l > h {
                return Err(StagehandError::InvalidBounds {
                    axis,
                    low: l,
                    high: h,
                }
                .into());
            }
            let n = usize::try_from(i128::from(h) - i128::from(l) + 1)
                .map_err(|_| StagehandError::CardinalityOverflow)?;
            len = len
                .checked_mul(n)
                .ok_or(StagehandError::CardinalityOverflow)?;
        }

        Ok(Self { low, high, len })
    }

    /// Builds a space whose lower bounds are all one.
    pub fn from_high(high: impl Into<ArrayD<i64>>) -> Result<Self> {
        let high = high.into();
        let low = ArrayD::ones(high.raw_dim());
        Self::new(low, high)
    }

    /// Builds a one-dimensional space from slices of bounds.
    pub fn from_bounds(low: &[i64], high: &[i64]) -> Result<Self> {
        Self::new(
            ArrayD::from_shape_vec(IxDyn(&[low.len()]), low.to_vec())?,
            ArrayD::from_shape_vec(IxDyn(&[high.len()]), high.to_vec())?,
        )
    }

    /// Lower bounds.
    pub fn low(&self) -> &ArrayD<i64> {
        &self.low
    }

    /// Upper bounds.
    pub fn high(&self) -> &ArrayD<i64> {
        &self.high
    }

    /// Shape shared by the bounds and by every member.
    pub fn shape(&self) -> &[usize] {
        self.low.shape()
    }
}

impl Space for MultiDiscreteSpace {
    type Value = ArrayD<i64>;

    fn len(&self) -> usize {
        self.len
    }

    fn contains(&self, value: &Self::Value) -> bool {
        value.shape() == self.low.shape()
            && Zip::from(value)
                .and(&self.low)
                .and(&self.high)
                .all(|&x, &l, &h| l <= x && x <= h)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Value {
        Zip::from(&self.low)
            .and(&self.high)
            .map_collect(|&l, &h| rng.gen_range(l..=h))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::{arr1, arr2};
    use rand::{rngs::SmallRng, SeedableRng};

    fn space(low: &[i64], high: &[i64]) -> MultiDiscreteSpace {
        MultiDiscreteSpace::from_bounds(low, high).unwrap()
    }

    #[test]
    fn test_len_is_product_of_axis_sizes() {
        assert_eq!(space(&[1, 1, 1], &[2, 3, 4]).len(), 24);
        assert_eq!(space(&[-2, 0], &[2, 0]).len(), 5);
        assert_eq!(space(&[7], &[7]).len(), 1);

        let low = arr2(&[[0i64, 1], [2, 3]]).into_dyn();
        let high = arr2(&[[1i64, 3], [2, 6]]).into_dyn();
        assert_eq!(MultiDiscreteSpace::new(low, high).unwrap().len(), 2 * 3 * 1 * 4);
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        let err = MultiDiscreteSpace::from_bounds(&[1, 5], &[3, 4]).unwrap_err();
        match err.downcast_ref::<StagehandError>() {
            Some(StagehandError::InvalidBounds { axis, low, high }) => {
                assert_eq!((*axis, *low, *high), (1, 5, 4));
            }
            e => panic!("unexpected error: {:?}", e),
        }
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let err = MultiDiscreteSpace::new(arr1(&[1i64, 1]).into_dyn(), arr1(&[2i64]).into_dyn())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StagehandError>(),
            Some(StagehandError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_overflowing_cardinality_is_rejected() {
        let err = MultiDiscreteSpace::from_high(arr1(&[i64::MAX, i64::MAX]).into_dyn()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StagehandError>(),
            Some(StagehandError::CardinalityOverflow)
        ));
    }

    #[test]
    fn test_from_high_defaults_low_to_ones() {
        let high = arr2(&[[3i64, 4, 5], [6, 7, 8]]).into_dyn();
        let s = MultiDiscreteSpace::from_high(high).unwrap();
        assert_eq!(s.low(), &ArrayD::<i64>::ones(IxDyn(&[2, 3])));
        assert_eq!(s.shape(), &[2, 3]);
    }

    #[test]
    fn test_samples_are_contained() {
        let mut rng = SmallRng::seed_from_u64(0);
        let spaces = vec![
            space(&[1, 1], &[2, 3]),
            space(&[-5, 0, 10], &[5, 0, 12]),
            MultiDiscreteSpace::from_high(arr2(&[[2i64, 9], [4, 1]]).into_dyn()).unwrap(),
        ];
        for s in spaces.iter() {
            for _ in 0..1000 {
                let x = s.sample(&mut rng);
                assert!(s.contains(&x), "{:?} not in {:?}", x, s);
            }
        }
    }

    #[test]
    fn test_samples_cover_every_value() {
        let mut rng = SmallRng::seed_from_u64(1);
        let s = space(&[1, 1], &[2, 3]);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            let x = s.sample(&mut rng);
            seen.insert(x.iter().copied().collect::<Vec<_>>());
        }
        assert_eq!(seen.len(), s.len());
    }

    #[test]
    fn test_contains() {
        let s = space(&[1, 1], &[2, 3]);
        assert!(s.contains(&arr1(&[1i64, 3]).into_dyn()));
        assert!(!s.contains(&arr1(&[0i64, 3]).into_dyn()));
        assert!(!s.contains(&arr1(&[2i64, 4]).into_dyn()));
    }

    #[test]
    fn test_contains_is_false_on_shape_mismatch() {
        let s = space(&[1, 1], &[2, 3]);
        assert!(!s.contains(&arr1(&[1i64]).into_dyn()));
        assert!(!s.contains(&arr1(&[1i64, 1, 1]).into_dyn()));
        assert!(!s.contains(&arr2(&[[1i64, 1]]).into_dyn()));
    }
}
