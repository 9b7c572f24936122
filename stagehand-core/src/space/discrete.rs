//! One-dimensional discrete space.
use super::Space;
use crate::error::StagehandError;
use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The integers `1..=n`.
///
/// Actions of games with a handful of buttons are usually drawn from this space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteSpace {
    n: i64,
}

impl DiscreteSpace {
    /// Builds the space `1..=n`. Fails if `n < 1`.
    pub fn new(n: i64) -> Result<Self> {
        if n < 1 {
            return Err(StagehandError::EmptySpace.into());
        }
        Ok(Self { n })
    }

    /// The largest member.
    pub fn n(&self) -> i64 {
        self.n
    }
}

impl Space for DiscreteSpace {
    type Value = i64;

    fn len(&self) -> usize {
        self.n as usize
    }

    fn contains(&self, value: &i64) -> bool {
        (1..=self.n).contains(value)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        rng.gen_range(1..=self.n)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_discrete_space() {
        let s = DiscreteSpace::new(3).unwrap();
        assert_eq!(s.len(), 3);
        assert!(!s.contains(&0));
        assert!(s.contains(&1));
        assert!(s.contains(&3));
        assert!(!s.contains(&4));

        let mut rng = SmallRng::seed_from_u64(7);
        assert!((0..1000).all(|_| s.contains(&s.sample(&mut rng))));
    }

    #[test]
    fn test_empty_discrete_space_is_rejected() {
        assert!(DiscreteSpace::new(0).is_err());
    }
}
