//! Compound space of a batch of replicas.
use super::Space;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// `n` independent copies of a per-replica space.
///
/// Members are vectors holding one value of the inner space per replica.
/// The number of members, `len(inner)^n`, saturates at `usize::MAX`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSpace<S> {
    space: S,
    n: usize,
}

impl<S> BatchSpace<S> {
    /// Builds the compound space of `n` copies of `space`.
    pub fn new(space: S, n: usize) -> Self {
        Self { space, n }
    }

    /// The per-replica space.
    pub fn space(&self) -> &S {
        &self.space
    }

    /// The number of replicas.
    pub fn n(&self) -> usize {
        self.n
    }
}

impl<S: Space> Space for BatchSpace<S> {
    type Value = Vec<S::Value>;

    fn len(&self) -> usize {
        let n = u32::try_from(self.n).unwrap_or(u32::MAX);
        self.space.len().saturating_pow(n)
    }

    fn contains(&self, value: &Self::Value) -> bool {
        value.len() == self.n && value.iter().all(|v| self.space.contains(v))
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Value {
        (0..self.n).map(|_| self.space.sample(&mut *rng)).collect()
    }
}
