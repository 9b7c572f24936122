//! Domains of legal values for actions and states.
//!
//! A [`Space`] answers three questions: how many values it holds, whether a value
//! belongs to it, and what a uniformly drawn member looks like. Sampling always takes
//! an explicit random number generator; no space keeps a generator of its own.
//!
//! ```
//! use rand::{rngs::SmallRng, SeedableRng};
//! use stagehand_core::space::{MultiDiscreteSpace, Space};
//!
//! let space = MultiDiscreteSpace::from_bounds(&[1, 1], &[3, 4]).unwrap();
//! assert_eq!(space.len(), 12);
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let x = space.sample(&mut rng);
//! assert!(space.contains(&x));
//! ```
mod batch;
mod discrete;
mod multi_discrete;
use rand::Rng;

pub use batch::BatchSpace;
pub use discrete::DiscreteSpace;
pub use multi_discrete::MultiDiscreteSpace;

/// A set of legal values.
pub trait Space {
    /// Type of the members of the space.
    type Value;

    /// Returns the number of members of the space.
    fn len(&self) -> usize;

    /// Returns `true` if the space has no member.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `value` is a member of the space.
    ///
    /// This never fails; a value of a different shape is simply not a member.
    fn contains(&self, value: &Self::Value) -> bool;

    /// Draws a member uniformly at random.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Value;
}
