//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
///
/// Failures raised by environments themselves are not translated into this type;
/// they travel through wrappers, batches and the run loop as [`anyhow::Error`]
/// values, unchanged.
#[derive(Error, Debug)]
pub enum StagehandError {
    /// Lower and upper bounds of a space have different shapes.
    #[error("shape mismatch: low has shape {low:?}, high has shape {high:?}")]
    ShapeMismatch {
        /// Shape of the lower bounds.
        low: Vec<usize>,
        /// Shape of the upper bounds.
        high: Vec<usize>,
    },

    /// A lower bound is greater than the corresponding upper bound.
    #[error("invalid bounds at axis {axis}: low = {low} > high = {high}")]
    InvalidBounds {
        /// Flat index of the offending element.
        axis: usize,
        /// Lower bound.
        low: i64,
        /// Upper bound.
        high: i64,
    },

    /// The number of elements of a space does not fit in `usize`.
    #[error("cardinality of the space overflows usize")]
    CardinalityOverflow,

    /// A space without any element.
    #[error("space must have at least one element")]
    EmptySpace,

    /// A periodic hook was given a period of zero.
    #[error("period must be positive")]
    ZeroPeriod,

    /// A frame stack was given a depth of zero.
    #[error("number of stacked frames must be positive")]
    ZeroStack,

    /// A batch was stepped with a wrong number of actions.
    #[error("expected {expected} actions, got {got}")]
    ActionCount {
        /// The number of replicas.
        expected: usize,
        /// The number of given actions.
        got: usize,
    },

    /// A batch was built without replicas.
    #[error("batch requires at least one replica")]
    EmptyBatch,

    /// A replica of a batch failed while stepping or resetting.
    ///
    /// Attached as context to the error raised by the replica.
    #[error("replica {index} failed")]
    Replica {
        /// Index of the replica in the batch.
        index: usize,
    },

    /// An action was applied to an environment whose episode is over.
    #[error("episode is over; reset the environment before acting")]
    EpisodeOver,
}
