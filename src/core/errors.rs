// errors.rs - Error type for the spaced-word engine

use std::{error::Error, fmt};

/// Failures raised by pattern parsing, word extraction and matrix
/// construction. Loader and writer glue reports errors as `String`.
#[non_exhaustive]
#[derive(Clone, PartialEq, Eq)]
pub enum SpamError {
    /// A pattern string contained something other than `0` or `1`.
    InvalidPattern { position: usize, symbol: char },
    /// `reduce(k)` was asked for more positions than the pattern has.
    WeightOutOfRange { requested: usize, weight: usize },
    /// The requested word weight cannot be packed into a `Word`.
    WordCapacity { requested: usize, max: usize },
    /// Indexed access past the end of a pattern or matrix.
    IndexOutOfBounds { index: usize, len: usize },
    /// A distance matrix needs at least one sequence.
    EmptySequenceSet,
    /// The worker pool could not be created.
    ThreadPool(String),
}

impl fmt::Display for SpamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpamError::InvalidPattern { position, symbol } => write!(
                f,
                "invalid pattern symbol {symbol:?} at position {position} (only '0' and '1' are allowed)"
            ),
            SpamError::WeightOutOfRange { requested, weight } => write!(
                f,
                "cannot reduce pattern to weight {requested}: pattern weight is {weight}"
            ),
            SpamError::WordCapacity { requested, max } => write!(
                f,
                "word weight {requested} is not supported: must be between 1 and {max} and at most the pattern weight"
            ),
            SpamError::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} is out of bounds for length {len}")
            }
            SpamError::EmptySequenceSet => {
                write!(f, "a distance matrix requires at least one sequence")
            }
            SpamError::ThreadPool(msg) => write!(f, "failed to build worker pool: {msg}"),
        }
    }
}

impl fmt::Debug for SpamError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Error for SpamError {}
