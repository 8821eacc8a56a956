// mod.rs - Core spaced-word engine

pub mod distance;
pub mod errors;
pub mod estimator;
pub mod executor;
pub mod pattern;
pub mod wordlist;

// Re-export main types for convenience
pub use distance::{DistanceMatrix, MatrixOptions};
pub use errors::SpamError;
pub use estimator::{
    DistanceEstimator, Estimate, EstimatorRegistry, JukesCantor, PDistance, MAX_DISTANCE,
};
pub use executor::{build_pool, default_threads};
pub use pattern::Pattern;
pub use wordlist::{count_matches, Word, WordList, MAX_WORDSIZE};
