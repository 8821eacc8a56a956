// lib.rs - spamdist library root

//! # spamdist - Alignment-free distance matrices from spaced-word matches
//!
//! Sequences are sampled with a binary pattern: every window of the pattern's
//! width contributes one "spaced word" made of the bases under the pattern's
//! match positions. Word lists of two sequences are compared with a linear
//! merge, and the number of shared words is turned into an evolutionary
//! distance.
//!
//! ## Features
//!
//! - **Spaced words**: any `0`/`1` pattern with up to 32 match positions
//! - **Parallel**: word lists and pairwise distances computed on a rayon pool
//! - **Pluggable estimators**: Jukes-Cantor corrected or uncorrected distances
//! - **Multiple formats**: PHYLIP, TSV, CSV and NEXUS output
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use spamdist::prelude::*;
//!
//! let sequences = Sequence::from_multi_fasta_file(std::path::Path::new("genomes.fasta"))
//!     .ok_or("could not read genomes.fasta")?;
//! let pattern = Pattern::new("1101011")?;
//!
//! // The caller decides how many workers to use
//! let pool = build_pool(None)?;
//! let matrix = DistanceMatrix::new(sequences, pattern, pool)?;
//!
//! print!("{}", matrix);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod core;
pub mod data;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{build_pool, DistanceMatrix, MatrixOptions, SpamError};
    pub use crate::core::{DistanceEstimator, Estimate, EstimatorRegistry};
    pub use crate::core::{Pattern, WordList};
    pub use crate::data::{Sequence, SequenceReader};
    pub use crate::output::{write_matrix, OutputFormat};
}

// Re-export main types at the root level for convenience
pub use crate::core::{DistanceMatrix, Pattern, SpamError, WordList};
pub use crate::data::Sequence;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "spamdist v{} - Spaced-word distance matrix calculator",
        VERSION
    )
}
