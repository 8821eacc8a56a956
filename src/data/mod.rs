// mod.rs - Sequence data module

pub mod sequence;

// Re-export main types for convenience
pub use sequence::{filter_sequences, load_sequences, Sequence, SequenceReader};
