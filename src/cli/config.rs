// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub input: Option<String>,
    pub output: Option<String>,
    pub format: Option<String>,
    pub precision: Option<usize>,
    pub summary: Option<String>,

    // Spaced words
    pub pattern: Option<String>,
    pub weight: Option<usize>,
    pub estimator: Option<String>,

    // Performance
    pub threads: Option<usize>,

    // Sequence filtering
    pub include_sequences: Option<String>,
    pub exclude_sequences: Option<String>,
    pub include_sequences_list: Option<String>,
    pub exclude_sequences_list: Option<String>,

    // Flags
    pub dry_run: Option<bool>,
    pub quiet: Option<bool>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# spamdist.toml - Configuration file for spamdist
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Multi-FASTA file or directory of FASTA files (.fasta, .fa, .fna, .fas, .fsa)
input = "/path/to/genomes"

# Output distance matrix file (omit to write to stdout)
output = "distances.phy"

# Output format: phylip, tsv, csv, nexus
format = "phylip"

# Number of decimals written for each distance
precision = 6

# JSON summary of the run (pattern, weight, word counts per sequence)
# summary = "run.json"

# =============================================================================
# SPACED WORDS
# =============================================================================

# Match (1) and don't-care (0) positions; at most 32 match positions
pattern = "1100101001011010011"

# Use only the first k match positions of the pattern
# weight = 8

# Distance estimator: jukes-cantor, p-distance
estimator = "jukes-cantor"

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of threads (omit for auto-detection)
threads = 8

# =============================================================================
# SEQUENCE FILTERING
# =============================================================================

# Include only sequences whose name matches the regex pattern
# include_sequences = "^ecoli_.*"

# Exclude sequences whose name matches the regex pattern
# exclude_sequences = "plasmid"

# Include only sequences listed in a file (one name per line)
# include_sequences_list = "keep.txt"

# Exclude sequences listed in a file (one name per line)
# exclude_sequences_list = "drop.txt"

# =============================================================================
# FLAGS
# =============================================================================

# Validate inputs and build word lists only
dry_run = false

# Hide progress bars
quiet = false
"#
        .to_string()
    }
}
