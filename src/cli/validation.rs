// validation.rs - Input validation utilities

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::Arc;

use regex::Regex;

use crate::cli::args::Args;
use crate::core::{DistanceEstimator, EstimatorRegistry, Pattern, MAX_WORDSIZE};
use crate::output::OutputFormat;

/// Largest number of decimals accepted for written distances
const MAX_PRECISION: usize = 17;

pub struct ValidationResult {
    pub pattern: Pattern,
    pub weight: usize,
    pub estimator: Arc<dyn DistanceEstimator>,
    pub format: OutputFormat,
    pub include_regex: Option<Regex>,
    pub exclude_regex: Option<Regex>,
    pub include_set: Option<HashSet<String>>,
    pub exclude_set: Option<HashSet<String>>,
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    // Validate pattern
    let bits = args.pattern.as_deref().ok_or("--pattern is required")?;
    let pattern = Pattern::new(bits).map_err(|e| format!("Invalid pattern '{}': {}", bits, e))?;
    if pattern.weight() == 0 {
        return Err(format!("Pattern '{}' has no match positions", bits));
    }

    // Validate weight against the pattern and the word capacity
    let weight = args.weight.unwrap_or(pattern.weight());
    if weight == 0 {
        return Err("Weight must be at least 1".to_string());
    }
    if weight > pattern.weight() {
        return Err(format!(
            "Weight {} exceeds the number of match positions in pattern '{}' ({})",
            weight,
            bits,
            pattern.weight()
        ));
    }
    if weight > MAX_WORDSIZE {
        return Err(format!(
            "Weight {} exceeds the maximum word size of {} (use --weight to reduce it)",
            weight, MAX_WORDSIZE
        ));
    }

    // Validate estimator
    let registry = EstimatorRegistry::new();
    let estimator = registry.get_estimator(&args.estimator).ok_or_else(|| {
        format!(
            "Invalid estimator '{}'. Available: {}",
            args.estimator,
            registry.get_estimator_names().join(", ")
        )
    })?;

    // Validate output settings
    let format: OutputFormat = args.format.parse()?;
    if args.precision > MAX_PRECISION {
        return Err(format!("Precision must be between 0 and {}", MAX_PRECISION));
    }

    if args.threads == Some(0) {
        return Err("Thread count must be at least 1".to_string());
    }

    // Compile regex patterns
    let include_regex = if let Some(pattern) = &args.include_sequences {
        Some(Regex::new(pattern).map_err(|e| format!("Invalid include_sequences regex: {}", e))?)
    } else {
        None
    };

    let exclude_regex = if let Some(pattern) = &args.exclude_sequences {
        Some(Regex::new(pattern).map_err(|e| format!("Invalid exclude_sequences regex: {}", e))?)
    } else {
        None
    };

    // Load filter sets from files
    let include_set = if let Some(file_path) = &args.include_sequences_list {
        Some(load_set_from_file(file_path)?)
    } else {
        None
    };

    let exclude_set = if let Some(file_path) = &args.exclude_sequences_list {
        Some(load_set_from_file(file_path)?)
    } else {
        None
    };

    Ok(ValidationResult {
        pattern,
        weight,
        estimator,
        format,
        include_regex,
        exclude_regex,
        include_set,
        exclude_set,
    })
}

/// Load a set of strings from a file (one per line)
fn load_set_from_file(file_path: &str) -> Result<HashSet<String>, String> {
    let file = File::open(file_path)
        .map_err(|e| format!("Failed to open filter file '{}': {}", file_path, e))?;

    let reader = BufReader::new(file);
    let mut set = HashSet::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            format!("Failed to read line {} from '{}': {}", line_num + 1, file_path, e)
        })?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            set.insert(trimmed.to_string());
        }
    }

    Ok(set)
}
