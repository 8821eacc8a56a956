// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input/Output
        if self.input.is_none() {
            self.input = config.input;
        }
        if self.output.is_none() {
            self.output = config.output;
        }
        if self.summary.is_none() {
            self.summary = config.summary;
        }

        // Settings with defaults (only override defaults, not explicit CLI values)
        if let Some(format) = config.format {
            if self.format == "phylip" {
                self.format = format;
            }
        }
        if let Some(precision) = config.precision {
            if self.precision == 6 {
                self.precision = precision;
            }
        }
        if let Some(estimator) = config.estimator {
            if self.estimator == "jukes-cantor" {
                self.estimator = estimator;
            }
        }

        // Spaced words
        if self.pattern.is_none() {
            self.pattern = config.pattern;
        }
        if self.weight.is_none() {
            self.weight = config.weight;
        }

        // Performance
        if self.threads.is_none() {
            self.threads = config.threads;
        }

        // Sequence filtering
        if self.include_sequences.is_none() {
            self.include_sequences = config.include_sequences;
        }
        if self.exclude_sequences.is_none() {
            self.exclude_sequences = config.exclude_sequences;
        }
        if self.include_sequences_list.is_none() {
            self.include_sequences_list = config.include_sequences_list;
        }
        if self.exclude_sequences_list.is_none() {
            self.exclude_sequences_list = config.exclude_sequences_list;
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }
        if !self.quiet && config.quiet.unwrap_or(false) {
            self.quiet = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self, String> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}
