// main.rs - CLI entry point

use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use spamdist::cli::Config;
use spamdist::data::{filter_sequences, load_sequences};
use spamdist::output::{write_matrix, write_summary, write_to, RunSummary};
use spamdist::prelude::*;

/// Status line on stderr, silenced by `--quiet`
macro_rules! status {
    ($quiet:expr, $($arg:tt)*) => {
        if !$quiet {
            eprintln!($($arg)*);
        }
    };
}

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), String> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        println!("{}", Config::generate_sample());
        eprintln!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    if args.list_estimators {
        let registry = EstimatorRegistry::new();
        println!("Available estimators:");
        for (name, description) in registry.list_estimators() {
            println!("  - {}: {}", name, description);
        }
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let quiet = args.quiet;
    if let Some(config_path) = &args.config {
        status!(quiet, "📄 Loaded configuration from: {}", config_path);
    }

    let input = args.input.clone().ok_or("--input is required")?;
    let validation = validate_args(&args)?;

    status!(quiet, "🚀 {}", spamdist::get_info());
    status!(
        quiet,
        "🧩 Pattern: {} (size {}, weight {}, using {})",
        validation.pattern,
        validation.pattern.size(),
        validation.pattern.weight(),
        validation.weight
    );
    status!(quiet, "📐 Estimator: {}", validation.estimator.name());
    if let Some(set) = &validation.include_set {
        status!(quiet, "📋 Include list: {} names", set.len());
    }
    if let Some(set) = &validation.exclude_set {
        status!(quiet, "📋 Exclude list: {} names", set.len());
    }

    let total_start = Instant::now();

    // Load and filter sequences
    status!(quiet, "🧬 Loading sequences from: {}", input);
    let sequences = load_sequences(Path::new(&input))?;
    let total_bases: usize = sequences.iter().map(Sequence::len).sum();
    status!(
        quiet,
        "✅ Loaded {} sequences ({} bases)",
        sequences.len(),
        total_bases
    );

    let loaded = sequences.len();
    let sequences = filter_sequences(
        sequences,
        validation.include_regex.as_ref(),
        validation.exclude_regex.as_ref(),
        validation.include_set.as_ref(),
        validation.exclude_set.as_ref(),
    );
    if sequences.is_empty() {
        return Err("No sequences left after filtering".to_string());
    }
    if sequences.len() != loaded {
        status!(
            quiet,
            "🔍 Sequence filters: kept {} sequences (removed {})",
            sequences.len(),
            loaded - sequences.len()
        );
    }

    let shorter = sequences
        .iter()
        .filter(|s| s.len() < validation.pattern.size())
        .count();
    if shorter > 0 {
        status!(
            quiet,
            "⚠️  {} sequences are shorter than the pattern and contribute no spaced words",
            shorter
        );
    }

    // Worker pool sized here, shared with the matrix
    let pool = build_pool(args.threads).map_err(|e| e.to_string())?;
    status!(
        quiet,
        "🧵 Threads: {}{}",
        pool.current_num_threads(),
        if args.threads.is_none() { " (auto-detected)" } else { "" }
    );

    if args.dry_run {
        let mut total_words = 0;
        for sequence in &sequences {
            let wordlist = WordList::new(&validation.pattern, sequence, validation.weight)
                .map_err(|e| e.to_string())?;
            total_words += wordlist.len();
        }
        status!(quiet, "✅ Dry run completed successfully");
        status!(
            quiet,
            "📊 {} sequences, {} spaced words",
            sequences.len(),
            total_words
        );
        return Ok(());
    }

    let options = MatrixOptions {
        estimator: validation.estimator,
        weight: Some(validation.weight),
        show_progress: !args.quiet,
    };
    let matrix = DistanceMatrix::with_options(sequences, validation.pattern, pool, options)
        .map_err(|e| e.to_string())?;

    // Write output
    match &args.output {
        Some(path) => {
            write_matrix(
                path,
                validation.format,
                &matrix,
                args.precision,
                &command_line,
            )?;
            status!(
                quiet,
                "✅ Distance matrix written to: {} ({} format)",
                path,
                validation.format
            );
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            write_to(
                &mut writer,
                validation.format,
                &matrix,
                args.precision,
                &command_line,
            )?;
            writer.flush().map_err(|e| format!("Flush error: {}", e))?;
        }
    }

    let elapsed = total_start.elapsed().as_secs_f64();
    if let Some(summary_path) = &args.summary {
        let summary = RunSummary::from_matrix(&matrix, &command_line, elapsed);
        write_summary(summary_path, &summary)?;
        status!(quiet, "📝 Run summary written to: {}", summary_path);
    }

    status!(quiet, "🎉 Completed in {:.2}s", elapsed);
    Ok(())
}
