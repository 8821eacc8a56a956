// mod.rs - Output formatters module

use std::fmt;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::core::DistanceMatrix;

/// Supported distance matrix layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Phylip,
    Tsv,
    Csv,
    Nexus,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "phylip" => Ok(OutputFormat::Phylip),
            "tsv" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            "nexus" => Ok(OutputFormat::Nexus),
            _ => Err(format!(
                "Unsupported output format: {}. Use: phylip, tsv, csv, nexus",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Phylip => "phylip",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Csv => "csv",
            OutputFormat::Nexus => "nexus",
        };
        f.write_str(name)
    }
}

fn write_error(e: std::io::Error) -> String {
    format!("Write error: {}", e)
}

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent).map_err(|e| {
                format!("Failed to create parent directory '{}': {}", parent.display(), e)
            })?;
        }
    }
    Ok(())
}

/// Square PHYLIP matrix: sequence count, then name and distances per row
pub fn write_phylip<W: Write>(
    writer: &mut W,
    matrix: &DistanceMatrix,
    precision: usize,
) -> Result<(), String> {
    write!(writer, "{:.*}", precision, matrix).map_err(write_error)
}

/// Delimited matrix with a header row and `#` provenance comments
pub fn write_delimited<W: Write>(
    writer: &mut W,
    matrix: &DistanceMatrix,
    precision: usize,
    delimiter: char,
    command_line: &str,
) -> Result<(), String> {
    writeln!(writer, "# Command: {}", command_line).map_err(write_error)?;
    writeln!(
        writer,
        "# Generated: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .map_err(write_error)?;
    writeln!(
        writer,
        "# spamdist v{} (pattern {}, weight {}, {})",
        env!("CARGO_PKG_VERSION"),
        matrix.pattern(),
        matrix.weight(),
        matrix.estimator_name()
    )
    .map_err(write_error)?;

    write!(writer, "Sequence").map_err(write_error)?;
    for sequence in matrix.sequences() {
        write!(writer, "{}{}", delimiter, sequence.name()).map_err(write_error)?;
    }
    writeln!(writer).map_err(write_error)?;

    for (sequence, row) in matrix.rows() {
        write!(writer, "{}", sequence.name()).map_err(write_error)?;
        for value in row {
            write!(writer, "{}{:.*}", delimiter, precision, value).map_err(write_error)?;
        }
        writeln!(writer).map_err(write_error)?;
    }

    Ok(())
}

/// NEXUS DISTANCES block (lower triangle)
pub fn write_nexus<W: Write>(
    writer: &mut W,
    matrix: &DistanceMatrix,
    precision: usize,
    command_line: &str,
) -> Result<(), String> {
    writeln!(writer, "#NEXUS").map_err(write_error)?;
    writeln!(writer, "[Command: {}]", command_line).map_err(write_error)?;
    writeln!(
        writer,
        "[Generated: {}]",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
    .map_err(write_error)?;
    writeln!(writer, "[spamdist v{}]", env!("CARGO_PKG_VERSION")).map_err(write_error)?;
    writeln!(writer, "BEGIN DISTANCES;").map_err(write_error)?;
    writeln!(writer, "    DIMENSIONS NTAX={};", matrix.size()).map_err(write_error)?;
    writeln!(writer, "    FORMAT LABELS LOWER DIAGONAL;").map_err(write_error)?;
    writeln!(writer, "    MATRIX").map_err(write_error)?;

    for (i, (sequence, row)) in matrix.rows().enumerate() {
        write!(writer, "        {}", sequence.name()).map_err(write_error)?;
        for value in &row[..=i] {
            write!(writer, " {:.*}", precision, value).map_err(write_error)?;
        }
        writeln!(writer).map_err(write_error)?;
    }

    writeln!(writer, "    ;").map_err(write_error)?;
    writeln!(writer, "END;").map_err(write_error)?;
    Ok(())
}

/// Write the matrix to any writer in the requested format
pub fn write_to<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    matrix: &DistanceMatrix,
    precision: usize,
    command_line: &str,
) -> Result<(), String> {
    match format {
        OutputFormat::Phylip => write_phylip(writer, matrix, precision),
        OutputFormat::Tsv => write_delimited(writer, matrix, precision, '\t', command_line),
        OutputFormat::Csv => write_delimited(writer, matrix, precision, ',', command_line),
        OutputFormat::Nexus => write_nexus(writer, matrix, precision, command_line),
    }
}

/// Write distance matrix file in the specified format
pub fn write_matrix(
    file_path: &str,
    format: OutputFormat,
    matrix: &DistanceMatrix,
    precision: usize,
    command_line: &str,
) -> Result<(), String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    let mut writer = BufWriter::new(file);

    write_to(&mut writer, format, matrix, precision, command_line)?;

    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    Ok(())
}

/// Per-sequence entry of a run summary
#[derive(Debug, Clone, Serialize)]
pub struct SequenceSummary {
    pub name: String,
    pub length: usize,
    pub words: usize,
}

/// Machine-readable description of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub version: String,
    pub generated: String,
    pub command: String,
    pub pattern: String,
    pub weight: usize,
    pub estimator: String,
    pub threads: usize,
    pub elapsed_seconds: f64,
    pub sequences: Vec<SequenceSummary>,
}

impl RunSummary {
    pub fn from_matrix(matrix: &DistanceMatrix, command_line: &str, elapsed_seconds: f64) -> Self {
        let sequences = matrix
            .sequences()
            .iter()
            .enumerate()
            .map(|(i, sequence)| SequenceSummary {
                name: sequence.name().to_string(),
                length: sequence.len(),
                words: matrix.wordlist(i).map(|w| w.len()).unwrap_or(0),
            })
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            command: command_line.to_string(),
            pattern: matrix.pattern().to_string(),
            weight: matrix.weight(),
            estimator: matrix.estimator_name().to_string(),
            threads: matrix.pool().current_num_threads(),
            elapsed_seconds,
            sequences,
        }
    }
}

/// Write a run summary as pretty-printed JSON
pub fn write_summary(file_path: &str, summary: &RunSummary) -> Result<(), String> {
    ensure_parent_dir(file_path)?;
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| format!("Failed to serialize summary: {}", e))?;
    std::fs::write(file_path, json)
        .map_err(|e| format!("Failed to write summary file '{}': {}", file_path, e))?;

    Ok(())
}
