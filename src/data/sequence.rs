// sequence.rs - Named nucleotide sequences and FASTA loading

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bio::io::fasta::{self, FastaRead};
use regex::Regex;

/// File extensions picked up when loading a directory of FASTA files
const FASTA_EXTENSIONS: &[&str] = &["fasta", "fa", "fna", "fas", "fsa"];

/// A named nucleotide sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    name: String,
    bases: Vec<u8>,
}

impl Sequence {
    pub fn new(name: impl Into<String>, bases: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bases,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bases(&self) -> &[u8] {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u8> {
        self.bases.iter()
    }

    /// Load every record of a multi-FASTA file, or `None` if the file cannot
    /// be read or parsed.
    pub fn from_multi_fasta_file(path: &Path) -> Option<Vec<Sequence>> {
        Self::load_multi_fasta(path)
            .map_err(|e| eprintln!("⚠️  {}", e))
            .ok()
    }

    /// Load every FASTA file in a directory, or `None` if any of them cannot
    /// be read or parsed.
    pub fn from_directory(path: &Path) -> Option<Vec<Sequence>> {
        Self::load_directory(path)
            .map_err(|e| eprintln!("⚠️  {}", e))
            .ok()
    }

    /// Load a multi-FASTA file, reporting why it failed
    pub fn load_multi_fasta(path: &Path) -> Result<Vec<Sequence>, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open FASTA file {}: {}", path.display(), e))?;

        let sequences = SequenceReader::new(BufReader::new(file))
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| format!("Invalid FASTA record in {}: {}", path.display(), e))?;

        if sequences.is_empty() {
            return Err(format!("No sequences found in {}", path.display()));
        }

        Ok(sequences)
    }

    /// Load all FASTA files of a directory in file name order, keeping the
    /// record order inside each file
    pub fn load_directory(dir: &Path) -> Result<Vec<Sequence>, String> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| format!("Failed to read directory {}: {}", dir.display(), e))?;

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| format!("Failed to read directory entry: {}", e))?;
            let path = entry.path();

            if path.is_file() && has_fasta_extension(&path) {
                files.push(path);
            }
        }

        if files.is_empty() {
            return Err(format!("No FASTA files found in {}", dir.display()));
        }
        files.sort();

        let mut sequences = Vec::new();
        for path in &files {
            sequences.extend(Self::load_multi_fasta(path)?);
        }

        Ok(sequences)
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a u8;
    type IntoIter = std::slice::Iter<'a, u8>;

    fn into_iter(self) -> Self::IntoIter {
        self.bases.iter()
    }
}

fn has_fasta_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FASTA_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Load sequences from a FASTA file or a directory of FASTA files
pub fn load_sequences(path: &Path) -> Result<Vec<Sequence>, String> {
    if path.is_dir() {
        Sequence::load_directory(path)
    } else if path.is_file() {
        Sequence::load_multi_fasta(path)
    } else {
        Err(format!("Input path does not exist: {}", path.display()))
    }
}

/// Keep the sequences whose names pass the include/exclude filters
pub fn filter_sequences(
    sequences: Vec<Sequence>,
    include: Option<&Regex>,
    exclude: Option<&Regex>,
    include_set: Option<&HashSet<String>>,
    exclude_set: Option<&HashSet<String>>,
) -> Vec<Sequence> {
    sequences
        .into_iter()
        .filter(|sequence| {
            let name = sequence.name();

            if let Some(regex) = include {
                if !regex.is_match(name) {
                    return false;
                }
            }
            if let Some(regex) = exclude {
                if regex.is_match(name) {
                    return false;
                }
            }
            if let Some(set) = include_set {
                if !set.contains(name) {
                    return false;
                }
            }
            if let Some(set) = exclude_set {
                if set.contains(name) {
                    return false;
                }
            }

            true
        })
        .collect()
}

/// Buffered input that counts the header lines (`>` at line start) handed
/// to the FASTA parser.
struct HeaderCounter<B> {
    inner: B,
    at_line_start: bool,
    headers: Arc<AtomicUsize>,
}

impl<B: BufRead> Read for HeaderCounter<B> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = {
            let available = self.fill_buf()?;
            let n = available.len().min(buf.len());
            buf[..n].copy_from_slice(&available[..n]);
            n
        };
        self.consume(n);
        Ok(n)
    }
}

impl<B: BufRead> BufRead for HeaderCounter<B> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.inner.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        // Already buffered by the preceding fill_buf, no I/O happens here
        if let Ok(buffered) = self.inner.fill_buf() {
            for &byte in &buffered[..amt.min(buffered.len())] {
                if self.at_line_start && byte == b'>' {
                    self.headers.fetch_add(1, Ordering::Relaxed);
                }
                self.at_line_start = byte == b'\n';
            }
        }
        self.inner.consume(amt);
    }
}

/// Reads FASTA records one at a time from a stream positioned at a record
/// boundary.
pub struct SequenceReader<B: BufRead> {
    reader: fasta::Reader<HeaderCounter<B>>,
    record: fasta::Record,
    headers: Arc<AtomicUsize>,
    emitted: usize,
}

impl<B: BufRead> SequenceReader<B> {
    pub fn new(reader: B) -> Self {
        let headers = Arc::new(AtomicUsize::new(0));
        let counter = HeaderCounter {
            inner: reader,
            at_line_start: true,
            headers: Arc::clone(&headers),
        };

        Self {
            reader: fasta::Reader::from_bufread(counter),
            record: fasta::Record::new(),
            headers,
            emitted: 0,
        }
    }

    /// Consume the next header and its bases. Returns `Ok(None)` at end of
    /// input; a header without an identifier is `InvalidData`.
    pub fn read_sequence(&mut self) -> io::Result<Option<Sequence>> {
        self.reader.read(&mut self.record)?;

        if self.record.is_empty() {
            // Every header seen so far produced a sequence: true end of input
            if self.headers.load(Ordering::Relaxed) == self.emitted {
                return Ok(None);
            }
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("empty FASTA header after record {}", self.emitted),
            ));
        }
        if self.record.id().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("FASTA header without identifier after record {}", self.emitted),
            ));
        }

        self.emitted += 1;
        Ok(Some(Sequence::new(
            self.record.id(),
            self.record.seq().to_vec(),
        )))
    }
}

impl<B: BufRead> Iterator for SequenceReader<B> {
    type Item = io::Result<Sequence>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_sequence().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    const TWO_RECORDS: &str = ">seq1 first sample\nACGT\nACGT\n>seq2\nTTGCA\n";

    #[test]
    fn test_reader_consumes_one_record_at_a_time() {
        let mut reader = SequenceReader::new(Cursor::new(TWO_RECORDS));

        let first = reader.read_sequence().unwrap().unwrap();
        assert_eq!(first.name(), "seq1");
        assert_eq!(first.bases(), b"ACGTACGT");
        assert_eq!(first.len(), 8);

        let second = reader.read_sequence().unwrap().unwrap();
        assert_eq!(second.name(), "seq2");
        assert_eq!(second.bases(), b"TTGCA");

        assert!(reader.read_sequence().unwrap().is_none());
    }

    #[test]
    fn test_reader_rejects_missing_header() {
        let mut reader = SequenceReader::new(Cursor::new("ACGT\n>seq1\nACGT\n"));
        assert!(reader.read_sequence().is_err());
    }

    #[test]
    fn test_reader_rejects_empty_header() {
        let mut reader = SequenceReader::new(Cursor::new(">a\nACGT\n>\n>b\nACGT\n"));
        assert_eq!(reader.read_sequence().unwrap().unwrap().name(), "a");
        let err = reader.read_sequence().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let mut reader = SequenceReader::new(Cursor::new(">a\nACGT\n>\n"));
        assert!(reader.read_sequence().unwrap().is_some());
        assert!(reader.read_sequence().is_err());
    }

    #[test]
    fn test_empty_header_never_gives_partial_collection() {
        let mut file = tempfile::Builder::new().suffix(".fasta").tempfile().unwrap();
        write!(file, ">a\nACGT\n>\n>b\nACGT\n").unwrap();
        assert!(Sequence::from_multi_fasta_file(file.path()).is_none());
    }

    #[test]
    fn test_reader_keeps_empty_sequences() {
        let mut reader = SequenceReader::new(Cursor::new(">a\n>b\nAC\n"));
        let names: Vec<String> = reader
            .by_ref()
            .map(|s| s.unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_load_multi_fasta_file() {
        let mut file = tempfile::Builder::new().suffix(".fasta").tempfile().unwrap();
        write!(file, "{}", TWO_RECORDS).unwrap();

        let sequences = Sequence::from_multi_fasta_file(file.path()).unwrap();
        assert_eq!(sequences.len(), 2);
        assert_eq!(sequences[0].name(), "seq1");
        assert_eq!(sequences[1].name(), "seq2");
    }

    #[test]
    fn test_missing_or_malformed_file_is_unavailable() {
        assert!(Sequence::from_multi_fasta_file(Path::new("/nonexistent/seqs.fasta")).is_none());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not a fasta file").unwrap();
        assert!(Sequence::from_multi_fasta_file(file.path()).is_none());
    }

    #[test]
    fn test_load_directory_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.fa"), ">b1\nGGGG\n>b2\nCCCC\n").unwrap();
        std::fs::write(dir.path().join("a.fasta"), ">a1\nAAAA\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let sequences = Sequence::from_directory(dir.path()).unwrap();
        let names: Vec<&str> = sequences.iter().map(Sequence::name).collect();
        assert_eq!(names, vec!["a1", "b1", "b2"]);
    }

    #[test]
    fn test_directory_with_bad_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.fasta"), ">a1\nAAAA\n").unwrap();
        std::fs::write(dir.path().join("b.fasta"), "garbage\n").unwrap();
        assert!(Sequence::from_directory(dir.path()).is_none());

        let empty = tempfile::tempdir().unwrap();
        assert!(Sequence::from_directory(empty.path()).is_none());
    }

    #[test]
    fn test_filter_sequences() {
        let sequences = vec![
            Sequence::new("ecoli_1", b"ACGT".to_vec()),
            Sequence::new("ecoli_2", b"ACGT".to_vec()),
            Sequence::new("salmonella_1", b"ACGT".to_vec()),
        ];

        let include = Regex::new("^ecoli").unwrap();
        let exclude: HashSet<String> = ["ecoli_2".to_string()].into_iter().collect();
        let kept = filter_sequences(sequences, Some(&include), None, None, Some(&exclude));

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name(), "ecoli_1");
    }
}
