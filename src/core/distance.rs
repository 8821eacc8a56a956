// distance.rs - Parallel spaced-word distance matrix

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rayon::ThreadPool;

use crate::core::errors::SpamError;
use crate::core::estimator::{DistanceEstimator, Estimate, JukesCantor};
use crate::core::pattern::Pattern;
use crate::core::wordlist::{WordList, MAX_WORDSIZE};
use crate::data::Sequence;

/// Default number of decimals used when a matrix is displayed
const DEFAULT_PRECISION: usize = 6;

/// Knobs for [`DistanceMatrix::with_options`]
#[derive(Clone)]
pub struct MatrixOptions {
    pub estimator: Arc<dyn DistanceEstimator>,
    /// Use only the first `k` match positions of the pattern
    pub weight: Option<usize>,
    /// Draw progress bars on stderr while computing
    pub show_progress: bool,
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self {
            estimator: Arc::new(JukesCantor),
            weight: None,
            show_progress: false,
        }
    }
}

/// Symmetric matrix of spaced-word distances between every pair of input
/// sequences. Rows and columns follow the input order.
///
/// The matrix is computed completely inside the constructor and never
/// changes afterwards, so it can be shared across threads freely.
pub struct DistanceMatrix {
    sequences: Vec<Sequence>,
    pattern: Pattern,
    weight: usize,
    wordlists: Vec<WordList>,
    matrix: Vec<Vec<f64>>,
    auxiliary: Vec<Vec<f64>>,
    estimator: Arc<dyn DistanceEstimator>,
    pool: Arc<ThreadPool>,
}

impl DistanceMatrix {
    /// Compute the Jukes-Cantor matrix using every match position of
    /// `pattern`.
    pub fn new(
        sequences: Vec<Sequence>,
        pattern: Pattern,
        pool: Arc<ThreadPool>,
    ) -> Result<Self, SpamError> {
        Self::with_options(sequences, pattern, pool, MatrixOptions::default())
    }

    pub fn with_options(
        sequences: Vec<Sequence>,
        pattern: Pattern,
        pool: Arc<ThreadPool>,
        options: MatrixOptions,
    ) -> Result<Self, SpamError> {
        if sequences.is_empty() {
            return Err(SpamError::EmptySequenceSet);
        }

        let weight = options.weight.unwrap_or(pattern.weight());
        if weight == 0 || weight > MAX_WORDSIZE || weight > pattern.weight() {
            return Err(SpamError::WordCapacity {
                requested: weight,
                max: MAX_WORDSIZE.min(pattern.weight()),
            });
        }

        let wordlists =
            create_wordlists(&sequences, &pattern, weight, &pool, options.show_progress)?;
        let (matrix, auxiliary) = calculate_matrix(
            &wordlists,
            weight,
            options.estimator.as_ref(),
            &pool,
            options.show_progress,
        );

        Ok(Self {
            sequences,
            pattern,
            weight,
            wordlists,
            matrix,
            auxiliary,
            estimator: options.estimator,
            pool,
        })
    }

    /// Recompute the matrix from the same sequences using only the first `k`
    /// match positions, on the same worker pool and estimator. `k` may not
    /// exceed the weight this matrix was built with.
    pub fn reduced(&self, k: usize) -> Result<Self, SpamError> {
        if k > self.weight {
            return Err(SpamError::WeightOutOfRange {
                requested: k,
                weight: self.weight,
            });
        }
        let pattern = self.pattern.reduce(k)?;
        let options = MatrixOptions {
            estimator: Arc::clone(&self.estimator),
            weight: None,
            show_progress: false,
        };
        Self::with_options(self.sequences.clone(), pattern, Arc::clone(&self.pool), options)
    }

    /// Number of sequences (rows and columns)
    pub fn size(&self) -> usize {
        self.sequences.len()
    }

    /// The i-th sequence together with its row of distances
    pub fn column(&self, i: usize) -> Result<(&Sequence, &[f64]), SpamError> {
        self.check_index(i)?;
        Ok((&self.sequences[i], &self.matrix[i]))
    }

    /// The i-th sequence together with the estimator's auxiliary values
    pub fn auxiliary_column(&self, i: usize) -> Result<(&Sequence, &[f64]), SpamError> {
        self.check_index(i)?;
        Ok((&self.sequences[i], &self.auxiliary[i]))
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.matrix.get(i)?.get(j).copied()
    }

    pub fn estimate(&self, i: usize, j: usize) -> Option<Estimate> {
        Some(Estimate {
            distance: self.get(i, j)?,
            auxiliary: *self.auxiliary.get(i)?.get(j)?,
        })
    }

    pub fn wordlist(&self, i: usize) -> Result<&WordList, SpamError> {
        self.check_index(i)?;
        Ok(&self.wordlists[i])
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Number of bases per spaced word actually used
    pub fn weight(&self) -> usize {
        self.weight
    }

    pub fn estimator_name(&self) -> &'static str {
        self.estimator.name()
    }

    pub fn pool(&self) -> &Arc<ThreadPool> {
        &self.pool
    }

    /// Rows of the distance matrix in input order
    pub fn rows(&self) -> impl Iterator<Item = (&Sequence, &[f64])> {
        self.sequences
            .iter()
            .zip(self.matrix.iter().map(Vec::as_slice))
    }

    fn check_index(&self, i: usize) -> Result<(), SpamError> {
        if i >= self.size() {
            return Err(SpamError::IndexOutOfBounds {
                index: i,
                len: self.size(),
            });
        }
        Ok(())
    }
}

fn progress_bar(len: u64, visible: bool, template: &str) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// Build one word list per sequence. Returns only once every list exists.
fn create_wordlists(
    sequences: &[Sequence],
    pattern: &Pattern,
    weight: usize,
    pool: &ThreadPool,
    show_progress: bool,
) -> Result<Vec<WordList>, SpamError> {
    let start = Instant::now();
    let pb = progress_bar(
        sequences.len() as u64,
        show_progress,
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} word lists",
    );

    let wordlists = pool.install(|| {
        sequences
            .par_iter()
            .map(|sequence| {
                let wordlist = WordList::new(pattern, sequence, weight);
                pb.inc(1);
                wordlist
            })
            .collect::<Result<Vec<_>, _>>()
    })?;

    pb.finish_and_clear();
    if show_progress {
        let total_words: usize = wordlists.iter().map(WordList::len).sum();
        eprintln!(
            "✅ {} word lists built in {:.2}s ({} spaced words)",
            wordlists.len(),
            start.elapsed().as_secs_f64(),
            total_words
        );
    }

    Ok(wordlists)
}

/// Estimate every pair `i < j` on the pool and mirror the results.
fn calculate_matrix(
    wordlists: &[WordList],
    weight: usize,
    estimator: &dyn DistanceEstimator,
    pool: &ThreadPool,
    show_progress: bool,
) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let n = wordlists.len();
    let mut matrix = vec![vec![f64::NAN; n]; n];
    let mut auxiliary = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        matrix[i][i] = Estimate::IDENTICAL.distance;
        auxiliary[i][i] = Estimate::IDENTICAL.auxiliary;
    }

    let start = Instant::now();
    let total_comparisons = n * n.saturating_sub(1) / 2;
    if show_progress {
        eprintln!(
            "🔄 Computing distance matrix ({} × {} = {} comparisons)...",
            n, n, total_comparisons
        );
    }

    let pb = progress_bar(
        total_comparisons as u64,
        show_progress,
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {per_sec} ETA: {eta}",
    );
    let update_interval = std::cmp::max(1, total_comparisons / 100);
    let progress_counter = AtomicUsize::new(0);

    let upper_triangle: Vec<(usize, usize, Estimate)> = pool.install(|| {
        (0..n)
            .into_par_iter()
            .flat_map(|i| {
                let pb = pb.clone();
                let progress_counter = &progress_counter;
                (i + 1..n).into_par_iter().map(move |j| {
                    let (a, b) = (&wordlists[i], &wordlists[j]);
                    let matches = a.matches(b);
                    let estimate = estimator.estimate(matches, a.len(), b.len(), weight);

                    let count = progress_counter.fetch_add(1, Ordering::Relaxed) + 1;
                    if count % update_interval == 0 {
                        pb.set_position(count as u64);
                    }

                    (i, j, estimate)
                })
            })
            .collect()
    });

    pb.finish_and_clear();

    for (i, j, estimate) in upper_triangle {
        matrix[i][j] = estimate.distance;
        matrix[j][i] = estimate.distance;
        auxiliary[i][j] = estimate.auxiliary;
        auxiliary[j][i] = estimate.auxiliary;
    }

    if show_progress {
        eprintln!("✅ Distance matrix computed in {:.2}s", start.elapsed().as_secs_f64());
    }

    (matrix, auxiliary)
}

/// PHYLIP square matrix: sequence count, then one row per sequence. The
/// formatter precision selects the number of decimals (default 6).
impl fmt::Display for DistanceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(DEFAULT_PRECISION);

        writeln!(f, "{}", self.size())?;
        for (sequence, row) in self.rows() {
            write!(f, "{:<10}", sequence.name())?;
            for value in row {
                write!(f, "  {:.*}", precision, value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::estimator::{PDistance, MAX_DISTANCE};
    use crate::core::executor::build_pool;

    fn seq(name: &str, bases: &str) -> Sequence {
        Sequence::new(name, bases.as_bytes().to_vec())
    }

    fn sample_sequences() -> Vec<Sequence> {
        vec![
            seq("alpha", "ACGTTGCAAGCTTAGCCGATAGGCTTACGATCGATTGCA"),
            seq("beta", "ACGTTGCAAGCTTAGCCGTTAGGCTTACGATCGATAGCA"),
            seq("gamma", "ACGATGCTAGCTTACCCGATAGGATTACGTTCGATTGCA"),
            seq("delta", "TTTTGCAAGCTTAGNNNNATAGGCTTACGATCGATTGCA"),
        ]
    }

    #[test]
    fn test_matrix_is_symmetric_with_zero_diagonal() {
        let pool = build_pool(Some(2)).unwrap();
        let pattern = Pattern::new("1101").unwrap();
        let matrix = DistanceMatrix::new(sample_sequences(), pattern, pool).unwrap();

        assert_eq!(matrix.size(), 4);
        for i in 0..matrix.size() {
            assert_eq!(matrix.get(i, i), Some(0.0));
            for j in 0..matrix.size() {
                let value = matrix.get(i, j).unwrap();
                assert!(value.is_finite());
                assert_eq!(value, matrix.get(j, i).unwrap());
                assert_eq!(matrix.estimate(i, j), matrix.estimate(j, i));
            }
        }
    }

    #[test]
    fn test_cell_matches_estimator() {
        let pool = build_pool(Some(2)).unwrap();
        let pattern = Pattern::new("111").unwrap();
        let sequences = vec![seq("a", "ACGTACGT"), seq("b", "ACGTACGA")];
        let matrix = DistanceMatrix::new(sequences, pattern, pool).unwrap();

        // [6,6,27,27,44,49] against [6,6,24,27,44,49]
        assert_eq!(matrix.wordlist(0).unwrap().matches(matrix.wordlist(1).unwrap()), 5);
        let expected = JukesCantor.estimate(5, 6, 6, 3);
        assert_eq!(matrix.estimate(0, 1), Some(expected));
        assert!(expected.distance > 0.0);
    }

    #[test]
    fn test_identical_sequences_have_zero_distance() {
        let pool = build_pool(Some(2)).unwrap();
        let pattern = Pattern::new("10011").unwrap();
        let sequences = vec![
            seq("x", "ACGGTACCGTTAGCA"),
            seq("y", "ACGGTACCGTTAGCA"),
        ];
        let matrix = DistanceMatrix::new(sequences, pattern, pool).unwrap();
        assert_eq!(matrix.get(0, 1), Some(0.0));
    }

    #[test]
    fn test_disjoint_sequences_get_sentinel() {
        let pool = build_pool(Some(2)).unwrap();
        let pattern = Pattern::new("11").unwrap();
        let sequences = vec![
            seq("a", "AAAAAAAAAA"),
            seq("c", "CCCCCCCCCC"),
            seq("n", "NNNNNNNNNN"),
        ];
        let matrix = DistanceMatrix::new(sequences, pattern, pool).unwrap();

        assert_eq!(matrix.get(0, 1), Some(MAX_DISTANCE));
        assert_eq!(matrix.get(0, 2), Some(MAX_DISTANCE));
        assert_eq!(matrix.get(2, 2), Some(0.0));
    }

    #[test]
    fn test_column_access() {
        let pool = build_pool(Some(2)).unwrap();
        let pattern = Pattern::new("1101").unwrap();
        let sequences = sample_sequences();
        let matrix = DistanceMatrix::new(sequences.clone(), pattern, pool).unwrap();

        for i in 0..matrix.size() {
            let (sequence, row) = matrix.column(i).unwrap();
            assert_eq!(sequence, &sequences[i]);
            assert_eq!(row.len(), matrix.size());
            for (j, value) in row.iter().enumerate() {
                assert_eq!(Some(*value), matrix.get(i, j));
            }
        }

        assert!(matches!(
            matrix.column(4),
            Err(SpamError::IndexOutOfBounds { index: 4, len: 4 })
        ));
        assert!(matrix.auxiliary_column(9).is_err());
        assert!(matrix.wordlist(4).is_err());
        assert_eq!(matrix.get(4, 0), None);
    }

    #[test]
    fn test_empty_input_rejected() {
        let pool = build_pool(Some(1)).unwrap();
        let pattern = Pattern::new("11").unwrap();
        assert!(matches!(
            DistanceMatrix::new(Vec::new(), pattern, pool),
            Err(SpamError::EmptySequenceSet)
        ));
    }

    #[test]
    fn test_overweight_pattern_rejected() {
        let pool = build_pool(Some(1)).unwrap();
        let pattern = Pattern::new(&"1".repeat(33)).unwrap();
        let sequences = vec![seq("a", &"ACGT".repeat(20))];
        assert!(matches!(
            DistanceMatrix::new(sequences.clone(), pattern.clone(), Arc::clone(&pool)),
            Err(SpamError::WordCapacity { requested: 33, .. })
        ));

        let options = MatrixOptions {
            weight: Some(32),
            ..MatrixOptions::default()
        };
        let matrix = DistanceMatrix::with_options(sequences, pattern, pool, options).unwrap();
        assert_eq!(matrix.weight(), 32);
    }

    #[test]
    fn test_single_sequence() {
        let pool = build_pool(Some(1)).unwrap();
        let pattern = Pattern::new("11").unwrap();
        let matrix = DistanceMatrix::new(vec![seq("only", "ACGT")], pattern, pool).unwrap();
        assert_eq!(matrix.size(), 1);
        assert_eq!(matrix.column(0).unwrap().1, &[0.0]);
    }

    #[test]
    fn test_reduced_weight_matrix() {
        let pool = build_pool(Some(2)).unwrap();
        let pattern = Pattern::new("1101011").unwrap();
        let matrix = DistanceMatrix::new(sample_sequences(), pattern, pool).unwrap();
        let reduced = matrix.reduced(3).unwrap();

        assert_eq!(reduced.weight(), 3);
        assert_eq!(reduced.pattern().as_str(), "1101");
        assert_eq!(reduced.size(), matrix.size());
        assert!(Arc::ptr_eq(reduced.pool(), matrix.pool()));
        assert!(matches!(matrix.reduced(6), Err(SpamError::WeightOutOfRange { .. })));
    }

    #[test]
    fn test_reduced_never_exceeds_effective_weight() {
        let pool = build_pool(Some(2)).unwrap();
        let pattern = Pattern::new("1101011").unwrap();
        let options = MatrixOptions {
            weight: Some(3),
            ..MatrixOptions::default()
        };
        let matrix =
            DistanceMatrix::with_options(sample_sequences(), pattern, pool, options).unwrap();
        assert_eq!(matrix.weight(), 3);

        assert_eq!(
            matrix.reduced(4).err(),
            Some(SpamError::WeightOutOfRange {
                requested: 4,
                weight: 3
            })
        );
        assert_eq!(matrix.reduced(3).unwrap().weight(), 3);
        assert_eq!(matrix.reduced(2).unwrap().weight(), 2);
    }

    #[test]
    fn test_alternate_estimator() {
        let pool = build_pool(Some(2)).unwrap();
        let pattern = Pattern::new("1101").unwrap();
        let options = MatrixOptions {
            estimator: Arc::new(PDistance),
            show_progress: true,
            ..MatrixOptions::default()
        };
        let matrix =
            DistanceMatrix::with_options(sample_sequences(), pattern, pool, options).unwrap();

        assert_eq!(matrix.estimator_name(), "p-distance");
        for i in 0..matrix.size() {
            for j in 0..matrix.size() {
                let value = matrix.get(i, j).unwrap();
                assert!((0.0..=1.0).contains(&value));
            }
        }
    }

    #[test]
    fn test_shared_pool_concurrent_matrices() {
        let pool = build_pool(Some(2)).unwrap();
        let pattern = Pattern::new("1011").unwrap();

        let results: Vec<Vec<f64>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..3)
                .map(|_| {
                    let pool = Arc::clone(&pool);
                    let pattern = pattern.clone();
                    scope.spawn(move || {
                        let matrix =
                            DistanceMatrix::new(sample_sequences(), pattern, pool).unwrap();
                        matrix.column(1).unwrap().1.to_vec()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results[0], results[1]);
        assert_eq!(results[1], results[2]);
    }

    #[test]
    fn test_matrix_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DistanceMatrix>();
    }

    #[test]
    fn test_display_phylip() {
        let pool = build_pool(Some(1)).unwrap();
        let pattern = Pattern::new("11").unwrap();
        let sequences = vec![seq("a", "AAAAAA"), seq("b", "AAAAAA"), seq("c", "CCCCCC")];
        let matrix = DistanceMatrix::new(sequences, pattern, pool).unwrap();

        let text = format!("{:.2}", matrix);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "3");
        assert_eq!(lines[1], "a           0.00  0.00  10.00");
        assert_eq!(lines[3], "c           10.00  10.00  0.00");

        let default = matrix.to_string();
        assert!(default.lines().nth(1).unwrap().ends_with("10.000000"));
    }
}
