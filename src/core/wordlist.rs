// wordlist.rs - Spaced-word extraction and encoding

use std::cmp::Ordering;

use crate::core::errors::SpamError;
use crate::core::pattern::Pattern;
use crate::data::Sequence;

/// A packed spaced word, two bits per sampled base.
pub type Word = u64;

/// Largest number of match positions that fit into one [`Word`].
pub const MAX_WORDSIZE: usize = Word::BITS as usize / 2;

/// The sorted spaced words of a single sequence under a single pattern.
///
/// Windows that sample anything other than `A`, `C`, `G` or `T` (in either
/// case) are dropped, so ambiguity codes and gaps never produce a word.
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<Word>,
    pattern: Pattern,
}

impl WordList {
    pub fn max_wordsize() -> usize {
        MAX_WORDSIZE
    }

    /// Extract the words of `sequence` using the first `k` match positions
    /// of `pattern`.
    pub fn new(pattern: &Pattern, sequence: &Sequence, k: usize) -> Result<Self, SpamError> {
        if k == 0 || k > MAX_WORDSIZE || k > pattern.weight() {
            return Err(SpamError::WordCapacity {
                requested: k,
                max: MAX_WORDSIZE.min(pattern.weight()),
            });
        }

        let pattern = if k < pattern.weight() {
            pattern.reduce(k)?
        } else {
            pattern.clone()
        };

        let words = extract_words(&pattern, sequence.bases());
        Ok(Self { words, pattern })
    }

    /// Extract words using every match position of `pattern`.
    pub fn from_pattern(pattern: &Pattern, sequence: &Sequence) -> Result<Self, SpamError> {
        Self::new(pattern, sequence, pattern.weight())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn as_slice(&self) -> &[Word] {
        &self.words
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Word> {
        self.words.iter()
    }

    /// The (possibly reduced) pattern the words were sampled with.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Number of spaced-word matches shared with `other`.
    pub fn matches(&self, other: &WordList) -> usize {
        count_matches(&self.words, &other.words)
    }
}

impl<'a> IntoIterator for &'a WordList {
    type Item = &'a Word;
    type IntoIter = std::slice::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

#[inline]
fn encode_base(base: u8) -> Option<Word> {
    match base {
        b'A' | b'a' => Some(0b00),
        b'C' | b'c' => Some(0b01),
        b'G' | b'g' => Some(0b10),
        b'T' | b't' => Some(0b11),
        _ => None,
    }
}

fn extract_words(pattern: &Pattern, bases: &[u8]) -> Vec<Word> {
    let size = pattern.size();
    if bases.len() < size {
        return Vec::new();
    }

    let last_start = bases.len() - size;
    let mut words = Vec::with_capacity(last_start + 1);

    'windows: for start in 0..=last_start {
        let mut word: Word = 0;
        for &offset in pattern {
            match encode_base(bases[start + offset]) {
                Some(code) => word = (word << 2) | code,
                None => continue 'windows,
            }
        }
        words.push(word);
    }

    words.sort_unstable();
    words
}

/// Size of the multiset intersection of two ascending word lists.
///
/// Equal runs pair up one-to-one, so a word occurring three times in `a` and
/// twice in `b` contributes two matches.
pub fn count_matches(a: &[Word], b: &[Word]) -> usize {
    let (mut i, mut j) = (0, 0);
    let mut matches = 0;

    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                matches += 1;
                i += 1;
                j += 1;
            }
        }
    }

    matches
}
