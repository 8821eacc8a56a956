// pattern.rs - Binary spaced-word patterns

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use crate::core::errors::SpamError;

/// A binary mask over a fixed-width window. Positions holding `1` ("match
/// positions") are sampled into a spaced word, positions holding `0` are
/// ignored.
///
/// A `Pattern` can only be obtained through [`Pattern::new`] (or
/// [`str::parse`]), which rejects anything but `0` and `1`.
#[derive(Debug, Clone)]
pub struct Pattern {
    bits: String,
    indices: Vec<usize>,
}

impl Pattern {
    /// Parse a pattern such as `"1101011"`.
    pub fn new(bits: &str) -> Result<Self, SpamError> {
        let mut indices = Vec::with_capacity(bits.len());
        for (position, symbol) in bits.chars().enumerate() {
            match symbol {
                '1' => indices.push(position),
                '0' => {}
                _ => return Err(SpamError::InvalidPattern { position, symbol }),
            }
        }

        Ok(Self {
            bits: bits.to_string(),
            indices,
        })
    }

    /// Keep only the first `k` match positions. The window is cut right
    /// after the k-th match position.
    pub fn reduce(&self, k: usize) -> Result<Self, SpamError> {
        if k > self.weight() {
            return Err(SpamError::WeightOutOfRange {
                requested: k,
                weight: self.weight(),
            });
        }

        let size = match k {
            0 => 0,
            _ => self.indices[k - 1] + 1,
        };

        Ok(Self {
            bits: self.bits[..size].to_string(),
            indices: self.indices[..k].to_vec(),
        })
    }

    /// Window width, including don't-care positions.
    pub fn size(&self) -> usize {
        self.bits.len()
    }

    /// Number of match positions.
    pub fn weight(&self) -> usize {
        self.indices.len()
    }

    /// Bounds-checked access to the n-th match position.
    pub fn get(&self, n: usize) -> Result<usize, SpamError> {
        self.indices
            .get(n)
            .copied()
            .ok_or(SpamError::IndexOutOfBounds {
                index: n,
                len: self.indices.len(),
            })
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.indices.iter()
    }

    pub fn as_str(&self) -> &str {
        &self.bits
    }
}

// Trailing don't-care positions do not change which bases are sampled.
impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.indices == other.indices
    }
}

impl Eq for Pattern {}

impl Index<usize> for Pattern {
    type Output = usize;

    fn index(&self, n: usize) -> &usize {
        &self.indices[n]
    }
}

impl<'a> IntoIterator for &'a Pattern {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter()
    }
}

impl FromStr for Pattern {
    type Err = SpamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::new(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_and_size() {
        for bits in ["1", "111", "10101", "1100101001", "0000", ""] {
            let pattern = Pattern::new(bits).unwrap();
            assert_eq!(pattern.size(), bits.len());
            assert_eq!(pattern.weight(), bits.chars().filter(|&c| c == '1').count());
            assert!(pattern.weight() <= pattern.size());
        }
    }

    #[test]
    fn test_indices_ascending() {
        let pattern = Pattern::new("1101001").unwrap();
        assert_eq!(pattern.indices(), &[0, 1, 3, 6]);
        assert_eq!(pattern.iter().copied().collect::<Vec<_>>(), vec![0, 1, 3, 6]);
        assert_eq!(pattern[2], 3);
        assert_eq!(pattern.get(3).unwrap(), 6);
    }

    #[test]
    fn test_invalid_symbols() {
        assert_eq!(
            Pattern::new("1012").unwrap_err(),
            SpamError::InvalidPattern { position: 3, symbol: '2' }
        );
        assert!(Pattern::new("11 1").is_err());
        assert!("1x1".parse::<Pattern>().is_err());
    }

    #[test]
    fn test_get_out_of_range() {
        let pattern = Pattern::new("101").unwrap();
        assert_eq!(
            pattern.get(2).unwrap_err(),
            SpamError::IndexOutOfBounds { index: 2, len: 2 }
        );
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range_panics() {
        let pattern = Pattern::new("101").unwrap();
        let position = pattern[5];
        assert_eq!(position, 0);
    }

    #[test]
    fn test_reduce() {
        let pattern = Pattern::new("1100101001").unwrap();
        for k in 0..=pattern.weight() {
            let reduced = pattern.reduce(k).unwrap();
            assert_eq!(reduced.weight(), k);
            assert_eq!(reduced.indices(), &pattern.indices()[..k]);
        }

        let reduced = pattern.reduce(3).unwrap();
        assert_eq!(reduced.as_str(), "11001");
        assert_eq!(reduced.size(), 5);
        assert_eq!(pattern.reduce(0).unwrap().size(), 0);
    }

    #[test]
    fn test_reduce_out_of_range() {
        let pattern = Pattern::new("10101").unwrap();
        assert_eq!(
            pattern.reduce(4).unwrap_err(),
            SpamError::WeightOutOfRange { requested: 4, weight: 3 }
        );
    }

    #[test]
    fn test_equality_ignores_trailing_zeros() {
        let a = Pattern::new("1011").unwrap();
        let b = Pattern::new("1011000").unwrap();
        let c = Pattern::new("0111").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(Pattern::new("1011010").unwrap().reduce(3).unwrap(), a);
    }

    #[test]
    fn test_display_roundtrip() {
        let pattern: Pattern = "1001011".parse().unwrap();
        assert_eq!(pattern.to_string(), "1001011");
    }
}
