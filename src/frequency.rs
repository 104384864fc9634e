//! Byte frequency analysis
//!
//! One pass over the input, 256 fixed buckets.

/// Occurrence count per byte value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
    total: u64,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            counts: [0; 256],
            total: 0,
        }
    }
}

impl FrequencyTable {
    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::default();
        for &b in data {
            table.counts[b as usize] += 1;
        }
        table.total = data.len() as u64;
        table
    }

    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct symbols with a non-zero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Present symbols and their counts, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(i, &c)| (i as u8, c))
    }

    /// Shannon entropy in bits per byte.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let len = self.total as f64;
        let mut entropy = 0.0;
        for (_, f) in self.iter() {
            let p = f as f64 / len;
            entropy -= p * p.log2();
        }
        entropy
    }
}

impl FromIterator<(u8, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
        let mut table = Self::default();
        for (symbol, count) in iter {
            table.counts[symbol as usize] += count;
            table.total += count;
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let table = FrequencyTable::from_bytes(b"");
        assert!(table.is_empty());
        assert_eq!(table.distinct(), 0);
        assert_eq!(table.iter().count(), 0);
        assert_eq!(table.entropy(), 0.0);
    }

    #[test]
    fn test_counts() {
        let table = FrequencyTable::from_bytes(b"hello world");
        assert_eq!(table.count(b'l'), 3);
        assert_eq!(table.count(b'o'), 2);
        assert_eq!(table.count(b'h'), 1);
        assert_eq!(table.count(b'z'), 0);
        assert_eq!(table.total(), 11);
        assert_eq!(table.distinct(), 8);
    }

    #[test]
    fn test_iter_ascending_and_nonzero() {
        let table = FrequencyTable::from_bytes(&[0xFF, 0x00, 0x7F, 0x00]);
        let pairs: Vec<_> = table.iter().collect();
        assert_eq!(pairs, vec![(0x00, 2), (0x7F, 1), (0xFF, 1)]);
    }

    #[test]
    fn test_entropy() {
        let uniform = FrequencyTable::from_bytes(&[42u8; 100]);
        assert!(uniform.entropy() < 0.01, "single symbol should have ~0 entropy");

        let all: Vec<u8> = (0..=255).collect();
        let spread = FrequencyTable::from_bytes(&all);
        assert!((spread.entropy() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_iter_skips_zero_counts() {
        let table: FrequencyTable = [(b'a', 3), (b'b', 0), (b'c', 1)].into_iter().collect();
        assert_eq!(table.distinct(), 2);
        assert_eq!(table.total(), 4);
    }
}
