//! Byte frequency counting.
//!
//! The table holds one counter per byte value. Symbols that never occur are
//! skipped by [`FrequencyTable::iter`], which always yields symbols in
//! ascending order so tree construction is reproducible.

/// Occurrence counts for each byte value of an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self { counts: [0; 256] }
    }

    /// Count every byte of `bytes` in a single pass.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = Self::new();
        table.update(bytes);
        table
    }

    /// Add the bytes of `bytes` to the existing counts.
    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.counts[byte as usize] += 1;
        }
    }

    /// Count for one symbol (0 if it never occurred).
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Iterate `(symbol, count)` pairs with non-zero count, ascending by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    /// Number of symbols that occur at least once.
    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let table = FrequencyTable::from_bytes(b"");
        assert!(table.is_empty());
        assert_eq!(table.distinct_symbols(), 0);
        assert_eq!(table.total(), 0);
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn test_counts() {
        let table = FrequencyTable::from_bytes(b"abracadabra");
        assert_eq!(table.get(b'a'), 5);
        assert_eq!(table.get(b'b'), 2);
        assert_eq!(table.get(b'r'), 2);
        assert_eq!(table.get(b'c'), 1);
        assert_eq!(table.get(b'd'), 1);
        assert_eq!(table.get(b'z'), 0);
        assert_eq!(table.distinct_symbols(), 5);
        assert_eq!(table.total(), 11);
    }

    #[test]
    fn test_iter_ascending_and_skips_zero() {
        let table = FrequencyTable::from_bytes(&[0xFF, 0x00, 0x7F, 0xFF]);
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries, vec![(0x00, 1), (0x7F, 1), (0xFF, 2)]);
    }

    #[test]
    fn test_update_accumulates() {
        let mut table = FrequencyTable::from_bytes(b"aa");
        table.update(b"ab");
        assert_eq!(table.get(b'a'), 3);
        assert_eq!(table.get(b'b'), 1);
        assert_eq!(table.total(), 4);
    }
}
