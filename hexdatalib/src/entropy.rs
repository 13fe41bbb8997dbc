//! Shannon entropy of the buffer, in bits per byte (`0.0..=8.0`).

pub const DEFAULT_BLOCK_SIZE: usize = 256;

/// Entropy of `data`. An empty slice has entropy `0.0`.
///
/// # Example
/// ```
/// use hexdatalib::shannon_entropy;
///
/// let all_values: Vec<u8> = (0..=255).collect();
/// assert!((shannon_entropy(&all_values) - 8.0).abs() < 1e-9);
/// assert_eq!(shannon_entropy(&[7; 100]), 0.0);
/// ```
#[must_use]
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut counts = [0usize; 256];
    for &b in data {
        counts[usize::from(b)] += 1;
    }

    let len = data.len() as f64;
    let entropy: f64 = counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / len;
            -p * p.log2()
        })
        .sum();

    // -0.0 for single-valued input
    entropy.max(0.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntropyReport {
    /// Entropy of the whole buffer
    pub overall: f64,
    pub block_size: usize,
    /// Entropy of each block, the last one may be shorter
    pub blocks: Vec<f64>,
}

impl EntropyReport {
    /// Computes the overall and per-block entropy. A `block_size` of 0 falls back to
    /// [`DEFAULT_BLOCK_SIZE`].
    #[must_use]
    pub fn new(data: &[u8], block_size: usize) -> Self {
        let block_size = if block_size == 0 {
            DEFAULT_BLOCK_SIZE
        } else {
            block_size
        };
        Self {
            overall: shannon_entropy(data),
            block_size,
            blocks: data.chunks(block_size).map(shannon_entropy).collect(),
        }
    }

    /// Index and value of the block with the highest entropy
    #[must_use]
    pub fn max_block(&self) -> Option<(usize, f64)> {
        self.blocks
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        // Act
        let report = EntropyReport::new(&[], 256);

        // Assert
        assert!(report.overall.abs() < f64::EPSILON);
        assert!(report.blocks.is_empty());
        assert_eq!(report.max_block(), None);
    }

    #[test]
    fn test_two_symbols() {
        // Arrange
        let data: Vec<u8> = (0..1000).map(|i| if i % 2 == 0 { 0xAA } else { 0x55 }).collect();

        // Act
        let entropy = shannon_entropy(&data);

        // Assert
        assert!((entropy - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_blocks() {
        // Arrange
        let mut data = vec![0u8; 256];
        data.extend(0..=255u8);
        data.extend([1, 2]);

        // Act
        let report = EntropyReport::new(&data, 256);

        // Assert
        assert_eq!(report.blocks.len(), 3);
        assert!(report.blocks[0].abs() < f64::EPSILON);
        assert!((report.blocks[1] - 8.0).abs() < 1e-9);
        assert!((report.blocks[2] - 1.0).abs() < 1e-9);
        assert_eq!(report.max_block().map(|(i, _)| i), Some(1));
    }

    #[test]
    fn test_zero_block_size() {
        // Act
        let report = EntropyReport::new(&[0u8; 600], 0);

        // Assert
        assert_eq!(report.block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(report.blocks.len(), 3);
    }
}
