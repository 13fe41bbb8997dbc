//! Byte-wise comparison of the buffer against another file.

use crate::error::HexDataError;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

/// Maximum number of differing ranges kept in a report
pub const MAX_REPORTED_RANGES: usize = 1000;

#[derive(Debug, Clone, Default)]
pub struct CompareState {
    /// File to compare against
    pub file_path: PathBuf,
    /// Was `file_path` read successfully by the last run
    pub file_loaded: bool,
    /// Result of the last run
    pub report: Option<CompareReport>,
}

impl CompareState {
    pub fn set_file<P: AsRef<Path>>(&mut self, path: P) {
        self.file_path = path.as_ref().to_path_buf();
        self.file_loaded = false;
        self.report = None;
    }

    /// Reads the target file and compares it to `data`.
    ///
    /// # Errors
    /// Returns [`HexDataError::NoFilePath`] if no target is set, or [`HexDataError::Read`]
    /// if the target cannot be read.
    pub fn run(&mut self, data: &[u8]) -> Result<&CompareReport, HexDataError> {
        self.file_loaded = false;
        self.report = None;

        if self.file_path.as_os_str().is_empty() {
            return Err(HexDataError::NoFilePath);
        }

        let other = std::fs::read(&self.file_path).map_err(|source| {
            log::warn!("Cannot read compare target '{}'", self.file_path.display());
            HexDataError::Read {
                path: self.file_path.clone(),
                source,
            }
        })?;
        self.file_loaded = true;

        let report = CompareReport::new(data, &other);
        log::info!(
            "Compared with '{}': {} differing bytes",
            self.file_path.display(),
            report.differences
        );
        Ok(self.report.insert(report))
    }
}

/// Differences between two byte sequences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareReport {
    pub left_size: usize,
    pub right_size: usize,
    /// Number of differing bytes in the common prefix plus the size difference
    pub differences: usize,
    pub first_difference: Option<usize>,
    /// Differing ranges (at most [`MAX_REPORTED_RANGES`]). A tail present in only one of the
    /// inputs is reported as one range.
    pub ranges: Vec<RangeInclusive<usize>>,
    /// Were ranges dropped because of the cap
    pub truncated: bool,
}

impl CompareReport {
    /// Compares `left` to `right`.
    ///
    /// # Example
    /// ```
    /// use hexdatalib::CompareReport;
    ///
    /// let report = CompareReport::new(b"abcdef", b"abXYef");
    /// assert_eq!(report.differences, 2);
    /// assert_eq!(report.ranges, vec![2..=3]);
    /// ```
    #[must_use]
    pub fn new(left: &[u8], right: &[u8]) -> Self {
        let common = left.len().min(right.len());
        let longest = left.len().max(right.len());

        let mut report = Self {
            left_size: left.len(),
            right_size: right.len(),
            ..Self::default()
        };

        let mut open: Option<usize> = None;
        for (i, (a, b)) in left.iter().zip(right).enumerate() {
            match (a != b, open) {
                (true, None) => open = Some(i),
                (false, Some(start)) => {
                    report.push_range(start..=i - 1);
                    open = None;
                }
                _ => {}
            }
            if a != b {
                report.differences += 1;
            }
        }

        // The tail of the longer input counts as different
        match (open, longest > common) {
            (Some(start), _) => report.push_range(start..=longest - 1),
            (None, true) => report.push_range(common..=longest - 1),
            (None, false) => {}
        }
        report.differences += longest - common;
        report.first_difference = report.ranges.first().map(|r| *r.start());

        report
    }

    #[must_use]
    pub const fn is_identical(&self) -> bool {
        self.differences == 0
    }

    fn push_range(&mut self, range: RangeInclusive<usize>) {
        if self.ranges.len() < MAX_REPORTED_RANGES {
            self.ranges.push(range);
        } else {
            self.truncated = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        // Act
        let report = CompareReport::new(b"same", b"same");

        // Assert
        assert!(report.is_identical());
        assert_eq!(report.first_difference, None);
        assert!(report.ranges.is_empty());
    }

    #[test]
    fn test_several_ranges() {
        // Act
        let report = CompareReport::new(&[0, 1, 2, 3, 4, 5], &[9, 1, 9, 9, 4, 9]);

        // Assert
        assert_eq!(report.differences, 4);
        assert_eq!(report.first_difference, Some(0));
        assert_eq!(report.ranges, vec![0..=0, 2..=3, 5..=5]);
    }

    #[test]
    fn test_size_mismatch() {
        // Act
        let longer_left = CompareReport::new(b"abcdef", b"abc");
        let open_into_tail = CompareReport::new(b"abX", b"abcdef");

        // Assert
        assert_eq!(longer_left.differences, 3);
        assert_eq!(longer_left.ranges, vec![3..=5]);
        assert_eq!(open_into_tail.differences, 4);
        assert_eq!(open_into_tail.ranges, vec![2..=5]);
    }

    #[test]
    fn test_ranges_are_capped() {
        // Arrange
        let left = vec![0u8; MAX_REPORTED_RANGES * 4];
        let right: Vec<u8> = (0..left.len()).map(|i| u8::from(i % 2 == 0)).collect();

        // Act
        let report = CompareReport::new(&left, &right);

        // Assert
        assert_eq!(report.ranges.len(), MAX_REPORTED_RANGES);
        assert!(report.truncated);
        assert_eq!(report.differences, MAX_REPORTED_RANGES * 2);
    }

    #[test]
    fn test_run_without_target() {
        // Arrange
        let mut state = CompareState::default();

        // Act
        let res = state.run(b"abc");

        // Assert
        assert!(matches!(res, Err(HexDataError::NoFilePath)));
    }

    #[test]
    fn test_run_missing_target() {
        // Arrange
        let mut state = CompareState::default();
        state.set_file("build/missing/compare-target.bin");

        // Act
        let res = state.run(b"abc");

        // Assert
        assert!(res.is_err());
        assert!(!state.file_loaded);
        assert!(state.report.is_none());
    }
}
