//! Digest computation over the whole buffer or the current selection.

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fmt::Write;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Crc32,
}

impl ChecksumAlgorithm {
    pub const ALL: [Self; 4] = [Self::Md5, Self::Sha1, Self::Sha256, Self::Crc32];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
            Self::Crc32 => "CRC32",
        }
    }

    /// Lowercase hex digest of `data`
    #[must_use]
    pub fn digest(self, data: &[u8]) -> String {
        match self {
            Self::Md5 => to_hex(&Md5::digest(data)),
            Self::Sha1 => to_hex(&Sha1::digest(data)),
            Self::Sha256 => to_hex(&Sha256::digest(data)),
            Self::Crc32 => format!("{:08x}", crc32fast::hash(data)),
        }
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

/// Which digests to compute and over what
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumState {
    pub md5: bool,
    pub sha1: bool,
    pub sha256: bool,
    pub crc32: bool,
    /// Whole buffer (`true`) or the current selection (`false`)
    pub entire_file: bool,
    /// Digest pasted by the user for verification
    pub expected: String,
}

impl Default for ChecksumState {
    fn default() -> Self {
        Self {
            md5: true,
            sha1: false,
            sha256: true,
            crc32: true,
            entire_file: true,
            expected: String::new(),
        }
    }
}

impl ChecksumState {
    /// Selected algorithms in display order
    #[must_use]
    pub fn selected(&self) -> Vec<ChecksumAlgorithm> {
        ChecksumAlgorithm::ALL
            .into_iter()
            .filter(|algo| self.is_selected(*algo))
            .collect()
    }

    #[must_use]
    pub const fn is_selected(&self, algo: ChecksumAlgorithm) -> bool {
        match algo {
            ChecksumAlgorithm::Md5 => self.md5,
            ChecksumAlgorithm::Sha1 => self.sha1,
            ChecksumAlgorithm::Sha256 => self.sha256,
            ChecksumAlgorithm::Crc32 => self.crc32,
        }
    }

    pub const fn toggle(&mut self, algo: ChecksumAlgorithm) {
        match algo {
            ChecksumAlgorithm::Md5 => self.md5 = !self.md5,
            ChecksumAlgorithm::Sha1 => self.sha1 = !self.sha1,
            ChecksumAlgorithm::Sha256 => self.sha256 = !self.sha256,
            ChecksumAlgorithm::Crc32 => self.crc32 = !self.crc32,
        }
    }

    /// Computes the selected digests. When `entire_file` is off and a selection is given,
    /// only the selected bytes are hashed.
    ///
    /// # Example
    /// ```
    /// use hexdatalib::{ChecksumAlgorithm, ChecksumState};
    ///
    /// let state = ChecksumState::default();
    /// let res = state.compute(b"abc", None);
    /// assert_eq!(res.get(ChecksumAlgorithm::Crc32), Some("352441c2"));
    /// ```
    #[must_use]
    pub fn compute(&self, data: &[u8], selection: Option<RangeInclusive<usize>>) -> ChecksumResults {
        let (slice, range) = match selection {
            Some(sel) if !self.entire_file && !data.is_empty() => {
                let start = (*sel.start()).min(data.len() - 1);
                let end = (*sel.end()).min(data.len() - 1);
                (&data[start..=end], Some(start..=end))
            }
            _ => (data, None),
        };

        ChecksumResults {
            range,
            size: slice.len(),
            digests: self
                .selected()
                .into_iter()
                .map(|algo| (algo, algo.digest(slice)))
                .collect(),
        }
    }
}

/// Output of [`ChecksumState::compute`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumResults {
    /// Hashed range, `None` for the whole buffer
    pub range: Option<RangeInclusive<usize>>,
    /// Number of hashed bytes
    pub size: usize,
    pub digests: Vec<(ChecksumAlgorithm, String)>,
}

impl ChecksumResults {
    #[must_use]
    pub fn get(&self, algo: ChecksumAlgorithm) -> Option<&str> {
        self.digests
            .iter()
            .find(|(a, _)| *a == algo)
            .map(|(_, d)| d.as_str())
    }

    /// Algorithm whose digest equals `expected` (case-insensitive, surrounding whitespace
    /// ignored), if any.
    #[must_use]
    pub fn compare(&self, expected: &str) -> Option<ChecksumAlgorithm> {
        let expected = expected.trim();
        if expected.is_empty() {
            return None;
        }
        self.digests
            .iter()
            .find(|(_, d)| d.eq_ignore_ascii_case(expected))
            .map(|(a, _)| *a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digests() {
        // Arrange
        let data = b"abc";

        // Act & Assert
        assert_eq!(
            ChecksumAlgorithm::Md5.digest(data),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(
            ChecksumAlgorithm::Sha1.digest(data),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            ChecksumAlgorithm::Sha256.digest(data),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(ChecksumAlgorithm::Crc32.digest(data), "352441c2");
    }

    #[test]
    fn test_compute_selected_only() {
        // Arrange
        let state = ChecksumState {
            md5: false,
            sha1: true,
            sha256: false,
            crc32: false,
            ..ChecksumState::default()
        };

        // Act
        let res = state.compute(b"abc", None);

        // Assert
        assert_eq!(res.digests.len(), 1);
        assert!(res.get(ChecksumAlgorithm::Sha1).is_some());
        assert!(res.get(ChecksumAlgorithm::Md5).is_none());
    }

    #[test]
    fn test_compute_selection() {
        // Arrange
        let state = ChecksumState {
            entire_file: false,
            ..ChecksumState::default()
        };

        // Act
        let res = state.compute(b"xxabcxx", Some(2..=4));

        // Assert
        assert_eq!(res.size, 3);
        assert_eq!(res.range, Some(2..=4));
        assert_eq!(res.get(ChecksumAlgorithm::Crc32), Some("352441c2"));
    }

    #[test]
    fn test_compute_ignores_selection_for_entire_file() {
        // Arrange
        let state = ChecksumState::default();

        // Act
        let res = state.compute(b"xxabcxx", Some(2..=4));

        // Assert
        assert_eq!(res.size, 7);
        assert_eq!(res.range, None);
    }

    #[test]
    fn test_compare() {
        // Arrange
        let res = ChecksumState::default().compute(b"abc", None);

        // Act & Assert
        assert_eq!(res.compare(" 352441C2 "), Some(ChecksumAlgorithm::Crc32));
        assert_eq!(
            res.compare("900150983CD24FB0D6963F7D28E17F72"),
            Some(ChecksumAlgorithm::Md5)
        );
        assert_eq!(res.compare("deadbeef"), None);
        assert_eq!(res.compare(""), None);
    }

    #[test]
    fn test_toggle() {
        // Arrange
        let mut state = ChecksumState::default();

        // Act
        state.toggle(ChecksumAlgorithm::Sha1);
        state.toggle(ChecksumAlgorithm::Md5);

        // Assert
        assert_eq!(
            state.selected(),
            vec![
                ChecksumAlgorithm::Sha1,
                ChecksumAlgorithm::Sha256,
                ChecksumAlgorithm::Crc32
            ]
        );
    }
}
