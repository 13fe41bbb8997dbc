use regex::bytes::Regex;

/// Longest pattern accepted by [`parse_hex_pattern`]
pub const MAX_PATTERN_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchType {
    Hex(Vec<u8>),
    Ascii(String),
    Regex(String),
}

/// Searches for a pattern in the data.
/// Returns the starting offsets of all matches.
#[must_use]
pub fn search_all(data: &[u8], search_type: &SearchType) -> Vec<usize> {
    match search_type {
        SearchType::Hex(p) => search_bytes(data, p),
        SearchType::Ascii(s) => search_bytes(data, s.as_bytes()),
        SearchType::Regex(p) => search_regex(data, p),
    }
}

/// Slide window search.
fn search_bytes(data: &[u8], pattern: &[u8]) -> Vec<usize> {
    if pattern.is_empty() {
        return vec![];
    }

    data.windows(pattern.len())
        .enumerate()
        .filter(|(_, window)| *window == pattern)
        .map(|(offset, _)| offset)
        .collect()
}

/// Regex search. An invalid expression matches nothing.
fn search_regex(data: &[u8], pattern: &str) -> Vec<usize> {
    let Ok(re) = Regex::new(pattern) else {
        log::warn!("Invalid regex '{pattern}'");
        return vec![];
    };
    re.find_iter(data).map(|mtch| mtch.start()).collect()
}

/// Parses the search box text into bytes.
///
/// Spaces between pairs are skipped. Only `0-9` and uppercase `A-F` are accepted: parsing
/// stops silently at the first invalid character or at a trailing lone digit, and after
/// [`MAX_PATTERN_LEN`] bytes.
///
/// # Example
/// ```
/// use hexdatalib::parse_hex_pattern;
///
/// assert_eq!(parse_hex_pattern("41 42 43"), vec![0x41, 0x42, 0x43]);
/// assert_eq!(parse_hex_pattern("DEADbeef"), vec![0xDE, 0xAD]);
/// assert!(parse_hex_pattern("4").is_empty());
/// ```
#[must_use]
pub fn parse_hex_pattern(text: &str) -> Vec<u8> {
    const fn digit(c: u8) -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'A'..=b'F' => Some(c - b'A' + 10),
            _ => None,
        }
    }

    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() && out.len() < MAX_PATTERN_LEN {
        if bytes[i] == b' ' {
            i += 1;
            continue;
        }
        let Some(&lo_char) = bytes.get(i + 1) else {
            break;
        };
        let (Some(hi), Some(lo)) = (digit(bytes[i]), digit(lo_char)) else {
            break;
        };
        out.push((hi << 4) | lo);
        i += 2;
    }

    out
}

/// Incremental "find next / find previous" over a byte buffer.
#[derive(Debug, Clone, Default)]
pub struct PatternSearch {
    /// Text of the search box
    pub pattern_text: String,
    /// Offset of the last match, `None` before the first search or after a miss
    pub last_match: Option<usize>,
    /// Does the search box own keyboard focus
    pub has_focus: bool,
}

impl PatternSearch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of the current pattern
    #[must_use]
    pub fn pattern(&self) -> Vec<u8> {
        parse_hex_pattern(&self.pattern_text)
    }

    pub fn set_pattern(&mut self, text: &str) {
        self.pattern_text = text.to_string();
        self.last_match = None;
    }

    /// Starts a new search from the beginning of the buffer.
    pub const fn run(&mut self) {
        self.last_match = None;
    }

    /// Searches forward from the byte after the last match (or from the start).
    /// The search does not wrap around. A miss resets the last match.
    ///
    /// Returns `None` without touching the state if the pattern is empty.
    pub fn find_next(&mut self, data: &[u8]) -> Option<usize> {
        let pattern = self.pattern();
        if pattern.is_empty() || data.len() < pattern.len() {
            return self.miss_unless_empty(&pattern);
        }

        let start = self.last_match.map_or(0, |m| m + 1);
        let last_start = data.len() - pattern.len();

        let found = (start..=last_start).find(|&i| data[i..i + pattern.len()] == pattern[..]);
        self.last_match = found;
        found
    }

    /// Searches backward from the byte before the last match (or from the end).
    /// The search does not wrap around. A miss resets the last match.
    pub fn find_prev(&mut self, data: &[u8]) -> Option<usize> {
        let pattern = self.pattern();
        if pattern.is_empty() || data.len() < pattern.len() {
            return self.miss_unless_empty(&pattern);
        }

        let last_start = data.len() - pattern.len();
        let start = match self.last_match {
            Some(0) => {
                self.last_match = None;
                return None;
            }
            Some(m) => (m - 1).min(last_start),
            None => last_start,
        };

        let found = (0..=start)
            .rev()
            .find(|&i| data[i..i + pattern.len()] == pattern[..]);
        self.last_match = found;
        found
    }

    fn miss_unless_empty(&mut self, pattern: &[u8]) -> Option<usize> {
        if !pattern.is_empty() {
            self.last_match = None;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn random_bytes(len: usize) -> Vec<u8> {
        rand::rng()
            .sample_iter(rand::distr::StandardUniform)
            .take(len)
            .collect()
    }

    #[test]
    fn test_search_bytes() {
        // Arrange
        let pattern = vec![0xAA, 0xBB, 0xCC, 0xDD, 0xEE];
        let mut data = random_bytes(1000);
        data[203..208].copy_from_slice(&pattern); // replace elements with the pattern

        // Act
        let res = search_all(&data, &SearchType::Hex(pattern));

        // Assert
        assert_eq!(res, vec![203]);
    }

    #[test]
    fn test_search_ascii_literals() {
        // Arrange
        let mut data = vec![0u8; 1000];
        data[203..208].copy_from_slice(b"20.71");

        // Act
        let res = search_all(&data, &SearchType::Ascii("20.71".to_string()));

        // Assert
        assert_eq!(res, vec![203]);
    }

    #[test]
    fn test_search_ascii_regex() {
        // Arrange
        let mut data = vec![0u8; 1000];
        data[203..208].copy_from_slice(b"77LoL");

        // Act
        let res = search_all(&data, &SearchType::Regex(r"\d{2}\D{2}L".to_string()));

        // Assert
        assert_eq!(res, vec![203]);
    }

    #[test]
    fn test_search_invalid_regex() {
        // Arrange
        let data = b"abc".to_vec();

        // Act
        let res = search_all(&data, &SearchType::Regex("(".to_string()));

        // Assert
        assert!(res.is_empty());
    }

    #[test]
    fn test_parse_hex_pattern() {
        // Act & Assert
        assert_eq!(parse_hex_pattern("41 42"), vec![0x41, 0x42]);
        assert_eq!(parse_hex_pattern("  4142  43"), vec![0x41, 0x42, 0x43]);
        assert_eq!(parse_hex_pattern("41 4"), vec![0x41]);
        assert_eq!(parse_hex_pattern("41 ZZ 42"), vec![0x41]);
        assert_eq!(parse_hex_pattern("4 1"), Vec::<u8>::new());
        assert_eq!(parse_hex_pattern("ab"), Vec::<u8>::new());
        assert_eq!(parse_hex_pattern(&"FF".repeat(200)).len(), MAX_PATTERN_LEN);
    }

    #[test]
    fn test_find_next_advances() {
        // Arrange
        let mut data = vec![0u8; 300];
        data[100] = 0x41;
        data[101] = 0x42;
        data[200] = 0x41;
        data[201] = 0x42;
        let mut search = PatternSearch::new();
        search.set_pattern("41 42");

        // Act & Assert
        assert_eq!(search.find_next(&data), Some(100));
        assert_eq!(search.last_match, Some(100));
        assert_eq!(search.find_next(&data), Some(200));
        assert_eq!(search.find_next(&data), None);
        assert_eq!(search.last_match, None);

        // No wrap, the next search starts over
        assert_eq!(search.find_next(&data), Some(100));
    }

    #[test]
    fn test_find_prev() {
        // Arrange
        let mut data = vec![0u8; 300];
        data[100..102].copy_from_slice(&[0x41, 0x42]);
        data[298..300].copy_from_slice(&[0x41, 0x42]);
        let mut search = PatternSearch::new();
        search.set_pattern("41 42");

        // Act & Assert
        assert_eq!(search.find_prev(&data), Some(298));
        assert_eq!(search.find_prev(&data), Some(100));
        assert_eq!(search.find_prev(&data), None);
        assert_eq!(search.last_match, None);
    }

    #[test]
    fn test_find_prev_at_start() {
        // Arrange
        let data = [0x41, 0x42, 0x00];
        let mut search = PatternSearch::new();
        search.set_pattern("41 42");

        // Act & Assert
        assert_eq!(search.find_next(&data), Some(0));
        assert_eq!(search.find_prev(&data), None);
    }

    #[test]
    fn test_run_resets() {
        // Arrange
        let data = [0x41, 0x42, 0x41, 0x42];
        let mut search = PatternSearch::new();
        search.set_pattern("4142");
        let _ = search.find_next(&data);
        let _ = search.find_next(&data);

        // Act
        search.run();

        // Assert
        assert_eq!(search.find_next(&data), Some(0));
    }

    #[test]
    fn test_empty_pattern_is_noop() {
        // Arrange
        let data = [0x41, 0x42];
        let mut search = PatternSearch {
            pattern_text: "zz".to_string(),
            last_match: Some(1),
            has_focus: false,
        };

        // Act
        let res = search.find_next(&data);

        // Assert
        assert_eq!(res, None);
        assert_eq!(search.last_match, Some(1));
    }

    #[test]
    fn test_pattern_longer_than_data() {
        // Arrange
        let mut search = PatternSearch::new();
        search.set_pattern("01 02 03");

        // Act & Assert
        assert_eq!(search.find_next(&[1, 2]), None);
        assert_eq!(search.find_prev(&[]), None);
    }
}
