//! The `lines` module provides the [`LineModel`] struct that turns raw bytes into the
//! display-ready hex dump.
//!
//! Every line has the same fixed layout:
//!
//! ```text
//! 00000010  48 65 6C 6C 6F 00 ...  Hello.      <6-space gap>
//! ^offset   ^bytes_per_line cells  ^ASCII      ^reserved for the annotation
//! ```
//!
//! The model is always regenerated in full, there is no incremental patching.

use crate::decoder::{InstructionDecoder, MAX_INSTRUCTION_LEN};
use std::fmt::Write;

pub const MIN_BYTES_PER_LINE: usize = 8;
pub const MAX_BYTES_PER_LINE: usize = 48;
pub const DEFAULT_BYTES_PER_LINE: usize = 16;

/// Line displayed for an empty buffer
pub const NO_DATA_LINE: &str = "No data to display";
/// Line displayed after a failed load
pub const LOAD_ERROR_LINE: &str = "Error: Failed to open or read file";
/// Gap between the ASCII column and the annotation column
pub const ANNOTATION_GAP: &str = "      ";

const HEADER_PREFIX: &str = "Offset    ";
const HEADER_SUFFIX: &str = "Decoded text";
const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Clamp the requested width into `[MIN_BYTES_PER_LINE, MAX_BYTES_PER_LINE]`
#[must_use]
pub fn clamp_bytes_per_line(n: usize) -> usize {
    n.clamp(MIN_BYTES_PER_LINE, MAX_BYTES_PER_LINE)
}

/// Character column where the annotation of every line starts. Short last lines end
/// earlier, the annotation column stays aligned anyway.
#[must_use]
pub const fn annotation_column(bytes_per_line: usize) -> usize {
    8 + 2 + bytes_per_line * 3 + 1 + bytes_per_line + ANNOTATION_GAP.len()
}

#[derive(Debug, Clone)]
pub struct LineModel {
    /// Displayed bytes per line
    bytes_per_line: usize,
    /// Column header (empty for an empty buffer)
    header: String,
    /// Formatted hex dump lines
    hex_lines: Vec<String>,
    /// Disassembly annotation per line (may be empty strings)
    disassembly_lines: Vec<String>,
    /// Number of bytes consumed by the annotation of each line
    instruction_lengths: Vec<usize>,
}

impl Default for LineModel {
    fn default() -> Self {
        Self::new()
    }
}

impl LineModel {
    /// Creates an empty model (no lines at all) with the default width.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes_per_line: DEFAULT_BYTES_PER_LINE,
            header: String::new(),
            hex_lines: Vec::new(),
            disassembly_lines: Vec::new(),
            instruction_lengths: Vec::new(),
        }
    }

    /// Drop all lines. The width is kept.
    pub fn clear(&mut self) {
        self.header.clear();
        self.hex_lines.clear();
        self.disassembly_lines.clear();
        self.instruction_lengths.clear();
    }

    /// Replace all lines with a single message line (e.g. a load error).
    pub fn set_message(&mut self, msg: &str) {
        self.clear();
        self.hex_lines.push(msg.to_string());
    }

    /// Set the width. Returns `true` if the clamped width differs from the current one,
    /// in which case the caller must regenerate.
    pub fn set_bytes_per_line(&mut self, n: usize) -> bool {
        let n = clamp_bytes_per_line(n);
        let changed = n != self.bytes_per_line;
        self.bytes_per_line = n;
        changed
    }

    #[must_use]
    pub const fn bytes_per_line(&self) -> usize {
        self.bytes_per_line
    }

    #[must_use]
    pub fn header_line(&self) -> &str {
        &self.header
    }

    #[must_use]
    pub fn hex_lines(&self) -> &[String] {
        &self.hex_lines
    }

    #[must_use]
    pub fn disassembly_lines(&self) -> &[String] {
        &self.disassembly_lines
    }

    #[must_use]
    pub fn instruction_lengths(&self) -> &[usize] {
        &self.instruction_lengths
    }

    /// Number of rows needed to show `size` bytes at the current width
    #[must_use]
    pub const fn row_count(&self, size: usize) -> usize {
        size.div_ceil(self.bytes_per_line)
    }

    /// Rebuild the header, the annotations and the hex lines from `data`, in that order.
    /// `decoder` is `None` when disassembly is disabled or unavailable.
    ///
    /// # Example
    /// ```
    /// use hexdatalib::LineModel;
    ///
    /// let mut model = LineModel::new();
    /// model.regenerate(b"Hi!", None);
    ///
    /// assert_eq!(model.hex_lines().len(), 1);
    /// assert!(model.hex_lines()[0].starts_with("00000000  48 69 21 "));
    /// ```
    pub fn regenerate(&mut self, data: &[u8], decoder: Option<&dyn InstructionDecoder>) {
        self.clear();

        if data.is_empty() {
            self.hex_lines.push(NO_DATA_LINE.to_string());
            return;
        }

        log::debug!(
            "Regenerating {} lines with {} bytes per line",
            self.row_count(data.len()),
            self.bytes_per_line
        );

        self.generate_header();
        self.generate_disassembly(data, decoder);
        self.generate_hex_lines(data);
    }

    fn generate_header(&mut self) {
        let mut header = String::with_capacity(HEADER_PREFIX.len() + self.bytes_per_line * 3 + 14);
        header.push_str(HEADER_PREFIX);
        for i in 0..self.bytes_per_line {
            // Two-digit decimal column index
            let _ = write!(header, "{i:02} ");
        }
        header.push(' ');
        header.push_str(HEADER_SUFFIX);
        self.header = header;
    }

    fn generate_disassembly(&mut self, data: &[u8], decoder: Option<&dyn InstructionDecoder>) {
        let rows = self.row_count(data.len());
        self.disassembly_lines.reserve(rows);
        self.instruction_lengths.reserve(rows);

        for line_start in (0..data.len()).step_by(self.bytes_per_line) {
            // At most one instruction per line. The instruction length does not
            // influence the hex grouping.
            let window_end = (line_start + MAX_INSTRUCTION_LEN).min(data.len());
            let decoded = decoder.and_then(|d| d.decode(&data[line_start..window_end], line_start as u64));

            match decoded {
                Some(instr) => {
                    self.disassembly_lines.push(instr.text);
                    self.instruction_lengths.push(instr.length.max(1));
                }
                None => {
                    self.disassembly_lines.push(String::new());
                    self.instruction_lengths.push(1);
                }
            }
        }
    }

    fn generate_hex_lines(&mut self, data: &[u8]) {
        let line_len = annotation_column(self.bytes_per_line);
        self.hex_lines.reserve(self.row_count(data.len()));

        for (row, chunk) in data.chunks(self.bytes_per_line).enumerate() {
            let mut line = String::with_capacity(line_len);

            let _ = write!(line, "{:08X}  ", row * self.bytes_per_line);

            for j in 0..self.bytes_per_line {
                if let Some(&b) = chunk.get(j) {
                    line.push(char::from(HEX_DIGITS[usize::from(b >> 4)]));
                    line.push(char::from(HEX_DIGITS[usize::from(b & 0x0F)]));
                    line.push(' ');
                } else {
                    line.push_str("   ");
                }
            }

            line.push(' ');

            line.extend(chunk.iter().map(|&b| display_char(b)));

            line.push_str(ANNOTATION_GAP);

            self.hex_lines.push(line);
        }
    }
}

/// ASCII column representation of a byte: printable ASCII verbatim, otherwise `.`
#[must_use]
pub fn display_char(b: u8) -> char {
    if (0x20..=0x7E).contains(&b) {
        char::from(b)
    } else {
        '.'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::DecodedInstruction;

    /// Decodes every byte as a pseudo instruction of length `byte % 4 + 1`
    struct FakeDecoder;

    impl InstructionDecoder for FakeDecoder {
        fn decode(&self, bytes: &[u8], offset: u64) -> Option<DecodedInstruction> {
            let first = *bytes.first()?;
            if first == 0xFF {
                return None;
            }
            Some(DecodedInstruction {
                text: format!("op{first:02x}@{offset}"),
                length: usize::from(first % 4) + 1,
            })
        }
    }

    #[test]
    fn test_annotation_column_matches_full_lines() {
        // Arrange
        let mut model = LineModel::new();
        model.set_bytes_per_line(8);

        // Act
        model.regenerate(&[0x41; 12], None);

        // Assert
        let full = model.hex_lines()[0].chars().count();
        let short = model.hex_lines()[1].chars().count();
        assert_eq!(annotation_column(8), full);
        assert!(short < annotation_column(8));
    }

    #[test]
    fn test_empty_data_sentinel() {
        // Arrange
        let mut model = LineModel::new();

        // Act
        model.regenerate(&[], None);

        // Assert
        assert_eq!(model.hex_lines(), &[NO_DATA_LINE.to_string()]);
        assert!(model.header_line().is_empty());
        assert!(model.disassembly_lines().is_empty());
    }

    #[test]
    fn test_partial_last_line_padding() {
        // Arrange
        let data: Vec<u8> = (0u8..20).collect();
        let mut model = LineModel::new();
        model.set_bytes_per_line(16);

        // Act
        model.regenerate(&data, None);

        // Assert
        let lines = model.hex_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("00000000  00 01 02 03 04 05 06 07 08 09 0A 0B 0C 0D 0E 0F  "));
        assert!(lines[1].starts_with("00000010  10 11 12 13 "));

        // 4 real cells followed by 12 padded ones
        let cells = &lines[1][10..10 + 16 * 3];
        assert_eq!(&cells[12..], " ".repeat(12 * 3));

        // ASCII column and the trailing gap stay at a fixed column
        assert_eq!(lines[0].len(), 10 + 48 + 1 + 16 + 6);
        assert_eq!(lines[1].len(), 10 + 48 + 1 + 4 + 6);
        assert!(lines[1].ends_with("....      "));
    }

    #[test]
    fn test_ascii_column() {
        // Arrange
        let data = b"AB\x00~\x7F ";
        let mut model = LineModel::new();
        model.set_bytes_per_line(8);

        // Act
        model.regenerate(data, None);

        // Assert
        let line = &model.hex_lines()[0];
        let expected = format!("00000000  41 42 00 7E 7F 20 {}{}AB.~. {}", " ".repeat(6), " ", ANNOTATION_GAP);
        assert_eq!(line, &expected);
    }

    #[test]
    fn test_line_count_for_every_width() {
        // Arrange
        let data = vec![0xA5u8; 1001];
        let mut model = LineModel::new();

        for width in MIN_BYTES_PER_LINE..=MAX_BYTES_PER_LINE {
            // Act
            model.set_bytes_per_line(width);
            model.regenerate(&data, None);

            // Assert
            let expected = data.len().div_ceil(width);
            assert_eq!(model.hex_lines().len(), expected);
            assert_eq!(model.disassembly_lines().len(), expected);
        }
    }

    #[test]
    fn test_width_is_clamped() {
        // Arrange
        let mut model = LineModel::new();

        // Act & Assert
        assert!(model.set_bytes_per_line(1));
        assert_eq!(model.bytes_per_line(), MIN_BYTES_PER_LINE);
        assert!(model.set_bytes_per_line(1000));
        assert_eq!(model.bytes_per_line(), MAX_BYTES_PER_LINE);
        assert!(!model.set_bytes_per_line(49));
    }

    #[test]
    fn test_header() {
        // Arrange
        let mut model = LineModel::new();
        model.set_bytes_per_line(12);

        // Act
        model.regenerate(&[0u8; 3], None);

        // Assert
        assert_eq!(
            model.header_line(),
            "Offset    00 01 02 03 04 05 06 07 08 09 10 11  Decoded text"
        );
    }

    #[test]
    fn test_annotations_without_decoder() {
        // Arrange
        let mut model = LineModel::new();
        model.set_bytes_per_line(8);

        // Act
        model.regenerate(&[0x90u8; 17], None);

        // Assert
        assert_eq!(model.disassembly_lines(), &["", "", ""]);
        assert_eq!(model.instruction_lengths(), &[1, 1, 1]);
    }

    #[test]
    fn test_annotations_one_instruction_per_line() {
        // Arrange
        let data = [0x02u8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x01];
        let mut model = LineModel::new();
        model.set_bytes_per_line(8);

        // Act
        model.regenerate(&data, Some(&FakeDecoder));

        // Assert
        assert_eq!(model.hex_lines().len(), 2);
        assert_eq!(model.disassembly_lines(), &["op02@0", ""]);
        assert_eq!(model.instruction_lengths(), &[3, 1]);

        // Grouping stays fixed whatever the instruction length
        assert!(model.hex_lines()[1].starts_with("00000008  FF 01 "));
    }

    #[test]
    fn test_set_message() {
        // Arrange
        let mut model = LineModel::new();
        model.regenerate(&[1, 2, 3], None);

        // Act
        model.set_message(LOAD_ERROR_LINE);

        // Assert
        assert_eq!(model.hex_lines(), &[LOAD_ERROR_LINE.to_string()]);
        assert!(model.header_line().is_empty());
    }
}
