//! # `hexdatalib`
//!
//! `hexdatalib` is the engine behind the `hexpane` hex editor: an in-memory byte buffer and
//! the hex-dump line model generated from it, plus the pixel <-> byte mapping a renderer
//! needs to place the caret and translate clicks.
//!
//! The library provides:
//! - Byte buffer with file I/O and the derived display lines (via [`HexData`] struct).
//! - Pure coordinate mapping (via [`ViewMetrics`]).
//! - Incremental pattern search, checksums, file comparison and entropy analysis.
//! - Optional disassembly annotations through the [`InstructionDecoder`] trait.
//! - Editor state independent of any GUI toolkit (via [`EditorSession`] struct).
//! - Error handling with [`HexDataError`].
//!
//! ## Example
//!
//! ```
//! use hexdatalib::HexData;
//!
//! let mut hd = HexData::from_bytes(b"Hello, world!".to_vec());
//! hd.edit_byte(0, b'J').unwrap();
//!
//! assert_eq!(hd.header_line().len(), 10 + 16 * 3 + 1 + 12);
//! assert!(hd.hex_lines()[0].ends_with("Jello, world!      "));
//! ```

mod checksum;
mod compare;
mod coords;
mod decoder;
mod entropy;
mod error;
mod hexdata;
mod lines;
mod options;
mod search;
mod session;
mod store;

// Public APIs
pub use checksum::{ChecksumAlgorithm, ChecksumResults, ChecksumState};
pub use compare::{CompareReport, CompareState, MAX_REPORTED_RANGES};
pub use coords::{BytePosition, CARET_WIDTH, GridPoint, PixelRect, ViewMetrics, max_scroll, reveal_row};
pub use decoder::{Architecture, DecodedInstruction, InstructionDecoder, MAX_INSTRUCTION_LEN, builtin_decoder};
#[cfg(feature = "x86")]
pub use decoder::X86Decoder;
pub use entropy::{DEFAULT_BLOCK_SIZE, EntropyReport, shannon_entropy};
pub use error::HexDataError;
pub use hexdata::HexData;
pub use lines::{
    DEFAULT_BYTES_PER_LINE, LOAD_ERROR_LINE, LineModel, MAX_BYTES_PER_LINE, MIN_BYTES_PER_LINE,
    NO_DATA_LINE, annotation_column, clamp_bytes_per_line, display_char,
};
pub use options::{AppOptions, OPTIONS_FILE_NAME};
pub use search::{MAX_PATTERN_LEN, PatternSearch, SearchType, parse_hex_pattern, search_all};
pub use session::{CursorMove, DiskStatus, EditorSession, Selection};
pub use store::{ByteStore, get_last_modified};
