//! The `session` module provides [`EditorSession`], the state of one open buffer: data,
//! cursor, selection, scroll position and the state of the side tools (search, checksum,
//! compare, entropy).
//!
//! The session is UI agnostic. The GUI translates pointer and key events into calls on the
//! session and reads back what to draw.

use crate::checksum::{ChecksumResults, ChecksumState};
use crate::compare::CompareState;
use crate::coords::{BytePosition, ViewMetrics, max_scroll, reveal_row};
use crate::entropy::EntropyReport;
use crate::error::HexDataError;
use crate::hexdata::HexData;
use crate::search::PatternSearch;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::Path;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Range is start and end offsets of selected bytes.
    /// Inverted if selection is moving right-to-left.
    pub range: Option<[usize; 2]>,
    /// Is the pointer released after the selection was made
    pub released: bool,
}

impl Selection {
    /// Check if the provided offset is within the selection range
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        if let Some(range) = self.range {
            if range[0] < range[1] {
                return range[0] <= offset && range[1] >= offset;
            }
            return range[1] <= offset && range[0] >= offset;
        }
        false
    }

    /// Start a new selection at `offset`
    pub const fn start(&mut self, offset: usize) {
        self.range = Some([offset, offset]);
        self.released = false;
    }

    /// Extend selection range with provided offset
    pub fn update(&mut self, offset: usize) {
        if self.released {
            self.released = false;
            self.range = None;
        }
        let sel = self.range.get_or_insert([offset, offset]);
        sel[1] = offset;
    }

    /// Clear selection range
    pub const fn clear(&mut self) {
        self.range = None;
        self.released = false;
    }

    /// Selection as an ascending range
    #[must_use]
    pub fn ordered(&self) -> Option<RangeInclusive<usize>> {
        self.range.map(|[a, b]| a.min(b)..=a.max(b))
    }

    /// Number of selected bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        match self.range {
            Some([a, b]) => a.abs_diff(b) + 1,
            None => 0,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.range.is_none()
    }
}

/// Cursor movement commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    LineStart,
    LineEnd,
    FileStart,
    FileEnd,
}

/// Outcome of [`EditorSession::sync_with_disk`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskStatus {
    /// File on disk matches what was loaded
    Unchanged,
    /// File changed and the buffer was reloaded
    Reloaded,
    /// File changed but the buffer was kept (unsaved edits or auto-reload disabled)
    Changed,
}

#[derive(Debug)]
pub struct EditorSession {
    pub hexdata: HexData,
    /// Byte under the cursor, `None` when nothing is loaded
    pub cursor: Option<usize>,
    /// Nibble under the cursor (0 = high, 1 = low)
    pub nibble: u8,
    pub selection: Selection,
    /// First visible row
    pub scroll_offset: usize,
    /// Number of rows that fit in the view, updated by the UI every frame
    pub lines_per_page: usize,
    pub search: PatternSearch,
    pub checksum: ChecksumState,
    pub checksum_results: Option<ChecksumResults>,
    pub compare: CompareState,
    pub entropy: Option<EntropyReport>,
    /// Original values of the edited bytes
    original: HashMap<usize, u8>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(HexData::new())
    }
}

impl EditorSession {
    #[must_use]
    pub fn new(hexdata: HexData) -> Self {
        let cursor = (!hexdata.is_empty()).then_some(0);
        Self {
            hexdata,
            cursor,
            nibble: 0,
            selection: Selection::default(),
            scroll_offset: 0,
            lines_per_page: 1,
            search: PatternSearch::default(),
            checksum: ChecksumState::default(),
            checksum_results: None,
            compare: CompareState::default(),
            entropy: None,
            original: HashMap::new(),
        }
    }

    /// Loads a file into the session and resets the view state.
    ///
    /// # Errors
    /// Returns [`HexDataError::Read`] if the file cannot be read. The session is reset to
    /// the empty state in that case.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), HexDataError> {
        let res = self.hexdata.load_file(path);
        self.reset_view();
        res
    }

    /// Reloads the backing file, dropping unsaved edits. The cursor is kept if still in range.
    ///
    /// # Errors
    /// Same as [`HexData::reload`].
    pub fn reload(&mut self) -> Result<(), HexDataError> {
        let cursor = self.cursor;
        let scroll = self.scroll_offset;

        let res = self.hexdata.reload();
        self.reset_view();

        if res.is_ok() && !self.hexdata.is_empty() {
            self.cursor = cursor.map(|c| c.min(self.hexdata.file_size() - 1));
            self.scroll_offset = scroll.min(self.max_scroll());
        }
        res
    }

    /// Closes the buffer.
    pub fn close(&mut self) {
        self.hexdata.clear();
        self.reset_view();
    }

    fn reset_view(&mut self) {
        self.cursor = (!self.hexdata.is_empty()).then_some(0);
        self.nibble = 0;
        self.selection.clear();
        self.scroll_offset = 0;
        self.search.last_match = None;
        self.checksum_results = None;
        self.compare.report = None;
        self.entropy = None;
        self.original.clear();
    }

    /// Geometry for the current scroll position and width
    #[must_use]
    pub const fn metrics(&self, char_width: f32, char_height: f32, hex_x: f32, hex_y: f32) -> ViewMetrics {
        ViewMetrics {
            char_width,
            char_height,
            hex_area_x: hex_x,
            hex_area_y: hex_y,
            scroll_offset: self.scroll_offset,
            bytes_per_line: self.hexdata.bytes_per_line(),
        }
    }

    #[must_use]
    pub const fn cursor_position(&self) -> Option<BytePosition> {
        match self.cursor {
            Some(offset) => Some(BytePosition {
                offset,
                nibble: self.nibble,
            }),
            None => None,
        }
    }

    /// Changes the width, keeping the cursor row on screen.
    pub fn set_bytes_per_line(&mut self, n: usize) {
        self.hexdata.set_bytes_per_line(n);
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
        self.reveal_cursor();
    }

    pub fn set_lines_per_page(&mut self, n: usize) {
        self.lines_per_page = n.max(1);
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    #[must_use]
    pub fn max_scroll(&self) -> usize {
        max_scroll(self.hexdata.row_count(), self.lines_per_page)
    }

    /// Scrolls by `rows` (negative is up), clamped to the valid range.
    pub fn scroll_by(&mut self, rows: isize) {
        let target = self.scroll_offset.saturating_add_signed(rows);
        self.scroll_offset = target.min(self.max_scroll());
    }

    /// Places the cursor under the pointer and starts a new selection there.
    pub fn click(&mut self, metrics: &ViewMetrics, x: f32, y: f32) {
        if self.hexdata.is_empty() {
            return;
        }
        let pos = metrics.byte_for_pixel(x, y, self.hexdata.file_size());
        self.cursor = Some(pos.offset);
        self.nibble = pos.nibble;
        self.selection.start(pos.offset);
    }

    /// Extends the selection (and moves the cursor) to the byte under the pointer.
    pub fn drag(&mut self, metrics: &ViewMetrics, x: f32, y: f32) {
        if self.hexdata.is_empty() {
            return;
        }
        let pos = metrics.byte_for_pixel(x, y, self.hexdata.file_size());
        self.selection.update(pos.offset);
        self.cursor = Some(pos.offset);
        self.nibble = 0;
    }

    /// Pointer was released, the selection is complete.
    pub const fn release(&mut self) {
        self.selection.released = true;
    }

    pub fn select_all(&mut self) {
        if let Some(last) = self.hexdata.file_size().checked_sub(1) {
            self.selection.range = Some([0, last]);
            self.selection.released = true;
            self.cursor = Some(0);
            self.nibble = 0;
        }
    }

    /// Overwrites the nibble under the cursor with the typed hex digit and advances the
    /// cursor by one nibble. Returns `Ok(false)` if `ch` is not a hex digit or there is no
    /// cursor.
    ///
    /// # Errors
    /// Returns [`HexDataError::OutOfBounds`] if the cursor is past the end of the data.
    pub fn input_hex_digit(&mut self, ch: char) -> Result<bool, HexDataError> {
        let (Some(offset), Some(digit)) = (self.cursor, ch.to_digit(16)) else {
            return Ok(false);
        };
        let digit = u8::try_from(digit).unwrap_or(0);

        let prev = self.hexdata.read_byte(offset);
        let value = if self.nibble == 0 {
            (digit << 4) | (prev & 0x0F)
        } else {
            (prev & 0xF0) | digit
        };

        self.hexdata.edit_byte(offset, value)?;
        if value != prev {
            self.original.entry(offset).or_insert(prev);
        }

        if self.nibble == 0 {
            self.nibble = 1;
        } else if offset + 1 < self.hexdata.file_size() {
            self.cursor = Some(offset + 1);
            self.nibble = 0;
        }
        self.selection.clear();
        self.reveal_cursor();
        Ok(true)
    }

    /// Check if the byte at `offset` was edited and differs from its loaded value
    #[must_use]
    pub fn is_edited(&self, offset: usize) -> bool {
        self.original
            .get(&offset)
            .is_some_and(|&orig| orig != self.hexdata.read_byte(offset))
    }

    /// Reverts every byte edited since the last load or save.
    pub fn restore(&mut self) {
        if self.original.is_empty() {
            return;
        }
        let edits: Vec<(usize, u8)> = self.original.drain().collect();
        if self.hexdata.edit_bytes(edits).is_ok() {
            self.hexdata.set_modified(false);
        }
    }

    /// Saves the buffer to its file. The saved bytes become the new restore point.
    ///
    /// # Errors
    /// Same as [`HexData::save`].
    pub fn save(&mut self) -> Result<(), HexDataError> {
        self.hexdata.save()?;
        self.original.clear();
        Ok(())
    }

    /// Saves the buffer to `path` and binds the session to it.
    ///
    /// # Errors
    /// Same as [`HexData::save_file`].
    pub fn save_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), HexDataError> {
        self.hexdata.save_file(path)?;
        self.original.clear();
        Ok(())
    }

    /// Moves the cursor and scrolls to keep it visible. Does nothing without a cursor.
    pub fn move_cursor(&mut self, movement: CursorMove) {
        let Some(cursor) = self.cursor else {
            return;
        };
        let size = self.hexdata.file_size();
        if size == 0 {
            return;
        }
        let last = size - 1;
        let bpl = self.hexdata.bytes_per_line();
        let page = bpl * self.lines_per_page.max(1);

        let target = match movement {
            CursorMove::Left => cursor.saturating_sub(1),
            CursorMove::Right => (cursor + 1).min(last),
            CursorMove::Up => cursor.checked_sub(bpl).unwrap_or(cursor),
            CursorMove::Down => {
                if cursor + bpl <= last {
                    cursor + bpl
                } else {
                    cursor
                }
            }
            CursorMove::PageUp => cursor.saturating_sub(page),
            CursorMove::PageDown => cursor.saturating_add(page).min(last),
            CursorMove::LineStart => cursor - cursor % bpl,
            CursorMove::LineEnd => (cursor - cursor % bpl + bpl - 1).min(last),
            CursorMove::FileStart => 0,
            CursorMove::FileEnd => last,
        };

        self.cursor = Some(target);
        self.nibble = 0;
        self.selection.clear();
        self.reveal_cursor();
    }

    /// Moves the cursor to `offset` and centers its row. Offsets outside of the data are
    /// ignored.
    pub fn go_to(&mut self, offset: usize) -> bool {
        if offset >= self.hexdata.file_size() {
            log::warn!("Offset 0x{offset:X} is outside of the data");
            return false;
        }
        self.cursor = Some(offset);
        self.nibble = 0;
        self.selection.clear();

        let row = offset / self.hexdata.bytes_per_line();
        self.scroll_offset = row
            .saturating_sub(self.lines_per_page / 2)
            .min(self.max_scroll());
        true
    }

    /// Scrolls only if the cursor row is out of view.
    pub fn reveal_cursor(&mut self) {
        if let Some(cursor) = self.cursor {
            let row = cursor / self.hexdata.bytes_per_line();
            if let Some(scroll) = reveal_row(self.scroll_offset, row, self.lines_per_page) {
                self.scroll_offset = scroll.min(self.max_scroll());
            }
        }
    }

    /// Finds the next occurrence of the search pattern and moves the cursor onto it.
    pub fn find_next(&mut self) -> Option<usize> {
        let found = self.search.find_next(self.hexdata.data());
        self.jump_to_match(found);
        found
    }

    /// Finds the previous occurrence of the search pattern and moves the cursor onto it.
    pub fn find_prev(&mut self) -> Option<usize> {
        let found = self.search.find_prev(self.hexdata.data());
        self.jump_to_match(found);
        found
    }

    fn jump_to_match(&mut self, found: Option<usize>) {
        let Some(offset) = found else {
            return;
        };
        let len = self.search.pattern().len().max(1);
        self.cursor = Some(offset);
        self.nibble = 0;
        self.selection.range = Some([offset, offset + len - 1]);
        self.selection.released = true;
        self.reveal_cursor();
    }

    /// Computes the selected digests over the whole buffer or the selection.
    pub fn compute_checksums(&mut self) -> &ChecksumResults {
        let results = self
            .checksum
            .compute(self.hexdata.data(), self.selection.ordered());
        self.checksum_results.insert(results)
    }

    /// Compares the buffer against the file set in [`CompareState`].
    ///
    /// # Errors
    /// See [`CompareState::run`].
    pub fn run_compare(&mut self) -> Result<(), HexDataError> {
        self.compare.run(self.hexdata.data()).map(|_| ())
    }

    /// Computes the entropy report of the whole buffer.
    pub fn compute_entropy(&mut self, block_size: usize) -> &EntropyReport {
        self.entropy
            .insert(EntropyReport::new(self.hexdata.data(), block_size))
    }

    #[must_use]
    pub fn file_changed_on_disk(&self) -> bool {
        self.hexdata.changed_on_disk()
    }

    /// Reacts to a change of the backing file. Unmodified buffers are reloaded when
    /// `auto_reload` is set.
    ///
    /// # Errors
    /// Returns the reload error, if a reload was attempted and failed.
    pub fn sync_with_disk(&mut self, auto_reload: bool) -> Result<DiskStatus, HexDataError> {
        if !self.file_changed_on_disk() {
            return Ok(DiskStatus::Unchanged);
        }
        if auto_reload && !self.hexdata.is_modified() {
            log::info!("'{}' changed on disk, reloading", self.hexdata.filepath().display());
            self.reload()?;
            return Ok(DiskStatus::Reloaded);
        }
        Ok(DiskStatus::Changed)
    }
}
