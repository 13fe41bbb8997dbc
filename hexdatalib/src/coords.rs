//! Mapping between byte offsets, grid cells and screen pixels.
//!
//! Everything here is pure: the renderer fills a [`ViewMetrics`] every frame (font metrics,
//! origin of the hex area, scroll position) and asks it where a byte is drawn or which byte
//! lies under a pointer.
//!
//! Each byte occupies three character cells in the hex area: two hex digits and one space.
//! The first digit is nibble `0` (high), the second is nibble `1` (low).

/// Width of the caret in pixels
pub const CARET_WIDTH: f32 = 2.0;

/// Guards `floor()` against results like `5.9999995` for exact cell boundaries
const EPS: f32 = 1e-4;

/// Character cell position of a byte. `row` is absolute (not relative to the scroll offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridPoint {
    pub column: usize,
    pub row: usize,
}

/// Byte offset plus nibble (0 = high / left digit, 1 = low / right digit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BytePosition {
    pub offset: usize,
    pub nibble: u8,
}

/// Axis aligned rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Per-frame geometry of the hex view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMetrics {
    /// Width of one monospace character
    pub char_width: f32,
    /// Height of one text row
    pub char_height: f32,
    /// Left edge of the first hex cell
    pub hex_area_x: f32,
    /// Top edge of the first visible row
    pub hex_area_y: f32,
    /// First visible row
    pub scroll_offset: usize,
    pub bytes_per_line: usize,
}

impl Default for ViewMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            char_height: 16.0,
            hex_area_x: 0.0,
            hex_area_y: 0.0,
            scroll_offset: 0,
            bytes_per_line: 16,
        }
    }
}

impl ViewMetrics {
    /// Width of the hex area in pixels
    #[must_use]
    pub fn hex_area_width(&self) -> f32 {
        self.bytes_per_line as f32 * 3.0 * self.char_width
    }

    /// Grid cell of `offset`.
    #[must_use]
    pub const fn grid_point_for_byte(&self, offset: usize) -> GridPoint {
        let bpl = if self.bytes_per_line == 0 {
            1
        } else {
            self.bytes_per_line
        };
        GridPoint {
            column: offset % bpl,
            row: offset / bpl,
        }
    }

    /// Top-left pixel of the first digit of the cell. Rows above the scroll offset produce
    /// negative `y`.
    #[must_use]
    pub fn pixel_for_grid_point(&self, point: GridPoint) -> (f32, f32) {
        let rel_row = point.row as f32 - self.scroll_offset as f32;
        (
            (point.column * 3) as f32 * self.char_width + self.hex_area_x,
            rel_row * self.char_height + self.hex_area_y,
        )
    }

    /// Top-left pixel of the first digit of `offset`
    #[must_use]
    pub fn pixel_for_byte(&self, offset: usize) -> (f32, f32) {
        self.pixel_for_grid_point(self.grid_point_for_byte(offset))
    }

    /// Byte (and nibble) under the pixel `(x, y)` for a buffer of `size` bytes.
    ///
    /// Points left of / above the hex area clamp to the first column / visible row, points
    /// right of the last column select the low nibble of the last column, and points past
    /// the end of the data select the low nibble of the last byte. An empty buffer always
    /// yields offset `0`, nibble `0`.
    ///
    /// # Example
    /// ```
    /// use hexdatalib::{BytePosition, ViewMetrics};
    ///
    /// let m = ViewMetrics { char_width: 8.0, char_height: 16.0, ..ViewMetrics::default() };
    /// let pos = m.byte_for_pixel(3.0 * 8.0 * 2.0, 16.0, 64);
    /// assert_eq!(pos, BytePosition { offset: 18, nibble: 0 });
    /// ```
    #[must_use]
    pub fn byte_for_pixel(&self, x: f32, y: f32, size: usize) -> BytePosition {
        if size == 0 || self.bytes_per_line == 0 {
            return BytePosition::default();
        }

        let rel_x = x - self.hex_area_x;
        let rel_y = y - self.hex_area_y;

        // Rows snap at half height
        let row = ((rel_y + self.char_height / 2.0) / self.char_height + EPS)
            .floor()
            .max(0.0) as usize;
        let char_x = (rel_x / self.char_width + EPS).floor().max(0.0) as usize;

        let mut column = char_x / 3;
        let mut nibble = u8::from(char_x % 3 >= 2);

        if column >= self.bytes_per_line {
            column = self.bytes_per_line - 1;
            nibble = 1;
        }

        let offset = self
            .scroll_offset
            .saturating_add(row)
            .saturating_mul(self.bytes_per_line)
            .saturating_add(column);

        if offset >= size {
            return BytePosition {
                offset: size - 1,
                nibble: 1,
            };
        }

        BytePosition { offset, nibble }
    }

    /// Caret rectangle for the given cursor, or `None` when its row is not in the
    /// `visible_lines` rows currently shown.
    #[must_use]
    pub fn caret_rect(&self, pos: BytePosition, visible_lines: usize) -> Option<PixelRect> {
        let point = self.grid_point_for_byte(pos.offset);
        if !self.is_row_visible(point.row, visible_lines) {
            return None;
        }
        let (x, y) = self.pixel_for_grid_point(point);
        Some(PixelRect {
            x: x + f32::from(pos.nibble.min(1)) * self.char_width,
            y,
            width: CARET_WIDTH,
            height: self.char_height,
        })
    }

    /// Rectangle covering both digits of `offset` (used for selection / match highlights)
    #[must_use]
    pub fn byte_rect(&self, offset: usize) -> PixelRect {
        let (x, y) = self.pixel_for_byte(offset);
        PixelRect {
            x,
            y,
            width: 2.0 * self.char_width,
            height: self.char_height,
        }
    }

    /// Check if the pixel lies within the hex cells of the visible rows
    #[must_use]
    pub fn is_point_in_hex_area(&self, x: f32, y: f32, visible_lines: usize) -> bool {
        x >= self.hex_area_x
            && x < self.hex_area_x + self.hex_area_width()
            && y >= self.hex_area_y
            && y < (visible_lines as f32).mul_add(self.char_height, self.hex_area_y)
    }

    /// Number of whole rows fitting in `area_height` (at least 1)
    #[must_use]
    pub fn visible_lines(&self, area_height: f32) -> usize {
        if self.char_height <= 0.0 {
            return 1;
        }
        ((area_height / self.char_height).floor() as usize).max(1)
    }

    #[must_use]
    pub const fn is_row_visible(&self, row: usize, visible_lines: usize) -> bool {
        row >= self.scroll_offset && row < self.scroll_offset + visible_lines
    }
}

/// New scroll offset that brings `row` into view, or `None` if it is already visible.
/// Rows above the view become the first visible row, rows below become the last one.
#[must_use]
pub const fn reveal_row(scroll_offset: usize, row: usize, visible_lines: usize) -> Option<usize> {
    let visible_lines = if visible_lines == 0 { 1 } else { visible_lines };
    if row < scroll_offset {
        Some(row)
    } else if row >= scroll_offset + visible_lines {
        Some(row + 1 - visible_lines)
    } else {
        None
    }
}

/// Largest valid scroll offset so that the last row stays on screen
#[must_use]
pub const fn max_scroll(total_rows: usize, visible_lines: usize) -> usize {
    total_rows.saturating_sub(visible_lines)
}
