use crate::app::{HexViewerApp, colors};
use crate::renderer::{EguiRenderer, Renderer};
use crate::ui_scrollbar::{SCROLLBAR_WIDTH, draw_custom_scrollbar};
use eframe::egui;
use hexdatalib::{PixelRect, ViewMetrics, annotation_column};
use std::ops::Range;

/// Characters before the first hex cell: 8 offset digits and 2 spaces
const OFFSET_COLUMN_CHARS: usize = 10;
/// Padding between the panel edge and the text
const TEXT_PADDING: f32 = 4.0;

impl HexViewerApp {
    #[allow(clippy::cast_precision_loss)]
    /// Displays the hex dump of the session in the central panel and applies the
    /// pointer and keyboard input of this frame to it.
    pub(crate) fn show_hex_view(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            ui.allocate_rect(rect, egui::Sense::hover());

            if self.session.hexdata.hex_lines().is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label("Drop a file or open one to start hexing!");
                });
                return;
            }

            let font = egui::TextStyle::Monospace.resolve(ui.style());
            let mut renderer = EguiRenderer::new(ui.painter().clone(), rect, font);
            let (char_width, char_height) = renderer.char_size();

            // Keep the text clear of the scrollbar
            renderer.resize(rect.width() - SCROLLBAR_WIDTH, rect.height());

            let text_x = rect.left() + TEXT_PADDING;
            let text_y = rect.top() + TEXT_PADDING;
            let hex_x = (OFFSET_COLUMN_CHARS as f32).mul_add(char_width, text_x);
            let hex_y = text_y + char_height;

            // Lines per page depend on the panel height and the font
            let metrics = self.session.metrics(char_width, char_height, hex_x, hex_y);
            let visible = metrics.visible_lines(rect.bottom() - hex_y);
            self.session.set_lines_per_page(visible);

            let hovered = ui.rect_contains_pointer(rect);
            self.apply_view_input(ui, rect, char_width, char_height, hex_x, hex_y, hovered);

            let total_rows = self.session.hexdata.row_count();
            if let Some(row) = draw_custom_scrollbar(
                ui,
                rect,
                self.session.scroll_offset,
                total_rows,
                visible,
                egui::Id::new("hexview_scrollbar"),
            ) {
                self.session.scroll_offset = row.min(self.session.max_scroll());
            }

            // Input may have scrolled the view
            let metrics = self.session.metrics(char_width, char_height, hex_x, hex_y);
            self.draw_hex_view(&mut renderer, ui.visuals(), &metrics, text_x, text_y, visible);
        });
    }

    #[allow(clippy::too_many_arguments)]
    fn apply_view_input(
        &mut self,
        ui: &egui::Ui,
        rect: egui::Rect,
        char_width: f32,
        char_height: f32,
        hex_x: f32,
        hex_y: f32,
        hovered: bool,
    ) {
        let events = self.events;

        // Scroll wheel moves one row per frame
        if hovered && events.scroll_delta.abs() > 0.4 {
            self.session
                .scroll_by(if events.scroll_delta > 0.0 { -1 } else { 1 });
        }

        let metrics = self.session.metrics(char_width, char_height, hex_x, hex_y);
        let visible = self.session.lines_per_page;

        if let Some(pos) = events.pointer {
            if events.primary_pressed
                && rect.contains(pos)
                && metrics.is_point_in_hex_area(pos.x, pos.y, visible)
            {
                // Clicking the bytes takes the keyboard away from the text fields
                ui.memory_mut(egui::Memory::stop_text_input);
                self.session.click(&metrics, pos.x, pos.y);
                self.dragging = true;
            } else if self.dragging && events.primary_down {
                let under = metrics.byte_for_pixel(pos.x, pos.y, self.session.hexdata.file_size());
                if self.session.cursor != Some(under.offset) {
                    self.session.drag(&metrics, pos.x, pos.y);
                }
            }
        }
        if self.dragging && events.primary_released {
            self.dragging = false;
            self.session.release();
        }

        if ui.ctx().wants_keyboard_input() {
            return;
        }

        if let Some(ch) = events.hex_char
            && let Err(err) = self.session.input_hex_digit(ch)
        {
            self.report_error(err.to_string());
        }
        if let Some(movement) = events.cursor_move {
            self.session.move_cursor(movement);
        }
        if events.escape_pressed {
            self.session.selection.clear();
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw_hex_view(
        &self,
        renderer: &mut impl Renderer,
        visuals: &egui::Visuals,
        metrics: &ViewMetrics,
        text_x: f32,
        text_y: f32,
        visible: usize,
    ) {
        let hexdata = &self.session.hexdata;
        let text_color = visuals.text_color();

        renderer.begin_frame(visuals.extreme_bg_color);

        // Message lines (empty buffer or failed load) have no header and no grid
        if hexdata.is_empty() {
            for (i, line) in hexdata.hex_lines().iter().enumerate() {
                renderer.draw_text(text_x, (i as f32).mul_add(metrics.char_height, text_y), line, text_color);
            }
            return;
        }

        renderer.draw_text(text_x, text_y, hexdata.header_line(), colors::GRAY_160);

        let bpl = hexdata.bytes_per_line();
        let rows = metrics.scroll_offset..(metrics.scroll_offset + visible).min(hexdata.row_count());
        let bytes = (rows.start * bpl)..(rows.end * bpl).min(hexdata.file_size());

        self.draw_highlights(renderer, metrics, bytes);

        let annotations = hexdata.disassembly_lines();
        let lengths = hexdata.instruction_lengths();

        for row in rows {
            let y = ((row - metrics.scroll_offset) as f32).mul_add(metrics.char_height, metrics.hex_area_y);
            let Some(line) = hexdata.hex_lines().get(row) else {
                break;
            };
            renderer.draw_text(text_x, y, line, text_color);

            // Annotations share one column, also on the short last line
            let Some(annotation) = annotations.get(row).filter(|a| !a.is_empty()) else {
                continue;
            };
            let annotation_x = (annotation_column(bpl) as f32).mul_add(metrics.char_width, text_x);
            renderer.draw_text(annotation_x, y, annotation, colors::ANNOTATION);

            // Underline the bytes of the decoded instruction
            let first = row * bpl;
            let len = lengths.get(row).copied().unwrap_or(1).min(bpl);
            let last = (first + len - 1).min(hexdata.file_size() - 1);
            let start = metrics.byte_rect(first);
            let end = metrics.byte_rect(last);
            let underline_y = y + metrics.char_height - 1.0;
            renderer.draw_line(
                (start.x, underline_y),
                (end.x + end.width, underline_y),
                colors::ANNOTATION,
            );
        }

        // Caret on top of everything
        if let Some(pos) = self.session.cursor_position()
            && let Some(caret) = metrics.caret_rect(pos, visible)
        {
            renderer.draw_rect(caret, colors::CARET);
            renderer.draw_rect_outline(ascii_rect(metrics, pos.offset), colors::GRAY_110);
        }
    }

    /// Background of selected, matched and edited bytes in both the hex and the ASCII column
    fn draw_highlights(&self, renderer: &mut impl Renderer, metrics: &ViewMetrics, bytes: Range<usize>) {
        let session = &self.session;
        let match_range = session.search.last_match.map(|start| {
            let len = session.search.pattern().len().max(1);
            start..start + len
        });

        for offset in bytes {
            let color = if match_range.as_ref().is_some_and(|r| r.contains(&offset)) {
                colors::GREEN
            } else if session.selection.contains(offset) {
                colors::LIGHT_BLUE
            } else if session.is_edited(offset) {
                colors::MUD
            } else {
                continue;
            };

            renderer.draw_rect(metrics.byte_rect(offset), color);
            renderer.draw_rect(ascii_rect(metrics, offset), color);
        }
    }
}

#[allow(clippy::cast_precision_loss)]
/// Cell of `offset` in the ASCII column, which starts one space after the hex cells
fn ascii_rect(metrics: &ViewMetrics, offset: usize) -> PixelRect {
    let point = metrics.grid_point_for_byte(offset);
    let (_, y) = metrics.pixel_for_grid_point(point);
    let column = metrics.bytes_per_line * 3 + 1 + point.column;
    PixelRect {
        x: (column as f32).mul_add(metrics.char_width, metrics.hex_area_x),
        y,
        width: metrics.char_width,
        height: metrics.char_height,
    }
}
