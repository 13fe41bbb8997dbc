//! Minimal drawing surface used by the hex view.
//!
//! The hex view only needs rectangles, single-line monospace text and line segments.
//! Keeping it behind [`Renderer`] leaves the layout code independent of the egui painter.

use eframe::egui;
use hexdatalib::PixelRect;

pub trait Renderer {
    /// Clear the drawing area with the background color
    fn begin_frame(&mut self, background: egui::Color32);
    fn draw_rect(&mut self, rect: PixelRect, color: egui::Color32);
    fn draw_rect_outline(&mut self, rect: PixelRect, color: egui::Color32);
    /// Draw one line of monospace text with its top-left corner at `(x, y)`
    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: egui::Color32);
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: egui::Color32);
    /// Update the drawing area after the window was resized
    fn resize(&mut self, width: f32, height: f32);
    /// Width and height of one monospace character
    fn char_size(&self) -> (f32, f32);
}

/// [`Renderer`] drawing into an egui painter clipped to the hex view
pub struct EguiRenderer {
    painter: egui::Painter,
    rect: egui::Rect,
    font: egui::FontId,
    char_size: (f32, f32),
}

impl EguiRenderer {
    pub fn new(painter: egui::Painter, rect: egui::Rect, font: egui::FontId) -> Self {
        // Measure a glyph once per frame, all glyphs of a monospace font have the same size
        let galley = painter.layout_no_wrap("0".to_string(), font.clone(), egui::Color32::WHITE);
        let char_size = (galley.size().x, galley.size().y);

        let mut renderer = Self {
            painter,
            rect,
            font,
            char_size,
        };
        renderer.painter.set_clip_rect(rect);
        renderer
    }

    pub const fn rect(&self) -> egui::Rect {
        self.rect
    }
}

fn to_egui_rect(rect: PixelRect) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(rect.x, rect.y),
        egui::vec2(rect.width, rect.height),
    )
}

impl Renderer for EguiRenderer {
    fn begin_frame(&mut self, background: egui::Color32) {
        self.painter.rect_filled(self.rect, 0.0, background);
    }

    fn draw_rect(&mut self, rect: PixelRect, color: egui::Color32) {
        self.painter.rect_filled(to_egui_rect(rect), 0.0, color);
    }

    fn draw_rect_outline(&mut self, rect: PixelRect, color: egui::Color32) {
        self.painter.rect_stroke(
            to_egui_rect(rect),
            0.0,
            egui::Stroke::new(1.0, color),
            egui::StrokeKind::Inside,
        );
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: egui::Color32) {
        self.painter.text(
            egui::pos2(x, y),
            egui::Align2::LEFT_TOP,
            text,
            self.font.clone(),
            color,
        );
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), color: egui::Color32) {
        self.painter.line_segment(
            [egui::pos2(from.0, from.1), egui::pos2(to.0, to.1)],
            egui::Stroke::new(1.0, color),
        );
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.rect = egui::Rect::from_min_size(self.rect.min, egui::vec2(width, height));
        self.painter.set_clip_rect(self.rect);
    }

    fn char_size(&self) -> (f32, f32) {
        self.char_size
    }
}
