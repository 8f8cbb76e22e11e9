//! Canvas-like wrapper over `pdf_writer::Content`
//!
//! Coordinates here are PDF user space (points, bottom-left origin).

use pdf_writer::{Content, Name, Str};

use crate::types::Color;
use crate::unicode_utils::unicode_to_winansi;

/// Canvas state for graphics operations
#[derive(Clone)]
pub struct CanvasState {
    pub fill_color: Color,
    pub stroke_color: Color,
    pub line_width: f64,
    pub font_name: Name<'static>,
    pub font_size: f64,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            fill_color: Color::black(),
            stroke_color: Color::black(),
            line_width: 1.0,
            font_name: Name(b"F1"),
            font_size: 12.0,
        }
    }
}

/// One page's content stream
pub struct PdfCanvas {
    content: Content,
    state: CanvasState,
    state_stack: Vec<CanvasState>,
}

impl PdfCanvas {
    pub fn new() -> Self {
        Self {
            content: Content::new(),
            state: CanvasState::default(),
            state_stack: Vec::new(),
        }
    }

    /// Finish the content stream and return its bytes
    pub fn finish(self) -> Vec<u8> {
        self.content.finish()
    }

    // ===== State Management =====

    pub fn save_state(&mut self) {
        self.state_stack.push(self.state.clone());
        self.content.save_state();
    }

    pub fn restore_state(&mut self) {
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
            self.content.restore_state();
        }
    }

    // ===== Colors =====

    // Setters skip operators that would not change the current state.

    pub fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color == color {
            return;
        }
        self.state.fill_color = color;
        self.content.set_fill_rgb(color.r as f32, color.g as f32, color.b as f32);
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        if self.state.stroke_color == color {
            return;
        }
        self.state.stroke_color = color;
        self.content.set_stroke_rgb(color.r as f32, color.g as f32, color.b as f32);
    }

    pub fn set_line_width(&mut self, width: f64) {
        if self.state.line_width == width {
            return;
        }
        self.state.line_width = width;
        self.content.set_line_width(width as f32);
    }

    // ===== Drawing =====

    /// Filled rectangle anchored at its bottom-left corner
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.content.rect(x, y, width, height);
        self.content.fill_nonzero();
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.content.move_to(x1, y1);
        self.content.line_to(x2, y2);
        self.content.stroke();
    }

    // ===== Text =====

    pub fn set_font(&mut self, font_name: Name<'static>, size: f64) {
        self.state.font_name = font_name;
        self.state.font_size = size;
    }

    /// Show `text` with its baseline starting at (x, y)
    pub fn draw_string(&mut self, x: f32, y: f32, text: &str) {
        self.content.begin_text();
        self.content.set_font(self.state.font_name, self.state.font_size as f32);
        self.content.next_line(x, y);
        let bytes = unicode_to_winansi(text);
        self.content.show(Str(&bytes));
        self.content.end_text();
    }

    // ===== Images =====

    /// Paint an image XObject into the box with bottom-left corner (x, y)
    pub fn draw_image(
        &mut self,
        image_name: Name<'static>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) {
        self.content.save_state();
        // unit image square scaled to the box and moved into place
        self.content.transform([width, 0.0, 0.0, height, x, y]);
        self.content.x_object(image_name);
        self.content.restore_state();
    }
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(canvas: PdfCanvas) -> String {
        String::from_utf8(canvas.finish()).unwrap()
    }

    #[test]
    fn test_redundant_fill_color_skipped() {
        let mut canvas = PdfCanvas::new();
        canvas.set_fill_color(Color::black());
        canvas.set_fill_color(Color::white());
        canvas.set_fill_color(Color::white());
        let out = stream(canvas);
        assert_eq!(out.matches(" rg").count(), 1);
    }

    #[test]
    fn test_restore_resets_tracked_state() {
        let mut canvas = PdfCanvas::new();
        canvas.save_state();
        canvas.set_stroke_color(Color::white());
        canvas.restore_state();
        // graphics state is black again, so white must be re-emitted
        canvas.set_stroke_color(Color::white());
        let out = stream(canvas);
        assert_eq!(out.matches(" RG").count(), 2);
    }

    #[test]
    fn test_draw_string_encodes_winansi() {
        let mut canvas = PdfCanvas::new();
        canvas.set_font(Name(b"F2"), 16.0);
        canvas.draw_string(10.0, 20.0, "Skills");
        let out = stream(canvas);
        assert!(out.contains("/F2 16 Tf"));
        assert!(out.contains("(Skills) Tj"));
    }
}
