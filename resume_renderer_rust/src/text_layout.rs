//! Text layout and line breaking
//!
//! Greedy word wrapping driven by measured glyph widths of the standard
//! fonts. Widths are compared in millimetres so callers can pass column
//! widths straight from the page geometry.

use crate::font_metrics::StandardFont;
use crate::geometry::pt_to_mm;

/// Line breaker for wrapping text to a column
#[derive(Debug, Clone, Copy)]
pub struct LineBreaker {
    max_width: f64,
    font: StandardFont,
    font_size: f64,
}

impl LineBreaker {
    /// `max_width` in mm, `font_size` in pt
    pub fn new(max_width: f64, font: StandardFont, font_size: f64) -> Self {
        Self {
            max_width,
            font,
            font_size,
        }
    }

    /// Rendered width of `text` in mm
    pub fn measure(&self, text: &str) -> f64 {
        pt_to_mm(self.font.measure_pt(text, self.font_size))
    }

    pub fn fits(&self, text: &str) -> bool {
        self.measure(text) <= self.max_width
    }

    /// Break text into lines
    ///
    /// Explicit newlines start a new paragraph; blank paragraphs between
    /// text are kept as empty lines. Runs of whitespace collapse to one
    /// space. A word wider than the column is split between characters.
    /// Blank input produces no lines.
    pub fn break_text(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut lines = Vec::new();
        for paragraph in text.trim().lines() {
            if paragraph.trim().is_empty() {
                lines.push(String::new());
                continue;
            }
            self.break_paragraph(paragraph, &mut lines);
        }
        lines
    }

    fn break_paragraph(&self, paragraph: &str, lines: &mut Vec<String>) {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if self.fits(&candidate) {
                current = candidate;
                continue;
            }

            // Finish current line and start a new one with this word
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if self.fits(word) {
                current = word.to_string();
            } else {
                let mut pieces = self.split_long_word(word);
                // The last piece stays open so following words can join it
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    /// Split a word that is wider than the column at character boundaries
    ///
    /// Every piece holds at least one character, so a column narrower than
    /// a single glyph still terminates.
    fn split_long_word(&self, word: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut piece = String::new();

        for ch in word.chars() {
            piece.push(ch);
            if !self.fits(&piece) && piece.chars().count() > 1 {
                piece.pop();
                pieces.push(std::mem::take(&mut piece));
                piece.push(ch);
            }
        }
        if !piece.is_empty() {
            pieces.push(piece);
        }
        pieces
    }
}
