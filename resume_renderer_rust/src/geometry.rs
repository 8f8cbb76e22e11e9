//! Geometry utilities for PDF output
//!
//! Layout works in millimetres with a top-left origin. PDF user space is in
//! points with a bottom-left origin.

use crate::types::Rect;

/// Points per millimetre (72 pt per inch / 25.4 mm per inch)
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// Convert millimetres to points
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * PT_PER_MM
}

/// Convert points to millimetres
pub fn pt_to_mm(pt: f64) -> f64 {
    pt / PT_PER_MM
}

/// Maps top-down millimetre coordinates onto one PDF page
#[derive(Debug, Clone, Copy)]
pub struct PageSpace {
    page_height_mm: f64,
}

impl PageSpace {
    pub fn new(page_height_mm: f64) -> Self {
        Self { page_height_mm }
    }

    /// Convert a top-down point (mm) to PDF user space (pt)
    pub fn point(&self, x_mm: f64, y_mm: f64) -> (f32, f32) {
        (
            mm_to_pt(x_mm) as f32,
            mm_to_pt(self.page_height_mm - y_mm) as f32,
        )
    }

    /// Convert a top-down rect (mm) to a PDF rect `(x, y, w, h)` anchored at its bottom-left corner
    pub fn rect(&self, rect: &Rect) -> (f32, f32, f32, f32) {
        let (x, y) = self.point(rect.x, rect.bottom());
        (x, y, mm_to_pt(rect.width) as f32, mm_to_pt(rect.height) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_in_points() {
        assert!((mm_to_pt(210.0) - 595.28).abs() < 0.01);
        assert!((mm_to_pt(297.0) - 841.89).abs() < 0.01);
        assert!((pt_to_mm(mm_to_pt(42.0)) - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_flip_y() {
        let space = PageSpace::new(297.0);
        let (x, y) = space.point(0.0, 0.0);
        assert_eq!(x, 0.0);
        assert!((y - 841.89).abs() < 0.01);

        let (_, bottom, _, h) = space.rect(&Rect::new(0.0, 287.0, 10.0, 10.0));
        assert!(bottom.abs() < 0.01);
        assert!((h - 28.35).abs() < 0.01);
    }
}
