//! Static font-metric tables for the standard PDF fonts the resume uses.
//!
//! Widths come from the Adobe AFM files for Helvetica and Helvetica-Bold and
//! are in 1/1000 em. Both fonts are base-14 Type1 fonts, so no font program
//! is embedded and the viewer's metrics match these tables.
//! Index = (char as usize) - 32, covering ASCII 0x20..=0x7E.

/// Fonts available to the layout engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
}

impl StandardFont {
    /// PostScript base font name
    pub fn base_font(&self) -> &'static [u8] {
        match self {
            StandardFont::Helvetica => b"Helvetica",
            StandardFont::HelveticaBold => b"Helvetica-Bold",
        }
    }

    /// Page resource name
    pub fn resource_name(&self) -> &'static [u8] {
        match self {
            StandardFont::Helvetica => b"F1",
            StandardFont::HelveticaBold => b"F2",
        }
    }

    pub fn metrics(&self) -> &'static FontMetricTable {
        match self {
            StandardFont::Helvetica => &HELVETICA_TABLE,
            StandardFont::HelveticaBold => &HELVETICA_BOLD_TABLE,
        }
    }

    /// Width of `text` in points at `font_size` points
    pub fn measure_pt(&self, text: &str, font_size: f64) -> f64 {
        self.metrics().measure_units(text) as f64 * font_size / 1000.0
    }
}

/// Character-width table for one font
pub struct FontMetricTable {
    widths: [u16; 95],
    /// Width for characters outside ASCII
    fallback_width: u16,
}

impl FontMetricTable {
    /// Width of a single character in 1/1000 em
    pub fn char_units(&self, c: char) -> u16 {
        match c {
            ' '..='~' => self.widths[c as usize - 32],
            '\u{2022}' => 350, // bullet
            '\u{2013}' => 556, // en dash
            '\u{2014}' => 1000, // em dash
            _ => self.fallback_width,
        }
    }

    /// Width of a string in 1/1000 em
    pub fn measure_units(&self, s: &str) -> u32 {
        s.chars().map(|c| self.char_units(c) as u32).sum()
    }
}

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0-9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A-M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N-Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a-m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n-z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    fallback_width: 556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0-9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        333, 333, 584, 584, 584, 611, 975,
        // A-M
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        // N-Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        333, 278, 333, 584, 556, 333,
        // a-m
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        // n-z
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        // {    |    }    ~
        389, 280, 389, 584,
    ],
    fallback_width: 611,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        let m = StandardFont::Helvetica.metrics();
        assert_eq!(m.char_units(' '), 278);
        assert_eq!(m.char_units('W'), 944);
        assert_eq!(m.char_units('~'), 584);
        assert_eq!(m.measure_units("Hi"), 722 + 222);
    }

    #[test]
    fn test_measure_pt_scales_with_size() {
        let w10 = StandardFont::Helvetica.measure_pt("Resume", 10.0);
        let w20 = StandardFont::Helvetica.measure_pt("Resume", 20.0);
        assert!((w20 - 2.0 * w10).abs() < 1e-9);
    }

    #[test]
    fn test_bold_is_wider() {
        let text = "Professional Summary";
        assert!(
            StandardFont::HelveticaBold.measure_pt(text, 16.0)
                > StandardFont::Helvetica.measure_pt(text, 16.0)
        );
    }

    #[test]
    fn test_non_ascii_fallback() {
        let m = StandardFont::Helvetica.metrics();
        assert_eq!(m.char_units('é'), 556);
        assert_eq!(m.char_units('•'), 350);
    }
}
