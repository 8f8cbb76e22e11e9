//! Unicode utilities for PDF text rendering
//!
//! The resume uses the standard Type1 fonts with WinAnsiEncoding. Latin-1
//! (U+00A0..=U+00FF) maps byte-for-byte; the 0x80..=0x9F block holds
//! typographic punctuation and a few extra letters.

/// Map a character into the WinAnsiEncoding 0x80..=0x9F block
fn winansi_high_byte(ch: char) -> Option<u8> {
    let byte = match ch {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Convert Unicode string to WinAnsiEncoding bytes
///
/// Characters outside the encoding become '?'.
pub fn unicode_to_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch as u32 {
            0x20..=0x7E => ch as u8,
            0xA0..=0xFF => ch as u32 as u8,
            _ => winansi_high_byte(ch).unwrap_or(b'?'),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii() {
        let text = "Hello World";
        assert_eq!(unicode_to_winansi(text), text.as_bytes());
    }

    #[test]
    fn test_latin1() {
        assert_eq!(unicode_to_winansi("Zoë Müller"), b"Zo\xEB M\xFCller".to_vec());
    }

    #[test]
    fn test_bullet_and_quotes() {
        assert_eq!(unicode_to_winansi("• “x”"), vec![0x95, b' ', 0x93, b'x', 0x94]);
    }

    #[test]
    fn test_unmapped() {
        assert_eq!(unicode_to_winansi("a\u{4e2d}\tb"), b"a??b".to_vec());
    }
}
