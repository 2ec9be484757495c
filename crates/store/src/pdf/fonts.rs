//! PDF Font Handling
//!
//! Text is set in the Helvetica family of the standard 14 fonts, which every
//! viewer provides, under WinAnsiEncoding. Widths come from the Adobe font
//! metrics and drive line wrapping.

use super::objects::{PdfDictionary, PdfObject};

/// The standard fonts used by the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PdfFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
}

impl PdfFont {
    pub fn select(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => PdfFont::Helvetica,
            (true, false) => PdfFont::HelveticaBold,
            (false, true) => PdfFont::HelveticaOblique,
            (true, true) => PdfFont::HelveticaBoldOblique,
        }
    }

    /// Get the PDF base font name
    pub fn pdf_name(&self) -> &'static str {
        match self {
            PdfFont::Helvetica => "Helvetica",
            PdfFont::HelveticaBold => "Helvetica-Bold",
            PdfFont::HelveticaOblique => "Helvetica-Oblique",
            PdfFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
        }
    }

    /// Resource name used in content streams
    pub fn resource_name(&self) -> &'static str {
        match self {
            PdfFont::Helvetica => "F1",
            PdfFont::HelveticaBold => "F2",
            PdfFont::HelveticaOblique => "F3",
            PdfFont::HelveticaBoldOblique => "F4",
        }
    }

    fn is_bold(&self) -> bool {
        matches!(self, PdfFont::HelveticaBold | PdfFont::HelveticaBoldOblique)
    }

    /// Advance width of one character, in thousandths of the font size
    pub fn char_width(&self, c: char) -> u16 {
        let table = if self.is_bold() {
            &HELVETICA_BOLD_WIDTHS
        } else {
            &HELVETICA_WIDTHS
        };
        match c as u32 {
            code @ 32..=126 => table[(code - 32) as usize],
            // Latin-1 letters are close to their unaccented forms
            _ if c.is_alphabetic() => {
                if self.is_bold() {
                    611
                } else {
                    556
                }
            }
            0xA0 => 278,
            _ => 556,
        }
    }

    /// Width of a string set at `size` points
    pub fn text_width(&self, text: &str, size: f64) -> f64 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f64 * size / 1000.0
    }
}

/// Create a font dictionary for a standard font
pub fn create_font_dict(font: PdfFont) -> PdfDictionary {
    let mut dict = PdfDictionary::new().with_type("Font");
    dict.insert("Subtype", PdfObject::name("Type1"));
    dict.insert("BaseFont", PdfObject::name(font.pdf_name()));
    dict.insert("Encoding", PdfObject::name("WinAnsiEncoding"));
    dict
}

/// Encode text as WinAnsi (CP1252) bytes; unmappable characters become `?`
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c as u32 {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
        _ => match c {
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
            '\t' => b' ',
            _ => b'?',
        },
    }
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_selection() {
        assert_eq!(PdfFont::select(true, false), PdfFont::HelveticaBold);
        assert_eq!(PdfFont::select(false, true).pdf_name(), "Helvetica-Oblique");
        assert_eq!(PdfFont::select(true, true).resource_name(), "F4");
    }

    #[test]
    fn test_create_font_dict() {
        let dict = create_font_dict(PdfFont::Helvetica);
        assert!(dict.get("Type").is_some());
        assert!(dict.get("BaseFont").is_some());
        assert!(dict.get("Encoding").is_some());
    }

    #[test]
    fn test_text_width() {
        // "Hello" = 722 + 556 + 222 + 222 + 556
        let width = PdfFont::Helvetica.text_width("Hello", 10.0);
        assert!((width - 22.78).abs() < 1e-9);
        assert!(PdfFont::HelveticaBold.text_width("Hello", 10.0) > width);
        assert_eq!(PdfFont::HelveticaOblique.text_width("Hello", 10.0), width);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Seção"), vec![b'S', b'e', 0xE7, 0xE3, b'o']);
        assert_eq!(encode_win_ansi("• –"), vec![0x95, b' ', 0x96]);
        assert_eq!(encode_win_ansi("日"), vec![b'?']);
    }
}
