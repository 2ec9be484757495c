//! PDF Content Stream Generation
//!
//! Builder for the operators that paint a page: graphics state (`q`, `Q`,
//! `cm`), colors (`rg`, `RG`), paths (`re`, `f`, `S`, `B`), text (`BT`, `ET`,
//! `Tf`, `Tm`, `Tj`) and XObjects (`Do`).

use super::fonts::{encode_win_ansi, PdfFont};
use super::objects::{escape_string, format_real};
use std::io::Write;

/// Content stream builder
#[derive(Debug, Default)]
pub struct ContentStream {
    data: Vec<u8>,
}

impl ContentStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    // =========================================================================
    // Graphics state
    // =========================================================================

    pub fn save_state(&mut self) -> &mut Self {
        self.op("q")
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.op("Q")
    }

    /// Concatenate a transformation matrix (cm)
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.numbers(&[a, b, c, d, e, f], "cm")
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.numbers(&[width], "w")
    }

    pub fn set_fill_rgb(&mut self, r: f64, g: f64, b: f64) -> &mut Self {
        self.numbers(&[r, g, b], "rg")
    }

    pub fn set_stroke_rgb(&mut self, r: f64, g: f64, b: f64) -> &mut Self {
        self.numbers(&[r, g, b], "RG")
    }

    // =========================================================================
    // Paths
    // =========================================================================

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.numbers(&[x, y, width, height], "re")
    }

    pub fn fill(&mut self) -> &mut Self {
        self.op("f")
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.op("S")
    }

    pub fn fill_and_stroke(&mut self) -> &mut Self {
        self.op("B")
    }

    pub fn end_path(&mut self) -> &mut Self {
        self.op("n")
    }

    // =========================================================================
    // Text
    // =========================================================================

    pub fn begin_text(&mut self) -> &mut Self {
        self.op("BT")
    }

    pub fn end_text(&mut self) -> &mut Self {
        self.op("ET")
    }

    pub fn set_font(&mut self, font: PdfFont, size: f64) -> &mut Self {
        let _ = writeln!(self.data, "/{} {} Tf", font.resource_name(), format_real(size));
        self
    }

    /// Set the text matrix (Tm) to a plain translation
    pub fn move_text_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.numbers(&[1.0, 0.0, 0.0, 1.0, x, y], "Tm")
    }

    /// Show a string (Tj), encoded as WinAnsi
    pub fn show_text(&mut self, text: &str) -> &mut Self {
        self.data.extend_from_slice(&escape_string(&encode_win_ansi(text)));
        self.op(" Tj")
    }

    // =========================================================================
    // XObjects
    // =========================================================================

    /// Paint an XObject (Do)
    pub fn draw_xobject(&mut self, name: &str) -> &mut Self {
        let _ = writeln!(self.data, "/{} Do", name);
        self
    }

    fn numbers(&mut self, values: &[f64], operator: &str) -> &mut Self {
        for value in values {
            let _ = write!(self.data, "{} ", format_real(*value));
        }
        self.op(operator)
    }

    fn op(&mut self, operator: &str) -> &mut Self {
        self.data.extend_from_slice(operator.as_bytes());
        self.data.push(b'\n');
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(content: &ContentStream) -> String {
        String::from_utf8_lossy(content.as_bytes()).into_owned()
    }

    #[test]
    fn test_graphics_operators() {
        let mut content = ContentStream::new();
        content
            .save_state()
            .set_fill_rgb(1.0, 0.5, 0.0)
            .rect(10.0, 20.0, 30.5, 40.0)
            .fill()
            .restore_state();
        assert_eq!(text(&content), "q\n1 0.5 0 rg\n10 20 30.5 40 re\nf\nQ\n");
    }

    #[test]
    fn test_text_operators() {
        let mut content = ContentStream::new();
        content
            .begin_text()
            .set_font(PdfFont::HelveticaBold, 16.0)
            .move_text_to(40.0, 700.0)
            .show_text("Seção (1)")
            .end_text();

        let bytes = content.into_bytes();
        let expected_text: &[u8] = b"(Se\xE7\xE3o \\(1\\)) Tj\n";
        assert!(bytes.windows(expected_text.len()).any(|w| w == expected_text));
        assert!(String::from_utf8_lossy(&bytes).contains("/F2 16 Tf\n1 0 0 1 40 700 Tm\n"));
    }

    #[test]
    fn test_draw_xobject() {
        let mut content = ContentStream::new();
        content.transform(100.0, 0.0, 0.0, 50.0, 10.0, 10.0).draw_xobject("Im1");
        assert_eq!(text(&content), "100 0 0 50 10 10 cm\n/Im1 Do\n");
    }
}
