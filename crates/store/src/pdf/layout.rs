//! Fixed-page layout tree
//!
//! The projector produces this tree; the paginator places it on pages.
//! Coordinates are in points with the origin at the top-left of the page.

use doc_model::{ImageData, ListStyle, PageSize};

/// Box spacing in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spacing {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Spacing {
    pub const ZERO: Spacing = Spacing::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Vertical-only spacing
    pub const fn vertical(top: f64, bottom: f64) -> Self {
        Self::new(0.0, top, 0.0, bottom)
    }
}

/// Page margins
pub type Margins = Spacing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
}

/// RGB color, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Parse `#rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// A paragraph of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub text: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub align: Align,
    /// Multiplier applied to the font's natural line height
    pub line_height: f64,
    pub margin: Spacing,
}

impl TextNode {
    pub fn new(text: impl Into<String>, size: f64) -> Self {
        Self {
            text: text.into(),
            size,
            bold: false,
            italic: false,
            align: Align::Left,
            line_height: 1.0,
            margin: Spacing::ZERO,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn margin(mut self, margin: Spacing) -> Self {
        self.margin = margin;
        self
    }
}

/// How an image is sized
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageSize {
    /// Scale to fit the box, keeping the aspect ratio
    Fit { width: f64, height: f64 },
    /// Stretch to exactly this size
    Exact { width: f64, height: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageNode {
    pub image: ImageData,
    pub size: ImageSize,
    pub align: Align,
    pub margin: Spacing,
}

/// A table with one header row and equal ("star") column widths
#[derive(Debug, Clone, PartialEq)]
pub struct TableNode {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub size: f64,
    pub header_fill: Rgb,
    pub margin: Spacing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListNode {
    pub style: ListStyle,
    pub items: Vec<String>,
    pub size: f64,
    pub margin: Spacing,
}

/// Nodes laid out one under another
#[derive(Debug, Clone, PartialEq)]
pub struct StackNode {
    pub children: Vec<PdfNode>,
    /// Keep the whole stack on one page when it fits on a page at all
    pub unbreakable: bool,
    pub margin: Spacing,
}

/// A node drawn at a fixed position on the current page, outside the flow
#[derive(Debug, Clone, PartialEq)]
pub struct AbsoluteNode {
    pub x: f64,
    pub y: f64,
    /// Box width; defaults to the rest of the page
    pub width: Option<f64>,
    pub node: Box<PdfNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PdfNode {
    Text(TextNode),
    Image(ImageNode),
    Table(TableNode),
    List(ListNode),
    Stack(StackNode),
    /// Start a new page before the next flowed or absolute node
    PageBreak,
    Absolute(AbsoluteNode),
}

impl PdfNode {
    /// Count of page breaks in this subtree
    pub fn page_breaks(&self) -> usize {
        match self {
            PdfNode::PageBreak => 1,
            PdfNode::Stack(stack) => stack.children.iter().map(PdfNode::page_breaks).sum(),
            PdfNode::Absolute(abs) => abs.node.page_breaks(),
            _ => 0,
        }
    }
}

/// Footer content drawn across the full page width below the body area
#[derive(Debug, Clone, PartialEq)]
pub struct PdfFooter {
    pub stack: StackNode,
}

/// Per-page footer parameters
#[derive(Debug, Clone, PartialEq)]
pub struct FooterSpec {
    pub logo: Option<ImageData>,
    pub logo_width: f64,
    pub logo_height: f64,
    pub logo_margin_bottom: f64,
    pub number_size: f64,
    pub number_indent: f64,
    pub margin_top: f64,
    /// Page 1 is a cover and gets no footer
    pub skip_first_page: bool,
}

/// Output of the PDF projector
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub page_size: PageSize,
    pub margins: Margins,
    pub content: Vec<PdfNode>,
    pub footer: FooterSpec,
    pub title: String,
}

impl PdfLayout {
    pub fn page_width(&self) -> f64 {
        self.page_size.width()
    }

    pub fn page_height(&self) -> f64 {
        self.page_size.height()
    }

    /// Number of forced page breaks in the content
    pub fn page_breaks(&self) -> usize {
        self.content.iter().map(PdfNode::page_breaks).sum()
    }

    /// Footer for a 1-based page number
    pub fn footer(&self, page: usize) -> Option<PdfFooter> {
        if self.footer.skip_first_page && page == 1 {
            return None;
        }
        Some(self.footer_for(page))
    }

    /// Footer content for a page, regardless of the cover rule
    pub fn footer_for(&self, page: usize) -> PdfFooter {
        let spec = &self.footer;
        let mut children = Vec::with_capacity(2);
        if let Some(logo) = &spec.logo {
            children.push(PdfNode::Image(ImageNode {
                image: logo.clone(),
                size: ImageSize::Exact {
                    width: spec.logo_width,
                    height: spec.logo_height,
                },
                align: Align::Center,
                margin: Spacing::vertical(0.0, spec.logo_margin_bottom),
            }));
        }
        children.push(PdfNode::Text(
            TextNode::new(page.to_string(), spec.number_size)
                .margin(Spacing::new(spec.number_indent, 0.0, 0.0, 0.0)),
        ));

        PdfFooter {
            stack: StackNode {
                children,
                unbreakable: false,
                margin: Spacing::vertical(spec.margin_top, 0.0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footer_spec(skip_first_page: bool, logo: Option<ImageData>) -> FooterSpec {
        FooterSpec {
            logo,
            logo_width: 369.0,
            logo_height: 90.0,
            logo_margin_bottom: 5.0,
            number_size: 10.0,
            number_indent: 40.0,
            margin_top: 5.0,
            skip_first_page,
        }
    }

    fn layout(footer: FooterSpec) -> PdfLayout {
        PdfLayout {
            page_size: PageSize::A4,
            margins: Spacing::new(40.0, 40.0, 40.0, 80.0),
            content: vec![PdfNode::PageBreak],
            footer,
            title: "Doc".to_string(),
        }
    }

    #[test]
    fn test_footer_skips_cover_page() {
        let layout = layout(footer_spec(true, None));
        assert!(layout.footer(1).is_none());
        assert!(layout.footer(2).is_some());
    }

    #[test]
    fn test_footer_contents() {
        let logo = ImageData::from_base64("image/png", "AAAA");
        let layout = layout(footer_spec(false, Some(logo.clone())));
        let footer = layout.footer(3).unwrap();

        assert_eq!(footer.stack.children.len(), 2);
        match &footer.stack.children[0] {
            PdfNode::Image(node) => {
                assert_eq!(node.image, logo);
                assert_eq!(node.align, Align::Center);
            }
            other => panic!("expected logo, got {:?}", other),
        }
        match &footer.stack.children[1] {
            PdfNode::Text(node) => {
                assert_eq!(node.text, "3");
                assert_eq!(node.margin.left, 40.0);
            }
            other => panic!("expected page number, got {:?}", other),
        }
    }

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_hex("#fcc603"), Some(Rgb(0xfc, 0xc6, 0x03)));
        assert_eq!(Rgb::from_hex("fcc603"), None);
        assert_eq!(Rgb::from_hex("#fcc6"), None);
    }

    #[test]
    fn test_page_breaks_counted_in_stacks() {
        let node = PdfNode::Stack(StackNode {
            children: vec![PdfNode::PageBreak, PdfNode::Text(TextNode::new("x", 11.0))],
            unbreakable: false,
            margin: Spacing::ZERO,
        });
        assert_eq!(node.page_breaks(), 1);
    }
}
