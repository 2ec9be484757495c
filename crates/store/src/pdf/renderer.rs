//! Page items to PDF content streams
//!
//! Items are positioned in layout coordinates (origin top-left, y down);
//! PDF user space has its origin bottom-left, so every y is flipped here.

use super::content::ContentStream;
use super::fonts::PdfFont;
use super::images::resource_name;
use super::layout::Rgb;
use std::collections::BTreeSet;

/// A color in RGB format (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl From<Rgb> for RgbColor {
    fn from(c: Rgb) -> Self {
        Self {
            r: c.0 as f64 / 255.0,
            g: c.1 as f64 / 255.0,
            b: c.2 as f64 / 255.0,
        }
    }
}

/// Text rendering info
#[derive(Debug, Clone, PartialEq)]
pub struct TextRenderInfo {
    pub text: String,
    pub x: f64,
    /// Baseline, from the top of the page
    pub baseline: f64,
    pub font: PdfFont,
    pub size: f64,
}

/// Rectangle rendering info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectRenderInfo {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Option<RgbColor>,
    pub stroke: Option<RgbColor>,
    pub stroke_width: f64,
}

/// Image rendering info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRenderInfo {
    /// Index into the document's image registry
    pub image: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PdfRenderItem {
    Text(TextRenderInfo),
    Rectangle(RectRenderInfo),
    Image(ImageRenderInfo),
}

/// Everything drawn on one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageRenderInfo {
    pub width: f64,
    pub height: f64,
    pub items: Vec<PdfRenderItem>,
}

impl PageRenderInfo {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            items: Vec::new(),
        }
    }

    pub fn add_item(&mut self, item: PdfRenderItem) {
        self.items.push(item);
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextRenderInfo> {
        self.items.iter().filter_map(|item| match item {
            PdfRenderItem::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn fonts(&self) -> BTreeSet<PdfFont> {
        self.texts().map(|t| t.font).collect()
    }

    pub fn images(&self) -> BTreeSet<usize> {
        self.items
            .iter()
            .filter_map(|item| match item {
                PdfRenderItem::Image(image) => Some(image.image),
                _ => None,
            })
            .collect()
    }
}

/// Render a page to a content stream
///
/// Graphics go first so that text stays on top of fills and images.
pub fn render_page(page: &PageRenderInfo) -> ContentStream {
    let mut content = ContentStream::new();

    for item in &page.items {
        match item {
            PdfRenderItem::Rectangle(rect) => render_rectangle(&mut content, rect, page.height),
            PdfRenderItem::Image(image) => render_image(&mut content, image, page.height),
            PdfRenderItem::Text(_) => {}
        }
    }

    let mut texts = page.texts().peekable();
    if texts.peek().is_some() {
        content.begin_text();
        content.set_fill_rgb(0.0, 0.0, 0.0);
        let mut current_font: Option<(PdfFont, f64)> = None;
        for text in texts {
            if current_font != Some((text.font, text.size)) {
                content.set_font(text.font, text.size);
                current_font = Some((text.font, text.size));
            }
            content.move_text_to(text.x, page.height - text.baseline);
            content.show_text(&text.text);
        }
        content.end_text();
    }

    content
}

fn render_rectangle(content: &mut ContentStream, rect: &RectRenderInfo, page_height: f64) {
    content.save_state();

    if let Some(fill) = rect.fill {
        content.set_fill_rgb(fill.r, fill.g, fill.b);
    }
    if let Some(stroke) = rect.stroke {
        content.set_stroke_rgb(stroke.r, stroke.g, stroke.b);
        content.set_line_width(rect.stroke_width);
    }

    content.rect(rect.x, page_height - rect.y - rect.height, rect.width, rect.height);

    match (rect.fill.is_some(), rect.stroke.is_some()) {
        (true, true) => content.fill_and_stroke(),
        (true, false) => content.fill(),
        (false, true) => content.stroke(),
        (false, false) => content.end_path(),
    };

    content.restore_state();
}

fn render_image(content: &mut ContentStream, image: &ImageRenderInfo, page_height: f64) {
    content.save_state();
    // Image space is the unit square; scale it to the display box
    content.transform(
        image.width,
        0.0,
        0.0,
        image.height,
        image.x,
        page_height - image.y - image.height,
    );
    content.draw_xobject(&resource_name(image.image));
    content.restore_state();
}
