//! Flow layout produced by the DOCX projector
//!
//! Sizes follow WordprocessingML units: half-points for text, twentieths of
//! a point (twips) for spacing and page geometry, EMU for drawings.

use crate::image_store::ImageFormat;
use doc_model::PageSize;

/// EMU per pixel at 96 dpi
pub const EMU_PER_PIXEL: i64 = 9525;
/// Twips per inch
pub const TWIPS_PER_INCH: u32 = 1440;

pub fn pixels_to_emu(pixels: u32) -> i64 {
    pixels as i64 * EMU_PER_PIXEL
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
        }
    }
}

/// Paragraph spacing in twips; `line` is in 240ths of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spacing {
    pub before: Option<u32>,
    pub after: Option<u32>,
    pub line: Option<u32>,
}

impl Spacing {
    pub const fn new(before: Option<u32>, after: Option<u32>) -> Self {
        Self {
            before,
            after,
            line: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunContent {
    Text(String),
    /// Line break inside a paragraph
    Break,
    /// Inline picture referring to an entry of [`DocxLayout::media`]
    Image {
        media: usize,
        width_emu: i64,
        height_emu: i64,
    },
    /// Current page number field
    PageNumber,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub content: RunContent,
    pub bold: bool,
    pub italic: bool,
    /// Font size in half-points
    pub size: Option<u32>,
}

impl Run {
    pub fn new(content: RunContent) -> Self {
        Self {
            content,
            bold: false,
            italic: false,
            size: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(RunContent::Text(text.into()))
    }

    /// Text runs for multi-line content, with breaks between the lines
    pub fn lines(text: &str, size: u32) -> Vec<Run> {
        let mut runs = Vec::new();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                runs.push(Run::new(RunContent::Break));
            }
            runs.push(Run::text(line).size(size));
        }
        runs
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }
}

/// Binding of a paragraph to a numbering instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberingRef {
    pub num_id: u32,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub style: Option<String>,
    pub alignment: Option<Alignment>,
    pub spacing: Spacing,
    pub page_break_before: bool,
    pub numbering: Option<NumberingRef>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    pub fn new(runs: Vec<Run>) -> Self {
        Self {
            runs,
            ..Default::default()
        }
    }

    /// Empty paragraph that starts a new page
    pub fn page_break() -> Self {
        Self {
            page_break_before: true,
            ..Default::default()
        }
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn numbering(mut self, numbering: NumberingRef) -> Self {
        self.numbering = Some(numbering);
        self
    }

    /// Plain text of the paragraph's text runs
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .filter_map(|run| match &run.content {
                RunContent::Text(text) => Some(text.as_str()),
                RunContent::Break => Some("\n"),
                _ => None,
            })
            .collect()
    }
}

/// Header row plus body rows, all cells bordered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Header cell shading, `rrggbb`
    pub header_fill: String,
    /// Cell text size in half-points
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyElement {
    Paragraph(Paragraph),
    Table(Table),
}

impl BodyElement {
    pub fn is_page_break(&self) -> bool {
        matches!(self, BodyElement::Paragraph(p) if p.page_break_before && p.runs.is_empty())
    }
}

/// Numbering instances used by the body
///
/// Instance 1 is the shared bullet list. Every numbered list gets its own
/// instance after that, restarting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumberingPlan {
    pub numbered_lists: u32,
}

impl NumberingPlan {
    pub const BULLET_NUM_ID: u32 = 1;
    pub const BULLET_ABSTRACT_ID: u32 = 0;
    pub const DECIMAL_ABSTRACT_ID: u32 = 1;

    /// Allocate the instance for the next numbered list
    pub fn next_numbered(&mut self) -> u32 {
        self.numbered_lists += 1;
        Self::BULLET_NUM_ID + self.numbered_lists
    }

    pub fn numbered_ids(&self) -> impl Iterator<Item = u32> {
        (1..=self.numbered_lists).map(|n| Self::BULLET_NUM_ID + n)
    }
}

/// Page margins in twips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMargins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
    pub header: u32,
    pub footer: u32,
}

impl PageMargins {
    /// 0.5 in all round, 0.75 in at the bottom
    pub fn standard() -> Self {
        let half_inch = TWIPS_PER_INCH / 2;
        Self {
            top: half_inch,
            right: half_inch,
            bottom: TWIPS_PER_INCH * 3 / 4,
            left: half_inch,
            header: half_inch,
            footer: half_inch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionProperties {
    pub page_size: PageSize,
    pub margins: PageMargins,
    /// Page 1 uses the empty first-page footer
    pub title_page: bool,
}

impl Default for SectionProperties {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            margins: PageMargins::standard(),
            title_page: false,
        }
    }
}

impl SectionProperties {
    /// Page width and height in twips
    pub fn page_twips(&self) -> (u32, u32) {
        let twips = |points: f64| (points * 20.0).round() as u32;
        (twips(self.page_size.width()), twips(self.page_size.height()))
    }
}

/// An embedded picture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub data: Vec<u8>,
    pub format: ImageFormat,
}

impl MediaItem {
    /// Part name under `word/media/`
    pub fn file_name(&self, index: usize) -> String {
        format!("image{}.{}", index + 1, self.format.extension())
    }
}

/// Output of the DOCX projector
#[derive(Debug, Clone, PartialEq)]
pub struct DocxLayout {
    pub title: String,
    pub body: Vec<BodyElement>,
    pub footer: Vec<Paragraph>,
    pub numbering: NumberingPlan,
    pub section: SectionProperties,
    pub media: Vec<MediaItem>,
}

impl DocxLayout {
    pub fn page_breaks(&self) -> usize {
        self.body.iter().filter(|e| e.is_page_break()).count()
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(|e| match e {
            BodyElement::Paragraph(p) => Some(p),
            BodyElement::Table(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_margins() {
        let margins = PageMargins::standard();
        assert_eq!((margins.top, margins.bottom, margins.left, margins.right), (720, 1080, 720, 720));
    }

    #[test]
    fn test_page_twips() {
        let section = SectionProperties {
            page_size: PageSize::A4,
            margins: PageMargins::standard(),
            title_page: false,
        };
        assert_eq!(section.page_twips(), (11906, 16838));
    }

    #[test]
    fn test_numbering_plan_allocates_after_bullets() {
        let mut plan = NumberingPlan::default();
        assert_eq!(plan.next_numbered(), 2);
        assert_eq!(plan.next_numbered(), 3);
        assert_eq!(plan.numbered_ids().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_lines_insert_breaks() {
        let runs = Run::lines("a\nb", 22);
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[1].content, RunContent::Break);
        assert_eq!(Paragraph::new(runs).text(), "a\nb");
    }
}
