//! Layout tree to positioned page items
//!
//! Nodes flow down the body area of each page and spill onto new pages when
//! they run out of room. Text wraps at word boundaries using the font
//! metrics; overlong words are split. Absolute nodes and footers are drawn
//! at fixed positions and never paginate.

use super::fonts::PdfFont;
use super::images::ImageRegistry;
use super::layout::{
    AbsoluteNode, Align, ImageNode, ImageSize, ListNode, PdfLayout, PdfNode, Rgb, StackNode,
    TableNode, TextNode,
};
use super::renderer::{
    ImageRenderInfo, PageRenderInfo, PdfRenderItem, RectRenderInfo, TextRenderInfo,
};
use super::writer::Result;
use doc_model::ListStyle;

/// Natural line height as a multiple of the font size
const LINE_HEIGHT: f64 = 1.15;
/// Baseline position within a natural line, as a multiple of the font size
const ASCENT: f64 = 0.9;
const CELL_PADDING_X: f64 = 4.0;
const CELL_PADDING_Y: f64 = 2.0;
const TABLE_LINE_WIDTH: f64 = 1.0;
const BULLET: &str = "•";
const MARKER_GAP: f64 = 6.0;
/// Space kept between the footer and the bottom edge of the page
const FOOTER_GAP: f64 = 10.0;

/// Place a layout on pages
pub fn paginate(layout: &PdfLayout, images: &mut ImageRegistry) -> Result<Vec<PageRenderInfo>> {
    let mut paginator = Paginator::new(layout, images)?;
    for node in &layout.content {
        paginator.place(node, layout.margins.left, paginator.body_width())?;
    }
    paginator.ensure_page();
    paginator.draw_footers()?;
    Ok(paginator.pages)
}

/// Height of one line box
fn line_box(size: f64, line_height: f64) -> f64 {
    size * LINE_HEIGHT * line_height
}

/// Distance from the top of a line box to its baseline
fn baseline_offset(size: f64, line_box: f64) -> f64 {
    (line_box - size * LINE_HEIGHT) / 2.0 + size * ASCENT
}

/// Greedy word wrap; every paragraph yields at least one (possibly empty) line
pub fn wrap(text: &str, font: PdfFont, size: f64, max_width: f64) -> Vec<String> {
    let fits = |s: &str| font.text_width(s, size) <= max_width;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() {
                let candidate = format!("{} {}", line, word);
                if fits(&candidate) {
                    line = candidate;
                    continue;
                }
                lines.push(std::mem::take(&mut line));
            }
            if fits(word) {
                line.push_str(word);
            } else {
                for c in word.chars() {
                    line.push(c);
                    if !fits(&line) && line.chars().count() > 1 {
                        line.pop();
                        lines.push(std::mem::replace(&mut line, c.to_string()));
                    }
                }
            }
        }
        lines.push(line);
    }
    lines
}

struct Paginator<'a> {
    layout: &'a PdfLayout,
    images: &'a mut ImageRegistry,
    pages: Vec<PageRenderInfo>,
    current: usize,
    cursor: f64,
    bottom: f64,
    /// Bottom reserve on pages that carry a footer
    footer_reserve: f64,
    /// Positions are fixed: no page breaks
    fixed: bool,
    /// Measuring only: nothing is emitted
    dry_run: bool,
    break_pending: bool,
}

impl<'a> Paginator<'a> {
    fn new(layout: &'a PdfLayout, images: &'a mut ImageRegistry) -> Result<Self> {
        let mut paginator = Self {
            layout,
            images,
            pages: Vec::new(),
            current: 0,
            cursor: layout.margins.top,
            bottom: layout.page_height() - layout.margins.bottom,
            footer_reserve: layout.margins.bottom,
            fixed: false,
            dry_run: false,
            break_pending: false,
        };
        let footer = PdfNode::Stack(layout.footer_for(1).stack);
        let footer_height = paginator.measure(&footer, layout.page_width())?;
        paginator.footer_reserve = layout.margins.bottom.max(footer_height + FOOTER_GAP);
        Ok(paginator)
    }

    fn body_width(&self) -> f64 {
        self.layout.page_width() - self.layout.margins.left - self.layout.margins.right
    }

    fn body_top(&self) -> f64 {
        self.layout.margins.top
    }

    fn reserve_for(&self, page: usize) -> f64 {
        if self.layout.footer(page).is_some() {
            self.footer_reserve
        } else {
            self.layout.margins.bottom
        }
    }

    fn new_page(&mut self) {
        self.pages.push(PageRenderInfo::new(
            self.layout.page_width(),
            self.layout.page_height(),
        ));
        self.current = self.pages.len() - 1;
        self.cursor = self.body_top();
        self.bottom = self.layout.page_height() - self.reserve_for(self.pages.len());
        self.break_pending = false;
    }

    /// Open the first page, or the page a pending break asks for
    fn ensure_page(&mut self) {
        if self.fixed || self.dry_run {
            return;
        }
        if self.pages.is_empty() || self.break_pending {
            self.new_page();
        }
    }

    /// Make room for `height` more points, breaking the page if needed
    fn fit(&mut self, height: f64) {
        if self.fixed || self.dry_run {
            return;
        }
        if self.cursor + height > self.bottom && self.cursor > self.body_top() {
            self.new_page();
        }
    }

    fn emit(&mut self, item: PdfRenderItem) {
        if self.dry_run {
            return;
        }
        if let Some(page) = self.pages.get_mut(self.current) {
            page.add_item(item);
        }
    }

    fn measure(&mut self, node: &PdfNode, width: f64) -> Result<f64> {
        let saved = (self.cursor, self.dry_run);
        self.dry_run = true;
        let start = self.cursor;
        let placed = self.place(node, 0.0, width);
        let height = self.cursor - start;
        (self.cursor, self.dry_run) = saved;
        placed.map(|_| height)
    }

    fn place(&mut self, node: &PdfNode, x: f64, width: f64) -> Result<()> {
        match node {
            PdfNode::PageBreak => {
                self.ensure_page();
                if !self.fixed && !self.dry_run {
                    self.break_pending = true;
                }
                Ok(())
            }
            PdfNode::Absolute(abs) => self.place_absolute(abs),
            PdfNode::Text(text) => {
                self.ensure_page();
                self.place_text(text, x, width);
                Ok(())
            }
            PdfNode::Image(image) => {
                self.ensure_page();
                self.place_image(image, x, width)
            }
            PdfNode::Table(table) => {
                self.ensure_page();
                self.place_table(table, x, width);
                Ok(())
            }
            PdfNode::List(list) => {
                self.ensure_page();
                self.place_list(list, x, width);
                Ok(())
            }
            PdfNode::Stack(stack) => self.place_stack(stack, x, width),
        }
    }

    fn place_text(&mut self, node: &TextNode, x: f64, width: f64) {
        let font = PdfFont::select(node.bold, node.italic);
        let inner_x = x + node.margin.left;
        let inner_width = width - node.margin.left - node.margin.right;
        let lh = line_box(node.size, node.line_height);

        self.cursor += node.margin.top;
        for line in wrap(&node.text, font, node.size, inner_width) {
            self.fit(lh);
            if !line.is_empty() {
                let line_x = match node.align {
                    Align::Left => inner_x,
                    Align::Center => {
                        inner_x + (inner_width - font.text_width(&line, node.size)).max(0.0) / 2.0
                    }
                };
                let baseline = self.cursor + baseline_offset(node.size, lh);
                self.emit(PdfRenderItem::Text(TextRenderInfo {
                    text: line,
                    x: line_x,
                    baseline,
                    font,
                    size: node.size,
                }));
            }
            self.cursor += lh;
        }
        self.cursor += node.margin.bottom;
    }

    fn place_image(&mut self, node: &ImageNode, x: f64, width: f64) -> Result<()> {
        let handle = self.images.register(&node.image)?;
        let inner_x = x + node.margin.left;
        let inner_width = width - node.margin.left - node.margin.right;

        let (mut w, mut h) = match node.size {
            ImageSize::Exact { width, height } => (width, height),
            ImageSize::Fit { width, height } => {
                if handle.width == 0 || handle.height == 0 {
                    return Ok(());
                }
                let (pw, ph) = (handle.width as f64, handle.height as f64);
                let scale = (width / pw).min(height / ph);
                (pw * scale, ph * scale)
            }
        };
        if w > inner_width && inner_width > 0.0 {
            h *= inner_width / w;
            w = inner_width;
        }

        self.cursor += node.margin.top;
        self.fit(h);
        let image_x = match node.align {
            Align::Left => inner_x,
            Align::Center => inner_x + (inner_width - w).max(0.0) / 2.0,
        };
        let y = self.cursor;
        self.emit(PdfRenderItem::Image(ImageRenderInfo {
            image: handle.index,
            x: image_x,
            y,
            width: w,
            height: h,
        }));
        self.cursor += h + node.margin.bottom;
        Ok(())
    }

    fn row_height(&self, cells: &[String], font: PdfFont, size: f64, col_width: f64) -> f64 {
        let lines = cells
            .iter()
            .map(|cell| wrap(cell, font, size, col_width - 2.0 * CELL_PADDING_X).len())
            .max()
            .unwrap_or(1);
        lines as f64 * line_box(size, 1.0) + 2.0 * CELL_PADDING_Y
    }

    fn place_row(&mut self, cells: &[String], x: f64, col_width: f64, size: f64, fill: Option<Rgb>) {
        let font = PdfFont::select(fill.is_some(), false);
        let height = self.row_height(cells, font, size, col_width);
        let lh = line_box(size, 1.0);
        let top = self.cursor;

        for (i, cell) in cells.iter().enumerate() {
            let cell_x = x + i as f64 * col_width;
            self.emit(PdfRenderItem::Rectangle(RectRenderInfo {
                x: cell_x,
                y: top,
                width: col_width,
                height,
                fill: fill.map(Into::into),
                stroke: Some(Rgb::BLACK.into()),
                stroke_width: TABLE_LINE_WIDTH,
            }));
            let lines = wrap(cell, font, size, col_width - 2.0 * CELL_PADDING_X);
            for (k, line) in lines.into_iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let baseline = top + CELL_PADDING_Y + k as f64 * lh + baseline_offset(size, lh);
                self.emit(PdfRenderItem::Text(TextRenderInfo {
                    text: line,
                    x: cell_x + CELL_PADDING_X,
                    baseline,
                    font,
                    size,
                }));
            }
        }
        self.cursor = top + height;
    }

    fn place_table(&mut self, node: &TableNode, x: f64, width: f64) {
        let columns = node.headers.len().max(1);
        let inner_x = x + node.margin.left;
        let col_width = (width - node.margin.left - node.margin.right) / columns as f64;
        let normalize = |cells: &[String]| -> Vec<String> {
            (0..columns)
                .map(|i| cells.get(i).cloned().unwrap_or_default())
                .collect()
        };
        let headers = normalize(&node.headers);
        let header_font = PdfFont::select(true, false);
        let body_font = PdfFont::select(false, false);
        let header_height = self.row_height(&headers, header_font, node.size, col_width);

        self.cursor += node.margin.top;
        let first_row = node
            .rows
            .first()
            .map(|row| self.row_height(&normalize(row), body_font, node.size, col_width))
            .unwrap_or(0.0);
        self.fit(header_height + first_row);
        self.place_row(&headers, inner_x, col_width, node.size, Some(node.header_fill));

        for row in &node.rows {
            let cells = normalize(row);
            let height = self.row_height(&cells, body_font, node.size, col_width);
            let page_before = self.pages.len();
            self.fit(height);
            if self.pages.len() != page_before {
                // Header row repeats on every page the table spans
                self.place_row(&headers, inner_x, col_width, node.size, Some(node.header_fill));
            }
            self.place_row(&cells, inner_x, col_width, node.size, None);
        }
        self.cursor += node.margin.bottom;
    }

    fn place_list(&mut self, node: &ListNode, x: f64, width: f64) {
        let font = PdfFont::select(false, false);
        let lh = line_box(node.size, 1.0);
        let markers: Vec<String> = (1..=node.items.len())
            .map(|n| match node.style {
                ListStyle::Bullet => BULLET.to_string(),
                ListStyle::Numbered => format!("{}.", n),
            })
            .collect();
        let indent = markers
            .iter()
            .map(|m| font.text_width(m, node.size))
            .fold(0.0, f64::max)
            + MARKER_GAP;
        let inner_x = x + node.margin.left;
        let text_width = width - node.margin.left - node.margin.right - indent;

        self.cursor += node.margin.top;
        for (item, marker) in node.items.iter().zip(markers) {
            for (k, line) in wrap(item, font, node.size, text_width).into_iter().enumerate() {
                self.fit(lh);
                let baseline = self.cursor + baseline_offset(node.size, lh);
                if k == 0 {
                    self.emit(PdfRenderItem::Text(TextRenderInfo {
                        text: marker.clone(),
                        x: inner_x,
                        baseline,
                        font,
                        size: node.size,
                    }));
                }
                if !line.is_empty() {
                    self.emit(PdfRenderItem::Text(TextRenderInfo {
                        text: line,
                        x: inner_x + indent,
                        baseline,
                        font,
                        size: node.size,
                    }));
                }
                self.cursor += lh;
            }
        }
        self.cursor += node.margin.bottom;
    }

    fn place_stack(&mut self, node: &StackNode, x: f64, width: f64) -> Result<()> {
        let inner_x = x + node.margin.left;
        let inner_width = width - node.margin.left - node.margin.right;

        if node.unbreakable && !self.fixed && !self.dry_run {
            self.ensure_page();
            let height = self.measure(&PdfNode::Stack(node.clone()), width)?;
            let available = self.bottom - self.body_top();
            if self.cursor + height > self.bottom && height <= available {
                self.new_page();
            }
        }

        self.cursor += node.margin.top;
        for child in &node.children {
            self.place(child, inner_x, inner_width)?;
        }
        self.cursor += node.margin.bottom;
        Ok(())
    }

    fn place_absolute(&mut self, node: &AbsoluteNode) -> Result<()> {
        self.ensure_page();
        if self.dry_run {
            return Ok(());
        }
        let saved = (self.cursor, self.fixed);
        self.cursor = node.y;
        self.fixed = true;
        let width = node.width.unwrap_or(self.layout.page_width() - node.x);
        let placed = self.place(&node.node, node.x, width);
        (self.cursor, self.fixed) = saved;
        placed
    }

    fn draw_footers(&mut self) -> Result<()> {
        let page_height = self.layout.page_height();
        let page_width = self.layout.page_width();
        self.fixed = true;
        for index in 0..self.pages.len() {
            let Some(footer) = self.layout.footer(index + 1) else {
                continue;
            };
            self.current = index;
            self.cursor = page_height - self.footer_reserve;
            self.place(&PdfNode::Stack(footer.stack), 0.0, page_width)?;
        }
        self.fixed = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::layout::{FooterSpec, Spacing};
    use doc_model::PageSize;

    fn layout(content: Vec<PdfNode>, skip_first_page: bool) -> PdfLayout {
        PdfLayout {
            page_size: PageSize::A4,
            margins: Spacing::new(40.0, 40.0, 40.0, 80.0),
            content,
            footer: FooterSpec {
                logo: None,
                logo_width: 369.0,
                logo_height: 90.0,
                logo_margin_bottom: 5.0,
                number_size: 10.0,
                number_indent: 40.0,
                margin_top: 5.0,
                skip_first_page,
            },
            title: "T".to_string(),
        }
    }

    fn text(s: &str) -> PdfNode {
        PdfNode::Text(TextNode::new(s, 11.0))
    }

    fn page_texts(page: &PageRenderInfo) -> Vec<&str> {
        page.texts().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_wrap_breaks_at_words() {
        let lines = wrap("aaa bbb ccc", PdfFont::Helvetica, 10.0, 40.0);
        assert_eq!(lines, vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn test_wrap_keeps_empty_paragraphs() {
        let lines = wrap("a\n\nb", PdfFont::Helvetica, 10.0, 100.0);
        assert_eq!(lines, vec!["a", "", "b"]);
        assert_eq!(wrap("", PdfFont::Helvetica, 10.0, 100.0), vec![""]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap("mmmmmmmmmm", PdfFont::Helvetica, 10.0, 30.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "mmmmmmmmmm");
        for line in &lines {
            assert!(PdfFont::Helvetica.text_width(line, 10.0) <= 30.0);
        }
    }

    #[test]
    fn test_page_break_is_lazy() {
        let mut images = ImageRegistry::new();
        let pages = paginate(&layout(vec![text("a"), PdfNode::PageBreak], false), &mut images).unwrap();
        assert_eq!(pages.len(), 1);

        let pages = paginate(
            &layout(vec![text("a"), PdfNode::PageBreak, text("b")], false),
            &mut images,
        )
        .unwrap();
        assert_eq!(pages.len(), 2);
        assert!(page_texts(&pages[1]).contains(&"b"));
    }

    #[test]
    fn test_overflow_starts_new_page() {
        let mut images = ImageRegistry::new();
        let content = (0..80).map(|i| text(&format!("linha {}", i))).collect();
        let pages = paginate(&layout(content, false), &mut images).unwrap();
        assert!(pages.len() >= 2);
        for page in &pages {
            for t in page.texts() {
                assert!(t.baseline < page.height);
            }
        }
    }

    #[test]
    fn test_footer_skips_first_page() {
        let mut images = ImageRegistry::new();
        let content = vec![text("capa"), PdfNode::PageBreak, text("corpo")];
        let pages = paginate(&layout(content, true), &mut images).unwrap();

        assert_eq!(pages.len(), 2);
        assert!(!page_texts(&pages[0]).contains(&"1"));
        assert!(page_texts(&pages[1]).contains(&"2"));
    }

    #[test]
    fn test_table_repeats_header() {
        let mut images = ImageRegistry::new();
        let rows = (0..60).map(|i| vec![i.to_string(), "x".to_string()]).collect();
        let table = PdfNode::Table(TableNode {
            headers: vec!["A".to_string(), "B".to_string()],
            rows,
            size: 11.0,
            header_fill: Rgb(0xfc, 0xc6, 0x03),
            margin: Spacing::ZERO,
        });
        let pages = paginate(&layout(vec![table], false), &mut images).unwrap();

        assert!(pages.len() >= 2);
        for page in &pages {
            assert!(page_texts(page).contains(&"A"));
        }
    }

    #[test]
    fn test_unbreakable_stack_moves_to_next_page() {
        let mut images = ImageRegistry::new();
        let mut content: Vec<PdfNode> = (0..55).map(|i| text(&format!("l{}", i))).collect();
        content.push(PdfNode::Stack(StackNode {
            children: (0..5).map(|i| text(&format!("s{}", i))).collect(),
            unbreakable: true,
            margin: Spacing::ZERO,
        }));
        let pages = paginate(&layout(content, false), &mut images).unwrap();

        let holder: Vec<usize> = pages
            .iter()
            .enumerate()
            .filter(|(_, p)| page_texts(p).iter().any(|t| t.starts_with('s')))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(holder.len(), 1, "stack split across pages");
    }

    #[test]
    fn test_absolute_nodes_do_not_move_cursor() {
        let mut images = ImageRegistry::new();
        let overlay = PdfNode::Absolute(AbsoluteNode {
            x: 0.0,
            y: 700.0,
            width: Some(595.28),
            node: Box::new(PdfNode::Text(TextNode::new("Título", 24.0).align(Align::Center))),
        });
        let pages = paginate(&layout(vec![overlay, text("corpo")], false), &mut images).unwrap();

        let texts: Vec<_> = pages[0].texts().collect();
        let title = texts.iter().find(|t| t.text == "Título").unwrap();
        let body = texts.iter().find(|t| t.text == "corpo").unwrap();
        assert!(title.baseline > 700.0);
        assert!(body.baseline < 60.0);
        assert!(title.x > 200.0);
    }
}
