//! Document to fixed-page layout projection
//!
//! Pure mapping from blocks to [`PdfNode`]s. Nothing here touches image
//! bytes or fonts; the paginator resolves those.

use super::layout::{
    AbsoluteNode, Align, FooterSpec, ImageNode, ImageSize, ListNode, PdfLayout, PdfNode, Rgb,
    Spacing, StackNode, TableNode, TextNode,
};
use crate::ProjectionContext;
use doc_model::{
    figure_caption, figure_numbers, BlockContent, CoverData, CoverDetailedData, Document,
    FigureScope, HeadingLevel, ImageData, ListData, SectionData, TableData,
};

pub const PAGE_MARGINS: Spacing = Spacing::new(40.0, 40.0, 40.0, 80.0);
pub const TABLE_HEADER_FILL: Rgb = Rgb(0xfc, 0xc6, 0x03);

const BODY_SIZE: f64 = 11.0;
const BODY_LINE_HEIGHT: f64 = 1.4;
const COVER_TITLE_SIZE: f64 = 24.0;
const COVER_TITLE_OFFSET: f64 = 120.0;
const DETAILED_TITLE_OFFSET: f64 = 180.0;
const DETAILS_OFFSET: f64 = 140.0;
const DETAILS_X: f64 = 60.0;
const DETAILS_SIZE: f64 = 14.0;
const DETAILS_STEP: f64 = 20.0;
const IMAGE_FIT_WIDTH: f64 = 368.5;
const IMAGE_FIT_HEIGHT: f64 = 600.0;

const HEADING_MARGIN: Spacing = Spacing::vertical(15.0, 10.0);
const CAPTION_MARGIN: Spacing = Spacing::vertical(5.0, 15.0);

/// Map a document onto the fixed-page layout tree
pub fn project(document: &Document, ctx: &ProjectionContext) -> PdfLayout {
    let page_size = document.settings.page_size;
    let (page_width, page_height) = (page_size.width(), page_size.height());
    let figures = figure_numbers(&document.blocks, FigureScope::ImagesAndSectionImages);

    let mut content = Vec::new();
    for (block, figure) in document.blocks.iter().zip(figures) {
        match block.content() {
            BlockContent::Cover(data) => cover(&mut content, data, page_width, page_height),
            BlockContent::CoverDetailed(data) => {
                cover_detailed(&mut content, data, page_width, page_height)
            }
            BlockContent::Section(data) => content.push(heading(data)),
            BlockContent::Image(data) => {
                if let (Some(image), Some(n)) = (&data.image, figure) {
                    content.push(figure_image(image, Spacing::vertical(10.0, 0.0)));
                    content.push(caption(n, &data.description));
                }
            }
            BlockContent::Table(data) => {
                content.push(table(data, Spacing::vertical(10.0, 15.0)));
            }
            BlockContent::List(data) => content.push(list(data, Spacing::vertical(5.0, 10.0))),
            BlockContent::Text(data) => {
                content.push(body_text(&data.content, Spacing::vertical(5.0, 5.0)));
            }
            BlockContent::SectionTable(data) => {
                content.push(heading(&data.heading));
                content.push(table(&data.table, Spacing::vertical(0.0, 15.0)));
            }
            BlockContent::SectionList(data) => {
                content.push(heading(&data.heading));
                content.push(list(&data.list, Spacing::vertical(0.0, 10.0)));
            }
            BlockContent::SectionText(data) => {
                content.push(heading(&data.heading));
                content.push(body_text(&data.text.content, Spacing::vertical(0.0, 10.0)));
            }
            BlockContent::SectionImage(data) => match (&data.image, figure) {
                (Some(image), Some(n)) => content.push(PdfNode::Stack(StackNode {
                    children: vec![
                        heading(&data.heading),
                        figure_image(image, Spacing::ZERO),
                        caption(n, &data.description),
                    ],
                    unbreakable: true,
                    margin: Spacing::ZERO,
                })),
                _ => content.push(heading(&data.heading)),
            },
            BlockContent::Unknown { kind, .. } => {
                tracing::warn!(block_id = %block.id(), kind = %kind, "Skipping unknown block in PDF export");
            }
        }
    }

    PdfLayout {
        page_size,
        margins: PAGE_MARGINS,
        content,
        footer: FooterSpec {
            logo: ctx.footer_logo(document).cloned(),
            logo_width: 369.0,
            logo_height: 90.0,
            logo_margin_bottom: 5.0,
            number_size: 10.0,
            number_indent: PAGE_MARGINS.left,
            margin_top: 5.0,
            skip_first_page: document.has_cover(),
        },
        title: document.title.clone(),
    }
}

pub fn heading_size(level: HeadingLevel) -> f64 {
    match level {
        HeadingLevel::H1 => 16.0,
        HeadingLevel::H2 => 14.0,
        HeadingLevel::H3 => 12.0,
    }
}

fn heading(data: &SectionData) -> PdfNode {
    PdfNode::Text(
        TextNode::new(data.title.clone(), heading_size(data.level))
            .bold()
            .margin(HEADING_MARGIN),
    )
}

fn body_text(content: &str, margin: Spacing) -> PdfNode {
    PdfNode::Text(
        TextNode::new(content, BODY_SIZE)
            .line_height(BODY_LINE_HEIGHT)
            .margin(margin),
    )
}

fn figure_image(image: &ImageData, margin: Spacing) -> PdfNode {
    PdfNode::Image(ImageNode {
        image: image.clone(),
        size: ImageSize::Fit {
            width: IMAGE_FIT_WIDTH,
            height: IMAGE_FIT_HEIGHT,
        },
        align: Align::Center,
        margin,
    })
}

fn caption(number: u32, description: &str) -> PdfNode {
    PdfNode::Text(
        TextNode::new(figure_caption(number, description), BODY_SIZE)
            .italic()
            .align(Align::Center)
            .margin(CAPTION_MARGIN),
    )
}

fn table(data: &TableData, margin: Spacing) -> PdfNode {
    PdfNode::Table(TableNode {
        headers: data.headers.clone(),
        rows: data.normalized_rows(),
        size: BODY_SIZE,
        header_fill: TABLE_HEADER_FILL,
        margin,
    })
}

fn list(data: &ListData, margin: Spacing) -> PdfNode {
    PdfNode::List(ListNode {
        style: data.style,
        items: data.items.clone(),
        size: BODY_SIZE,
        margin,
    })
}

fn absolute(x: f64, y: f64, width: Option<f64>, node: PdfNode) -> PdfNode {
    PdfNode::Absolute(AbsoluteNode {
        x,
        y,
        width,
        node: Box::new(node),
    })
}

fn background(content: &mut Vec<PdfNode>, image: Option<&ImageData>, width: f64, height: f64) {
    if let Some(image) = image {
        content.push(absolute(
            0.0,
            0.0,
            Some(width),
            PdfNode::Image(ImageNode {
                image: image.clone(),
                size: ImageSize::Exact { width, height },
                align: Align::Left,
                margin: Spacing::ZERO,
            }),
        ));
    }
}

fn cover_title(title: &str, y: f64, page_width: f64) -> PdfNode {
    absolute(
        0.0,
        y,
        Some(page_width),
        PdfNode::Text(
            TextNode::new(title, COVER_TITLE_SIZE)
                .bold()
                .align(Align::Center),
        ),
    )
}

fn cover(content: &mut Vec<PdfNode>, data: &CoverData, page_width: f64, page_height: f64) {
    background(content, data.image.as_ref(), page_width, page_height);
    content.push(cover_title(
        &data.title,
        page_height - COVER_TITLE_OFFSET,
        page_width,
    ));
    content.push(PdfNode::PageBreak);
}

fn cover_detailed(
    content: &mut Vec<PdfNode>,
    data: &CoverDetailedData,
    page_width: f64,
    page_height: f64,
) {
    background(content, data.image.as_ref(), page_width, page_height);
    content.push(cover_title(
        &data.title,
        page_height - DETAILED_TITLE_OFFSET,
        page_width,
    ));

    let details_y = page_height - DETAILS_OFFSET;
    let lines = [
        ("Máquina: ", &data.machine_name),
        ("Responsável: ", &data.responsible_name),
        ("Data: ", &data.date),
    ];
    for (i, (label, value)) in lines.into_iter().enumerate() {
        if value.is_empty() {
            continue;
        }
        content.push(absolute(
            DETAILS_X,
            details_y + i as f64 * DETAILS_STEP,
            None,
            PdfNode::Text(TextNode::new(format!("{}{}", label, value), DETAILS_SIZE)),
        ));
    }
    content.push(PdfNode::PageBreak);
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{Block, BlockKind, ImageBlockData, SectionImageData, TextData};
    use serde_json::Value;

    fn png() -> ImageData {
        ImageData::from_base64("image/png", "iVBORw0KGgo=")
    }

    fn texts(nodes: &[PdfNode]) -> Vec<String> {
        let mut out = Vec::new();
        for node in nodes {
            match node {
                PdfNode::Text(t) => out.push(t.text.clone()),
                PdfNode::Stack(s) => out.extend(texts(&s.children)),
                PdfNode::Absolute(a) => out.extend(texts(std::slice::from_ref(&*a.node))),
                _ => {}
            }
        }
        out
    }

    fn doc(contents: Vec<BlockContent>) -> Document {
        contents.into_iter().fold(Document::new(), |doc, content| {
            doc.insert_block(Block::new(content), None)
        })
    }

    #[test]
    fn test_cover_projects_overlays_and_break() {
        let doc = doc(vec![
            BlockContent::Cover(CoverData {
                title: "T".to_string(),
                image: Some(png()),
            }),
            BlockContent::Text(TextData {
                content: "hello".to_string(),
            }),
        ]);
        let layout = project(&doc, &ProjectionContext::new());

        assert!(matches!(&layout.content[0], PdfNode::Absolute(a) if a.x == 0.0 && a.y == 0.0));
        match &layout.content[1] {
            PdfNode::Absolute(a) => {
                assert!((a.y - (layout.page_height() - 120.0)).abs() < 1e-9);
                assert!(matches!(&*a.node, PdfNode::Text(t) if t.bold && t.size == 24.0));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(layout.content[2], PdfNode::PageBreak);
        assert_eq!(layout.page_breaks(), 1);
        assert!(layout.footer.skip_first_page);
    }

    #[test]
    fn test_cover_detailed_skips_empty_fields() {
        let doc = doc(vec![BlockContent::CoverDetailed(CoverDetailedData {
            title: "Relatório".to_string(),
            image: None,
            machine_name: "Prensa".to_string(),
            responsible_name: String::new(),
            date: "2024-01-01".to_string(),
        })]);
        let layout = project(&doc, &ProjectionContext::new());

        assert_eq!(
            texts(&layout.content),
            vec!["Relatório", "Máquina: Prensa", "Data: 2024-01-01"]
        );
        let ys: Vec<f64> = layout
            .content
            .iter()
            .filter_map(|n| match n {
                PdfNode::Absolute(a) => Some(a.y),
                _ => None,
            })
            .collect();
        let h = layout.page_height();
        assert_eq!(ys, vec![h - 180.0, h - 140.0, h - 100.0]);
    }

    #[test]
    fn test_figures_shared_between_image_kinds() {
        let heading = SectionData {
            title: "S".to_string(),
            level: HeadingLevel::H2,
        };
        let doc = doc(vec![
            BlockContent::Image(ImageBlockData {
                image: Some(png()),
                description: "a".to_string(),
            }),
            BlockContent::Image(ImageBlockData {
                image: None,
                description: "skip".to_string(),
            }),
            BlockContent::SectionImage(SectionImageData {
                heading: heading.clone(),
                image: Some(png()),
                description: "b".to_string(),
            }),
            BlockContent::SectionImage(SectionImageData {
                heading,
                image: None,
                description: "c".to_string(),
            }),
        ]);
        let layout = project(&doc, &ProjectionContext::new());

        assert_eq!(
            texts(&layout.content),
            vec!["Figura 1: a", "S", "Figura 2: b", "S"]
        );
        assert!(matches!(&layout.content[2], PdfNode::Stack(s) if s.unbreakable));
        assert!(!layout.footer.skip_first_page);
    }

    #[test]
    fn test_heading_sizes_and_table_shape() {
        let mut doc = Document::new().add_block(BlockKind::SectionTable, None);
        let id = doc.blocks[0].id().clone();
        let mut partial = serde_json::Map::new();
        partial.insert("level".to_string(), Value::from(3));
        doc = doc.update_block(&id, &partial).unwrap();

        let layout = project(&doc, &ProjectionContext::new());
        assert!(matches!(&layout.content[0], PdfNode::Text(t) if t.size == 12.0 && t.bold));
        match &layout.content[1] {
            PdfNode::Table(t) => {
                assert_eq!(t.headers.len(), 3);
                assert_eq!(t.header_fill, TABLE_HEADER_FILL);
                assert_eq!(t.margin, Spacing::vertical(0.0, 15.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_blocks_are_skipped() {
        let doc = doc(vec![
            BlockContent::Unknown {
                kind: "chart".to_string(),
                data: Value::Null,
            },
            BlockContent::Text(TextData {
                content: "x".to_string(),
            }),
        ]);
        let layout = project(&doc, &ProjectionContext::new());
        assert_eq!(layout.content.len(), 1);
    }

    #[test]
    fn test_footer_uses_default_logo() {
        let ctx = ProjectionContext::new().with_default_logo(Some(png()));
        let layout = project(&Document::new(), &ctx);
        assert_eq!(layout.footer.logo, Some(png()));
        assert_eq!(layout.margins, PAGE_MARGINS);
    }
}
