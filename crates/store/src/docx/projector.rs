//! Document to flow layout projection
//!
//! Async because pictures are sized from their pixel dimensions, which are
//! probed from the image headers on the blocking pool. Blocks are projected
//! one after the other in document order.

use super::error::{DocxError, DocxResult};
use super::layout::{
    pixels_to_emu, Alignment, BodyElement, DocxLayout, MediaItem, NumberingPlan, NumberingRef,
    PageMargins, Paragraph, Run, RunContent, SectionProperties, Spacing, Table,
};
use crate::image_store;
use crate::ProjectionContext;
use doc_model::{
    figure_caption, figure_numbers, BlockContent, Document, FigureScope, HeadingLevel, ImageData,
    ListData, ListStyle, SectionData, TableData,
};
use std::collections::HashMap;

const BODY_SIZE: u32 = 22;
const HEADING_SIZE: u32 = 32;
const COVER_TITLE_SIZE: u32 = 56;
const COVER_DETAILS_SIZE: u32 = 28;
const FOOTER_NUMBER_SIZE: u32 = 20;
const COVER_IMAGE_WIDTH_EMU: i64 = 5_500_000;
const FIGURE_WIDTH_PX: u32 = 491;
const FOOTER_LOGO_PX: (u32, u32) = (450, 200);
pub const TABLE_HEADER_FILL: &str = "f3f4f6";

/// Knobs of the DOCX projection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocxProjectionOptions {
    /// Which blocks get a "Figura n" caption
    pub figure_scope: FigureScope,
}

impl Default for DocxProjectionOptions {
    fn default() -> Self {
        Self {
            figure_scope: FigureScope::ImagesOnly,
        }
    }
}

/// Map a document onto the flow layout with default options
pub async fn project(document: &Document, ctx: &ProjectionContext) -> DocxResult<DocxLayout> {
    project_with(document, ctx, DocxProjectionOptions::default()).await
}

pub async fn project_with(
    document: &Document,
    ctx: &ProjectionContext,
    options: DocxProjectionOptions,
) -> DocxResult<DocxLayout> {
    let mut projector = Projector::default();
    let figures = figure_numbers(&document.blocks, options.figure_scope);

    for (block, figure) in document.blocks.iter().zip(figures) {
        projector.block(block.content(), figure).await.map_err(|e| {
            tracing::warn!(block_id = %block.id(), error = %e, "DOCX projection failed");
            e
        })?;
        if let BlockContent::Unknown { kind, .. } = block.content() {
            tracing::warn!(block_id = %block.id(), kind = %kind, "Skipping unknown block in DOCX export");
        }
    }

    let footer = projector.footer(ctx.footer_logo(document)).await?;
    Ok(DocxLayout {
        title: document.title.clone(),
        body: projector.body,
        footer,
        numbering: projector.numbering,
        section: SectionProperties {
            page_size: document.settings.page_size,
            margins: PageMargins::standard(),
            title_page: document.has_cover(),
        },
        media: projector.media,
    })
}

pub fn heading_style(level: HeadingLevel) -> String {
    format!("Heading{}", level.number())
}

#[derive(Default)]
struct Projector {
    body: Vec<BodyElement>,
    numbering: NumberingPlan,
    media: Vec<MediaItem>,
    /// Media index and pixel size per distinct image
    by_source: HashMap<ImageData, (usize, u32, u32)>,
}

impl Projector {
    fn push(&mut self, paragraph: Paragraph) {
        self.body.push(BodyElement::Paragraph(paragraph));
    }

    async fn block(&mut self, content: &BlockContent, figure: Option<u32>) -> DocxResult<()> {
        match content {
            BlockContent::Cover(data) => {
                self.cover(data.image.as_ref(), &data.title).await?;
                self.push(Paragraph::page_break());
            }
            BlockContent::CoverDetailed(data) => {
                self.cover(data.image.as_ref(), &data.title).await?;
                let details = [
                    ("Máquina: ", &data.machine_name),
                    ("Responsável: ", &data.responsible_name),
                    ("Data: ", &data.date),
                ];
                for (label, value) in details {
                    if !value.is_empty() {
                        self.push(
                            Paragraph::new(vec![
                                Run::text(format!("{}{}", label, value)).size(COVER_DETAILS_SIZE)
                            ])
                            .spacing(Spacing::new(Some(200), None)),
                        );
                    }
                }
                self.push(Paragraph::page_break());
            }
            BlockContent::Section(data) => self.heading(data),
            BlockContent::Image(data) => {
                if let Some(image) = &data.image {
                    self.figure(image, figure, &data.description).await?;
                }
            }
            BlockContent::Table(data) => self.table(data),
            BlockContent::List(data) => self.list(data),
            BlockContent::Text(data) => self.text(&data.content),
            BlockContent::SectionTable(data) => {
                self.heading(&data.heading);
                self.table(&data.table);
            }
            BlockContent::SectionList(data) => {
                self.heading(&data.heading);
                self.list(&data.list);
            }
            BlockContent::SectionText(data) => {
                self.heading(&data.heading);
                self.text(&data.text.content);
            }
            BlockContent::SectionImage(data) => {
                self.heading(&data.heading);
                if let Some(image) = &data.image {
                    self.figure(image, figure, &data.description).await?;
                }
            }
            BlockContent::Unknown { .. } => {}
        }
        Ok(())
    }

    /// Register an image once and return its media index and pixel size
    async fn media(&mut self, image: &ImageData) -> DocxResult<(usize, u32, u32)> {
        if let Some(entry) = self.by_source.get(image) {
            return Ok(*entry);
        }
        let data = image_store::decode(image)?;
        let format = image_store::format_of(image, &data);
        if !format.is_supported() {
            return Err(DocxError::UnsupportedImage(
                image.mime_type().unwrap_or("unknown").to_string(),
            ));
        }
        let (width, height) = image_store::probe_dimensions(image).await?;
        if width == 0 || height == 0 {
            return Err(DocxError::UnsupportedImage("empty image".to_string()));
        }

        self.media.push(MediaItem { data, format });
        let entry = (self.media.len() - 1, width, height);
        self.by_source.insert(image.clone(), entry);
        Ok(entry)
    }

    async fn cover(&mut self, image: Option<&ImageData>, title: &str) -> DocxResult<()> {
        if let Some(image) = image {
            let (media, width, height) = self.media(image).await?;
            let height_emu =
                (COVER_IMAGE_WIDTH_EMU as f64 * height as f64 / width as f64).round() as i64;
            self.push(
                Paragraph::new(vec![Run::new(RunContent::Image {
                    media,
                    width_emu: COVER_IMAGE_WIDTH_EMU,
                    height_emu,
                })])
                .align(Alignment::Center)
                .spacing(Spacing::new(Some(1000), Some(600))),
            );
        }
        self.push(
            Paragraph::new(vec![Run::text(title).bold().size(COVER_TITLE_SIZE)])
                .align(Alignment::Center)
                .spacing(Spacing::new(Some(400), None)),
        );
        Ok(())
    }

    fn heading(&mut self, data: &SectionData) {
        self.push(
            Paragraph::new(vec![Run::text(data.title.clone()).bold().size(HEADING_SIZE)])
                .style(heading_style(data.level))
                .spacing(Spacing::new(Some(300), Some(200))),
        );
    }

    async fn figure(
        &mut self,
        image: &ImageData,
        figure: Option<u32>,
        description: &str,
    ) -> DocxResult<()> {
        let (media, width, height) = self.media(image).await?;
        let height_px = (FIGURE_WIDTH_PX as f64 * height as f64 / width as f64).round() as u32;
        self.push(
            Paragraph::new(vec![Run::new(RunContent::Image {
                media,
                width_emu: pixels_to_emu(FIGURE_WIDTH_PX),
                height_emu: pixels_to_emu(height_px),
            })])
            .align(Alignment::Center)
            .spacing(Spacing::new(Some(200), Some(100))),
        );

        // Out-of-scope figures keep their description without a number
        let caption = match figure {
            Some(n) => figure_caption(n, description),
            None if description.is_empty() => return Ok(()),
            None => description.to_string(),
        };
        self.push(
            Paragraph::new(vec![Run::text(caption).italic().size(BODY_SIZE)])
                .align(Alignment::Center)
                .spacing(Spacing::new(None, Some(300))),
        );
        Ok(())
    }

    fn table(&mut self, data: &TableData) {
        self.body.push(BodyElement::Table(Table {
            headers: data.headers.clone(),
            rows: data.normalized_rows(),
            header_fill: TABLE_HEADER_FILL.to_string(),
            size: BODY_SIZE,
        }));
    }

    fn list(&mut self, data: &ListData) {
        let num_id = match data.style {
            ListStyle::Bullet => NumberingPlan::BULLET_NUM_ID,
            ListStyle::Numbered => self.numbering.next_numbered(),
        };
        for item in &data.items {
            self.push(
                Paragraph::new(vec![Run::text(item.clone()).size(BODY_SIZE)])
                    .style("ListParagraph")
                    .numbering(NumberingRef { num_id, level: 0 }),
            );
        }
    }

    fn text(&mut self, content: &str) {
        self.push(Paragraph::new(Run::lines(content, BODY_SIZE)).spacing(Spacing {
            before: Some(100),
            after: Some(100),
            line: Some(360),
        }));
    }

    async fn footer(&mut self, logo: Option<&ImageData>) -> DocxResult<Vec<Paragraph>> {
        let mut footer = Vec::with_capacity(2);
        if let Some(logo) = logo {
            let (media, _, _) = self.media(logo).await?;
            footer.push(
                Paragraph::new(vec![Run::new(RunContent::Image {
                    media,
                    width_emu: pixels_to_emu(FOOTER_LOGO_PX.0),
                    height_emu: pixels_to_emu(FOOTER_LOGO_PX.1),
                })])
                .align(Alignment::Center),
            );
        }
        footer.push(
            Paragraph::new(vec![Run::new(RunContent::PageNumber).size(FOOTER_NUMBER_SIZE)])
                .align(Alignment::Left),
        );
        Ok(footer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_store::{load_built_in, BuiltInImage};
    use doc_model::{Block, CoverData, ImageBlockData, SectionImageData, TextData};

    fn doc(contents: Vec<BlockContent>) -> Document {
        contents.into_iter().fold(Document::new(), |doc, content| {
            doc.insert_block(Block::new(content), None)
        })
    }

    fn image_block(image: Option<ImageData>, description: &str) -> BlockContent {
        BlockContent::Image(ImageBlockData {
            image,
            description: description.to_string(),
        })
    }

    fn section_image(image: Option<ImageData>, description: &str) -> BlockContent {
        BlockContent::SectionImage(SectionImageData {
            heading: SectionData {
                title: "Seção".to_string(),
                level: HeadingLevel::H2,
            },
            image,
            description: description.to_string(),
        })
    }

    fn texts(layout: &DocxLayout) -> Vec<String> {
        layout.paragraphs().map(Paragraph::text).collect()
    }

    #[tokio::test]
    async fn test_cover_sizes_image_by_aspect() {
        let cover = load_built_in(BuiltInImage::Cover).unwrap();
        let layout = project(
            &doc(vec![BlockContent::Cover(CoverData {
                title: "T".to_string(),
                image: Some(cover),
            })]),
            &ProjectionContext::new(),
        )
        .await
        .unwrap();

        let BodyElement::Paragraph(picture) = &layout.body[0] else {
            panic!("expected picture paragraph");
        };
        // 1200 x 800 source
        assert_eq!(
            picture.runs[0].content,
            RunContent::Image {
                media: 0,
                width_emu: 5_500_000,
                height_emu: 3_666_667,
            }
        );
        assert!(layout.body[2].is_page_break());
        assert_eq!(layout.page_breaks(), 1);
        assert!(layout.section.title_page);
    }

    #[tokio::test]
    async fn test_figure_scope_defaults_to_images_only() {
        let picture = load_built_in(BuiltInImage::Footer).unwrap();
        let document = doc(vec![
            section_image(Some(picture.clone()), "a"),
            image_block(Some(picture.clone()), "b"),
            image_block(None, "skip"),
            image_block(Some(picture), "c"),
        ]);

        let layout = project(&document, &ProjectionContext::new()).await.unwrap();
        let captions: Vec<String> = texts(&layout)
            .into_iter()
            .filter(|t| !t.is_empty() && t != "Seção")
            .collect();
        assert_eq!(captions, vec!["a", "Figura 1: b", "Figura 2: c"]);
        assert_eq!(layout.media.len(), 1);

        let options = DocxProjectionOptions {
            figure_scope: FigureScope::ImagesAndSectionImages,
        };
        let layout = project_with(&document, &ProjectionContext::new(), options)
            .await
            .unwrap();
        assert!(texts(&layout).contains(&"Figura 3: c".to_string()));
    }

    #[tokio::test]
    async fn test_numbered_lists_get_their_own_instance() {
        let numbered = || {
            BlockContent::List(ListData {
                style: ListStyle::Numbered,
                items: vec!["x".to_string(), "y".to_string()],
            })
        };
        let layout = project(
            &doc(vec![numbered(), BlockContent::List(ListData::placeholder()), numbered()]),
            &ProjectionContext::new(),
        )
        .await
        .unwrap();

        let ids: Vec<u32> = layout
            .paragraphs()
            .filter_map(|p| p.numbering.map(|n| n.num_id))
            .collect();
        assert_eq!(ids, vec![2, 2, 1, 1, 1, 3, 3]);
        assert_eq!(layout.numbering.numbered_lists, 2);
    }

    #[tokio::test]
    async fn test_footer_has_logo_then_page_number() {
        let logo = load_built_in(BuiltInImage::Footer).unwrap();
        let ctx = ProjectionContext::new().with_default_logo(Some(logo));
        let layout = project(&Document::new(), &ctx).await.unwrap();

        assert_eq!(layout.footer.len(), 2);
        assert!(matches!(
            layout.footer[0].runs[0].content,
            RunContent::Image { width_emu: 4_286_250, height_emu: 1_905_000, .. }
        ));
        assert_eq!(layout.footer[1].runs[0].content, RunContent::PageNumber);
        assert!(!layout.section.title_page);
    }

    #[tokio::test]
    async fn test_text_and_unknown_blocks() {
        let layout = project(
            &doc(vec![
                BlockContent::Unknown {
                    kind: "chart".to_string(),
                    data: serde_json::Value::Null,
                },
                BlockContent::Text(TextData {
                    content: "um\ndois".to_string(),
                }),
            ]),
            &ProjectionContext::new(),
        )
        .await
        .unwrap();

        assert_eq!(layout.body.len(), 1);
        assert_eq!(texts(&layout), vec!["um\ndois"]);
    }

    #[tokio::test]
    async fn test_bad_image_payload_fails() {
        let broken = ImageData::from_base64("image/png", "AAAA");
        let result = project(&doc(vec![image_block(Some(broken), "x")]), &ProjectionContext::new()).await;
        assert!(result.is_err());
    }
}
