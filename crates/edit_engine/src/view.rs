//! Block view dispatch
//!
//! Maps each block to the editor that paints it. The UI layer matches on
//! [`BlockView`]; unknown content gets a visible placeholder instead of
//! disappearing.

use doc_model::{
    Block, BlockContent, BlockId, CoverData, CoverDetailedData, ImageBlockData, ListData,
    SectionData, SectionImageData, SectionListData, SectionTableData, SectionTextData, TableData,
    TextData,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockView<'a> {
    Cover(&'a CoverData),
    CoverDetailed(&'a CoverDetailedData),
    Section(&'a SectionData),
    Image {
        data: &'a ImageBlockData,
        figure: Option<u32>,
    },
    Table(&'a TableData),
    List(&'a ListData),
    Text(&'a TextData),
    SectionTable(&'a SectionTableData),
    SectionList(&'a SectionListData),
    SectionText(&'a SectionTextData),
    SectionImage {
        data: &'a SectionImageData,
        figure: Option<u32>,
    },
    UnknownPlaceholder {
        id: &'a BlockId,
        kind: &'a str,
    },
}

/// Pick the view for `block`; `figure` is its figure number, if any
pub fn render_view(block: &Block, figure: Option<u32>) -> BlockView<'_> {
    match block.content() {
        BlockContent::Cover(d) => BlockView::Cover(d),
        BlockContent::CoverDetailed(d) => BlockView::CoverDetailed(d),
        BlockContent::Section(d) => BlockView::Section(d),
        BlockContent::Image(d) => BlockView::Image { data: d, figure },
        BlockContent::Table(d) => BlockView::Table(d),
        BlockContent::List(d) => BlockView::List(d),
        BlockContent::Text(d) => BlockView::Text(d),
        BlockContent::SectionTable(d) => BlockView::SectionTable(d),
        BlockContent::SectionList(d) => BlockView::SectionList(d),
        BlockContent::SectionText(d) => BlockView::SectionText(d),
        BlockContent::SectionImage(d) => BlockView::SectionImage { data: d, figure },
        BlockContent::Unknown { kind, .. } => BlockView::UnknownPlaceholder {
            id: block.id(),
            kind,
        },
    }
}

/// Views for the whole canvas, with on-canvas figure numbers
pub fn render_canvas(document: &doc_model::Document) -> Vec<BlockView<'_>> {
    let figures = doc_model::figure_numbers(
        &document.blocks,
        doc_model::FigureScope::ImagesAndSectionImages,
    );
    document
        .blocks
        .iter()
        .zip(figures)
        .map(|(block, figure)| render_view(block, figure))
        .collect()
}
