//! Outline (sidebar) entries for the block sequence

use doc_model::{Block, BlockContent, BlockId, Document};
use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

/// Maximum number of grapheme clusters shown for text-derived titles
pub const OUTLINE_SNIPPET_LEN: usize = 30;

/// One line of the outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineEntry {
    pub id: BlockId,
    pub index: usize,
    pub kind_label: String,
    pub title: String,
}

fn snippet(text: &str) -> String {
    text.graphemes(true).take(OUTLINE_SNIPPET_LEN).collect()
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// Label of a block's kind; unknown blocks are called out as such
pub fn kind_label(block: &Block) -> String {
    match block.kind() {
        Some(kind) => kind.label().to_string(),
        None => format!("Bloco desconhecido ({})", block.content().type_tag()),
    }
}

/// Display title of a block
pub fn block_title(block: &Block) -> String {
    let title = match block.content() {
        BlockContent::Text(data) => non_empty(snippet(&data.content)),
        BlockContent::Image(data) => non_empty(snippet(&data.description)),
        other => other.title().map(str::to_string).and_then(non_empty),
    };
    title.unwrap_or_else(|| kind_label(block))
}

/// The outline of a document, in block order
pub fn outline(document: &Document) -> Vec<OutlineEntry> {
    document
        .blocks
        .iter()
        .enumerate()
        .map(|(index, block)| OutlineEntry {
            id: block.id().clone(),
            index,
            kind_label: kind_label(block),
            title: block_title(block),
        })
        .collect()
}
