//! Figure numbering
//!
//! Figure numbers are derived from the block sequence on every call rather
//! than stored, so they can never drift out of step with the document.

use crate::{Block, BlockContent};

/// Which block kinds take part in figure numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FigureScope {
    /// Plain image blocks and section images share one counter
    #[default]
    ImagesAndSectionImages,
    /// Only plain image blocks are numbered
    ImagesOnly,
}

impl FigureScope {
    /// Whether `content` is numbered under this scope (ignoring its payload)
    pub fn includes(&self, content: &BlockContent) -> bool {
        match (self, content) {
            (_, BlockContent::Image(_)) => true,
            (FigureScope::ImagesAndSectionImages, BlockContent::SectionImage(_)) => true,
            _ => false,
        }
    }
}

/// One entry per block: the figure number of in-scope blocks with an image
pub fn figure_numbers(blocks: &[Block], scope: FigureScope) -> Vec<Option<u32>> {
    let mut counter = 0u32;
    blocks
        .iter()
        .map(|block| {
            let content = block.content();
            if scope.includes(content) && content.image().is_some() {
                counter += 1;
                Some(counter)
            } else {
                None
            }
        })
        .collect()
}

/// Caption text for figure `number`
pub fn figure_caption(number: u32, description: &str) -> String {
    format!("Figura {}: {}", number, description)
}
