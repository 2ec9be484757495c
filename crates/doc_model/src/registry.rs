//! Default construction of blocks
//!
//! Every kind has placeholder content so a freshly dropped block is
//! immediately renderable and editable.

use crate::{
    Block, BlockContent, BlockKind, CoverData, CoverDetailedData, HeadingLevel, ImageBlockData,
    ListData, SectionData, SectionImageData, SectionListData, SectionTableData, SectionTextData,
    TableData, TextData,
};

pub const DEFAULT_COVER_TITLE: &str = "Título do Documento";
pub const DEFAULT_SECTION_TITLE: &str = "Nova Seção";
pub const DEFAULT_IMAGE_DESCRIPTION: &str = "Descrição da imagem";
pub const DEFAULT_TEXT_CONTENT: &str = "Digite o texto aqui...";

fn default_heading() -> SectionData {
    SectionData {
        title: DEFAULT_SECTION_TITLE.to_string(),
        level: HeadingLevel::H1,
    }
}

fn default_text() -> TextData {
    TextData {
        content: DEFAULT_TEXT_CONTENT.to_string(),
    }
}

impl BlockKind {
    /// Placeholder content for this kind
    pub fn default_content(self) -> BlockContent {
        match self {
            BlockKind::Cover => BlockContent::Cover(CoverData {
                title: DEFAULT_COVER_TITLE.to_string(),
                image: None,
            }),
            BlockKind::CoverDetailed => BlockContent::CoverDetailed(CoverDetailedData {
                title: DEFAULT_COVER_TITLE.to_string(),
                image: None,
                machine_name: String::new(),
                responsible_name: String::new(),
                date: String::new(),
            }),
            BlockKind::Section => BlockContent::Section(default_heading()),
            BlockKind::Image => BlockContent::Image(ImageBlockData {
                image: None,
                description: DEFAULT_IMAGE_DESCRIPTION.to_string(),
            }),
            BlockKind::Table => BlockContent::Table(TableData::placeholder()),
            BlockKind::List => BlockContent::List(ListData::placeholder()),
            BlockKind::Text => BlockContent::Text(default_text()),
            BlockKind::SectionTable => BlockContent::SectionTable(SectionTableData {
                heading: default_heading(),
                table: TableData::placeholder(),
            }),
            BlockKind::SectionList => BlockContent::SectionList(SectionListData {
                heading: default_heading(),
                list: ListData::placeholder(),
            }),
            BlockKind::SectionText => BlockContent::SectionText(SectionTextData {
                heading: default_heading(),
                text: default_text(),
            }),
            BlockKind::SectionImage => BlockContent::SectionImage(SectionImageData {
                heading: default_heading(),
                image: None,
                description: DEFAULT_IMAGE_DESCRIPTION.to_string(),
            }),
        }
    }

    /// A new block of this kind with a fresh id and placeholder content
    pub fn create_default(self) -> Block {
        Block::new(self.default_content())
    }
}

/// A new block of `kind` with a fresh id and placeholder content
pub fn create_default(kind: BlockKind) -> Block {
    kind.create_default()
}
