//! The document: an ordered block sequence plus document-level metadata
//!
//! Every operation takes `&self` and returns the next document state, which
//! keeps change propagation trivial for whoever owns the current value. An id
//! that does not resolve to a block is a silent no-op: the document comes back
//! unchanged, `updated_at` included.

use crate::image::optional_image;
use crate::{
    Block, BlockContent, BlockId, BlockKind, DocModelError, DocumentId, ImageData, Result, Template,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_DOCUMENT_TITLE: &str = "Novo Documento";

/// Paper size of exported pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Page width in points
    pub fn width(&self) -> f64 {
        match self {
            PageSize::A4 => 595.28,
            PageSize::Letter => 612.0,
        }
    }

    /// Page height in points
    pub fn height(&self) -> f64 {
        match self {
            PageSize::A4 => 841.89,
            PageSize::Letter => 792.0,
        }
    }
}

impl std::str::FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            other => Err(format!("unknown page size: {}", other)),
        }
    }
}

/// Document-level settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSettings {
    /// Footer logo; overrides the process-wide default logo
    #[serde(with = "optional_image", default)]
    pub company_logo: Option<ImageData>,
    #[serde(default)]
    pub page_size: PageSize,
}

/// Partial update of [`DocumentSettings`]; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    /// `Some(None)` clears the logo
    pub company_logo: Option<Option<ImageData>>,
    pub page_size: Option<PageSize>,
}

impl SettingsPatch {
    pub fn company_logo(logo: Option<ImageData>) -> Self {
        Self {
            company_logo: Some(logo),
            ..Default::default()
        }
    }

    pub fn page_size(page_size: PageSize) -> Self {
        Self {
            page_size: Some(page_size),
            ..Default::default()
        }
    }
}

impl DocumentSettings {
    /// Shallow merge of a patch
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            company_logo: patch
                .company_logo
                .clone()
                .unwrap_or_else(|| self.company_logo.clone()),
            page_size: patch.page_size.unwrap_or(self.page_size),
        }
    }
}

/// Entry of the recent-documents index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub id: DocumentId,
    pub title: String,
    pub updated_at: DateTime<Utc>,
}

/// A composed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub settings: DocumentSettings,
    pub blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document with default title and settings
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: DocumentId::new(),
            title: DEFAULT_DOCUMENT_TITLE.to_string(),
            created_at: now,
            updated_at: now,
            settings: DocumentSettings::default(),
            blocks: Vec::new(),
        }
    }

    /// A new document populated from a template, with fresh block ids
    pub fn from_template(template: &Template) -> Self {
        Self {
            title: format!("Novo - {}", template.name),
            blocks: template.instantiate_blocks(),
            ..Self::new()
        }
    }

    fn touched(mut self) -> Self {
        self.updated_at = Utc::now();
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Index of the block with `id`
    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    /// Whether the first block is a cover page
    pub fn has_cover(&self) -> bool {
        self.blocks.first().is_some_and(|b| b.content().is_cover())
    }

    pub fn meta(&self) -> DocumentMeta {
        DocumentMeta {
            id: self.id.clone(),
            title: self.title.clone(),
            updated_at: self.updated_at,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert a default block of `kind` at `position`, or append when `None`
    ///
    /// Positions past the end are clamped to an append.
    pub fn add_block(&self, kind: BlockKind, position: Option<usize>) -> Self {
        self.insert_block(kind.create_default(), position)
    }

    /// Insert an existing block; a colliding id is replaced by a fresh one
    pub fn insert_block(&self, block: Block, position: Option<usize>) -> Self {
        let block = if self.position(block.id()).is_some() {
            block.with_fresh_id()
        } else {
            block
        };
        let mut next = self.clone();
        let index = position.unwrap_or(next.blocks.len()).min(next.blocks.len());
        next.blocks.insert(index, block);
        next.touched()
    }

    /// Shallow-merge `partial` into the block's data
    ///
    /// Only the top-level keys supplied are replaced. Fails when the merged
    /// data no longer fits the block's kind, in which case nothing changes.
    pub fn update_block(&self, id: &BlockId, partial: &Map<String, Value>) -> Result<Self> {
        let Some(index) = self.position(id) else {
            return Ok(self.clone());
        };
        let current = self.blocks[index].content();
        let tag = current.type_tag().to_string();

        let mut data = current.to_data_value()?;
        let Value::Object(fields) = &mut data else {
            return Err(DocModelError::invalid_data(tag, "data is not an object"));
        };
        for (key, value) in partial {
            fields.insert(key.clone(), value.clone());
        }
        let mut content = BlockContent::from_parts(&tag, data)?;
        content.normalize()?;
        if &content == current {
            return Ok(self.clone());
        }

        let mut next = self.clone();
        *next.blocks[index].content_mut() = content;
        Ok(next.touched())
    }

    /// Apply a typed in-place edit to the block's data
    ///
    /// The edit must not change the block's kind.
    pub fn edit_block<F>(&self, id: &BlockId, edit: F) -> Result<Self>
    where
        F: FnOnce(&mut BlockContent),
    {
        let Some(index) = self.position(id) else {
            return Ok(self.clone());
        };
        let mut content = self.blocks[index].content().clone();
        edit(&mut content);

        let before = self.blocks[index].content();
        if content.type_tag() != before.type_tag() {
            return Err(DocModelError::KindChanged {
                expected: before.type_tag().to_string(),
                found: content.type_tag().to_string(),
            });
        }
        if &content == before {
            return Ok(self.clone());
        }

        let mut next = self.clone();
        *next.blocks[index].content_mut() = content;
        Ok(next.touched())
    }

    pub fn delete_block(&self, id: &BlockId) -> Self {
        let Some(index) = self.position(id) else {
            return self.clone();
        };
        let mut next = self.clone();
        next.blocks.remove(index);
        next.touched()
    }

    /// Move `active` into the position currently held by `over`
    ///
    /// Blocks between the two positions shift by one. No-op if either id is
    /// missing or both are the same block.
    pub fn move_block(&self, active: &BlockId, over: &BlockId) -> Self {
        let (Some(from), Some(to)) = (self.position(active), self.position(over)) else {
            return self.clone();
        };
        if from == to {
            return self.clone();
        }
        let mut next = self.clone();
        let block = next.blocks.remove(from);
        next.blocks.insert(to, block);
        next.touched()
    }

    pub fn update_title(&self, title: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.title = title.into();
        next.touched()
    }

    pub fn update_settings(&self, patch: &SettingsPatch) -> Self {
        let mut next = self.clone();
        next.settings = self.settings.merged(patch);
        next.touched()
    }

    /// A brand-new empty document
    pub fn reset(&self) -> Self {
        Self::new()
    }
}
