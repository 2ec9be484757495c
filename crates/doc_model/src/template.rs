//! Reusable block sequences

use crate::{Block, Document, TemplateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named block sequence saved independently of any document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub blocks: Vec<Block>,
    pub created_at: DateTime<Utc>,
}

/// Partial update of a [`Template`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub blocks: Option<Vec<Block>>,
}

impl Template {
    /// Snapshot a document's blocks under a new name
    pub fn from_document(document: &Document, name: impl Into<String>) -> Self {
        Self {
            id: TemplateId::new(),
            name: name.into(),
            description: format!("Template baseado em \"{}\"", document.title),
            blocks: document.blocks.iter().map(Block::with_fresh_id).collect(),
            created_at: Utc::now(),
        }
    }

    /// Deep copies of the blocks with freshly generated ids
    pub fn instantiate_blocks(&self) -> Vec<Block> {
        self.blocks.iter().map(Block::with_fresh_id).collect()
    }

    /// Shallow merge of a patch
    pub fn merged(&self, patch: TemplatePatch) -> Self {
        Self {
            id: self.id.clone(),
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            description: patch.description.unwrap_or_else(|| self.description.clone()),
            blocks: patch.blocks.unwrap_or_else(|| self.blocks.clone()),
            created_at: self.created_at,
        }
    }
}
