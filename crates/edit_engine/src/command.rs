//! Edit commands
//!
//! Every change the editor makes to a document goes through an
//! [`EditCommand`]. Applying a command is pure: it maps the current document
//! to the next one.

use crate::{ListEdit, Result, TableEdit};
use doc_model::{BlockId, BlockKind, Document, ImageData, SettingsPatch};
use serde_json::{Map, Value};

/// Where an ingested image lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageTarget {
    /// The image slot of an image-bearing block
    Block(BlockId),
    /// The document's footer logo
    CompanyLogo,
}

/// A single editing operation on the current document
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    AddBlock {
        kind: BlockKind,
        position: Option<usize>,
    },
    UpdateBlock {
        id: BlockId,
        patch: Map<String, Value>,
    },
    DeleteBlock {
        id: BlockId,
    },
    MoveBlock {
        active: BlockId,
        over: BlockId,
    },
    EditTable {
        id: BlockId,
        edit: TableEdit,
    },
    EditList {
        id: BlockId,
        edit: ListEdit,
    },
    SetImage {
        target: ImageTarget,
        image: Option<ImageData>,
    },
    UpdateTitle(String),
    UpdateSettings(SettingsPatch),
    Reset,
}

impl EditCommand {
    /// Map `document` to its next state
    pub fn apply(&self, document: &Document) -> Result<Document> {
        let next = match self {
            EditCommand::AddBlock { kind, position } => document.add_block(*kind, *position),
            EditCommand::UpdateBlock { id, patch } => document.update_block(id, patch)?,
            EditCommand::DeleteBlock { id } => document.delete_block(id),
            EditCommand::MoveBlock { active, over } => document.move_block(active, over),
            EditCommand::EditTable { id, edit } => document.edit_block(id, |content| {
                if let Some(table) = content.table_mut() {
                    edit.apply(table);
                }
            })?,
            EditCommand::EditList { id, edit } => document.edit_block(id, |content| {
                if let Some(list) = content.list_mut() {
                    edit.apply(list);
                }
            })?,
            EditCommand::SetImage { target, image } => match target {
                ImageTarget::Block(id) => document.edit_block(id, |content| {
                    if let Some(slot) = content.image_slot_mut() {
                        *slot = image.clone();
                    }
                })?,
                ImageTarget::CompanyLogo => {
                    document.update_settings(&SettingsPatch::company_logo(image.clone()))
                }
            },
            EditCommand::UpdateTitle(title) => document.update_title(title.clone()),
            EditCommand::UpdateSettings(patch) => document.update_settings(patch),
            EditCommand::Reset => document.reset(),
        };
        Ok(next)
    }

    /// Get a display name for this command
    pub fn display_name(&self) -> &str {
        match self {
            EditCommand::AddBlock { .. } => "Add Block",
            EditCommand::UpdateBlock { .. } => "Update Block",
            EditCommand::DeleteBlock { .. } => "Delete Block",
            EditCommand::MoveBlock { .. } => "Move Block",
            EditCommand::EditTable { edit, .. } => edit.display_name(),
            EditCommand::EditList { edit, .. } => edit.display_name(),
            EditCommand::SetImage { .. } => "Set Image",
            EditCommand::UpdateTitle(_) => "Rename Document",
            EditCommand::UpdateSettings(_) => "Update Settings",
            EditCommand::Reset => "New Document",
        }
    }
}

/// Build an `UpdateBlock` command from a JSON object literal
pub fn update_block(id: BlockId, patch: Value) -> Result<EditCommand> {
    match patch {
        Value::Object(patch) => Ok(EditCommand::UpdateBlock { id, patch }),
        other => Err(crate::EditError::InvalidCommand(format!(
            "block patch must be an object, got {}",
            other
        ))),
    }
}
