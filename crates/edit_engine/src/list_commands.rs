//! List editing commands

use doc_model::ListData;
use serde::{Deserialize, Serialize};

/// One edit of a list, or of the list inside a section-list block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ListEdit {
    AddItem,
    RemoveItem { index: usize },
    UpdateItem { index: usize, text: String },
    ToggleStyle,
}

impl ListEdit {
    pub fn apply(&self, list: &mut ListData) {
        match self {
            ListEdit::AddItem => list.add_item(),
            ListEdit::RemoveItem { index } => list.remove_item(*index),
            ListEdit::UpdateItem { index, text } => list.update_item(*index, text.clone()),
            ListEdit::ToggleStyle => list.toggle_style(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            ListEdit::AddItem => "Add Item",
            ListEdit::RemoveItem { .. } => "Remove Item",
            ListEdit::UpdateItem { .. } => "Edit Item",
            ListEdit::ToggleStyle => "Toggle List Style",
        }
    }
}
