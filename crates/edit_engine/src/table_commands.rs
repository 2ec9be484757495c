//! Table editing commands

use doc_model::TableData;
use serde::{Deserialize, Serialize};

/// One edit of a table, or of the table inside a section-table block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum TableEdit {
    AddColumn,
    RemoveColumn,
    AddRow,
    RemoveRow,
    UpdateHeader { column: usize, text: String },
    UpdateCell { row: usize, column: usize, text: String },
}

impl TableEdit {
    pub fn apply(&self, table: &mut TableData) {
        match self {
            TableEdit::AddColumn => table.add_column(),
            TableEdit::RemoveColumn => table.remove_column(),
            TableEdit::AddRow => table.add_row(),
            TableEdit::RemoveRow => table.remove_row(),
            TableEdit::UpdateHeader { column, text } => table.update_header(*column, text.clone()),
            TableEdit::UpdateCell { row, column, text } => {
                table.update_cell(*row, *column, text.clone())
            }
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            TableEdit::AddColumn => "Add Column",
            TableEdit::RemoveColumn => "Remove Column",
            TableEdit::AddRow => "Add Row",
            TableEdit::RemoveRow => "Remove Row",
            TableEdit::UpdateHeader { .. } => "Edit Header",
            TableEdit::UpdateCell { .. } => "Edit Cell",
        }
    }
}
