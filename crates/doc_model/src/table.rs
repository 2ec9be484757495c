//! Table data and its editing operations
//!
//! A table always has at least one column and one row, and every row has
//! exactly as many cells as there are headers.

use serde::{Deserialize, Serialize};

/// Header row plus body rows of plain-text cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    /// Three numbered columns and two empty rows
    pub fn placeholder() -> Self {
        let headers: Vec<String> = (1..=3).map(|n| format!("Coluna {}", n)).collect();
        let rows = vec![vec![String::new(); headers.len()]; 2];
        Self { headers, rows }
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Number of body rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Append a column named after its position, with an empty cell in every row
    pub fn add_column(&mut self) {
        self.headers.push(format!("Coluna {}", self.headers.len() + 1));
        for row in &mut self.rows {
            row.push(String::new());
        }
    }

    /// Drop the last column. No-op when only one column is left.
    pub fn remove_column(&mut self) {
        if self.headers.len() <= 1 {
            return;
        }
        self.headers.pop();
        let width = self.headers.len();
        for row in &mut self.rows {
            row.truncate(width);
        }
    }

    /// Append an empty row
    pub fn add_row(&mut self) {
        self.rows.push(vec![String::new(); self.headers.len()]);
    }

    /// Drop the last row. No-op when only one row is left.
    pub fn remove_row(&mut self) {
        if self.rows.len() <= 1 {
            return;
        }
        self.rows.pop();
    }

    pub fn update_header(&mut self, column: usize, text: impl Into<String>) {
        if let Some(header) = self.headers.get_mut(column) {
            *header = text.into();
        }
    }

    pub fn update_cell(&mut self, row: usize, column: usize, text: impl Into<String>) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell = text.into();
        }
    }

    /// Whether every row is as wide as the header row
    pub fn is_rectangular(&self) -> bool {
        self.rows.iter().all(|row| row.len() == self.headers.len())
    }

    /// Bring externally supplied data back to a valid table
    ///
    /// Ragged rows are padded or truncated to the header width. A table with
    /// no columns or no rows cannot be repaired and is rejected.
    pub fn normalize(&mut self) -> Result<(), &'static str> {
        if self.headers.is_empty() {
            return Err("a table needs at least one column");
        }
        if self.rows.is_empty() {
            return Err("a table needs at least one row");
        }
        self.rows = self.normalized_rows();
        Ok(())
    }

    /// Rows padded or truncated to the header width
    ///
    /// Stored tables written by other tools may be ragged; exporters read
    /// through this so every emitted row has one cell per column.
    pub fn normalized_rows(&self) -> Vec<Vec<String>> {
        let width = self.headers.len();
        self.rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.resize(width, String::new());
                row
            })
            .collect()
    }
}

impl Default for TableData {
    fn default() -> Self {
        Self::placeholder()
    }
}
