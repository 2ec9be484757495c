//! List data and its editing operations

use serde::{Deserialize, Serialize};

/// Marker style of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    #[default]
    Bullet,
    Numbered,
}

impl ListStyle {
    pub fn toggled(self) -> Self {
        match self {
            ListStyle::Bullet => ListStyle::Numbered,
            ListStyle::Numbered => ListStyle::Bullet,
        }
    }
}

/// A flat list of plain-text items; never empty once edited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListData {
    pub style: ListStyle,
    pub items: Vec<String>,
}

impl ListData {
    /// Bulleted list with three numbered placeholder items
    pub fn placeholder() -> Self {
        Self {
            style: ListStyle::Bullet,
            items: (1..=3).map(|n| format!("Item {}", n)).collect(),
        }
    }

    pub fn add_item(&mut self) {
        self.items.push(String::new());
    }

    /// Remove the item at `index`. No-op when it is the last item left.
    pub fn remove_item(&mut self, index: usize) {
        if self.items.len() <= 1 || index >= self.items.len() {
            return;
        }
        self.items.remove(index);
    }

    pub fn update_item(&mut self, index: usize, text: impl Into<String>) {
        if let Some(item) = self.items.get_mut(index) {
            *item = text.into();
        }
    }

    pub fn toggle_style(&mut self) {
        self.style = self.style.toggled();
    }

    /// A list always keeps at least one item
    pub fn check(&self) -> Result<(), &'static str> {
        if self.items.is_empty() {
            return Err("a list needs at least one item");
        }
        Ok(())
    }
}

impl Default for ListData {
    fn default() -> Self {
        Self::placeholder()
    }
}
