//! Drag-and-drop handling
//!
//! The gesture itself belongs to the UI toolkit; the editor only sees the
//! end-of-drag event and turns it into at most one command.

use crate::{EditCommand, EditorSession, Result};
use doc_model::{BlockId, BlockKind};

/// What is being dragged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    /// A new block from the palette
    Palette(BlockKind),
    /// An existing block being reordered
    Block(BlockId),
}

/// What it was dropped on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// The canvas outside any block
    Canvas,
    /// An existing block
    Block(BlockId),
}

/// End-of-drag event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEnd {
    pub active: DragSource,
    pub over: Option<DropTarget>,
}

impl DragEnd {
    /// The command this drop stands for, if any
    ///
    /// Palette drops always append; reorders only happen onto another block.
    pub fn to_command(&self) -> Option<EditCommand> {
        let over = self.over.as_ref()?;
        match (&self.active, over) {
            (DragSource::Palette(kind), _) => Some(EditCommand::AddBlock {
                kind: *kind,
                position: None,
            }),
            (DragSource::Block(active), DropTarget::Block(target)) if active != target => {
                Some(EditCommand::MoveBlock {
                    active: active.clone(),
                    over: target.clone(),
                })
            }
            _ => None,
        }
    }
}

impl EditorSession {
    /// Apply a drop; returns whether the document changed
    pub fn handle_drag_end(&mut self, event: &DragEnd) -> Result<bool> {
        match event.to_command() {
            Some(command) => self.execute(command),
            None => Ok(false),
        }
    }
}
