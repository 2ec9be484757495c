//! Editor session: the state container for the document being edited

use crate::{EditCommand, Result};
use doc_model::Document;

/// Receives every effective change of the session's document
///
/// Persistence-on-change (local autosave, recent-documents bookkeeping) is
/// wired up by registering an observer.
pub trait DocumentObserver {
    fn on_document_changed(&mut self, document: &Document);
}

impl<F> DocumentObserver for F
where
    F: FnMut(&Document),
{
    fn on_document_changed(&mut self, document: &Document) {
        self(document)
    }
}

/// Owns the current document and applies commands to it
pub struct EditorSession {
    /// Current document
    document: Document,
    /// Change observers, notified in registration order
    observers: Vec<Box<dyn DocumentObserver>>,
}

impl EditorSession {
    /// Create a session over an empty document
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    /// Create a session over a specific document
    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            observers: Vec::new(),
        }
    }

    /// Get the current document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Register an observer
    pub fn observe(&mut self, observer: impl DocumentObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Execute a command
    ///
    /// Returns whether the document changed. Observers are only notified of
    /// effective changes.
    pub fn execute(&mut self, command: EditCommand) -> Result<bool> {
        let next = command.apply(&self.document)?;
        if next == self.document {
            tracing::debug!(command = command.display_name(), "command had no effect");
            return Ok(false);
        }
        self.set_document(next);
        Ok(true)
    }

    /// Replace the document wholesale (load from file, storage or template)
    pub fn replace_document(&mut self, document: Document) {
        self.set_document(document);
    }

    fn set_document(&mut self, document: Document) {
        self.document = document;
        for observer in &mut self.observers {
            observer.on_document_changed(&self.document);
        }
    }

    /// Consume the session and return its document
    pub fn into_document(self) -> Document {
        self.document
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("document", &self.document.id)
            .field("blocks", &self.document.blocks.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}
