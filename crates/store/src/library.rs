//! Locally saved documents and templates

use crate::{deserialize_document, serialize_document, KeyValueStore, Result, SettingsManager, StoreError};
use doc_model::{Document, DocumentId, DocumentMeta, Template, TemplateId};

const DOCUMENT_KEY_PREFIX: &str = "docmaker_doc_";

/// Store key of a locally saved document
pub fn document_key(id: &DocumentId) -> String {
    format!("{}{}", DOCUMENT_KEY_PREFIX, id)
}

/// Documents and templates kept in a key-value store, indexed by the
/// recent-documents list in the settings record
pub struct DocumentLibrary<S: KeyValueStore> {
    settings: SettingsManager<S>,
}

impl<S: KeyValueStore> DocumentLibrary<S> {
    pub fn open(store: S) -> Result<Self> {
        Ok(Self {
            settings: SettingsManager::load(store)?,
        })
    }

    pub fn settings(&self) -> &SettingsManager<S> {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsManager<S> {
        &mut self.settings
    }

    pub fn recent_documents(&self) -> &[DocumentMeta] {
        &self.settings.get().recent_documents
    }

    pub fn templates(&self) -> &[Template] {
        &self.settings.get().templates
    }

    /// Save a document and move it to the head of the recent list
    ///
    /// A full store fails with [`StoreError::QuotaExceeded`]; the caller should
    /// offer the JSON export instead.
    pub fn save_local(&mut self, document: &Document) -> Result<DocumentMeta> {
        let json = serialize_document(document)?;
        if let Err(e) = self.settings.store_mut().set(&document_key(&document.id), &json) {
            if matches!(e, StoreError::QuotaExceeded { .. }) {
                tracing::warn!(document = %document.id, "local storage quota exceeded");
            }
            return Err(e);
        }

        let meta = document.meta();
        self.settings.add_recent_document(meta.clone())?;
        tracing::info!(document = %document.id, title = %document.title, "saved document locally");
        Ok(meta)
    }

    /// Load a locally saved document
    ///
    /// If the recent entry has no stored payload the entry is pruned and
    /// [`StoreError::MissingContent`] is returned.
    pub fn open_recent(&mut self, id: &DocumentId) -> Result<Document> {
        match self.settings.store().get(&document_key(id))? {
            Some(json) => deserialize_document(&json),
            None => {
                tracing::warn!(document = %id, "recent document has no stored content, pruning");
                self.settings.remove_recent_document(id)?;
                Err(StoreError::MissingContent(id.to_string()))
            }
        }
    }

    /// Remove both the stored payload and the recent entry
    pub fn delete_recent(&mut self, id: &DocumentId) -> Result<()> {
        self.settings.store_mut().remove(&document_key(id))?;
        self.settings.remove_recent_document(id)
    }

    /// Snapshot a document's blocks as a named template
    pub fn save_as_template(&mut self, document: &Document, name: &str) -> Result<Template> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput(
                "Digite um nome para o template".to_string(),
            ));
        }
        let template = Template::from_document(document, name);
        self.settings.add_template(template.clone())?;
        tracing::info!(template = %template.id, name = %template.name, "saved template");
        Ok(template)
    }

    /// Start a new document from a saved template
    pub fn instantiate_template(&self, id: &TemplateId) -> Result<Document> {
        self.settings
            .template(id)
            .map(Document::from_template)
            .ok_or_else(|| StoreError::TemplateNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use doc_model::BlockKind;

    fn sample() -> Document {
        Document::new()
            .update_title("Inspeção")
            .add_block(BlockKind::Cover, None)
            .add_block(BlockKind::SectionList, None)
    }

    #[test]
    fn test_save_and_open_recent() {
        let mut library = DocumentLibrary::open(MemoryStore::new()).unwrap();
        let doc = sample();
        let meta = library.save_local(&doc).unwrap();

        assert_eq!(meta.title, "Inspeção");
        assert_eq!(library.recent_documents()[0].id, doc.id);
        assert_eq!(library.open_recent(&doc.id).unwrap(), doc);
    }

    #[test]
    fn test_resave_moves_to_front_without_duplicates() {
        let mut library = DocumentLibrary::open(MemoryStore::new()).unwrap();
        let first = sample();
        let second = Document::new();
        library.save_local(&first).unwrap();
        library.save_local(&second).unwrap();
        library.save_local(&first.update_title("Editado")).unwrap();

        let recent = library.recent_documents();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, first.id);
        assert_eq!(recent[0].title, "Editado");
    }

    #[test]
    fn test_quota_exceeded() {
        let mut library = DocumentLibrary::open(MemoryStore::with_quota(256)).unwrap();
        let big = sample().update_title("x".repeat(1024));
        let err = library.save_local(&big).unwrap_err();

        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert!(err.to_string().contains("Exportar JSON"));
        assert!(library.recent_documents().is_empty());
    }

    #[test]
    fn test_missing_payload_prunes_entry() {
        let mut library = DocumentLibrary::open(MemoryStore::new()).unwrap();
        let doc = sample();
        library.save_local(&doc).unwrap();
        library
            .settings_mut()
            .store_mut()
            .remove(&document_key(&doc.id))
            .unwrap();

        let err = library.open_recent(&doc.id).unwrap_err();
        assert!(matches!(err, StoreError::MissingContent(_)));
        assert!(library.recent_documents().is_empty());
    }

    #[test]
    fn test_delete_recent() {
        let mut library = DocumentLibrary::open(MemoryStore::new()).unwrap();
        let doc = sample();
        library.save_local(&doc).unwrap();
        library.delete_recent(&doc.id).unwrap();

        assert!(library.recent_documents().is_empty());
        assert_eq!(library.settings().store().get(&document_key(&doc.id)).unwrap(), None);
    }

    #[test]
    fn test_template_round_trip() {
        let mut library = DocumentLibrary::open(MemoryStore::new()).unwrap();
        let doc = sample();
        let template = library.save_as_template(&doc, "  Padrão ").unwrap();
        assert_eq!(template.name, "Padrão");
        assert_eq!(template.description, "Template baseado em \"Inspeção\"");

        let fresh = library.instantiate_template(&template.id).unwrap();
        assert_eq!(fresh.title, "Novo - Padrão");
        assert_eq!(fresh.blocks.len(), 2);
        assert_ne!(fresh.blocks[0].id(), template.blocks[0].id());
        assert_eq!(fresh.blocks[1].content(), template.blocks[1].content());
    }

    #[test]
    fn test_template_requires_name() {
        let mut library = DocumentLibrary::open(MemoryStore::new()).unwrap();
        assert!(matches!(
            library.save_as_template(&sample(), "   "),
            Err(StoreError::InvalidInput(_))
        ));
        assert!(matches!(
            library.instantiate_template(&TemplateId::from("nope")),
            Err(StoreError::TemplateNotFound(_))
        ));
    }
}
