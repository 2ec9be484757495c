//! Application settings management
//!
//! Settings, the recent-documents index and saved templates persist as one
//! JSON record in the key-value store.

use crate::{KeyValueStore, Result, StoreError};
use doc_model::{DocumentId, DocumentMeta, ImageData, Template, TemplateId, TemplatePatch};
use serde::{Deserialize, Serialize};

/// Store key of the settings record
pub const SETTINGS_KEY: &str = "docmaker_settings";

/// Length cap of the recent-documents list
pub const MAX_RECENT_DOCUMENTS: usize = 10;

/// Process-wide settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Footer logo used when a document has none of its own
    #[serde(with = "doc_model::optional_image")]
    pub default_logo: Option<ImageData>,
    /// Most recent first
    pub recent_documents: Vec<DocumentMeta>,
    pub templates: Vec<Template>,
    pub theme: Theme,
}

/// Application theme
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(StoreError::InvalidInput(format!("unknown theme: {}", other))),
        }
    }
}

/// Settings manager for loading, saving, and updating application settings
pub struct SettingsManager<S: KeyValueStore> {
    store: S,
    /// Current settings (cached)
    current: AppSettings,
}

impl<S: KeyValueStore> SettingsManager<S> {
    /// Load settings from the store, or use defaults if none are stored or
    /// the stored record cannot be parsed
    pub fn load(store: S) -> Result<Self> {
        let current = match store.get(SETTINGS_KEY)? {
            Some(content) => match serde_json::from_str::<AppSettings>(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("Failed to parse settings, using defaults: {}", e);
                    AppSettings::default()
                }
            },
            None => AppSettings::default(),
        };
        Ok(Self { store, current })
    }

    /// Get current settings
    pub fn get(&self) -> &AppSettings {
        &self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Persist current settings
    pub fn save(&mut self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.current)?;
        self.store.set(SETTINGS_KEY, &content)
    }

    /// Apply `f` to a copy of the settings and persist it
    ///
    /// The cached settings only change once the write succeeded.
    pub fn update<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut AppSettings),
    {
        let mut next = self.current.clone();
        f(&mut next);
        let content = serde_json::to_string_pretty(&next)?;
        self.store.set(SETTINGS_KEY, &content)?;
        self.current = next;
        Ok(())
    }

    /// Reset settings to defaults and save
    pub fn reset(&mut self) -> Result<&AppSettings> {
        self.update(|settings| *settings = AppSettings::default())?;
        Ok(&self.current)
    }

    /// Record a document at the head of the recent list
    pub fn add_recent_document(&mut self, meta: DocumentMeta) -> Result<()> {
        self.update(|settings| {
            settings.recent_documents.retain(|d| d.id != meta.id);
            settings.recent_documents.insert(0, meta);
            settings.recent_documents.truncate(MAX_RECENT_DOCUMENTS);
        })
    }

    pub fn remove_recent_document(&mut self, id: &DocumentId) -> Result<()> {
        self.update(|settings| settings.recent_documents.retain(|d| &d.id != id))
    }

    pub fn add_template(&mut self, template: Template) -> Result<()> {
        self.update(|settings| settings.templates.push(template))
    }

    pub fn remove_template(&mut self, id: &TemplateId) -> Result<()> {
        self.update(|settings| settings.templates.retain(|t| &t.id != id))
    }

    /// Merge `patch` into the template with the given id; an unknown id is a no-op
    pub fn update_template(&mut self, id: &TemplateId, patch: TemplatePatch) -> Result<()> {
        self.update(|settings| {
            if let Some(template) = settings.templates.iter_mut().find(|t| &t.id == id) {
                *template = template.merged(patch);
            }
        })
    }

    pub fn template(&self, id: &TemplateId) -> Option<&Template> {
        self.current.templates.iter().find(|t| &t.id == id)
    }

    pub fn set_default_logo(&mut self, logo: Option<ImageData>) -> Result<()> {
        self.update(|settings| settings.default_logo = logo)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.update(|settings| settings.theme = theme)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.update(|settings| settings.theme = settings.theme.toggled())?;
        Ok(self.current.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileStore, MemoryStore};
    use chrono::Utc;
    use doc_model::{BlockKind, Document};
    use tempfile::TempDir;

    fn meta(id: &str) -> DocumentMeta {
        DocumentMeta {
            id: DocumentId::from(id),
            title: format!("Doc {}", id),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.default_logo, None);
        assert!(settings.recent_documents.is_empty());
        assert!(settings.templates.is_empty());
        assert_eq!(settings.theme, Theme::Light);
    }

    #[test]
    fn test_settings_serialization() {
        let json = serde_json::to_value(AppSettings::default()).unwrap();
        assert_eq!(json["defaultLogo"], serde_json::Value::Null);
        assert_eq!(json["theme"], "light");
        assert!(json["recentDocuments"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.templates.is_empty());
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let mut store = MemoryStore::new();
        store.set(SETTINGS_KEY, "{{{").unwrap();
        let manager = SettingsManager::load(store).unwrap();
        assert_eq!(manager.get(), &AppSettings::default());
    }

    #[test]
    fn test_recent_documents_dedupe_and_cap() {
        let mut manager = SettingsManager::load(MemoryStore::new()).unwrap();
        for i in 0..12 {
            manager.add_recent_document(meta(&i.to_string())).unwrap();
        }
        manager.add_recent_document(meta("5")).unwrap();

        let ids: Vec<_> = manager
            .get()
            .recent_documents
            .iter()
            .map(|d| d.id.as_str().to_string())
            .collect();
        assert_eq!(ids.len(), MAX_RECENT_DOCUMENTS);
        assert_eq!(ids[0], "5");
        assert_eq!(ids.iter().filter(|id| *id == "5").count(), 1);
        assert_eq!(ids[1], "11");

        manager.remove_recent_document(&DocumentId::from("5")).unwrap();
        assert_eq!(manager.get().recent_documents[0].id.as_str(), "11");
    }

    #[test]
    fn test_template_operations() {
        let mut manager = SettingsManager::load(MemoryStore::new()).unwrap();
        let doc = Document::new().add_block(BlockKind::Section, None);
        let template = Template::from_document(&doc, "Relatório");
        let id = template.id.clone();
        manager.add_template(template).unwrap();

        manager
            .update_template(
                &id,
                TemplatePatch {
                    name: Some("Relatório v2".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(manager.template(&id).unwrap().name, "Relatório v2");

        manager.remove_template(&id).unwrap();
        assert!(manager.get().templates.is_empty());
    }

    #[test]
    fn test_theme_toggle_persists() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();
        let mut manager = SettingsManager::load(store).unwrap();
        assert_eq!(manager.toggle_theme().unwrap(), Theme::Dark);

        let reopened = SettingsManager::load(FileStore::open(temp_dir.path()).unwrap()).unwrap();
        assert_eq!(reopened.get().theme, Theme::Dark);
    }

    #[test]
    fn test_failed_write_keeps_cache() {
        let mut manager = SettingsManager::load(MemoryStore::with_quota(16)).unwrap();
        let logo = ImageData::from_base64("image/png", &"A".repeat(64));
        assert!(manager.set_default_logo(Some(logo)).is_err());
        assert_eq!(manager.get().default_logo, None);
    }
}
