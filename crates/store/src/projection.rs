//! Inputs shared by the export projectors

use crate::AppSettings;
use doc_model::{Document, ImageData};

/// Process-wide values a projection needs besides the document itself
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectionContext {
    /// Footer logo for documents that do not set their own
    pub default_logo: Option<ImageData>,
}

impl ProjectionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_logo(mut self, logo: Option<ImageData>) -> Self {
        self.default_logo = logo;
        self
    }

    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            default_logo: settings.default_logo.clone(),
        }
    }

    /// The document's logo, falling back to the default logo
    pub fn footer_logo<'a>(&'a self, document: &'a Document) -> Option<&'a ImageData> {
        document
            .settings
            .company_logo
            .as_ref()
            .or(self.default_logo.as_ref())
    }
}
