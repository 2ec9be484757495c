//! File I/O operations

use crate::{Result, StoreError};
use doc_model::Document;
use std::path::{Path, PathBuf};

/// Save a document to a file
pub async fn save_document(document: &Document, path: impl AsRef<Path>) -> Result<()> {
    let json = crate::serialize_document(document)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Load a document from a file
pub async fn load_document(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(StoreError::FileNotFound(path.display().to_string()));
    }

    let json = tokio::fs::read_to_string(path).await?;
    crate::deserialize_document(&json)
}

/// Save a document synchronously
pub fn save_document_sync(document: &Document, path: impl AsRef<Path>) -> Result<()> {
    let json = crate::serialize_document(document)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a document synchronously
pub fn load_document_sync(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(StoreError::FileNotFound(path.display().to_string()));
    }

    let json = std::fs::read_to_string(path)?;
    crate::deserialize_document(&json)
}

/// Write `{title}.json` into `dir`
pub async fn export_json(document: &Document, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let path = dir.as_ref().join(export_file_name(&document.title, "json"));
    save_document(document, &path).await?;
    tracing::info!(path = %path.display(), "exported JSON");
    Ok(path)
}

/// File name for an exported document: the title with path separators and
/// control characters replaced
pub fn export_file_name(title: &str, extension: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "documento".to_string()
    } else {
        stem
    };
    format!("{}.{}", stem, extension)
}
