//! Document serialization

use crate::{Result, StoreError};
use doc_model::Document;

/// Serialize a document to pretty-printed JSON
pub fn serialize_document(document: &Document) -> Result<String> {
    let json = serde_json::to_string_pretty(document)?;
    Ok(json)
}

/// Deserialize a document from JSON
///
/// Both syntax errors and shape mismatches are reported as
/// [`StoreError::MalformedDocument`].
pub fn deserialize_document(json: &str) -> Result<Document> {
    serde_json::from_str(json).map_err(|e| StoreError::MalformedDocument(e.to_string()))
}
