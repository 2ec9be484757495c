//! Embedded image payloads
//!
//! Images are stored inline as data URLs (`data:image/png;base64,...`), which
//! keeps a document self-contained in a single JSON file.

use crate::{DocModelError, Result};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn data_url_header() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^data:([A-Za-z0-9.+-]+/[A-Za-z0-9.+-]+);base64,").ok())
        .as_ref()
}

/// Split a data URL into MIME type and base64 payload
fn split_data_url(data_url: &str) -> Option<(&str, &str)> {
    let caps = data_url_header()?.captures(data_url)?;
    let header = caps.get(0)?;
    let mime = caps.get(1)?.as_str();
    let payload = &data_url[header.end()..];
    let is_base64 = payload
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=' | b'\n' | b'\r' | b' '));
    is_base64.then_some((mime, payload))
}

/// An image embedded as a data URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageData(String);

impl ImageData {
    /// Parse and validate a data URL
    pub fn parse(data_url: impl Into<String>) -> Result<Self> {
        let data_url = data_url.into();
        if split_data_url(&data_url).is_some() {
            Ok(Self(data_url))
        } else {
            let preview: String = data_url.chars().take(32).collect();
            Err(DocModelError::InvalidImageData(format!(
                "not a base64 data URL: {}",
                preview
            )))
        }
    }

    /// Build a data URL from a MIME type and an already base64-encoded payload
    pub fn from_base64(mime_type: &str, payload: &str) -> Self {
        Self(format!("data:{};base64,{}", mime_type, payload))
    }

    /// Wrap a stored value without validation
    ///
    /// Stored documents may carry payloads produced elsewhere; they are kept
    /// verbatim and only inspected when exported.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// The full data URL
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The MIME type, if this is a well-formed data URL
    pub fn mime_type(&self) -> Option<&str> {
        split_data_url(&self.0).map(|(mime, _)| mime)
    }

    /// The base64 payload, if this is a well-formed data URL
    pub fn payload(&self) -> Option<&str> {
        split_data_url(&self.0).map(|(_, payload)| payload)
    }

    /// Whether the MIME type supports transparency (PNG, GIF, WebP)
    pub fn is_transparency_capable(&self) -> bool {
        matches!(
            self.mime_type(),
            Some("image/png") | Some("image/gif") | Some("image/webp")
        )
    }
}

impl std::fmt::Display for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mime_type() {
            Some(mime) => write!(f, "<{} image, {} bytes>", mime, self.0.len()),
            None => write!(f, "<image, {} bytes>", self.0.len()),
        }
    }
}

/// Serde helpers for optional image fields.
///
/// Both `null` and `""` read as "no image". Writing emits `null`.
pub mod optional_image {
    use super::ImageData;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<ImageData>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(image) => serializer.serialize_str(image.as_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<ImageData>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw
            .filter(|s| !s.trim().is_empty())
            .map(ImageData::from_stored))
    }
}

/// Like [`optional_image`], but writes `""` for a missing image.
///
/// Used by the plain image block, whose stored form has always been a string.
pub mod image_or_empty {
    use super::ImageData;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<ImageData>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_ref().map(ImageData::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<ImageData>, D::Error>
    where
        D: Deserializer<'de>,
    {
        super::optional_image::deserialize(deserializer)
    }
}
