//! Error types for document model operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("Unknown block kind: {0}")]
    UnknownBlockKind(String),

    #[error("Invalid heading level: {0} (expected 1, 2 or 3)")]
    InvalidHeadingLevel(u8),

    #[error("Invalid data for block kind '{kind}': {message}")]
    InvalidBlockData { kind: String, message: String },

    #[error("Block kind cannot change from '{expected}' to '{found}'")]
    KindChanged { expected: String, found: String },

    #[error("Invalid image data: {0}")]
    InvalidImageData(String),
}

impl DocModelError {
    pub(crate) fn invalid_data(kind: impl Into<String>, err: impl std::fmt::Display) -> Self {
        DocModelError::InvalidBlockData {
            kind: kind.into(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocModelError>;
