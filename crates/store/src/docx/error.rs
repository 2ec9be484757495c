//! Error types for DOCX export

use crate::image_store::ImageStoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Image error: {0}")]
    Image(#[from] ImageStoreError),

    /// Image bytes in a format Word cannot embed
    #[error("Unsupported image format: {0}")]
    UnsupportedImage(String),

    #[error("Invalid DOCX structure: {0}")]
    InvalidStructure(String),
}

pub type DocxResult<T> = std::result::Result<T, DocxError>;
