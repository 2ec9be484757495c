//! Store - Persistence, settings, image ingestion and export
//!
//! This crate handles the JSON document format, key-value storage, application
//! settings with recent documents and templates, image ingestion, and the
//! PDF and DOCX exporters behind a single export boundary.

mod error;
mod export;
mod file_io;
pub mod image_store;
mod kv;
mod library;
mod projection;
mod serializer;
mod settings;
pub mod docx;
pub mod pdf;

pub use error::*;
pub use export::{export, ExportError, ExportFormat};
pub use file_io::*;
pub use kv::*;
pub use library::*;
pub use projection::ProjectionContext;
pub use serializer::*;
pub use settings::*;

// Explicit to avoid the image store's Result alias
pub use image_store::{
    BuiltInImage, CompressionPreset, ImageFormat, ImageStoreError,
};

pub use docx::{export_docx, export_docx_bytes, DocxError, DocxResult};
pub use pdf::{export_pdf, export_pdf_bytes, PdfError, PdfExportOptions};
