//! PDF export entry points

use super::images::ImageRegistry;
use super::layout::PdfLayout;
use super::options::PdfExportOptions;
use super::paginator::paginate;
use super::projector::project;
use super::writer::{PdfDocumentWriter, Result};
use crate::{export_file_name, ProjectionContext};
use chrono::Utc;
use doc_model::Document;
use std::path::{Path, PathBuf};

/// Paginate and serialize a projected layout
pub fn render_pdf(layout: &PdfLayout, options: &PdfExportOptions) -> Result<Vec<u8>> {
    let mut images = ImageRegistry::new();
    let pages = paginate(layout, &mut images)?;
    tracing::debug!(pages = pages.len(), images = images.len(), "paginated PDF layout");

    let mut options = options.clone();
    if options.title.is_none() {
        options.title = Some(layout.title.clone());
    }
    PdfDocumentWriter::new(options).write_to_bytes(&pages, &images)
}

/// Export a document to PDF bytes in memory
pub fn export_pdf_bytes(document: &Document, ctx: &ProjectionContext) -> Result<Vec<u8>> {
    let options = PdfExportOptions::new().with_creation_date(Utc::now());
    render_pdf(&project(document, ctx), &options)
}

/// Export a document to `{title}.pdf` inside `dir`
pub async fn export_pdf(
    document: &Document,
    ctx: &ProjectionContext,
    dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let bytes = export_pdf_bytes(document, ctx)?;
    let path = dir.as_ref().join(export_file_name(&document.title, "pdf"));
    tokio::fs::write(&path, &bytes).await?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "exported PDF");
    Ok(path)
}
