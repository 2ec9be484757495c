//! DOCX export entry points

use super::error::DocxResult;
use super::layout::DocxLayout;
use super::projector::project;
use super::writer::DocxWriter;
use crate::{export_file_name, ProjectionContext};
use doc_model::Document;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Serialize a projected layout into a DOCX package
pub fn render_docx(layout: &DocxLayout) -> DocxResult<Vec<u8>> {
    let cursor = DocxWriter::new(Cursor::new(Vec::new())).write(layout)?;
    Ok(cursor.into_inner())
}

/// Export a document to DOCX bytes in memory
pub async fn export_docx_bytes(document: &Document, ctx: &ProjectionContext) -> DocxResult<Vec<u8>> {
    let layout = project(document, ctx).await?;
    tracing::debug!(
        paragraphs = layout.paragraphs().count(),
        media = layout.media.len(),
        "projected DOCX layout"
    );
    render_docx(&layout)
}

/// Export a document to `{title}.docx` inside `dir`
pub async fn export_docx(
    document: &Document,
    ctx: &ProjectionContext,
    dir: impl AsRef<Path>,
) -> DocxResult<PathBuf> {
    let bytes = export_docx_bytes(document, ctx).await?;
    let path = dir.as_ref().join(export_file_name(&document.title, "docx"));
    tokio::fs::write(&path, &bytes).await?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "exported DOCX");
    Ok(path)
}
