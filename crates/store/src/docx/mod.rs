//! DOCX export
//!
//! A DOCX file is a ZIP archive of XML parts (ECMA-376). Export runs in two
//! steps: the projector turns a [`doc_model::Document`] into a flow
//! [`DocxLayout`], and the writers serialize that layout into:
//! - `[Content_Types].xml` - content type definitions
//! - `_rels/.rels` - root relationships
//! - `word/document.xml` - body and section properties
//! - `word/styles.xml` - paragraph styles
//! - `word/numbering.xml` - bullet and numbered list definitions
//! - `word/footer1.xml`, `word/footer2.xml` - page footer and empty first-page footer
//! - `word/_rels/*.rels` - part relationships
//! - `word/media/` - embedded pictures

mod api;
mod content_types;
mod document_writer;
mod error;
mod layout;
mod media_writer;
mod numbering_writer;
mod projector;
mod relationships;
mod styles_writer;
mod tables_writer;
mod writer;

pub use api::{export_docx, export_docx_bytes, render_docx};
pub use error::{DocxError, DocxResult};
pub use layout::*;
pub use projector::{heading_style, project, project_with, DocxProjectionOptions, TABLE_HEADER_FILL};

/// Escape text for XML content and attribute values
///
/// Characters XML 1.0 does not allow (C0 controls other than tab, LF and CR,
/// U+FFFE and U+FFFF) are dropped.
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\t' | '\n' | '\r' => out.push(c),
            c if c < ' ' || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// XML namespaces used in DOCX files
pub mod namespaces {
    /// Main WordprocessingML namespace
    pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
    /// Relationships namespace
    pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    /// Package relationships namespace
    pub const PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
    /// Content types namespace
    pub const CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
    /// DrawingML namespace
    pub const A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
    /// WordprocessingML Drawing namespace
    pub const WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
    /// Picture namespace
    pub const PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
}

/// Relationship types used in DOCX
pub mod relationship_types {
    pub const DOCUMENT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const NUMBERING: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
    pub const IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const FOOTER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
}

/// Content types for DOCX parts
pub mod content_type_values {
    pub const DOCUMENT: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    pub const STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
    pub const NUMBERING: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
    pub const FOOTER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
}

#[cfg(test)]
mod tests;
