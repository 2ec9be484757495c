//! PDF export
//!
//! Two stages. [`project`] maps a document onto a fixed-page layout tree;
//! the backend paginates that tree and writes a PDF 1.4 file using the
//! standard Helvetica fonts.
//!
//! - `layout`: layout tree produced by the projector
//! - `projector`: document to layout tree
//! - `paginator`: layout tree to positioned page items
//! - `renderer`: page items to content streams
//! - `objects`, `document`, `content`: PDF object model and operators
//! - `fonts`, `images`: font metrics and image XObjects
//! - `writer`: file structure, xref and trailer
//! - `api`: entry points

mod api;
mod content;
mod document;
mod fonts;
mod images;
mod layout;
mod objects;
mod options;
mod paginator;
mod projector;
mod renderer;
mod writer;

pub use api::*;
pub use layout::*;
pub use options::*;
pub use projector::{heading_size, project, PAGE_MARGINS, TABLE_HEADER_FILL};
pub use writer::{PdfError, Result};
