//! Document Model - block documents and their editing operations
//!
//! This crate provides the block variant registry, the document value type
//! with its immutable-update mutation API, templates and the derived figure
//! numbering shared by the exporters.

mod error;
mod ids;
mod image;
mod block;
mod registry;
mod document;
mod template;
pub mod table;
pub mod list;
pub mod figures;

pub use error::*;
pub use ids::*;
pub use image::*;
pub use block::*;
pub use registry::*;
pub use document::*;
pub use template::*;
pub use table::*;
pub use list::*;
pub use figures::*;
