//! Edit Engine - editor session, commands and drag-and-drop
//!
//! This crate holds the editor shell: a state container around the current
//! document, the command set that mutates it, drag-and-drop translation,
//! outline and view dispatch, and id-scoped application of asynchronously
//! ingested images.

mod command;
mod session;
mod error;
mod dnd;
mod outline;
mod view;
mod table_commands;
mod list_commands;
mod image_commands;

pub use command::*;
pub use session::*;
pub use error::*;
pub use dnd::*;
pub use outline::*;
pub use view::*;
pub use table_commands::*;
pub use list_commands::*;
pub use image_commands::*;
