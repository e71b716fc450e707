//! Editable-document core for draftpad.
//!
//! - [`content`]: the content arena, markup parsing and serialization
//! - [`editing`]: selection anchors, image widgets and the [`Editor`]
//!   coordinator
//! - [`export`]: lowering snapshots to a portable document and DOCX
//! - [`host`]: notification, clipboard and confirmation collaborators
//! - [`io`]: draft persistence and file delivery

pub mod content;
pub mod editing;
pub mod export;
pub mod host;
pub mod io;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use content::{ContentTree, ImageWidget, NodeId, NodeKind, Position, TreeId, WidgetId};
pub use editing::*;
pub use export::{
    DOCX_MIME_TYPE, ExportError, ExportOptions, FileSink, Paragraph, PortableDocument, export,
    export_file_name, run_export, to_docx,
};
pub use host::*;
pub use io::*;
