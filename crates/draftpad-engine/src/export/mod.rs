/*!
 * # Document Export Pipeline
 *
 * Export is a pull from the canonical snapshot. It never looks at the live
 * surface or selection.
 *
 * ## Phases
 *
 * 1. **Structural lowering** (`lower`): the snapshot markup is parsed into a
 *    fresh tree and walked depth first with an explicit stack. Text splits
 *    into one paragraph per non-empty line, block containers flatten, other
 *    elements contribute their trimmed text, widgets and `<img>` become
 *    image blocks.
 * 2. **Image resolution** (`resolve`): data URIs are decoded, sized by
 *    aspect-fit against the configured bound, and normalized to PNG.
 *    Images that cannot be decoded are logged and skipped.
 *
 * The resulting [`PortableDocument`] is packaged by [`to_docx`] and handed
 * to a [`FileSink`] by [`run_export`].
 */

pub mod deliver;
pub mod docx;
pub mod fit;
pub mod lower;
pub mod model;
pub mod resolve;

use chrono::NaiveDate;

use crate::content::ContentTree;
use crate::editing::ContentSnapshot;
use crate::host::{NotificationKind, Notifier};

pub use deliver::{DeliverError, FileSink, export_file_name};
pub use docx::{DOCX_MIME_TYPE, to_docx};
pub use fit::{Size, aspect_fit};
pub use lower::Block;
pub use model::{Paragraph, PortableDocument, SizedImage, TextRun};

pub const EXPORT_FAILED: &str = "Export failed, please retry";
pub const DEFAULT_FILE_PREFIX: &str = "draft";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// Size used when neither the markup nor the image header gives one
    pub default_width: u32,
    pub default_height: u32,
    pub file_prefix: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            max_width: 600,
            max_height: 450,
            default_width: 400,
            default_height: 300,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Serialization failed: {0}")]
    Serialize(String),
    #[error("Could not deliver {file_name}: {source}")]
    Deliver {
        file_name: String,
        #[source]
        source: DeliverError,
    },
}

/// Lower `snapshot` into a portable document. An empty result becomes one
/// paragraph holding a single space.
pub fn export(snapshot: &ContentSnapshot, options: &ExportOptions) -> PortableDocument {
    let tree = ContentTree::parse(&snapshot.content);
    let mut paragraphs = Vec::new();

    for block in lower::lower(&tree) {
        match block {
            Block::Text(text) => paragraphs.push(Paragraph::text(text)),
            Block::Image { src, width, height } => {
                match resolve::resolve_image(&src, width, height, options) {
                    Ok(image) => paragraphs.push(Paragraph::Image(image)),
                    Err(e) => log::warn!("Skipping image in export: {e}"),
                }
            }
        }
    }

    if paragraphs.is_empty() {
        paragraphs.push(Paragraph::text(" "));
    }
    PortableDocument { paragraphs }
}

/// Export, package and deliver the snapshot, reporting the result through
/// `notifier`. Returns the delivered file name.
pub fn run_export(
    snapshot: &ContentSnapshot,
    options: &ExportOptions,
    date: NaiveDate,
    sink: &mut dyn FileSink,
    notifier: &mut dyn Notifier,
) -> Result<String, ExportError> {
    let result = package_and_deliver(snapshot, options, date, sink);
    match &result {
        Ok(file_name) => notifier.show(&format!("Exported {file_name}"), NotificationKind::Success),
        Err(e) => {
            log::error!("Export failed: {e}");
            notifier.show(EXPORT_FAILED, NotificationKind::Error);
        }
    }
    result
}

fn package_and_deliver(
    snapshot: &ContentSnapshot,
    options: &ExportOptions,
    date: NaiveDate,
    sink: &mut dyn FileSink,
) -> Result<String, ExportError> {
    let document = export(snapshot, options);
    let bytes = to_docx(&document)?;
    let file_name = export_file_name(&options.file_prefix, date);
    sink.deliver(&file_name, DOCX_MIME_TYPE, &bytes)
        .map_err(|source| ExportError::Deliver {
            file_name: file_name.clone(),
            source,
        })?;
    Ok(file_name)
}
